// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::cmp::Ordering;

/// Tolerance used by every geometric predicate in the crate.
pub const EPS: f64 = 1e-12;

/// A 2D point with `f64` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate-wise equality within [`EPS`].
    #[inline]
    pub fn eq_eps(&self, other: &Point2) -> bool {
        (self.x - other.x).abs() < EPS && (self.y - other.y).abs() < EPS
    }

    /// Total sweep order: y ascending, ties broken by x ascending.
    ///
    /// This comparator defines "above"/"below" for the whole triangulation;
    /// points with smaller y are processed first.
    #[inline]
    pub fn sweep_cmp(&self, other: &Point2) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.x.total_cmp(&other.x))
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_order_y_before_x() {
        let lo = Point2::new(5.0, 0.0);
        let hi = Point2::new(0.0, 1.0);
        assert_eq!(lo.sweep_cmp(&hi), Ordering::Less);
    }

    #[test]
    fn sweep_order_tie_breaks_on_x() {
        let a = Point2::new(1.0, 3.0);
        let b = Point2::new(2.0, 3.0);
        assert_eq!(a.sweep_cmp(&b), Ordering::Less);
        assert_eq!(b.sweep_cmp(&a), Ordering::Greater);
        assert_eq!(a.sweep_cmp(&a), Ordering::Equal);
    }

    #[test]
    fn epsilon_equality() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(1.0 + 1e-14, 2.0);
        assert!(a.eq_eps(&b));
        assert!(!a.eq_eps(&Point2::new(1.0 + 1e-9, 2.0)));
    }
}
