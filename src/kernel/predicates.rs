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

use crate::geometry::{EPS, Point2};

/// In-circle test for the Delaunay legalization step.
///
/// Requires a,b,c in counter-clockwise order. Returns `true` iff `d` lies
/// strictly inside the circumcircle of a,b,c. The early sign checks reject
/// configurations where d is on the far side of an oriented edge, which keeps
/// the determinant evaluation cheap for the common case.
pub fn in_circle(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    let adx = a.x - d.x;
    let ady = a.y - d.y;
    let bdx = b.x - d.x;
    let bdy = b.y - d.y;

    let oabd = adx * bdy - bdx * ady;
    if oabd <= 0.0 {
        return false;
    }

    let cdx = c.x - d.x;
    let cdy = c.y - d.y;

    let ocad = cdx * ady - adx * cdy;
    if ocad <= 0.0 {
        return false;
    }

    let obcd = bdx * cdy - cdx * bdy;

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    alift * obcd + blift * ocad + clift * oabd > 0.0
}

/// Scan-area test used during constraint-edge recovery: `true` iff `d` lies
/// inside the wedge spanned by rays a→b and a→c (strictly, with the epsilon
/// band treated as outside). The quadrilateral around the shared edge is only
/// safe to flip when this holds.
pub fn in_scan_area(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    let oadb = (a.x - b.x) * (d.y - b.y) - (d.x - b.x) * (a.y - b.y);
    if oadb >= -EPS {
        return false;
    }

    let oadc = (a.x - c.x) * (d.y - c.y) - (d.x - c.x) * (a.y - c.y);
    if oadc <= EPS {
        return false;
    }

    true
}

/// The signed angle at `origin` between rays origin→a and origin→b, kept as
/// its cross/dot components so the hole-fill thresholds reduce to sign tests.
#[derive(Debug, Clone, Copy)]
pub struct FrontAngle {
    cross: f64,
    dot: f64,
}

impl FrontAngle {
    #[inline]
    pub fn new(origin: Point2, a: Point2, b: Point2) -> Self {
        let ax = a.x - origin.x;
        let ay = a.y - origin.y;
        let bx = b.x - origin.x;
        let by = b.y - origin.y;
        Self {
            cross: ax * by - ay * bx,
            dot: ax * bx + ay * by,
        }
    }

    /// |angle| > 90°.
    #[inline]
    pub fn exceeds_90(&self) -> bool {
        self.dot < 0.0
    }

    /// angle in [0°, 90°].
    #[inline]
    pub fn within_0_to_90(&self) -> bool {
        self.cross >= 0.0 && self.dot >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_circle_interior_point() {
        // unit circle through these three, origin-centered
        let a = Point2::new(-1.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert!(in_circle(a, b, c, Point2::new(0.0, 0.1)));
        assert!(!in_circle(a, b, c, Point2::new(0.0, 2.0)));
    }

    #[test]
    fn in_circle_rejects_cocircular() {
        let a = Point2::new(-1.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert!(!in_circle(a, b, c, Point2::new(0.0, -1.0)));
    }

    #[test]
    fn scan_area_wedge() {
        let a = Point2::new(0.0, 2.0);
        let b = Point2::new(-1.0, 0.0);
        let c = Point2::new(1.0, 0.0);
        assert!(in_scan_area(a, b, c, Point2::new(0.0, -1.0)));
        assert!(!in_scan_area(a, b, c, Point2::new(3.0, 0.0)));
    }

    #[test]
    fn front_angle_signs() {
        let o = Point2::new(0.0, 0.0);
        let right = Point2::new(1.0, 0.0);
        let up = Point2::new(0.0, 1.0);
        let back = Point2::new(-1.0, 0.2);

        assert!(!FrontAngle::new(o, right, up).exceeds_90());
        assert!(FrontAngle::new(o, right, back).exceeds_90());
        assert!(FrontAngle::new(o, right, up).within_0_to_90());
        // clockwise angle is negative
        assert!(!FrontAngle::new(o, up, right).within_0_to_90());
    }
}
