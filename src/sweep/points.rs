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

use smallvec::SmallVec;

use crate::geometry::{Aabb, Point2};
use crate::sweep::TriangulateError;

/// Fraction of the bounding-box extents used to place the sentinel points
/// outside the input. Empirically tuned in the reference family; do not change
/// without a stronger geometric argument.
const SENTINEL_MARGIN: f64 = 0.3;

/// Stable index of a point in a [`PointStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointId(pub u32);

impl PointId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-call arena of points, the constraint edges hanging off them, and the
/// sweep-sorted processing order.
///
/// Input points are appended in caller order and never reordered, so a
/// `PointId` below [`PointStore::input_len`] doubles as the caller's vertex
/// index. The two sentinel points are appended last by [`PointStore::finish`].
pub struct PointStore {
    coords: Vec<Point2>,
    /// For each point, the sweep-lower endpoints of constraint edges whose
    /// sweep-upper endpoint is this point.
    edges: Vec<SmallVec<[PointId; 2]>>,
    /// Input point ids in sweep order. Built once by `finish`.
    order: Vec<PointId>,
    input_len: usize,
    head: PointId,
    tail: PointId,
}

impl PointStore {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            coords: Vec::with_capacity(n + 2),
            edges: Vec::with_capacity(n + 2),
            order: Vec::new(),
            input_len: 0,
            head: PointId(0),
            tail: PointId(0),
        }
    }

    pub fn add_point(&mut self, p: Point2) -> PointId {
        let id = PointId(self.coords.len() as u32);
        self.coords.push(p);
        self.edges.push(SmallVec::new());
        self.input_len += 1;
        id
    }

    /// Register the constraint edge `a`–`b`, attaching it to whichever
    /// endpoint comes later in sweep order. Rejects zero-length edges.
    pub fn add_edge(&mut self, a: PointId, b: PointId) -> Result<(), TriangulateError> {
        let pa = self.coords[a.index()];
        let pb = self.coords[b.index()];
        if pa.eq_eps(&pb) {
            return Err(TriangulateError::DuplicatePoint { x: pa.x, y: pa.y });
        }
        let (upper, lower) = match pa.sweep_cmp(&pb) {
            Ordering::Greater => (a, b),
            _ => (b, a),
        };
        self.edges[upper.index()].push(lower);
        Ok(())
    }

    /// Sort the input into sweep order and synthesize the two sentinel points
    /// framing the bounding box.
    pub fn finish(&mut self) {
        self.order = (0..self.input_len as u32).map(PointId).collect();
        self.order.sort_by(|&a, &b| {
            self.coords[a.index()].sweep_cmp(&self.coords[b.index()])
        });

        let bb = Aabb::from_points(&self.coords[..self.input_len]);
        let dx = SENTINEL_MARGIN * bb.width();
        let dy = SENTINEL_MARGIN * bb.height();

        self.head = PointId(self.coords.len() as u32);
        self.coords.push(Point2::new(bb.max.x + dx, bb.min.y - dy));
        self.edges.push(SmallVec::new());

        self.tail = PointId(self.coords.len() as u32);
        self.coords.push(Point2::new(bb.min.x - dx, bb.min.y - dy));
        self.edges.push(SmallVec::new());
    }

    #[inline]
    pub fn point(&self, id: PointId) -> Point2 {
        self.coords[id.index()]
    }

    /// Lower endpoints of the constraint edges whose upper endpoint is `id`.
    #[inline]
    pub fn edges_of(&self, id: PointId) -> &[PointId] {
        &self.edges[id.index()]
    }

    /// Input points in sweep order.
    #[inline]
    pub fn sorted(&self) -> &[PointId] {
        &self.order
    }

    #[inline]
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Right sentinel (max-x side).
    #[inline]
    pub fn head(&self) -> PointId {
        self.head
    }

    /// Left sentinel (min-x side).
    #[inline]
    pub fn tail(&self) -> PointId {
        self.tail
    }

    #[inline]
    pub fn is_sentinel(&self, id: PointId) -> bool {
        id.index() >= self.input_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(points: &[(f64, f64)]) -> (PointStore, Vec<PointId>) {
        let mut s = PointStore::with_capacity(points.len());
        let ids = points
            .iter()
            .map(|&(x, y)| s.add_point(Point2::new(x, y)))
            .collect();
        (s, ids)
    }

    #[test]
    fn sorts_by_y_then_x() {
        let (mut s, ids) = store(&[(1.0, 2.0), (0.0, 0.0), (-1.0, 2.0)]);
        s.finish();
        assert_eq!(s.sorted(), &[ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn sentinels_frame_the_bounding_box() {
        let (mut s, _) = store(&[(0.0, 0.0), (10.0, 20.0)]);
        s.finish();
        assert_eq!(s.point(s.head()), Point2::new(13.0, -6.0));
        assert_eq!(s.point(s.tail()), Point2::new(-3.0, -6.0));
        assert!(s.is_sentinel(s.head()));
        assert!(s.is_sentinel(s.tail()));
        assert_eq!(s.input_len(), 2);
    }

    #[test]
    fn edge_attaches_to_sweep_upper_endpoint() {
        let (mut s, ids) = store(&[(0.0, 0.0), (5.0, 1.0)]);
        s.add_edge(ids[0], ids[1]).unwrap();
        assert_eq!(s.edges_of(ids[1]), &[ids[0]]);
        assert!(s.edges_of(ids[0]).is_empty());
    }

    #[test]
    fn zero_length_edge_is_rejected() {
        let (mut s, ids) = store(&[(3.0, 4.0), (3.0, 4.0)]);
        let err = s.add_edge(ids[0], ids[1]).unwrap_err();
        assert_eq!(err, TriangulateError::DuplicatePoint { x: 3.0, y: 4.0 });
    }
}
