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

use crate::sweep::points::PointId;

/// Index of a triangle in a [`TriangleStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangleId(pub u32);

impl TriangleId {
    /// The "no neighbor" sentinel.
    pub const NONE: TriangleId = TriangleId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == TriangleId::NONE
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One mesh triangle.
///
/// Points are kept in counter-clockwise order; edge `i` is the edge opposite
/// point `i`, and `neighbors[i]` (when not `NONE`) shares exactly that edge.
/// `constrained`/`delaunay` are the per-edge flags of the legalizer; the
/// delaunay flags are transient and live only while a flip cascade is in
/// flight. `interior` is the finalizer's flood-fill mark.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub points: [PointId; 3],
    pub neighbors: [TriangleId; 3],
    pub constrained: [bool; 3],
    pub delaunay: [bool; 3],
    pub interior: bool,
}

impl Triangle {
    pub fn new(p0: PointId, p1: PointId, p2: PointId) -> Self {
        Self {
            points: [p0, p1, p2],
            neighbors: [TriangleId::NONE; 3],
            constrained: [false; 3],
            delaunay: [false; 3],
            interior: false,
        }
    }

    /// Index of `p` among this triangle's points. The fallback mirrors the
    /// chained comparison of the reference family; callers that cannot assume
    /// membership use [`Triangle::point_index`] instead.
    #[inline]
    fn index_of(&self, p: PointId) -> usize {
        if self.points[0] == p {
            0
        } else if self.points[1] == p {
            1
        } else {
            debug_assert_eq!(self.points[2], p, "point not in triangle");
            2
        }
    }

    #[inline]
    pub fn point_index(&self, p: PointId) -> Option<usize> {
        self.points.iter().position(|&q| q == p)
    }

    /// The point clockwise of `p`.
    #[inline]
    pub fn point_cw(&self, p: PointId) -> PointId {
        self.points[(self.index_of(p) + 2) % 3]
    }

    /// The point counter-clockwise of `p`.
    #[inline]
    pub fn point_ccw(&self, p: PointId) -> PointId {
        self.points[(self.index_of(p) + 1) % 3]
    }

    /// The point of `self` opposite the edge shared with `other`, where `p`
    /// is a point of `other` on that shared edge's far side.
    #[inline]
    pub fn opposite_point(&self, other: &Triangle, p: PointId) -> PointId {
        self.point_cw(other.point_cw(p))
    }

    #[inline]
    pub fn neighbor_across(&self, p: PointId) -> TriangleId {
        self.neighbors[self.index_of(p)]
    }

    #[inline]
    pub fn neighbor_cw(&self, p: PointId) -> TriangleId {
        self.neighbors[(self.index_of(p) + 1) % 3]
    }

    #[inline]
    pub fn neighbor_ccw(&self, p: PointId) -> TriangleId {
        self.neighbors[(self.index_of(p) + 2) % 3]
    }

    /// Index of the edge joining `p` and `q`, i.e. the index of the third
    /// point, or `None` if the edge is not part of this triangle.
    pub fn edge_index(&self, p: PointId, q: PointId) -> Option<usize> {
        let i = self.point_index(p)?;
        let j = self.point_index(q)?;
        Some(3 - i - j)
    }

    #[inline]
    pub fn constrained_cw(&self, p: PointId) -> bool {
        self.constrained[(self.index_of(p) + 1) % 3]
    }

    #[inline]
    pub fn constrained_ccw(&self, p: PointId) -> bool {
        self.constrained[(self.index_of(p) + 2) % 3]
    }

    #[inline]
    pub fn set_constrained_cw(&mut self, p: PointId, v: bool) {
        let i = self.index_of(p);
        self.constrained[(i + 1) % 3] = v;
    }

    #[inline]
    pub fn set_constrained_ccw(&mut self, p: PointId, v: bool) {
        let i = self.index_of(p);
        self.constrained[(i + 2) % 3] = v;
    }

    #[inline]
    pub fn delaunay_cw(&self, p: PointId) -> bool {
        self.delaunay[(self.index_of(p) + 1) % 3]
    }

    #[inline]
    pub fn delaunay_ccw(&self, p: PointId) -> bool {
        self.delaunay[(self.index_of(p) + 2) % 3]
    }

    #[inline]
    pub fn set_delaunay_cw(&mut self, p: PointId, v: bool) {
        let i = self.index_of(p);
        self.delaunay[(i + 1) % 3] = v;
    }

    #[inline]
    pub fn set_delaunay_ccw(&mut self, p: PointId, v: bool) {
        let i = self.index_of(p);
        self.delaunay[(i + 2) % 3] = v;
    }

    #[inline]
    pub fn clear_delaunay(&mut self) {
        self.delaunay = [false; 3];
    }

    /// Mark the edge joining `p` and `q` constrained, if present.
    pub fn set_constrained_edge(&mut self, p: PointId, q: PointId) {
        if let Some(i) = self.edge_index(p, q) {
            self.constrained[i] = true;
        }
    }

    /// Rotate this triangle one vertex clockwise around the diagonal flip:
    /// `p` stays, the shared diagonal endpoint opposite `p` is replaced by
    /// `op`. Neighbor links and edge flags are remapped by the caller.
    pub fn rotate_cw(&mut self, p: PointId, op: PointId) {
        let [p0, p1, p2] = self.points;
        match self.index_of(p) {
            0 => self.points = [p2, p0, op],
            1 => self.points = [op, p0, p1],
            _ => self.points = [p2, op, p1],
        }
    }
}

/// Append-only arena of triangles. Nothing is freed within a call; exterior
/// triangles are simply never marked interior by the finalizer.
pub struct TriangleStore {
    tris: Vec<Triangle>,
}

impl TriangleStore {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            tris: Vec::with_capacity(n),
        }
    }

    pub fn insert(&mut self, t: Triangle) -> TriangleId {
        let id = TriangleId(self.tris.len() as u32);
        self.tris.push(t);
        id
    }

    #[inline]
    pub fn get(&self, id: TriangleId) -> &Triangle {
        &self.tris[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: TriangleId) -> &mut Triangle {
        &mut self.tris[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tris.len()
    }

    /// Link `a` and `b` as neighbors across their shared edge. A no-op when
    /// they share no edge (the reference family asserts here instead).
    pub fn mark_neighbor(&mut self, a: TriangleId, b: TriangleId) {
        if a.is_none() || b.is_none() {
            return;
        }
        let ta = *self.get(a);
        let tb = *self.get(b);
        for i in 0..3 {
            let u = ta.points[(i + 1) % 3];
            let v = ta.points[(i + 2) % 3];
            if let Some(j) = tb.edge_index(u, v) {
                self.tris[a.index()].neighbors[i] = b;
                self.tris[b.index()].neighbors[j] = a;
                return;
            }
        }
        debug_assert!(false, "mark_neighbor: triangles share no edge");
    }
}
