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

//! The sweep itself: point events, advancing-front fill heuristics, constraint
//! edge recovery, Delaunay legalization and the interior flood fill.

use crate::geometry::{EPS, Point2};
use crate::kernel::{FrontAngle, Orientation, in_circle, in_scan_area, orient2d};
use crate::sweep::TriangulateError;
use crate::sweep::front::{AdvancingFront, NodeId};
use crate::sweep::points::{PointId, PointStore};
use crate::sweep::triangles::{Triangle, TriangleId, TriangleStore};

/// Depth guard for the legalize flip cascade and the constraint-recovery
/// recursion. Near-collinear chains can stack many flips; tripping the guard
/// surfaces as a front-corruption error instead of exhausting the call stack.
const MAX_FLIP_DEPTH: usize = 4096;

/// One triangulation pass over a prepared [`PointStore`]. Owns every arena it
/// touches; nothing survives the call.
pub struct Sweeper<'a> {
    points: &'a PointStore,
    triangles: TriangleStore,
    front: AdvancingFront,
}

/// Neighbors of a just-filled (removed) front node.
struct FillOne {
    prev: NodeId,
    next: NodeId,
}

/// The constraint edge currently being recovered. `q` is the sweep-upper
/// endpoint whose point event triggered the recovery; collinear intermediate
/// points shorten the edge by replacing `q`.
#[derive(Clone, Copy)]
struct ConstrainedEdge {
    p: PointId,
    q: PointId,
    p_pt: Point2,
    q_pt: Point2,
    right: bool,
}

impl ConstrainedEdge {
    fn new(p: PointId, q: PointId, p_pt: Point2, q_pt: Point2) -> Self {
        Self {
            p,
            q,
            p_pt,
            q_pt,
            right: p_pt.x > q_pt.x,
        }
    }

    fn with_q(&self, q: PointId, q_pt: Point2) -> Self {
        Self::new(self.p, q, self.p_pt, q_pt)
    }
}

/// A concave depression in the advancing front, wider than a single fill.
struct Basin {
    left: Point2,
    right: Point2,
    width: f64,
    left_higher: bool,
}

impl Basin {
    fn is_shallow(&self, p: Point2) -> bool {
        let height = if self.left_higher {
            self.left.y - p.y
        } else {
            self.right.y - p.y
        };
        self.width > height
    }

    fn completed(&self, p: Point2) -> bool {
        p.x >= self.right.x || p.x <= self.left.x || self.is_shallow(p)
    }
}

impl<'a> Sweeper<'a> {
    /// Triangulate a finished point store, returning the interior triangles
    /// as CCW point-id triples.
    ///
    /// Requires at least one input point (the caller guards the trivial
    /// cases).
    pub fn run(points: &'a PointStore) -> Result<Vec<[PointId; 3]>, TriangulateError> {
        let first = points.sorted()[0];
        let mut triangles = TriangleStore::with_capacity(points.input_len() * 2);
        let seed = triangles.insert(Triangle::new(first, points.tail(), points.head()));
        let front = AdvancingFront::new(
            (points.tail(), points.point(points.tail()).x),
            (first, points.point(first).x),
            (points.head(), points.point(points.head()).x),
            seed,
        );

        let mut sweeper = Sweeper {
            points,
            triangles,
            front,
        };
        sweeper.sweep()?;
        sweeper.finalize()
    }

    fn sweep(&mut self) -> Result<(), TriangulateError> {
        let points = self.points;
        for &pid in &points.sorted()[1..] {
            self.point_event(pid)?;
            for &lower in points.edges_of(pid) {
                self.edge_event(lower, pid)?;
            }
        }
        Ok(())
    }

    #[inline]
    fn pt(&self, id: PointId) -> Point2 {
        self.points.point(id)
    }

    #[inline]
    fn node_pt(&self, id: NodeId) -> Point2 {
        self.points.point(self.front.node(id).point)
    }

    // ---- point events ------------------------------------------------------

    fn point_event(&mut self, pid: PointId) -> Result<(), TriangulateError> {
        let p = self.pt(pid);
        let node_id = self
            .front
            .locate_node(p.x)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        let node = *self.front.node(node_id);
        let next_id = self
            .front
            .next(node_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        let next_point = self.front.node(next_id).point;
        if node.triangle.is_none() {
            return Err(TriangulateError::AdvancingFrontCorrupted);
        }

        let tri = self
            .triangles
            .insert(Triangle::new(pid, node.point, next_point));
        self.triangles.mark_neighbor(tri, node.triangle);
        let new_node = self.front.insert_after(node_id, pid, p.x, TriangleId::NONE);

        if !self.legalize(tri, 0)? {
            self.map_triangle_to_nodes(tri);
        }

        // p at or left of the located node means it fell below the front edge
        if p.x <= node.x + EPS {
            self.fill_one(node_id)?;
        }

        self.fill_advancing_front(new_node)?;
        Ok(())
    }

    /// Close the single-triangle gap at `node_id`: one triangle from its two
    /// front neighbors, then drop the node from the front.
    fn fill_one(&mut self, node_id: NodeId) -> Result<Option<FillOne>, TriangulateError> {
        let Some(prev_id) = self.front.prev(node_id) else {
            return Ok(None);
        };
        let Some(next_id) = self.front.next(node_id) else {
            return Ok(None);
        };
        let prev = *self.front.node(prev_id);
        let node = *self.front.node(node_id);
        let next = *self.front.node(next_id);

        let tri = self
            .triangles
            .insert(Triangle::new(prev.point, node.point, next.point));
        self.triangles.mark_neighbor(tri, prev.triangle);
        self.triangles.mark_neighbor(tri, node.triangle);

        self.front.set_triangle(prev_id, tri);
        self.front.remove(node_id);

        if !self.legalize(tri, 0)? {
            self.map_triangle_to_nodes(tri);
        }

        Ok(Some(FillOne {
            prev: prev_id,
            next: next_id,
        }))
    }

    fn fill_advancing_front(&mut self, new_node: NodeId) -> Result<(), TriangulateError> {
        // fill right holes
        while let Some(next_id) = self.front.next(new_node) {
            if self.front.next(next_id).is_none() {
                break;
            }
            if self.large_hole_dont_fill(next_id) {
                break;
            }
            if self.fill_one(next_id)?.is_none() {
                break;
            }
        }

        // fill left holes
        while let Some(prev_id) = self.front.prev(new_node) {
            if self.front.prev(prev_id).is_none() {
                break;
            }
            if self.large_hole_dont_fill(prev_id) {
                break;
            }
            if self.fill_one(prev_id)?.is_none() {
                break;
            }
        }

        if self.basin_angle_satisfies(new_node) {
            self.fill_basin(new_node)?;
        }
        Ok(())
    }

    /// Hole-angle rule: fill while the angle at the node stays within
    /// (−90°, 90°). A wide angle is still filled when one of the look-ahead
    /// neighbors pulls the hole back into that window, otherwise filling here
    /// would manufacture badly shaped triangles that only get flipped later.
    fn large_hole_dont_fill(&self, node_id: NodeId) -> bool {
        let Some(next_id) = self.front.next(node_id) else {
            return true;
        };
        let Some(prev_id) = self.front.prev(node_id) else {
            return true;
        };
        let node = self.node_pt(node_id);
        let next = self.node_pt(next_id);
        let prev = self.node_pt(prev_id);

        if !FrontAngle::new(node, next, prev).exceeds_90() {
            return false;
        }

        if let Some(nn) = self.front.next(next_id) {
            if FrontAngle::new(node, self.node_pt(nn), prev).within_0_to_90() {
                return false;
            }
        }
        if let Some(pp) = self.front.prev(prev_id) {
            if FrontAngle::new(node, next, self.node_pt(pp)).within_0_to_90() {
                return false;
            }
        }
        true
    }

    // ---- basin fill --------------------------------------------------------

    /// Basin trigger: the chord from the node to its second right neighbor
    /// dips below 135°, i.e. its slope is steeper than tan(3π/4) = −1.
    fn basin_angle_satisfies(&self, node_id: NodeId) -> bool {
        let Some(next) = self.front.next(node_id) else {
            return false;
        };
        let Some(next_next) = self.front.next(next) else {
            return false;
        };
        let a = self.node_pt(node_id);
        let b = self.node_pt(next_next);
        let ax = a.x - b.x;
        let ay = a.y - b.y;
        if ax > 0.0 { ay < -ax } else { ay > -ax }
    }

    fn fill_basin(&mut self, node_id: NodeId) -> Result<(), TriangulateError> {
        let Some(next_id) = self.front.next(node_id) else {
            return Ok(());
        };
        let Some(next_next_id) = self.front.next(next_id) else {
            return Ok(());
        };

        // left rim: the higher of the two right neighbors by orientation
        let left_id = if orient2d(
            self.node_pt(node_id),
            self.node_pt(next_id),
            self.node_pt(next_next_id),
        )
        .is_ccw()
        {
            next_next_id
        } else {
            next_id
        };

        // bottom: first local y-minimum scanning right from the left rim
        let mut bottom_id = left_id;
        while let Some(n) = self.front.next(bottom_id) {
            if self.node_pt(bottom_id).y >= self.node_pt(n).y {
                bottom_id = n;
            } else {
                break;
            }
        }
        if bottom_id == left_id {
            return Ok(());
        }

        // right rim: first node where y increases again
        let mut right_id = bottom_id;
        while let Some(n) = self.front.next(right_id) {
            if self.node_pt(right_id).y < self.node_pt(n).y {
                right_id = n;
            } else {
                break;
            }
        }
        if right_id == bottom_id {
            return Ok(());
        }

        let left = self.node_pt(left_id);
        let right = self.node_pt(right_id);
        let basin = Basin {
            left,
            right,
            width: right.x - left.x,
            left_higher: left.y > right.y,
        };

        let mut cur = bottom_id;
        loop {
            let cur_pt = self.node_pt(cur);
            if basin.completed(cur_pt) {
                return Ok(());
            }
            let Some(fill) = self.fill_one(cur)? else {
                return Ok(());
            };
            let prev_pt = self.node_pt(fill.prev);
            let next_pt = self.node_pt(fill.next);
            if prev_pt == basin.left && next_pt == basin.right {
                return Ok(());
            }

            // walk toward whichever rim is not yet reached, bailing on a
            // non-convex turn
            cur = if prev_pt == basin.left {
                let Some(nn) = self.front.next(fill.next) else {
                    return Ok(());
                };
                if orient2d(cur_pt, next_pt, self.node_pt(nn)).is_cw() {
                    return Ok(());
                }
                fill.next
            } else if next_pt == basin.right {
                let Some(pp) = self.front.prev(fill.prev) else {
                    return Ok(());
                };
                if orient2d(cur_pt, prev_pt, self.node_pt(pp)).is_ccw() {
                    return Ok(());
                }
                fill.prev
            } else if prev_pt.y < next_pt.y {
                fill.prev
            } else {
                fill.next
            };
        }
    }

    // ---- legalization ------------------------------------------------------

    /// Restore the local Delaunay property at `t_id`. Returns `true` iff a
    /// flip happened; the flip recursion handles front rebinding itself, so
    /// the caller only remaps when nothing flipped.
    fn legalize(&mut self, t_id: TriangleId, depth: usize) -> Result<bool, TriangulateError> {
        if depth > MAX_FLIP_DEPTH {
            return Err(TriangulateError::AdvancingFrontCorrupted);
        }
        for i in 0..3 {
            let t = *self.triangles.get(t_id);
            if t.delaunay[i] {
                continue;
            }
            let ot_id = t.neighbors[i];
            if ot_id.is_none() {
                continue;
            }
            let ot = *self.triangles.get(ot_id);
            let p = t.points[i];
            let op = ot.opposite_point(&t, p);
            let oi = ot
                .point_index(op)
                .ok_or(TriangulateError::AdvancingFrontCorrupted)?;

            // a constrained or already-verified edge never flips; carry the
            // constraint flag over to this side
            if ot.constrained[oi] || ot.delaunay[oi] {
                self.triangles.get_mut(t_id).constrained[i] = ot.constrained[oi];
                continue;
            }

            let inside = in_circle(
                self.pt(p),
                self.pt(t.point_ccw(p)),
                self.pt(t.point_cw(p)),
                self.pt(op),
            );
            if inside {
                // mark the shared edge resolved for the duration of the
                // cascade; the slot survives the rotation in place
                self.triangles.get_mut(t_id).delaunay[i] = true;
                self.triangles.get_mut(ot_id).delaunay[oi] = true;

                self.rotate_triangle_pair(t_id, p, ot_id, op);

                if !self.legalize(t_id, depth + 1)? {
                    self.map_triangle_to_nodes(t_id);
                }
                if !self.legalize(ot_id, depth + 1)? {
                    self.map_triangle_to_nodes(ot_id);
                }

                self.triangles.get_mut(t_id).delaunay[i] = false;
                self.triangles.get_mut(ot_id).delaunay[oi] = false;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Replace the diagonal shared by `t` and `ot` with the other diagonal of
    /// their quadrilateral, remapping the six outer neighbor links and edge
    /// flags to their rotated positions.
    fn rotate_triangle_pair(&mut self, t_id: TriangleId, p: PointId, ot_id: TriangleId, op: PointId) {
        let t = *self.triangles.get(t_id);
        let ot = *self.triangles.get(ot_id);

        let n1 = t.neighbor_ccw(p);
        let n2 = t.neighbor_cw(p);
        let n3 = ot.neighbor_ccw(op);
        let n4 = ot.neighbor_cw(op);

        let ce1 = t.constrained_ccw(p);
        let ce2 = t.constrained_cw(p);
        let ce3 = ot.constrained_ccw(op);
        let ce4 = ot.constrained_cw(op);

        let de1 = t.delaunay_ccw(p);
        let de2 = t.delaunay_cw(p);
        let de3 = ot.delaunay_ccw(op);
        let de4 = ot.delaunay_cw(op);

        let mut rt = t;
        let mut rot = ot;
        rt.rotate_cw(p, op);
        rot.rotate_cw(op, p);

        rot.set_delaunay_ccw(p, de1);
        rt.set_delaunay_cw(p, de2);
        rt.set_delaunay_ccw(op, de3);
        rot.set_delaunay_cw(op, de4);

        rot.set_constrained_ccw(p, ce1);
        rt.set_constrained_cw(p, ce2);
        rt.set_constrained_ccw(op, ce3);
        rot.set_constrained_cw(op, ce4);

        rt.neighbors = [TriangleId::NONE; 3];
        rot.neighbors = [TriangleId::NONE; 3];
        *self.triangles.get_mut(t_id) = rt;
        *self.triangles.get_mut(ot_id) = rot;

        if !n1.is_none() {
            self.triangles.mark_neighbor(ot_id, n1);
        }
        if !n2.is_none() {
            self.triangles.mark_neighbor(t_id, n2);
        }
        if !n3.is_none() {
            self.triangles.mark_neighbor(t_id, n3);
        }
        if !n4.is_none() {
            self.triangles.mark_neighbor(ot_id, n4);
        }
        self.triangles.mark_neighbor(t_id, ot_id);
    }

    /// Rebind front nodes to `t_id` along its exposed (neighborless) edges.
    fn map_triangle_to_nodes(&mut self, t_id: TriangleId) {
        let t = *self.triangles.get(t_id);
        for i in 0..3 {
            if t.neighbors[i].is_none() {
                let exposed = t.point_cw(t.points[i]);
                let px = self.pt(exposed).x;
                if let Some(node) = self.front.locate_point_node(px, exposed) {
                    self.front.set_triangle(node, t_id);
                }
            }
        }
    }

    // ---- edge events -------------------------------------------------------

    fn edge_event(&mut self, lower: PointId, upper: PointId) -> Result<(), TriangulateError> {
        let edge = ConstrainedEdge::new(lower, upper, self.pt(lower), self.pt(upper));

        let node_id = self
            .front
            .locate_point_node(edge.q_pt.x, upper)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        let tri = self.front.node(node_id).triangle;
        if tri.is_none() {
            return Err(TriangulateError::AdvancingFrontCorrupted);
        }
        if self.try_mark_edge(lower, upper, tri) {
            return Ok(());
        }

        // patch the front so it no longer straddles the segment
        self.fill_edge_event(&edge, node_id)?;

        // the node's triangle may have changed during the fills
        let tri = self.front.node(node_id).triangle;
        if tri.is_none() {
            return Err(TriangulateError::AdvancingFrontCorrupted);
        }
        self.edge_event_process(lower, upper, &edge, tri, upper, 0)
    }

    /// If `p`–`q` already is a triangle edge here, mark it constrained on
    /// both adjacent triangles.
    fn try_mark_edge(&mut self, p: PointId, q: PointId, t_id: TriangleId) -> bool {
        let t = *self.triangles.get(t_id);
        let Some(i) = t.edge_index(p, q) else {
            return false;
        };
        self.triangles.get_mut(t_id).constrained[i] = true;
        let n = t.neighbors[i];
        if !n.is_none() {
            self.triangles.get_mut(n).set_constrained_edge(p, q);
        }
        true
    }

    fn fill_edge_event(
        &mut self,
        edge: &ConstrainedEdge,
        node_id: NodeId,
    ) -> Result<(), TriangulateError> {
        if edge.right {
            self.fill_right_above_edge_event(edge, node_id)
        } else {
            self.fill_left_above_edge_event(edge, node_id)
        }
    }

    fn fill_right_above_edge_event(
        &mut self,
        edge: &ConstrainedEdge,
        mut node_id: NodeId,
    ) -> Result<(), TriangulateError> {
        while let Some(next_id) = self.front.next(node_id) {
            if self.node_pt(next_id).x >= edge.p_pt.x {
                break;
            }
            if orient2d(edge.q_pt, self.node_pt(next_id), edge.p_pt).is_ccw() {
                // next node is below the constraint
                self.fill_right_below_edge_event(edge, node_id)?;
            } else {
                node_id = next_id;
            }
        }
        Ok(())
    }

    fn fill_right_below_edge_event(
        &mut self,
        edge: &ConstrainedEdge,
        node_id: NodeId,
    ) -> Result<(), TriangulateError> {
        if self.node_pt(node_id).x >= edge.p_pt.x {
            return Ok(());
        }
        let next_id = self
            .front
            .next(node_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        let next_next_id = self
            .front
            .next(next_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;

        if orient2d(
            self.node_pt(node_id),
            self.node_pt(next_id),
            self.node_pt(next_next_id),
        )
        .is_ccw()
        {
            self.fill_right_concave_edge_event(edge, node_id)
        } else if self.fill_right_convex_edge_event(edge, node_id)? {
            // the convex fill changed the front; retry this node
            self.fill_right_below_edge_event(edge, node_id)
        } else {
            Ok(())
        }
    }

    fn fill_right_concave_edge_event(
        &mut self,
        edge: &ConstrainedEdge,
        node_id: NodeId,
    ) -> Result<(), TriangulateError> {
        let next_id = self
            .front
            .next(node_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        if self.fill_one(next_id)?.is_none() {
            return Ok(());
        }

        let new_next = self
            .front
            .next(node_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        if self.front.node(new_next).point != edge.p
            && orient2d(edge.q_pt, self.node_pt(new_next), edge.p_pt).is_ccw()
        {
            // still below the edge; keep going while the turn stays concave
            let nn = self
                .front
                .next(new_next)
                .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
            if orient2d(
                self.node_pt(node_id),
                self.node_pt(new_next),
                self.node_pt(nn),
            )
            .is_ccw()
            {
                self.fill_right_concave_edge_event(edge, node_id)?;
            }
        }
        Ok(())
    }

    /// Returns `true` when the front changed.
    fn fill_right_convex_edge_event(
        &mut self,
        edge: &ConstrainedEdge,
        node_id: NodeId,
    ) -> Result<bool, TriangulateError> {
        let next_id = self
            .front
            .next(node_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        let next_next_id = self
            .front
            .next(next_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        let Some(next_next_next_id) = self.front.next(next_next_id) else {
            return Ok(false);
        };

        if orient2d(
            self.node_pt(next_id),
            self.node_pt(next_next_id),
            self.node_pt(next_next_next_id),
        )
        .is_ccw()
        {
            self.fill_right_concave_edge_event(edge, next_id)?;
            Ok(true)
        } else if orient2d(edge.q_pt, self.node_pt(next_next_id), edge.p_pt).is_ccw() {
            // below: keep scanning convex stretches
            self.fill_right_convex_edge_event(edge, next_id)
        } else {
            // above
            Ok(false)
        }
    }

    fn fill_left_above_edge_event(
        &mut self,
        edge: &ConstrainedEdge,
        mut node_id: NodeId,
    ) -> Result<(), TriangulateError> {
        while let Some(prev_id) = self.front.prev(node_id) {
            if self.node_pt(prev_id).x <= edge.p_pt.x {
                break;
            }
            if orient2d(edge.q_pt, self.node_pt(prev_id), edge.p_pt).is_cw() {
                self.fill_left_below_edge_event(edge, node_id)?;
            } else {
                node_id = prev_id;
            }
        }
        Ok(())
    }

    fn fill_left_below_edge_event(
        &mut self,
        edge: &ConstrainedEdge,
        node_id: NodeId,
    ) -> Result<(), TriangulateError> {
        if self.node_pt(node_id).x <= edge.p_pt.x {
            return Ok(());
        }
        let prev_id = self
            .front
            .prev(node_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        let prev_prev_id = self
            .front
            .prev(prev_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;

        if orient2d(
            self.node_pt(node_id),
            self.node_pt(prev_id),
            self.node_pt(prev_prev_id),
        )
        .is_cw()
        {
            self.fill_left_concave_edge_event(edge, node_id)
        } else if self.fill_left_convex_edge_event(edge, node_id)? {
            self.fill_left_below_edge_event(edge, node_id)
        } else {
            Ok(())
        }
    }

    fn fill_left_concave_edge_event(
        &mut self,
        edge: &ConstrainedEdge,
        node_id: NodeId,
    ) -> Result<(), TriangulateError> {
        let prev_id = self
            .front
            .prev(node_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        if self.fill_one(prev_id)?.is_none() {
            return Ok(());
        }

        let new_prev = self
            .front
            .prev(node_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        if self.front.node(new_prev).point != edge.p
            && orient2d(edge.q_pt, self.node_pt(new_prev), edge.p_pt).is_cw()
        {
            let pp = self
                .front
                .prev(new_prev)
                .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
            if orient2d(
                self.node_pt(node_id),
                self.node_pt(new_prev),
                self.node_pt(pp),
            )
            .is_cw()
            {
                self.fill_left_concave_edge_event(edge, node_id)?;
            }
        }
        Ok(())
    }

    /// Returns `true` when the front changed.
    fn fill_left_convex_edge_event(
        &mut self,
        edge: &ConstrainedEdge,
        node_id: NodeId,
    ) -> Result<bool, TriangulateError> {
        let prev_id = self
            .front
            .prev(node_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        let prev_prev_id = self
            .front
            .prev(prev_id)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        let Some(prev_prev_prev_id) = self.front.prev(prev_prev_id) else {
            return Ok(false);
        };

        if orient2d(
            self.node_pt(prev_id),
            self.node_pt(prev_prev_id),
            self.node_pt(prev_prev_prev_id),
        )
        .is_cw()
        {
            self.fill_left_concave_edge_event(edge, prev_id)?;
            Ok(true)
        } else if orient2d(edge.q_pt, self.node_pt(prev_prev_id), edge.p_pt).is_cw() {
            self.fill_left_convex_edge_event(edge, prev_id)
        } else {
            Ok(false)
        }
    }

    // ---- flip recovery -----------------------------------------------------

    /// Walk the triangles crossed by the constraint `edge`, flipping until it
    /// materializes as an exact triangle edge.
    fn edge_event_process(
        &mut self,
        ep: PointId,
        eq: PointId,
        edge: &ConstrainedEdge,
        t_id: TriangleId,
        p: PointId,
        depth: usize,
    ) -> Result<(), TriangulateError> {
        if depth > MAX_FLIP_DEPTH {
            return Err(TriangulateError::AdvancingFrontCorrupted);
        }
        if t_id.is_none() {
            return Err(TriangulateError::MissingNeighborTriangle);
        }
        if self.try_mark_edge(ep, eq, t_id) {
            return Ok(());
        }

        let t = *self.triangles.get(t_id);

        let p1 = t.point_ccw(p);
        let o1 = orient2d(self.pt(eq), self.pt(p1), self.pt(ep));
        if o1.is_collinear() {
            // an input point lies exactly on the constraint; constrain the
            // touched sub-edge and continue with the shortened segment
            if t.edge_index(eq, p1).is_none() {
                return Err(TriangulateError::MissingNeighborTriangle);
            }
            self.triangles.get_mut(t_id).set_constrained_edge(eq, p1);
            let neighbor = self.triangles.get(t_id).neighbor_across(p);
            let sub = edge.with_q(p1, self.pt(p1));
            return self.edge_event_process(ep, p1, &sub, neighbor, p1, depth + 1);
        }

        let p2 = t.point_cw(p);
        let o2 = orient2d(self.pt(eq), self.pt(p2), self.pt(ep));
        if o2.is_collinear() {
            if t.edge_index(eq, p2).is_none() {
                return Err(TriangulateError::MissingNeighborTriangle);
            }
            self.triangles.get_mut(t_id).set_constrained_edge(eq, p2);
            let neighbor = self.triangles.get(t_id).neighbor_across(p);
            let sub = edge.with_q(p2, self.pt(p2));
            return self.edge_event_process(ep, p2, &sub, neighbor, p2, depth + 1);
        }

        if o1 == o2 {
            // both corners on the same side: the segment exits across the
            // far edge; rotate toward the triangle that actually crosses it
            let next = if o1.is_cw() {
                t.neighbor_ccw(p)
            } else {
                t.neighbor_cw(p)
            };
            self.edge_event_process(ep, eq, edge, next, p, depth + 1)
        } else {
            self.flip_edge_event(ep, eq, edge, t_id, p, depth + 1)
        }
    }

    fn flip_edge_event(
        &mut self,
        ep: PointId,
        eq: PointId,
        edge: &ConstrainedEdge,
        t_id: TriangleId,
        p: PointId,
        depth: usize,
    ) -> Result<(), TriangulateError> {
        if depth > MAX_FLIP_DEPTH {
            return Err(TriangulateError::AdvancingFrontCorrupted);
        }
        let t = *self.triangles.get(t_id);
        let ot_id = t.neighbor_across(p);
        if ot_id.is_none() {
            return Err(TriangulateError::MissingNeighborTriangle);
        }
        let ot = *self.triangles.get(ot_id);
        let op = ot.opposite_point(&t, p);

        if in_scan_area(
            self.pt(p),
            self.pt(t.point_ccw(p)),
            self.pt(t.point_cw(p)),
            self.pt(op),
        ) {
            // the quadrilateral is convex around the segment: flip
            self.rotate_triangle_pair(t_id, p, ot_id, op);
            self.map_triangle_to_nodes(t_id);
            self.map_triangle_to_nodes(ot_id);

            if p == eq && op == ep {
                if eq == edge.q && ep == edge.p {
                    self.triangles.get_mut(t_id).set_constrained_edge(ep, eq);
                    self.triangles.get_mut(ot_id).set_constrained_edge(ep, eq);
                    self.legalize(t_id, 0)?;
                    self.legalize(ot_id, 0)?;
                }
                Ok(())
            } else {
                let o = orient2d(self.pt(eq), self.pt(op), self.pt(ep));
                let next_t = self.next_flip_triangle(o, t_id, ot_id, p, op)?;
                self.flip_edge_event(ep, eq, edge, next_t, p, depth + 1)
            }
        } else {
            // not flippable yet: scan ahead for the next crossed triangle
            let new_p = self.next_flip_point(ep, eq, ot_id, op)?;
            self.flip_scan_edge_event(ep, eq, edge, t_id, ot_id, new_p, depth + 1)?;
            self.edge_event_process(ep, eq, edge, t_id, p, depth + 1)
        }
    }

    /// After a flip, one of the pair no longer crosses the segment: settle it
    /// with a legalization pass and keep recovering through the other.
    fn next_flip_triangle(
        &mut self,
        o: Orientation,
        t_id: TriangleId,
        ot_id: TriangleId,
        p: PointId,
        op: PointId,
    ) -> Result<TriangleId, TriangulateError> {
        let (keep, done) = if o.is_ccw() {
            (t_id, ot_id)
        } else {
            (ot_id, t_id)
        };
        let i = self
            .triangles
            .get(done)
            .edge_index(p, op)
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        self.triangles.get_mut(done).delaunay[i] = true;
        self.legalize(done, 0)?;
        self.triangles.get_mut(done).clear_delaunay();
        Ok(keep)
    }

    fn next_flip_point(
        &self,
        ep: PointId,
        eq: PointId,
        ot_id: TriangleId,
        op: PointId,
    ) -> Result<PointId, TriangulateError> {
        let ot = self.triangles.get(ot_id);
        match orient2d(self.pt(eq), self.pt(op), self.pt(ep)) {
            Orientation::Cw => Ok(ot.point_ccw(op)),
            Orientation::Ccw => Ok(ot.point_cw(op)),
            // the opposing point sits exactly on the constraint
            Orientation::Collinear => Err(TriangulateError::MissingNeighborTriangle),
        }
    }

    fn flip_scan_edge_event(
        &mut self,
        ep: PointId,
        eq: PointId,
        edge: &ConstrainedEdge,
        flip_t: TriangleId,
        t_id: TriangleId,
        p: PointId,
        depth: usize,
    ) -> Result<(), TriangulateError> {
        if depth > MAX_FLIP_DEPTH {
            return Err(TriangulateError::AdvancingFrontCorrupted);
        }
        let t = *self.triangles.get(t_id);
        let ot_id = t.neighbor_across(p);
        if ot_id.is_none() {
            return Err(TriangulateError::MissingNeighborTriangle);
        }
        let op = self.triangles.get(ot_id).opposite_point(&t, p);
        let ft = *self.triangles.get(flip_t);

        if in_scan_area(
            self.pt(eq),
            self.pt(ft.point_ccw(eq)),
            self.pt(ft.point_cw(eq)),
            self.pt(op),
        ) {
            self.flip_edge_event(eq, op, edge, ot_id, op, depth + 1)
        } else {
            let new_p = self.next_flip_point(ep, eq, ot_id, op)?;
            self.flip_scan_edge_event(ep, eq, edge, flip_t, ot_id, new_p, depth + 1)
        }
    }

    // ---- finalization ------------------------------------------------------

    /// Select the interior triangle set: walk from the first real front node
    /// to a triangle fenced by a constrained edge, then flood-fill across
    /// non-constrained edges. Everything unmarked (sentinel fans, holes) is
    /// discarded.
    fn finalize(mut self) -> Result<Vec<[PointId; 3]>, TriangulateError> {
        let node_id = self
            .front
            .next(self.front.first())
            .ok_or(TriangulateError::AdvancingFrontCorrupted)?;
        let node = *self.front.node(node_id);
        let p = node.point;

        let mut t_id = node.triangle;
        let mut steps = 0usize;
        while !t_id.is_none() {
            let t = self.triangles.get(t_id);
            if t.point_index(p).is_none() {
                return Err(TriangulateError::AdvancingFrontCorrupted);
            }
            if t.constrained_cw(p) {
                break;
            }
            t_id = t.neighbor_ccw(p);
            steps += 1;
            if steps > self.triangles.len() {
                return Err(TriangulateError::AdvancingFrontCorrupted);
            }
        }

        let mut result = Vec::with_capacity(self.points.input_len());
        if !t_id.is_none() {
            let mut stack = vec![t_id];
            while let Some(tid) = stack.pop() {
                if tid.is_none() {
                    continue;
                }
                let t = self.triangles.get_mut(tid);
                if t.interior {
                    continue;
                }
                t.interior = true;
                result.push(tid);
                let t = *self.triangles.get(tid);
                for i in 0..3 {
                    if !t.constrained[i] {
                        stack.push(t.neighbors[i]);
                    }
                }
            }
        }

        let mut out = Vec::with_capacity(result.len());
        for tid in result {
            let t = self.triangles.get(tid);
            // a sentinel in the selected set means the constraint loops did
            // not seal the interior (crossing or open input)
            if t.points.iter().any(|&q| self.points.is_sentinel(q)) {
                return Err(TriangulateError::MissingNeighborTriangle);
            }
            out.push(t.points);
        }
        Ok(out)
    }
}
