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

use std::cell::Cell;

use crate::sweep::points::PointId;
use crate::sweep::triangles::TriangleId;

/// Index of a node in the advancing front's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    fn is_none(self) -> bool {
        self == NodeId::NONE
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One frontier node: a currently-exposed boundary point and the triangle
/// hanging below it (the triangle whose top edge runs from this node to the
/// next one). The rightmost node carries no triangle.
#[derive(Debug, Clone, Copy)]
pub struct FrontNode {
    pub point: PointId,
    pub x: f64,
    pub triangle: TriangleId,
    prev: NodeId,
    next: NodeId,
    live: bool,
}

/// The advancing front: a strictly x-increasing doubly linked chain of nodes
/// from the left sentinel to the right sentinel, bounding the triangulated
/// region from above at all times.
///
/// Nodes live in an append-only arena; removal unlinks and tombstones them.
/// Searches start from a cached hint node (interior-mutable so lookups stay
/// `&self`), which in practice sits next to the query most of the time.
pub struct AdvancingFront {
    nodes: Vec<FrontNode>,
    first: NodeId,
    hint: Cell<NodeId>,
}

impl AdvancingFront {
    /// Build the initial three-node front `tail, mid, head`. The left two
    /// nodes reference the seed triangle.
    pub fn new(
        tail: (PointId, f64),
        mid: (PointId, f64),
        head: (PointId, f64),
        seed: TriangleId,
    ) -> Self {
        let nodes = vec![
            FrontNode {
                point: tail.0,
                x: tail.1,
                triangle: seed,
                prev: NodeId::NONE,
                next: NodeId(1),
                live: true,
            },
            FrontNode {
                point: mid.0,
                x: mid.1,
                triangle: seed,
                prev: NodeId(0),
                next: NodeId(2),
                live: true,
            },
            FrontNode {
                point: head.0,
                x: head.1,
                triangle: TriangleId::NONE,
                prev: NodeId(1),
                next: NodeId::NONE,
                live: true,
            },
        ];
        Self {
            nodes,
            first: NodeId(0),
            hint: Cell::new(NodeId(1)),
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &FrontNode {
        debug_assert!(self.nodes[id.index()].live, "access to removed node");
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn first(&self) -> NodeId {
        self.first
    }

    #[inline]
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        let p = self.nodes[id.index()].prev;
        (!p.is_none()).then_some(p)
    }

    #[inline]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        let n = self.nodes[id.index()].next;
        (!n.is_none()).then_some(n)
    }

    #[inline]
    pub fn set_triangle(&mut self, id: NodeId, t: TriangleId) {
        self.nodes[id.index()].triangle = t;
    }

    /// Find the node whose span `[node.x, next.x)` contains `x`, walking from
    /// the cached hint. Returns `None` only when `x` falls outside the
    /// sentinel-bounded front, which is an invariant violation upstream.
    pub fn locate_node(&self, x: f64) -> Option<NodeId> {
        let mut id = self.hint.get();
        if x < self.nodes[id.index()].x {
            while let Some(prev) = self.prev(id) {
                id = prev;
                if x >= self.nodes[id.index()].x {
                    self.hint.set(id);
                    return Some(id);
                }
            }
            None
        } else {
            while let Some(next) = self.next(id) {
                if x < self.nodes[next.index()].x {
                    self.hint.set(id);
                    return Some(id);
                }
                id = next;
            }
            None
        }
    }

    /// Find the node holding exactly `point` (whose coordinate is `px`),
    /// scanning outward from the hint. Needed after flips momentarily leave
    /// two nodes at the same x-coordinate, where span search is ambiguous.
    pub fn locate_point_node(&self, px: f64, point: PointId) -> Option<NodeId> {
        let start = self.hint.get();
        if self.nodes[start.index()].point == point {
            return Some(start);
        }

        let mut id = start;
        while let Some(prev) = self.prev(id) {
            if self.nodes[prev.index()].x < px {
                break;
            }
            if self.nodes[prev.index()].point == point {
                self.hint.set(prev);
                return Some(prev);
            }
            id = prev;
        }

        let mut id = start;
        while let Some(next) = self.next(id) {
            if self.nodes[next.index()].x > px {
                break;
            }
            if self.nodes[next.index()].point == point {
                self.hint.set(next);
                return Some(next);
            }
            id = next;
        }

        None
    }

    /// Splice a new node for `point` immediately after `after`.
    pub fn insert_after(
        &mut self,
        after: NodeId,
        point: PointId,
        x: f64,
        triangle: TriangleId,
    ) -> NodeId {
        let next = self.nodes[after.index()].next;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(FrontNode {
            point,
            x,
            triangle,
            prev: after,
            next,
            live: true,
        });
        self.nodes[after.index()].next = id;
        if !next.is_none() {
            self.nodes[next.index()].prev = id;
        }
        self.hint.set(id);
        id
    }

    /// Unlink `id` from the chain. The node's span is now covered by a
    /// triangle; the hint is repositioned if it pointed here.
    pub fn remove(&mut self, id: NodeId) {
        let FrontNode { prev, next, .. } = self.nodes[id.index()];
        if !prev.is_none() {
            self.nodes[prev.index()].next = next;
        }
        if !next.is_none() {
            self.nodes[next.index()].prev = prev;
        }
        self.nodes[id.index()].live = false;
        if self.hint.get() == id {
            self.hint.set(if prev.is_none() { self.first } else { prev });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front() -> AdvancingFront {
        // tail at -3, mid at 0, head at 13
        AdvancingFront::new(
            (PointId(4), -3.0),
            (PointId(0), 0.0),
            (PointId(3), 13.0),
            TriangleId(0),
        )
    }

    #[test]
    fn locate_by_span() {
        let f = front();
        let n = f.locate_node(5.0).unwrap();
        assert_eq!(f.node(n).point, PointId(0));
        let n = f.locate_node(-1.0).unwrap();
        assert_eq!(f.node(n).point, PointId(4));
    }

    #[test]
    fn insert_and_remove_keep_chain_ordered() {
        let mut f = front();
        let mid = f.locate_node(0.0).unwrap();
        let new = f.insert_after(mid, PointId(7), 4.0, TriangleId(1));

        assert_eq!(f.prev(new), Some(mid));
        let right = f.next(new).unwrap();
        assert_eq!(f.node(right).point, PointId(3));

        f.remove(new);
        assert_eq!(f.next(mid), Some(right));
        assert_eq!(f.prev(right), Some(mid));
    }

    #[test]
    fn locate_point_node_by_identity() {
        let mut f = front();
        let mid = f.locate_node(0.0).unwrap();
        // two nodes at the same x, disambiguated by point id
        let n = f.insert_after(mid, PointId(9), 0.0, TriangleId(2));
        assert_eq!(f.locate_point_node(0.0, PointId(0)), Some(mid));
        assert_eq!(f.locate_point_node(0.0, PointId(9)), Some(n));
        assert_eq!(f.locate_point_node(0.0, PointId(5)), None);
    }
}
