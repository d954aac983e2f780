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

//! Constrained Delaunay triangulation of closed polygonal regions.
//!
//! [`triangulate`] takes one or more [`ClosedLoop`]s (typically an outer
//! boundary plus hole loops, in either winding) and returns the triangles
//! covering the region the loops enclose. Every loop segment survives as a
//! triangle edge, and all other edges satisfy the local Delaunay criterion.

mod front;
pub(crate) mod points;
mod sweeper;
mod triangles;

use thiserror::Error;

use crate::geometry::Point2;
use crate::sweep::points::PointStore;
use crate::sweep::sweeper::Sweeper;

/// Failure modes of [`triangulate`]. All of them indicate invalid input
/// rather than an internal resource limit, with the exception of the flip
/// recursion guard, which also reports as [`AdvancingFrontCorrupted`]
/// rather than overflow the stack.
///
/// [`AdvancingFrontCorrupted`]: TriangulateError::AdvancingFrontCorrupted
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TriangulateError {
    /// Two loop vertices coincide (within epsilon), producing a zero-length
    /// constraint segment.
    #[error("duplicate point at ({x}, {y})")]
    DuplicatePoint { x: f64, y: f64 },

    /// The advancing front lost track of a point or node, typically caused
    /// by non-finite coordinates or self-intersecting loops.
    #[error("advancing front corrupted")]
    AdvancingFrontCorrupted,

    /// Constraint recovery walked off the mesh: crossing loops, a vertex
    /// lying on another loop's segment, or an unsealed interior.
    #[error("missing neighbor triangle during edge recovery")]
    MissingNeighborTriangle,
}

/// A closed polygonal loop. The closing segment from the last vertex back to
/// the first is implicit; winding direction does not matter.
#[derive(Debug, Clone)]
pub struct ClosedLoop {
    points: Vec<Point2>,
}

impl ClosedLoop {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn from_coords<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self {
            points: coords.into_iter().map(Point2::from).collect(),
        }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }
}

impl From<Vec<Point2>> for ClosedLoop {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}

/// The output mesh: the input vertices in their original order, plus CCW
/// index triples into them.
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<Point2>,
    triangles: Vec<[u32; 3]>,
}

impl Triangulation {
    /// All input vertices, concatenated across loops in call order. Triangle
    /// indices refer to this slice.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Flat index buffer with every index offset by `base`, ready to append
    /// to an existing vertex buffer.
    pub fn indices(&self, base: u32) -> Vec<u32> {
        self.triangles
            .iter()
            .flat_map(|t| t.iter().map(move |&i| i + base))
            .collect()
    }

    /// Triangle corner positions, resolved.
    pub fn positions(&self) -> impl Iterator<Item = [Point2; 3]> + '_ {
        self.triangles.iter().map(|t| {
            [
                self.points[t[0] as usize],
                self.points[t[1] as usize],
                self.points[t[2] as usize],
            ]
        })
    }

    /// Total signed area of the mesh. Positive, since triangles are CCW.
    pub fn area(&self) -> f64 {
        self.positions()
            .map(|[a, b, c]| 0.5 * ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)))
            .sum()
    }
}

/// Triangulate the region enclosed by `regions`: one outer loop and any
/// number of hole loops. Loops must not cross themselves or each other and
/// must not share vertices.
///
/// Fewer than three vertices in total yields an empty mesh.
pub fn triangulate(regions: &[ClosedLoop]) -> Result<Triangulation, TriangulateError> {
    let total: usize = regions.iter().map(|r| r.points.len()).sum();
    let mut store = PointStore::with_capacity(total);
    let mut all_points = Vec::with_capacity(total);

    for region in regions {
        if region.points.is_empty() {
            continue;
        }
        let mut ids = Vec::with_capacity(region.points.len());
        for &p in &region.points {
            if !p.is_finite() {
                return Err(TriangulateError::AdvancingFrontCorrupted);
            }
            ids.push(store.add_point(p));
            all_points.push(p);
        }
        for i in 0..ids.len() {
            store.add_edge(ids[i], ids[(i + 1) % ids.len()])?;
        }
    }

    if store.input_len() < 3 {
        return Ok(Triangulation {
            points: all_points,
            triangles: Vec::new(),
        });
    }

    store.finish();
    let tris = Sweeper::run(&store)?;

    // input ids precede the sentinels, so they are the caller's indices
    let triangles = tris
        .into_iter()
        .map(|[a, b, c]| [a.0, b.0, c.0])
        .collect();

    Ok(Triangulation {
        points: all_points,
        triangles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_points_yield_empty_mesh() {
        let t = triangulate(&[ClosedLoop::from_coords([(0.0, 0.0), (1.0, 0.0)])])
            .expect("degenerate input is not an error");
        assert!(t.is_empty());
        assert_eq!(t.points().len(), 2);
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let err = triangulate(&[ClosedLoop::from_coords([
            (0.0, 0.0),
            (1.0, f64::NAN),
            (1.0, 1.0),
        ])])
        .unwrap_err();
        assert_eq!(err, TriangulateError::AdvancingFrontCorrupted);
    }

    #[test]
    fn indices_apply_base_offset() {
        let t = triangulate(&[ClosedLoop::from_coords([
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
        ])])
        .unwrap();
        assert_eq!(t.len(), 1);
        let idx = t.indices(100);
        assert_eq!(idx.len(), 3);
        assert!(idx.iter().all(|&i| (100..103).contains(&i)));
    }
}
