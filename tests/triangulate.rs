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

use ahash::{AHashMap, AHashSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sweeptri::{ClosedLoop, Point2, TriangulateError, Triangulation, triangulate};

fn polygon(coords: &[(f64, f64)]) -> ClosedLoop {
    ClosedLoop::from_coords(coords.iter().copied())
}

fn shoelace(coords: &[(f64, f64)]) -> f64 {
    let n = coords.len();
    let mut a = 0.0;
    for i in 0..n {
        let (x0, y0) = coords[i];
        let (x1, y1) = coords[(i + 1) % n];
        a += x0 * y1 - x1 * y0;
    }
    0.5 * a.abs()
}

fn undirected(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// All undirected triangle edges of a mesh.
fn edge_set(t: &Triangulation) -> AHashSet<(u32, u32)> {
    let mut set = AHashSet::new();
    for tri in t.triangles() {
        set.insert(undirected(tri[0], tri[1]));
        set.insert(undirected(tri[1], tri[2]));
        set.insert(undirected(tri[2], tri[0]));
    }
    set
}

/// Every segment of every input loop must survive as a triangle edge.
fn assert_loops_recovered(t: &Triangulation, loops: &[ClosedLoop]) {
    let edges = edge_set(t);
    let mut base = 0u32;
    for l in loops {
        let n = l.points().len() as u32;
        for i in 0..n {
            let a = base + i;
            let b = base + (i + 1) % n;
            assert!(
                edges.contains(&undirected(a, b)),
                "input segment {a}-{b} missing from mesh"
            );
        }
        base += n;
    }
}

fn assert_all_ccw(t: &Triangulation) {
    for [a, b, c] in t.positions() {
        let det = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        assert!(det > 0.0, "triangle not counter-clockwise: {a:?} {b:?} {c:?}");
    }
}

/// `d` strictly inside the circumcircle of CCW triangle a,b,c.
fn strictly_in_circumcircle(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    let adx = a.x - d.x;
    let ady = a.y - d.y;
    let bdx = b.x - d.x;
    let bdy = b.y - d.y;
    let cdx = c.x - d.x;
    let cdy = c.y - d.y;

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdx * cdy - cdx * bdy) - blift * (adx * cdy - cdx * ady)
        + clift * (adx * bdy - bdx * ady);
    det > 1e-7
}

/// Local Delaunay check: across every shared edge that is not an input
/// segment, the opposite vertex must not fall strictly inside the other
/// triangle's circumcircle.
fn assert_locally_delaunay(t: &Triangulation, loops: &[ClosedLoop]) {
    let mut constrained = AHashSet::new();
    let mut base = 0u32;
    for l in loops {
        let n = l.points().len() as u32;
        for i in 0..n {
            constrained.insert(undirected(base + i, base + (i + 1) % n));
        }
        base += n;
    }

    // edge -> opposite vertices of the triangles flanking it
    let mut across: AHashMap<(u32, u32), Vec<u32>> = AHashMap::new();
    for tri in t.triangles() {
        for i in 0..3 {
            let e = undirected(tri[(i + 1) % 3], tri[(i + 2) % 3]);
            across.entry(e).or_default().push(tri[i]);
        }
    }

    let pts = t.points();
    for (&(u, v), opposite) in &across {
        if opposite.len() != 2 || constrained.contains(&(u, v)) {
            continue;
        }
        let a = pts[u as usize];
        let b = pts[v as usize];
        for (x, y) in [(opposite[0], opposite[1]), (opposite[1], opposite[0])] {
            // orient u,v so that u,v,x is CCW
            let ox = pts[x as usize];
            let det = (b.x - a.x) * (ox.y - a.y) - (b.y - a.y) * (ox.x - a.x);
            let (p, q) = if det > 0.0 { (a, b) } else { (b, a) };
            assert!(
                !strictly_in_circumcircle(p, q, ox, pts[y as usize]),
                "edge {u}-{v} violates the Delaunay criterion"
            );
        }
    }
}

/// Number of triangles strictly containing `p`.
fn containment_count(t: &Triangulation, p: Point2) -> usize {
    t.positions()
        .filter(|[a, b, c]| {
            let s0 = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
            let s1 = (c.x - b.x) * (p.y - b.y) - (c.y - b.y) * (p.x - b.x);
            let s2 = (a.x - c.x) * (p.y - c.y) - (a.y - c.y) * (p.x - c.x);
            s0 > 0.0 && s1 > 0.0 && s2 > 0.0
        })
        .count()
}

#[test]
fn lone_triangle() {
    let loops = [polygon(&[(0.0, 0.0), (4.0, 0.0), (1.0, 3.0)])];
    let t = triangulate(&loops).unwrap();
    assert_eq!(t.len(), 1);
    assert_all_ccw(&t);
    assert!((t.area() - 6.0).abs() < 1e-12);
}

#[test]
fn square_splits_into_two() {
    let loops = [polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])];
    let t = triangulate(&loops).unwrap();
    assert_eq!(t.len(), 2);
    assert_all_ccw(&t);
    assert_loops_recovered(&t, &loops);
    assert!((t.area() - 100.0).abs() < 1e-9);
}

#[test]
fn clockwise_winding_is_accepted() {
    let loops = [polygon(&[(0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)])];
    let t = triangulate(&loops).unwrap();
    assert_eq!(t.len(), 2);
    assert!((t.area() - 100.0).abs() < 1e-9);
}

#[test]
fn concave_hexagon() {
    let coords = [(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (2.0, 2.0), (2.0, 4.0), (0.0, 4.0)];
    let loops = [polygon(&coords)];
    let t = triangulate(&loops).unwrap();
    assert_eq!(t.len(), 4);
    assert_all_ccw(&t);
    assert_loops_recovered(&t, &loops);
    assert!((t.area() - shoelace(&coords)).abs() < 1e-9);
    // the notch corner region must stay empty; the interior sample sits off
    // the (0,0)-(2,2) diagonal so the strict containment test counts it
    assert_eq!(containment_count(&t, Point2::new(3.0, 3.0)), 0);
    assert_eq!(containment_count(&t, Point2::new(0.5, 1.0)), 1);
}

#[test]
fn square_with_square_hole() {
    let loops = [
        polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
        polygon(&[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]),
    ];
    let t = triangulate(&loops).unwrap();
    assert_eq!(t.len(), 8);
    assert_all_ccw(&t);
    assert_loops_recovered(&t, &loops);
    assert_locally_delaunay(&t, &loops);
    assert!((t.area() - 96.0).abs() < 1e-9);

    // nothing inside the hole, single coverage outside it
    assert_eq!(containment_count(&t, Point2::new(5.0, 5.0)), 0);
    assert_eq!(containment_count(&t, Point2::new(1.5, 7.5)), 1);
    for [a, b, c] in t.positions() {
        let cx = (a.x + b.x + c.x) / 3.0;
        let cy = (a.y + b.y + c.y) / 3.0;
        assert!(
            !(4.0 < cx && cx < 6.0 && 4.0 < cy && cy < 6.0),
            "triangle centroid ({cx}, {cy}) landed in the hole"
        );
    }
}

#[test]
fn duplicate_vertex_is_reported_with_location() {
    let loops = [polygon(&[(0.0, 0.0), (5.0, 0.0), (5.0, 0.0), (2.0, 4.0)])];
    let err = triangulate(&loops).unwrap_err();
    assert_eq!(err, TriangulateError::DuplicatePoint { x: 5.0, y: 0.0 });
}

#[test]
fn crossing_loops_are_rejected() {
    // the second loop's edges cross the outer boundary, so constraint
    // recovery cannot seal the interior
    let loops = [
        polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
        polygon(&[(5.0, 5.0), (15.0, 5.0), (15.0, 15.0), (5.0, 15.0)]),
    ];
    let err = triangulate(&loops).unwrap_err();
    assert_eq!(err, TriangulateError::MissingNeighborTriangle);
}

#[test]
fn self_intersecting_loop_is_rejected() {
    // bowtie: the closing segments cross each other
    let loops = [polygon(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)])];
    assert!(triangulate(&loops).is_err());
}

#[test]
fn runs_are_deterministic() {
    let loops = [
        polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
        polygon(&[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]),
    ];
    let a = triangulate(&loops).unwrap();
    let b = triangulate(&loops).unwrap();
    assert_eq!(a.triangles(), b.triangles());
}

#[test]
fn vertical_edge_chain() {
    // collinear boundary vertices on a shared vertical edge
    let coords = [(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (4.0, 4.0), (0.0, 4.0)];
    let loops = [polygon(&coords)];
    let t = triangulate(&loops).unwrap();
    assert_eq!(t.len(), 3);
    assert_loops_recovered(&t, &loops);
    assert!((t.area() - 16.0).abs() < 1e-9);
}

#[test]
fn random_star_polygon() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let n = 48;
    let mut angles: Vec<f64> = (0..n)
        .map(|_| rng.random_range(0.0..std::f64::consts::TAU))
        .collect();
    angles.sort_by(|a, b| a.total_cmp(b));
    angles.dedup_by(|a, b| (*a - *b).abs() < 1e-6);

    let coords: Vec<(f64, f64)> = angles
        .iter()
        .map(|&t| {
            let r = rng.random_range(1.0..5.0);
            (r * t.cos(), r * t.sin())
        })
        .collect();

    let loops = [polygon(&coords)];
    let t = triangulate(&loops).unwrap();
    assert_eq!(t.len(), coords.len() - 2);
    assert_all_ccw(&t);
    assert_loops_recovered(&t, &loops);
    assert_locally_delaunay(&t, &loops);
    assert!((t.area() - shoelace(&coords)).abs() < 1e-6 * shoelace(&coords));
    // origin is inside any star-shaped polygon around it
    assert_eq!(containment_count(&t, Point2::new(0.0, 0.0)), 1);
}
