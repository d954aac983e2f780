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

//! Constrained Delaunay triangulation for 2D polygon regions.
//!
//! `sweeptri` turns a set of closed polygon loops (one outer boundary plus any
//! number of holes) into a triangle mesh that covers exactly the polygon
//! interior, contains every input edge verbatim, and is Delaunay-legal across
//! every non-constrained edge. The construction is a sweep-line advancing-front
//! triangulation with recursive constraint-edge recovery; it is a one-shot
//! batch computation with no I/O and no shared state between calls.

pub mod geometry;
pub mod kernel;
pub mod sweep;

pub use geometry::Point2;
pub use sweep::{ClosedLoop, TriangulateError, Triangulation, triangulate};
