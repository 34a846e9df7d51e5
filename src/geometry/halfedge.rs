// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Half-edge connectivity entities
//! Each edge of the mesh is represented by two oppositely directed half-edges;
//! faces and boundary loops are closed `next` cycles over them.

use super::Mesh;
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// One directed side of an edge.
///
/// All structural references are indices into the arenas of the owning
/// [`Mesh`]; no half-edge owns its neighbors. `vertex` is the tail of the
/// half-edge. `face` indexes `mesh.faces` for interior half-edges and
/// `mesh.boundaries` when `on_boundary` is set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HalfEdge {
    /// Next half-edge in the same face loop
    pub next: usize,
    /// Oppositely directed half-edge of the same edge
    pub flip: usize,
    /// Tail vertex
    pub vertex: usize,
    /// Owning edge
    pub edge: usize,
    /// Owning face or boundary loop (see `on_boundary`)
    pub face: usize,
    /// Per-corner texture coordinate
    pub uv: Vector2<f64>,
    /// Per-corner shading normal
    pub normal: Vector3<f64>,
    /// True when this half-edge belongs to a boundary loop
    pub on_boundary: bool,
}

/// Edge handle owning one representative half-edge of its pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub half_edge: usize,
}

impl Edge {
    pub fn new(half_edge: usize) -> Self {
        Self { half_edge }
    }

    /// Euclidean distance between the edge's two endpoint vertices,
    /// read through the representative half-edge and its flip.
    pub fn length(&self, mesh: &Mesh) -> f64 {
        let he = &mesh.half_edges[self.half_edge];
        let a = mesh.vertices[he.vertex].position;
        let b = mesh.vertices[mesh.half_edges[he.flip].vertex].position;

        (b - a).norm()
    }
}

/// Face handle owning one half-edge of its boundary loop
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Face {
    pub half_edge: usize,
}

impl Face {
    pub fn new(half_edge: usize) -> Self {
        Self { half_edge }
    }

    /// True when this face is a boundary loop (a hole with no interior)
    pub fn is_boundary(&self, mesh: &Mesh) -> bool {
        mesh.half_edges[self.half_edge].on_boundary
    }

    /// Face normal from the first three loop vertices.
    ///
    /// Not normalized: the magnitude is twice the area of a planar
    /// triangle. Consumers needing a unit normal normalize explicitly.
    pub fn normal(&self, mesh: &Mesh) -> Vector3<f64> {
        let he = &mesh.half_edges[self.half_edge];
        let next = &mesh.half_edges[he.next];
        let next_next = &mesh.half_edges[next.next];

        let a = mesh.vertices[he.vertex].position;
        let b = mesh.vertices[next.vertex].position;
        let c = mesh.vertices[next_next.vertex].position;

        let v1 = a - b;
        let v2 = c - b;

        v1.cross(&v2)
    }

    /// Face area: zero for boundary loops, otherwise half the magnitude of
    /// the face normal. Exact for planar triangles only; general polygons
    /// must be triangulated by the caller.
    pub fn area(&self, mesh: &Mesh) -> f64 {
        if self.is_boundary(mesh) {
            return 0.0;
        }

        0.5 * self.normal(mesh).norm()
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::Mesh;
    use nalgebra::{Point3, Vector3};

    fn triangle_mesh() -> Mesh {
        // Winding chosen so the face normal points along +z
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        Mesh::from_polygons(&positions, &[vec![0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_face_normal_and_area() {
        let mesh = triangle_mesh();
        let face = mesh.faces[0];

        assert_eq!(face.normal(&mesh), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(face.area(&mesh), 0.5);
        assert!(!face.is_boundary(&mesh));
    }

    #[test]
    fn test_boundary_loop_has_no_area() {
        let mesh = triangle_mesh();
        assert_eq!(mesh.boundaries.len(), 1);

        let hole = mesh.boundaries[0];
        assert!(hole.is_boundary(&mesh));
        assert_eq!(hole.area(&mesh), 0.0);
    }

    #[test]
    fn test_edge_length() {
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let mesh = Mesh::from_polygons(&positions, &[vec![0, 1, 2]]).unwrap();

        let lengths: Vec<f64> = mesh.edges.iter().map(|e| e.length(&mesh)).collect();
        assert!(lengths.iter().any(|&len| (len - 5.0).abs() < 1e-12));
    }
}
