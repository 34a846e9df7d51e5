// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh aggregate - arena-owned connectivity and lifecycle operations

use super::{BoundingBox, Edge, Face, HalfEdge};
use crate::utils::math::centroid;
use nalgebra::{Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Placeholder for links that are resolved later during construction.
/// Never present in a mesh returned to callers.
const UNSET: usize = usize::MAX;

/// Errors raised while linking connectivity or transforming a mesh
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("face {face} has {len} vertices, need at least 3")]
    FaceTooSmall { face: usize, len: usize },
    #[error("face {face} references vertex {vertex} out of range")]
    VertexOutOfRange { face: usize, vertex: usize },
    #[error("face {face} repeats vertex {vertex} on consecutive corners")]
    DegenerateCorner { face: usize, vertex: usize },
    #[error("edge ({a}, {b}) is shared by more than two faces or traversed twice in the same direction")]
    NonManifoldEdge { a: usize, b: usize },
    #[error("vertex {0} joins more than one boundary fan")]
    NonManifoldVertex(usize),
    #[error("mesh has no vertices")]
    EmptyMesh,
}

/// Vertex with position, stable index, and an optional home half-edge.
///
/// `half_edge` is `None` exactly when the vertex is isolated; when set,
/// the referenced half-edge's tail is this vertex.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub index: usize,
    pub half_edge: Option<usize>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, index: usize) -> Self {
        Self {
            position,
            index,
            half_edge: None,
        }
    }

    /// True when no half-edge is incident on this vertex
    pub fn is_isolated(&self) -> bool {
        self.half_edge.is_none()
    }
}

/// Polygon mesh owning all connectivity arenas.
///
/// Vertices, half-edges, edges, faces, and boundary loops live in
/// contiguous vectors; every structural reference is an index into them.
/// The arenas are public so callers can iterate the collections directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub half_edges: Vec<HalfEdge>,
    pub edges: Vec<Edge>,
    pub faces: Vec<Face>,
    /// Boundary loops: face-like cycles bounding holes, with no interior
    pub boundaries: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            half_edges: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            boundaries: Vec::new(),
        }
    }

    /// Build full half-edge connectivity from indexed polygon data.
    ///
    /// Every polygon must have at least three corners and consistent
    /// winding; each undirected edge may be shared by at most two faces.
    /// Unpaired half-edges are completed with boundary twins chained into
    /// closed boundary loops. Vertices referenced by no polygon stay
    /// isolated (`half_edge == None`).
    pub fn from_polygons(
        positions: &[Point3<f64>],
        polygons: &[Vec<usize>],
    ) -> Result<Self, MeshError> {
        let mut mesh = Mesh::new();
        mesh.vertices = positions
            .iter()
            .enumerate()
            .map(|(index, p)| Vertex::new(*p, index))
            .collect();

        // (tail, head) -> half-edge, rejects repeated directed edges
        let mut directed: HashMap<(usize, usize), usize> = HashMap::new();
        // canonical (min, max) -> first half-edge seen on that edge
        let mut edge_map: HashMap<(usize, usize), usize> = HashMap::new();

        for (face_idx, polygon) in polygons.iter().enumerate() {
            let n = polygon.len();
            if n < 3 {
                return Err(MeshError::FaceTooSmall { face: face_idx, len: n });
            }

            let base = mesh.half_edges.len();
            for (corner, &vertex) in polygon.iter().enumerate() {
                if vertex >= mesh.vertices.len() {
                    return Err(MeshError::VertexOutOfRange { face: face_idx, vertex });
                }
                mesh.half_edges.push(HalfEdge {
                    next: base + (corner + 1) % n,
                    flip: UNSET,
                    vertex,
                    edge: UNSET,
                    face: face_idx,
                    uv: Vector2::zeros(),
                    normal: Vector3::zeros(),
                    on_boundary: false,
                });
            }
            mesh.faces.push(Face::new(base));

            for corner in 0..n {
                let he = base + corner;
                let tail = polygon[corner];
                let head = polygon[(corner + 1) % n];
                if tail == head {
                    return Err(MeshError::DegenerateCorner { face: face_idx, vertex: tail });
                }
                if directed.insert((tail, head), he).is_some() {
                    return Err(MeshError::NonManifoldEdge { a: tail, b: head });
                }

                let key = (tail.min(head), tail.max(head));
                match edge_map.get(&key).copied() {
                    None => {
                        edge_map.insert(key, he);
                    }
                    Some(other) => {
                        if mesh.half_edges[other].flip != UNSET {
                            return Err(MeshError::NonManifoldEdge { a: key.0, b: key.1 });
                        }
                        let edge = mesh.edges.len();
                        mesh.edges.push(Edge::new(other));
                        mesh.half_edges[he].flip = other;
                        mesh.half_edges[he].edge = edge;
                        mesh.half_edges[other].flip = he;
                        mesh.half_edges[other].edge = edge;
                    }
                }
            }
        }

        mesh.close_boundaries()?;
        mesh.assign_home_half_edges();

        debug!(
            vertices = mesh.vertices.len(),
            half_edges = mesh.half_edges.len(),
            edges = mesh.edges.len(),
            faces = mesh.faces.len(),
            boundary_loops = mesh.boundaries.len(),
            "linked mesh connectivity"
        );

        Ok(mesh)
    }

    /// Pair every flip-less half-edge with a boundary twin and chain the
    /// twins into closed boundary loops.
    fn close_boundaries(&mut self) -> Result<(), MeshError> {
        let interior_count = self.half_edges.len();
        let unpaired: Vec<usize> = (0..interior_count)
            .filter(|&h| self.half_edges[h].flip == UNSET)
            .collect();

        // tail vertex -> outgoing boundary half-edge; a manifold boundary
        // vertex has exactly one
        let mut outgoing: HashMap<usize, usize> = HashMap::new();
        for &h in &unpaired {
            let edge = self.edges.len();
            self.edges.push(Edge::new(h));
            self.half_edges[h].edge = edge;

            let tail = self.half_edges[self.half_edges[h].next].vertex;
            let twin = self.half_edges.len();
            self.half_edges.push(HalfEdge {
                next: UNSET,
                flip: h,
                vertex: tail,
                edge,
                face: UNSET,
                uv: Vector2::zeros(),
                normal: Vector3::zeros(),
                on_boundary: true,
            });
            self.half_edges[h].flip = twin;

            if outgoing.insert(tail, twin).is_some() {
                return Err(MeshError::NonManifoldVertex(tail));
            }
        }

        for twin in interior_count..self.half_edges.len() {
            let head = self.half_edges[self.half_edges[twin].flip].vertex;
            let next = *outgoing
                .get(&head)
                .ok_or(MeshError::NonManifoldVertex(head))?;
            self.half_edges[twin].next = next;
        }

        // group boundary half-edges into loops
        let mut visited = vec![false; self.half_edges.len()];
        for start in interior_count..self.half_edges.len() {
            if visited[start] {
                continue;
            }
            let loop_idx = self.boundaries.len();
            self.boundaries.push(Face::new(start));

            let mut h = start;
            loop {
                visited[h] = true;
                self.half_edges[h].face = loop_idx;
                h = self.half_edges[h].next;
                if h == start {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Give every non-isolated vertex a home half-edge whose tail is the
    /// vertex itself. Interior half-edges come first in the arena, so they
    /// win over boundary twins.
    fn assign_home_half_edges(&mut self) {
        for (h, he) in self.half_edges.iter().enumerate() {
            let vertex = &mut self.vertices[he.vertex];
            if vertex.half_edge.is_none() {
                vertex.half_edge = Some(h);
            }
        }
    }

    /// Translate the mesh to its center of mass and rescale uniformly so
    /// the farthest vertex lies at unit distance from the origin.
    ///
    /// Whole-mesh, in-place; a cloud with zero radius (all vertices
    /// coincident) is translated but not rescaled.
    pub fn normalize(&mut self) -> Result<(), MeshError> {
        let cm = centroid(self.vertices.iter().map(|v| v.position))
            .ok_or(MeshError::EmptyMesh)?;

        for v in &mut self.vertices {
            v.position -= cm.coords;
        }

        let mut r_max: f64 = 0.0;
        for v in &self.vertices {
            r_max = r_max.max(v.position.coords.norm());
        }

        if r_max > 0.0 {
            for v in &mut self.vertices {
                v.position /= r_max;
            }
        }

        Ok(())
    }

    /// Axis-aligned bounding box over the vertex set
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new();
        bbox.compute_axis_aligned_box(&self.vertices);
        bbox
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_positions() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_two_triangles_share_an_edge() {
        let mesh =
            Mesh::from_polygons(&quad_positions(), &[vec![0, 1, 2], vec![0, 2, 3]]).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.edge_count(), 5);
        // 6 interior half-edges plus 4 boundary twins
        assert_eq!(mesh.half_edge_count(), 10);
        assert_eq!(mesh.boundary_count(), 1);
    }

    #[test]
    fn test_flip_is_an_involution() {
        let mesh =
            Mesh::from_polygons(&quad_positions(), &[vec![0, 1, 2], vec![0, 2, 3]]).unwrap();

        for (h, he) in mesh.half_edges.iter().enumerate() {
            assert_eq!(mesh.half_edges[he.flip].flip, h);
            assert_ne!(he.flip, h);
        }
    }

    #[test]
    fn test_home_half_edge_tail_invariant() {
        let mesh =
            Mesh::from_polygons(&quad_positions(), &[vec![0, 1, 2], vec![0, 2, 3]]).unwrap();

        for v in &mesh.vertices {
            let home = v.half_edge.expect("all quad vertices are incident");
            assert_eq!(mesh.half_edges[home].vertex, v.index);
        }
    }

    #[test]
    fn test_isolated_vertex() {
        let mut positions = quad_positions();
        positions.push(Point3::new(5.0, 5.0, 5.0));
        let mesh = Mesh::from_polygons(&positions, &[vec![0, 1, 2], vec![0, 2, 3]]).unwrap();

        assert!(mesh.vertices[4].is_isolated());
        assert!(!mesh.vertices[0].is_isolated());
    }

    #[test]
    fn test_boundary_flags_one_per_boundary_edge() {
        let mesh = Mesh::from_polygons(&quad_positions(), &[vec![0, 1, 2, 3]]).unwrap();

        for edge in &mesh.edges {
            let he = &mesh.half_edges[edge.half_edge];
            let flip = &mesh.half_edges[he.flip];
            // a single quad: every edge lies on the boundary
            assert_ne!(he.on_boundary, flip.on_boundary);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        let positions = quad_positions();

        assert_eq!(
            Mesh::from_polygons(&positions, &[vec![0, 1]]).unwrap_err(),
            MeshError::FaceTooSmall { face: 0, len: 2 }
        );
        assert_eq!(
            Mesh::from_polygons(&positions, &[vec![0, 1, 9]]).unwrap_err(),
            MeshError::VertexOutOfRange { face: 0, vertex: 9 }
        );
        // same directed edge twice: inconsistent winding between the faces
        assert_eq!(
            Mesh::from_polygons(&positions, &[vec![0, 1, 2], vec![1, 2, 3]]).unwrap_err(),
            MeshError::NonManifoldEdge { a: 1, b: 2 }
        );
    }

    #[test]
    fn test_normalize_unit_radius() {
        let mut mesh =
            Mesh::from_polygons(&quad_positions(), &[vec![0, 1, 2], vec![0, 2, 3]]).unwrap();
        mesh.normalize().unwrap();

        let r_max = mesh
            .vertices
            .iter()
            .map(|v| v.position.coords.norm())
            .fold(0.0, f64::max);
        assert!((r_max - 1.0).abs() < 1e-12);

        let cm = centroid(mesh.vertices.iter().map(|v| v.position)).unwrap();
        assert!(cm.coords.norm() < 1e-12);
    }

    #[test]
    fn test_normalize_empty_mesh() {
        let mut mesh = Mesh::new();
        assert_eq!(mesh.normalize(), Err(MeshError::EmptyMesh));
    }
}
