// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Meshframe geometry kernel
//!
//! A half-edge polygon-mesh connectivity structure with derived geometric
//! queries (edge length, face area and normal, boundary and isolation
//! status) and bounding-volume computations over the vertex set, both
//! axis-aligned and PCA-oriented.

pub mod geometry;
pub mod utils;

pub use geometry::{
    check_mesh, BoundingBox, BoxError, BoxKind, Edge, Face, HalfEdge, Mesh, MeshCheckResult,
    MeshError, Vertex,
};

use anyhow::Result;
use nalgebra::Point3;

/// Build a mesh from indexed polygon data and normalize it so its center
/// of mass sits at the origin with the farthest vertex at unit distance.
pub fn build_normalized(positions: &[Point3<f64>], polygons: &[Vec<usize>]) -> Result<Mesh> {
    let mut mesh = Mesh::from_polygons(positions, polygons)?;
    mesh.normalize()?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_normalized() {
        let positions = [
            Point3::new(10.0, 10.0, 10.0),
            Point3::new(12.0, 10.0, 10.0),
            Point3::new(10.0, 12.0, 10.0),
        ];
        let mesh = build_normalized(&positions, &[vec![0, 1, 2]]).unwrap();

        let r_max = mesh
            .vertices
            .iter()
            .map(|v| v.position.coords.norm())
            .fold(0.0, f64::max);
        assert!((r_max - 1.0).abs() < 1e-12);
    }
}
