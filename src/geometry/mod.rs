// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - half-edge connectivity and bounding volumes

mod bbox;
mod checker;
mod halfedge;
mod mesh;

pub use bbox::{BoundingBox, BoxError, BoxKind};
pub use checker::{check_mesh, MeshCheckResult};
pub use halfedge::{Edge, Face, HalfEdge};
pub use mesh::{Mesh, MeshError, Vertex};
