// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Structural mesh checker
//! Verifies connectivity invariants as a testing aid. The checker only
//! reports problems; it never repairs a malformed mesh.

use super::{Face, Mesh};

/// Mesh check result with error messages
#[derive(Debug, Clone, Default)]
pub struct MeshCheckResult {
    pub errors: Vec<String>,
}

impl MeshCheckResult {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn add_error(&mut self, msg: String) {
        self.errors.push(msg);
    }
}

/// Run all structural checks over a mesh
pub fn check_mesh(mesh: &Mesh) -> MeshCheckResult {
    let mut result = MeshCheckResult::ok();

    check_half_edges(mesh, &mut result);
    check_vertices(mesh, &mut result);
    check_edges(mesh, &mut result);
    check_loops(mesh, &mesh.faces, false, &mut result);
    check_loops(mesh, &mesh.boundaries, true, &mut result);

    result
}

fn check_half_edges(mesh: &Mesh, result: &mut MeshCheckResult) {
    let nh = mesh.half_edges.len();

    for (h, he) in mesh.half_edges.iter().enumerate() {
        if he.next >= nh {
            result.add_error(format!("half-edge {h}: next {} out of range", he.next));
        }
        if he.flip >= nh {
            result.add_error(format!("half-edge {h}: flip {} out of range", he.flip));
            continue;
        }
        if he.vertex >= mesh.vertices.len() {
            result.add_error(format!("half-edge {h}: vertex {} out of range", he.vertex));
        }
        if he.edge >= mesh.edges.len() {
            result.add_error(format!("half-edge {h}: edge {} out of range", he.edge));
        }
        let face_arena = if he.on_boundary {
            mesh.boundaries.len()
        } else {
            mesh.faces.len()
        };
        if he.face >= face_arena {
            result.add_error(format!("half-edge {h}: face {} out of range", he.face));
        }

        if he.flip == h {
            result.add_error(format!("half-edge {h} is its own flip"));
        } else if mesh.half_edges[he.flip].flip != h {
            result.add_error(format!("half-edge {h}: flip is not an involution"));
        }
        if mesh.half_edges[he.flip].edge != he.edge {
            result.add_error(format!("half-edge {h}: flip belongs to a different edge"));
        }
    }
}

fn check_vertices(mesh: &Mesh, result: &mut MeshCheckResult) {
    for v in &mesh.vertices {
        let Some(home) = v.half_edge else {
            continue;
        };
        if home >= mesh.half_edges.len() {
            result.add_error(format!("vertex {}: home half-edge out of range", v.index));
        } else if mesh.half_edges[home].vertex != v.index {
            result.add_error(format!(
                "vertex {}: home half-edge {home} does not start there",
                v.index
            ));
        }
    }
}

fn check_edges(mesh: &Mesh, result: &mut MeshCheckResult) {
    for (e, edge) in mesh.edges.iter().enumerate() {
        if edge.half_edge >= mesh.half_edges.len() {
            result.add_error(format!("edge {e}: representative out of range"));
            continue;
        }
        let he = &mesh.half_edges[edge.half_edge];
        if he.edge != e {
            result.add_error(format!("edge {e}: representative points to edge {}", he.edge));
        }
        if he.on_boundary && mesh.half_edges[he.flip].on_boundary {
            result.add_error(format!("edge {e}: both half-edges flagged boundary"));
        }
    }
}

fn check_loops(mesh: &Mesh, faces: &[Face], boundary: bool, result: &mut MeshCheckResult) {
    let label = if boundary { "boundary loop" } else { "face" };

    for (f, face) in faces.iter().enumerate() {
        if face.half_edge >= mesh.half_edges.len() {
            result.add_error(format!("{label} {f}: representative out of range"));
            continue;
        }

        let mut h = face.half_edge;
        let mut steps = 0usize;
        loop {
            let he = &mesh.half_edges[h];
            if he.on_boundary != boundary || he.face != f {
                result.add_error(format!("{label} {f}: half-edge {h} belongs elsewhere"));
                break;
            }
            h = he.next;
            steps += 1;
            if h == face.half_edge {
                break;
            }
            if steps > mesh.half_edges.len() {
                result.add_error(format!("{label} {f}: next chain does not close"));
                break;
            }
        }
        if steps < 3 && steps > 0 {
            result.add_error(format!("{label} {f}: loop of length {steps}"));
        }
    }
}
