// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounding volumes: axis-aligned boxes and PCA-oriented boxes

use super::Vertex;
use crate::utils::math::{approx_eq, centroid};
use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised by bounding-volume computations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoxError {
    #[error("cannot compute a bounding volume over an empty vertex set")]
    EmptyInput,
}

/// How a bounding box was computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxKind {
    #[serde(rename = "Axis Aligned")]
    AxisAligned,
    #[serde(rename = "Oriented")]
    Oriented,
}

/// Bounding box over a vertex set.
///
/// `min`, `max`, and `extent` describe the axis-aligned case;
/// `oriented_points` holds the six extremal points of the PCA-oriented
/// case, expressed in the original coordinate frame. `extent` is only
/// meaningful when `kind` is [`BoxKind::AxisAligned`]. A box is a plain
/// value with no ownership tie to the mesh it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
    pub extent: Vector3<f64>,
    pub oriented_points: Vec<Point3<f64>>,
    pub kind: BoxKind,
}

impl BoundingBox {
    /// Zero box at the origin
    pub fn new() -> Self {
        Self {
            min: Point3::origin(),
            max: Point3::origin(),
            extent: Vector3::zeros(),
            oriented_points: Vec::new(),
            kind: BoxKind::AxisAligned,
        }
    }

    pub fn from_min_max(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min,
            max,
            extent: max - min,
            oriented_points: Vec::new(),
            kind: BoxKind::AxisAligned,
        }
    }

    pub fn from_point(p: Point3<f64>) -> Self {
        Self::from_min_max(p, p)
    }

    /// Grow the box just enough to include a point. Points already inside
    /// leave the box unchanged.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);

        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);

        self.extent = self.max - self.min;
    }

    /// Grow the box just enough to include another box
    pub fn expand_to_include_box(&mut self, other: &BoundingBox) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.min.z = self.min.z.min(other.min.z);

        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
        self.max.z = self.max.z.max(other.max.z);

        self.extent = self.max - self.min;
    }

    /// Index of the axis with the largest extent: 0 for x, 1 for y,
    /// 2 for z, ties resolving to the lower-indexed axis. Returns -1 for
    /// an oriented box, which has no dominant Cartesian axis.
    pub fn max_dimension(&self) -> i32 {
        if self.kind == BoxKind::Oriented {
            return -1;
        }

        let mut result = 0;
        if self.extent.y > self.extent.x {
            result = 1;
        }
        if self.extent.z > self.extent.y && self.extent.z > self.extent.x {
            result = 2;
        }

        result
    }

    /// Interval-overlap test between two axis-aligned boxes.
    ///
    /// Despite the name this reports overlap, not strict containment: it
    /// succeeds when every axis interval of `other` overlaps the
    /// corresponding interval of `self`. On overlap, returns the distance
    /// between the two box centers.
    pub fn contains(&self, other: &BoundingBox) -> Option<f64> {
        let overlap = |a_min: f64, a_max: f64, b_min: f64, b_max: f64| {
            (a_min <= b_min && b_min <= a_max) || (b_min <= a_min && a_min <= b_max)
        };

        if overlap(self.min.x, self.max.x, other.min.x, other.max.x)
            && overlap(self.min.y, self.max.y, other.min.y, other.max.y)
            && overlap(self.min.z, self.max.z, other.min.z, other.max.z)
        {
            let v = (self.min.coords + self.max.coords) / 2.0
                - (other.min.coords + other.max.coords) / 2.0;
            return Some(v.norm());
        }

        None
    }

    /// Compute the axis-aligned box of a vertex set.
    ///
    /// The fold starts from the zero vector rather than infinities, so a
    /// vertex set that does not straddle the origin on some axis keeps the
    /// origin inside its box on that axis. Downstream consumers rely on
    /// this anchoring; do not change it without migrating them.
    pub fn compute_axis_aligned_box(&mut self, vertices: &[Vertex]) {
        self.kind = BoxKind::AxisAligned;

        self.min = Point3::origin();
        self.max = Point3::origin();

        for v in vertices {
            self.expand_to_include(&v.position);
        }

        debug!(min = ?self.min, max = ?self.max, extent = ?self.extent, "axis-aligned box");
    }

    /// Compute the PCA-oriented box of a vertex set.
    ///
    /// Principal axes come from the eigen-decomposition of the covariance
    /// matrix of the positions about their centroid. The covariance matrix
    /// is symmetric positive semi-definite, so the symmetric solver applies
    /// and yields real eigenvalues with orthonormal eigenvectors; eigenpairs
    /// are ordered by ascending eigenvalue. The six extremal points land in
    /// `oriented_points` as axis-0 min, axis-0 max, axis-1 min, axis-1 max,
    /// axis-2 min, axis-2 max.
    ///
    /// A degenerate vertex set (collinear, coplanar, or fewer than two
    /// distinct positions) produces zero-thickness axes rather than an
    /// error; only an empty set fails.
    pub fn compute_oriented_box(&mut self, vertices: &[Vertex]) -> Result<(), BoxError> {
        self.kind = BoxKind::Oriented;
        self.oriented_points.clear();

        let center =
            centroid(vertices.iter().map(|v| v.position)).ok_or(BoxError::EmptyInput)?;

        let mut covariance = Matrix3::zeros();
        for v in vertices {
            let centered = v.position - center;
            covariance += centered * centered.transpose();
        }
        covariance /= vertices.len() as f64;

        let eigen = SymmetricEigen::new(covariance);
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
        let axes = Matrix3::from_columns(&[
            eigen.eigenvectors.column(order[0]).into_owned(),
            eigen.eigenvectors.column(order[1]).into_owned(),
            eigen.eigenvectors.column(order[2]).into_owned(),
        ]);

        let mut min_vals = Vector3::repeat(f64::INFINITY);
        let mut max_vals = Vector3::repeat(f64::NEG_INFINITY);
        for v in vertices {
            let projected = axes.transpose() * (v.position - center);
            min_vals = min_vals.inf(&projected);
            max_vals = max_vals.sup(&projected);
        }

        for axis in 0..3 {
            let dir: Vector3<f64> = axes.column(axis).into_owned();
            self.oriented_points.push(center + dir * min_vals[axis]);
            self.oriented_points.push(center + dir * max_vals[axis]);
        }

        debug!(points = ?self.oriented_points, "oriented box");

        Ok(())
    }

    /// Check if two bounding boxes are approximately equal within tolerance
    pub fn approx_eq(&self, other: &BoundingBox, tolerance: f64) -> bool {
        approx_eq(self.min.x, other.min.x, tolerance)
            && approx_eq(self.min.y, other.min.y, tolerance)
            && approx_eq(self.min.z, other.min.z, tolerance)
            && approx_eq(self.max.x, other.max.x, tolerance)
            && approx_eq(self.max.y, other.max.y, tolerance)
            && approx_eq(self.max.z, other.max.z, tolerance)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}
