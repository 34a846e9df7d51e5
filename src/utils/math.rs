// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::{Point3, Vector3};

/// Check if two floats are approximately equal
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Centroid of a sequence of points, or `None` for an empty sequence
pub fn centroid<I>(points: I) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = Point3<f64>>,
{
    let mut sum = Vector3::zeros();
    let mut count = 0usize;

    for p in points {
        sum += p.coords;
        count += 1;
    }

    if count == 0 {
        return None;
    }
    Some(Point3::from(sum / count as f64))
}
