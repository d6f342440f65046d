//! Point cloud validation and preprocessing for hull construction.

use std::collections::HashSet;

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};

/// Relative tolerance used when measuring the affine dimension of a cloud.
const FLAT_EPS: f64 = 1e-10;

/// Reject points with non-finite coordinates.
pub(crate) fn validate(points: &[Point3<f64>]) -> Result<()> {
    match points.iter().position(|p| !p.coords.iter().all(|c| c.is_finite())) {
        Some(index) => Err(MeshError::InvalidInput {
            index,
            reason: "coordinates must be finite",
        }),
        None => Ok(()),
    }
}

/// Remove exact duplicates, keeping the first occurrence of each point.
///
/// Points are compared bitwise, except that `-0.0` and `0.0` are the same.
pub(crate) fn dedup(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    let mut seen = HashSet::with_capacity(points.len());
    points
        .iter()
        .filter(|p| seen.insert(p.coords.map(|c| (c + 0.0).to_bits())))
        .copied()
        .collect()
}

/// Index of the lexicographically smallest point (x, then y, then z).
pub(crate) fn lowest(points: &[Point3<f64>]) -> Option<usize> {
    (0..points.len()).min_by(|&i, &j| {
        let (p, q) = (&points[i], &points[j]);
        p.x.total_cmp(&q.x)
            .then(p.y.total_cmp(&q.y))
            .then(p.z.total_cmp(&q.z))
    })
}

/// Mean of all points.
pub(crate) fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Point3::from(sum / points.len().max(1) as f64)
}

/// Number of dimensions spanned by the cloud (0 to 3).
///
/// Measured greedily: the farthest point from the first, then the farthest
/// from that line, then the farthest from that plane. Distances below a
/// tolerance relative to the cloud's extent count as zero.
pub(crate) fn affine_dimension(points: &[Point3<f64>]) -> usize {
    let Some(&origin) = points.first() else {
        return 0;
    };

    let farthest = |measure: &dyn Fn(&Point3<f64>) -> f64| -> (f64, Point3<f64>) {
        points
            .iter()
            .map(|p| (measure(p), *p))
            .fold((0.0, origin), |best, cur| if cur.0 > best.0 { cur } else { best })
    };

    let (extent, far) = farthest(&|p| (p - origin).norm());
    if extent <= f64::MIN_POSITIVE {
        return 0;
    }
    let tol = FLAT_EPS * extent;

    let axis = (far - origin) / extent;
    let (off_line, side) = farthest(&|p| {
        let d = p - origin;
        (d - axis * d.dot(&axis)).norm()
    });
    if off_line <= tol {
        return 1;
    }

    let normal = axis.cross(&(side - origin)).normalize();
    let (off_plane, _) = farthest(&|p| (p - origin).dot(&normal).abs());
    if off_plane <= tol {
        return 2;
    }

    3
}

/// Validate, deduplicate and check a cloud before wrapping.
pub(crate) fn prepare(points: &[Point3<f64>]) -> Result<Vec<Point3<f64>>> {
    validate(points)?;

    let distinct = dedup(points);
    if distinct.len() < 4 {
        return Err(MeshError::NotEnoughPoints {
            found: distinct.len(),
        });
    }

    let dimension = affine_dimension(&distinct);
    if dimension < 3 {
        return Err(MeshError::DegeneratePointCloud { dimension });
    }

    log::debug!(
        "hull input: {} points, {} distinct",
        points.len(),
        distinct.len()
    );
    Ok(distinct)
}
