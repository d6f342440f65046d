//! Convex hulls of point clouds by gift wrapping.
//!
//! [`ConvexHull::construct`] finds the points of a cloud that lie on its
//! convex hull, together with a triangulation of the hull surface.
//!
//! # Algorithm
//!
//! 1. Reject non-finite coordinates, drop exact duplicates, and reject clouds
//!    with fewer than four distinct points or that do not span 3D.
//! 2. Start from the lexicographically lowest point, whose vertical line
//!    supports the cloud, and wrap around that line to find a first hull edge.
//! 3. Wrap oriented edges from a FIFO frontier until it is empty. Each wrap
//!    yields one hull triangle and queues the edges of its neighbours.
//!
//! Clouds with at least [`HullOptions::divide_threshold`] points are split
//! into contiguous chunks first. Each chunk is wrapped on its own (in
//! parallel when enabled) and the union of the chunk hulls is wrapped again.
//!
//! Runs in O(H * N) for H hull points and N input points.
//!
//! # Coplanar faces
//!
//! Hull faces with more than three points are triangulated from whichever
//! edge reaches them first, so triangles of such a face may overlap. The hull
//! point set does not depend on this.
//!
//! # Example
//!
//! ```
//! use ferox_mesh::algo::hull::ConvexHull;
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(0.1, 0.1, 0.1), // interior
//! ];
//!
//! let hull = ConvexHull::construct(&points).unwrap();
//! assert_eq!(hull.len(), 4);
//! assert_eq!(hull.faces().len(), 4);
//! ```

mod cloud;
mod gift_wrap;

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use super::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::Mesh;

/// Options for convex hull construction.
#[derive(Debug, Clone)]
pub struct HullOptions {
    /// Clouds with at least this many distinct points are divided into chunks.
    pub divide_threshold: usize,

    /// Number of chunks a large cloud is divided into.
    pub divisions: usize,

    /// Whether to wrap chunks in parallel (default: true).
    pub parallel: bool,
}

impl Default for HullOptions {
    fn default() -> Self {
        Self {
            divide_threshold: 10_000,
            divisions: 8,
            parallel: true,
        }
    }
}

impl HullOptions {
    /// Create options with the specified divide threshold.
    pub fn with_divide_threshold(mut self, threshold: usize) -> Self {
        self.divide_threshold = threshold;
        self
    }

    /// Create options with the specified number of chunks.
    pub fn with_divisions(mut self, divisions: usize) -> Self {
        self.divisions = divisions;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Create options that never divide the cloud.
    pub fn undivided(mut self) -> Self {
        self.divide_threshold = usize::MAX;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.divisions < 2 {
            return Err(MeshError::invalid_param(
                "divisions",
                self.divisions,
                "must be at least 2",
            ));
        }
        Ok(())
    }
}

/// The convex hull of a point cloud.
#[derive(Debug, Clone)]
pub struct ConvexHull {
    points: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
}

impl ConvexHull {
    /// Compute the hull of `points` with default options.
    ///
    /// # Errors
    /// - [`MeshError::InvalidInput`] if a coordinate is NaN or infinite
    /// - [`MeshError::NotEnoughPoints`] if there are fewer than 4 distinct points
    /// - [`MeshError::DegeneratePointCloud`] if the points are collinear or coplanar
    pub fn construct(points: &[Point3<f64>]) -> Result<Self> {
        Self::construct_internal(points, &HullOptions::default(), None)
    }

    /// Compute the hull of `points` with custom options.
    pub fn construct_with(points: &[Point3<f64>], options: &HullOptions) -> Result<Self> {
        Self::construct_internal(points, options, None)
    }

    /// Compute the hull of `points` with progress reporting.
    pub fn construct_with_progress(
        points: &[Point3<f64>],
        options: &HullOptions,
        progress: &Progress,
    ) -> Result<Self> {
        Self::construct_internal(points, options, Some(progress))
    }

    fn construct_internal(
        points: &[Point3<f64>],
        options: &HullOptions,
        progress: Option<&Progress>,
    ) -> Result<Self> {
        options.validate()?;
        let distinct = cloud::prepare(points)?;

        let candidates = if distinct.len() >= options.divide_threshold {
            divide(&distinct, options, progress)
        } else {
            distinct
        };

        let wrapped = gift_wrap::wrap(&candidates, progress);

        // renumber from cloud indices to hull point indices
        let mut slot = vec![usize::MAX; candidates.len()];
        let points: Vec<Point3<f64>> = wrapped
            .vertices
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                slot[v] = i;
                candidates[v]
            })
            .collect();
        let faces = wrapped
            .faces
            .iter()
            .map(|face| face.map(|v| slot[v]))
            .collect();

        Ok(Self { points, faces })
    }

    /// Hull points, each a distinct input point.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Hull triangles as indices into [`points`](Self::points),
    /// counter-clockwise seen from outside.
    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Number of hull points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a hull has at least four points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The hull point farthest along `direction`.
    ///
    /// Ties go to the point found first.
    pub fn support(&self, direction: &Vector3<f64>) -> Point3<f64> {
        self.points[self.support_index(direction)]
    }

    fn support_index(&self, direction: &Vector3<f64>) -> usize {
        let mut best = 0;
        let mut best_dot = f64::NEG_INFINITY;
        for (i, p) in self.points.iter().enumerate() {
            let d = p.coords.dot(direction);
            if d > best_dot {
                best = i;
                best_dot = d;
            }
        }
        best
    }

    /// Approximate the hull by its support points in `samples` directions.
    ///
    /// Directions are spread evenly over the unit sphere on a Fibonacci
    /// lattice, so the result is deterministic.
    ///
    /// # Errors
    /// [`MeshError::InvalidParameter`] if `samples < 4`. The hull errors of
    /// [`construct`](Self::construct) if the sampled points are degenerate.
    pub fn simplify(&self, samples: usize) -> Result<ConvexHull> {
        if samples < 4 {
            return Err(MeshError::invalid_param(
                "samples",
                samples,
                "must be at least 4",
            ));
        }

        let mut picked = vec![false; self.points.len()];
        let mut support = Vec::new();
        for direction in fibonacci_sphere(samples) {
            let i = self.support_index(&direction);
            if !picked[i] {
                picked[i] = true;
                support.push(self.points[i]);
            }
        }

        log::debug!(
            "simplified hull: {} -> {} points from {} directions",
            self.points.len(),
            support.len(),
            samples
        );
        ConvexHull::construct_with(&support, &HullOptions::default().undivided())
    }

    /// Load the hull triangles into a mesh, with corners that share a hull
    /// point connected.
    pub fn to_mesh(&self) -> Result<Mesh> {
        Mesh::from_indexed(&self.points, &self.faces)
    }
}

/// Hull points of each chunk, or all of a chunk's points if it is degenerate.
fn divide(
    points: &[Point3<f64>],
    options: &HullOptions,
    progress: Option<&Progress>,
) -> Vec<Point3<f64>> {
    let chunk_len = points.len().div_ceil(options.divisions);
    let wrap_chunk = |chunk: &[Point3<f64>]| -> Vec<Point3<f64>> {
        if chunk.len() < 4 || cloud::affine_dimension(chunk) < 3 {
            return chunk.to_vec();
        }
        gift_wrap::wrap(chunk, None)
            .vertices
            .into_iter()
            .map(|v| chunk[v])
            .collect()
    };

    let hulls: Vec<Vec<Point3<f64>>> = if options.parallel {
        points.par_chunks(chunk_len).map(wrap_chunk).collect()
    } else {
        let chunks = points.len().div_ceil(chunk_len);
        points
            .chunks(chunk_len)
            .enumerate()
            .map(|(i, chunk)| {
                if let Some(p) = progress {
                    p.report(i, chunks, "Wrapping chunks");
                }
                wrap_chunk(chunk)
            })
            .collect()
    };

    let merged: Vec<Point3<f64>> = hulls.into_iter().flatten().collect();
    log::debug!(
        "divided {} points into chunks of {}: {} candidates remain",
        points.len(),
        chunk_len,
        merged.len()
    );
    merged
}

/// `count` unit vectors spread evenly over the sphere.
fn fibonacci_sphere(count: usize) -> impl Iterator<Item = Vector3<f64>> {
    let golden = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    (0..count).map(move |i| {
        let y = 1.0 - 2.0 * (i as f64 + 0.5) / count as f64;
        let r = (1.0 - y * y).sqrt();
        let phi = golden * i as f64;
        Vector3::new(r * phi.cos(), y, r * phi.sin())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(size: f64) -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for x in [0.0, size] {
            for y in [0.0, size] {
                for z in [0.0, size] {
                    points.push(Point3::new(x, y, z));
                }
            }
        }
        points
    }

    fn sorted(points: &[Point3<f64>]) -> Vec<[f64; 3]> {
        let mut v: Vec<[f64; 3]> = points.iter().map(|p| [p.x, p.y, p.z]).collect();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    }

    #[test]
    fn test_cube() {
        let points = cube(2.0);
        let hull = ConvexHull::construct(&points).unwrap();
        assert_eq!(hull.len(), 8);
        assert_eq!(sorted(hull.points()), sorted(&points));
    }

    #[test]
    fn test_duplicates_ignored() {
        let mut points = cube(1.0);
        points.extend(cube(1.0));
        let hull = ConvexHull::construct(&points).unwrap();
        assert_eq!(hull.len(), 8);
    }

    #[test]
    fn test_errors() {
        let too_few = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)];
        assert!(matches!(
            ConvexHull::construct(&too_few),
            Err(MeshError::NotEnoughPoints { found: 3 })
        ));

        let line: Vec<Point3<f64>> = (0..5).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        assert!(matches!(
            ConvexHull::construct(&line),
            Err(MeshError::DegeneratePointCloud { dimension: 1 })
        ));

        let mut nan = cube(1.0);
        nan[3].y = f64::NAN;
        assert!(matches!(
            ConvexHull::construct(&nan),
            Err(MeshError::InvalidInput { index: 3, .. })
        ));

        let options = HullOptions::default().with_divisions(1);
        assert!(ConvexHull::construct_with(&cube(1.0), &options).is_err());
    }

    #[test]
    fn test_faces_reference_points() {
        let hull = ConvexHull::construct(&cube(1.0)).unwrap();
        for face in hull.faces() {
            for &v in face {
                assert!(v < hull.len());
            }
        }
    }

    #[test]
    fn test_support() {
        let hull = ConvexHull::construct(&cube(1.0)).unwrap();
        let p = hull.support(&Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Point3::new(1.0, 1.0, 1.0));
        let p = hull.support(&Vector3::new(-1.0, 0.1, -0.2));
        assert_eq!(p, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_divided_matches_direct() {
        // a coarse sphere of points plus noise inside it
        let mut points: Vec<Point3<f64>> = fibonacci_sphere(200).map(Point3::from).collect();
        points.extend(fibonacci_sphere(100).map(|v| Point3::from(v * 0.5)));

        let direct = ConvexHull::construct_with(&points, &HullOptions::default().undivided())
            .unwrap();
        let options = HullOptions::default()
            .with_divide_threshold(50)
            .with_divisions(4);
        let divided = ConvexHull::construct_with(&points, &options).unwrap();
        let sequential =
            ConvexHull::construct_with(&points, &options.clone().sequential()).unwrap();

        assert_eq!(direct.len(), 200);
        assert_eq!(sorted(direct.points()), sorted(divided.points()));
        assert_eq!(sorted(divided.points()), sorted(sequential.points()));
    }

    #[test]
    fn test_simplify() {
        let points: Vec<Point3<f64>> = fibonacci_sphere(500).map(Point3::from).collect();
        let hull = ConvexHull::construct(&points).unwrap();

        let simple = hull.simplify(32).unwrap();
        assert!(simple.len() >= 4);
        assert!(simple.len() <= 32);
        for p in simple.points() {
            assert!(hull.points().contains(p));
        }

        assert!(hull.simplify(3).is_err());
    }

    #[test]
    fn test_fibonacci_sphere_is_unit() {
        for v in fibonacci_sphere(64) {
            assert!((v.norm() - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_to_mesh_connects_shared_points() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let hull = ConvexHull::construct(&points).unwrap();
        let mesh = hull.to_mesh().unwrap();

        assert_eq!(mesh.len(), 4);
        let stats = mesh.connection_stats();
        // every corner is connected, one set per hull point
        assert_eq!(stats.sets, 4);
        assert_eq!(stats.connected_corners, 12);
        assert!(mesh.normal_sum().norm() < 1e-10);
        assert!(mesh.is_valid());
    }
}
