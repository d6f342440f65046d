//! Edge-expansion gift wrapping.
//!
//! Starting from one known hull edge, each oriented edge `(a, b)` is wrapped
//! by rotating a plane around it until it hits the first point `c`. The
//! triangle `(a, b, c)` lies on the hull boundary, and its edges seed the
//! frontier for the neighbouring faces. Wrapping stops when every oriented
//! edge that was queued has been visited.

use std::collections::{HashSet, VecDeque};

use nalgebra::{Point3, Vector3};

use super::cloud;
use crate::algo::Progress;

/// Candidates whose rotation angles differ by less than this are coplanar.
const ANGLE_EPS: f64 = 1e-9;

/// Relative distance below which a candidate counts as lying on the edge line.
const LINE_EPS: f64 = 1e-10;

/// Result of wrapping a cloud.
#[derive(Debug, Clone, Default)]
pub(crate) struct Wrapped {
    /// Indices into the input of every hull point, in discovery order.
    pub vertices: Vec<usize>,
    /// Hull triangles as input indices, counter-clockwise seen from outside.
    pub faces: Vec<[usize; 3]>,
}

/// Geometry shared by every extreme-point query on one cloud.
struct Wrapper<'a> {
    points: &'a [Point3<f64>],
    centroid: Point3<f64>,
}

impl Wrapper<'_> {
    /// The candidate hit first when a half-plane bounded by the line `a -> b`
    /// is rotated clockwise (looking down the edge) away from the interior.
    ///
    /// Coplanar ties are resolved by a planar wrap step pivoting on `a`: the
    /// winner leaves every other tied candidate on the same side of `a -> c`
    /// as `b`. Collinear ties go to the candidate farther from `a`, anything
    /// left to the lowest index.
    fn extreme(&self, a: &Point3<f64>, b: &Point3<f64>) -> Option<usize> {
        let e = b - a;
        let e_len = e.norm();
        if e_len <= f64::MIN_POSITIVE {
            return None;
        }
        let axis = e / e_len;
        let reject = |v: Vector3<f64>| v - axis * v.dot(&axis);
        let interior = reject(self.centroid - a);

        let mut angles = Vec::with_capacity(self.points.len());
        let mut best = f64::INFINITY;
        for (i, p) in self.points.iter().enumerate() {
            let d = p - a;
            let n = reject(d);
            if n.norm() <= LINE_EPS * d.norm().max(e_len) {
                continue;
            }
            let theta = interior.cross(&n).dot(&axis).atan2(interior.dot(&n));
            best = best.min(theta);
            angles.push((i, theta));
        }

        let mut tied = angles
            .into_iter()
            .filter(|&(_, theta)| theta - best <= ANGLE_EPS)
            .map(|(i, _)| i);

        let mut c = tied.next()?;
        for p in tied {
            let to_c = self.points[c] - a;
            let to_p = self.points[p] - a;
            let u = to_c.normalize();
            let side = u.cross(&to_p.normalize()).dot(&u.cross(&axis));

            if side < -ANGLE_EPS {
                c = p;
            } else if side.abs() <= ANGLE_EPS
                && to_p.dot(&u) > 0.0
                && to_p.norm_squared() > to_c.norm_squared()
            {
                c = p;
            }
        }
        Some(c)
    }
}

/// Wrap a deduplicated cloud that spans three dimensions.
pub(crate) fn wrap(points: &[Point3<f64>], progress: Option<&Progress>) -> Wrapped {
    let Some(seed) = cloud::lowest(points) else {
        return Wrapped::default();
    };
    let wrapper = Wrapper {
        points,
        centroid: cloud::centroid(points),
    };

    // the line through the lowest point along +z supports the cloud
    let reference = points[seed] + Vector3::z();
    let Some(second) = wrapper.extreme(&points[seed], &reference) else {
        return Wrapped::default();
    };

    let mut on_hull = vec![false; points.len()];
    let mut wrapped = Wrapped::default();
    let mut visited: HashSet<(usize, usize)> = HashSet::new();
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    queue.push_back((seed, second));

    let mut add_vertex = |i: usize, wrapped: &mut Wrapped| {
        if !on_hull[i] {
            on_hull[i] = true;
            wrapped.vertices.push(i);
        }
    };

    while let Some((a, b)) = queue.pop_front() {
        if !visited.insert((a, b)) {
            continue;
        }
        add_vertex(a, &mut wrapped);
        add_vertex(b, &mut wrapped);

        let Some(c) = wrapper.extreme(&points[a], &points[b]) else {
            continue;
        };

        // (a, b, c) faces inward
        wrapped.faces.push([a, c, b]);

        queue.push_back((b, a));
        if visited.insert((b, c)) {
            queue.push_back((c, b));
        }
        if visited.insert((c, a)) {
            queue.push_back((a, c));
        }

        if let Some(p) = progress {
            p.report(wrapped.vertices.len(), points.len(), "Wrapping hull");
        }
    }

    log::debug!(
        "wrapped {} points: {} hull points, {} faces, {} edges visited",
        points.len(),
        wrapped.vertices.len(),
        wrapped.faces.len(),
        visited.len()
    );
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    points.push(Point3::new(x, y, z));
                }
            }
        }
        points
    }

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn test_tetrahedron() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let wrapped = wrap(&points, None);

        assert_eq!(sorted(wrapped.vertices), vec![0, 1, 2, 3]);
        assert_eq!(wrapped.faces.len(), 4);
    }

    #[test]
    fn test_cube_corners() {
        let wrapped = wrap(&cube(), None);
        assert_eq!(sorted(wrapped.vertices), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_interior_point_excluded() {
        let mut points = cube();
        points.push(Point3::new(0.5, 0.5, 0.5));
        let wrapped = wrap(&points, None);
        assert!(!wrapped.vertices.contains(&8));
        assert_eq!(wrapped.vertices.len(), 8);
    }

    #[test]
    fn test_face_and_edge_midpoints_excluded() {
        let mut points = cube();
        points.push(Point3::new(0.5, 0.5, 0.0));
        points.push(Point3::new(0.5, 0.0, 0.0));
        points.push(Point3::new(1.0, 1.0, 0.5));
        let wrapped = wrap(&points, None);
        assert_eq!(sorted(wrapped.vertices), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_faces_point_outward() {
        let points = cube();
        let center = Point3::new(0.5, 0.5, 0.5);
        let wrapped = wrap(&points, None);

        assert!(!wrapped.faces.is_empty());
        for [a, b, c] in wrapped.faces {
            let n = (points[b] - points[a]).cross(&(points[c] - points[a]));
            assert!(n.norm() > 1e-12, "degenerate face");
            assert!(n.dot(&(points[a] - center)) > 0.0);
        }
    }

    #[test]
    fn test_extreme_breaks_coplanar_ties_toward_boundary() {
        // square in the z = 0 plane plus an apex; pivot on a corner of the square
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let wrapper = Wrapper {
            points: &points,
            centroid: cloud::centroid(&points),
        };

        // edge 0 -> 1 along the bottom: the base face is hit first,
        // and its far corner adjacent to 0 is 3
        let c = wrapper.extreme(&points[0], &points[1]).unwrap();
        assert_eq!(c, 3);

        let c = wrapper.extreme(&points[1], &points[0]).unwrap();
        assert_eq!(c, 5);
    }
}
