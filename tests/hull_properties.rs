//! # Convex Hull Properties
//!
//! Order invariance, interior rejection and divide-and-wrap agreement.
//!
//! Run with: cargo test --test hull_properties

use ferox_mesh::prelude::*;
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn cube_corners() -> Vec<Point3<f64>> {
    let mut points = Vec::new();
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
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

fn random_sphere(rng: &mut StdRng, count: usize, radius: f64) -> Vec<Point3<f64>> {
    (0..count)
        .map(|_| {
            let v = Vector3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            Point3::from(v.normalize() * radius)
        })
        .collect()
}

#[test]
fn cube_corners_in_any_order() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut points = cube_corners();
    let expected = sorted(&points);

    for _ in 0..20 {
        points.shuffle(&mut rng);
        let hull = ConvexHull::construct(&points).unwrap();
        assert_eq!(sorted(hull.points()), expected);
    }
}

#[test]
fn cube_with_interior_point() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut points = cube_corners();
    points.push(Point3::origin());

    for _ in 0..20 {
        points.shuffle(&mut rng);
        let hull = ConvexHull::construct(&points).unwrap();
        assert_eq!(sorted(hull.points()), sorted(&cube_corners()));
    }
}

#[test]
fn cube_with_many_interior_points() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut points = cube_corners();
    for _ in 0..500 {
        points.push(Point3::new(
            rng.gen_range(-0.99..0.99),
            rng.gen_range(-0.99..0.99),
            rng.gen_range(-0.99..0.99),
        ));
    }
    points.shuffle(&mut rng);

    let hull = ConvexHull::construct(&points).unwrap();
    assert_eq!(sorted(hull.points()), sorted(&cube_corners()));
}

#[test]
fn reordering_does_not_change_hull() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut points = random_sphere(&mut rng, 150, 2.0);
    points.extend(random_sphere(&mut rng, 150, 1.0));

    let reference = sorted(ConvexHull::construct(&points).unwrap().points());
    assert_eq!(reference.len(), 150);

    for _ in 0..5 {
        points.shuffle(&mut rng);
        let hull = ConvexHull::construct(&points).unwrap();
        assert_eq!(sorted(hull.points()), reference);
    }
}

#[test]
fn faces_are_outward_and_closed() {
    let mut rng = StdRng::seed_from_u64(23);
    let points = random_sphere(&mut rng, 200, 1.0);
    let hull = ConvexHull::construct(&points).unwrap();

    for &[a, b, c] in hull.faces() {
        let (pa, pb, pc) = (hull.points()[a], hull.points()[b], hull.points()[c]);
        let n = (pb - pa).cross(&(pc - pa));
        // the origin is inside the sphere
        assert!(n.dot(&pa.coords) > 0.0);
    }

    let mesh = hull.to_mesh().unwrap();
    assert!(mesh.normal_sum().norm() < 1e-9);
    assert!(mesh.is_valid());
}

#[test]
fn divided_matches_direct_above_threshold() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut points = random_sphere(&mut rng, 400, 1.0);
    for _ in 0..11_000 {
        let p = Point3::new(
            rng.gen_range(-0.5..0.5),
            rng.gen_range(-0.5..0.5),
            rng.gen_range(-0.5..0.5),
        );
        points.push(p);
    }
    points.shuffle(&mut rng);

    let direct = ConvexHull::construct_with(&points, &HullOptions::default().undivided()).unwrap();
    let divided = ConvexHull::construct(&points).unwrap();
    let sequential =
        ConvexHull::construct_with(&points, &HullOptions::default().sequential()).unwrap();

    assert_eq!(direct.len(), 400);
    assert_eq!(sorted(divided.points()), sorted(direct.points()));
    assert_eq!(sorted(sequential.points()), sorted(direct.points()));
}

#[test]
fn support_is_farthest_input_point() {
    let mut rng = StdRng::seed_from_u64(37);
    let points = random_sphere(&mut rng, 100, 1.0);
    let hull = ConvexHull::construct(&points).unwrap();

    for _ in 0..20 {
        let dir = Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let best = points
            .iter()
            .map(|p| p.coords.dot(&dir))
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((hull.support(&dir).coords.dot(&dir) - best).abs() < 1e-12);
    }
}

#[test]
fn degenerate_inputs_rejected() {
    let square: Vec<Point3<f64>> = cube_corners().into_iter().filter(|p| p.z > 0.0).collect();
    assert!(matches!(
        ConvexHull::construct(&square),
        Err(MeshError::DegeneratePointCloud { dimension: 2 })
    ));

    let same = vec![Point3::new(1.0, 1.0, 1.0); 10];
    assert!(matches!(
        ConvexHull::construct(&same),
        Err(MeshError::NotEnoughPoints { found: 1 })
    ));
}
