use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::{Frame, Point3, Tolerance, Vec3, polyline_tangents, rotate_vector};

fn random_unit(rng: &mut StdRng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        if let Some(n) = v.normalized() {
            if v.length() > 0.1 {
                return n;
            }
        }
    }
}

#[test]
fn transport_along_random_walk_stays_a_rotation() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut frame = Frame::from_normal(random_unit(&mut rng)).unwrap();
    for _ in 0..500 {
        let target = frame
            .normal
            .add(random_unit(&mut rng).mul_scalar(0.3))
            .normalized()
            .unwrap_or(frame.normal);
        frame = frame.transported(target, Tolerance::DEFAULT);
        assert!(frame.orthonormality_error() < 1e-9);
        assert!(frame.is_right_handed());
        assert!(Tolerance::LOOSE.approx_eq_vec3(frame.normal, target));
    }
}

#[test]
fn transport_has_no_twist_about_the_normal() {
    // The minimal rotation leaves the component of `right` along the rotation
    // axis untouched, so right never spins about the normal.
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let frame = Frame::from_normal(random_unit(&mut rng)).unwrap();
        let target = random_unit(&mut rng);
        if frame.normal.dot(target) < -0.99 {
            continue;
        }
        let moved = frame.transported(target, Tolerance::DEFAULT);
        let axis = frame.normal.cross(target);
        if let Some(axis) = axis.normalized() {
            assert!((frame.right.dot(axis) - moved.right.dot(axis)).abs() < 1e-9);
            assert!((frame.up.dot(axis) - moved.up.dot(axis)).abs() < 1e-9);
        }
    }
}

#[test]
fn transport_is_continuous() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..200 {
        let frame = Frame::from_normal(random_unit(&mut rng)).unwrap();
        let nudge = random_unit(&mut rng).mul_scalar(1e-4);
        let target = frame.normal.add(nudge).normalized().unwrap();
        let moved = frame.transported(target, Tolerance::DEFAULT);
        assert!(moved.right.sub(frame.right).length() < 1e-3);
        assert!(moved.up.sub(frame.up).length() < 1e-3);
    }
}

#[test]
fn straight_skeleton_transport_is_identity() {
    let skeleton: Vec<Point3> = (0..6).map(|i| Point3::new(0.0, f64::from(i), 0.0)).collect();
    let tangents = polyline_tangents(&skeleton, Tolerance::DEFAULT).unwrap();
    let start = Frame::from_normal(tangents[0]).unwrap();
    let mut frame = start;
    for t in &tangents[1..] {
        frame = frame.transported(*t, Tolerance::DEFAULT);
    }
    assert!(Tolerance::DEFAULT.approx_eq_vec3(frame.right, start.right));
    assert!(Tolerance::DEFAULT.approx_eq_vec3(frame.up, start.up));
}

#[test]
fn quarter_turn_rotates_about_shared_axis() {
    // Z -> X turns about Y; up already lies on that axis.
    let frame = Frame::WORLD.transported(Vec3::X, Tolerance::DEFAULT);
    let expected = rotate_vector(Vec3::X, Vec3::Y, std::f64::consts::FRAC_PI_2);
    assert!(Tolerance::DEFAULT.approx_eq_vec3(frame.right, expected));
    assert!(Tolerance::DEFAULT.approx_eq_vec3(frame.up, Vec3::Y));
}
