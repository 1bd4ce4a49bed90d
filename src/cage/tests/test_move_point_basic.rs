use super::{straight_cage, unit_square};
use crate::cage::{BoundingCage, CageError, CageErrorKind, KeyFrameId};
use crate::geom::{Point2, Point3};

fn l_bend_cage() -> BoundingCage {
    let mut cage = BoundingCage::new();
    let skeleton = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
    ];
    cage.set_skeleton_vertices(&skeleton, 0, &unit_square()).unwrap();
    cage
}

#[test]
fn accepted_move_updates_mesh_row_and_prisms() {
    let mut cage = straight_cage(3);
    let middle = cage.split(1.0).unwrap();
    let version = cage.version();

    cage.move_point_2d(middle, 0, Point2::new(-0.7, -0.6), true, true)
        .unwrap();

    let kf = cage.keyframe(middle).unwrap();
    assert_eq!(kf.vertices_2d()[0], Point2::new(-0.7, -0.6));
    let row = kf.mesh_vertex_indices()[0] as usize;
    let world = kf.to_world(Point2::new(-0.7, -0.6)).to_array();
    assert_eq!(cage.vertices()[row], world);

    // Left cell holds the keyframe on its right side, the right cell on its
    // left side.
    let left = cage.cell(kf.left_cell().unwrap()).unwrap();
    let right = cage.cell(kf.right_cell().unwrap()).unwrap();
    assert_eq!(left.mesh_vertices()[4], world);
    assert_eq!(right.mesh_vertices()[0], world);

    // Point edits do not change the cell structure.
    assert_eq!(cage.version(), version);
    cage.check_invariants().unwrap();
}

#[test]
fn self_intersecting_edit_is_rolled_back() {
    let mut cage = straight_cage(3);
    let middle = cage.split(1.0).unwrap();
    let polygon = cage.keyframe(middle).unwrap().vertices_2d().to_vec();
    let vertices = cage.vertices().to_vec();
    let faces = cage.faces().to_vec();

    let err = cage
        .move_point_2d(middle, 0, Point2::new(1.0, 0.0), true, false)
        .unwrap_err();
    assert_eq!(err, CageError::SelfIntersection2d);
    assert_eq!(err.kind(), CageErrorKind::Geometric);
    assert_eq!(cage.keyframe(middle).unwrap().vertices_2d(), &polygon[..]);
    assert_eq!(cage.vertices(), &vertices[..]);
    assert_eq!(cage.faces(), &faces[..]);
}

#[test]
fn edit_folding_across_a_neighbour_plane_is_rejected_in_3d() {
    let mut cage = l_bend_cage();
    let first = cage.first_keyframe().unwrap();
    let vertices = cage.vertices().to_vec();

    // The first keyframe faces +x; its local x axis points along +y, towards
    // the plane of the last keyframe at y = 1.
    let far = Point2::new(3.0, -0.5);
    let err = cage.move_point_2d(first, 1, far, true, true).unwrap_err();
    assert_eq!(err, CageError::SelfIntersection3d);
    assert_eq!(cage.vertices(), &vertices[..]);

    cage.move_point_2d(first, 1, far, true, false).unwrap();
    assert_eq!(cage.keyframe(first).unwrap().vertices_2d()[1], far);
}

#[test]
fn editing_an_end_keyframe_keeps_the_cap_closed() {
    let mut cage = straight_cage(3);
    let first = cage.first_keyframe().unwrap();
    let last = cage.last_keyframe().unwrap();

    // A reflex vertex on the first polygon changes its cap triangulation.
    cage.move_point_2d(first, 1, Point2::new(0.0, 0.1), true, true)
        .unwrap();
    cage.move_point_2d(last, 3, Point2::new(-0.6, 0.7), true, true)
        .unwrap();
    cage.check_invariants().unwrap();
    assert!(cage.mesh().signed_volume() > 0.0);
}

#[test]
fn bad_arguments_are_reported() {
    let mut cage = straight_cage(3);
    let first = cage.first_keyframe().unwrap();
    assert_eq!(
        cage.move_point_2d(first, 7, Point2::ORIGIN, true, true),
        Err(CageError::PointOutOfRange { point: 7, count: 4 })
    );
    assert_eq!(
        cage.move_point_2d(first, 0, Point2::new(f64::INFINITY, 0.0), true, true),
        Err(CageError::NonFinite)
    );
    assert_eq!(
        cage.move_point_2d(KeyFrameId(99), 0, Point2::ORIGIN, true, true),
        Err(CageError::UnknownKeyFrame(KeyFrameId(99)))
    );
}
