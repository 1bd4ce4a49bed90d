use super::{straight_cage, straight_skeleton, unit_square};
use crate::cage::{BoundingCage, CageError, CageErrorKind, CageOptions};
use crate::geom::{Point2, Point3, Tolerance};

fn leaf_ranges(cage: &BoundingCage) -> Vec<(f64, f64)> {
    cage.cells()
        .map(|(_, cell)| (cell.min_index(), cell.max_index()))
        .collect()
}

#[test]
fn three_collinear_points_scenario() {
    let mut cage = straight_cage(3);
    assert_eq!(cage.min_index(), 0.0);
    assert_eq!(cage.max_index(), 2.0);
    assert_eq!(cage.cell_count(), 1);
    assert_eq!(cage.keyframe_count(), 2);

    let middle = cage.split(1.0).unwrap();
    assert_eq!(leaf_ranges(&cage), vec![(0.0, 1.0), (1.0, 2.0)]);

    let version = cage.version();
    let again = cage.split(1.0).unwrap();
    assert_eq!(again, middle);
    assert_eq!(cage.cell_count(), 2);
    assert_eq!(cage.version(), version);

    let vertices = cage.vertices().to_vec();
    let faces = cage.faces().to_vec();
    let err = cage.split(5.0).unwrap_err();
    assert!(matches!(err, CageError::IndexOutOfRange { .. }));
    assert_eq!(err.kind(), CageErrorKind::InvalidArgument);
    assert_eq!(cage.vertices(), &vertices[..]);
    assert_eq!(cage.faces(), &faces[..]);
    assert_eq!(cage.cell_count(), 2);

    cage.split(1.5).unwrap();
    assert_eq!(leaf_ranges(&cage), vec![(0.0, 1.0), (1.0, 1.5), (1.5, 2.0)]);
    assert_eq!(cage.keyframe_count(), 4);
    cage.check_invariants().unwrap();
}

#[test]
fn adjacent_leaves_share_the_same_keyframe() {
    let mut cage = straight_cage(5);
    for index in [2.0, 1.0, 3.5, 0.25] {
        cage.split(index).unwrap();
    }
    let cells: Vec<_> = cage.cells().collect();
    for pair in cells.windows(2) {
        let (left_id, left) = pair[0];
        let (right_id, right) = pair[1];
        assert_eq!(left.right_keyframe(), right.left_keyframe());
        assert_eq!(left.max_index(), right.min_index());
        assert_eq!(left.next(), Some(right_id));
        assert_eq!(right.prev(), Some(left_id));
    }
}

#[test]
fn boundaries_belong_to_the_right_child() {
    let mut cage = straight_cage(3);
    cage.split(1.0).unwrap();
    let ranges = |index| {
        let leaf = cage.find_leaf(index).unwrap();
        let cell = cage.cell(leaf).unwrap();
        (cell.min_index(), cell.max_index())
    };
    assert_eq!(ranges(0.0), (0.0, 1.0));
    assert_eq!(ranges(0.999), (0.0, 1.0));
    assert_eq!(ranges(1.0), (1.0, 2.0));
    assert_eq!(ranges(2.0), (1.0, 2.0));
    assert!(cage.find_leaf(2.5).is_none());
    assert!(cage.find_leaf(f64::NAN).is_none());
}

#[test]
fn split_grows_the_shared_mesh_and_keeps_it_closed() {
    let mut cage = straight_cage(3);
    assert_eq!(cage.vertices().len(), 8);
    assert_eq!(cage.faces().len(), 12);
    let mesh = cage.mesh();
    assert!(mesh.is_closed());
    assert!((mesh.signed_volume() - 2.0).abs() < 1e-9);

    cage.split(1.0).unwrap();
    assert_eq!(cage.vertices().len(), 12);
    assert_eq!(cage.faces().len(), 20);
    let mesh = cage.mesh();
    assert!(mesh.is_closed());
    assert!((mesh.signed_volume() - 2.0).abs() < 1e-9);

    for (_, cell) in cage.cells() {
        assert_eq!(cell.mesh_vertices().len(), 8);
        assert_eq!(cell.mesh_faces().len(), 12);
        assert_eq!(cell.mesh_face_indices().len(), 8);
    }
}

#[test]
fn split_keyframe_inserts_an_edited_preview() {
    let mut cage = straight_cage(3);
    let mut preview = cage.keyframe_for_index(0.5).unwrap();
    assert_eq!(cage.cell_count(), 1);
    assert!(!preview.in_bounding_cage());
    assert!(Tolerance::DEFAULT.approx_eq_point3(preview.center(), Point3::new(0.0, 0.5, 0.0)));

    preview.move_point_2d(2, Point2::new(0.7, 0.6), true).unwrap();
    let id = cage.split_keyframe(&preview).unwrap();
    let inserted = cage.keyframe(id).unwrap();
    assert!(inserted.in_bounding_cage());
    assert_eq!(inserted.vertices_2d()[2], Point2::new(0.7, 0.6));

    let row = inserted.mesh_vertex_indices()[2] as usize;
    let world = inserted.to_world(Point2::new(0.7, 0.6));
    assert_eq!(cage.vertices()[row], world.to_array());
    cage.check_invariants().unwrap();

    // Inserting the same index again is a no-op.
    assert_eq!(cage.split_keyframe(&preview).unwrap(), id);
    assert_eq!(cage.cell_count(), 2);
}

#[test]
fn interpolated_keyframe_blends_neighbour_polygons() {
    let mut cage = straight_cage(3);
    let end = cage.last_keyframe().unwrap();
    cage.move_point_2d(end, 2, Point2::new(1.5, 0.5), true, true)
        .unwrap();
    let preview = cage.keyframe_for_index(1.0).unwrap();
    assert!(Tolerance::DEFAULT.approx_eq_f64(preview.vertices_2d()[2].x, 1.0));
    assert_eq!(preview.vertices_2d()[0], Point2::new(-0.5, -0.5));
}

#[test]
fn zero_length_side_is_structurally_unsupported() {
    let mut cage = BoundingCage::new();
    let skeleton = vec![
        Point3::ORIGIN,
        Point3::ORIGIN,
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 2.0, 0.0),
    ];
    cage.set_skeleton_vertices(&skeleton, 0, &unit_square()).unwrap();
    let version = cage.version();

    let err = cage.split(0.5).unwrap_err();
    assert!(matches!(err, CageError::UnsupportedSplit { .. }));
    assert_eq!(err.kind(), CageErrorKind::Structural);
    assert_eq!(cage.cell_count(), 1);
    assert_eq!(cage.version(), version);

    // Sample 1 sits on the first keyframe plane, so no side starting there
    // is supported while validation is on.
    assert!(matches!(cage.split(1.5), Err(CageError::UnsupportedSplit { .. })));

    cage.set_options(CageOptions::default().with_split_validation(false));
    assert!(matches!(cage.split(0.5), Err(CageError::UnsupportedSplit { .. })));
    cage.split(1.5).unwrap();
    cage.check_invariants().unwrap();
}

#[test]
fn split_crossing_a_neighbour_is_rejected() {
    let mut cage = BoundingCage::new();
    let u_turn = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(2.0, 1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    cage.set_skeleton_vertices(&u_turn, 0, &unit_square()).unwrap();
    let faces = cage.faces().to_vec();

    let err = cage.split(2.5).unwrap_err();
    assert_eq!(err.kind(), CageErrorKind::Geometric);
    assert_eq!(cage.faces(), &faces[..]);
    assert_eq!(cage.cell_count(), 1);

    // Without split validation only index order and skeleton length count.
    cage.set_options(CageOptions::default().with_split_validation(false));
    cage.split(2.5).unwrap();
    assert_eq!(cage.cell_count(), 2);
}

#[test]
fn invalid_skeletons_leave_the_cage_untouched() {
    let mut cage = straight_cage(3);
    cage.split(1.0).unwrap();
    let version = cage.version();

    let cases: Vec<(Vec<Point3>, Vec<Point2>)> = vec![
        (vec![Point3::ORIGIN], unit_square()),
        (straight_skeleton(3), unit_square()[..2].to_vec()),
        (
            straight_skeleton(3),
            vec![
                Point2::new(-1.0, -1.0),
                Point2::new(1.0, 1.0),
                Point2::new(1.0, -1.0),
                Point2::new(-1.0, 1.0),
            ],
        ),
        (vec![Point3::ORIGIN; 4], unit_square()),
        (
            vec![Point3::ORIGIN, Point3::new(f64::NAN, 0.0, 0.0)],
            unit_square(),
        ),
    ];
    let expected = [
        CageError::TooFewSkeletonPoints { count: 1 },
        CageError::TooFewTemplatePoints { count: 2 },
        CageError::NonSimpleTemplate,
        CageError::DegenerateSkeleton,
        CageError::NonFinite,
    ];
    for ((skeleton, template), expected) in cases.iter().zip(expected) {
        let err = cage.set_skeleton_vertices(skeleton, 1, template).unwrap_err();
        assert_eq!(err, expected);
        assert_eq!(cage.version(), version);
        assert_eq!(cage.cell_count(), 2);
    }
}

#[test]
fn clear_resets_to_empty() {
    let mut cage = straight_cage(4);
    cage.split(1.5).unwrap();
    cage.clear();
    assert!(cage.is_empty());
    assert_eq!(cage.min_index(), 0.0);
    assert_eq!(cage.max_index(), 0.0);
    assert!(cage.vertices().is_empty());
    assert!(cage.faces().is_empty());
    assert_eq!(cage.cells().count(), 0);
    assert_eq!(cage.split(1.0), Err(CageError::Empty));
    cage.check_invariants().unwrap();
}

#[test]
fn smoothing_keeps_endpoints() {
    let mut cage = BoundingCage::with_options(CageOptions::default().with_smoothing_strength(1.0));
    let zigzag = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.0, 2.0, 0.0),
        Point3::new(0.5, 3.0, 0.0),
    ];
    cage.set_skeleton_vertices(&zigzag, 2, &unit_square()).unwrap();
    assert_eq!(cage.skeleton_vertices(), &zigzag[..]);
    let smooth = cage.smooth_skeleton_vertices();
    assert_eq!(smooth[0], zigzag[0]);
    assert_eq!(smooth[3], zigzag[3]);
    assert_ne!(smooth[1], zigzag[1]);
}
