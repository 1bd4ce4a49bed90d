mod test_cursor_basic;
mod test_move_point_basic;
mod test_split_basic;

use crate::cage::BoundingCage;
use crate::geom::{Point2, Point3};

fn unit_square() -> Vec<Point2> {
    vec![
        Point2::new(-0.5, -0.5),
        Point2::new(0.5, -0.5),
        Point2::new(0.5, 0.5),
        Point2::new(-0.5, 0.5),
    ]
}

/// Samples `(0, i, 0)` for `i` in `0..count`.
fn straight_skeleton(count: usize) -> Vec<Point3> {
    (0..count).map(|i| Point3::new(0.0, i as f64, 0.0)).collect()
}

fn straight_cage(count: usize) -> BoundingCage {
    let mut cage = BoundingCage::new();
    cage.set_skeleton_vertices(&straight_skeleton(count), 0, &unit_square())
        .unwrap();
    cage
}
