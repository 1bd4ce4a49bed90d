use crate::geom::{Point2, Tolerance, has_local_self_intersection, is_simple_polygon, polygon_centroid};

fn star() -> Vec<Point2> {
    (0..10)
        .map(|i| {
            let angle = f64::from(i) * std::f64::consts::PI / 5.0;
            let r = if i % 2 == 0 { 2.0 } else { 1.0 };
            Point2::new(r * angle.cos(), r * angle.sin())
        })
        .collect()
}

#[test]
fn concave_star_is_simple() {
    let points = star();
    assert!(is_simple_polygon(&points, Tolerance::DEFAULT));
    let c = polygon_centroid(&points);
    assert!(c.x.abs() < 1e-12 && c.y.abs() < 1e-12);
}

#[test]
fn pulling_an_inner_vertex_through_the_far_side_is_detected() {
    let mut points = star();
    points[5] = Point2::new(3.0, 0.0);
    assert!(has_local_self_intersection(&points, 5, Tolerance::DEFAULT));
    assert!(!is_simple_polygon(&points, Tolerance::DEFAULT));
}

#[test]
fn small_moves_stay_simple() {
    let mut points = star();
    points[3] = Point2::new(points[3].x * 1.1, points[3].y * 1.1);
    assert!(!has_local_self_intersection(&points, 3, Tolerance::DEFAULT));
}

#[test]
fn folding_onto_a_neighbour_edge_is_detected() {
    let mut points = vec![
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 2.0),
        Point2::new(0.0, 2.0),
    ];
    // Vertex 1 lands on edge 3-0.
    points[1] = Point2::new(0.0, 1.0);
    assert!(has_local_self_intersection(&points, 1, Tolerance::DEFAULT));
}
