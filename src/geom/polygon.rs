//! Planar polygon predicates used to keep cross-sections simple.
//!
//! Polygons are closed implicitly: the last point connects back to the first.

use super::{Point2, Tolerance};

#[must_use]
pub fn orient2d(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Signed area, positive for counter-clockwise polygons.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    0.5 * area
}

/// Vertex average of the polygon.
#[must_use]
pub fn centroid(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return Point2::ORIGIN;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sx / n, sy / n)
}

/// Closed-segment intersection test; touching and collinear overlap count.
#[must_use]
pub fn segments_intersect(a: Point2, b: Point2, c: Point2, d: Point2, tol: Tolerance) -> bool {
    let o1 = orient2d(a, b, c);
    let o2 = orient2d(a, b, d);
    let o3 = orient2d(c, d, a);
    let o4 = orient2d(c, d, b);

    if o1.abs() <= tol.eps && on_segment(a, c, b, tol) {
        return true;
    }
    if o2.abs() <= tol.eps && on_segment(a, d, b, tol) {
        return true;
    }
    if o3.abs() <= tol.eps && on_segment(c, a, d, tol) {
        return true;
    }
    if o4.abs() <= tol.eps && on_segment(c, b, d, tol) {
        return true;
    }

    let ab = (o1 > tol.eps && o2 < -tol.eps) || (o1 < -tol.eps && o2 > tol.eps);
    let cd = (o3 > tol.eps && o4 < -tol.eps) || (o3 < -tol.eps && o4 > tol.eps);
    ab && cd
}

fn on_segment(a: Point2, p: Point2, b: Point2, tol: Tolerance) -> bool {
    let min_x = a.x.min(b.x) - tol.eps;
    let max_x = a.x.max(b.x) + tol.eps;
    let min_y = a.y.min(b.y) - tol.eps;
    let max_y = a.y.max(b.y) + tol.eps;
    p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
}

/// True when the edges incident to vertex `i` cross any other edge of the
/// polygon, or when `i` coincides with its neighbours.
///
/// This is the check needed after moving a single vertex: edges that do not
/// touch `i` cannot have changed.
#[must_use]
pub fn has_local_self_intersection(points: &[Point2], i: usize, tol: Tolerance) -> bool {
    let n = points.len();
    if n < 3 || i >= n {
        return false;
    }

    let prev = (i + n - 1) % n;
    let next = (i + 1) % n;
    if points[i].distance_squared_to(points[prev]) <= tol.eps_squared()
        || points[i].distance_squared_to(points[next]) <= tol.eps_squared()
    {
        return true;
    }

    if n == 3 {
        return orient2d(points[prev], points[i], points[next]).abs() <= tol.eps;
    }

    // The two moved edges share vertex i; a fold-back makes them overlap.
    if orient2d(points[prev], points[i], points[next]).abs() <= tol.eps {
        let back = (points[prev].x - points[i].x) * (points[next].x - points[i].x)
            + (points[prev].y - points[i].y) * (points[next].y - points[i].y);
        if back > 0.0 {
            return true;
        }
    }

    for (e0, e1) in [(prev, i), (i, next)] {
        for j in 0..n {
            let k = (j + 1) % n;
            if j == e0 || j == e1 || k == e0 || k == e1 {
                continue;
            }
            if segments_intersect(points[e0], points[e1], points[j], points[k], tol) {
                return true;
            }
        }
    }

    // Edges adjacent to the moved edges share one endpoint and only collide by
    // folding onto each other.
    for (a, shared, b) in [
        ((prev + n - 1) % n, prev, i),
        (i, next, (next + 1) % n),
    ] {
        if orient2d(points[a], points[shared], points[b]).abs() <= tol.eps {
            let back = (points[a].x - points[shared].x) * (points[b].x - points[shared].x)
                + (points[a].y - points[shared].y) * (points[b].y - points[shared].y);
            if back > 0.0 {
                return true;
            }
        }
    }

    false
}

/// True when the closed polygon has at least three vertices, no repeated
/// consecutive vertices and no crossing edges.
#[must_use]
pub fn is_simple_polygon(points: &[Point2], tol: Tolerance) -> bool {
    let n = points.len();
    if n < 3 || points.iter().any(|p| !p.is_finite()) {
        return false;
    }
    if signed_area(points).abs() <= tol.eps {
        return false;
    }
    (0..n).all(|i| !has_local_self_intersection(points, i, tol))
}
