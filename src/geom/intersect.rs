//! Triangle intersection predicates for local self-intersection checks.

use super::polygon::segments_intersect;
use super::{BBox, Point2, Point3, Tolerance, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle3 {
    pub a: Point3,
    pub b: Point3,
    pub c: Point3,
}

impl Triangle3 {
    #[must_use]
    pub const fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    /// Unnormalized normal, `(b - a) × (c - a)`.
    #[must_use]
    pub fn normal(self) -> Vec3 {
        self.b.sub_point(self.a).cross(self.c.sub_point(self.a))
    }

    #[must_use]
    pub fn bbox(self) -> BBox {
        BBox::from_points(&[self.a, self.b, self.c]).unwrap_or(BBox::new(self.a, self.a))
    }

    fn edges(self) -> [(Point3, Point3); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }

    fn is_degenerate(self, tol: Tolerance) -> bool {
        self.normal().length() <= tol.eps
    }
}

/// Möller–Trumbore segment/triangle test.
#[must_use]
pub fn segment_hits_triangle(p0: Point3, p1: Point3, triangle: Triangle3, tol: Tolerance) -> bool {
    let dir = p1.sub_point(p0);
    let edge1 = triangle.b.sub_point(triangle.a);
    let edge2 = triangle.c.sub_point(triangle.a);
    let h = dir.cross(edge2);
    let det = edge1.dot(h);

    let det_eps = tol.eps * edge1.length() * h.length();
    if !det.is_finite() || det.abs() <= det_eps {
        return false;
    }

    let inv_det = 1.0 / det;
    let s = p0.sub_point(triangle.a);
    let u = inv_det * s.dot(h);
    if u < -tol.eps || u > 1.0 + tol.eps {
        return false;
    }

    let q = s.cross(edge1);
    let v = inv_det * dir.dot(q);
    if v < -tol.eps || u + v > 1.0 + tol.eps {
        return false;
    }

    let t = inv_det * edge2.dot(q);
    t >= -tol.eps && t <= 1.0 + tol.eps
}

/// True when the two triangles share any point (within tolerance).
///
/// Coplanar pairs are resolved in 2D by projecting onto the plane the shared
/// normal is most aligned with.
#[must_use]
pub fn triangles_intersect(tri_a: Triangle3, tri_b: Triangle3, tol: Tolerance) -> bool {
    if !tri_a.bbox().expand_by(tol.eps).intersects(tri_b.bbox().expand_by(tol.eps)) {
        return false;
    }
    if tri_a.is_degenerate(tol) || tri_b.is_degenerate(tol) {
        return false;
    }

    if are_coplanar(tri_a, tri_b, tol) {
        return coplanar_overlap(tri_a, tri_b, tol);
    }

    tri_a
        .edges()
        .iter()
        .any(|&(p0, p1)| segment_hits_triangle(p0, p1, tri_b, tol))
        || tri_b
            .edges()
            .iter()
            .any(|&(p0, p1)| segment_hits_triangle(p0, p1, tri_a, tol))
}

fn are_coplanar(tri_a: Triangle3, tri_b: Triangle3, tol: Tolerance) -> bool {
    let Some(n_a) = tri_a.normal().normalized() else {
        return false;
    };
    let Some(n_b) = tri_b.normal().normalized() else {
        return false;
    };
    if n_a.cross(n_b).length() > tol.eps.sqrt() {
        return false;
    }
    let scale = tri_a.bbox().diagonal().max(1.0);
    [tri_b.a, tri_b.b, tri_b.c]
        .iter()
        .all(|p| p.sub_point(tri_a.a).dot(n_a).abs() <= tol.eps * scale)
}

fn coplanar_overlap(tri_a: Triangle3, tri_b: Triangle3, tol: Tolerance) -> bool {
    let n = tri_a.normal();
    let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
    let project = |p: Point3| -> Point2 {
        if az >= ax && az >= ay {
            Point2::new(p.x, p.y)
        } else if ay >= ax {
            Point2::new(p.z, p.x)
        } else {
            Point2::new(p.y, p.z)
        }
    };
    let a = [project(tri_a.a), project(tri_a.b), project(tri_a.c)];
    let b = [project(tri_b.a), project(tri_b.b), project(tri_b.c)];

    for i in 0..3 {
        for j in 0..3 {
            if segments_intersect(a[i], a[(i + 1) % 3], b[j], b[(j + 1) % 3], tol) {
                return true;
            }
        }
    }
    contains_2d(&a, b[0], tol) || contains_2d(&b, a[0], tol)
}

fn contains_2d(tri: &[Point2; 3], p: Point2, tol: Tolerance) -> bool {
    let o = |a: Point2, b: Point2| (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let d0 = o(tri[0], tri[1]);
    let d1 = o(tri[1], tri[2]);
    let d2 = o(tri[2], tri[0]);
    let has_neg = d0 < -tol.eps || d1 < -tol.eps || d2 < -tol.eps;
    let has_pos = d0 > tol.eps || d1 > tol.eps || d2 > tol.eps;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_triangles_intersect() {
        let a = Triangle3::new(
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let b = Triangle3::new(
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 2.0, 1.0),
        );
        assert!(triangles_intersect(a, b, Tolerance::DEFAULT));
    }

    #[test]
    fn separated_triangles_do_not_intersect() {
        let a = Triangle3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let b = Triangle3::new(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        );
        assert!(!triangles_intersect(a, b, Tolerance::DEFAULT));
    }

    #[test]
    fn coplanar_overlap_is_detected() {
        let a = Triangle3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        );
        let b = Triangle3::new(
            Point3::new(0.25, 0.25, 0.0),
            Point3::new(0.5, 0.25, 0.0),
            Point3::new(0.25, 0.5, 0.0),
        );
        assert!(triangles_intersect(a, b, Tolerance::DEFAULT));
    }

    #[test]
    fn segment_through_triangle() {
        let tri = Triangle3::new(
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!(segment_hits_triangle(
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(0.0, 0.0, 1.0),
            tri,
            Tolerance::DEFAULT
        ));
        assert!(!segment_hits_triangle(
            Point3::new(0.0, 0.0, 0.5),
            Point3::new(0.0, 0.0, 1.0),
            tri,
            Tolerance::DEFAULT
        ));
    }
}
