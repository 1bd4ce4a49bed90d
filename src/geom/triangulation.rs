use super::polygon::{orient2d, signed_area};
use super::{Point2, Tolerance};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TriangulationError {
    #[error("polygon requires at least 3 points, got {count}")]
    TooFewPoints { count: usize },
    #[error("polygon vertices must be finite")]
    NonFinite,
    #[error("polygon has zero area")]
    Degenerate,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    idx: u32,
    point: Point2,
    prev: usize,
    next: usize,
}

/// Ear-clip a simple polygon into exactly `n - 2` triangles.
///
/// Indices refer to positions in `points`. Triangles are wound
/// counter-clockwise in the polygon plane whatever the input orientation.
/// Collinear runs are kept (clipped as zero-area ears once no proper ear is
/// left) so the triangle count only depends on the vertex count.
pub fn triangulate_polygon(points: &[Point2], tol: Tolerance) -> Result<Vec<[u32; 3]>, TriangulationError> {
    let n = points.len();
    if n < 3 {
        return Err(TriangulationError::TooFewPoints { count: n });
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(TriangulationError::NonFinite);
    }
    let area = signed_area(points);
    if area.abs() <= tol.eps {
        return Err(TriangulationError::Degenerate);
    }
    let is_ccw = area > 0.0;

    let mut nodes: Vec<Node> = (0..n)
        .map(|i| Node {
            idx: i as u32,
            point: points[i],
            prev: (i + n - 1) % n,
            next: (i + 1) % n,
        })
        .collect();

    let mut triangles = Vec::with_capacity(n - 2);
    let mut remaining = n;
    let mut ear = 0usize;
    let mut stop = ear;
    let mut relaxed = false;

    while remaining > 3 {
        let prev = nodes[ear].prev;
        let next = nodes[ear].next;

        if is_ear(prev, ear, next, &nodes, is_ccw, relaxed, tol) {
            triangles.push(oriented(&nodes, prev, ear, next, is_ccw));
            remove_node(ear, &mut nodes);
            remaining -= 1;
            ear = next;
            stop = next;
            relaxed = false;
            continue;
        }

        ear = next;
        if ear == stop {
            if relaxed {
                // Numerically hopeless; fan out the remainder.
                let prev = nodes[ear].prev;
                let next = nodes[ear].next;
                triangles.push(oriented(&nodes, prev, ear, next, is_ccw));
                remove_node(ear, &mut nodes);
                remaining -= 1;
                ear = next;
                stop = next;
                continue;
            }
            relaxed = true;
        }
    }

    let prev = nodes[ear].prev;
    let next = nodes[ear].next;
    triangles.push(oriented(&nodes, prev, ear, next, is_ccw));

    Ok(triangles)
}

fn oriented(nodes: &[Node], prev: usize, ear: usize, next: usize, is_ccw: bool) -> [u32; 3] {
    if is_ccw {
        [nodes[prev].idx, nodes[ear].idx, nodes[next].idx]
    } else {
        [nodes[prev].idx, nodes[next].idx, nodes[ear].idx]
    }
}

fn is_ear(
    prev: usize,
    ear: usize,
    next: usize,
    nodes: &[Node],
    is_ccw: bool,
    relaxed: bool,
    tol: Tolerance,
) -> bool {
    let a = nodes[prev].point;
    let b = nodes[ear].point;
    let c = nodes[next].point;

    let cross = if is_ccw { orient2d(a, b, c) } else { -orient2d(a, b, c) };
    if relaxed {
        if cross < -tol.eps {
            return false;
        }
    } else if cross <= tol.eps {
        return false;
    }

    let mut p = nodes[next].next;
    while p != prev {
        let pt = nodes[p].point;
        if point_in_triangle(a, b, c, pt, is_ccw, tol) {
            let skip = relaxed
                && (pt == a || pt == b || pt == c);
            if !skip {
                return false;
            }
        }
        p = nodes[p].next;
    }

    true
}

fn remove_node(node: usize, nodes: &mut [Node]) {
    let prev = nodes[node].prev;
    let next = nodes[node].next;
    nodes[prev].next = next;
    nodes[next].prev = prev;
}

fn point_in_triangle(a: Point2, b: Point2, c: Point2, p: Point2, is_ccw: bool, tol: Tolerance) -> bool {
    let ab = orient2d(a, b, p);
    let bc = orient2d(b, c, p);
    let ca = orient2d(c, a, p);

    if is_ccw {
        ab >= -tol.eps && bc >= -tol.eps && ca >= -tol.eps
    } else {
        ab <= tol.eps && bc <= tol.eps && ca <= tol.eps
    }
}
