//! Skeleton polyline utilities.
//!
//! A skeleton is an ordered list of samples where sample `i` sits at index
//! `i`. Fractional indices interpolate linearly between neighbouring samples.

use super::{Point3, Tolerance, Vec3};

/// Options for Laplacian polyline smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothPolylineOptions {
    /// Blend factor towards the neighbour midpoint, clamped to `[0, 1]`.
    pub strength: f64,
    /// Number of smoothing passes.
    pub iterations: usize,
}

impl SmoothPolylineOptions {
    #[must_use]
    pub const fn new(strength: f64, iterations: usize) -> Self {
        Self {
            strength,
            iterations,
        }
    }
}

impl Default for SmoothPolylineOptions {
    fn default() -> Self {
        Self::new(0.5, 1)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothPolylineDiagnostics {
    pub input_point_count: usize,
    pub iterations_applied: usize,
}

/// Smooths a polyline by moving interior points towards the midpoint of
/// their neighbours. Endpoints remain fixed.
#[must_use]
pub fn smooth_polyline(
    points: &[Point3],
    options: SmoothPolylineOptions,
) -> (Vec<Point3>, SmoothPolylineDiagnostics) {
    let mut diagnostics = SmoothPolylineDiagnostics {
        input_point_count: points.len(),
        ..Default::default()
    };

    let strength = options.strength.clamp(0.0, 1.0);
    if points.len() <= 2 || options.iterations == 0 || strength < 1e-12 {
        return (points.to_vec(), diagnostics);
    }

    let mut result = points.to_vec();
    let mut next = Vec::with_capacity(result.len());
    for _ in 0..options.iterations {
        next.clear();
        next.push(result[0]);
        for window in result.windows(3) {
            let target = window[0].lerp(window[2], 0.5);
            next.push(window[1].lerp(target, strength));
        }
        next.push(result[result.len() - 1]);
        std::mem::swap(&mut result, &mut next);
        diagnostics.iterations_applied += 1;
    }

    (result, diagnostics)
}

/// Unit tangent at every sample.
///
/// Interior samples use a central difference, the ends a one-sided one. When
/// neighbours coincide the difference is widened until it becomes non-zero.
/// Returns `None` when every sample coincides.
#[must_use]
pub fn polyline_tangents(points: &[Point3], tol: Tolerance) -> Option<Vec<Vec3>> {
    let n = points.len();
    if n < 2 {
        return None;
    }

    let mut tangents: Vec<Option<Vec3>> = Vec::with_capacity(n);
    for i in 0..n {
        let mut found = None;
        for reach in 1..n {
            let lo = i.saturating_sub(reach);
            let hi = (i + reach).min(n - 1);
            let d = points[hi].sub_point(points[lo]);
            if !tol.is_zero_vec3(d) {
                found = d.normalized();
                break;
            }
            if lo == 0 && hi == n - 1 {
                break;
            }
        }
        tangents.push(found);
    }

    if tangents.iter().all(Option::is_none) {
        return None;
    }
    tangents.into_iter().collect()
}

/// Skeleton position at a fractional index, clamped to the polyline ends.
#[must_use]
pub fn point_at_index(points: &[Point3], index: f64) -> Point3 {
    let Some((i, t)) = segment_at_index(points.len(), index) else {
        return Point3::ORIGIN;
    };
    if t == 0.0 {
        points[i]
    } else {
        points[i].lerp(points[i + 1], t)
    }
}

/// Unit tangent at a fractional index, blended from the sample tangents.
#[must_use]
pub fn tangent_at_index(tangents: &[Vec3], index: f64) -> Vec3 {
    let Some((i, t)) = segment_at_index(tangents.len(), index) else {
        return Vec3::Z;
    };
    if t == 0.0 {
        return tangents[i];
    }
    let a = tangents[i];
    let b = tangents[i + 1];
    a.lerp(b, t)
        .normalized()
        .unwrap_or(if t < 0.5 { a } else { b })
}

/// Length of the polyline traced from index `a` to index `b` (`a <= b`).
#[must_use]
pub fn length_between(points: &[Point3], a: f64, b: f64) -> f64 {
    if points.is_empty() || b <= a {
        return 0.0;
    }
    let mut total = 0.0;
    let mut prev = point_at_index(points, a);
    let mut sample = a.floor() + 1.0;
    while sample < b {
        let p = point_at_index(points, sample);
        total += p.distance_to(prev);
        prev = p;
        sample += 1.0;
    }
    total + point_at_index(points, b).distance_to(prev)
}

/// Integer sample indices strictly inside `(a, b)`.
pub fn samples_between(len: usize, a: f64, b: f64) -> impl Iterator<Item = usize> {
    let first = if a.fract() == 0.0 { a + 1.0 } else { a.ceil() };
    let first = first.max(0.0) as usize;
    (first..len).take_while(move |&i| (i as f64) < b)
}

fn segment_at_index(len: usize, index: f64) -> Option<(usize, f64)> {
    if len == 0 {
        return None;
    }
    let max = (len - 1) as f64;
    let index = if index.is_finite() { index.clamp(0.0, max) } else { 0.0 };
    let i = index.floor() as usize;
    if i >= len - 1 {
        return Some((len - 1, 0.0));
    }
    Some((i, index - i as f64))
}
