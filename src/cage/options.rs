use serde::{Deserialize, Serialize};

use crate::geom::Tolerance;

/// Tuning knobs for a [`BoundingCage`](super::BoundingCage).
///
/// Missing fields fall back to their defaults when deserialized, so a host can
/// pass a partial object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CageOptions {
    /// Blend towards the neighbour midpoint per smoothing pass, in `[0, 1]`.
    pub smoothing_strength: f64,
    pub tolerance: Tolerance,
    /// When false, splits only check index order and skeleton length.
    pub validate_splits: bool,
    pub initial_vertex_capacity: usize,
    pub initial_face_capacity: usize,
}

impl CageOptions {
    #[must_use]
    pub fn with_smoothing_strength(mut self, strength: f64) -> Self {
        self.smoothing_strength = strength;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_split_validation(mut self, enabled: bool) -> Self {
        self.validate_splits = enabled;
        self
    }

    #[must_use]
    pub fn with_initial_capacity(mut self, vertices: usize, faces: usize) -> Self {
        self.initial_vertex_capacity = vertices;
        self.initial_face_capacity = faces;
        self
    }
}

impl Default for CageOptions {
    fn default() -> Self {
        Self {
            smoothing_strength: 0.5,
            tolerance: Tolerance::DEFAULT,
            validate_splits: true,
            initial_vertex_capacity: 64,
            initial_face_capacity: 128,
        }
    }
}
