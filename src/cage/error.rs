use crate::geom::TriangulationError;

use super::KeyFrameId;

/// Broad classes of cage failures. None of them leave the cage modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CageErrorKind {
    InvalidArgument,
    Structural,
    Geometric,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CageError {
    #[error("skeleton requires at least 2 samples, got {count}")]
    TooFewSkeletonPoints { count: usize },
    #[error("skeleton samples all coincide")]
    DegenerateSkeleton,
    #[error("input coordinates must be finite")]
    NonFinite,
    #[error("polygon template requires at least 3 points, got {count}")]
    TooFewTemplatePoints { count: usize },
    #[error("polygon template is not a simple polygon")]
    NonSimpleTemplate,
    #[error("the cage is empty")]
    Empty,
    #[error("index {index} is outside [{min}, {max}]")]
    IndexOutOfRange { index: f64, min: f64, max: f64 },
    #[error("point {point} is out of range for a polygon with {count} points")]
    PointOutOfRange { point: usize, count: usize },
    #[error("keyframe {0:?} is not part of this cage")]
    UnknownKeyFrame(KeyFrameId),
    #[error("keyframe has {got} points, cage keyframes have {expected}")]
    PointCountMismatch { expected: usize, got: usize },
    #[error("cursor was invalidated by a structural change")]
    StaleCursor,
    #[error("cursor is past the end")]
    EndCursor,
    #[error("split at {index} leaves a side without skeleton support")]
    UnsupportedSplit { index: f64 },
    #[error("keyframe at {index} crosses a neighbouring keyframe")]
    CrossesNeighbour { index: f64 },
    #[error("keyframe polygon winding differs from the cage")]
    OrientationMismatch,
    #[error("edit makes the keyframe polygon self-intersect")]
    SelfIntersection2d,
    #[error("edit makes the cage self-intersect")]
    SelfIntersection3d,
    #[error("failed to triangulate keyframe polygon: {0}")]
    Triangulation(#[from] TriangulationError),
}

impl CageError {
    #[must_use]
    pub fn kind(&self) -> CageErrorKind {
        match self {
            Self::UnsupportedSplit { .. } => CageErrorKind::Structural,
            Self::CrossesNeighbour { .. }
            | Self::OrientationMismatch
            | Self::SelfIntersection2d
            | Self::SelfIntersection3d
            | Self::Triangulation(_) => CageErrorKind::Geometric,
            _ => CageErrorKind::InvalidArgument,
        }
    }
}
