//! The bounding cage: keyframes threaded along a skeleton, the prism cells
//! between them and the shared surface mesh.

mod bounding_cage;
mod cell;
mod cursor;
mod error;
mod keyframe;
mod mesh_buffer;
mod options;

pub use bounding_cage::BoundingCage;
pub use cell::{Cell, CellId};
pub use cursor::{CellCursor, Cells, KeyFrameCursor, KeyFrames};
pub use error::{CageError, CageErrorKind};
pub use keyframe::{KeyFrame, KeyFrameId};
pub use mesh_buffer::CageMesh;
pub use options::CageOptions;

#[cfg(test)]
mod tests;
