//! Traversal of the leaf list and the keyframe sequence.
//!
//! Cursors are plain values that remember the structural version of the cage
//! they came from, so they can outlive a borrow of the cage. Any use after a
//! split, `set_skeleton_vertices` or `clear` reports
//! [`CageError::StaleCursor`]. The borrowing iterators returned by
//! [`BoundingCage::cells`] and [`BoundingCage::keyframes`] cover the common
//! read-only walk.

use super::{BoundingCage, CageError, Cell, CellId, KeyFrame, KeyFrameId};

/// Bidirectional cursor over leaf cells. `None` is the end sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellCursor {
    id: Option<CellId>,
    version: u64,
}

impl CellCursor {
    pub(crate) fn new(id: Option<CellId>, version: u64) -> Self {
        Self { id, version }
    }

    #[must_use]
    pub fn id(&self) -> Option<CellId> {
        self.id
    }

    #[must_use]
    pub fn is_end(&self) -> bool {
        self.id.is_none()
    }

    /// True when the cursor points at a cell and the cage has not changed
    /// shape since it was taken.
    #[must_use]
    pub fn valid(&self, cage: &BoundingCage) -> bool {
        self.id.is_some() && self.version == cage.version()
    }

    pub fn get<'a>(&self, cage: &'a BoundingCage) -> Result<&'a Cell, CageError> {
        self.check(cage)?;
        let id = self.id.ok_or(CageError::EndCursor)?;
        cage.cell(id).ok_or(CageError::StaleCursor)
    }

    /// Step to the next leaf; stepping past the tail yields the end cursor.
    pub fn next(&mut self, cage: &BoundingCage) -> Result<(), CageError> {
        self.id = self.get(cage)?.next();
        Ok(())
    }

    pub fn prev(&mut self, cage: &BoundingCage) -> Result<(), CageError> {
        self.id = self.get(cage)?.prev();
        Ok(())
    }

    fn check(&self, cage: &BoundingCage) -> Result<(), CageError> {
        if self.version == cage.version() {
            Ok(())
        } else {
            Err(CageError::StaleCursor)
        }
    }
}

/// Bidirectional cursor over keyframes in index order. `None` is the end
/// sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyFrameCursor {
    id: Option<KeyFrameId>,
    version: u64,
}

impl KeyFrameCursor {
    pub(crate) fn new(id: Option<KeyFrameId>, version: u64) -> Self {
        Self { id, version }
    }

    #[must_use]
    pub fn id(&self) -> Option<KeyFrameId> {
        self.id
    }

    #[must_use]
    pub fn is_end(&self) -> bool {
        self.id.is_none()
    }

    #[must_use]
    pub fn valid(&self, cage: &BoundingCage) -> bool {
        self.id.is_some() && self.version == cage.version()
    }

    pub fn get<'a>(&self, cage: &'a BoundingCage) -> Result<&'a KeyFrame, CageError> {
        if self.version != cage.version() {
            return Err(CageError::StaleCursor);
        }
        let id = self.id.ok_or(CageError::EndCursor)?;
        cage.keyframe(id).ok_or(CageError::StaleCursor)
    }

    /// Step across the right bounding cell to its right keyframe.
    pub fn next(&mut self, cage: &BoundingCage) -> Result<(), CageError> {
        let keyframe = self.get(cage)?;
        self.id = keyframe
            .right_cell()
            .and_then(|cell| cage.cell(cell))
            .map(Cell::right_keyframe);
        Ok(())
    }

    pub fn prev(&mut self, cage: &BoundingCage) -> Result<(), CageError> {
        let keyframe = self.get(cage)?;
        self.id = keyframe
            .left_cell()
            .and_then(|cell| cage.cell(cell))
            .map(Cell::left_keyframe);
        Ok(())
    }
}

/// Leaf cells in index order.
#[derive(Debug, Clone)]
pub struct Cells<'a> {
    cage: &'a BoundingCage,
    front: Option<CellId>,
    back: Option<CellId>,
    remaining: usize,
}

impl<'a> Cells<'a> {
    pub(crate) fn new(cage: &'a BoundingCage, head: Option<CellId>, tail: Option<CellId>, len: usize) -> Self {
        Self {
            cage,
            front: head,
            back: tail,
            remaining: len,
        }
    }
}

impl<'a> Iterator for Cells<'a> {
    type Item = (CellId, &'a Cell);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        let cell = self.cage.cell(id)?;
        self.front = cell.next();
        self.remaining -= 1;
        Some((id, cell))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Cells<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        let cell = self.cage.cell(id)?;
        self.back = cell.prev();
        self.remaining -= 1;
        Some((id, cell))
    }
}

impl ExactSizeIterator for Cells<'_> {}

/// Keyframes in index order, read off the leaf list.
#[derive(Debug, Clone)]
pub struct KeyFrames<'a> {
    cage: &'a BoundingCage,
    front: Option<KeyFrameId>,
    back: Option<KeyFrameId>,
    remaining: usize,
}

impl<'a> KeyFrames<'a> {
    pub(crate) fn new(
        cage: &'a BoundingCage,
        first: Option<KeyFrameId>,
        last: Option<KeyFrameId>,
        len: usize,
    ) -> Self {
        Self {
            cage,
            front: first,
            back: last,
            remaining: len,
        }
    }
}

impl<'a> Iterator for KeyFrames<'a> {
    type Item = (KeyFrameId, &'a KeyFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        let keyframe = self.cage.keyframe(id)?;
        self.front = keyframe
            .right_cell()
            .and_then(|cell| self.cage.cell(cell))
            .map(Cell::right_keyframe);
        self.remaining -= 1;
        Some((id, keyframe))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for KeyFrames<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        let keyframe = self.cage.keyframe(id)?;
        self.back = keyframe
            .left_cell()
            .and_then(|cell| self.cage.cell(cell))
            .map(Cell::left_keyframe);
        self.remaining -= 1;
        Some((id, keyframe))
    }
}

impl ExactSizeIterator for KeyFrames<'_> {}
