//! Prism cells between consecutive keyframes.
//!
//! Cells form a binary tree over the skeleton index range. Leaves are also
//! threaded into an index-ordered doubly linked list through `prev`/`next`.

use serde::{Deserialize, Serialize};

use super::{KeyFrame, KeyFrameId};

/// Handle of a cell inside a [`BoundingCage`](super::BoundingCage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub(crate) usize);

impl CellId {
    #[must_use]
    pub fn slot(self) -> usize {
        self.0
    }
}

/// Prism geometry buffers of one cell, moved from parent to child on split.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MeshStorage {
    vertices: Vec<[f64; 3]>,
    faces: Vec<[u32; 3]>,
    face_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    left_keyframe: KeyFrameId,
    right_keyframe: KeyFrameId,
    min_index: f64,
    max_index: f64,
    left_child: Option<CellId>,
    right_child: Option<CellId>,
    prev: Option<CellId>,
    next: Option<CellId>,
    mesh: MeshStorage,
}

impl Cell {
    pub(crate) fn leaf(left: KeyFrameId, right: KeyFrameId, min_index: f64, max_index: f64) -> Self {
        Self {
            left_keyframe: left,
            right_keyframe: right,
            min_index,
            max_index,
            left_child: None,
            right_child: None,
            prev: None,
            next: None,
            mesh: MeshStorage::default(),
        }
    }

    #[must_use]
    pub fn left_keyframe(&self) -> KeyFrameId {
        self.left_keyframe
    }

    #[must_use]
    pub fn right_keyframe(&self) -> KeyFrameId {
        self.right_keyframe
    }

    #[must_use]
    pub fn min_index(&self) -> f64 {
        self.min_index
    }

    #[must_use]
    pub fn max_index(&self) -> f64 {
        self.max_index
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.left_child.is_none()
    }

    #[must_use]
    pub fn left_child(&self) -> Option<CellId> {
        self.left_child
    }

    #[must_use]
    pub fn right_child(&self) -> Option<CellId> {
        self.right_child
    }

    #[must_use]
    pub fn prev(&self) -> Option<CellId> {
        self.prev
    }

    #[must_use]
    pub fn next(&self) -> Option<CellId> {
        self.next
    }

    /// Prism vertices: the left polygon followed by the right one.
    #[must_use]
    pub fn mesh_vertices(&self) -> &[[f64; 3]] {
        &self.mesh.vertices
    }

    /// Closed, outward-wound prism triangles indexing [`mesh_vertices`](Self::mesh_vertices).
    #[must_use]
    pub fn mesh_faces(&self) -> &[[u32; 3]] {
        &self.mesh.faces
    }

    /// Slots of this cell's side faces in the cage mesh.
    #[must_use]
    pub fn mesh_face_indices(&self) -> &[usize] {
        &self.mesh.face_indices
    }

    pub(crate) fn set_links(&mut self, prev: Option<CellId>, next: Option<CellId>) {
        self.prev = prev;
        self.next = next;
    }

    pub(crate) fn set_prev(&mut self, prev: Option<CellId>) {
        self.prev = prev;
    }

    pub(crate) fn set_next(&mut self, next: Option<CellId>) {
        self.next = next;
    }

    /// Turn this leaf into an internal node. Its prism storage is handed back
    /// for one of the children to reuse.
    pub(crate) fn split(&mut self, left_child: CellId, right_child: CellId) -> MeshStorage {
        self.left_child = Some(left_child);
        self.right_child = Some(right_child);
        self.prev = None;
        self.next = None;
        std::mem::take(&mut self.mesh)
    }

    /// Build the prism with fresh storage. Shared-mesh slots are assigned by
    /// the cage afterwards.
    pub(crate) fn init_mesh(&mut self, left: &KeyFrame, right: &KeyFrame, ccw: bool) {
        let n = left.vertex_count();
        self.mesh = MeshStorage {
            vertices: Vec::with_capacity(2 * n),
            faces: Vec::with_capacity(4 * n - 4),
            face_indices: Vec::new(),
        };
        self.fill_prism(left, right, ccw);
    }

    /// Build the prism in the parent's storage, keeping its shared-mesh face
    /// slots.
    pub(crate) fn init_mesh_from(&mut self, parent: MeshStorage, left: &KeyFrame, right: &KeyFrame, ccw: bool) {
        self.mesh = parent;
        self.fill_prism(left, right, ccw);
    }

    /// Recompute the prism after one of the bounding polygons changed.
    pub(crate) fn rebuild_mesh(&mut self, left: &KeyFrame, right: &KeyFrame, ccw: bool) {
        self.fill_prism(left, right, ccw);
    }

    pub(crate) fn set_mesh_face_indices(&mut self, indices: Vec<usize>) {
        self.mesh.face_indices = indices;
    }

    fn fill_prism(&mut self, left: &KeyFrame, right: &KeyFrame, ccw: bool) {
        let n = left.vertex_count() as u32;
        let mesh = &mut self.mesh;
        mesh.vertices.clear();
        mesh.faces.clear();

        mesh.vertices
            .extend(left.vertices_3d().into_iter().map(|p| p.to_array()));
        mesh.vertices
            .extend(right.vertices_3d().into_iter().map(|p| p.to_array()));

        let left_rows: Vec<u32> = (0..n).collect();
        let right_rows: Vec<u32> = (n..2 * n).collect();
        mesh.faces.extend(side_faces(&left_rows, &right_rows, ccw));
        mesh.faces.extend(start_cap(left.triangles(), &left_rows));
        mesh.faces.extend(end_cap(right.triangles(), &right_rows));
    }
}

/// Two triangles per polygon edge joining `left` to `right`, wound outward.
pub(crate) fn side_faces(left: &[u32], right: &[u32], ccw: bool) -> Vec<[u32; 3]> {
    let n = left.len();
    let mut faces = Vec::with_capacity(2 * n);
    for j in 0..n {
        let k = (j + 1) % n;
        if ccw {
            faces.push([left[j], left[k], right[k]]);
            faces.push([left[j], right[k], right[j]]);
        } else {
            faces.push([left[j], right[k], left[k]]);
            faces.push([left[j], right[j], right[k]]);
        }
    }
    faces
}

/// Cap facing against the keyframe normal.
pub(crate) fn start_cap<'a>(triangles: &'a [[u32; 3]], rows: &'a [u32]) -> impl Iterator<Item = [u32; 3]> + 'a {
    triangles
        .iter()
        .map(|t| [rows[t[0] as usize], rows[t[2] as usize], rows[t[1] as usize]])
}

/// Cap facing along the keyframe normal.
pub(crate) fn end_cap<'a>(triangles: &'a [[u32; 3]], rows: &'a [u32]) -> impl Iterator<Item = [u32; 3]> + 'a {
    triangles
        .iter()
        .map(|t| [rows[t[0] as usize], rows[t[1] as usize], rows[t[2] as usize]])
}
