//! The shared cage mesh.
//!
//! Rows are allocated ahead of use: `cv`/`cf` hold `capacity` rows of which
//! only the first `num_vertices`/`num_faces` are live. Appending past the
//! allocation doubles it.

use crate::geom::GeomMesh;

const MIN_ROWS: usize = 16;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CageMesh {
    cv: Vec<[f64; 3]>,
    cf: Vec<[u32; 3]>,
    num_vertices: usize,
    num_faces: usize,
}

impl CageMesh {
    pub(crate) fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            cv: vec![[0.0; 3]; vertices],
            cf: vec![[0; 3]; faces],
            num_vertices: 0,
            num_faces: 0,
        }
    }

    /// Live vertex rows.
    #[must_use]
    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.cv[..self.num_vertices]
    }

    /// Live triangle rows, indexing into [`vertices`](Self::vertices).
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.cf[..self.num_faces]
    }

    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    #[must_use]
    pub fn num_faces(&self) -> usize {
        self.num_faces
    }

    #[must_use]
    pub fn vertex_capacity(&self) -> usize {
        self.cv.len()
    }

    #[must_use]
    pub fn face_capacity(&self) -> usize {
        self.cf.len()
    }

    /// Copy of the live prefix.
    #[must_use]
    pub fn to_geom_mesh(&self) -> GeomMesh {
        GeomMesh::from_triangles(self.vertices().to_vec(), self.faces())
    }

    /// Append vertex rows and return their row indices.
    pub(crate) fn push_vertices(&mut self, rows: &[[f64; 3]]) -> Vec<u32> {
        let start = self.num_vertices;
        grow_rows(&mut self.cv, start + rows.len(), "vertex");
        self.cv[start..start + rows.len()].copy_from_slice(rows);
        self.num_vertices += rows.len();
        (start..self.num_vertices).map(|i| i as u32).collect()
    }

    /// Append face rows and return their slots.
    pub(crate) fn push_faces(&mut self, rows: &[[u32; 3]]) -> Vec<usize> {
        let start = self.num_faces;
        grow_rows(&mut self.cf, start + rows.len(), "face");
        self.cf[start..start + rows.len()].copy_from_slice(rows);
        self.num_faces += rows.len();
        (start..self.num_faces).collect()
    }

    pub(crate) fn set_vertex(&mut self, row: u32, position: [f64; 3]) {
        if let Some(slot) = self.cv[..self.num_vertices].get_mut(row as usize) {
            *slot = position;
        }
    }

    pub(crate) fn set_face(&mut self, slot: usize, face: [u32; 3]) {
        if let Some(row) = self.cf[..self.num_faces].get_mut(slot) {
            *row = face;
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

fn grow_rows<T: Copy + Default>(rows: &mut Vec<T>, needed: usize, what: &str) {
    if needed <= rows.len() {
        return;
    }
    let mut capacity = rows.len().max(MIN_ROWS);
    while capacity < needed {
        capacity *= 2;
    }
    log::debug!("cage mesh: growing {what} rows {} -> {capacity}", rows.len());
    rows.resize(capacity, T::default());
}
