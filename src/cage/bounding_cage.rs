use crate::geom::{
    Frame, GeomMesh, Point2, Point3, SmoothPolylineOptions, Tolerance, Triangle3, Vec3, is_simple_polygon,
    length_between, point_at_index, polyline_tangents, samples_between, smooth_polyline,
    tangent_at_index, triangles_intersect,
};

use super::cell::{end_cap, side_faces, start_cap};
use super::{
    CageError, CageMesh, CageOptions, Cell, CellCursor, CellId, Cells, KeyFrame, KeyFrameCursor,
    KeyFrameId, KeyFrames,
};

/// A chain of prism cells wrapped around a skeleton polyline.
///
/// Cells and keyframes live in arenas and refer to each other by id. The
/// cell tree answers containment queries by index; its leaves, linked in
/// index order, make up the cage. The cage surface is kept in one shared
/// mesh that grows as cells are split.
#[derive(Debug, Clone)]
pub struct BoundingCage {
    options: CageOptions,
    skeleton: Vec<Point3>,
    smooth_skeleton: Vec<Point3>,
    tangents: Vec<Vec3>,
    cells: Vec<Cell>,
    keyframes: Vec<KeyFrame>,
    root: Option<CellId>,
    head: Option<CellId>,
    tail: Option<CellId>,
    leaf_count: usize,
    mesh: CageMesh,
    start_cap: Vec<usize>,
    end_cap: Vec<usize>,
    ccw: bool,
    version: u64,
}

impl BoundingCage {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(CageOptions::default())
    }

    #[must_use]
    pub fn with_options(options: CageOptions) -> Self {
        Self {
            options,
            skeleton: Vec::new(),
            smooth_skeleton: Vec::new(),
            tangents: Vec::new(),
            cells: Vec::new(),
            keyframes: Vec::new(),
            root: None,
            head: None,
            tail: None,
            leaf_count: 0,
            mesh: CageMesh::default(),
            start_cap: Vec::new(),
            end_cap: Vec::new(),
            ccw: true,
            version: 0,
        }
    }

    #[must_use]
    pub fn options(&self) -> &CageOptions {
        &self.options
    }

    /// New options apply to subsequent operations; existing geometry is kept.
    pub fn set_options(&mut self, options: CageOptions) {
        self.options = options;
    }

    // ───────────────────────────────────────────────────────────────────────
    // Construction
    // ───────────────────────────────────────────────────────────────────────

    /// Rebuild the cage around `points`.
    ///
    /// The skeleton is smoothed for `smoothing_iters` passes, then one
    /// keyframe shaped like `polygon_template` is placed at each end and a
    /// single root cell spans the whole range. On error the cage is left as
    /// it was.
    pub fn set_skeleton_vertices(
        &mut self,
        points: &[Point3],
        smoothing_iters: usize,
        polygon_template: &[Point2],
    ) -> Result<(), CageError> {
        let (smooth, tangents, first, last) = self
            .prepare_skeleton(points, smoothing_iters, polygon_template)
            .inspect_err(|err| log::warn!("set_skeleton_vertices rejected: {err}"))?;

        self.reset();
        self.skeleton = points.to_vec();
        self.smooth_skeleton = smooth;
        self.tangents = tangents;
        self.ccw = first.is_ccw();

        let first_id = self.push_keyframe(first);
        let last_id = self.push_keyframe(last);
        let root = CellId(0);

        let mut cell = Cell::leaf(first_id, last_id, 0.0, self.keyframes[last_id.0].index());
        cell.init_mesh(&self.keyframes[first_id.0], &self.keyframes[last_id.0], self.ccw);
        let faces = side_faces(
            self.keyframes[first_id.0].mesh_vertex_indices(),
            self.keyframes[last_id.0].mesh_vertex_indices(),
            self.ccw,
        );
        cell.set_mesh_face_indices(self.mesh.push_faces(&faces));
        self.cells.push(cell);

        self.keyframes[first_id.0].set_right_cell(Some(root));
        self.keyframes[last_id.0].set_left_cell(Some(root));

        let start: Vec<[u32; 3]> = {
            let kf = &self.keyframes[first_id.0];
            start_cap(kf.triangles(), kf.mesh_vertex_indices()).collect()
        };
        self.start_cap = self.mesh.push_faces(&start);
        let end: Vec<[u32; 3]> = {
            let kf = &self.keyframes[last_id.0];
            end_cap(kf.triangles(), kf.mesh_vertex_indices()).collect()
        };
        self.end_cap = self.mesh.push_faces(&end);

        self.root = Some(root);
        self.head = Some(root);
        self.tail = Some(root);
        self.leaf_count = 1;
        self.version += 1;

        log::debug!(
            "cage: skeleton set ({} samples, {} smoothing passes, {}-gon template)",
            points.len(),
            smoothing_iters,
            polygon_template.len()
        );
        Ok(())
    }

    fn prepare_skeleton(
        &self,
        points: &[Point3],
        smoothing_iters: usize,
        polygon_template: &[Point2],
    ) -> Result<(Vec<Point3>, Vec<Vec3>, KeyFrame, KeyFrame), CageError> {
        if points.len() < 2 {
            return Err(CageError::TooFewSkeletonPoints { count: points.len() });
        }
        if points.iter().any(|p| !p.is_finite()) || polygon_template.iter().any(|p| !p.is_finite()) {
            return Err(CageError::NonFinite);
        }
        if polygon_template.len() < 3 {
            return Err(CageError::TooFewTemplatePoints {
                count: polygon_template.len(),
            });
        }
        let tol = self.options.tolerance;
        if !is_simple_polygon(polygon_template, tol) {
            return Err(CageError::NonSimpleTemplate);
        }

        let (smooth, _) = smooth_polyline(
            points,
            SmoothPolylineOptions::new(self.options.smoothing_strength, smoothing_iters),
        );
        let tangents = polyline_tangents(&smooth, tol).ok_or(CageError::DegenerateSkeleton)?;
        let first_frame = Frame::from_normal(tangents[0]).ok_or(CageError::DegenerateSkeleton)?;
        let last_frame = tangents[1..]
            .iter()
            .fold(first_frame, |frame, tangent| frame.transported(*tangent, tol));

        let last_index = smooth.len() - 1;
        let first = KeyFrame::explicit(0.0, first_frame, smooth[0], polygon_template.to_vec(), tol)?;
        let last = KeyFrame::explicit(
            last_index as f64,
            last_frame,
            smooth[last_index],
            polygon_template.to_vec(),
            tol,
        )?;
        Ok((smooth, tangents, first, last))
    }

    /// Drop every cell, keyframe, the skeleton and the mesh.
    pub fn clear(&mut self) {
        self.reset();
        self.mesh.clear();
        self.version += 1;
        log::debug!("cage: cleared");
    }

    fn reset(&mut self) {
        self.skeleton.clear();
        self.smooth_skeleton.clear();
        self.tangents.clear();
        self.cells.clear();
        self.keyframes.clear();
        self.root = None;
        self.head = None;
        self.tail = None;
        self.leaf_count = 0;
        self.start_cap.clear();
        self.end_cap.clear();
        self.mesh = CageMesh::with_capacity(
            self.options.initial_vertex_capacity,
            self.options.initial_face_capacity,
        );
    }

    fn push_keyframe(&mut self, mut keyframe: KeyFrame) -> KeyFrameId {
        let rows: Vec<[f64; 3]> = keyframe
            .vertices_3d()
            .into_iter()
            .map(Point3::to_array)
            .collect();
        keyframe.set_mesh_vertex_indices(self.mesh.push_vertices(&rows));
        let id = KeyFrameId(self.keyframes.len());
        self.keyframes.push(keyframe);
        id
    }

    // ───────────────────────────────────────────────────────────────────────
    // Splitting
    // ───────────────────────────────────────────────────────────────────────

    /// Insert a keyframe at `index`, splitting the leaf that contains it.
    ///
    /// If a keyframe already sits at `index` its id is returned and nothing
    /// changes.
    pub fn split(&mut self, index: f64) -> Result<KeyFrameId, CageError> {
        let leaf = self.containing_leaf(index)?;
        if let Some(existing) = self.keyframe_at(leaf, index) {
            log::trace!("split at {index}: keyframe {existing:?} already there");
            return Ok(existing);
        }
        let keyframe = self.interpolated_keyframe(leaf, index)?;
        self.split_leaf(leaf, keyframe)
    }

    /// Insert a keyframe previously obtained from
    /// [`keyframe_for_index`](Self::keyframe_for_index), possibly edited.
    pub fn split_keyframe(&mut self, keyframe: &KeyFrame) -> Result<KeyFrameId, CageError> {
        let index = keyframe.index();
        let leaf = self.containing_leaf(index)?;
        if let Some(existing) = self.keyframe_at(leaf, index) {
            return Ok(existing);
        }
        self.split_leaf(leaf, keyframe.detached())
    }

    /// The keyframe [`split`](Self::split) would insert at `index`, without
    /// inserting it.
    pub fn keyframe_for_index(&self, index: f64) -> Result<KeyFrame, CageError> {
        let leaf = self.containing_leaf(index)?;
        if let Some(existing) = self.keyframe_at(leaf, index) {
            return Ok(self.keyframes[existing.0].detached());
        }
        self.interpolated_keyframe(leaf, index)
    }

    fn containing_leaf(&self, index: f64) -> Result<CellId, CageError> {
        if self.is_empty() {
            return Err(CageError::Empty);
        }
        self.find_leaf(index).ok_or(CageError::IndexOutOfRange {
            index,
            min: self.min_index(),
            max: self.max_index(),
        })
    }

    fn keyframe_at(&self, leaf: CellId, index: f64) -> Option<KeyFrameId> {
        let cell = &self.cells[leaf.0];
        [cell.left_keyframe(), cell.right_keyframe()]
            .into_iter()
            .find(|id| self.keyframes[id.0].index() == index)
    }

    fn interpolated_keyframe(&self, leaf: CellId, index: f64) -> Result<KeyFrame, CageError> {
        let cell = &self.cells[leaf.0];
        let left = &self.keyframes[cell.left_keyframe().0];
        let right = &self.keyframes[cell.right_keyframe().0];

        let t = (index - left.index()) / (right.index() - left.index());
        let reference = if index - left.index() <= right.index() - index {
            left
        } else {
            right
        };
        let vertices = left
            .vertices_2d()
            .iter()
            .zip(right.vertices_2d())
            .map(|(a, b)| a.lerp(*b, t))
            .collect();

        KeyFrame::transported(
            reference,
            index,
            tangent_at_index(&self.tangents, index),
            point_at_index(&self.smooth_skeleton, index),
            vertices,
        )
    }

    fn split_leaf(&mut self, leaf: CellId, keyframe: KeyFrame) -> Result<KeyFrameId, CageError> {
        let index = keyframe.index();
        self.check_split(leaf, &keyframe)
            .inspect_err(|err| log::warn!("split at {index} rejected: {err}"))?;
        Ok(self.commit_split(leaf, keyframe))
    }

    /// Every way a split can fail, checked before anything is touched.
    fn check_split(&self, leaf: CellId, keyframe: &KeyFrame) -> Result<(), CageError> {
        let cell = &self.cells[leaf.0];
        let left = &self.keyframes[cell.left_keyframe().0];
        let right = &self.keyframes[cell.right_keyframe().0];
        let index = keyframe.index();
        let tol = self.options.tolerance;

        if !(left.index() < index && index < right.index()) {
            return Err(CageError::IndexOutOfRange {
                index,
                min: left.index(),
                max: right.index(),
            });
        }
        if keyframe.vertex_count() != left.vertex_count() {
            return Err(CageError::PointCountMismatch {
                expected: left.vertex_count(),
                got: keyframe.vertex_count(),
            });
        }
        if !keyframe.center().is_finite() || keyframe.vertices_2d().iter().any(|p| !p.is_finite()) {
            return Err(CageError::NonFinite);
        }
        if !is_simple_polygon(keyframe.vertices_2d(), tol) {
            return Err(CageError::SelfIntersection2d);
        }
        if keyframe.is_ccw() != self.ccw {
            return Err(CageError::OrientationMismatch);
        }

        self.check_side_support(left, keyframe, index)?;
        self.check_side_support(keyframe, right, index)?;

        if self.options.validate_splits
            && !(is_ordered(left, keyframe, tol.eps) && is_ordered(keyframe, right, tol.eps))
        {
            return Err(CageError::CrossesNeighbour { index });
        }
        Ok(())
    }

    /// A side must trace a non-empty stretch of skeleton whose interior
    /// samples lie between its two keyframe planes.
    fn check_side_support(&self, a: &KeyFrame, b: &KeyFrame, index: f64) -> Result<(), CageError> {
        let tol = self.options.tolerance;
        if length_between(&self.smooth_skeleton, a.index(), b.index()) <= tol.eps {
            return Err(CageError::UnsupportedSplit { index });
        }
        if self.options.validate_splits {
            let supported = samples_between(self.smooth_skeleton.len(), a.index(), b.index()).all(|s| {
                let p = self.smooth_skeleton[s];
                a.plane_distance(p) > tol.eps && b.plane_distance(p) < -tol.eps
            });
            if !supported {
                return Err(CageError::UnsupportedSplit { index });
            }
        }
        Ok(())
    }

    fn commit_split(&mut self, leaf: CellId, keyframe: KeyFrame) -> KeyFrameId {
        let ccw = self.ccw;
        let index = keyframe.index();
        let (left_id, right_id, prev, next, min, max) = {
            let cell = &self.cells[leaf.0];
            (
                cell.left_keyframe(),
                cell.right_keyframe(),
                cell.prev(),
                cell.next(),
                cell.min_index(),
                cell.max_index(),
            )
        };

        let new_id = self.push_keyframe(keyframe);
        let left_child = CellId(self.cells.len());
        let right_child = CellId(self.cells.len() + 1);
        let storage = self.cells[leaf.0].split(left_child, right_child);

        // The left child takes over the parent's prism buffers and face slots.
        let mut left_cell = Cell::leaf(left_id, new_id, min, index);
        left_cell.init_mesh_from(storage, &self.keyframes[left_id.0], &self.keyframes[new_id.0], ccw);
        let faces = side_faces(
            self.keyframes[left_id.0].mesh_vertex_indices(),
            self.keyframes[new_id.0].mesh_vertex_indices(),
            ccw,
        );
        for (&slot, face) in left_cell.mesh_face_indices().iter().zip(faces) {
            self.mesh.set_face(slot, face);
        }
        left_cell.set_links(prev, Some(right_child));

        let mut right_cell = Cell::leaf(new_id, right_id, index, max);
        right_cell.init_mesh(&self.keyframes[new_id.0], &self.keyframes[right_id.0], ccw);
        let faces = side_faces(
            self.keyframes[new_id.0].mesh_vertex_indices(),
            self.keyframes[right_id.0].mesh_vertex_indices(),
            ccw,
        );
        right_cell.set_mesh_face_indices(self.mesh.push_faces(&faces));
        right_cell.set_links(Some(left_child), next);

        self.cells.push(left_cell);
        self.cells.push(right_cell);

        match prev {
            Some(prev) => self.cells[prev.0].set_next(Some(left_child)),
            None => self.head = Some(left_child),
        }
        match next {
            Some(next) => self.cells[next.0].set_prev(Some(right_child)),
            None => self.tail = Some(right_child),
        }

        self.keyframes[left_id.0].set_right_cell(Some(left_child));
        self.keyframes[new_id.0].set_left_cell(Some(left_child));
        self.keyframes[new_id.0].set_right_cell(Some(right_child));
        self.keyframes[right_id.0].set_left_cell(Some(right_child));

        self.leaf_count += 1;
        self.version += 1;
        log::debug!(
            "cage: split cell {} at {index} ({} leaves, {} vertices, {} faces)",
            leaf.0,
            self.leaf_count,
            self.mesh.num_vertices(),
            self.mesh.num_faces()
        );
        new_id
    }

    // ───────────────────────────────────────────────────────────────────────
    // Editing
    // ───────────────────────────────────────────────────────────────────────

    /// Move point `i` of a keyframe in the cage to `new_pos` (local frame).
    ///
    /// `validate_2d` rejects edits that make the polygon self-intersect;
    /// `validate_3d` additionally rejects edits that fold the neighbouring
    /// cells. A rejected edit changes nothing. The shared mesh and the
    /// neighbouring prisms follow a successful edit.
    pub fn move_point_2d(
        &mut self,
        keyframe: KeyFrameId,
        i: usize,
        new_pos: Point2,
        validate_2d: bool,
        validate_3d: bool,
    ) -> Result<(), CageError> {
        let kf = self
            .keyframes
            .get(keyframe.0)
            .ok_or(CageError::UnknownKeyFrame(keyframe))?;
        let (vertices, triangles) = kf
            .edited_polygon(i, new_pos, validate_2d)
            .and_then(|edit| {
                if validate_3d {
                    self.check_edit_3d(kf, i, new_pos)?;
                }
                Ok(edit)
            })
            .inspect_err(|err| log::warn!("move_point_2d({keyframe:?}, {i}) rejected: {err}"))?;

        let row = kf.mesh_vertex_indices()[i];
        let world = kf.to_world(new_pos);
        let (left_cell, right_cell) = (kf.left_cell(), kf.right_cell());

        self.keyframes[keyframe.0].set_polygon(vertices, triangles);
        self.mesh.set_vertex(row, world.to_array());

        for cell in [left_cell, right_cell].into_iter().flatten() {
            let (l, r) = {
                let c = &self.cells[cell.0];
                (c.left_keyframe(), c.right_keyframe())
            };
            self.cells[cell.0].rebuild_mesh(&self.keyframes[l.0], &self.keyframes[r.0], self.ccw);
        }

        // End keyframes carry a cap whose triangulation may have changed.
        let kf = &self.keyframes[keyframe.0];
        if left_cell.is_none() {
            let faces = start_cap(kf.triangles(), kf.mesh_vertex_indices());
            for (&slot, face) in self.start_cap.iter().zip(faces) {
                self.mesh.set_face(slot, face);
            }
        }
        if right_cell.is_none() {
            let faces = end_cap(kf.triangles(), kf.mesh_vertex_indices());
            for (&slot, face) in self.end_cap.iter().zip(faces) {
                self.mesh.set_face(slot, face);
            }
        }

        log::debug!("cage: moved point {i} of keyframe {}", keyframe.0);
        Ok(())
    }

    fn check_edit_3d(&self, kf: &KeyFrame, i: usize, new_pos: Point2) -> Result<(), CageError> {
        let tol = self.options.tolerance;
        let moved = kf.to_world(new_pos);
        let n = kf.vertex_count() as u32;

        let mut edited = kf.vertices_3d();
        edited[i] = moved;

        if let Some(cell) = kf.left_cell() {
            let neighbour = &self.keyframes[self.cells[cell.0].left_keyframe().0];
            if neighbour.plane_distance(moved) <= tol.eps
                || prism_sides_intersect(&neighbour.vertices_3d(), &edited, n + i as u32, self.ccw, tol)
            {
                return Err(CageError::SelfIntersection3d);
            }
        }
        if let Some(cell) = kf.right_cell() {
            let neighbour = &self.keyframes[self.cells[cell.0].right_keyframe().0];
            if neighbour.plane_distance(moved) >= -tol.eps
                || prism_sides_intersect(&edited, &neighbour.vertices_3d(), i as u32, self.ccw, tol)
            {
                return Err(CageError::SelfIntersection3d);
            }
        }
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────────
    // Queries
    // ───────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Structural version, bumped by every change to the cell tree.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn min_index(&self) -> f64 {
        self.root.map_or(0.0, |root| self.cells[root.0].min_index())
    }

    #[must_use]
    pub fn max_index(&self) -> f64 {
        self.root.map_or(0.0, |root| self.cells[root.0].max_index())
    }

    #[must_use]
    pub fn skeleton_vertices(&self) -> &[Point3] {
        &self.skeleton
    }

    #[must_use]
    pub fn smooth_skeleton_vertices(&self) -> &[Point3] {
        &self.smooth_skeleton
    }

    /// Number of leaf cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.leaf_count
    }

    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    #[must_use]
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    #[must_use]
    pub fn keyframe(&self, id: KeyFrameId) -> Option<&KeyFrame> {
        self.keyframes.get(id.0)
    }

    #[must_use]
    pub fn root(&self) -> Option<CellId> {
        self.root
    }

    /// Leaf whose range holds `index`. A left child covers `[min, max)` and a
    /// right child `[min, max]`, so shared boundaries go right.
    #[must_use]
    pub fn find_leaf(&self, index: f64) -> Option<CellId> {
        let root = self.root?;
        let root_cell = &self.cells[root.0];
        if !(index >= root_cell.min_index() && index <= root_cell.max_index()) {
            return None;
        }

        let mut id = root;
        loop {
            let cell = &self.cells[id.0];
            let (Some(left), Some(right)) = (cell.left_child(), cell.right_child()) else {
                return Some(id);
            };
            id = if index < self.cells[left.0].max_index() { left } else { right };
            log::trace!("find_leaf({index}): descend to cell {}", id.0);
        }
    }

    /// Leaf cells in index order.
    #[must_use]
    pub fn cells(&self) -> Cells<'_> {
        Cells::new(self, self.head, self.tail, self.leaf_count)
    }

    /// Keyframes in index order.
    #[must_use]
    pub fn keyframes(&self) -> KeyFrames<'_> {
        KeyFrames::new(
            self,
            self.first_keyframe(),
            self.last_keyframe(),
            self.keyframes.len(),
        )
    }

    #[must_use]
    pub fn first_keyframe(&self) -> Option<KeyFrameId> {
        self.head.map(|id| self.cells[id.0].left_keyframe())
    }

    #[must_use]
    pub fn last_keyframe(&self) -> Option<KeyFrameId> {
        self.tail.map(|id| self.cells[id.0].right_keyframe())
    }

    #[must_use]
    pub fn cells_begin(&self) -> CellCursor {
        CellCursor::new(self.head, self.version)
    }

    #[must_use]
    pub fn cells_last(&self) -> CellCursor {
        CellCursor::new(self.tail, self.version)
    }

    #[must_use]
    pub fn cells_end(&self) -> CellCursor {
        CellCursor::new(None, self.version)
    }

    #[must_use]
    pub fn keyframes_begin(&self) -> KeyFrameCursor {
        KeyFrameCursor::new(self.first_keyframe(), self.version)
    }

    #[must_use]
    pub fn keyframes_last(&self) -> KeyFrameCursor {
        KeyFrameCursor::new(self.last_keyframe(), self.version)
    }

    #[must_use]
    pub fn keyframes_end(&self) -> KeyFrameCursor {
        KeyFrameCursor::new(None, self.version)
    }

    /// Cursor at `id`, if it is a keyframe of this cage.
    #[must_use]
    pub fn keyframe_cursor(&self, id: KeyFrameId) -> Option<KeyFrameCursor> {
        self.keyframe(id).map(|_| KeyFrameCursor::new(Some(id), self.version))
    }

    /// Cursor at `id`, if it is a leaf of this cage.
    #[must_use]
    pub fn cell_cursor(&self, id: CellId) -> Option<CellCursor> {
        self.cell(id)
            .filter(|cell| cell.is_leaf())
            .map(|_| CellCursor::new(Some(id), self.version))
    }

    /// Live cage vertex rows.
    #[must_use]
    pub fn vertices(&self) -> &[[f64; 3]] {
        self.mesh.vertices()
    }

    /// Live cage triangle rows.
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        self.mesh.faces()
    }

    #[must_use]
    pub fn mesh_buffer(&self) -> &CageMesh {
        &self.mesh
    }

    /// Owned copy of the cage surface.
    #[must_use]
    pub fn mesh(&self) -> GeomMesh {
        self.mesh.to_geom_mesh()
    }

    /// Walk the leaf list and check its links, the shared keyframes between
    /// neighbours and the closedness of the cage mesh.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.is_empty() {
            if self.leaf_count != 0 || !self.faces().is_empty() {
                return Err("empty cage still holds cells or faces".to_string());
            }
            return Ok(());
        }

        let mut prev: Option<(CellId, &Cell)> = None;
        let mut count = 0;
        for (id, cell) in self.cells() {
            count += 1;
            if !cell.is_leaf() {
                return Err(format!("cell {} in the leaf list has children", id.0));
            }
            if cell.min_index() >= cell.max_index() {
                return Err(format!("cell {} has an empty range", id.0));
            }
            let left = &self.keyframes[cell.left_keyframe().0];
            let right = &self.keyframes[cell.right_keyframe().0];
            if left.right_cell() != Some(id) || right.left_cell() != Some(id) {
                return Err(format!("keyframes of cell {} do not point back at it", id.0));
            }
            match prev {
                Some((prev_id, prev_cell)) => {
                    if cell.prev() != Some(prev_id) {
                        return Err(format!("cell {} has a broken prev link", id.0));
                    }
                    if prev_cell.right_keyframe() != cell.left_keyframe()
                        || prev_cell.max_index() != cell.min_index()
                    {
                        return Err(format!("cells {} and {} do not share a keyframe", prev_id.0, id.0));
                    }
                }
                None => {
                    if cell.prev().is_some() || left.left_cell().is_some() {
                        return Err("head cell has a predecessor".to_string());
                    }
                }
            }
            prev = Some((id, cell));
        }
        if count != self.leaf_count || count + 1 != self.keyframes.len() {
            return Err(format!(
                "leaf list has {count} cells, expected {} for {} keyframes",
                self.leaf_count,
                self.keyframes.len()
            ));
        }
        if prev.map(|(id, _)| id) != self.tail {
            return Err("leaf list does not end at the tail".to_string());
        }

        let mesh = self.mesh();
        mesh.validate()?;
        if !mesh.is_closed() {
            return Err(format!("cage mesh has {} open edges", mesh.open_edge_count()));
        }
        Ok(())
    }
}

impl Default for BoundingCage {
    fn default() -> Self {
        Self::new()
    }
}

/// `b` lies strictly in front of `a`'s plane and `a` strictly behind `b`'s.
fn is_ordered(a: &KeyFrame, b: &KeyFrame, eps: f64) -> bool {
    b.vertices_3d().into_iter().all(|p| a.plane_distance(p) > eps)
        && a.vertices_3d().into_iter().all(|p| b.plane_distance(p) < -eps)
}

/// True when a side triangle touching prism row `moved` crosses a side
/// triangle it shares no vertex with.
fn prism_sides_intersect(
    left: &[Point3],
    right: &[Point3],
    moved: u32,
    ccw: bool,
    tol: Tolerance,
) -> bool {
    let n = left.len() as u32;
    let points: Vec<Point3> = left.iter().chain(right).copied().collect();
    let left_rows: Vec<u32> = (0..n).collect();
    let right_rows: Vec<u32> = (n..2 * n).collect();
    let faces = side_faces(&left_rows, &right_rows, ccw);
    let triangle = |f: &[u32; 3]| {
        Triangle3::new(points[f[0] as usize], points[f[1] as usize], points[f[2] as usize])
    };

    faces.iter().filter(|f| f.contains(&moved)).any(|a| {
        faces
            .iter()
            .filter(|b| !b.iter().any(|v| a.contains(v)))
            .any(|b| triangles_intersect(triangle(a), triangle(b), tol))
    })
}
