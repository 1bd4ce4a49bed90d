//! Cross-sections of the cage.
//!
//! A keyframe is a planar polygon expressed in a local frame anchored at a
//! scalar position along the skeleton. A 2D point `(x, y)` lives at
//! `center + x * right + y * up` in world space.

use serde::{Deserialize, Serialize};

use crate::geom::{
    Frame, Point2, Point3, Tolerance, Transform, Vec3, has_local_self_intersection,
    polygon_centroid, signed_area, triangulate_polygon,
};

use super::{CageError, CellId};

/// Handle of a keyframe inside a [`BoundingCage`](super::BoundingCage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyFrameId(pub(crate) usize);

impl KeyFrameId {
    #[must_use]
    pub fn slot(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyFrame {
    index: f64,
    frame: Frame,
    center: Point3,
    vertices_2d: Vec<Point2>,
    triangles: Vec<[u32; 3]>,
    mesh_vertex_indices: Vec<u32>,
    /// Leaf cells bounded by this keyframe: `[left, right]`.
    cells: [Option<CellId>; 2],
    tolerance: Tolerance,
}

impl KeyFrame {
    /// Keyframe with a frame and center given directly.
    pub(crate) fn explicit(
        index: f64,
        frame: Frame,
        center: Point3,
        vertices_2d: Vec<Point2>,
        tolerance: Tolerance,
    ) -> Result<Self, CageError> {
        let triangles = triangulate_polygon(&vertices_2d, tolerance)?;
        Ok(Self {
            index,
            frame,
            center,
            vertices_2d,
            triangles,
            mesh_vertex_indices: Vec::new(),
            cells: [None, None],
            tolerance,
        })
    }

    /// Keyframe whose frame is `reference`'s frame carried to `normal` by the
    /// minimal rotation.
    pub(crate) fn transported(
        reference: &KeyFrame,
        index: f64,
        normal: Vec3,
        center: Point3,
        vertices_2d: Vec<Point2>,
    ) -> Result<Self, CageError> {
        let frame = reference.frame.transported(normal, reference.tolerance);
        Self::explicit(index, frame, center, vertices_2d, reference.tolerance)
    }

    #[must_use]
    pub fn index(&self) -> f64 {
        self.index
    }

    #[must_use]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Rows `[right, up, normal]`.
    #[must_use]
    pub fn orientation(&self) -> [[f64; 3]; 3] {
        self.frame.rows()
    }

    #[must_use]
    pub fn normal(&self) -> Vec3 {
        self.frame.normal
    }

    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.frame.up
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.frame.right
    }

    #[must_use]
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Local-to-world map of the cross-section plane.
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform::from_axes(self.center, self.frame.right, self.frame.up, self.frame.normal)
    }

    #[must_use]
    pub fn vertices_2d(&self) -> &[Point2] {
        &self.vertices_2d
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices_2d.len()
    }

    #[must_use]
    pub fn vertices_3d(&self) -> Vec<Point3> {
        self.vertices_2d.iter().map(|p| self.to_world(*p)).collect()
    }

    #[must_use]
    pub fn to_world(&self, p: Point2) -> Point3 {
        self.center
            .add_vec(self.frame.right.mul_scalar(p.x))
            .add_vec(self.frame.up.mul_scalar(p.y))
    }

    #[must_use]
    pub fn centroid_2d(&self) -> Point2 {
        polygon_centroid(&self.vertices_2d)
    }

    #[must_use]
    pub fn centroid_3d(&self) -> Point3 {
        self.to_world(self.centroid_2d())
    }

    /// Signed distance of `p` from the keyframe plane, positive along the
    /// normal.
    #[must_use]
    pub fn plane_distance(&self, p: Point3) -> f64 {
        p.sub_point(self.center).dot(self.frame.normal)
    }

    /// Triangulation of the polygon, counter-clockwise in the local plane.
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Rows of this polygon in the cage mesh; empty until the keyframe is
    /// part of a cage.
    #[must_use]
    pub fn mesh_vertex_indices(&self) -> &[u32] {
        &self.mesh_vertex_indices
    }

    #[must_use]
    pub fn in_bounding_cage(&self) -> bool {
        !self.mesh_vertex_indices.is_empty()
    }

    #[must_use]
    pub fn left_cell(&self) -> Option<CellId> {
        self.cells[0]
    }

    #[must_use]
    pub fn right_cell(&self) -> Option<CellId> {
        self.cells[1]
    }

    #[must_use]
    pub(crate) fn is_ccw(&self) -> bool {
        signed_area(&self.vertices_2d) > 0.0
    }

    /// Replace point `i` of a keyframe that is not part of a cage.
    ///
    /// Keyframes inside a cage are edited through
    /// [`BoundingCage::move_point_2d`](super::BoundingCage::move_point_2d),
    /// which also keeps the cage mesh in sync.
    pub fn move_point_2d(&mut self, i: usize, new_pos: Point2, validate_2d: bool) -> Result<(), CageError> {
        let (vertices, triangles) = self.edited_polygon(i, new_pos, validate_2d)?;
        self.vertices_2d = vertices;
        self.triangles = triangles;
        Ok(())
    }

    /// Polygon and triangulation after moving point `i`, without touching
    /// `self`.
    pub(crate) fn edited_polygon(
        &self,
        i: usize,
        new_pos: Point2,
        validate_2d: bool,
    ) -> Result<(Vec<Point2>, Vec<[u32; 3]>), CageError> {
        let count = self.vertices_2d.len();
        if i >= count {
            return Err(CageError::PointOutOfRange { point: i, count });
        }
        if !new_pos.is_finite() {
            return Err(CageError::NonFinite);
        }

        let mut vertices = self.vertices_2d.clone();
        vertices[i] = new_pos;

        if validate_2d {
            if has_local_self_intersection(&vertices, i, self.tolerance) {
                return Err(CageError::SelfIntersection2d);
            }
            // A vertex dragged across the whole polygon can flip the winding
            // without crossing any edge.
            let area = signed_area(&vertices);
            if area.abs() <= self.tolerance.eps || (area > 0.0) != self.is_ccw() {
                return Err(CageError::SelfIntersection2d);
            }
        }

        let triangles = triangulate_polygon(&vertices, self.tolerance)?;
        Ok((vertices, triangles))
    }

    pub(crate) fn set_polygon(&mut self, vertices: Vec<Point2>, triangles: Vec<[u32; 3]>) {
        self.vertices_2d = vertices;
        self.triangles = triangles;
    }

    pub(crate) fn set_mesh_vertex_indices(&mut self, indices: Vec<u32>) {
        self.mesh_vertex_indices = indices;
    }

    pub(crate) fn set_left_cell(&mut self, cell: Option<CellId>) {
        self.cells[0] = cell;
    }

    pub(crate) fn set_right_cell(&mut self, cell: Option<CellId>) {
        self.cells[1] = cell;
    }

    /// Detached copy: same geometry, no cage bookkeeping.
    #[must_use]
    pub(crate) fn detached(&self) -> Self {
        Self {
            mesh_vertex_indices: Vec::new(),
            cells: [None, None],
            ..self.clone()
        }
    }
}
