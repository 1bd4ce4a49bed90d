//! Orthonormal cross-section frames and their parallel transport.
//!
//! A [`Frame`] is the local coordinate system of a planar cross-section: the
//! `normal` points along the skeleton, `right` and `up` span the section
//! plane. Frames are right-handed, so `right × up = normal`.
//!
//! Frames are propagated along a curve with the rotation-minimizing rule used
//! for single-rail sweeps: the previous basis is rotated by the smallest
//! rotation that carries the old normal onto the new one. Consecutive frames
//! therefore never pick up twist about the normal axis.

use serde::{Deserialize, Serialize};

use super::{Tolerance, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub right: Vec3,
    pub up: Vec3,
    pub normal: Vec3,
}

impl Frame {
    /// The world frame: right = X, up = Y, normal = Z.
    pub const WORLD: Self = Self {
        right: Vec3::X,
        up: Vec3::Y,
        normal: Vec3::Z,
    };

    /// Build a frame around `normal`, choosing an arbitrary but stable
    /// in-plane basis.
    ///
    /// Returns `None` if `normal` cannot be normalized.
    #[must_use]
    pub fn from_normal(normal: Vec3) -> Option<Self> {
        let normal = normal.normalized()?;

        let reference = if normal.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };

        let up = normal.cross(reference).normalized()?;
        let right = up.cross(normal);

        Some(Self { right, up, normal })
    }

    /// Rows of the 3x3 orientation matrix: `[right, up, normal]`.
    #[must_use]
    pub fn rows(&self) -> [[f64; 3]; 3] {
        [
            self.right.to_array(),
            self.up.to_array(),
            self.normal.to_array(),
        ]
    }

    /// Parallel-transport this frame so that its normal becomes `new_normal`.
    ///
    /// The basis is rotated about `normal × new_normal` by the angle between
    /// the two normals. When the normals are antiparallel the frame is turned
    /// half a turn about its `right` axis, which keeps it a proper rotation.
    #[must_use]
    pub fn transported(&self, new_normal: Vec3, tol: Tolerance) -> Self {
        let Some(new_normal) = new_normal.normalized() else {
            return *self;
        };
        let old_normal = self.normal;

        let cross = old_normal.cross(new_normal);
        let cross_len_sq = cross.length_squared();

        if cross_len_sq < tol.eps_squared() {
            if old_normal.dot(new_normal) < 0.0 {
                return Self {
                    right: self.right,
                    up: self.up.neg(),
                    normal: new_normal,
                };
            }
            return Self {
                right: self.right,
                up: self.up,
                normal: new_normal,
            };
        }

        let axis = cross.normalized().unwrap_or(self.up);
        let angle = old_normal.dot(new_normal).clamp(-1.0, 1.0).acos();

        let right = rotate_vector(self.right, axis, angle)
            .normalized()
            .unwrap_or(self.right);
        // Project out drift along the normal.
        let right = right
            .sub(new_normal.mul_scalar(right.dot(new_normal)))
            .normalized()
            .unwrap_or(right);
        let up = new_normal.cross(right);

        Self {
            right,
            up,
            normal: new_normal,
        }
    }

    /// Largest deviation from orthonormality over all row pairs.
    #[must_use]
    pub fn orthonormality_error(&self) -> f64 {
        let rows = [self.right, self.up, self.normal];
        let mut err = 0.0f64;
        for (i, a) in rows.iter().enumerate() {
            err = err.max((a.length() - 1.0).abs());
            for b in &rows[i + 1..] {
                err = err.max(a.dot(*b).abs());
            }
        }
        err
    }

    /// True when `right × up` points along `normal`.
    #[must_use]
    pub fn is_right_handed(&self) -> bool {
        self.right.cross(self.up).dot(self.normal) > 0.0
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::WORLD
    }
}

/// Rodrigues rotation of `v` about the unit vector `axis`.
#[must_use]
pub fn rotate_vector(v: Vec3, axis: Vec3, angle: f64) -> Vec3 {
    let cos_angle = angle.cos();
    let sin_angle = angle.sin();

    let k_cross_v = axis.cross(v);
    let k_dot_v = axis.dot(v);

    v.mul_scalar(cos_angle)
        .add(k_cross_v.mul_scalar(sin_angle))
        .add(axis.mul_scalar(k_dot_v * (1.0 - cos_angle)))
}
