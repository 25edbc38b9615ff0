//! Placement of objects in the world.
//!
//! [`Transform`] stores translation, rotation and scale as three independent
//! homogeneous matrices and composes them on demand. Nothing is cached
//! between frames: the model matrix is recomputed on every read, which keeps
//! the type free of staleness bugs at the cost of a few multiplications in
//! the per-frame hot path.

use cgmath::{Matrix3, Matrix4, SquareMatrix, Vector3};

/// Position, rotation and scale of a placeable object.
///
/// The rotation block is expected to stay orthonormal and the scale diagonal
/// with positive entries. The setters do not validate this; callers are
/// responsible. This is a deliberate trade-off for the per-frame hot path.
#[derive(Clone, Debug)]
pub struct Transform {
    translation: Matrix4<f32>,
    rotation: Matrix4<f32>,
    scale: Matrix4<f32>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            translation: Matrix4::identity(),
            rotation: Matrix4::identity(),
            scale: Matrix4::identity(),
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.translation.w.truncate()
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.translation.w = position.extend(1.0);
    }

    /// The rotation block, mapping local space into world space.
    pub fn rotation(&self) -> Matrix3<f32> {
        Matrix3::from_cols(
            self.rotation.x.truncate(),
            self.rotation.y.truncate(),
            self.rotation.z.truncate(),
        )
    }

    /// Precondition: `rotation` must be orthonormal. Not checked.
    pub fn set_rotation(&mut self, rotation: Matrix3<f32>) {
        self.rotation = Matrix4::from(rotation);
    }

    /// Reconstructs the scale vector by multiplying the scale block with an
    /// all-ones vector. Equivalent to reading the diagonal directly as long
    /// as the block stays diagonal.
    pub fn scale(&self) -> Vector3<f32> {
        let block = Matrix3::from_cols(
            self.scale.x.truncate(),
            self.scale.y.truncate(),
            self.scale.z.truncate(),
        );
        block * Vector3::new(1.0, 1.0, 1.0)
    }

    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);
    }

    /// The composed world transform `translation * rotation * scale`,
    /// recomputed on every call.
    ///
    /// WGSL consumes column-major matrices, which is also how `cgmath` lays
    /// them out, so no transpose happens on upload.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.translation * self.rotation * self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
