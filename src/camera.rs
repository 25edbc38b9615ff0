//! Camera types and the projection for view/projection uniforms.
//!
//! A [`Camera`] is a [`Transform`] specialized with view-matrix derivation
//! and look-at targeting. The view matrix is recomputed on every read; it is
//! only passed to the shader once per frame, so there is no dirty-flag cache.

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, Rad, Vector3, perspective};

use crate::{error::EngineError, transform::Transform};

/// World-space up axis used by [`Camera::look_at`].
pub const WORLD_UP: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

/// A viewpoint into the scene.
///
/// The stored rotation is the camera's world orientation. Because it is kept
/// orthonormal (a [`Transform`] invariant), the view matrix can be derived by
/// transposing the rotation block instead of a full matrix inversion.
#[derive(Clone, Debug, Default)]
pub struct Camera {
    transform: Transform,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            transform: Transform::new(),
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.transform.position()
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.transform.set_position(position);
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// The world-to-eye matrix, recomputed on every call.
    ///
    /// Inverse of the camera's world transform: the linear block is the
    /// transpose of the rotation, the translation column is the negated,
    /// rotated position. Valid only while the rotation stays orthonormal.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let inverse_rotation = self.transform.rotation().transpose();
        let eye = self.transform.position();
        let mut view = Matrix4::from(inverse_rotation);
        view.w = (-(inverse_rotation * eye)).extend(1.0);
        view
    }

    /// Point the camera at a world-space target.
    ///
    /// Computes the forward, right and up basis vectors and stores them as
    /// the camera's rotation. Returns [`EngineError::DegenerateVector`] when
    /// the target coincides with the camera position or the line of sight is
    /// parallel to [`WORLD_UP`]; the rotation is left untouched in that case.
    pub fn look_at(&mut self, target: Vector3<f32>) -> Result<(), EngineError> {
        let forward = normalize(target - self.transform.position())?;
        let right = normalize(WORLD_UP.cross(forward))?;
        let up = forward.cross(right);
        self.transform
            .set_rotation(Matrix3::from_cols(right, up, forward));
        Ok(())
    }
}

/// Normalize a vector, signalling an error on zero length rather than
/// silently dividing by zero.
fn normalize(v: Vector3<f32>) -> Result<Vector3<f32>, EngineError> {
    let length = v.magnitude();
    if length == 0.0 {
        return Err(EngineError::DegenerateVector);
    }
    Ok(v / length)
}

/// cgmath produces OpenGL clip space (z in -1..1); wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective projection shared by both eyes.
///
/// The aspect ratio covers half the window width, since each eye renders
/// into its own half of a side-by-side split.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy: impl Into<Rad<f32>>, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: (width / 2).max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = (width / 2).max(1) as f32 / height.max(1) as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}
