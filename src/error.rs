//! Error taxonomy for the engine.
//!
//! Every failure in the core is either a one-time setup failure or a logic
//! defect; there is no retry policy anywhere. The only recoverable condition
//! is an external decode failure ([`DecodeError`]) when reading mesh or
//! texture data.

use thiserror::Error;

use crate::resources::shader::UniformTag;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Window, context or device acquisition failed. Fatal, aborts startup.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// Shader compilation or pipeline linking failed. Carries the backend
    /// compiler's diagnostic text. Fatal, aborts startup.
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    /// A mesh was drawn without a prior arm. Programming error.
    #[error("mesh drawn without a prior arm")]
    NotArmed,

    /// A uniform tag was looked up before being cached, or a uniform name
    /// could not be resolved. Indicates a shader/engine mismatch.
    #[error("uniform {0:?} is not cached")]
    UnknownUniform(UniformTag),

    /// Attempted to normalize a zero-length vector.
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    /// The presentation surface failed to deliver a frame. The caller may
    /// reconfigure the surface on `Lost`/`Outdated`.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Failure while decoding an external asset. Unlike the other variants of
/// [`EngineError`] these are I/O conditions, not defects.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("i/o error while reading asset: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("malformed mesh directive at line {line}: {message}")]
    Mesh { line: usize, message: String },
}
