//! parallax-ngin
//!
//! A stereoscopic side-by-side renderer for head-mounted displays. The crate
//! drives a single window split into two half-width viewports, one per eye,
//! with the eye cameras held apart at interpupillary distance by a stereo
//! rig. Scenes are buckets of entities grouped by kind; each kind shares one
//! mesh and one material, and the engine draws every entity once per eye
//! from its own camera.
//!
//! High-level modules
//! - `app`: window creation and the frame cycle (update, render, exit)
//! - `camera`: camera orientation, view matrices and the eye projection
//! - `context`: central GPU and window context that owns device/queue/surface
//! - `engine`: GPU resource ownership and the two-viewport render pass
//! - `resources`: meshes, materials, shaders and the asset decoders
//! - `scene`: entities, the stereo rig and per-frame simulation
//! - `slot`: latest-wins handoff cell used at the frame boundary
//! - `transform`: decomposed translation/rotation/scale transforms
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod engine;
pub mod error;
pub mod resources;
pub mod scene;
pub mod slot;
pub mod transform;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;
pub use winit::event::WindowEvent;
