//! Meshes and the arm/draw binding discipline.
//!
//! A [`Mesh`] owns one vertex buffer and one index buffer. Before it can be
//! drawn it must be *armed*: arming records the buffer bindings into the
//! active render pass and flips the mesh's [`BindState`]. Every draw consumes
//! the armed state, so a mesh whose bindings may have been clobbered by
//! another mesh's arm cannot be drawn by accident.

use wgpu::util::DeviceExt;

use crate::error::EngineError;

/// Interleaved vertex layout consumed by the stereo pipeline: position plus
/// 2D texture coordinate, fixed stride.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Two-state machine for the bind-before-draw contract.
///
/// `arm` makes the state `Armed`; `fire` requires `Armed` and always leaves
/// the state `Unarmed` again. Separated from [`Mesh`] so the contract is
/// testable without a GPU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BindState {
    #[default]
    Unarmed,
    Armed,
}

impl BindState {
    pub fn arm(&mut self) {
        *self = BindState::Armed;
    }

    /// Consume the armed state, or report the defect.
    pub fn fire(&mut self) -> Result<(), EngineError> {
        match self {
            BindState::Armed => {
                *self = BindState::Unarmed;
                Ok(())
            }
            BindState::Unarmed => Err(EngineError::NotArmed),
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, BindState::Armed)
    }
}

/// GPU vertex and index buffers for one piece of geometry.
#[derive(Debug)]
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    bind_state: BindState,
}

impl Mesh {
    /// Upload vertex data, with `indices` defaulting to the sequential
    /// `0..N-1` order when omitted.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        vertices: &[Vertex],
        indices: Option<&[u32]>,
    ) -> Self {
        let sequential;
        let indices = match indices {
            Some(indices) => indices,
            None => {
                sequential = (0..vertices.len() as u32).collect::<Vec<_>>();
                &sequential
            }
        };

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} vertex buffer", label)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} index buffer", label)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            bind_state: BindState::Unarmed,
        }
    }

    /// Build a mesh from the flat 8-floats-per-corner output of
    /// [`crate::resources::decode_obj`]. Normals are parsed upstream but the
    /// pipeline's vertex layout does not consume them.
    pub fn from_corners(device: &wgpu::Device, label: &str, corners: &[f32]) -> Self {
        let vertices = corners
            .chunks_exact(super::FLOATS_PER_CORNER)
            .map(|corner| Vertex {
                position: [corner[0], corner[1], corner[2]],
                tex_coords: [corner[3], corner[4]],
            })
            .collect::<Vec<_>>();
        Self::new(device, label, &vertices, None)
    }

    /// Bind this mesh's vertex state into the pass and arm it for the next
    /// draw.
    pub fn arm(&mut self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.bind_state.arm();
    }

    /// Issue the draw call for the armed bindings.
    ///
    /// Requires a prior [`arm`](Self::arm) and always leaves the mesh
    /// unarmed, forcing a re-arm before the next draw.
    pub fn draw(&mut self, render_pass: &mut wgpu::RenderPass<'_>) -> Result<(), EngineError> {
        self.bind_state.fire()?;
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        Ok(())
    }

    pub fn is_armed(&self) -> bool {
        self.bind_state.is_armed()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Release both GPU buffers. Consumes the mesh; the lifecycle calls this
    /// exactly once at engine teardown.
    pub fn destroy(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}
