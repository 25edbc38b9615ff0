//! The graphics engine: GPU resource ownership and the stereo render pass.
//!
//! The engine is constructed once with the CPU-side assets for every entity
//! kind, uploads them into [`Mesh`]/[`Material`]/[`Shader`] wrappers, writes
//! the static uniforms and caches the per-frame uniform slots. After that,
//! every `render` call walks the two camera sides and the scene's entity
//! buckets and records one draw per entity into two half-screen viewports.
//!
//! Lifecycle: `new` enters the ready state; `destroy` consumes the engine
//! and releases every owned GPU resource exactly once, so rendering after
//! teardown is not expressible.

use std::collections::{BTreeMap, HashMap};
use std::iter;

use crate::{
    camera::Projection,
    context::Context,
    error::EngineError,
    resources::{
        decode_obj,
        material::{Material, material_layout},
        mesh::{Mesh, Vertex},
        shader::{Shader, UniformBlock, UniformTag},
    },
    scene::{Entity, EntityKind, Side, StereoRig},
};

/// Stride between dynamic-offset regions; wgpu's baseline minimum uniform
/// buffer offset alignment.
const UNIFORM_STRIDE: wgpu::BufferAddress = 256;

/// Bytes used inside one camera region: view + projection matrices.
const CAMERA_REGION_SIZE: wgpu::BufferAddress = 128;

/// Bytes used inside one per-draw region: model matrix + base color.
const DRAW_REGION_SIZE: wgpu::BufferAddress = 80;

/// Per-draw regions allocated up front; the buffer grows when a scene
/// spawns past this.
const INITIAL_DRAW_CAPACITY: usize = 64;

// TODO: per-entity tint once entities carry a color.
const BASE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// CPU-side geometry for one entity kind.
pub enum MeshSource {
    /// Line-oriented mesh text, decoded with [`decode_obj`].
    ObjText(String),
    /// Pre-built vertices, with indices defaulting to sequential order.
    Vertices {
        vertices: Vec<Vertex>,
        indices: Option<Vec<u32>>,
    },
}

/// Everything the engine links at startup: one mesh per renderable kind and
/// a material for each kind that should be drawn. A kind with a mesh but no
/// material is skipped by the render pass.
#[derive(Default)]
pub struct AssetBundle {
    pub meshes: Vec<(EntityKind, MeshSource)>,
    pub materials: Vec<(EntityKind, image::RgbaImage)>,
}

/// Owns all GPU resources and issues the two-viewport draw pass.
#[derive(Debug)]
pub struct GraphicsEngine {
    device: wgpu::Device,
    queue: wgpu::Queue,
    shader: Shader,
    meshes: HashMap<EntityKind, Mesh>,
    materials: HashMap<EntityKind, Material>,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_capacity: usize,
    clear_colour: wgpu::Color,
}

impl GraphicsEngine {
    /// Link assets, compile the shader, set the static uniforms and cache
    /// the per-frame uniform locations.
    pub async fn new(ctx: &Context, assets: AssetBundle) -> Result<Self, EngineError> {
        // Device and Queue are internally reference counted, the clones are
        // cheap handles.
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();

        let mut meshes = HashMap::new();
        for (kind, source) in assets.meshes {
            let label = format!("{:?}", kind);
            let mesh = match source {
                MeshSource::ObjText(text) => {
                    Mesh::from_corners(&device, &label, &decode_obj(&text)?)
                }
                MeshSource::Vertices { vertices, indices } => {
                    Mesh::new(&device, &label, &vertices, indices.as_deref())
                }
            };
            meshes.insert(kind, mesh);
        }

        let material_layout = material_layout(&device);
        let mut materials = HashMap::new();
        for (kind, image) in assets.materials {
            if !meshes.contains_key(&kind) {
                return Err(EngineError::Initialization(format!(
                    "material registered for {:?} without a mesh",
                    kind
                )));
            }
            let label = format!("{:?} material", kind);
            materials.insert(
                kind,
                Material::from_rgba(&device, &queue, &material_layout, &image, &label),
            );
        }

        let camera_layout = uniform_layout(&device, CAMERA_REGION_SIZE, "camera_bind_group_layout");
        let draw_layout = uniform_layout(&device, DRAW_REGION_SIZE, "draw_bind_group_layout");

        // Group order fixes the binding convention: 0 material, 1 camera,
        // 2 per-draw.
        let mut shader = Shader::new(
            &device,
            ctx.config.format,
            &[&material_layout, &camera_layout, &draw_layout],
            include_str!("stereo_shader.wgsl"),
            "stereo shader",
        )
        .await?;

        shader.cache_single_uniform(UniformTag::Model, "model")?;
        shader.cache_single_uniform(UniformTag::View, "view")?;
        shader.cache_single_uniform(UniformTag::Projection, "projection")?;
        shader.cache_single_uniform(UniformTag::BaseColor, "baseColor")?;

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera uniform buffer"),
            size: Side::BOTH.len() as wgpu::BufferAddress * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group =
            uniform_bind_group(&device, &camera_layout, &camera_buffer, CAMERA_REGION_SIZE);

        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("per-draw uniform buffer"),
            size: INITIAL_DRAW_CAPACITY as wgpu::BufferAddress * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let draw_bind_group =
            uniform_bind_group(&device, &draw_layout, &draw_buffer, DRAW_REGION_SIZE);

        let engine = Self {
            device,
            queue,
            shader,
            meshes,
            materials,
            camera_buffer,
            camera_bind_group,
            draw_buffer,
            draw_bind_group,
            draw_layout,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            clear_colour: wgpu::Color::BLACK,
        };
        engine.write_projection(&ctx.projection)?;
        Ok(engine)
    }

    /// Write the projection matrix into both eye regions. Called once at
    /// startup and again on window resize.
    pub fn write_projection(&self, projection: &Projection) -> Result<(), EngineError> {
        let slot = self.shader.single_location(UniformTag::Projection)?;
        let matrix: [[f32; 4]; 4] = projection.calc_matrix().into();
        for side_index in 0..Side::BOTH.len() as wgpu::BufferAddress {
            self.queue.write_buffer(
                &self.camera_buffer,
                side_index * UNIFORM_STRIDE + slot.offset,
                bytemuck::cast_slice(&[matrix]),
            );
        }
        Ok(())
    }

    /// Render the scene once: both eyes, all entity buckets.
    ///
    /// One camera sub-pass per side in fixed left-then-right order, each
    /// into its half of the window. Within a side, every bucket with a
    /// registered material binds its material once and draws each entity
    /// with freshly armed mesh bindings; the command stream is submitted
    /// once after both sides.
    pub fn render(
        &mut self,
        ctx: &Context,
        rig: &StereoRig,
        renderables: &BTreeMap<EntityKind, Vec<Entity>>,
    ) -> Result<(), EngineError> {
        let model_slot = self.shader.single_location(UniformTag::Model)?;
        let color_slot = self.shader.single_location(UniformTag::BaseColor)?;
        let view_slot = self.shader.single_location(UniformTag::View)?;
        debug_assert_eq!(model_slot.block, UniformBlock::Draw);
        debug_assert_eq!(view_slot.block, UniformBlock::Camera);

        let draw_count = renderables
            .iter()
            .filter(|&(kind, _)| self.materials.contains_key(kind))
            .map(|(_, entities)| entities.len())
            .sum::<usize>();
        self.ensure_draw_capacity(draw_count);

        // Model matrices are shared between the eyes, so each entity gets
        // one region written up front and addressed per draw by offset.
        let mut region = 0;
        for (kind, entities) in renderables {
            if !self.materials.contains_key(kind) {
                continue;
            }
            for entity in entities {
                let base = region as wgpu::BufferAddress * UNIFORM_STRIDE;
                let model: [[f32; 4]; 4] = entity.transform().model_matrix().into();
                self.queue.write_buffer(
                    &self.draw_buffer,
                    base + model_slot.offset,
                    bytemuck::cast_slice(&[model]),
                );
                self.queue.write_buffer(
                    &self.draw_buffer,
                    base + color_slot.offset,
                    bytemuck::cast_slice(&BASE_COLOR),
                );
                region += 1;
            }
        }

        for (side_index, side) in Side::BOTH.into_iter().enumerate() {
            let view: [[f32; 4]; 4] = rig.camera(side).view_matrix().into();
            self.queue.write_buffer(
                &self.camera_buffer,
                side_index as wgpu::BufferAddress * UNIFORM_STRIDE + view_slot.offset,
                bytemuck::cast_slice(&[view]),
            );
        }

        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("stereo render encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("stereo render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.shader.activate(&mut render_pass);

            let half_width = (ctx.config.width / 2) as f32;
            let height = ctx.config.height as f32;

            for (side_index, _) in Side::BOTH.into_iter().enumerate() {
                render_pass.set_viewport(
                    side_index as f32 * half_width,
                    0.0,
                    half_width,
                    height,
                    0.0,
                    1.0,
                );
                render_pass.set_bind_group(
                    1,
                    &self.camera_bind_group,
                    &[(side_index as wgpu::BufferAddress * UNIFORM_STRIDE) as wgpu::DynamicOffset],
                );

                let mut region = 0;
                for (kind, entities) in renderables {
                    let Some(material) = self.materials.get(kind) else {
                        continue;
                    };
                    let Some(mesh) = self.meshes.get_mut(kind) else {
                        continue;
                    };
                    material.bind(&mut render_pass);

                    for _ in entities {
                        // Each draw consumes the armed state, and the arm
                        // must be repeated per side anyway since the other
                        // eye's pass rebinds meshes in between.
                        mesh.arm(&mut render_pass);
                        render_pass.set_bind_group(
                            2,
                            &self.draw_bind_group,
                            &[(region as wgpu::BufferAddress * UNIFORM_STRIDE)
                                as wgpu::DynamicOffset],
                        );
                        mesh.draw(&mut render_pass)?;
                        region += 1;
                    }
                }
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Release every owned GPU resource. Consuming `self` makes a second
    /// destroy, or a render after destroy, a compile error.
    pub fn destroy(self) {
        for mesh in self.meshes.into_values() {
            mesh.destroy();
        }
        for material in self.materials.into_values() {
            material.destroy();
        }
        self.shader.destroy();
        self.camera_buffer.destroy();
        self.draw_buffer.destroy();
    }

    fn ensure_draw_capacity(&mut self, needed: usize) {
        if needed <= self.draw_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        log::info!("growing per-draw uniform buffer to {} regions", capacity);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("per-draw uniform buffer"),
            size: capacity as wgpu::BufferAddress * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.draw_bind_group =
            uniform_bind_group(&self.device, &self.draw_layout, &buffer, DRAW_REGION_SIZE);
        let old = std::mem::replace(&mut self.draw_buffer, buffer);
        old.destroy();
        self.draw_capacity = capacity;
    }
}

/// Layout for a dynamic-offset uniform buffer binding.
fn uniform_layout(
    device: &wgpu::Device,
    min_size: wgpu::BufferAddress,
    label: &str,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(min_size),
            },
            count: None,
        }],
        label: Some(label),
    })
}

fn uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    region_size: wgpu::BufferAddress,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(region_size),
            }),
        }],
        label: None,
    })
}
