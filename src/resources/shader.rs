//! Shader compilation and the uniform slot cache.
//!
//! [`Shader`] compiles the WGSL source into the one render pipeline the
//! engine uses, inside a validation error scope so compile and link failures
//! surface as [`EngineError::ShaderCompile`] with the backend's diagnostic
//! text instead of a panic.
//!
//! Uniform inputs are addressed through [`UniformSlot`]s: a named field of
//! one of the pipeline's uniform blocks, resolved once at startup and cached
//! under a [`UniformTag`]. The engine writes per-frame values (model, view,
//! base color) through the cached slots; looking up a tag that was never
//! cached is a shader/engine mismatch and fails loudly.

use std::collections::HashMap;

use crate::{error::EngineError, resources::mesh::Vertex, resources::texture::Texture};

/// Engine-side identifier for a shader uniform input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniformTag {
    Model,
    View,
    Projection,
    BaseColor,
}

/// The uniform buffer a slot lives in.
///
/// `Camera` holds one region per eye (view + projection), `Draw` one region
/// per entity (model + base color), both addressed with dynamic offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformBlock {
    Camera,
    Draw,
}

/// Location of one uniform field: its block plus the byte offset and size
/// within a single dynamic-offset region of that block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformSlot {
    pub block: UniformBlock,
    pub offset: wgpu::BufferAddress,
    pub size: wgpu::BufferAddress,
}

/// Named uniform fields declared by `stereo_shader.wgsl`. Offsets follow the
/// WGSL struct layouts: a `mat4x4<f32>` occupies 64 bytes.
const DECLARED_UNIFORMS: &[(&str, UniformSlot)] = &[
    (
        "view",
        UniformSlot {
            block: UniformBlock::Camera,
            offset: 0,
            size: 64,
        },
    ),
    (
        "projection",
        UniformSlot {
            block: UniformBlock::Camera,
            offset: 64,
            size: 64,
        },
    ),
    (
        "model",
        UniformSlot {
            block: UniformBlock::Draw,
            offset: 0,
            size: 64,
        },
    ),
    (
        "baseColor",
        UniformSlot {
            block: UniformBlock::Draw,
            offset: 64,
            size: 16,
        },
    ),
];

/// Cache of resolved uniform slots, keyed by tag.
///
/// Single-valued tags hold exactly one slot; array-valued tags hold an
/// ordered list that grows by one per `cache_multi` call (per-element
/// uniforms for array-of-struct shader inputs). Each tag must be cached
/// before its first lookup.
#[derive(Debug, Default)]
pub struct UniformCache {
    singles: HashMap<UniformTag, UniformSlot>,
    multis: HashMap<UniformTag, Vec<UniformSlot>>,
}

impl UniformCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_single(&mut self, tag: UniformTag, slot: UniformSlot) {
        self.singles.insert(tag, slot);
    }

    /// Append a slot to an array-valued tag's location list.
    pub fn cache_multi(&mut self, tag: UniformTag, slot: UniformSlot) {
        self.multis.entry(tag).or_default().push(slot);
    }

    pub fn single(&self, tag: UniformTag) -> Result<UniformSlot, EngineError> {
        self.singles
            .get(&tag)
            .copied()
            .ok_or(EngineError::UnknownUniform(tag))
    }

    pub fn multi(&self, tag: UniformTag, index: usize) -> Result<UniformSlot, EngineError> {
        self.multis
            .get(&tag)
            .and_then(|slots| slots.get(index))
            .copied()
            .ok_or(EngineError::UnknownUniform(tag))
    }
}

/// A compiled program: WGSL module, pipeline and the uniform slot cache.
#[derive(Debug)]
pub struct Shader {
    pipeline: wgpu::RenderPipeline,
    declared: HashMap<&'static str, UniformSlot>,
    uniforms: UniformCache,
}

impl Shader {
    /// Compile and link the stereo pipeline.
    ///
    /// Bind group layouts arrive in group order: material, camera, per-draw.
    /// Validation errors raised by the module or the pipeline are collected
    /// from the error scope and propagated, never swallowed.
    pub async fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        source: &str,
        label: &str,
    ) -> Result<Self, EngineError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("stereo pipeline layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            cache: None,
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // No face culling; see the non-goals on culling/occlusion.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        if let Some(error) = device.pop_error_scope().await {
            return Err(EngineError::ShaderCompile(error.to_string()));
        }

        Ok(Self {
            pipeline,
            declared: DECLARED_UNIFORMS.iter().copied().collect(),
            uniforms: UniformCache::new(),
        })
    }

    /// Resolve `name` against the shader's declared fields and cache the
    /// slot under `tag`. Must happen exactly once per tag, before first use.
    pub fn cache_single_uniform(
        &mut self,
        tag: UniformTag,
        name: &str,
    ) -> Result<(), EngineError> {
        let slot = self.resolve(tag, name)?;
        self.uniforms.cache_single(tag, slot);
        Ok(())
    }

    /// Resolve `name` and append it to `tag`'s location list.
    pub fn cache_multi_uniform(&mut self, tag: UniformTag, name: &str) -> Result<(), EngineError> {
        let slot = self.resolve(tag, name)?;
        self.uniforms.cache_multi(tag, slot);
        Ok(())
    }

    /// Pure lookup of a cached single-valued slot.
    pub fn single_location(&self, tag: UniformTag) -> Result<UniformSlot, EngineError> {
        self.uniforms.single(tag)
    }

    /// Pure lookup of one element of a cached array-valued slot.
    pub fn index_from_multi_location(
        &self,
        tag: UniformTag,
        index: usize,
    ) -> Result<UniformSlot, EngineError> {
        self.uniforms.multi(tag, index)
    }

    /// Activate the program for the draws that follow.
    pub fn activate(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
    }

    /// Release the program. Pipelines are freed when the last handle drops;
    /// consuming `self` makes that point explicit and unique.
    pub fn destroy(self) {
        drop(self.pipeline);
    }

    fn resolve(&self, tag: UniformTag, name: &str) -> Result<UniformSlot, EngineError> {
        self.declared
            .get(name)
            .copied()
            .ok_or(EngineError::UnknownUniform(tag))
    }
}
