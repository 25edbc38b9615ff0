//! Materials: one bound 2D texture each.

use crate::{error::EngineError, resources::texture::Texture};

/// A texture bound for sampling by the fragment stage.
///
/// Exactly one texture per material, always bound to the fixed material
/// bind-group slot (the single-texture-unit assumption of the pipeline).
#[derive(Debug)]
pub struct Material {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Bind group layout shared by every material: a filterable 2D texture and
/// its sampler, visible to the fragment stage.
pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("material_bind_group_layout"),
    })
}

impl Material {
    /// Bind group index every material binds to.
    pub const GROUP: u32 = 0;

    /// Wrap an already-decoded RGBA8 image.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        img: &image::RgbaImage,
        label: &str,
    ) -> Self {
        let texture = Texture::from_rgba(device, queue, img, Some(label));
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some(label),
        });

        Self {
            texture,
            bind_group,
        }
    }

    /// Decode raw image file bytes and wrap the result.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self, EngineError> {
        let img = super::decode_rgba(bytes)?;
        Ok(Self::from_rgba(device, queue, layout, &img, label))
    }

    /// Bind the texture for the draws that follow.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(Self::GROUP, &self.bind_group, &[]);
    }

    /// Release the GPU texture. Called exactly once at engine teardown.
    pub fn destroy(self) {
        self.texture.texture.destroy();
    }
}
