//! Texture resource management for wgpu
//!
//! Render targets owned by the renderer: the multisampled color target, the
//! depth buffer and the shadow map.

/// GPU texture resource containing texture, view, and sampler
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the renderer
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    fn comparison_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        })
    }

    fn render_target(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        sample_count: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
        label: &str,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Creates a depth texture matching the surface configuration
    ///
    /// `sample_count` must match the color target the depth buffer is paired with.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
        label: &str,
    ) -> Self {
        let (texture, view) = Self::render_target(
            device,
            config.width,
            config.height,
            sample_count,
            Self::DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            label,
        );
        let sampler = Self::comparison_sampler(device, label);

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Creates the multisampled color target that resolves into the surface
    pub fn create_msaa_target(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> Self {
        let (texture, view) = Self::render_target(
            device,
            config.width,
            config.height,
            sample_count,
            config.format,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            "MSAA Color Target",
        );
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor::default());

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Creates a square depth texture for the shadow pass, sampled with a
    /// comparison sampler in the main pass
    pub fn create_shadow_map(device: &wgpu::Device, size: u32) -> Self {
        let (texture, view) = Self::render_target(
            device,
            size,
            size,
            1,
            Self::DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            "Shadow Map",
        );
        let sampler = Self::comparison_sampler(device, "Shadow Sampler");

        Self {
            texture,
            view,
            sampler,
        }
    }
}
