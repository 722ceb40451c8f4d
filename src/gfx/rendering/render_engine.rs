//! WGPU-based renderer for the lighthouse scene
//!
//! Owns the window surface, the device and every GPU resource that is not
//! attached to a scene node: pipelines, the global uniform buffer, the
//! multisampled color target, the depth buffer and the shadow map.
//!
//! Each frame runs two passes:
//!
//! 1. **Shadow pass**: depth-only render of every shadow-casting mesh from the
//!    first shadow-casting point light.
//! 2. **Main pass**: clears to the background color and draws every mesh
//!    with its material, resolving MSAA into the surface texture.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::{
    config::RenderConfig,
    error::{FrameError, RenderError},
    gfx::{
        camera::PerspectiveCamera,
        resources::{
            global_bindings::{build_global_content, GlobalBindings, GlobalUBO, GlobalUBOContent},
            material::{material_bind_group_layout, Material},
            texture_resource::TextureResource,
        },
        scene::{object_bind_group_layout, DrawMesh, MeshLayouts, Scene},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
    },
};

use super::{
    pipeline_manager::{PipelineConfig, PipelineManager},
    surface::OutputSurface,
};

pub const SOLID_PIPELINE: &str = "Solid";
pub const DOUBLE_SIDED_PIPELINE: &str = "DoubleSided";
pub const WIREFRAME_PIPELINE: &str = "Wireframe";
pub const SHADOW_PIPELINE: &str = "Shadow";
pub const SHADOW_LINES_PIPELINE: &str = "ShadowLines";

const OBJECT_GROUP: u32 = 1;
const MATERIAL_GROUP: u32 = 2;
const SHADOW_GROUP: u32 = 3;

/// Picks the main-pass pipeline for a material.
pub fn pipeline_for(material: &Material) -> &'static str {
    if material.wireframe {
        WIREFRAME_PIPELINE
    } else if material.is_double_sided() {
        DOUBLE_SIDED_PIPELINE
    } else {
        SOLID_PIPELINE
    }
}

/// Prefers an sRGB format so linear shader output is encoded by the hardware.
pub fn choose_surface_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| format.is_srgb())
        .or_else(|| formats.first().copied())
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    settings: RenderConfig,
    sample_count: u32,

    depth_texture: TextureResource,
    msaa_target: Option<TextureResource>,
    pipeline_manager: PipelineManager,

    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,

    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,
}

impl RenderEngine {
    /// Creates a renderer for the given window
    ///
    /// `width`/`height` are the initial surface size in physical pixels.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        settings: &RenderConfig,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&surface_capabilities.formats)
            .ok_or(RenderError::NoSurfaceFormat)?;

        let present_mode = if surface_capabilities
            .present_modes
            .contains(&settings.present_mode)
        {
            settings.present_mode
        } else {
            log::warn!(
                "Present mode {:?} unsupported, falling back to Fifo",
                settings.present_mode
            );
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = Self::supported_sample_count(&adapter, format, settings.msaa_samples);
        log::info!(
            "Surface configured: {}x{} {:?}, {:?}, {}x MSAA",
            config.width,
            config.height,
            format,
            present_mode,
            sample_count
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, sample_count, "depth_texture");
        let msaa_target = (sample_count > 1)
            .then(|| TextureResource::create_msaa_target(&device, &config, sample_count));

        // Global uniforms (group 0)
        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        // Per-object (group 1) and per-material (group 2) layouts
        let object_layout = object_bind_group_layout(&device);
        let material_layout = material_bind_group_layout(&device);

        // Shadow map (group 3)
        let shadow_map = TextureResource::create_shadow_map(&device, settings.shadow_map_size);
        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::depth_texture_2d())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::Comparison,
            ))
            .create(&device, "Shadow Bind Group Layout");
        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(&device, "Shadow Bind Group");

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("scene.wgsl", include_str!("scene.wgsl"));
        pipeline_manager.load_shader("shadow.wgsl", include_str!("shadow.wgsl"));

        let color_targets = vec![Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let scene_layouts = vec![
            global_bindings.bind_group_layout().clone(),
            object_layout.layout.clone(),
            material_layout.layout.clone(),
            shadow_layout.layout.clone(),
        ];
        let main_pass = PipelineConfig::default_with_shader("scene.wgsl")
            .with_bind_group_layouts(scene_layouts)
            .with_depth_stencil(TextureResource::DEPTH_FORMAT)
            .with_sample_count(sample_count)
            .with_color_targets(color_targets);

        pipeline_manager.register_pipeline(
            SOLID_PIPELINE,
            main_pass.clone().with_label("Solid Pipeline"),
        );
        pipeline_manager.register_pipeline(
            DOUBLE_SIDED_PIPELINE,
            main_pass
                .clone()
                .with_label("Double Sided Pipeline")
                .with_cull_mode(None),
        );
        pipeline_manager.register_pipeline(
            WIREFRAME_PIPELINE,
            main_pass
                .with_label("Wireframe Pipeline")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList),
        );

        let shadow_pass = PipelineConfig::default_with_shader("shadow.wgsl")
            .with_vertex_only()
            .with_bind_group_layouts(vec![
                global_bindings.bind_group_layout().clone(),
                object_layout.layout.clone(),
            ])
            .with_depth_stencil(TextureResource::DEPTH_FORMAT)
            .with_cull_mode(None);
        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            shadow_pass
                .clone()
                .with_label("Shadow Pipeline")
                .with_depth_bias(2, 2.0),
        );
        // depth bias is only valid for triangle topologies
        pipeline_manager.register_pipeline(
            SHADOW_LINES_PIPELINE,
            shadow_pass
                .with_label("Shadow Lines Pipeline")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList),
        );

        pipeline_manager
            .create_all_pipelines()
            .map_err(RenderError::Pipelines)?;
        log::debug!("Pipelines ready: {:?}", pipeline_manager.get_stats());

        Ok(Self {
            surface,
            device,
            queue,
            config,
            settings: settings.clone(),
            sample_count,
            depth_texture,
            msaa_target,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            material_layout,
            shadow_map,
            shadow_bind_group,
        })
    }

    fn supported_sample_count(adapter: &wgpu::Adapter, format: TextureFormat, requested: u32) -> u32 {
        if requested <= 1 {
            return 1;
        }
        let color = adapter.get_texture_format_features(format).flags;
        let depth = adapter
            .get_texture_format_features(TextureResource::DEPTH_FORMAT)
            .flags;
        if color.sample_count_supported(requested) && depth.sample_count_supported(requested) {
            requested
        } else {
            log::warn!("{}x MSAA unsupported for {:?}, rendering without it", requested, format);
            1
        }
    }

    /// Creates GPU resources for every mesh in `scene`.
    pub fn prepare_scene(&self, scene: &mut Scene) {
        let layouts = MeshLayouts {
            object: &self.object_layout,
            material: &self.material_layout,
        };
        scene.init_gpu_resources(&self.device, &layouts);
    }

    fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> FrameError {
        let frame_error = FrameError::from_surface_error(&err);
        match frame_error {
            FrameError::Reconfigured => {
                log::warn!("Surface {:?}, reconfiguring", err);
                self.surface.configure(&self.device, &self.config);
            }
            FrameError::OutOfMemory => log::error!("Surface out of memory"),
            FrameError::Timeout | FrameError::Other => {
                log::warn!("Skipping frame: {}", frame_error)
            }
        }
        frame_error
    }

    fn shadow_pass(&self, encoder: &mut wgpu::CommandEncoder, scene: &Scene) {
        let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Shadow Depth Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.shadow_map.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
        for mesh in scene.meshes().filter(|mesh| mesh.cast_shadow) {
            let wireframe = mesh.material().wireframe;
            let name = if wireframe {
                SHADOW_LINES_PIPELINE
            } else {
                SHADOW_PIPELINE
            };
            if let Some(pipeline) = self.pipeline_manager.get_pipeline(name) {
                shadow_pass.set_pipeline(pipeline);
                shadow_pass.draw_mesh_node(mesh, OBJECT_GROUP, wireframe);
            }
        }
    }

    fn main_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        scene: &Scene,
    ) {
        let (view, resolve_target, store) = match &self.msaa_target {
            Some(msaa) => (&msaa.view, Some(surface_view), wgpu::StoreOp::Discard),
            None => (surface_view, None, wgpu::StoreOp::Store),
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.settings.clear_color.to_wgpu()),
                    store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
        render_pass.set_bind_group(SHADOW_GROUP, &self.shadow_bind_group, &[]);

        let mut current = None;
        for mesh in scene.meshes() {
            let name = pipeline_for(mesh.material());
            if current != Some(name) {
                let Some(pipeline) = self.pipeline_manager.get_pipeline(name) else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                current = Some(name);
            }
            render_pass.draw_mesh_node_with_material(mesh, OBJECT_GROUP, MATERIAL_GROUP, 0..1);
        }
    }

    /// Renders one frame of `scene` as seen by `camera`.
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), FrameError> {
        let content: GlobalUBOContent =
            build_global_content(camera.uniform(), scene, self.settings.shadows_enabled);
        self.global_ubo.update_content(&self.queue, content);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => return Err(self.handle_surface_error(err)),
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        if content.counts[2] != 0 {
            self.shadow_pass(&mut encoder, scene);
        }
        self.main_pass(&mut encoder, &surface_view, scene);

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and the size-dependent render targets
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = TextureResource::create_depth_texture(
            &self.device,
            &self.config,
            self.sample_count,
            "depth_texture",
        );
        if self.msaa_target.is_some() {
            self.msaa_target = Some(TextureResource::create_msaa_target(
                &self.device,
                &self.config,
                self.sample_count,
            ));
        }
        log::debug!("Surface resized to {}x{}", width, height);
    }

    /// Returns current surface dimensions in pixels
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.config.format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}

impl OutputSurface for RenderEngine {
    fn resize(&mut self, width: u32, height: u32) {
        RenderEngine::resize(self, width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.get_surface_size()
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), FrameError> {
        self.render_frame(scene, camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{color::Color, resources::material::Side};

    #[test]
    fn pipeline_follows_material_flags() {
        let solid = Material::lambert(Color::WHITE);
        let double = Material::lambert(Color::WHITE).with_side(Side::Double);
        let wire = Material::standard(Color::WHITE)
            .with_side(Side::Double)
            .with_wireframe(true);

        assert_eq!(pipeline_for(&solid), SOLID_PIPELINE);
        assert_eq!(pipeline_for(&double), DOUBLE_SIDED_PIPELINE);
        assert_eq!(pipeline_for(&wire), WIREFRAME_PIPELINE);
    }

    #[test]
    fn surface_format_prefers_srgb() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats), Some(TextureFormat::Bgra8UnormSrgb));
        assert_eq!(
            choose_surface_format(&[TextureFormat::Rgba8Unorm]),
            Some(TextureFormat::Rgba8Unorm)
        );
        assert_eq!(choose_surface_format(&[]), None);
    }
}
