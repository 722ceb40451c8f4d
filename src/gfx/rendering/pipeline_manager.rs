//! Render pipeline management for wgpu
//!
//! Pipelines are described by a [`PipelineConfig`], registered by name and
//! compiled together by [`PipelineManager::create_all_pipelines`]. Lookups
//! after that are read-only, so a render pass can hold several pipelines at
//! once.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Configuration for creating a render pipeline
///
/// Defines all parameters needed to create a wgpu render pipeline,
/// including shaders, bind group layouts, and render state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub depth_bias: DepthBiasState,
    pub sample_count: u32,
    pub color_targets: Vec<Option<ColorTargetState>>,
    pub vertex_only: bool, // for the shadow pass
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "scene.wgsl".to_string(),
            bind_group_layouts: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: Some(Face::Back),
            depth_format: None,
            depth_bias: DepthBiasState::default(),
            sample_count: 1,
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8UnormSrgb,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
            vertex_only: false,
        }
    }
}

impl PipelineConfig {
    /// Creates a new config with a specific shader
    pub fn default_with_shader(shader: &str) -> Self {
        Self {
            shader: shader.to_string(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Drops the fragment stage and all color targets (depth-only pass).
    pub fn with_vertex_only(mut self) -> Self {
        self.vertex_only = true;
        self.color_targets.clear();
        self
    }

    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_depth_stencil(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn with_depth_bias(mut self, constant: i32, slope_scale: f32) -> Self {
        self.depth_bias = DepthBiasState {
            constant,
            slope_scale,
            clamp: 0.0,
        };
        self
    }

    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count.max(1);
        self
    }

    pub fn with_color_targets(mut self, targets: Vec<Option<ColorTargetState>>) -> Self {
        self.color_targets = targets;
        self
    }

    /// Line topologies never cull.
    pub fn with_primitive_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.primitive_topology = topology;
        if matches!(topology, PrimitiveTopology::LineList | PrimitiveTopology::LineStrip) {
            self.cull_mode = None;
        }
        self
    }

    fn primitive_state(&self) -> PrimitiveState {
        PrimitiveState {
            topology: self.primitive_topology,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            cull_mode: self.cull_mode,
            polygon_mode: PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        }
    }

    fn depth_stencil_state(&self) -> Option<DepthStencilState> {
        self.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::LessEqual,
            stencil: StencilState::default(),
            bias: self.depth_bias,
        })
    }
}

/// Owns shader modules and the pipelines built from them
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
    pending_pipelines: Vec<String>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
            pending_pipelines: Vec::new(),
        }
    }

    /// Registers a pipeline configuration without creating it
    ///
    /// Re-registering a name replaces its config and marks it pending again.
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        self.pipelines.remove(name);
        if !self.pending_pipelines.iter().any(|n| n == name) {
            self.pending_pipelines.push(name.to_string());
        }
    }

    /// Loads and compiles a WGSL shader module
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Looks up a created pipeline
    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    /// Creates all pending pipelines
    ///
    /// # Returns
    /// Result with vector of error messages if any pipelines failed to create
    pub fn create_all_pipelines(&mut self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let pending = std::mem::take(&mut self.pending_pipelines);

        for name in pending {
            let Some(config) = self.pipeline_configs.get(&name) else {
                continue;
            };
            match self.create_pipeline_from_config(&name, config) {
                Ok(pipeline) => {
                    log::debug!("Created pipeline '{}'", name);
                    self.pipelines.insert(name, pipeline);
                }
                Err(e) => {
                    errors.push(format!("Pipeline '{}': {}", name, e));
                    self.pending_pipelines.push(name);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a render pipeline from configuration
    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("Shader '{}' not found", config.shader))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let fragment_state = if config.vertex_only {
            None
        } else {
            Some(FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &config.color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            })
        };

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: fragment_state,
                primitive: config.primitive_state(),
                depth_stencil: config.depth_stencil_state(),
                multisample: MultisampleState {
                    count: config.sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            });

        Ok(pipeline)
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            total_pipelines: self.pipelines.len(),
            pending_pipelines: self.pending_pipelines.len(),
            loaded_shaders: self.shader_modules.len(),
        }
    }

    pub fn has_pipeline(&self, name: &str) -> bool {
        self.pipeline_configs.contains_key(name)
    }
}

/// Statistics about pipeline manager state
#[derive(Debug)]
pub struct PipelineStats {
    pub total_pipelines: usize,
    pub pending_pipelines: usize,
    pub loaded_shaders: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_topology_disables_culling() {
        let config = PipelineConfig::default().with_primitive_topology(PrimitiveTopology::LineList);
        assert_eq!(config.primitive_state().cull_mode, None);
        assert_eq!(config.primitive_state().topology, PrimitiveTopology::LineList);
    }

    #[test]
    fn vertex_only_has_no_color_targets() {
        let config = PipelineConfig::default_with_shader("shadow.wgsl").with_vertex_only();
        assert!(config.vertex_only);
        assert!(config.color_targets.is_empty());
    }

    #[test]
    fn depth_state_only_with_depth_format() {
        let config = PipelineConfig::default();
        assert!(config.depth_stencil_state().is_none());

        let config = config
            .with_depth_stencil(TextureFormat::Depth32Float)
            .with_depth_bias(2, 2.0);
        let depth = config.depth_stencil_state().expect("depth state");
        assert_eq!(depth.format, TextureFormat::Depth32Float);
        assert_eq!(depth.bias.constant, 2);
    }

    #[test]
    fn sample_count_is_at_least_one() {
        assert_eq!(PipelineConfig::default().with_sample_count(0).sample_count, 1);
        assert_eq!(PipelineConfig::default().with_sample_count(4).sample_count, 4);
    }
}
