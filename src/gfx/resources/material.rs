//! Surface materials
//!
//! A mesh owns exactly one [`Material`]. Two shading models are supported:
//! [`ShadingModel::Lambert`] (diffuse only) and [`ShadingModel::Standard`]
//! (metalness/roughness GGX). The GPU side of a material is a single uniform
//! buffer bound to group 2 of the scene pipelines.

use wgpu::Device;

use crate::{
    gfx::color::Color,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Lighting model used by the fragment shader.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShadingModel {
    Lambert,
    Standard,
}

impl ShadingModel {
    fn shader_id(self) -> u32 {
        match self {
            ShadingModel::Lambert => 0,
            ShadingModel::Standard => 1,
        }
    }
}

/// Which faces of a surface are rasterized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Double,
}

/// GPU uniform data for materials. Matches `Material` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub metalness: f32,
    pub shading_model: u32,
    _padding: u32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Creates the layout every material bind group is built against.
pub fn material_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::uniform())
        .create(device, "Material Bind Group Layout")
}

struct MaterialGpu {
    _ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
}

/// Material definition
///
/// Scalar properties are public; GPU resources are created lazily by
/// [`Material::init_gpu_resources`] and never change afterwards.
pub struct Material {
    pub color: Color,
    pub shading: ShadingModel,
    pub side: Side,
    pub wireframe: bool,
    pub roughness: f32,
    pub metalness: f32,

    gpu: Option<MaterialGpu>,
}

impl Material {
    fn new(color: Color, shading: ShadingModel) -> Self {
        Self {
            color,
            shading,
            side: Side::Front,
            wireframe: false,
            roughness: 1.0,
            metalness: 0.0,
            gpu: None,
        }
    }

    /// Diffuse-only material.
    pub fn lambert(color: Color) -> Self {
        Self::new(color, ShadingModel::Lambert)
    }

    /// Physically based material with roughness 1 and metalness 0.
    pub fn standard(color: Color) -> Self {
        Self::new(color, ShadingModel::Standard)
    }

    /// Builder pattern: render the triangle edges as lines
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Builder pattern: set face culling
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    pub fn is_double_sided(&self) -> bool {
        self.side == Side::Double
    }

    pub fn uniform(&self) -> MaterialUniform {
        let [r, g, b] = self.color.to_array();
        MaterialUniform {
            base_color: [r, g, b, 1.0],
            roughness: self.roughness,
            metalness: self.metalness,
            shading_model: self.shading.shader_id(),
            _padding: 0,
        }
    }

    /// Uploads the material uniform and builds its bind group. Calling this
    /// again is a no-op.
    pub fn init_gpu_resources(&mut self, device: &Device, layout: &BindGroupLayoutWithDesc) {
        if self.gpu.is_some() {
            return;
        }

        let ubo = MaterialUBO::new_with_data(device, &self.uniform());
        let bind_group = BindGroupBuilder::new(layout)
            .resource(ubo.binding_resource())
            .create(device, "Material Bind Group");

        self.gpu = Some(MaterialGpu {
            _ubo: ubo,
            bind_group,
        });
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_defaults_to_rough_dielectric() {
        let material = Material::standard(Color::WHITE);
        assert_eq!(material.roughness, 1.0);
        assert_eq!(material.metalness, 0.0);
        assert_eq!(material.side, Side::Front);
        assert!(!material.wireframe);
    }

    #[test]
    fn uniform_encodes_shading_model() {
        let lambert = Material::lambert(Color::BLACK).uniform();
        let standard = Material::standard(Color::BLACK).uniform();
        assert_eq!(lambert.shading_model, 0);
        assert_eq!(standard.shading_model, 1);
        assert_eq!(standard.base_color[3], 1.0);
    }

    #[test]
    fn builders_clamp_scalar_properties() {
        let material = Material::standard(Color::WHITE)
            .with_roughness(3.0)
            .with_metalness(-1.0);
        assert_eq!(material.roughness, 1.0);
        assert_eq!(material.metalness, 0.0);
    }

    #[test]
    fn uniform_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<MaterialUniform>() % 16, 0);
    }

    #[test]
    fn no_bind_group_before_gpu_init() {
        assert!(Material::lambert(Color::WHITE).bind_group().is_none());
    }
}
