//! Global uniform bindings for camera and light data
//!
//! Everything that is shared by all objects in a frame lives in one uniform
//! buffer bound at group 0: camera matrices, the ambient term, up to
//! [`MAX_POINT_LIGHTS`] point lights and the shadow-casting light's
//! view-projection.

use cgmath::{perspective, Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3};

use crate::{
    gfx::{
        camera::camera_utils::{convert_matrix4_to_array, CameraUniform, OPENGL_TO_WGPU_MATRIX},
        color::Color,
        scene::{Light, PointLight, Scene},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Number of point lights the shaders evaluate; extra lights are ignored.
pub const MAX_POINT_LIGHTS: usize = 4;

/// Shadow camera parameters for point lights.
pub const SHADOW_FOV_DEGREES: f32 = 90.0;
pub const SHADOW_NEAR: f32 = 0.5;
pub const SHADOW_FAR: f32 = 500.0;

/// Sentinel in `counts[1]` meaning no light casts shadows.
pub const NO_SHADOW_LIGHT: u32 = u32::MAX;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 3],
    pub distance: f32,
    /// Color pre-multiplied by intensity.
    pub color: [f32; 3],
    pub decay: f32,
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.into(),
            distance: light.distance,
            color: light.radiance().to_array(),
            decay: light.decay,
        }
    }
}

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    /// Summed ambient radiance in rgb, w unused.
    pub ambient: [f32; 4],
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    /// x: point light count, y: shadow light index, z: shadows enabled
    pub counts: [u32; 4],
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// View-projection of the shadow camera placed at `light_position`, aimed at
/// the world origin.
pub fn shadow_view_projection(light_position: Point3<f32>) -> Matrix4<f32> {
    let target = Point3::new(0.0, 0.0, 0.0);
    let direction = target - light_position;
    // look_at degenerates when looking straight along the up vector
    let up = if direction.magnitude2() > 0.0
        && direction.normalize().dot(Vector3::unit_y()).abs() > 0.999
    {
        Vector3::unit_z()
    } else {
        Vector3::unit_y()
    };
    let view = Matrix4::look_at_rh(light_position, target, up);
    let proj = OPENGL_TO_WGPU_MATRIX
        * perspective(Deg(SHADOW_FOV_DEGREES), 1.0, SHADOW_NEAR, SHADOW_FAR);
    proj * view
}

/// Collects the per-frame global uniform data from the camera and the
/// scene's lights.
pub fn build_global_content(
    camera: CameraUniform,
    scene: &Scene,
    shadows_enabled: bool,
) -> GlobalUBOContent {
    let mut ambient = Color::BLACK;
    let mut point_lights = [PointLightUniform::default(); MAX_POINT_LIGHTS];
    let mut point_count = 0;
    let mut shadow_index = NO_SHADOW_LIGHT;
    let mut light_view_proj = Matrix4::identity();

    for light in scene.lights() {
        match light {
            Light::Ambient(light) => {
                let radiance = light.radiance();
                ambient = Color::from_linear(
                    ambient.r + radiance.r,
                    ambient.g + radiance.g,
                    ambient.b + radiance.b,
                );
            }
            Light::Point(light) => {
                if point_count == MAX_POINT_LIGHTS {
                    log::warn!("Ignoring point light '{}': limit is {}", light.name, MAX_POINT_LIGHTS);
                    continue;
                }
                if light.cast_shadow && shadow_index == NO_SHADOW_LIGHT {
                    shadow_index = point_count as u32;
                    light_view_proj = shadow_view_projection(light.position_point());
                }
                point_lights[point_count] = PointLightUniform::from(light);
                point_count += 1;
            }
        }
    }

    let shadows_active = shadows_enabled && shadow_index != NO_SHADOW_LIGHT;
    let [r, g, b] = ambient.to_array();
    GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        light_view_proj: convert_matrix4_to_array(light_view_proj),
        ambient: [r, g, b, 0.0],
        point_lights,
        counts: [point_count as u32, shadow_index, shadows_active as u32, 0],
    }
}

/// Manages the bind group layout and bind group for global uniforms
///
/// Bound to slot 0 in all render pipelines.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::AmbientLight;
    use approx::assert_relative_eq;
    use cgmath::Vector4;

    fn point(x: f32, y: f32, z: f32, cast_shadow: bool) -> PointLight {
        let mut light = PointLight::new(Color::WHITE, 1.2, 10_000.0, 0.0);
        light.set_position(x, y, z);
        light.cast_shadow = cast_shadow;
        light
    }

    #[test]
    fn content_matches_shader_alignment() {
        assert_eq!(std::mem::size_of::<PointLightUniform>(), 32);
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 304);
    }

    #[test]
    fn ambient_lights_are_summed() {
        let mut scene = Scene::new();
        scene.add(AmbientLight::new(Color::WHITE, 0.2));
        scene.add(AmbientLight::new(Color::WHITE, 0.3));

        let content = build_global_content(CameraUniform::default(), &scene, true);
        assert_relative_eq!(content.ambient[0], 0.5);
        assert_eq!(content.counts[0], 0);
        assert_eq!(content.counts[1], NO_SHADOW_LIGHT);
        assert_eq!(content.counts[2], 0);
    }

    #[test]
    fn point_light_radiance_is_premultiplied() {
        let mut scene = Scene::new();
        scene.add(point(80.0, 100.0, 100.0, true));

        let content = build_global_content(CameraUniform::default(), &scene, true);
        assert_eq!(content.counts, [1, 0, 1, 0]);
        assert_eq!(content.point_lights[0].position, [80.0, 100.0, 100.0]);
        assert_relative_eq!(content.point_lights[0].color[1], 1.2);
    }

    #[test]
    fn disabled_shadows_clear_the_flag_only() {
        let mut scene = Scene::new();
        scene.add(point(80.0, 100.0, 100.0, true));

        let content = build_global_content(CameraUniform::default(), &scene, false);
        assert_eq!(content.counts, [1, 0, 0, 0]);
    }

    #[test]
    fn extra_point_lights_are_dropped() {
        let mut scene = Scene::new();
        for i in 0..6 {
            scene.add(point(i as f32, 10.0, 0.0, false));
        }

        let content = build_global_content(CameraUniform::default(), &scene, true);
        assert_eq!(content.counts[0], MAX_POINT_LIGHTS as u32);
        assert_eq!(content.point_lights[3].position[0], 3.0);
    }

    #[test]
    fn shadow_camera_sees_the_origin() {
        let light_view_proj = shadow_view_projection(Point3::new(80.0, 100.0, 100.0));
        let clip = light_view_proj * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn shadow_camera_handles_light_overhead() {
        let light_view_proj = shadow_view_projection(Point3::new(0.0, 100.0, 0.0));
        let clip = light_view_proj * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.w.is_finite() && clip.w > 0.0);
    }
}
