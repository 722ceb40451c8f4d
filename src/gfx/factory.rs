//! # Primitive Factory
//!
//! One function per primitive. Each returns a ready-to-add scene node with
//! the shading model of its shape and shadow flags set: meshes cast shadows,
//! the ground plane receives them instead.
//!
//! Parameters are never validated; see [`Geometry`] for how degenerate
//! values tessellate.

use crate::gfx::{
    color::Color,
    geometry::Geometry,
    resources::material::{Material, Side},
    scene::{AmbientLight, MeshNode, PointLight},
};

fn shadow_caster(geometry: Geometry, material: Material) -> MeshNode {
    let mut node = MeshNode::new(geometry.kind(), geometry, material);
    node.cast_shadow = true;
    node
}

/// Box with Lambert shading.
pub fn create_box(width: f32, height: f32, depth: f32, color: Color) -> MeshNode {
    shadow_caster(
        Geometry::cuboid(width, height, depth),
        Material::lambert(color),
    )
}

/// Cylinder with standard shading.
pub fn create_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
    color: Color,
) -> MeshNode {
    shadow_caster(
        Geometry::cylinder(
            radius_top,
            radius_bottom,
            height,
            radial_segments,
            height_segments,
            open_ended,
        ),
        Material::standard(color),
    )
}

/// Cylinder drawn as its triangle edges when `wireframe` is set.
#[allow(clippy::too_many_arguments)]
pub fn create_fence(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
    color: Color,
    wireframe: bool,
) -> MeshNode {
    let geometry = Geometry::cylinder(
        radius_top,
        radius_bottom,
        height,
        radial_segments,
        height_segments,
        open_ended,
    );
    shadow_caster(geometry, Material::standard(color).with_wireframe(wireframe))
}

pub fn create_cone(
    radius: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
    color: Color,
) -> MeshNode {
    shadow_caster(
        Geometry::cone(radius, height, radial_segments, height_segments, open_ended),
        Material::standard(color),
    )
}

/// Sphere with the default 32x16 segments.
pub fn create_sphere(radius: f32, color: Color) -> MeshNode {
    shadow_caster(Geometry::sphere(radius), Material::standard(color))
}

/// Double-sided Lambert plane in the XY plane
///
/// Receives shadows and casts none.
pub fn create_plane(width: f32, height: f32, color: Color) -> MeshNode {
    let material = Material::lambert(color).with_side(Side::Double);
    let mut node = MeshNode::new("plane", Geometry::plane(width, height), material);
    node.receive_shadow = true;
    node
}

/// Shadow-casting point light at the origin.
pub fn create_point_light(color: Color, intensity: f32, distance: f32, decay: f32) -> PointLight {
    let mut light = PointLight::new(color, intensity, distance, decay);
    light.cast_shadow = true;
    light
}

pub fn create_ambient_light(color: Color, intensity: f32) -> AmbientLight {
    AmbientLight::new(color, intensity)
}
