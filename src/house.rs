//! The lighthouse scene
//!
//! Builds the fixed set of primitives and registers them into a [`Scene`] in
//! a fixed order: seven tower meshes from the floor up, the ground plane,
//! then the two lights.

use std::f32::consts::FRAC_PI_2;

use cgmath::Rad;

use crate::gfx::{
    color::Color,
    factory::{
        create_ambient_light, create_box, create_cone, create_cylinder, create_fence,
        create_plane, create_point_light, create_sphere,
    },
    scene::{MeshNode, Scene},
};

pub const GRAY: u32 = 0x888888;
pub const WHITE: u32 = 0xFFFFFF;
pub const DARK_RED: u32 = 0xAC443C;
pub const FENCE_RED: u32 = 0x5C0000;
pub const TAN: u32 = 0xEFDBB9;

/// Number of nodes [`assemble`] adds.
pub const NODE_COUNT: usize = 10;

fn placed(mut node: MeshNode, name: &str, x: f32, y: f32, z: f32) -> MeshNode {
    node.name = name.to_string();
    node.set_position(x, y, z);
    node
}

/// Adds the lighthouse nodes to `scene`.
///
/// Returns the number of nodes added. Meant to run once at startup; calling
/// it again adds a second copy.
pub fn assemble(scene: &mut Scene) -> usize {
    let floor = placed(create_box(9.0, 2.0, 9.0, Color::from_hex(GRAY)), "floor", 0.0, 0.0, 0.0);

    // tapers from 4 at the floor to 2.6 under the neck
    let body = placed(
        create_cylinder(2.6, 4.0, 20.0, 100, 1, false, Color::from_hex(WHITE)),
        "body",
        0.0,
        10.0,
        0.0,
    );
    let neck = placed(
        create_cylinder(3.6, 3.6, 0.5, 20, 1, false, Color::from_hex(DARK_RED)),
        "neck",
        0.0,
        20.0,
        0.0,
    );
    let fence = placed(
        create_fence(3.2, 3.2, 1.0, 10, 1, true, Color::from_hex(FENCE_RED), true),
        "fence",
        0.0,
        21.0,
        0.0,
    );
    let head = placed(
        create_cylinder(2.2, 2.2, 3.0, 30, 1, false, Color::from_hex(WHITE)),
        "head",
        0.0,
        22.0,
        0.0,
    );
    let roof = placed(
        create_cone(3.5, 3.5, 100, 1, false, Color::from_hex(DARK_RED)),
        "roof",
        0.0,
        25.0,
        0.0,
    );
    let top = placed(create_sphere(0.5, Color::from_hex(DARK_RED)), "top", 0.0, 26.5, 0.0);

    let mut plane = placed(create_plane(100.0, 100.0, Color::from_hex(TAN)), "plane", 0.0, -1.0, 0.0);
    plane.set_rotation(Rad(FRAC_PI_2), Rad(0.0), Rad(0.0));

    let mut point_light = create_point_light(Color::from_hex(WHITE), 1.2, 10_000.0, 0.0);
    point_light.set_position(80.0, 100.0, 100.0);

    let ambient = create_ambient_light(Color::from_hex(WHITE), 0.2);

    let before = scene.len();
    for mesh in [floor, body, neck, fence, head, roof, top, plane] {
        scene.add(mesh);
    }
    scene.add(point_light);
    scene.add(ambient);

    let added = scene.len() - before;
    log::info!("Assembled lighthouse scene: {} nodes", added);
    added
}

/// Creates a new scene holding only the lighthouse.
pub fn build_house_scene() -> Scene {
    let mut scene = Scene::new();
    assemble(&mut scene);
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{geometry::Geometry, scene::Light};
    use approx::assert_relative_eq;

    #[test]
    fn nodes_are_added_in_order() {
        let scene = build_house_scene();
        let names: Vec<&str> = scene.nodes().iter().map(|node| node.name()).collect();
        assert_eq!(
            names,
            [
                "floor",
                "body",
                "neck",
                "fence",
                "head",
                "roof",
                "top",
                "plane",
                "PointLight",
                "AmbientLight"
            ]
        );
    }

    #[test]
    fn tower_stacks_on_the_floor() {
        let scene = build_house_scene();
        let heights: Vec<f32> = scene.meshes().map(|mesh| mesh.position().y).collect();
        assert_eq!(heights, [0.0, 10.0, 20.0, 21.0, 22.0, 25.0, 26.5, -1.0]);
        assert!(scene.meshes().all(|mesh| mesh.position().x == 0.0 && mesh.position().z == 0.0));
    }

    #[test]
    fn body_is_tapered() {
        let scene = build_house_scene();
        let body = scene.find("body").and_then(|node| node.as_mesh()).expect("body");
        assert_eq!(
            *body.geometry(),
            Geometry::cylinder(2.6, 4.0, 20.0, 100, 1, false)
        );
    }

    #[test]
    fn plane_lies_flat() {
        let scene = build_house_scene();
        let plane = scene.find("plane").and_then(|node| node.as_mesh()).expect("plane");
        assert_relative_eq!(plane.rotation().x, FRAC_PI_2);
        assert_eq!(plane.rotation().y, 0.0);
        assert_eq!(plane.rotation().z, 0.0);
    }

    #[test]
    fn lights_match_the_scene_setup() {
        let scene = build_house_scene();
        let lights: Vec<&Light> = scene.lights().collect();
        assert_eq!(lights.len(), 2);

        let Light::Point(point) = lights[0] else {
            panic!("first light should be the point light");
        };
        assert_eq!(point.intensity, 1.2);
        assert_eq!(point.distance, 10_000.0);
        assert_eq!(point.decay, 0.0);
        assert!(point.cast_shadow);

        let Light::Ambient(ambient) = lights[1] else {
            panic!("second light should be ambient");
        };
        assert_eq!(ambient.intensity, 0.2);
    }

    #[test]
    fn assemble_reports_added_nodes() {
        let mut scene = Scene::new();
        assert_eq!(assemble(&mut scene), NODE_COUNT);
    }
}
