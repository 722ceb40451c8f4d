use wgpu::Device;

use super::{
    light::{AmbientLight, Light, PointLight},
    node::{MeshLayouts, MeshNode},
};

/// Anything that can be placed in a [`Scene`].
pub enum SceneNode {
    Mesh(MeshNode),
    Light(Light),
}

impl SceneNode {
    pub fn name(&self) -> &str {
        match self {
            SceneNode::Mesh(mesh) => &mesh.name,
            SceneNode::Light(light) => light.name(),
        }
    }

    pub fn as_mesh(&self) -> Option<&MeshNode> {
        match self {
            SceneNode::Mesh(mesh) => Some(mesh),
            SceneNode::Light(_) => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match self {
            SceneNode::Light(light) => Some(light),
            SceneNode::Mesh(_) => None,
        }
    }

    pub fn cast_shadow(&self) -> bool {
        match self {
            SceneNode::Mesh(mesh) => mesh.cast_shadow,
            SceneNode::Light(light) => light.cast_shadow(),
        }
    }
}

impl From<MeshNode> for SceneNode {
    fn from(mesh: MeshNode) -> Self {
        SceneNode::Mesh(mesh)
    }
}

impl From<Light> for SceneNode {
    fn from(light: Light) -> Self {
        SceneNode::Light(light)
    }
}

impl From<PointLight> for SceneNode {
    fn from(light: PointLight) -> Self {
        SceneNode::Light(Light::Point(light))
    }
}

impl From<AmbientLight> for SceneNode {
    fn from(light: AmbientLight) -> Self {
        SceneNode::Light(Light::Ambient(light))
    }
}

/// Flat, ordered collection of scene nodes
///
/// Nodes are kept in insertion order and are never removed.
#[derive(Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its index.
    pub fn add(&mut self, node: impl Into<SceneNode>) -> usize {
        let node = node.into();
        log::trace!("Adding '{}' to the scene", node.name());
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&SceneNode> {
        self.nodes.get(index)
    }

    /// First node with the given name.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.name() == name)
    }

    pub fn meshes(&self) -> impl Iterator<Item = &MeshNode> {
        self.nodes.iter().filter_map(SceneNode::as_mesh)
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.nodes.iter().filter_map(SceneNode::as_light)
    }

    pub fn point_lights(&self) -> impl Iterator<Item = &PointLight> {
        self.lights().filter_map(|light| match light {
            Light::Point(point) => Some(point),
            Light::Ambient(_) => None,
        })
    }

    /// The first point light flagged to cast shadows, if any.
    pub fn shadow_light(&self) -> Option<&PointLight> {
        self.point_lights().find(|light| light.cast_shadow)
    }

    /// Creates GPU resources for every mesh that does not have them yet.
    pub fn init_gpu_resources(&mut self, device: &Device, layouts: &MeshLayouts<'_>) {
        for node in &mut self.nodes {
            if let SceneNode::Mesh(mesh) = node {
                mesh.init_gpu_resources(device, layouts);
            }
        }
        log::info!("Scene ready: {:?}", self.get_statistics());
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics {
            mesh_count: 0,
            light_count: 0,
            total_triangles: 0,
            total_vertices: 0,
        };
        for node in &self.nodes {
            match node {
                SceneNode::Mesh(mesh) => {
                    let data = mesh.geometry().tessellate();
                    stats.mesh_count += 1;
                    stats.total_triangles += data.triangle_count();
                    stats.total_vertices += data.vertex_count();
                }
                SceneNode::Light(_) => stats.light_count += 1,
            }
        }
        stats
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub mesh_count: usize,
    pub light_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        color::Color,
        geometry::Geometry,
        resources::material::Material,
    };

    fn cube(name: &str) -> MeshNode {
        MeshNode::new(name, Geometry::cuboid(1.0, 1.0, 1.0), Material::lambert(Color::WHITE))
    }

    #[test]
    fn nodes_keep_insertion_order() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.add(cube("a")), 0);
        assert_eq!(scene.add(AmbientLight::new(Color::WHITE, 0.2)), 1);
        assert_eq!(scene.add(cube("b")), 2);

        let names: Vec<&str> = scene.nodes().iter().map(SceneNode::name).collect();
        assert_eq!(names, ["a", "AmbientLight", "b"]);
    }

    #[test]
    fn shadow_light_is_first_casting_point_light() {
        let mut scene = Scene::new();
        let mut quiet = PointLight::new(Color::WHITE, 1.0, 0.0, 0.0);
        quiet.name = "quiet".into();
        let mut caster = PointLight::new(Color::WHITE, 1.0, 0.0, 0.0);
        caster.name = "caster".into();
        caster.cast_shadow = true;
        scene.add(quiet);
        scene.add(caster);

        assert_eq!(scene.point_lights().count(), 2);
        assert_eq!(scene.shadow_light().map(|l| l.name.as_str()), Some("caster"));
    }

    #[test]
    fn statistics_count_meshes_and_lights() {
        let mut scene = Scene::new();
        scene.add(cube("a"));
        scene.add(cube("b"));
        scene.add(AmbientLight::new(Color::WHITE, 0.2));

        let stats = scene.get_statistics();
        assert_eq!(stats.mesh_count, 2);
        assert_eq!(stats.light_count, 1);
        assert_eq!(stats.total_triangles, 24);
        assert_eq!(stats.total_vertices, 48);
    }

    #[test]
    fn find_returns_none_for_unknown_name() {
        let mut scene = Scene::new();
        scene.add(cube("a"));
        assert!(scene.find("a").is_some());
        assert!(scene.find("z").is_none());
    }
}
