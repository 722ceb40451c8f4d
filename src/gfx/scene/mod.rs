//! # Scene Management Module
//!
//! The scene is a flat, ordered list of nodes: meshes (geometry + material +
//! transform) and lights. It is assembled once at startup and only read while
//! rendering.
//!
//! ## Key Components
//!
//! - [`Scene`] - Ordered node container
//! - [`MeshNode`] - Renderable mesh with shadow flags and GPU resources
//! - [`PointLight`] / [`AmbientLight`] - Light nodes
//! - [`Vertex3D`] - GPU vertex format
//!
//! ## Usage
//!
//! ```rust
//! use lighthouse::gfx::{color::Color, scene::{AmbientLight, Scene}};
//!
//! let mut scene = Scene::new();
//! scene.add(AmbientLight::new(Color::WHITE, 0.2));
//! assert_eq!(scene.len(), 1);
//! ```

pub mod light;
pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use light::{AmbientLight, Light, PointLight};
pub use node::{object_bind_group_layout, DrawMesh, MeshLayouts, MeshNode, ObjectUniform};
pub use scene::{Scene, SceneNode, SceneStatistics};
pub use vertex::Vertex3D;
