//! # Graphics Module
//!
//! Everything between the scene description and pixels on screen.
//!
//! - **Geometry** ([`geometry`]) - Primitive shapes and their tessellation
//! - **Factory** ([`factory`]) - Ready-to-add meshes and lights per primitive
//! - **Scene** ([`scene`]) - Ordered node container, meshes and lights
//! - **Camera** ([`camera`]) - Perspective camera and orbit controls
//! - **Resources** ([`resources`]) - Materials, uniforms and render targets
//! - **Rendering** ([`rendering`]) - Pipelines, shaders and the render engine
//!
//! ## Usage
//!
//! ```no_run
//! use lighthouse::gfx::{color::Color, factory, scene::Scene};
//!
//! let mut scene = Scene::new();
//! let mut floor = factory::create_box(9.0, 2.0, 9.0, Color::from_hex(0x888888));
//! floor.set_position(0.0, 0.0, 0.0);
//! scene.add(floor);
//!
//! // The render engine needs a window; LighthouseApp creates it in `resumed`
//! // let engine = RenderEngine::new(window, width, height, &config.render).await?;
//! ```

pub mod camera;
pub mod color;
pub mod factory;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{OrbitControls, PerspectiveCamera};
pub use rendering::render_engine::RenderEngine;
