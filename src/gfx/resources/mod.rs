//! GPU resource management
//!
//! Handles materials, textures and the global uniform buffer.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{build_global_content, GlobalBindings, GlobalUBO, GlobalUBOContent};
pub use material::{Material, ShadingModel, Side};
pub use texture_resource::TextureResource;
