//! Core rendering functionality
//!
//! Handles render pipelines, GPU resource management, and frame rendering.

pub mod pipeline_manager;
pub mod render_engine;
pub mod surface;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager, PipelineStats};
pub use render_engine::RenderEngine;
pub use surface::OutputSurface;
