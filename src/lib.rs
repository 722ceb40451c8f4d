// src/lib.rs
//! Lighthouse viewer
//!
//! Renders a fixed lighthouse scene built from primitive meshes, lit by a
//! shadow-casting point light, through a perspective camera with orbit
//! controls. Built on wgpu and winit.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod house;
pub mod logging;
pub mod render_loop;
pub mod viewport;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::LighthouseApp;
pub use config::AppConfig;
pub use error::{FrameError, RenderError};

/// Creates the lighthouse viewer with default settings
pub fn default() -> anyhow::Result<LighthouseApp> {
    LighthouseApp::new(AppConfig::default())
}
