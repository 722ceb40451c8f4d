//! Application configuration
//!
//! Plain structs with defaults that reproduce the lighthouse scene's viewer
//! setup. Override individual settings with the `with_*` builders before
//! handing the config to [`LighthouseApp`](crate::app::LighthouseApp).

use crate::{gfx::color::Color, logging::LoggingConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub maximized: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lighthouse".to_string(),
            width: 1280,
            height: 720,
            maximized: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub clear_color: Color,
    /// MSAA sample count; 1 disables multisampling.
    pub msaa_samples: u32,
    pub shadows_enabled: bool,
    pub shadow_map_size: u32,
    pub present_mode: wgpu::PresentMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::from_hex(0xEEEEEE),
            msaa_samples: 4,
            shadows_enabled: true,
            shadow_map_size: 2048,
            present_mode: wgpu::PresentMode::Fifo,
        }
    }
}

/// Initial camera placement.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 34.0, 30.0],
            look_at: [0.0, 10.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.window.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_maximized(mut self, maximized: bool) -> Self {
        self.window.maximized = maximized;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.render.clear_color = color;
        self
    }

    /// Sets the MSAA sample count. wgpu only guarantees 1 and 4, so other
    /// values are rounded to the nearer of the two.
    pub fn with_msaa_samples(mut self, samples: u32) -> Self {
        self.render.msaa_samples = if samples >= 3 { 4 } else { 1 };
        self
    }

    pub fn with_shadows(mut self, enabled: bool) -> Self {
        self.render.shadows_enabled = enabled;
        self
    }

    pub fn with_shadow_map_size(mut self, size: u32) -> Self {
        self.render.shadow_map_size = size.max(1);
        self
    }

    pub fn with_present_mode(mut self, present_mode: wgpu::PresentMode) -> Self {
        self.render.present_mode = present_mode;
        self
    }

    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_lighthouse_viewer() {
        let config = AppConfig::default();
        assert_eq!(config.render.clear_color, Color::from_hex(0xEEEEEE));
        assert_eq!(config.render.msaa_samples, 4);
        assert!(config.render.shadows_enabled);
        assert_eq!(config.render.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(config.camera.fov_degrees, 45.0);
        assert_eq!(config.camera.position, [0.0, 34.0, 30.0]);
        assert_eq!(config.camera.look_at, [0.0, 10.0, 0.0]);
    }

    #[test]
    fn builders_override_fields() {
        let config = AppConfig::default()
            .with_title("Harbor")
            .with_size(1920, 1080)
            .with_shadows(false)
            .with_shadow_map_size(0);
        assert_eq!(config.window.title, "Harbor");
        assert_eq!((config.window.width, config.window.height), (1920, 1080));
        assert!(!config.render.shadows_enabled);
        assert_eq!(config.render.shadow_map_size, 1);
    }

    #[test]
    fn msaa_samples_snap_to_supported_counts() {
        assert_eq!(AppConfig::default().with_msaa_samples(8).render.msaa_samples, 4);
        assert_eq!(AppConfig::default().with_msaa_samples(2).render.msaa_samples, 1);
        assert_eq!(AppConfig::default().with_msaa_samples(0).render.msaa_samples, 1);
    }
}
