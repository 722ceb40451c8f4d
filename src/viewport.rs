//! Viewport: camera, output surface and orbit controls kept in sync
//!
//! The camera's aspect ratio always matches the surface size once
//! [`Viewport::resize`] has run.

use cgmath::{Deg, Point3};
use winit::event::WindowEvent;

use crate::{
    config::CameraConfig,
    error::FrameError,
    gfx::{
        camera::{OrbitControls, PerspectiveCamera},
        rendering::OutputSurface,
        scene::Scene,
    },
};

/// Width over height, falling back to 1 for a zero height.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

pub struct Viewport<S: OutputSurface> {
    camera: PerspectiveCamera,
    controls: OrbitControls,
    surface: S,
}

impl<S: OutputSurface> Viewport<S> {
    /// Places the camera per `config`, sized to the surface's current size.
    pub fn new(surface: S, config: &CameraConfig) -> Self {
        let (width, height) = surface.size();
        let mut camera = PerspectiveCamera::new(
            Deg(config.fov_degrees),
            aspect_ratio(width, height),
            config.near,
            config.far,
        );
        let [x, y, z] = config.position;
        camera.set_position(x, y, z);
        let [tx, ty, tz] = config.look_at;
        camera.look_at(Point3::new(tx, ty, tz));

        let controls = OrbitControls::new(&camera, (width, height));
        log::debug!(
            "Viewport {}x{}, camera at {:?} looking at {:?}",
            width,
            height,
            camera.position,
            camera.target
        );

        Self {
            camera,
            controls,
            surface,
        }
    }

    /// Resize handler
    ///
    /// Resizes the surface, then updates the camera aspect and projection
    /// before the next frame. Zero sizes (minimized window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.surface.resize(width, height);
        self.camera.aspect = aspect_ratio(width, height);
        self.camera.update_projection_matrix();
        self.controls.set_viewport_size(width, height);
    }

    /// Applies pending controller input to the camera.
    pub fn update_controls(&mut self) -> bool {
        self.controls.update(&mut self.camera)
    }

    pub fn draw(&mut self, scene: &Scene) -> Result<(), FrameError> {
        self.surface.render(scene, &self.camera)
    }

    /// Feeds pointer input to the controls.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.controls.handle_window_event(event)
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn size(&self) -> (u32, u32) {
        self.surface.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct FixedSurface {
        size: (u32, u32),
        resizes: usize,
    }

    impl FixedSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: (width, height),
                resizes: 0,
            }
        }
    }

    impl OutputSurface for FixedSurface {
        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.resizes += 1;
        }

        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn render(&mut self, _scene: &Scene, _camera: &PerspectiveCamera) -> Result<(), FrameError> {
            Ok(())
        }
    }

    #[test]
    fn camera_starts_from_config() {
        let viewport = Viewport::new(FixedSurface::new(800, 600), &CameraConfig::default());
        let camera = viewport.camera();
        assert_eq!(camera.position, Point3::new(0.0, 34.0, 30.0));
        assert_eq!(camera.target, Point3::new(0.0, 10.0, 0.0));
        assert_eq!(camera.fovy, Deg(45.0));
        assert_relative_eq!(camera.aspect, 800.0 / 600.0);
        assert_eq!(viewport.controls().target, Point3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn resize_updates_aspect_and_projection() {
        let mut viewport = Viewport::new(FixedSurface::new(800, 600), &CameraConfig::default());
        let before = viewport.camera().projection_matrix();

        viewport.resize(1920, 1080);

        assert_eq!(viewport.size(), (1920, 1080));
        assert_eq!(viewport.camera().aspect, 1920.0 / 1080.0);
        assert_ne!(viewport.camera().projection_matrix(), before);
    }

    #[test]
    fn zero_size_is_ignored() {
        let mut viewport = Viewport::new(FixedSurface::new(800, 600), &CameraConfig::default());
        viewport.resize(0, 600);
        viewport.resize(800, 0);

        assert_eq!(viewport.surface().resizes, 0);
        assert_eq!(viewport.size(), (800, 600));
        assert_relative_eq!(viewport.camera().aspect, 800.0 / 600.0);
    }

    #[test]
    fn aspect_ratio_guards_zero_height() {
        assert_eq!(aspect_ratio(1920, 1080), 1920.0 / 1080.0);
        assert_eq!(aspect_ratio(10, 0), 1.0);
    }
}
