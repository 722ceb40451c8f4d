//! The drawable the viewport renders into.

use crate::{
    error::FrameError,
    gfx::{camera::PerspectiveCamera, scene::Scene},
};

/// A resizable render target that can draw a scene through a camera.
///
/// Implemented by [`RenderEngine`](super::RenderEngine) for the window
/// surface; tests substitute recording doubles.
pub trait OutputSurface {
    /// Resizes the drawable to `width` x `height` physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Current drawable size in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Draws one frame.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), FrameError>;
}
