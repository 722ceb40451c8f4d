//! Per-frame render loop
//!
//! Each tick reschedules itself for the next display refresh, applies pending
//! controller input to the camera and then draws. The loop runs until its
//! [`LoopHandle`] is stopped.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{error::FrameError, gfx::rendering::OutputSurface, gfx::scene::Scene, viewport::Viewport};

/// Something that can ask for one more frame on the next display refresh.
pub trait FrameScheduler {
    fn request_frame(&self);
}

impl FrameScheduler for winit::window::Window {
    fn request_frame(&self) {
        self.request_redraw();
    }
}

/// Shared stop flag for a [`RenderLoop`].
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    stopped: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// What a single tick did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// The frame was dropped; the loop keeps going unless the error is fatal.
    Skipped(FrameError),
    Stopped,
}

#[derive(Debug, Default)]
pub struct RenderLoop {
    handle: LoopHandle,
    frame_count: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_stopped()
    }

    /// Frames presented so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Runs one iteration: schedule the next frame, update the controls, draw.
    ///
    /// A fatal frame error stops the loop.
    pub fn tick<S: OutputSurface>(
        &mut self,
        scheduler: &impl FrameScheduler,
        scene: &Scene,
        viewport: &mut Viewport<S>,
    ) -> FrameOutcome {
        if self.handle.is_stopped() {
            return FrameOutcome::Stopped;
        }

        scheduler.request_frame();
        viewport.update_controls();

        match viewport.draw(scene) {
            Ok(()) => {
                self.frame_count += 1;
                if self.frame_count == 1 {
                    log::info!("First frame presented");
                }
                FrameOutcome::Presented
            }
            Err(err) => {
                if err.is_fatal() {
                    log::error!("Stopping render loop: {}", err);
                    self.handle.stop();
                }
                FrameOutcome::Skipped(err)
            }
        }
    }
}
