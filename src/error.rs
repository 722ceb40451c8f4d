//! Error types
//!
//! [`RenderError`] covers GPU/window bootstrap, which either succeeds once at
//! startup or ends the program. [`FrameError`] is what a single frame can run
//! into; most of those are recovered by skipping the frame.

use thiserror::Error;

/// Failure while creating the renderer
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to acquire GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("failed to create render pipelines: {}", .0.join("; "))]
    Pipelines(Vec<String>),
}

/// Failure while presenting a single frame
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Surface was lost or outdated and has been reconfigured.
    #[error("surface lost or outdated, reconfigured")]
    Reconfigured,

    #[error("timed out acquiring the next surface texture")]
    Timeout,

    #[error("out of GPU memory")]
    OutOfMemory,

    #[error("surface error")]
    Other,
}

impl FrameError {
    /// Maps a surface error to the frame-level outcome.
    ///
    /// Reconfiguring a lost surface is the caller's job; this only classifies.
    pub fn from_surface_error(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => FrameError::Reconfigured,
            wgpu::SurfaceError::Timeout => FrameError::Timeout,
            wgpu::SurfaceError::OutOfMemory => FrameError::OutOfMemory,
            wgpu::SurfaceError::Other => FrameError::Other,
        }
    }

    /// Fatal errors stop the render loop; everything else skips one frame.
    pub fn is_fatal(self) -> bool {
        matches!(self, FrameError::OutOfMemory)
    }
}
