//! Camera and camera controls
//!
//! [`PerspectiveCamera`] holds the projection and view placement,
//! [`OrbitControls`] turns pointer input into camera motion around a target.

pub mod camera_utils;
pub mod orbit_controls;
pub mod perspective_camera;

// Re-export main types
pub use camera_utils::{Camera, CameraUniform};
pub use orbit_controls::{DragMode, OrbitControls, OrbitControlsBounds};
pub use perspective_camera::PerspectiveCamera;
