//! Orbit controls
//!
//! Orbits a [`PerspectiveCamera`] around a target point using pointer input:
//!
//! - **Left drag**: rotate around the target
//! - **Right drag** or **Shift/Ctrl + left drag**: pan the target in screen space
//! - **Middle drag** or **wheel**: dolly toward/away from the target
//!
//! Input only accumulates pending deltas. They are applied to the camera by
//! [`OrbitControls::update`], which the render loop calls once per frame
//! before drawing.

use std::f32::consts::{PI, TAU};

use cgmath::*;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use super::perspective_camera::PerspectiveCamera;

const EPS: f32 = 1e-6;

/// Limits applied to the orbit on every update.
#[derive(Debug, Clone, Copy)]
pub struct OrbitControlsBounds {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle range measured from +Y, in radians.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// Azimuth range in radians; infinite means unrestricted.
    pub min_azimuth_angle: f32,
    pub max_azimuth_angle: f32,
}

impl Default for OrbitControlsBounds {
    fn default() -> Self {
        Self {
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            min_azimuth_angle: f32::NEG_INFINITY,
            max_azimuth_angle: f32::INFINITY,
        }
    }
}

/// Spherical coordinates around +Y: `phi` from the pole, `theta` around the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vector3<f32>) -> Self {
        let radius = offset.magnitude();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keeps `phi` off the poles so the view basis stays defined.
    fn make_safe(&mut self) {
        self.phi = self.phi.clamp(EPS, PI - EPS);
    }
}

/// What a held pointer button does while the cursor moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
    Dolly,
}

pub struct OrbitControls {
    pub target: Point3<f32>,
    pub enabled: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub bounds: OrbitControlsBounds,

    // pending input, consumed by `update`
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_pixels: Vector2<f32>,

    drag: Option<DragMode>,
    cursor: Option<(f64, f64)>,
    shift_held: bool,
    ctrl_held: bool,
    viewport_size: (u32, u32),

    saved_target: Point3<f32>,
    saved_position: Point3<f32>,
}

impl OrbitControls {
    /// Binds controls to `camera`, orbiting the point the camera looks at.
    ///
    /// `viewport_size` is the output surface size in physical pixels; pointer
    /// deltas are scaled by its height.
    pub fn new(camera: &PerspectiveCamera, viewport_size: (u32, u32)) -> Self {
        Self {
            target: camera.target,
            enabled: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            bounds: OrbitControlsBounds::default(),
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_pixels: Vector2::zero(),
            drag: None,
            cursor: None,
            shift_held: false,
            ctrl_held: false,
            viewport_size,
            saved_target: camera.target,
            saved_position: camera.position,
        }
    }

    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.viewport_size = (width, height);
    }

    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag
    }

    /// Stores the current camera placement as the state [`reset`](Self::reset) returns to.
    pub fn save_state(&mut self, camera: &PerspectiveCamera) {
        self.saved_target = self.target;
        self.saved_position = camera.position;
    }

    /// Restores the saved placement and drops any pending input.
    pub fn reset(&mut self, camera: &mut PerspectiveCamera) {
        self.target = self.saved_target;
        camera.position = self.saved_position;
        camera.look_at(self.target);
        self.clear_pending();
        self.drag = None;
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.theta_delta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.phi_delta -= angle;
    }

    /// Moves the camera toward the target; `dolly_scale < 1` shrinks the distance.
    pub fn dolly_in(&mut self, dolly_scale: f32) {
        self.scale *= dolly_scale;
    }

    pub fn dolly_out(&mut self, dolly_scale: f32) {
        self.scale /= dolly_scale;
    }

    /// Queues a screen-space pan of `(dx, dy)` pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan_pixels += Vector2::new(dx, dy) * self.pan_speed;
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_size.1.max(1) as f32
    }

    fn clear_pending(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
        self.pan_pixels = Vector2::zero();
    }

    /// Routes a window event to the pointer handlers. Returns true when the
    /// event was consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.set_modifiers(state.shift_key(), state.control_key() || state.super_key());
                false
            }
            WindowEvent::MouseInput { state, button, .. } => self.on_mouse_button(*button, *state),
            WindowEvent::CursorMoved { position, .. } => self.on_cursor_moved(position.x, position.y),
            WindowEvent::MouseWheel { delta, .. } => self.on_mouse_wheel(*delta),
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                false
            }
            _ => false,
        }
    }

    pub fn set_modifiers(&mut self, shift: bool, ctrl: bool) {
        self.shift_held = shift;
        self.ctrl_held = ctrl;
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        if !self.enabled {
            return false;
        }
        match state {
            ElementState::Pressed => {
                let mode = match button {
                    MouseButton::Left if self.shift_held || self.ctrl_held => DragMode::Pan,
                    MouseButton::Left => DragMode::Rotate,
                    MouseButton::Right => DragMode::Pan,
                    MouseButton::Middle => DragMode::Dolly,
                    _ => return false,
                };
                self.drag = Some(mode);
                true
            }
            ElementState::Released => self.drag.take().is_some(),
        }
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> bool {
        let previous = self.cursor.replace((x, y));
        let (Some(mode), Some((px, py))) = (self.drag, previous) else {
            return false;
        };
        if !self.enabled {
            return false;
        }

        let dx = (x - px) as f32;
        let dy = (y - py) as f32;
        match mode {
            DragMode::Rotate => {
                let height = self.viewport_height();
                self.rotate_left(TAU * dx / height * self.rotate_speed);
                self.rotate_up(TAU * dy / height * self.rotate_speed);
            }
            DragMode::Pan => self.pan(dx, dy),
            DragMode::Dolly => {
                if dy > 0.0 {
                    self.dolly_out(self.zoom_scale());
                } else if dy < 0.0 {
                    self.dolly_in(self.zoom_scale());
                }
            }
        }
        true
    }

    pub fn on_mouse_wheel(&mut self, delta: MouseScrollDelta) -> bool {
        if !self.enabled {
            return false;
        }
        let scroll = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32,
        };
        if scroll > 0.0 {
            self.dolly_in(self.zoom_scale());
        } else if scroll < 0.0 {
            self.dolly_out(self.zoom_scale());
        } else {
            return false;
        }
        true
    }

    /// Converts the pending pixel pan into a world-space target offset.
    fn pan_offset(&self, camera: &PerspectiveCamera) -> Vector3<f32> {
        if self.pan_pixels == Vector2::zero() {
            return Vector3::zero();
        }
        let offset = camera.position - self.target;
        let half_fov = Rad::from(camera.fovy) / 2.0;
        let target_distance = offset.magnitude() * half_fov.0.tan();
        let height = self.viewport_height();

        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward).normalize();

        let left = right * -(2.0 * self.pan_pixels.x * target_distance / height);
        let upward = up * (2.0 * self.pan_pixels.y * target_distance / height);
        left + upward
    }

    fn clamp_azimuth(&self, theta: f32) -> f32 {
        let (mut min, mut max) = (self.bounds.min_azimuth_angle, self.bounds.max_azimuth_angle);
        if !(min.is_finite() && max.is_finite()) {
            return theta;
        }
        if min < -PI {
            min += TAU;
        } else if min > PI {
            min -= TAU;
        }
        if max < -PI {
            max += TAU;
        } else if max > PI {
            max -= TAU;
        }
        if min <= max {
            theta.clamp(min, max)
        } else if theta > (min + max) / 2.0 {
            theta.max(min)
        } else {
            theta.min(max)
        }
    }

    /// Applies pending input to `camera`. Returns true when the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let old_position = camera.position;
        let old_target = self.target;

        let pan = self.pan_offset(camera);
        let mut spherical = Spherical::from_offset(camera.position - self.target);
        spherical.theta = self.clamp_azimuth(spherical.theta + self.theta_delta);
        spherical.phi = (spherical.phi + self.phi_delta)
            .clamp(self.bounds.min_polar_angle, self.bounds.max_polar_angle);
        spherical.make_safe();
        spherical.radius = (spherical.radius * self.scale)
            .clamp(self.bounds.min_distance, self.bounds.max_distance);

        self.target += pan;
        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);
        self.clear_pending();

        old_position.distance2(camera.position) > EPS || old_target.distance2(self.target) > EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn house_camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(Deg(45.0), 1920.0 / 1080.0, 0.1, 1000.0);
        camera.set_position(0.0, 34.0, 30.0);
        camera.look_at(Point3::new(0.0, 10.0, 0.0));
        camera
    }

    #[test]
    fn update_without_input_keeps_camera_still() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));

        assert!(!controls.update(&mut camera));
        assert_relative_eq!(camera.position, Point3::new(0.0, 34.0, 30.0), epsilon = 1e-4);
        assert_eq!(camera.target, Point3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn rotate_left_orbits_about_vertical_axis() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));

        controls.rotate_left(FRAC_PI_2);
        assert!(controls.update(&mut camera));
        assert_relative_eq!(camera.position, Point3::new(-30.0, 34.0, 0.0), epsilon = 1e-3);
        assert_eq!(camera.target, controls.target);
    }

    #[test]
    fn pending_input_is_consumed_by_update() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));

        controls.rotate_left(0.3);
        assert!(controls.update(&mut camera));
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn dolly_scales_distance_to_target() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));
        let distance = camera.position.distance(controls.target);

        controls.dolly_in(0.5);
        controls.update(&mut camera);
        assert_relative_eq!(camera.position.distance(controls.target), distance * 0.5, epsilon = 1e-3);
    }

    #[test]
    fn distance_respects_bounds() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));
        controls.bounds.max_distance = 40.0;

        controls.dolly_out(0.1);
        controls.update(&mut camera);
        assert_relative_eq!(camera.position.distance(controls.target), 40.0, epsilon = 1e-3);
    }

    #[test]
    fn polar_angle_never_reaches_the_pole() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));

        controls.rotate_up(10.0);
        controls.update(&mut camera);
        let offset = camera.position - controls.target;
        assert!(offset.y > 0.0);
        assert!(offset.x.abs() + offset.z.abs() > 0.0);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));
        let offset_before = camera.position - controls.target;

        controls.pan(100.0, 0.0);
        assert!(controls.update(&mut camera));
        // dragging right slides the target toward -X
        assert!(controls.target.x < 0.0);
        assert_relative_eq!(controls.target.y, 10.0, epsilon = 1e-4);
        assert_relative_eq!(camera.position - controls.target, offset_before, epsilon = 1e-3);
    }

    #[test]
    fn left_drag_rotates_and_shift_left_drag_pans() {
        let camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));

        assert!(controls.on_mouse_button(MouseButton::Left, ElementState::Pressed));
        assert_eq!(controls.drag_mode(), Some(DragMode::Rotate));
        assert!(controls.on_mouse_button(MouseButton::Left, ElementState::Released));
        assert_eq!(controls.drag_mode(), None);

        controls.set_modifiers(true, false);
        controls.on_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(controls.drag_mode(), Some(DragMode::Pan));

        controls.set_modifiers(false, false);
        controls.on_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert_eq!(controls.drag_mode(), Some(DragMode::Pan));
    }

    #[test]
    fn cursor_motion_without_button_does_nothing() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));

        assert!(!controls.on_cursor_moved(10.0, 10.0));
        assert!(!controls.on_cursor_moved(200.0, 10.0));
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn full_height_drag_is_one_revolution() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1080, 1080));
        let start = camera.position;

        controls.on_cursor_moved(0.0, 500.0);
        controls.on_mouse_button(MouseButton::Left, ElementState::Pressed);
        controls.on_cursor_moved(1080.0, 500.0);
        controls.update(&mut camera);
        assert_relative_eq!(camera.position, start, epsilon = 1e-3);
    }

    #[test]
    fn wheel_up_moves_closer() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));
        let distance = camera.position.distance(controls.target);

        assert!(controls.on_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0)));
        controls.update(&mut camera);
        assert_relative_eq!(camera.position.distance(controls.target), distance * 0.95, epsilon = 1e-3);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));
        controls.enabled = false;

        assert!(!controls.on_mouse_button(MouseButton::Left, ElementState::Pressed));
        assert!(!controls.on_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0)));
    }

    #[test]
    fn reset_restores_initial_placement() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));

        controls.rotate_left(1.0);
        controls.pan(50.0, 20.0);
        controls.update(&mut camera);
        controls.reset(&mut camera);

        assert_eq!(camera.position, Point3::new(0.0, 34.0, 30.0));
        assert_eq!(controls.target, Point3::new(0.0, 10.0, 0.0));
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn azimuth_clamp_limits_rotation() {
        let mut camera = house_camera();
        let mut controls = OrbitControls::new(&camera, (1920, 1080));
        controls.bounds.min_azimuth_angle = -0.5;
        controls.bounds.max_azimuth_angle = 0.5;

        controls.rotate_left(2.0);
        controls.update(&mut camera);
        let offset = camera.position - controls.target;
        assert_relative_eq!(offset.x.atan2(offset.z), -0.5, epsilon = 1e-4);
    }
}
