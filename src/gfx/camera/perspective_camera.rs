use cgmath::*;

use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform, OPENGL_TO_WGPU_MATRIX};

/// Perspective camera with a cached projection matrix.
///
/// Changing `fovy`, `aspect`, `znear` or `zfar` has no effect on the
/// projection until [`PerspectiveCamera::update_projection_matrix`] is called.
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    projection: Matrix4<f32>,
}

impl Camera for PerspectiveCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }
}

impl PerspectiveCamera {
    /// Creates a camera at the origin looking down -Z.
    pub fn new(fovy: Deg<f32>, aspect: f32, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            fovy,
            aspect,
            znear,
            zfar,
            position: Point3::origin(),
            target: Point3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Point3::new(x, y, z);
    }

    /// Orients the camera toward `target`.
    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Recomputes the cached projection from the current parameters.
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// Unit vector from the camera toward its target.
    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: self.position.to_homogeneous().into(),
            view_proj: convert_matrix4_to_array(self.build_view_projection_matrix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn projection_is_cached_until_updated() {
        let mut camera = PerspectiveCamera::new(Deg(45.0), 1.0, 0.1, 1000.0);
        let before = camera.projection_matrix();

        camera.aspect = 2.0;
        assert_eq!(camera.projection_matrix(), before);

        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
        // x scale halves when the aspect doubles
        assert_relative_eq!(camera.projection_matrix().x.x * 2.0, before.x.x, epsilon = 1e-6);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let mut camera = PerspectiveCamera::new(Deg(45.0), 16.0 / 9.0, 0.1, 1000.0);
        camera.set_position(0.0, 34.0, 30.0);
        camera.look_at(Point3::new(0.0, 10.0, 0.0));

        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 10.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }

    #[test]
    fn uniform_carries_eye_position() {
        let mut camera = PerspectiveCamera::new(Deg(45.0), 1.0, 0.1, 1000.0);
        camera.set_position(0.0, 34.0, 30.0);
        assert_eq!(camera.uniform().view_position, [0.0, 34.0, 30.0, 1.0]);
    }
}
