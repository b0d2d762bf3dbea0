use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use winit::dpi::PhysicalSize;

const DEFAULT_UP: Vec3 = Vec3::Y;

/// Perspective camera the hit-tester casts rays from.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    pub fn new(position: Vec3, target: Vec3, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self { position, target, up: DEFAULT_UP, fov_y_radians, near, far }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, aspect.max(0.0001), self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// World-space ray through a normalized pointer coordinate
    /// ([-1, 1] on both axes, origin at the viewport center). Derived
    /// fresh from the current camera state on every call; nothing is
    /// memoized, so a free-orbiting camera stays consistent with the
    /// last pointer position.
    pub fn ndc_ray(&self, ndc: Vec2, aspect: f32) -> Option<(Vec3, Vec3)> {
        let clip = Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let inv_view_proj = self.view_projection(aspect).inverse();
        let world = inv_view_proj * clip;
        if world.w.abs() < f32::EPSILON {
            return None;
        }
        let toward = (world.truncate() / world.w) - self.position;
        Some((self.position, toward.normalize()))
    }
}

/// Maps a viewport-pixel position to the normalized [-1, 1] coordinate
/// the hit-tester consumes. Y flips so +Y is up, matching NDC.
pub fn viewport_to_ndc(pixel: Vec2, viewport: PhysicalSize<u32>) -> Vec2 {
    if viewport.width == 0 || viewport.height == 0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (2.0 * pixel.x / viewport.width as f32) - 1.0,
        1.0 - (2.0 * pixel.y / viewport.height as f32),
    )
}

/// Orbit controller storing yaw/pitch/radius around a pannable target.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub yaw_radians: f32,
    pub pitch_radians: f32,
}

impl OrbitCamera {
    pub fn new(target: Vec3, radius: f32) -> Self {
        Self { target, radius: radius.max(0.01), yaw_radians: 0.0, pitch_radians: 0.0 }
    }

    pub fn to_camera(&self, fov_y_radians: f32, near: f32, far: f32) -> Camera3D {
        let rotation = Quat::from_euler(glam::EulerRot::YXZ, self.yaw_radians, self.pitch_radians, 0.0);
        let offset = rotation * Vec3::new(0.0, 0.0, self.radius);
        Camera3D::new(self.target + offset, self.target, fov_y_radians, near, far)
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw_radians += delta.x;
        self.pitch_radians = (self.pitch_radians + delta.y)
            .clamp(-std::f32::consts::FRAC_PI_2 + 0.01, std::f32::consts::FRAC_PI_2 - 0.01);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.radius = (self.radius * factor).clamp(5.0, 400.0);
    }

    /// Pans the target in the camera's screen plane.
    pub fn pan(&mut self, delta: Vec2, fov_y_radians: f32, near: f32, far: f32) {
        let camera = self.to_camera(fov_y_radians, near, far);
        let forward = (camera.target - camera.position).normalize();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward);
        let per_pixel = self.radius * 0.002;
        self.target += right * (-delta.x * per_pixel) + up * (delta.y * per_pixel);
    }
}
