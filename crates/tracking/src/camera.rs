//! Device camera pose and projection.

use crate::raycast::Ray;
use arplace_core::ScreenPoint;
use glam::{Mat4, Vec3};

/// Pose and intrinsics of the device camera for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Horizontal rotation in radians (around Y axis).
    pub yaw: f32,
    /// Vertical rotation in radians (around local X axis).
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// View size in points (width, height).
    pub viewport: (f32, f32),
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            fov: std::f32::consts::FRAC_PI_3, // 60 degrees
            viewport: (390.0, 844.0),
        }
    }
}

impl Camera {
    /// Create a camera at `position` looking along yaw/pitch.
    pub fn looking(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            ..Default::default()
        };
        camera.rotate(yaw, pitch);
        camera
    }

    /// Get the forward direction vector (where camera is looking).
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Width over height of the viewport.
    pub fn aspect(&self) -> f32 {
        self.viewport.0 / self.viewport.1
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    /// Rotate the camera (add to yaw and pitch).
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;

        // Clamp pitch to avoid gimbal lock
        const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.yaw = self.yaw.rem_euclid(std::f32::consts::TAU);
    }

    /// Center of the viewport in view coordinates.
    pub fn screen_center(&self) -> ScreenPoint {
        ScreenPoint::new(self.viewport.0 * 0.5, self.viewport.1 * 0.5)
    }

    /// World-space ray through a view point, or `None` outside the viewport.
    pub fn screen_ray(&self, point: ScreenPoint) -> Option<Ray> {
        let (width, height) = self.viewport;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        if !(0.0..=width).contains(&point.x) || !(0.0..=height).contains(&point.y) {
            return None;
        }

        // Screen -> NDC (-1 to 1), flipping Y
        let x = (2.0 * point.x) / width - 1.0;
        let y = 1.0 - (2.0 * point.y) / height;

        // View space looks down -Z; scale the NDC offset by the frustum half-extents.
        let half_height = (self.fov * 0.5).tan();
        let eye = Vec3::new(x * half_height * self.aspect(), y * half_height, -1.0);
        let direction = self
            .view_matrix()
            .inverse()
            .transform_vector3(eye)
            .normalize_or_zero();
        if direction == Vec3::ZERO || !direction.is_finite() {
            return None;
        }

        Some(Ray {
            origin: self.position,
            direction,
        })
    }
}
