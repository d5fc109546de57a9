//! Free-fly and surface-locked camera.
//!
//! Look direction is stored as yaw and pitch in a local frame (`basis`).
//! Free-fly uses the world frame. Surface-locked rebuilds the frame on every
//! move so its Y axis points away from the planet centre, which keeps the
//! horizon level while walking around the sphere.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
use tracing::debug;

use crate::MoveInput;

/// Pitch is held strictly inside this many degrees of straight up or down.
pub const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Direction used when a surface-locked camera sits exactly at the centre.
const FALLBACK_UP: Vec3 = Vec3::NEG_Z;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    FreeFly,
    SurfaceLocked,
}

/// Tunables, normally taken from the camera and input config sections.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    /// Distance per simulation step.
    pub move_speed: f32,
    /// Free-fly speed multiplier while sprinting.
    pub sprint_multiplier: f32,
    /// Surface-locked cameras sit at `radius * surface_offset`.
    pub surface_offset: f32,
    /// Degrees per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    pub invert_y: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_speed: 2.5 * 0.016,
            sprint_multiplier: 4.0,
            surface_offset: 1.05,
            mouse_sensitivity: 0.1,
            invert_y: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    /// Local frame: columns are right, up and forward.
    basis: Mat3,
    /// Degrees.
    yaw: f32,
    /// Degrees.
    pitch: f32,
    mode: CameraMode,
    /// Drop the next look delta.
    first_mouse: bool,
    pub settings: CameraSettings,
}

impl OrbitCamera {
    /// Free-fly camera at `position`, looking down +Z.
    pub fn new(position: Vec3, settings: CameraSettings) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::Z,
            up: Vec3::Y,
            right: Vec3::NEG_X,
            basis: Mat3::IDENTITY,
            yaw: 90.0,
            pitch: 0.0,
            mode: CameraMode::FreeFly,
            first_mouse: true,
            settings,
        };
        camera.update_vectors();
        camera
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn basis(&self) -> Mat3 {
        self.basis
    }

    /// Ignore the next look delta. Call when pointer capture resumes so the
    /// jump from the released cursor position is not applied.
    pub fn reset_first_mouse(&mut self) {
        self.first_mouse = true;
    }

    /// Apply a mouse delta in pixels, screen Y pointing down.
    pub fn look(&mut self, delta: Vec2) {
        if self.first_mouse {
            self.first_mouse = false;
            return;
        }
        let sensitivity = self.settings.mouse_sensitivity;
        let dy = if self.settings.invert_y { delta.y } else { -delta.y };
        self.yaw += delta.x * sensitivity;
        self.pitch = (self.pitch + dy * sensitivity)
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        self.update_vectors();
    }

    /// Move for one simulation step.
    pub fn translate(&mut self, input: MoveInput, planet_radius: f32) {
        if input.is_idle() {
            return;
        }
        let mut speed = self.settings.move_speed;
        if input.sprint && self.mode == CameraMode::FreeFly {
            speed *= self.settings.sprint_multiplier;
        }
        self.position += (self.front * input.forward + self.right * input.strafe) * speed;

        if self.mode == CameraMode::SurfaceLocked {
            self.pin_to_surface(planet_radius);
            self.rebuild_basis(0.0);
            self.update_vectors();
        }
    }

    pub fn set_mode(&mut self, mode: CameraMode, planet_radius: f32) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        match mode {
            CameraMode::SurfaceLocked => {
                self.pin_to_surface(planet_radius);
                self.rebuild_basis(0.0);
            }
            CameraMode::FreeFly => self.basis = Mat3::IDENTITY,
        }
        self.update_vectors();
        debug!(?mode, position = ?self.position, "Camera mode changed");
    }

    /// Carry a surface-locked camera along with a planet that turned by
    /// `angle` radians about +Y. Free-fly cameras stay put.
    pub fn apply_planet_rotation(&mut self, angle: f32, planet_radius: f32) {
        if self.mode != CameraMode::SurfaceLocked || angle == 0.0 {
            return;
        }
        self.position = Quat::from_rotation_y(angle) * self.position;
        self.pin_to_surface(planet_radius);
        self.rebuild_basis(angle);
        self.update_vectors();
    }

    /// Re-pin after the planet radius changed.
    pub fn relock(&mut self, planet_radius: f32) {
        if self.mode == CameraMode::SurfaceLocked {
            self.pin_to_surface(planet_radius);
            self.rebuild_basis(0.0);
            self.update_vectors();
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.front, self.up)
    }

    fn pin_to_surface(&mut self, planet_radius: f32) {
        let direction = self.position.try_normalize().unwrap_or(FALLBACK_UP);
        self.position = direction * planet_radius * self.settings.surface_offset;
    }

    /// Re-orthonormalise the local frame against the current surface normal,
    /// keeping the previous right axis (turned by `spin` about +Y) as the
    /// horizontal reference.
    fn rebuild_basis(&mut self, spin: f32) {
        let up = self.position.try_normalize().unwrap_or(FALLBACK_UP);
        let carried_right = Mat3::from_rotation_y(spin) * self.basis.x_axis;
        let forward = up
            .cross(-carried_right)
            .try_normalize()
            .unwrap_or_else(|| up.any_orthonormal_vector());
        let right = -forward.cross(up);
        self.basis = Mat3::from_cols(right, up, forward);
    }

    fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        let local = Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos);

        self.up = self.basis.y_axis;
        self.front = (self.basis * local).normalize();
        self.right = self.front.cross(self.up).normalize();
    }
}

/// Reverse-Z perspective with an infinite far plane: depth is 1 at the near
/// plane and falls toward 0 with distance.
pub fn projection(fov_y_degrees: f32, aspect: f32, near: f32) -> Mat4 {
    Mat4::perspective_infinite_reverse_rh(fov_y_degrees.to_radians(), aspect.max(1e-4), near)
}
