//! Everything the main loop mutates between frames.

use glam::{Mat4, Vec3};
use planetoid_config::Config;
use planetoid_planet::{ScatteringParams, ScatteringSettings};
use planetoid_player::{CameraMode, CameraSettings, MoveInput, OrbitCamera, projection};
use planetoid_terrain::ShapeConfig;
use std::f32::consts::TAU;
use tracing::info;

/// Simulation state owned by the main loop and lent to each subsystem.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Working copy edited by the tuning editor. Rendering uses the copy
    /// taken at the last rebuild.
    pub shape: ShapeConfig,
    pub atmosphere: ScatteringSettings,
    pub camera: OrbitCamera,
    /// Degrees per simulation step.
    pub rotation_speed: f32,
    /// Accumulated planet spin about +Y, radians in `[0, TAU)`.
    pub planet_rotation: f32,
    pub atmosphere_enabled: bool,
    pub auto_regenerate: bool,
    /// Cursor released, camera frozen, editor keys active.
    pub settings_mode: bool,
    /// Radius of the shape last rebuilt; the camera locks onto this.
    rendered_radius: f32,
    rebuild_pending: bool,
}

impl SimulationState {
    pub fn new(shape: ShapeConfig, atmosphere: ScatteringSettings, camera: OrbitCamera) -> Self {
        Self {
            rendered_radius: shape.effective_radius(),
            shape,
            atmosphere,
            camera,
            rotation_speed: 0.0,
            planet_rotation: 0.0,
            atmosphere_enabled: true,
            auto_regenerate: true,
            settings_mode: false,
            rebuild_pending: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let shape = ShapeConfig {
            radius: config.planet.radius,
            resolution: config.planet.resolution,
            seed: config.planet.seed,
            ..Default::default()
        };
        let camera = OrbitCamera::new(
            Vec3::from_array(config.camera.start_position),
            camera_settings(config),
        );
        let mut state = Self::new(shape, scattering_settings(config), camera);
        state.rotation_speed = config.planet.rotation_speed;
        state.atmosphere_enabled = config.render.atmosphere_enabled;
        state.auto_regenerate = config.planet.auto_regenerate;
        state
    }

    /// One fixed simulation step.
    pub fn step(&mut self, input: MoveInput) {
        if !self.settings_mode {
            self.camera.translate(input, self.rendered_radius);
        }
        if self.rotation_speed != 0.0 {
            let angle = self.rotation_speed.to_radians();
            self.planet_rotation = (self.planet_rotation + angle).rem_euclid(TAU);
            self.camera.apply_planet_rotation(angle, self.rendered_radius);
        }
    }

    /// Flip settings mode. Leaving it re-arms first-mouse filtering so the
    /// camera does not jump when capture resumes. Returns the new mode.
    pub fn toggle_settings_mode(&mut self) -> bool {
        self.settings_mode = !self.settings_mode;
        if !self.settings_mode {
            self.camera.reset_first_mouse();
        }
        info!(settings_mode = self.settings_mode, "Settings mode toggled");
        self.settings_mode
    }

    pub fn toggle_surface_lock(&mut self) -> CameraMode {
        let mode = match self.camera.mode() {
            CameraMode::FreeFly => CameraMode::SurfaceLocked,
            CameraMode::SurfaceLocked => CameraMode::FreeFly,
        };
        self.camera.set_mode(mode, self.rendered_radius);
        mode
    }

    /// Note that the shape changed; regenerates only with auto-regenerate on.
    pub fn shape_edited(&mut self) {
        if self.auto_regenerate {
            self.rebuild_pending = true;
        }
    }

    pub fn request_rebuild(&mut self) {
        self.rebuild_pending = true;
    }

    pub fn rebuild_pending(&self) -> bool {
        self.rebuild_pending
    }

    /// Clear the pending flag, returning whether a rebuild was due.
    pub fn take_rebuild(&mut self) -> bool {
        std::mem::take(&mut self.rebuild_pending)
    }

    /// Record that the planet was rebuilt from the current working shape.
    pub fn rebuilt(&mut self) {
        self.rendered_radius = self.shape.effective_radius();
        self.camera.relock(self.rendered_radius);
    }

    pub fn rendered_radius(&self) -> f32 {
        self.rendered_radius
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.planet_rotation)
    }

    pub fn view_proj(&self, fov_y_degrees: f32, aspect: f32, near: f32) -> Mat4 {
        projection(fov_y_degrees, aspect, near) * self.camera.view_matrix()
    }

    /// Scattering inputs for this frame.
    pub fn scattering(&self) -> ScatteringParams {
        ScatteringParams::derive(&self.atmosphere, self.rendered_radius, self.camera.position)
    }
}

fn camera_settings(config: &Config) -> CameraSettings {
    CameraSettings {
        move_speed: config.camera.move_speed,
        sprint_multiplier: config.camera.sprint_multiplier,
        surface_offset: config.camera.surface_offset,
        mouse_sensitivity: config.input.mouse_sensitivity,
        invert_y: config.input.invert_y,
    }
}

fn scattering_settings(config: &Config) -> ScatteringSettings {
    let atmosphere = &config.atmosphere;
    ScatteringSettings {
        thickness: atmosphere.thickness,
        g_mie: atmosphere.g_mie,
        density_falloff: atmosphere.density_falloff,
        scatter_strength: atmosphere.scatter_strength,
        sun_brightness: atmosphere.sun_brightness,
        exposure: atmosphere.exposure,
        sample_count: atmosphere.sample_count,
        k_rayleigh: atmosphere.k_rayleigh,
        k_mie: atmosphere.k_mie,
        wavelengths: atmosphere.wavelengths_nm,
        light_position: Vec3::from_array(atmosphere.light_position),
        light_color: Vec3::from_array(atmosphere.light_color),
    }
}
