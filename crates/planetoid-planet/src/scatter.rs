//! Single-scattering atmosphere inputs.
//!
//! [`ScatteringSettings`] holds the user-tunable physical constants;
//! [`ScatteringParams::derive`] turns them plus the current camera position
//! into every scalar the atmosphere and ground shaders consume. Derivation is
//! cheap and runs every frame since the camera height changes continuously.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::PI;

/// Wavelength the per-channel weights are normalised against, in nm.
pub const REFERENCE_WAVELENGTH: f32 = 400.0;

/// Fraction of the atmosphere's height at which average density is found.
pub const SCALE_DEPTH: f32 = 0.25;

/// Smallest atmosphere thickness used, keeping `scale` finite.
const MIN_THICKNESS: f32 = 1e-4;

/// Tunable atmosphere constants.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatteringSettings {
    /// Atmosphere height as a fraction of the planet radius.
    pub thickness: f32,
    /// Mie phase asymmetry in [-1, 1]; negative favours back-scattering.
    pub g_mie: f32,
    pub density_falloff: f32,
    pub scatter_strength: f32,
    pub sun_brightness: f32,
    pub exposure: f32,
    pub sample_count: u32,
    pub k_rayleigh: f32,
    pub k_mie: f32,
    /// Red, green and blue wavelengths in nm.
    pub wavelengths: [f32; 3],
    pub light_position: Vec3,
    pub light_color: Vec3,
}

impl Default for ScatteringSettings {
    fn default() -> Self {
        Self {
            thickness: 0.25,
            g_mie: -0.99,
            density_falloff: 1.0,
            scatter_strength: 20.0,
            sun_brightness: 80.0,
            exposure: 2.0,
            sample_count: 16,
            k_rayleigh: 0.0025,
            k_mie: 0.0010,
            wavelengths: [650.0, 570.0, 475.0],
            light_position: Vec3::new(0.0, 100.0, -600.0),
            light_color: Vec3::ONE,
        }
    }
}

impl ScatteringSettings {
    /// `(400 / λ)^4 * scatter_strength` per channel.
    pub fn inv_wavelength4(&self) -> Vec3 {
        Vec3::from_array(
            self.wavelengths
                .map(|w| (REFERENCE_WAVELENGTH / w).powi(4) * self.scatter_strength),
        )
    }
}

/// Per-frame scattering inputs, derived from settings, planet radius and
/// camera position. The planet is centred at the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatteringParams {
    pub camera_position: Vec3,
    pub camera_height: f32,
    pub camera_height2: f32,
    pub inner_radius: f32,
    pub inner_radius2: f32,
    pub outer_radius: f32,
    pub outer_radius2: f32,
    pub inv_wavelength4: Vec3,
    pub kr_esun: f32,
    pub km_esun: f32,
    pub kr_4pi: f32,
    pub km_4pi: f32,
    /// `1 / (outer - inner)`.
    pub scale: f32,
    pub scale_depth: f32,
    pub scale_over_scale_depth: f32,
    pub g: f32,
    pub g2: f32,
    pub density_falloff: f32,
    pub exposure: f32,
    pub samples: u32,
    pub light_position: Vec3,
    pub light_color: Vec3,
}

impl ScatteringParams {
    pub fn derive(settings: &ScatteringSettings, planet_radius: f32, camera_position: Vec3) -> Self {
        let camera_height = camera_position.length();
        let inner_radius = planet_radius;
        let outer_radius = planet_radius * (1.0 + settings.thickness.max(MIN_THICKNESS));
        let scale = 1.0 / (outer_radius - inner_radius);
        let g = settings.g_mie.clamp(-1.0, 1.0);

        Self {
            camera_position,
            camera_height,
            camera_height2: camera_height * camera_height,
            inner_radius,
            inner_radius2: inner_radius * inner_radius,
            outer_radius,
            outer_radius2: outer_radius * outer_radius,
            inv_wavelength4: settings.inv_wavelength4(),
            kr_esun: settings.k_rayleigh * settings.sun_brightness,
            km_esun: settings.k_mie * settings.sun_brightness,
            kr_4pi: settings.k_rayleigh * 4.0 * PI,
            km_4pi: settings.k_mie * 4.0 * PI,
            scale,
            scale_depth: SCALE_DEPTH,
            scale_over_scale_depth: scale / SCALE_DEPTH,
            g,
            g2: g * g,
            density_falloff: settings.density_falloff,
            exposure: settings.exposure,
            samples: settings.sample_count.max(1),
            light_position: settings.light_position,
            light_color: settings.light_color,
        }
    }
}

/// GPU layout of [`ScatteringParams`]. Matches `Scattering` in
/// `bindings.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ScatteringUniform {
    pub camera_position: [f32; 3],
    pub camera_height: f32,
    pub light_position: [f32; 3],
    pub camera_height2: f32,
    pub light_color: [f32; 3],
    pub outer_radius: f32,
    pub inv_wavelength4: [f32; 3],
    pub outer_radius2: f32,
    pub inner_radius: f32,
    pub inner_radius2: f32,
    pub kr_esun: f32,
    pub km_esun: f32,
    pub kr_4pi: f32,
    pub km_4pi: f32,
    pub scale: f32,
    pub scale_depth: f32,
    pub scale_over_scale_depth: f32,
    pub g: f32,
    pub g2: f32,
    pub density_falloff: f32,
    pub exposure: f32,
    pub samples: u32,
    pub _padding: [f32; 2],
}

static_assertions::assert_eq_size!(ScatteringUniform, [u8; 128]);

impl From<&ScatteringParams> for ScatteringUniform {
    fn from(p: &ScatteringParams) -> Self {
        Self {
            camera_position: p.camera_position.to_array(),
            camera_height: p.camera_height,
            light_position: p.light_position.to_array(),
            camera_height2: p.camera_height2,
            light_color: p.light_color.to_array(),
            outer_radius: p.outer_radius,
            inv_wavelength4: p.inv_wavelength4.to_array(),
            outer_radius2: p.outer_radius2,
            inner_radius: p.inner_radius,
            inner_radius2: p.inner_radius2,
            kr_esun: p.kr_esun,
            km_esun: p.km_esun,
            kr_4pi: p.kr_4pi,
            km_4pi: p.km_4pi,
            scale: p.scale,
            scale_depth: p.scale_depth,
            scale_over_scale_depth: p.scale_over_scale_depth,
            g: p.g,
            g2: p.g2,
            density_falloff: p.density_falloff,
            exposure: p.exposure,
            samples: p.samples,
            _padding: [0.0; 2],
        }
    }
}
