//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level workbench configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub input: InputConfig,
    pub camera: CameraConfig,
    pub atmosphere: AtmosphereConfig,
    pub planet: PlanetConfig,
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Base window title; the editor appends its status to it.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip plane distance.
    pub near_plane: f32,
    /// Draw the scattering shell around the planet.
    pub atmosphere_enabled: bool,
    /// Displace vertices on the CPU at regeneration time instead of in the
    /// vertex stage.
    pub cpu_displacement: bool,
    /// Background colour (linear RGB).
    pub clear_color: [f32; 3],
    /// Load WGSL from this directory instead of the embedded copies.
    pub shader_dir: Option<PathBuf>,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Degrees of yaw/pitch per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    /// Invert Y axis for camera look.
    pub invert_y: bool,
}

/// Camera movement configuration. Speeds are per fixed simulation step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub move_speed: f32,
    /// Free-fly speed multiplier while shift is held.
    pub sprint_multiplier: f32,
    /// Surface-locked cameras sit at `radius * surface_offset`.
    pub surface_offset: f32,
    pub start_position: [f32; 3],
}

/// Atmosphere scattering constants and tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AtmosphereConfig {
    /// Shell thickness as a fraction of the planet radius.
    pub thickness: f32,
    /// Mie phase asymmetry in [-1, 1].
    pub g_mie: f32,
    pub density_falloff: f32,
    pub scatter_strength: f32,
    pub sun_brightness: f32,
    pub exposure: f32,
    pub sample_count: u32,
    pub k_rayleigh: f32,
    pub k_mie: f32,
    /// Red, green and blue wavelengths in nanometres.
    pub wavelengths_nm: [f32; 3],
    pub light_position: [f32; 3],
    pub light_color: [f32; 3],
}

/// Initial planet shape and editor persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    pub radius: f32,
    /// Grid points per cube-face edge.
    pub resolution: u32,
    pub seed: f32,
    /// Planet spin in degrees per simulation step.
    pub rotation_speed: f32,
    /// Regenerate as soon as a shape value changes.
    pub auto_regenerate: bool,
    pub save_folder: PathBuf,
    pub save_file: String,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show FPS and frame time in the window title.
    pub show_fps: bool,
    /// Tracing filter override (e.g. "debug", "info,planetoid_planet=trace").
    /// Empty keeps the built-in default.
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Planetoid".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near_plane: 0.1,
            atmosphere_enabled: true,
            cpu_displacement: false,
            clear_color: [0.1, 0.1, 0.1],
            shader_dir: None,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.1,
            invert_y: false,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.5 * 0.016,
            sprint_multiplier: 4.0,
            surface_offset: 1.05,
            start_position: [0.0, 0.0, -10.0],
        }
    }
}

impl Default for AtmosphereConfig {
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
            wavelengths_nm: [650.0, 570.0, 475.0],
            light_position: [0.0, 100.0, -600.0],
            light_color: [1.0, 1.0, 1.0],
        }
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            resolution: 50,
            seed: 0.0,
            rotation_speed: 0.0,
            auto_regenerate: true,
            save_folder: PathBuf::from("planets"),
            save_file: "planet_config.txt".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_fps: true,
            log_level: String::new(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load `config.ron` from `config_dir`, writing a default one first if absent.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path,
            source,
        })
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }
}
