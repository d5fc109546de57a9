//! Tuning panel model, independent of any widget toolkit.
//!
//! The editor keeps a selected tunable and a selected noise layer. Commands
//! nudge the selection within its slider range or edit the layer list, and
//! report whether anything changed so the caller can redraw.

use std::path::PathBuf;

use planetoid_terrain::{NoiseLayer, load_shape, save_shape};
use tracing::{info, warn};

use crate::state::SimulationState;

/// One slider in the tuning panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tunable {
    RotationSpeed,
    DensityFalloff,
    Seed,
    MieG,
    LightRed,
    LightGreen,
    LightBlue,
    Radius,
    Resolution,
    LayerStrength,
    LayerRoughness,
    LayerBaseRoughness,
    LayerOctaves,
    LayerPersistence,
    LayerMinValue,
}

impl Tunable {
    pub const ALL: [Tunable; 15] = [
        Self::RotationSpeed,
        Self::DensityFalloff,
        Self::Seed,
        Self::MieG,
        Self::LightRed,
        Self::LightGreen,
        Self::LightBlue,
        Self::Radius,
        Self::Resolution,
        Self::LayerStrength,
        Self::LayerRoughness,
        Self::LayerBaseRoughness,
        Self::LayerOctaves,
        Self::LayerPersistence,
        Self::LayerMinValue,
    ];

    /// Inclusive slider range.
    pub fn range(self) -> (f32, f32) {
        match self {
            Self::RotationSpeed => (0.0, 3.0),
            Self::DensityFalloff => (0.0, 30.0),
            Self::Seed => (0.0, 100.0),
            Self::MieG => (-1.0, 1.0),
            Self::LightRed | Self::LightGreen | Self::LightBlue => (0.0, 1.0),
            Self::Radius => (0.0, 10.0),
            Self::Resolution => (2.0, 50.0),
            Self::LayerStrength => (0.0, 2.0),
            Self::LayerRoughness | Self::LayerBaseRoughness => (0.0, 5.0),
            Self::LayerOctaves => (1.0, 10.0),
            Self::LayerPersistence => (0.0, 1.0),
            Self::LayerMinValue => (0.0, 2.0),
        }
    }

    /// Amount one nudge moves the value.
    pub fn step(self) -> f32 {
        match self {
            Self::Seed | Self::Resolution | Self::LayerOctaves => 1.0,
            Self::DensityFalloff => 0.5,
            Self::Radius | Self::LayerRoughness | Self::LayerBaseRoughness => 0.1,
            Self::MieG => 0.01,
            _ => 0.05,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::RotationSpeed => "Rotation Speed",
            Self::DensityFalloff => "Density Falloff",
            Self::Seed => "Seed",
            Self::MieG => "Mie G",
            Self::LightRed => "Light Red",
            Self::LightGreen => "Light Green",
            Self::LightBlue => "Light Blue",
            Self::Radius => "Radius",
            Self::Resolution => "Resolution",
            Self::LayerStrength => "Strength",
            Self::LayerRoughness => "Roughness",
            Self::LayerBaseRoughness => "Base Roughness",
            Self::LayerOctaves => "Octaves",
            Self::LayerPersistence => "Persistence",
            Self::LayerMinValue => "Min Value",
        }
    }

    /// Editing this value changes the planet geometry.
    pub fn affects_shape(self) -> bool {
        matches!(self, Self::Seed | Self::Radius | Self::Resolution) || self.is_layer_field()
    }

    pub fn is_layer_field(self) -> bool {
        matches!(
            self,
            Self::LayerStrength
                | Self::LayerRoughness
                | Self::LayerBaseRoughness
                | Self::LayerOctaves
                | Self::LayerPersistence
                | Self::LayerMinValue
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    NextTunable,
    PreviousTunable,
    NextLayer,
    PreviousLayer,
    Increase,
    Decrease,
    ToggleLayer,
    AddLayer,
    DeleteLayer,
    MoveLayerUp,
    MoveLayerDown,
    ToggleAtmosphere,
    ToggleSurfaceLock,
    ToggleAutoRegenerate,
    Regenerate,
    Save,
    Load,
}

pub const SAVE_OK: &str = "Config saved successfully!";
pub const LOAD_OK: &str = "Config loaded successfully!";

#[derive(Debug, Clone)]
pub struct PlanetEditor {
    selected: usize,
    layer: usize,
    status: String,
    save_folder: PathBuf,
    save_file: String,
}

impl PlanetEditor {
    pub fn new(save_folder: impl Into<PathBuf>, save_file: impl Into<String>) -> Self {
        Self {
            selected: 0,
            layer: 0,
            status: String::new(),
            save_folder: save_folder.into(),
            save_file: save_file.into(),
        }
    }

    pub fn selected(&self) -> Tunable {
        Tunable::ALL[self.selected]
    }

    pub fn selected_layer(&self) -> usize {
        self.layer
    }

    /// Result of the last save or load.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Apply `command`. Returns true when state visibly changed.
    pub fn apply(&mut self, command: EditorCommand, state: &mut SimulationState) -> bool {
        let layer_count = state.shape.noise_layers.len();
        match command {
            EditorCommand::NextTunable => {
                self.selected = (self.selected + 1) % Tunable::ALL.len();
                true
            }
            EditorCommand::PreviousTunable => {
                self.selected = (self.selected + Tunable::ALL.len() - 1) % Tunable::ALL.len();
                true
            }
            EditorCommand::NextLayer if layer_count > 0 => {
                self.layer = (self.layer + 1) % layer_count;
                true
            }
            EditorCommand::PreviousLayer if layer_count > 0 => {
                self.layer = (self.layer + layer_count - 1) % layer_count;
                true
            }
            EditorCommand::NextLayer | EditorCommand::PreviousLayer => false,
            EditorCommand::Increase => self.nudge(state, 1.0),
            EditorCommand::Decrease => self.nudge(state, -1.0),
            EditorCommand::ToggleLayer => match state.shape.noise_layers.get_mut(self.layer) {
                Some(layer) => {
                    layer.enabled = !layer.enabled;
                    state.shape_edited();
                    true
                }
                None => false,
            },
            EditorCommand::AddLayer => {
                state.shape.add_layer(NoiseLayer::default());
                self.layer = state.shape.noise_layers.len() - 1;
                state.shape_edited();
                true
            }
            EditorCommand::DeleteLayer => {
                if state.shape.remove_layer(self.layer).is_none() {
                    return false;
                }
                self.clamp_layer(state);
                state.shape_edited();
                true
            }
            EditorCommand::MoveLayerUp => self.move_layer(state, -1),
            EditorCommand::MoveLayerDown => self.move_layer(state, 1),
            EditorCommand::ToggleAtmosphere => {
                state.atmosphere_enabled = !state.atmosphere_enabled;
                true
            }
            EditorCommand::ToggleSurfaceLock => {
                state.toggle_surface_lock();
                true
            }
            EditorCommand::ToggleAutoRegenerate => {
                state.auto_regenerate = !state.auto_regenerate;
                true
            }
            EditorCommand::Regenerate => {
                state.request_rebuild();
                true
            }
            EditorCommand::Save => {
                self.save(state);
                true
            }
            EditorCommand::Load => {
                self.load(state);
                true
            }
        }
    }

    /// Current value of `tunable`, or `None` for a layer field with no layer
    /// selected.
    pub fn value(&self, tunable: Tunable, state: &SimulationState) -> Option<f32> {
        let layer = state.shape.noise_layers.get(self.layer);
        let value = match tunable {
            Tunable::RotationSpeed => state.rotation_speed,
            Tunable::DensityFalloff => state.atmosphere.density_falloff,
            Tunable::Seed => state.shape.seed,
            Tunable::MieG => state.atmosphere.g_mie,
            Tunable::LightRed => state.atmosphere.light_color.x,
            Tunable::LightGreen => state.atmosphere.light_color.y,
            Tunable::LightBlue => state.atmosphere.light_color.z,
            Tunable::Radius => state.shape.radius,
            Tunable::Resolution => state.shape.resolution as f32,
            Tunable::LayerStrength => layer?.strength,
            Tunable::LayerRoughness => layer?.roughness,
            Tunable::LayerBaseRoughness => layer?.base_roughness,
            Tunable::LayerOctaves => layer?.octaves as f32,
            Tunable::LayerPersistence => layer?.persistence,
            Tunable::LayerMinValue => layer?.min_value,
        };
        Some(value)
    }

    fn set_value(&self, tunable: Tunable, state: &mut SimulationState, value: f32) {
        let layer = state.shape.noise_layers.get_mut(self.layer);
        match (tunable, layer) {
            (Tunable::RotationSpeed, _) => state.rotation_speed = value,
            (Tunable::DensityFalloff, _) => state.atmosphere.density_falloff = value,
            (Tunable::Seed, _) => state.shape.seed = value,
            (Tunable::MieG, _) => state.atmosphere.g_mie = value,
            (Tunable::LightRed, _) => state.atmosphere.light_color.x = value,
            (Tunable::LightGreen, _) => state.atmosphere.light_color.y = value,
            (Tunable::LightBlue, _) => state.atmosphere.light_color.z = value,
            (Tunable::Radius, _) => state.shape.radius = value,
            (Tunable::Resolution, _) => state.shape.resolution = value.round() as u32,
            (Tunable::LayerStrength, Some(l)) => l.strength = value,
            (Tunable::LayerRoughness, Some(l)) => l.roughness = value,
            (Tunable::LayerBaseRoughness, Some(l)) => l.base_roughness = value,
            (Tunable::LayerOctaves, Some(l)) => l.octaves = value.round() as u32,
            (Tunable::LayerPersistence, Some(l)) => l.persistence = value,
            (Tunable::LayerMinValue, Some(l)) => l.min_value = value,
            (_, None) => {}
        }
    }

    fn nudge(&mut self, state: &mut SimulationState, direction: f32) -> bool {
        let tunable = self.selected();
        let Some(current) = self.value(tunable, state) else {
            return false;
        };
        let (min, max) = tunable.range();
        let next = (current + direction * tunable.step()).clamp(min, max);
        if next == current {
            return false;
        }
        self.set_value(tunable, state, next);
        if tunable.affects_shape() {
            state.shape_edited();
        }
        true
    }

    fn move_layer(&mut self, state: &mut SimulationState, offset: isize) -> bool {
        let Some(target) = self.layer.checked_add_signed(offset) else {
            return false;
        };
        if !state.shape.swap_layers(self.layer, target) {
            return false;
        }
        self.layer = target;
        state.shape_edited();
        true
    }

    fn clamp_layer(&mut self, state: &SimulationState) {
        self.layer = self.layer.min(state.shape.noise_layers.len().saturating_sub(1));
    }

    fn save(&mut self, state: &SimulationState) {
        match save_shape(&state.shape, &self.save_folder, &self.save_file) {
            Ok(path) => {
                info!("Saved shape to {}", path.display());
                self.status = SAVE_OK.to_string();
            }
            Err(e) => {
                warn!("Save failed: {e}");
                self.status = e.status_text();
            }
        }
    }

    fn load(&mut self, state: &mut SimulationState) {
        match load_shape(&self.save_folder, &self.save_file) {
            Ok(saved) => {
                info!(layers = saved.layers.len(), "Loaded shape");
                state.shape.apply_saved(saved);
                self.clamp_layer(state);
                state.request_rebuild();
                self.status = LOAD_OK.to_string();
            }
            Err(e) => {
                warn!("Load failed: {e}");
                self.status = e.status_text();
            }
        }
    }

    /// One-line summary for the window title.
    pub fn describe(&self, state: &SimulationState) -> String {
        let tunable = self.selected();
        let value = match self.value(tunable, state) {
            Some(v) => format!("{v:.2}"),
            None => "-".to_string(),
        };
        let mut text = format!("{} = {value}", tunable.label());
        if tunable.is_layer_field() || !state.shape.noise_layers.is_empty() {
            let enabled = state
                .shape
                .noise_layers
                .get(self.layer)
                .is_some_and(|l| l.enabled);
            text.push_str(&format!(
                " | layer {}/{}{}",
                (self.layer + 1).min(state.shape.noise_layers.len()),
                state.shape.noise_layers.len(),
                if enabled { "" } else { " (off)" }
            ));
        }
        if !state.auto_regenerate {
            text.push_str(" | manual regen");
        }
        if !self.status.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status);
        }
        text
    }
}
