//! Plain-text shape files.
//!
//! Whitespace-separated tokens, written one record per line:
//!
//! ```text
//! <radius>
//! <layer count>
//! <strength> <roughness> <baseRoughness> <octaves> <persistence> <minValue> <cx> <cy> <cz> <enabled 0|1>
//! ...
//! ```
//!
//! Resolution and seed are not stored.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;

use glam::Vec3;
use thiserror::Error;
use tracing::{debug, info};

use crate::{NoiseLayer, ShapeConfig};

#[derive(Debug, Error)]
pub enum ShapeIoError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("missing {field} at token {index}")]
    MissingToken { field: &'static str, index: usize },

    #[error("invalid {field} {token:?} at token {index}")]
    InvalidToken {
        field: &'static str,
        token: String,
        index: usize,
    },
}

impl ShapeIoError {
    /// Short message for the editor status line.
    #[must_use]
    pub fn status_text(&self) -> String {
        match self {
            Self::CreateDir { .. } => "Failed to create directory!".to_string(),
            Self::Write { .. } => "Failed to open file for writing!".to_string(),
            Self::Read { .. } => "Failed to open file for reading!".to_string(),
            Self::MissingToken { .. } | Self::InvalidToken { .. } => {
                format!("Failed to parse config: {self}")
            }
        }
    }
}

/// Contents of a shape file.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedShape {
    pub radius: f32,
    pub layers: Vec<NoiseLayer>,
}

impl ShapeConfig {
    /// Replace radius and layers with a loaded shape. Resolution and seed are
    /// kept.
    pub fn apply_saved(&mut self, saved: SavedShape) {
        self.radius = saved.radius;
        self.noise_layers = saved.layers;
    }
}

#[must_use]
pub fn serialize_shape(shape: &ShapeConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", shape.radius);
    let _ = writeln!(out, "{}", shape.noise_layers.len());
    for layer in &shape.noise_layers {
        let _ = writeln!(
            out,
            "{} {} {} {} {} {} {} {} {} {}",
            layer.strength,
            layer.roughness,
            layer.base_roughness,
            layer.octaves,
            layer.persistence,
            layer.min_value,
            layer.center.x,
            layer.center.y,
            layer.center.z,
            u8::from(layer.enabled),
        );
    }
    out
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    index: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
            index: 0,
        }
    }

    fn next_token(&mut self, field: &'static str) -> Result<&'a str, ShapeIoError> {
        let index = self.index;
        self.index += 1;
        self.inner
            .next()
            .ok_or(ShapeIoError::MissingToken { field, index })
    }

    fn parse<T: std::str::FromStr>(&mut self, field: &'static str) -> Result<T, ShapeIoError> {
        let index = self.index;
        let token = self.next_token(field)?;
        token.parse().map_err(|_| ShapeIoError::InvalidToken {
            field,
            token: token.to_string(),
            index,
        })
    }

    fn parse_flag(&mut self, field: &'static str) -> Result<bool, ShapeIoError> {
        Ok(self.parse::<i64>(field)? != 0)
    }
}

/// Parse shape file text. Tokens after the last layer are ignored.
pub fn deserialize_shape(text: &str) -> Result<SavedShape, ShapeIoError> {
    let mut tokens = Tokens::new(text);
    let radius = tokens.parse("radius")?;
    let count: usize = tokens.parse("layer count")?;

    let mut layers = Vec::new();
    for _ in 0..count {
        let strength = tokens.parse("strength")?;
        let roughness = tokens.parse("roughness")?;
        let base_roughness = tokens.parse("base roughness")?;
        let octaves = tokens.parse("octaves")?;
        let persistence = tokens.parse("persistence")?;
        let min_value = tokens.parse("min value")?;
        let center = Vec3::new(
            tokens.parse("center x")?,
            tokens.parse("center y")?,
            tokens.parse("center z")?,
        );
        let enabled = tokens.parse_flag("enabled")?;
        layers.push(NoiseLayer {
            strength,
            roughness,
            base_roughness,
            octaves,
            persistence,
            min_value,
            center,
            enabled,
        });
    }

    Ok(SavedShape { radius, layers })
}

/// Write `shape` to `folder/file`, creating `folder` if needed.
pub fn save_shape(shape: &ShapeConfig, folder: &Path, file: &str) -> Result<PathBuf, ShapeIoError> {
    fs::create_dir_all(folder).map_err(|source| ShapeIoError::CreateDir {
        path: folder.to_path_buf(),
        source,
    })?;

    let path = folder.join(file);
    fs::write(&path, serialize_shape(shape)).map_err(|source| ShapeIoError::Write {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), layers = shape.noise_layers.len(), "Saved shape");
    Ok(path)
}

/// Read `folder/file`.
pub fn load_shape(folder: &Path, file: &str) -> Result<SavedShape, ShapeIoError> {
    load_shape_file(&folder.join(file))
}

pub fn load_shape_file(path: &Path) -> Result<SavedShape, ShapeIoError> {
    let text = fs::read_to_string(path).map_err(|source| ShapeIoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let saved = deserialize_shape(&text)?;
    debug!(path = %path.display(), layers = saved.layers.len(), "Loaded shape");
    Ok(saved)
}
