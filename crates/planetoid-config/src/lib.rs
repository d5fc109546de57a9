//! Configuration for the planetoid workbench.
//!
//! Settings persist to disk as RON, can be overridden from the command line via
//! clap, and tolerate missing or unknown fields so older files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AtmosphereConfig, CameraConfig, Config, DebugConfig, InputConfig, PlanetConfig, RenderConfig,
    WindowConfig,
};
pub use error::ConfigError;
