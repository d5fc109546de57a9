//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Planetoid command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "planetoid", about = "Procedural planet and atmosphere workbench")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Grid points per cube-face edge.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Planet radius.
    #[arg(long)]
    pub radius: Option<f32>,

    /// Terrain seed.
    #[arg(long)]
    pub seed: Option<f32>,

    /// Load a saved shape file at startup.
    #[arg(long)]
    pub shape: Option<PathBuf>,

    /// Displace vertices on the CPU instead of the vertex stage.
    #[arg(long)]
    pub cpu_displacement: bool,

    /// Log filter (error, warn, info, debug, trace or a full RUST_LOG string).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(res) = args.resolution {
            self.planet.resolution = res;
        }
        if let Some(radius) = args.radius {
            self.planet.radius = radius;
        }
        if let Some(seed) = args.seed {
            self.planet.seed = seed;
        }
        if args.cpu_displacement {
            self.render.cpu_displacement = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            resolution: Some(12),
            cpu_displacement: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.planet.resolution, 12);
        assert!(config.render.cpu_displacement);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.planet.radius, 4.0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "planetoid",
            "--radius",
            "2.5",
            "--seed",
            "7",
            "--shape",
            "planets/moon.txt",
            "--cpu-displacement",
        ]);
        assert_eq!(args.radius, Some(2.5));
        assert_eq!(args.seed, Some(7.0));
        assert_eq!(args.shape, Some(PathBuf::from("planets/moon.txt")));
        assert!(args.cpu_displacement);
    }
}
