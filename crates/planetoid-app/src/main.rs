//! Planetoid: procedural planet and atmosphere workbench.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags, e.g. `planetoid --resolution 80 --seed 12 --shape planets/moon.txt`.

use clap::Parser;
use planetoid_app::platform::PlatformDirs;
use planetoid_app::state::SimulationState;
use planetoid_app::window::{PlanetoidApp, run};
use planetoid_config::{CliArgs, Config};
use planetoid_terrain::load_shape_file;
use tracing::{info, warn};

fn main() {
    let args = CliArgs::parse();

    let dirs = match args.config.clone() {
        Some(dir) => PlatformDirs::with_config_dir(dir),
        None => PlatformDirs::resolve().unwrap_or_else(|e| {
            eprintln!("{e}, using the working directory");
            PlatformDirs::resolve_with_root(std::path::Path::new("."))
        }),
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("{e}");
    }

    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    planetoid_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %dirs.config_dir.display(), "Planetoid starting");

    let mut state = SimulationState::from_config(&config);
    if let Some(path) = &args.shape {
        match load_shape_file(path) {
            Ok(saved) => {
                info!("Loaded shape from {}", path.display());
                state.shape.apply_saved(saved);
            }
            Err(e) => warn!("Ignoring --shape: {e}"),
        }
    }

    run(PlanetoidApp::new(config, state));
}
