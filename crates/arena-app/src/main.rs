//! Command-line front end: generate an arena heightfield and report on it.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags, e.g. `worley-arena --metric manhattan --seed 42 --output heights.json`.

mod export;
mod platform;

use std::process::ExitCode;

use arena_config::{CliArgs, Config};
use arena_terrain::generate_heightfield;
use clap::Parser;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match platform::PlatformDirs::resolve(args.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to resolve config directory: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create directories: {e}");
        return ExitCode::FAILURE;
    }

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", dirs.config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    arena_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    let request = config.request();
    if let Some(arena) = &config.arena {
        info!(
            size = arena.terrain_size,
            resolution = arena.heightmap_resolution(),
            theme = arena.terrain_theme().unwrap_or("none"),
            "generating arena"
        );
    }

    let heights = match generate_heightfield(&request.config, request.output_size, request.workers)
    {
        Ok(heights) => heights,
        Err(e) => {
            error!("Invalid generation config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stats = heights.stats();
    match (stats.min, stats.max, stats.mean) {
        (Some(min), Some(max), Some(mean)) => info!(
            min,
            max,
            mean,
            sentinels = stats.sentinel_count,
            "heightfield ready"
        ),
        _ => warn!("heightfield has no usable heights; every cell is a sentinel"),
    }

    if let Some(path) = &config.output.export_path {
        if let Err(e) = export::write_json(&heights, path) {
            error!("{e}");
            return ExitCode::FAILURE;
        }
        info!(path = %path.display(), "exported heightfield");
    }

    ExitCode::SUCCESS
}
