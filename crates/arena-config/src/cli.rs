//! Command-line argument parsing.

use std::path::PathBuf;

use arena_terrain::{ArenaParameters, DistanceMetric};
use clap::Parser;

use crate::Config;

/// Worley arena terrain generator.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "worley-arena", about = "Cellular noise heightfield generator")]
pub struct CliArgs {
    /// Output heightfield width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Output heightfield height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Worker threads (default: all cores but one).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Deterministic seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Distance metric: euclidean, euclidean-squared, manhattan, chebyshev,
    /// quadratic or minkowski:<p>.
    #[arg(long)]
    pub metric: Option<DistanceMetric>,

    /// Rank of the sampled neighbor (1 = nearest).
    #[arg(long)]
    pub kth: Option<u32>,

    /// Partition cells per axis.
    #[arg(long)]
    pub cells: Option<u32>,

    /// Exclusive upper bound on feature points per cell.
    #[arg(long)]
    pub max_points: Option<u32>,

    /// Generate an arena preset of this size instead of the raw settings.
    #[arg(long)]
    pub arena_size: Option<f64>,

    /// Write the heightfield as JSON to this file.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// Generation overrides land in the arena preset when one is active,
    /// otherwise in the raw generation settings.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(size) = args.arena_size {
            self.arena.get_or_insert_with(ArenaParameters::default).terrain_size = size;
        }

        let shadowed = self.shadowed_by_preset(args);
        if !shadowed.is_empty() {
            log::warn!(
                "Arena preset is active; {} only change the raw settings and do not affect this run",
                shadowed.join(", ")
            );
        }

        if let Some(arena) = self.arena.as_mut() {
            if let Some(seed) = args.seed {
                arena.random_seed = Some(seed);
            }
            if let Some(metric) = args.metric {
                arena.terrain_type = metric;
            }
            if let Some(cells) = args.cells {
                arena.noise_subdivisions = cells;
            }
            if let Some(max_points) = args.max_points {
                arena.turbulence = max_points;
            }
        } else {
            if let Some(seed) = args.seed {
                self.generation.seed = Some(seed);
            }
            if let Some(metric) = args.metric {
                self.generation.metric = metric;
            }
            if let Some(cells) = args.cells {
                self.generation.grid_divisions = (cells, cells);
            }
            if let Some(max_points) = args.max_points {
                self.generation.max_points_per_cell = max_points;
            }
        }

        // Arena presets always sample the nearest point, so `kth` only
        // reaches the raw settings.
        if let Some(kth) = args.kth {
            self.generation.kth_nearest = kth;
        }
        if let Some(w) = args.width {
            self.output.width = w;
        }
        if let Some(h) = args.height {
            self.output.height = h;
        }
        if let Some(workers) = args.workers {
            self.output.workers = Some(workers);
        }
        if let Some(ref path) = args.output {
            self.output.export_path = Some(path.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }

    /// Flags in `args` that the active arena preset overrides.
    ///
    /// The preset fixes the output size and always samples the nearest
    /// point, so these flags are stored but have no effect on generation.
    pub fn shadowed_by_preset(&self, args: &CliArgs) -> Vec<&'static str> {
        if self.arena.is_none() {
            return Vec::new();
        }
        [
            ("--kth", args.kth.is_some()),
            ("--width", args.width.is_some()),
            ("--height", args.height.is_some()),
        ]
        .into_iter()
        .filter_map(|(flag, given)| given.then_some(flag))
        .collect()
    }
}
