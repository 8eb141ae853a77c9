//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orbis command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbis", about = "Generate and probe an icosphere planet terrain")]
pub struct CliArgs {
    /// Icosahedron subdivision level.
    #[arg(long)]
    pub level: Option<u32>,

    /// Relief cutting-plane count.
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Water level in [0, 1).
    #[arg(long)]
    pub water_level: Option<f32>,

    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Land smoothing passes.
    #[arg(long)]
    pub smoothing: Option<u32>,

    /// Number of random point-location probes.
    #[arg(long)]
    pub probes: Option<u32>,

    /// Write a terrain snapshot to this file.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(level) = args.level {
            self.terrain.recursion_level = level;
        }
        if let Some(iterations) = args.iterations {
            self.terrain.iterations = iterations;
        }
        if let Some(water) = args.water_level {
            self.terrain.water_level = water;
        }
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(passes) = args.smoothing {
            self.terrain.smoothing_passes = passes;
        }
        if let Some(probes) = args.probes {
            self.probe.probe_count = probes;
        }
        if let Some(ref path) = args.snapshot {
            self.probe.snapshot_path = Some(path.clone());
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
            level: Some(7),
            seed: Some(1234),
            snapshot: Some(PathBuf::from("planet.ron")),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.terrain.recursion_level, 7);
        assert_eq!(config.terrain.seed, 1234);
        assert_eq!(config.probe.snapshot_path, Some(PathBuf::from("planet.ron")));
        // Non-overridden fields retain defaults
        assert_eq!(config.terrain.iterations, 200);
        assert_eq!(config.debug.log_level, "info");
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
            "orbis",
            "--level",
            "3",
            "--water-level",
            "0.4",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.level, Some(3));
        assert_eq!(args.water_level, Some(0.4));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.config.is_none());
    }
}
