//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted config inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Mesh and relief generation.
    pub terrain: TerrainConfig,
    /// Query probes run after generation.
    pub probe: ProbeConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Terrain generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Recursion level; the icosahedron is subdivided `level + 1` times.
    pub recursion_level: u32,
    /// Subdivisions sealed into one sub-mesh.
    pub leaf_depth: u32,
    /// Cutting planes drawn by the relief generator.
    pub iterations: u32,
    /// Normalized vote threshold between water and land (0.0 - 1.0).
    pub water_level: f32,
    /// Elevation of the highest land, in planet radii.
    pub land_height: f32,
    /// Neighbour-averaging passes over land.
    pub smoothing_passes: u32,
    /// World seed.
    pub seed: u64,
    /// `|y|` above which vertices are coloured as ice.
    pub polar_cap: f32,
}

/// Probe settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// Random point-location queries issued after generation.
    pub probe_count: u32,
    /// Points in the sample path projected onto the surface.
    pub path_points: u32,
    /// Where to write a terrain snapshot, if anywhere.
    pub snapshot_path: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Directory for the JSON log file; defaults to `<config dir>/logs`.
    pub log_dir: Option<PathBuf>,
    /// Write the JSON log file in debug builds.
    pub json_log: bool,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            recursion_level: 4,
            leaf_depth: 4,
            iterations: 200,
            water_level: 0.5,
            land_height: 0.08,
            smoothing_passes: 1,
            seed: 42,
            polar_cap: 0.97,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            probe_count: 16,
            path_points: 64,
            snapshot_path: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
            json_log: true,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// The per-user config directory, `<platform config dir>/orbis`.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("orbis"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
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
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Returns `Some(new_config)` if the file on disk differs, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Directory for log files: the configured one, else `<config_dir>/logs`.
    pub fn log_dir(&self, config_dir: &Path) -> PathBuf {
        self.debug
            .log_dir
            .clone()
            .unwrap_or_else(|| config_dir.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("recursion_level: 4"));
        assert!(ron_str.contains("seed: 42"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.probe.snapshot_path = Some(PathBuf::from("out/terrain.ron"));
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let ron_str = "(terrain: (recursion_level: 3))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.terrain.recursion_level, 3);
        assert_eq!(config.terrain.iterations, 200);
        assert_eq!(config.probe, ProbeConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.terrain.recursion_level = 7;
        config.terrain.water_level = 0.65;
        config.debug.log_level = "debug".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.terrain.seed = 7;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.terrain.seed), Some(7));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_log_dir_fallback() {
        let mut config = Config::default();
        let base = Path::new("/tmp/orbis");
        assert_eq!(config.log_dir(base), base.join("logs"));
        config.debug.log_dir = Some(PathBuf::from("/var/log/orbis"));
        assert_eq!(config.log_dir(base), PathBuf::from("/var/log/orbis"));
    }
}
