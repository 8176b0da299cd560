use crate::color::ColorScheme;
use crate::error::ConfigError;
use crate::settings::GrowthSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Viewer options stored alongside the growth settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub color_scheme: ColorScheme,
    /// Time each snapshot stays on screen during playback
    pub frame_interval_ms: u64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::default(),
            frame_interval_ms: 50,
        }
    }
}

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    pub growth: GrowthSettings,
    pub viewer: ViewerSettings,
}

impl AppConfig {
    /// `<config dir>/brownian-tree/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("brownian-tree").join("config.json"))
    }

    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit path if given, else the default path when it exists,
    /// else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load_from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            growth: GrowthSettings::default(),
            viewer: ViewerSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig {
            version: 1,
            growth: GrowthSettings {
                num_particles: 1200,
                snapshot_cadence: 25,
                seed: Some(0xD1A),
                ..GrowthSettings::default().with_grid_size(151)
            },
            viewer: ViewerSettings {
                color_scheme: ColorScheme::Ice,
                frame_interval_ms: 80,
            },
        };

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();
        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.growth.spawn_radius, 70.0);
        assert_eq!(loaded.growth.kill_radius, 80.0);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"{ "growth": { "num_particles": 500 }, "viewer": { "color_scheme": "Fire" } }"#,
        )
        .unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.growth.num_particles, 500);
        assert_eq!(loaded.growth.grid_size, 301);
        assert_eq!(loaded.growth.max_steps_per_walker, 20_000);
        assert_eq!(loaded.viewer.color_scheme, ColorScheme::Fire);
        assert_eq!(loaded.viewer.frame_interval_ms, 50);
    }

    #[test]
    fn test_config_grid_size_derives_radii() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), r#"{ "growth": { "grid_size": 101 } }"#).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.growth.grid_size, 101);
        assert_eq!(loaded.growth.spawn_radius, 45.0);
        assert_eq!(loaded.growth.kill_radius, 55.0);
        assert!(loaded.growth.validate().is_ok());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        AppConfig::default().save_to_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_resolve_explicit_path() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut config = AppConfig::default();
        config.growth.num_particles = 42;
        config.save_to_file(temp_file.path()).unwrap();

        let resolved = AppConfig::resolve(Some(temp_file.path())).unwrap();
        assert_eq!(resolved.growth.num_particles, 42);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
