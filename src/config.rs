//! Shared config utilities for loading/saving JSON config files,
//! plus the engine's own settings type.
//!
//! Loading is permissive: a missing or unparsable file falls back to
//! defaults with a logged warning. Saving creates parent directories.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::Error;

/// Settings for one avatar engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Tick rate of the animation task.
    pub frames_per_second: u32,
    /// Lower bound (inclusive) of the blink delay, in frames.
    pub blink_delay_min: u32,
    /// Upper bound (exclusive) of the blink delay, in frames.
    pub blink_delay_max: u32,
    /// Fixed seed for blink scheduling. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 360,
            height: 420,
            frames_per_second: 60,
            blink_delay_min: 80,
            blink_delay_max: 240,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Self {
        load_json_config(path, "Engine")
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        save_json_config(path, self, "Engine")
    }
}

/// Generic load for any Serde config type with a `Default` implementation.
/// Falls back to `T::default()` if the file is missing or unparsable.
pub fn load_json_config<T: DeserializeOwned + Default>(path: &Path, label: &str) -> T {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<T>(&content) {
            Ok(config) => {
                info!(target: "config", "[{}] Loaded config from {}", label, path.display());
                config
            }
            Err(e) => {
                warn!(
                    target: "config",
                    "[{}] Failed to parse config {}: {}, using defaults",
                    label,
                    path.display(),
                    e
                );
                T::default()
            }
        },
        Err(_) => {
            info!(
                target: "config",
                "[{}] No config file at {}, using defaults",
                label,
                path.display()
            );
            T::default()
        }
    }
}

/// Generic save for any Serde config type.
pub fn save_json_config<T: Serialize>(path: &Path, config: &T, label: &str) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(config).map_err(Error::ConfigSerialize)?;
    std::fs::write(path, json).map_err(|source| Error::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!(target: "config", "[{}] Saved config to {}", label, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("nope.json"));
        assert_eq!(config.width, EngineConfig::default().width);
        assert_eq!(config.blink_delay_min, 80);
        assert_eq!(config.blink_delay_max, 240);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = EngineConfig::load(&path);
        assert_eq!(config.frames_per_second, 60);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("engine.json");
        let config = EngineConfig {
            width: 128,
            height: 256,
            rng_seed: Some(7),
            ..EngineConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path);
        assert_eq!(loaded.width, 128);
        assert_eq!(loaded.height, 256);
        assert_eq!(loaded.rng_seed, Some(7));
    }

    #[test]
    fn partial_file_fills_remaining_fields_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "frames_per_second": 30 }"#).unwrap();
        let config = EngineConfig::load(&path);
        assert_eq!(config.frames_per_second, 30);
        assert_eq!(config.width, EngineConfig::default().width);
    }
}
