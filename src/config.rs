// src/config.rs

use std::env;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Destination relative to the working directory: two levels up, into the
/// app's backend folder.
pub const DEFAULT_DEST_DIR: &str = "../../app/backend";
pub const DEFAULT_TOOLCHAIN: &str = "cargo";
pub const RELEASE_PROFILE_DIR: &str = "release";

#[derive(Clone, Debug)]
pub struct StageConfig {
    /// Directory holding the backend's `Cargo.toml`. Every relative path below
    /// is resolved against it.
    pub working_dir: PathBuf,
    pub toolchain: String,
    pub destination_dir: PathBuf,
    /// Overrides the binary name read from the manifest.
    pub artifact_name: Option<String>,
    pub target_dir: PathBuf,
}

impl StageConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let working_dir = env::current_dir().map_err(ConfigError::WorkingDir)?;
        Ok(Self::from_lookup(working_dir, |key| env::var(key).ok()))
    }

    /// Builds the config from an arbitrary variable source. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(working_dir: PathBuf, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let toolchain = get("STAGEHAND_TOOLCHAIN").unwrap_or_else(|| DEFAULT_TOOLCHAIN.to_string());

        let destination_dir = resolve(
            &working_dir,
            get("STAGEHAND_DEST_DIR").unwrap_or_else(|| DEFAULT_DEST_DIR.to_string()),
        );

        // Our own override wins over cargo's so the two can differ if needed.
        let target_dir = match get("STAGEHAND_TARGET_DIR").or_else(|| get("CARGO_TARGET_DIR")) {
            Some(dir) => resolve(&working_dir, dir),
            None => working_dir.join("target"),
        };

        Self {
            toolchain,
            destination_dir,
            artifact_name: get("STAGEHAND_ARTIFACT"),
            target_dir,
            working_dir,
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.working_dir.join("Cargo.toml")
    }

    /// Where `cargo build --release` leaves its binaries.
    pub fn release_dir(&self) -> PathBuf {
        self.target_dir.join(RELEASE_PROFILE_DIR)
    }
}

fn resolve(base: &Path, value: String) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> StageConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StageConfig::from_lookup(PathBuf::from("/work/backend"), move |k| map.get(k).cloned())
    }

    #[test]
    fn defaults_point_two_levels_up() {
        let config = config_with(&[]);
        assert_eq!(config.toolchain, "cargo");
        assert_eq!(
            config.destination_dir,
            PathBuf::from("/work/backend/../../app/backend")
        );
        assert_eq!(config.release_dir(), PathBuf::from("/work/backend/target/release"));
        assert_eq!(config.manifest_path(), PathBuf::from("/work/backend/Cargo.toml"));
        assert!(config.artifact_name.is_none());
    }

    #[test]
    fn cargo_target_dir_is_honoured() {
        let config = config_with(&[("CARGO_TARGET_DIR", "/tmp/shared-target")]);
        assert_eq!(config.release_dir(), PathBuf::from("/tmp/shared-target/release"));
    }

    #[test]
    fn own_target_dir_beats_cargo_target_dir() {
        let config = config_with(&[
            ("CARGO_TARGET_DIR", "/tmp/shared-target"),
            ("STAGEHAND_TARGET_DIR", "build"),
        ]);
        assert_eq!(config.target_dir, PathBuf::from("/work/backend/build"));
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = config_with(&[("STAGEHAND_ARTIFACT", "  "), ("STAGEHAND_TOOLCHAIN", "")]);
        assert!(config.artifact_name.is_none());
        assert_eq!(config.toolchain, "cargo");
    }

    #[test]
    fn absolute_destination_is_kept() {
        let config = config_with(&[("STAGEHAND_DEST_DIR", "/opt/app/bin")]);
        assert_eq!(config.destination_dir, PathBuf::from("/opt/app/bin"));
    }
}
