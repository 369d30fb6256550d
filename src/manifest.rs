// src/manifest.rs
//
// Just enough of Cargo.toml to know which file `cargo build --release` produces.

use serde::Deserialize;
use std::env::consts::EXE_SUFFIX;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::ManifestError;

#[derive(Debug, Deserialize)]
struct Manifest {
    package: Option<Package>,
    #[serde(default)]
    bin: Vec<BinTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Package {
    name: String,
    default_run: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BinTarget {
    name: Option<String>,
}

/// Name of the binary the manifest builds: `default-run`, then the first
/// `[[bin]]`, then the package name.
///
/// Only the manifest is read. When a package declares `[[bin]]` targets and
/// also has an implicit `src/main.rs` target, the first `[[bin]]` still wins;
/// set `default-run` or `STAGEHAND_ARTIFACT` to pick a different one.
pub async fn binary_name(manifest_path: &Path) -> Result<String, ManifestError> {
    let content = fs::read_to_string(manifest_path)
        .await
        .map_err(|source| ManifestError::Read {
            path: manifest_path.to_path_buf(),
            source,
        })?;
    parse_binary_name(&content, manifest_path)
}

pub fn parse_binary_name(content: &str, manifest_path: &Path) -> Result<String, ManifestError> {
    let manifest: Manifest = toml::from_str(content).map_err(|source| ManifestError::Parse {
        path: manifest_path.to_path_buf(),
        source,
    })?;

    if let Some(default_run) = manifest.package.as_ref().and_then(|p| p.default_run.clone()) {
        return Ok(default_run);
    }
    let mut bins = manifest.bin.into_iter().filter_map(|b| b.name);
    if let Some(name) = bins.next() {
        let skipped: Vec<String> = bins.collect();
        if !skipped.is_empty() || manifest.package.is_some() {
            debug!(
                binary = %name,
                ?skipped,
                "several binary targets without default-run, using the first [[bin]]"
            );
        }
        return Ok(name);
    }
    manifest
        .package
        .map(|p| p.name)
        .ok_or_else(|| ManifestError::NoBinaryName {
            path: manifest_path.to_path_buf(),
        })
}

/// On-disk file name for a binary, with the platform's executable suffix.
pub fn executable_file_name(binary: &str) -> String {
    format!("{binary}{EXE_SUFFIX}")
}
