//! Build-time settings read from a package's `Cargo.toml`
//!
//! ```toml
//! [package.metadata.resbundle]
//! bundle_dir = "bundle"
//! output = "src/bundle.rs"
//! compression_level = 9
//! ```

use crate::utils::error::{BundleError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Packing settings for one package
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BundleSettings {
    /// Resource directory, relative to the package root
    #[serde(default = "default_bundle_dir")]
    pub bundle_dir: PathBuf,
    /// Generated source file, relative to the package root
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// gzip level, 0-9
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            bundle_dir: default_bundle_dir(),
            output: default_output(),
            compression_level: default_compression_level(),
        }
    }
}

/// The subset of a Cargo manifest the packer cares about
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub package: Option<ManifestPackage>,
    #[serde(default)]
    pub bin: Vec<toml::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestPackage {
    pub name: String,
    #[serde(default)]
    pub metadata: Option<ManifestMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default)]
    pub resbundle: Option<BundleSettings>,
}

// Default value functions

fn default_bundle_dir() -> PathBuf {
    PathBuf::from("bundle")
}

fn default_output() -> PathBuf {
    Path::new("src").join("bundle.rs")
}

fn default_compression_level() -> u32 {
    9
}

impl PackageManifest {
    /// Load `Cargo.toml` from a package directory
    pub fn from_dir(package_dir: &Path) -> Result<Self> {
        let path = package_dir.join("Cargo.toml");
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BundleError::PackageNotFound(package_dir.display().to_string())
            } else {
                BundleError::fs(&path, e)
            }
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Package name, if this is not a virtual workspace manifest
    pub fn name(&self) -> Option<&str> {
        self.package.as_ref().map(|p| p.name.as_str())
    }

    /// Settings from `[package.metadata.resbundle]`, or the defaults
    pub fn settings(&self) -> BundleSettings {
        let mut settings = self
            .package
            .as_ref()
            .and_then(|p| p.metadata.as_ref())
            .and_then(|m| m.resbundle.clone())
            .unwrap_or_default();
        settings.compression_level = settings.compression_level.min(9);
        settings
    }

    /// Whether the package builds an executable, either through explicit
    /// `[[bin]]` targets or the conventional `src/main.rs`
    pub fn is_binary(&self, package_dir: &Path) -> bool {
        !self.bin.is_empty() || package_dir.join("src").join("main.rs").is_file()
    }
}
