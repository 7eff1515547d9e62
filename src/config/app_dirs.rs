//! Per-process application directory settings

use crate::paths::{app_dir, DirKind};
use crate::unpack::directive::{UnpackDirective, UNPACK_HELP};
use crate::utils::error::{BundleError, Result};
use clap::Args;
use std::path::{Path, PathBuf};

/// Resolved application directories.
///
/// Built once at startup and passed by reference to everything that needs
/// the directories. Both paths are fixed for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirConfig {
    name: String,
    system: bool,
    roaming: bool,
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppDirConfig {
    pub fn builder(name: impl Into<String>) -> AppDirConfigBuilder {
        AppDirConfigBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uses system-wide rather than per-user directories
    pub fn system(&self) -> bool {
        self.system
    }

    /// Prefers the roaming profile on Windows
    pub fn roaming(&self) -> bool {
        self.roaming
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn dir(&self, kind: DirKind) -> &Path {
        match kind {
            DirKind::Config => &self.config_dir,
            DirKind::Data => &self.data_dir,
        }
    }

    /// Path of a file inside the config directory
    pub fn config_file(&self, path: impl AsRef<Path>) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Path of a file inside the data directory
    pub fn data_file(&self, path: impl AsRef<Path>) -> PathBuf {
        self.data_dir.join(path)
    }
}

/// Builder for [`AppDirConfig`]
#[derive(Debug, Clone)]
pub struct AppDirConfigBuilder {
    name: String,
    system: bool,
    roaming: bool,
    config_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
}

impl AppDirConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system: false,
            roaming: false,
            config_dir: None,
            data_dir: None,
        }
    }

    pub fn system(mut self, system: bool) -> Self {
        self.system = system;
        self
    }

    pub fn roaming(mut self, roaming: bool) -> Self {
        self.roaming = roaming;
        self
    }

    /// Use this config directory instead of the platform default
    pub fn config_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config_dir = dir;
        self
    }

    /// Use this data directory instead of the platform default
    pub fn data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.data_dir = dir;
        self
    }

    /// Apply the `--conf` and `--data` overrides from the command line
    pub fn with_args(self, args: &UnpackArgs) -> Self {
        let config_dir = args.conf.clone().or(self.config_dir.clone());
        let data_dir = args.data.clone().or(self.data_dir.clone());
        self.config_dir(config_dir).data_dir(data_dir)
    }

    /// Resolve both directories.
    ///
    /// Directories not overridden come from the platform resolver.
    pub fn build(self) -> Result<AppDirConfig> {
        if self.name.is_empty() || self.name == "." {
            return Err(BundleError::EmptyAppName);
        }

        let config_dir = self
            .config_dir
            .unwrap_or_else(|| app_dir(&self.name, DirKind::Config, self.system, self.roaming));
        let data_dir = self
            .data_dir
            .unwrap_or_else(|| app_dir(&self.name, DirKind::Data, self.system, self.roaming));

        Ok(AppDirConfig {
            name: self.name,
            system: self.system,
            roaming: self.roaming,
            config_dir,
            data_dir,
        })
    }
}

/// Command-line flags controlling the unpack pass.
///
/// Flatten into the host application's parser with `#[command(flatten)]`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct UnpackArgs {
    /// Set the configuration directory
    #[arg(long, value_name = "DIR")]
    pub conf: Option<PathBuf>,

    /// Set the data directory
    #[arg(long, value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// When to unpack the embedded resources
    #[arg(long, value_name = "MODE[,force]", default_value = "detect", long_help = UNPACK_HELP)]
    pub unpack: String,
}

impl Default for UnpackArgs {
    fn default() -> Self {
        Self {
            conf: None,
            data: None,
            unpack: UnpackDirective::default().to_string(),
        }
    }
}

impl UnpackArgs {
    /// Parse the `--unpack` value
    pub fn directive(&self) -> Result<UnpackDirective> {
        self.unpack.parse()
    }
}
