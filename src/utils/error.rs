//! Error types for resbundle

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("--unpack: {0}")]
    InvalidDirective(String),

    #[error("Application name must not be empty")]
    EmptyAppName,

    #[error("Unpacking requested but no resource archive is embedded")]
    MissingArchive,

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Resource archive is unreadable: {0}")]
    ArchiveRead(#[source] std::io::Error),

    #[error("Archive entry escapes its destination: {0}")]
    UnsafeEntryPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Broad failure class of a [`BundleError`].
///
/// Every class is fatal for the pass that raised it; a destination file that
/// already exists under no-clobber is not an error and never shows up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad directive, empty app name, missing archive, bad package settings.
    /// Raised before anything is written.
    Configuration,
    /// Directory creation, file open or write failures.
    Filesystem,
    /// Corrupt or truncated embedded payload.
    Archive,
}

impl BundleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigError(_)
            | Self::InvalidDirective(_)
            | Self::EmptyAppName
            | Self::MissingArchive
            | Self::PackageNotFound(_)
            | Self::TomlParse(_) => ErrorKind::Configuration,
            Self::Filesystem { .. } | Self::Io(_) | Self::Walk(_) => ErrorKind::Filesystem,
            Self::ArchiveRead(_) | Self::UnsafeEntryPath(_) => ErrorKind::Archive,
        }
    }

    /// Wrap an I/O error with the path it happened on.
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
