//! resbundle library - embedded application resources
//!
//! Pack a resource directory into the binary at build time, then unpack its
//! `config/` and `data/` trees into platform directories on first run.

pub mod bundle;
pub mod config;
pub mod paths;
pub mod resources;
pub mod startup;
pub mod unpack;
pub mod utils;

pub use config::{AppDirConfig, AppDirConfigBuilder, UnpackArgs};
pub use paths::{app_dir, DirKind, HostOs};
pub use resources::EmbeddedArchive;
pub use unpack::{EntryHandler, UnpackDirective, UnpackMode, UnpackOutcome, Unpacker};
pub use utils::error::{BundleError, ErrorKind};
