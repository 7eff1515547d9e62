//! Runtime and build-time configuration

mod app_dirs;
mod bundle_settings;

pub use app_dirs::*;
pub use bundle_settings::*;
