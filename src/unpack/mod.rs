//! Runtime unpacking of the embedded resource archive

pub mod directive;
pub mod handler;
pub mod installer;
pub mod policy;

pub use directive::{UnpackDirective, UnpackMode};
pub use handler::EntryHandler;
pub use installer::{install, InstallReport};
pub use policy::{UnpackOutcome, Unpacker};
