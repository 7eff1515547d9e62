//! Build-time packing of resource directories

pub mod archive;
pub mod literal;
pub mod package;

pub use archive::write_archive;
pub use literal::{BundleSource, LiteralWriter};
pub use package::{PackResult, Packer};
