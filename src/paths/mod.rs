//! Platform directory resolution

pub mod env;
mod resolver;

pub use env::{Environment, ProcessEnv};
pub use resolver::*;
