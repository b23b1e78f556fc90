#![deny(clippy::all)]

/**
 * Angular SCAM Schematic - Rust Implementation
 *
 * Generates a component and its dedicated NgModule in a single file
 */
pub mod config;
pub mod error;
pub mod file_system;
pub mod scam;
pub mod strings;
pub mod tree;

pub use error::{ConfigurationError, ScamError, SchematicError};
pub use scam::{ScamOptions, ScamSchematic};
pub use tree::Tree;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
