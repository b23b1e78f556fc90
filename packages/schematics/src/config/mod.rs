//! Workspace Configuration
//!
//! Reading of the Angular workspace descriptor and resolution of the project
//! a schematic runs against.

pub mod angular;

pub use angular::*;
