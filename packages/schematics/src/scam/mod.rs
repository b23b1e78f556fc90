//! Single Component Angular Module
//!
//! Generates a component together with the NgModule declaring it, merged
//! into one file by default.

pub mod merge;
pub mod options;
pub mod rule;
pub mod schematics;
pub mod test_emitter;

pub use merge::{merge_component_and_module, MergeError, MergeInput};
pub use options::{ScamDefaults, ScamLocation, ScamOptions, ScamRequest, Style};
pub use rule::{MergeOutcome, ScamOutcome, ScamSchematic};
