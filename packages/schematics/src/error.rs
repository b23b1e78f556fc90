//! SCAM Errors

use thiserror::Error;

use crate::scam::merge::MergeError;
use crate::tree::TreeError;

/// Invalid input or workspace. Raised before anything is staged.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("a name is required")]
    EmptyName,
    #[error("invalid name \"{0}\": path segments cannot be empty")]
    InvalidName(String),
    #[error("selector \"{0}\" is invalid")]
    InvalidSelector(String),
    #[error("project \"{0}\" does not exist in the workspace")]
    UnknownProject(String),
    #[error("the workspace does not declare any project")]
    NoProjects,
    #[error("no angular.json found in {0} or any parent directory")]
    WorkspaceNotFound(String),
    #[error("could not read workspace file {path}: {source}")]
    UnreadableWorkspace {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("workspace file {path} is malformed: {source}")]
    MalformedWorkspace {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of one of the generators the SCAM schematic delegates to.
#[derive(Debug, Error)]
pub enum SchematicError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("could not find an NgModule at {0}")]
    ModuleNotFound(String),
    #[error("{0} has no @NgModule metadata to update")]
    MissingNgModuleMetadata(String),
}

#[derive(Debug, Error)]
pub enum ScamError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("{schematic} schematic failed: {source}")]
    Collaborator {
        schematic: &'static str,
        #[source]
        source: SchematicError,
    },
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Merge(#[from] MergeError),
}
