use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::file_system::{normalize_tree_path, AbsoluteFsPath, ReadonlyFileSystem};
use crate::scam::options::ScamDefaults;

/// File names recognised as a workspace descriptor, in lookup order.
pub const WORKSPACE_FILE_NAMES: [&str; 2] = ["angular.json", ".angular.json"];

/// Key under `schematics` holding defaults for this schematic.
pub const SCAM_SCHEMATIC_KEY: &str = "ng-scam:scam";

/// Key under `schematics` holding defaults for Angular's component schematic.
/// Its style and prefix settings apply to SCAMs as well.
pub const COMPONENT_SCHEMATIC_KEY: &str = "@schematics/angular:component";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AngularConfig {
    pub version: Option<u32>,
    pub new_project_root: Option<String>,
    #[serde(default)]
    pub projects: IndexMap<String, Project>,
    pub default_project: Option<String>,
    #[serde(default)]
    pub schematics: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Application,
    Library,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub root: String,
    pub source_root: Option<String>,
    pub project_type: Option<ProjectType>,
    pub prefix: Option<String>,
    #[serde(default)]
    pub schematics: IndexMap<String, serde_json::Value>,
}

impl Project {
    /// Directory new files go to when no path is given: `app` under the
    /// source root for applications, `lib` for everything else.
    pub fn default_path(&self) -> String {
        let root = match &self.source_root {
            Some(source_root) => format!("/{}/", source_root),
            None => format!("/{}/src/", self.root),
        };
        let project_dir_name = match self.project_type {
            Some(ProjectType::Application) => "app",
            _ => "lib",
        };
        normalize_tree_path(&format!("{}{}", root, project_dir_name))
    }
}

/// What the SCAM schematic needs to know about the target project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProject {
    pub name: String,
    pub default_path: String,
    pub prefix: Option<String>,
}

/// Looks projects up by name. Implemented by the workspace descriptor; tests
/// may provide their own.
pub trait WorkspaceResolver {
    fn resolve_project(&self, name: Option<&str>) -> Result<ResolvedProject, ConfigurationError>;
}

impl AngularConfig {
    pub fn from_json(path: &str, content: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(content).map_err(|source| ConfigurationError::MalformedWorkspace {
            path: path.to_string(),
            source,
        })
    }

    pub fn load(
        fs: &dyn ReadonlyFileSystem,
        path: &AbsoluteFsPath,
    ) -> Result<Self, ConfigurationError> {
        let content = fs
            .read_file(path)
            .map_err(|source| ConfigurationError::UnreadableWorkspace {
                path: path.to_string(),
                source,
            })?;
        Self::from_json(path.as_str(), &content)
    }

    /// Walk up from `start` until a directory holding a workspace file is found.
    pub fn find(
        fs: &dyn ReadonlyFileSystem,
        start: &AbsoluteFsPath,
    ) -> Result<AbsoluteFsPath, ConfigurationError> {
        let mut dir = start.as_str().to_string();
        loop {
            for file_name in WORKSPACE_FILE_NAMES {
                let candidate = AbsoluteFsPath::new(fs.join(&dir, &[file_name]));
                if fs.is_file(&candidate) {
                    log::debug!("using workspace file {}", candidate);
                    return Ok(candidate);
                }
            }
            let parent = fs.dirname(&dir);
            if parent == dir || parent == "." {
                return Err(ConfigurationError::WorkspaceNotFound(start.to_string()));
            }
            dir = parent;
        }
    }

    pub fn get_project(&self, name: Option<&str>) -> Result<(&String, &Project), ConfigurationError> {
        if let Some(name) = name {
            self.projects
                .get_key_value(name)
                .ok_or_else(|| ConfigurationError::UnknownProject(name.to_string()))
        } else if let Some(default) = &self.default_project {
            self.projects
                .get_key_value(default.as_str())
                .ok_or_else(|| ConfigurationError::UnknownProject(default.clone()))
        } else {
            self.projects.iter().next().ok_or(ConfigurationError::NoProjects)
        }
    }

    /// Defaults for the SCAM schematic: component settings, then SCAM
    /// settings, workspace level first and project level last. Later entries
    /// win field by field.
    pub fn schematic_defaults(&self, project: Option<&str>) -> ScamDefaults {
        let project_schematics = self
            .get_project(project)
            .ok()
            .map(|(_, project)| &project.schematics);

        let mut defaults = ScamDefaults::default();
        for schematics in std::iter::once(&self.schematics).chain(project_schematics) {
            for key in [COMPONENT_SCHEMATIC_KEY, SCAM_SCHEMATIC_KEY] {
                if let Some(value) = schematics.get(key) {
                    match serde_json::from_value::<ScamDefaults>(value.clone()) {
                        Ok(layer) => defaults = defaults.overlay(layer),
                        Err(err) => log::warn!("ignoring schematic defaults for {}: {}", key, err),
                    }
                }
            }
        }
        defaults
    }
}

impl WorkspaceResolver for AngularConfig {
    fn resolve_project(&self, name: Option<&str>) -> Result<ResolvedProject, ConfigurationError> {
        let (name, project) = self.get_project(name)?;
        Ok(ResolvedProject {
            name: name.clone(),
            default_path: project.default_path(),
            prefix: project.prefix.clone(),
        })
    }
}
