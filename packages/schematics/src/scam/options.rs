//! SCAM Options
//!
//! The option record a SCAM generation runs with, and its normalization into
//! the names and paths every later step relies on.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::file_system::normalize_tree_path;
use crate::strings::{classify, dasherize};

static HTML_SELECTOR_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][.0-9a-zA-Z]*(:?-[a-zA-Z][.0-9a-zA-Z]*)*$").unwrap());

/// Stylesheet flavour of the generated component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Css,
    Scss,
    Sass,
    Less,
    None,
}

impl Style {
    pub const VALUES: [&'static str; 5] = ["css", "scss", "sass", "less", "none"];

    /// File extension of the stylesheet, `None` when no stylesheet is wanted.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Style::Css => Some("css"),
            Style::Scss => Some("scss"),
            Style::Sass => Some("sass"),
            Style::Less => Some("less"),
            Style::None => None,
        }
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "css" => Ok(Style::Css),
            "scss" => Ok(Style::Scss),
            "sass" => Ok(Style::Sass),
            "less" => Ok(Style::Less),
            "none" => Ok(Style::None),
            other => Err(format!("unknown style \"{}\"", other)),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension().unwrap_or("none"))
    }
}

/// Optional settings, as found in `angular.json` or on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScamDefaults {
    pub separate_module: Option<bool>,
    pub skip_tests: Option<bool>,
    pub style: Option<Style>,
    pub prefix: Option<String>,
    pub inline_style: Option<bool>,
    pub inline_template: Option<bool>,
}

impl ScamDefaults {
    /// Layer `other` on top of `self`: every field `other` sets wins.
    pub fn overlay(self, other: ScamDefaults) -> ScamDefaults {
        ScamDefaults {
            separate_module: other.separate_module.or(self.separate_module),
            skip_tests: other.skip_tests.or(self.skip_tests),
            style: other.style.or(self.style),
            prefix: other.prefix.or(self.prefix),
            inline_style: other.inline_style.or(self.inline_style),
            inline_template: other.inline_template.or(self.inline_template),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScamOptions {
    /// Entity name, possibly with directories: `greetings/HelloWorld`.
    pub name: String,
    pub project: Option<String>,
    /// Output directory overriding the project's default path.
    pub path: Option<String>,
    /// Keep the module in its own file instead of merging it.
    pub separate_module: bool,
    pub skip_tests: bool,
    pub prefix: Option<String>,
    pub selector: Option<String>,
    pub style: Style,
    pub inline_style: bool,
    pub inline_template: bool,
}

impl ScamOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_defaults(name, ScamDefaults::default())
    }

    pub fn with_defaults(name: impl Into<String>, defaults: ScamDefaults) -> Self {
        Self {
            name: name.into(),
            project: None,
            path: None,
            separate_module: defaults.separate_module.unwrap_or(false),
            skip_tests: defaults.skip_tests.unwrap_or(false),
            prefix: defaults.prefix,
            selector: None,
            style: defaults.style.unwrap_or_default(),
            inline_style: defaults.inline_style.unwrap_or(false),
            inline_template: defaults.inline_template.unwrap_or(false),
        }
    }

    pub fn normalize(&self) -> Result<ScamRequest, ConfigurationError> {
        let raw_name = self.name.trim();
        if raw_name.is_empty() {
            return Err(ConfigurationError::EmptyName);
        }
        if raw_name.split('/').any(|segment| segment.trim().is_empty()) {
            return Err(ConfigurationError::InvalidName(raw_name.to_string()));
        }

        let name = dasherize(raw_name);
        let base_name = name.rsplit('/').next().unwrap_or(&name).to_string();
        let class_name = classify(&base_name);

        Ok(ScamRequest {
            options: ScamOptions {
                name,
                path: self.path.as_deref().map(normalize_tree_path),
                ..self.clone()
            },
            base_name,
            class_name,
        })
    }
}

/// Options after normalization: `options.name` is dasherized and
/// `options.path`, when set, is a clean tree path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScamRequest {
    pub options: ScamOptions,
    /// Last segment of the dasherized name: `hello-world`.
    pub base_name: String,
    /// Class name shared by component and module: `HelloWorld`.
    pub class_name: String,
}

impl ScamRequest {
    /// Selector of the component, validated.
    pub fn selector(&self, project_prefix: Option<&str>) -> Result<String, ConfigurationError> {
        let prefix = self.options.prefix.as_deref().or(project_prefix);
        let selector = match (&self.options.selector, prefix) {
            (Some(selector), _) => selector.clone(),
            (None, Some(prefix)) => format!("{}-{}", prefix, self.base_name),
            (None, None) => self.base_name.clone(),
        };

        if !HTML_SELECTOR_REGEXP.is_match(&selector) {
            return Err(ConfigurationError::InvalidSelector(selector));
        }
        Ok(selector)
    }

    /// Where the SCAM files go, given the project's default path.
    pub fn location(&self, default_path: &str) -> ScamLocation {
        let path = self.options.path.as_deref().unwrap_or(default_path);
        ScamLocation {
            directory: normalize_tree_path(&format!("{}/{}", path, self.options.name)),
            base_name: self.base_name.clone(),
            class_name: self.class_name.clone(),
        }
    }
}

/// Resolved directory and names of one SCAM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScamLocation {
    pub directory: String,
    pub base_name: String,
    pub class_name: String,
}

impl ScamLocation {
    fn file(&self, suffix: &str) -> String {
        format!("{}/{}.{}", self.directory, self.base_name, suffix)
    }

    pub fn component_path(&self) -> String {
        self.file("component.ts")
    }

    pub fn module_path(&self) -> String {
        self.file("module.ts")
    }

    pub fn spec_path(&self) -> String {
        self.file("component.spec.ts")
    }

    pub fn component_class(&self) -> String {
        format!("{}Component", self.class_name)
    }

    pub fn module_class(&self) -> String {
        format!("{}Module", self.class_name)
    }
}
