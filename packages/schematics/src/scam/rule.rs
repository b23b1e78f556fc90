//! SCAM Rule
//!
//! Runs the module and component schematics, merges the module into the
//! component file unless asked to keep them apart, and adds the TestBed-free
//! spec unless tests are skipped.

use crate::config::WorkspaceResolver;
use crate::error::ScamError;
use crate::scam::merge::{merge_component_and_module, module_specifier, verify_detached, MergeInput};
use crate::scam::options::{ScamLocation, ScamOptions};
use crate::scam::schematics::{
    AngularComponentSchematic, AngularModuleSchematic, ComponentGenerator, ComponentOptions,
    ModuleGenerator, ModuleOptions,
};
use crate::scam::test_emitter::render_component_spec;
use crate::tree::Tree;

/// What happened to the generated module file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Module folded into the component file and deleted.
    Merged {
        component_path: String,
        module_path: String,
    },
    /// `separate_module` was requested.
    KeptSeparate,
    /// No module was found where one was expected; both files stay as generated.
    Skipped { expected_module_path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScamOutcome {
    pub project: String,
    pub location: ScamLocation,
    pub merge: MergeOutcome,
    pub spec_path: Option<String>,
}

pub struct ScamSchematic<M = AngularModuleSchematic, C = AngularComponentSchematic> {
    module_schematic: M,
    component_schematic: C,
}

impl Default for ScamSchematic {
    fn default() -> Self {
        Self::new(AngularModuleSchematic, AngularComponentSchematic)
    }
}

impl<M: ModuleGenerator, C: ComponentGenerator> ScamSchematic<M, C> {
    pub fn new(module_schematic: M, component_schematic: C) -> Self {
        Self {
            module_schematic,
            component_schematic,
        }
    }

    pub fn run(
        &self,
        tree: &mut Tree<'_>,
        workspace: &dyn WorkspaceResolver,
        options: &ScamOptions,
    ) -> Result<ScamOutcome, ScamError> {
        let request = options.normalize()?;
        let project = workspace.resolve_project(request.options.project.as_deref())?;
        let selector = request.selector(project.prefix.as_deref())?;
        let path = request
            .options
            .path
            .clone()
            .unwrap_or_else(|| project.default_path.clone());
        let location = request.location(&project.default_path);

        log::info!(
            "generating {} in project {} under {}",
            location.component_class(),
            project.name,
            location.directory
        );

        self.module_schematic
            .generate(
                tree,
                &ModuleOptions {
                    name: request.options.name.clone(),
                    path: path.clone(),
                    flat: false,
                },
            )
            .map_err(|source| ScamError::Collaborator {
                schematic: "module",
                source,
            })?;

        // The component's own spec would need TestBed; ours replaces it.
        self.component_schematic
            .generate(
                tree,
                &ComponentOptions {
                    name: request.options.name.clone(),
                    path,
                    flat: false,
                    module: Some(request.options.name.clone()),
                    export: true,
                    skip_tests: true,
                    selector,
                    style: request.options.style,
                    inline_style: request.options.inline_style,
                    inline_template: request.options.inline_template,
                },
            )
            .map_err(|source| ScamError::Collaborator {
                schematic: "component",
                source,
            })?;

        let merge = if request.options.separate_module {
            log::debug!("keeping {} in its own file", location.module_class());
            MergeOutcome::KeptSeparate
        } else {
            merge_module_into_component_file(tree, &location)?
        };

        let spec_path = if request.options.skip_tests {
            None
        } else {
            Some(output_test(tree, &location)?)
        };

        Ok(ScamOutcome {
            project: project.name,
            location,
            merge,
            spec_path,
        })
    }
}

/// Module file declaring the component at `component_path`.
///
/// Both schematics name their files after the same base name in the same
/// folder, so the module path is the component path with its suffix swapped.
/// This is a naming convention, not a guarantee: callers must check that the
/// file exists.
pub fn module_path_for(component_path: &str) -> Option<String> {
    component_path
        .strip_suffix("component.ts")
        .map(|stem| format!("{}module.ts", stem))
}

/// Replace the component file by the merge of itself and its module, then
/// delete the module. When either file is missing nothing is touched.
pub fn merge_module_into_component_file(
    tree: &mut Tree<'_>,
    location: &ScamLocation,
) -> Result<MergeOutcome, ScamError> {
    let component_path = location.component_path();
    let expected_module_path = module_path_for(&component_path).unwrap_or_else(|| location.module_path());

    let (component_content, module_content) =
        match (tree.read(&component_path), tree.read(&expected_module_path)) {
            (Some(component), Some(module)) => (component, module),
            _ => {
                log::warn!(
                    "no module found at {}, leaving generated files unmerged",
                    expected_module_path
                );
                return Ok(MergeOutcome::Skipped {
                    expected_module_path,
                });
            }
        };

    let merged = merge_component_and_module(MergeInput {
        component_content: &component_content,
        module_content: &module_content,
    });
    verify_detached(&merged, &module_specifier(&location.base_name))?;

    tree.overwrite(&component_path, merged)?;
    tree.delete(&expected_module_path)?;
    log::debug!("merged {} into {}", expected_module_path, component_path);

    Ok(MergeOutcome::Merged {
        component_path,
        module_path: expected_module_path,
    })
}

/// Stage the TestBed-free spec beside the component and return its path.
pub fn output_test(tree: &mut Tree<'_>, location: &ScamLocation) -> Result<String, ScamError> {
    let (spec_path, content) = render_component_spec(location);
    log::debug!("generating spec {}", spec_path);
    tree.create(&spec_path, content)?;
    Ok(spec_path)
}
