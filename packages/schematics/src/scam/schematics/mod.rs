//! Module and Component Schematics
//!
//! The SCAM schematic does not render Angular files itself: it runs a module
//! schematic and a component schematic and post-processes what they staged.
//! Both sit behind a trait so that other generators can be plugged in; the
//! built-in ones reproduce the Angular CLI scaffolds.

pub mod component;
pub mod module;

pub use component::*;
pub use module::*;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SchematicError;
use crate::file_system::normalize_tree_path;
use crate::scam::options::Style;
use crate::tree::Tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOptions {
    /// Dasherized name, possibly with directories.
    pub name: String,
    /// Directory the name is relative to.
    pub path: String,
    /// Write into `path` instead of a folder named after the module.
    pub flat: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentOptions {
    /// Dasherized name, possibly with directories.
    pub name: String,
    /// Directory the name is relative to.
    pub path: String,
    pub flat: bool,
    /// Module declaring the component, relative to `path`.
    pub module: Option<String>,
    /// Also list the component in the module's `exports`.
    pub export: bool,
    pub skip_tests: bool,
    pub selector: String,
    pub style: Style,
    pub inline_style: bool,
    pub inline_template: bool,
}

pub trait ModuleGenerator {
    fn generate(&self, tree: &mut Tree<'_>, options: &ModuleOptions) -> Result<(), SchematicError>;
}

pub trait ComponentGenerator {
    fn generate(
        &self,
        tree: &mut Tree<'_>,
        options: &ComponentOptions,
    ) -> Result<(), SchematicError>;
}

/// Directory and base name of a generated artifact.
pub(crate) fn artifact_location(path: &str, name: &str, flat: bool) -> (String, String) {
    let base_name = name.rsplit('/').next().unwrap_or(name).to_string();
    let directory = if flat {
        match name.rsplit_once('/') {
            Some((dirs, _)) => format!("{}/{}", path, dirs),
            None => path.to_string(),
        }
    } else {
        format!("{}/{}", path, name)
    };
    (normalize_tree_path(&directory), base_name)
}

/// Locate the module a component should be declared in.
///
/// Tried in order: `<path>/<module>`, with `.ts`, with `.module.ts`, and
/// `<path>/<module>/<base>.module.ts`.
pub fn find_module(tree: &Tree<'_>, path: &str, module: &str) -> Result<String, SchematicError> {
    let module_path = normalize_tree_path(&format!("{}/{}", path, module));
    let module_base_name = module_path.rsplit('/').next().unwrap_or_default();

    let candidates = [
        module_path.clone(),
        format!("{}.ts", module_path),
        format!("{}.module.ts", module_path),
        format!("{}/{}.module.ts", module_path, module_base_name),
    ];
    candidates
        .into_iter()
        .find(|candidate| tree.exists(candidate))
        .ok_or(SchematicError::ModuleNotFound(module_path))
}

/// `@NgModule` metadata arrays the component schematic can extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Declarations,
    Exports,
}

static DECLARATIONS_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<head>\bdeclarations\s*:\s*\[)(?P<items>[^\]]*)\]").unwrap());
static EXPORTS_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<head>\bexports\s*:\s*\[)(?P<items>[^\]]*)\]").unwrap());
static NG_MODULE_METADATA_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(?P<open>@NgModule\(\{)(?P<body>.*?)(?P<close>\s*\}\))").unwrap());
static IMPORT_LINE_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^import .*$").unwrap());

impl MetadataField {
    pub fn key(self) -> &'static str {
        match self {
            MetadataField::Declarations => "declarations",
            MetadataField::Exports => "exports",
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            MetadataField::Declarations => &DECLARATIONS_REGEXP,
            MetadataField::Exports => &EXPORTS_REGEXP,
        }
    }
}

/// Add `symbol` to one of the module's metadata arrays, creating the array
/// when the module has none. Returns `None` when no `@NgModule({...})` can
/// be found.
pub fn add_symbol_to_ng_module_metadata(
    source: &str,
    field: MetadataField,
    symbol: &str,
) -> Option<String> {
    if let Some(caps) = field.regex().captures(source) {
        let whole = caps.get(0)?;
        let head = &caps["head"];
        let items = &caps["items"];
        if items.split(',').any(|item| item.trim() == symbol) {
            return Some(source.to_string());
        }
        let replacement = if items.trim().is_empty() {
            format!("{}{}]", head, symbol)
        } else if items.contains('\n') {
            format!("{}{},\n    {}\n  ]", head, items.trim_end(), symbol)
        } else {
            format!("{}{}, {}]", head, items.trim_end(), symbol)
        };
        return Some(format!(
            "{}{}{}",
            &source[..whole.start()],
            replacement,
            &source[whole.end()..]
        ));
    }

    let caps = NG_MODULE_METADATA_REGEXP.captures(source)?;
    let whole = caps.get(0)?;
    let body = caps["body"].trim_end();
    let metadata = if body.trim().is_empty() {
        format!("{}\n  {}: [{}]\n}})", &caps["open"], field.key(), symbol)
    } else {
        format!(
            "{}{},\n  {}: [{}]{}",
            &caps["open"],
            body,
            field.key(),
            symbol,
            &caps["close"]
        )
    };
    Some(format!(
        "{}{}{}",
        &source[..whole.start()],
        metadata,
        &source[whole.end()..]
    ))
}

/// Insert `import { symbol } from 'specifier';` after the last import line.
pub fn insert_import(source: &str, symbol: &str, specifier: &str) -> String {
    let statement = format!("import {{ {} }} from '{}';", symbol, specifier);
    match IMPORT_LINE_REGEXP.find_iter(source).last() {
        Some(last) => format!(
            "{}\n{}{}",
            &source[..last.end()],
            statement,
            &source[last.end()..]
        ),
        None => format!("{}\n{}", statement, source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_system::testing::MockFileSystem;
    use crate::file_system::AbsoluteFsPath;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_locate_nested_and_flat_artifacts() {
        assert_eq!(
            artifact_location("/src/app", "greetings/hello-world", false),
            ("/src/app/greetings/hello-world".to_string(), "hello-world".to_string())
        );
        assert_eq!(
            artifact_location("/src/app", "greetings/hello-world", true),
            ("/src/app/greetings".to_string(), "hello-world".to_string())
        );
    }

    #[test]
    fn should_find_module_in_its_own_folder() {
        let fs = MockFileSystem::new();
        fs.init_with_files(&[("/src/app/hello-world/hello-world.module.ts", "")]);
        let tree = Tree::new(&fs, AbsoluteFsPath::new("/"));
        assert_eq!(
            find_module(&tree, "/src/app", "hello-world").unwrap(),
            "/src/app/hello-world/hello-world.module.ts"
        );
    }

    #[test]
    fn should_find_flat_module() {
        let fs = MockFileSystem::new();
        fs.init_with_files(&[("/src/app/shared.module.ts", "")]);
        let tree = Tree::new(&fs, AbsoluteFsPath::new("/"));
        assert_eq!(
            find_module(&tree, "/src/app", "shared").unwrap(),
            "/src/app/shared.module.ts"
        );
    }

    #[test]
    fn should_fail_when_module_is_missing() {
        let fs = MockFileSystem::new();
        let tree = Tree::new(&fs, AbsoluteFsPath::new("/"));
        assert!(matches!(
            find_module(&tree, "/src/app", "missing"),
            Err(SchematicError::ModuleNotFound(path)) if path == "/src/app/missing"
        ));
    }

    #[test]
    fn should_fill_empty_declarations() {
        let source = "@NgModule({\n  declarations: [],\n  imports: []\n})\nexport class A { }\n";
        let result =
            add_symbol_to_ng_module_metadata(source, MetadataField::Declarations, "BComponent")
                .unwrap();
        assert_eq!(
            result,
            "@NgModule({\n  declarations: [BComponent],\n  imports: []\n})\nexport class A { }\n"
        );
    }

    #[test]
    fn should_append_to_existing_declarations() {
        let single = "@NgModule({\n  declarations: [AComponent]\n})\n";
        assert_eq!(
            add_symbol_to_ng_module_metadata(single, MetadataField::Declarations, "BComponent")
                .unwrap(),
            "@NgModule({\n  declarations: [AComponent, BComponent]\n})\n"
        );

        let multi = "@NgModule({\n  declarations: [\n    AComponent\n  ]\n})\n";
        assert_eq!(
            add_symbol_to_ng_module_metadata(multi, MetadataField::Declarations, "BComponent")
                .unwrap(),
            "@NgModule({\n  declarations: [\n    AComponent,\n    BComponent\n  ]\n})\n"
        );
    }

    #[test]
    fn should_not_declare_twice() {
        let source = "@NgModule({\n  declarations: [AComponent]\n})\n";
        assert_eq!(
            add_symbol_to_ng_module_metadata(source, MetadataField::Declarations, "AComponent")
                .unwrap(),
            source
        );
    }

    #[test]
    fn should_add_missing_exports() {
        let source = "@NgModule({\n  declarations: [AComponent],\n  imports: [\n    CommonModule\n  ]\n})\nexport class A { }\n";
        assert_eq!(
            add_symbol_to_ng_module_metadata(source, MetadataField::Exports, "AComponent").unwrap(),
            "@NgModule({\n  declarations: [AComponent],\n  imports: [\n    CommonModule\n  ],\n  exports: [AComponent]\n})\nexport class A { }\n"
        );

        assert_eq!(
            add_symbol_to_ng_module_metadata("@NgModule({})\n", MetadataField::Exports, "A")
                .unwrap(),
            "@NgModule({\n  exports: [A]\n})\n"
        );
    }

    #[test]
    fn should_give_up_without_ng_module() {
        assert_eq!(
            add_symbol_to_ng_module_metadata("export class A {}\n", MetadataField::Exports, "A"),
            None
        );
    }

    #[test]
    fn should_insert_import_after_last_import() {
        let source = "import { NgModule } from '@angular/core';\nimport { CommonModule } from '@angular/common';\n\n@NgModule({})\n";
        assert_eq!(
            insert_import(source, "AComponent", "./a.component"),
            "import { NgModule } from '@angular/core';\nimport { CommonModule } from '@angular/common';\nimport { AComponent } from './a.component';\n\n@NgModule({})\n"
        );
        assert_eq!(
            insert_import("@NgModule({})\n", "A", "./a"),
            "import { A } from './a';\n@NgModule({})\n"
        );
    }
}
