use crate::error::SchematicError;
use crate::scam::schematics::{artifact_location, ModuleGenerator, ModuleOptions};
use crate::strings::classify;
use crate::tree::Tree;

/// Angular's `module` schematic: an empty NgModule importing `CommonModule`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AngularModuleSchematic;

impl AngularModuleSchematic {
    pub fn render(class_name: &str) -> String {
        format!(
            "import {{ NgModule }} from '@angular/core';
import {{ CommonModule }} from '@angular/common';



@NgModule({{
  declarations: [],
  imports: [
    CommonModule
  ]
}})
export class {}Module {{ }}
",
            class_name
        )
    }
}

impl ModuleGenerator for AngularModuleSchematic {
    fn generate(&self, tree: &mut Tree<'_>, options: &ModuleOptions) -> Result<(), SchematicError> {
        let (directory, base_name) = artifact_location(&options.path, &options.name, options.flat);
        let module_path = format!("{}/{}.module.ts", directory, base_name);
        log::debug!("generating module {}", module_path);
        tree.create(&module_path, Self::render(&classify(&base_name)))?;
        Ok(())
    }
}
