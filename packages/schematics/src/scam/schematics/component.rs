use crate::error::SchematicError;
use crate::file_system::build_relative_path;
use crate::scam::schematics::{
    add_symbol_to_ng_module_metadata, artifact_location, find_module, insert_import,
    ComponentGenerator, ComponentOptions, MetadataField,
};
use crate::strings::classify;
use crate::tree::Tree;

/// Angular's `component` schematic.
#[derive(Debug, Default, Clone, Copy)]
pub struct AngularComponentSchematic;

impl AngularComponentSchematic {
    pub fn render_component(options: &ComponentOptions, base_name: &str, class_name: &str) -> String {
        let mut metadata = vec![format!("  selector: '{}'", options.selector)];
        if options.inline_template {
            metadata.push(format!(
                "  template: `\n    <p>\n      {} works!\n    </p>\n  `",
                base_name
            ));
        } else {
            metadata.push(format!("  templateUrl: './{}.component.html'", base_name));
        }
        if options.inline_style {
            metadata.push("  styles: []".to_string());
        } else if let Some(extension) = options.style.extension() {
            metadata.push(format!(
                "  styleUrls: ['./{}.component.{}']",
                base_name, extension
            ));
        }

        format!(
            "import {{ Component, OnInit }} from '@angular/core';

@Component({{
{}
}})
export class {}Component implements OnInit {{

  constructor() {{ }}

  ngOnInit() {{
  }}

}}
",
            metadata.join(",\n"),
            class_name
        )
    }

    pub fn render_template(base_name: &str) -> String {
        format!("<p>\n  {} works!\n</p>\n", base_name)
    }

    pub fn render_spec(base_name: &str, class_name: &str) -> String {
        format!(
            "import {{ async, ComponentFixture, TestBed }} from '@angular/core/testing';

import {{ {class}Component }} from './{base}.component';

describe('{class}Component', () => {{
  let component: {class}Component;
  let fixture: ComponentFixture<{class}Component>;

  beforeEach(async(() => {{
    TestBed.configureTestingModule({{
      declarations: [ {class}Component ]
    }})
    .compileComponents();
  }}));

  beforeEach(() => {{
    fixture = TestBed.createComponent({class}Component);
    component = fixture.componentInstance;
    fixture.detectChanges();
  }});

  it('should create', () => {{
    expect(component).toBeTruthy();
  }});
}});
",
            class = class_name,
            base = base_name
        )
    }

    fn add_to_module(
        tree: &mut Tree<'_>,
        module_path: &str,
        component_path: &str,
        component_class: &str,
        export: bool,
    ) -> Result<(), SchematicError> {
        let source = tree
            .read(module_path)
            .ok_or_else(|| SchematicError::ModuleNotFound(module_path.to_string()))?;
        let missing_metadata = || SchematicError::MissingNgModuleMetadata(module_path.to_string());

        let specifier = build_relative_path(module_path, component_path);
        let mut updated = insert_import(&source, component_class, &specifier);
        updated = add_symbol_to_ng_module_metadata(&updated, MetadataField::Declarations, component_class)
            .ok_or_else(missing_metadata)?;
        if export {
            updated = add_symbol_to_ng_module_metadata(&updated, MetadataField::Exports, component_class)
                .ok_or_else(missing_metadata)?;
        }

        log::debug!("declaring {} in {}", component_class, module_path);
        tree.overwrite(module_path, updated)?;
        Ok(())
    }
}

impl ComponentGenerator for AngularComponentSchematic {
    fn generate(
        &self,
        tree: &mut Tree<'_>,
        options: &ComponentOptions,
    ) -> Result<(), SchematicError> {
        let (directory, base_name) = artifact_location(&options.path, &options.name, options.flat);
        let class_name = classify(&base_name);
        let file = |suffix: &str| format!("{}/{}.component.{}", directory, base_name, suffix);

        // Resolve the module first so that nothing is staged when it is missing.
        let module_path = match &options.module {
            Some(module) => Some(find_module(tree, &options.path, module)?),
            None => None,
        };

        let component_path = file("ts");
        log::debug!("generating component {}", component_path);
        tree.create(
            &component_path,
            Self::render_component(options, &base_name, &class_name),
        )?;
        if !options.inline_template {
            tree.create(&file("html"), Self::render_template(&base_name))?;
        }
        if !options.inline_style {
            if let Some(extension) = options.style.extension() {
                tree.create(&file(extension), "")?;
            }
        }
        if !options.skip_tests {
            tree.create(&file("spec.ts"), Self::render_spec(&base_name, &class_name))?;
        }

        if let Some(module_path) = module_path {
            Self::add_to_module(
                tree,
                &module_path,
                &component_path,
                &format!("{}Component", class_name),
                options.export,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_system::testing::MockFileSystem;
    use crate::file_system::AbsoluteFsPath;
    use crate::scam::options::Style;
    use crate::scam::schematics::{AngularModuleSchematic, ModuleGenerator, ModuleOptions};
    use pretty_assertions::assert_eq;

    fn options(name: &str) -> ComponentOptions {
        ComponentOptions {
            name: name.to_string(),
            path: "/src/app".to_string(),
            flat: false,
            module: None,
            export: false,
            skip_tests: false,
            selector: format!("app-{}", name),
            style: Style::Css,
            inline_style: false,
            inline_template: false,
        }
    }

    #[test]
    fn should_render_angular_component() {
        let content =
            AngularComponentSchematic::render_component(&options("hello-world"), "hello-world", "HelloWorld");
        assert_eq!(
            content,
            "import { Component, OnInit } from '@angular/core';

@Component({
  selector: 'app-hello-world',
  templateUrl: './hello-world.component.html',
  styleUrls: ['./hello-world.component.css']
})
export class HelloWorldComponent implements OnInit {

  constructor() { }

  ngOnInit() {
  }

}
"
        );
    }

    #[test]
    fn should_create_component_files() {
        let fs = MockFileSystem::new();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/"));
        AngularComponentSchematic
            .generate(&mut tree, &options("hello-world"))
            .unwrap();

        let created: Vec<String> = tree.actions().iter().map(|a| a.path().to_string()).collect();
        assert_eq!(
            created,
            vec![
                "/src/app/hello-world/hello-world.component.ts".to_string(),
                "/src/app/hello-world/hello-world.component.html".to_string(),
                "/src/app/hello-world/hello-world.component.css".to_string(),
                "/src/app/hello-world/hello-world.component.spec.ts".to_string(),
            ]
        );
        let spec = tree
            .read("/src/app/hello-world/hello-world.component.spec.ts")
            .unwrap();
        assert!(spec.contains("TestBed.configureTestingModule"));
    }

    #[test]
    fn should_inline_template_and_styles() {
        let fs = MockFileSystem::new();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/"));
        let mut opts = options("card");
        opts.inline_style = true;
        opts.inline_template = true;
        opts.skip_tests = true;
        AngularComponentSchematic.generate(&mut tree, &opts).unwrap();

        assert_eq!(tree.actions().len(), 1);
        let content = tree.read("/src/app/card/card.component.ts").unwrap();
        assert!(content.contains("template: `"));
        assert!(content.contains("styles: []"));
        assert!(!content.contains("templateUrl"));
    }

    #[test]
    fn should_use_requested_stylesheet() {
        let fs = MockFileSystem::new();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/"));
        let mut opts = options("card");
        opts.style = Style::Scss;
        AngularComponentSchematic.generate(&mut tree, &opts).unwrap();
        assert!(tree.exists("/src/app/card/card.component.scss"));
        assert!(!tree.exists("/src/app/card/card.component.css"));

        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/"));
        opts.style = Style::None;
        AngularComponentSchematic.generate(&mut tree, &opts).unwrap();
        let content = tree.read("/src/app/card/card.component.ts").unwrap();
        assert!(!content.contains("styleUrls"));
    }

    #[test]
    fn should_declare_and_export_in_module() {
        let fs = MockFileSystem::new();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/"));
        AngularModuleSchematic
            .generate(
                &mut tree,
                &ModuleOptions {
                    name: "hello-world".to_string(),
                    path: "/src/app".to_string(),
                    flat: false,
                },
            )
            .unwrap();

        let mut opts = options("hello-world");
        opts.module = Some("hello-world".to_string());
        opts.export = true;
        opts.skip_tests = true;
        AngularComponentSchematic.generate(&mut tree, &opts).unwrap();

        let module = tree.read("/src/app/hello-world/hello-world.module.ts").unwrap();
        assert_eq!(
            module,
            "import { NgModule } from '@angular/core';
import { CommonModule } from '@angular/common';
import { HelloWorldComponent } from './hello-world.component';



@NgModule({
  declarations: [HelloWorldComponent],
  imports: [
    CommonModule
  ],
  exports: [HelloWorldComponent]
})
export class HelloWorldModule { }
"
        );
    }

    #[test]
    fn should_stage_nothing_when_module_is_missing() {
        let fs = MockFileSystem::new();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/"));
        let mut opts = options("hello-world");
        opts.module = Some("hello-world".to_string());
        assert!(matches!(
            AngularComponentSchematic.generate(&mut tree, &opts),
            Err(SchematicError::ModuleNotFound(_))
        ));
        assert!(tree.actions().is_empty());
    }
}
