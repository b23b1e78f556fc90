//! Unit test emitted next to a SCAM.
//!
//! The component is instantiated directly with `new` instead of going through
//! `TestBed`, which keeps the generated test free of module configuration.

use crate::scam::options::ScamLocation;

/// Path and content of the spec file for `location`.
pub fn render_component_spec(location: &ScamLocation) -> (String, String) {
    let class_name = location.component_class();
    let content = format!(
        "import {{ {class_name} }} from './{base_name}.component';

describe('{class_name}', () => {{
  it('should return undefined when calling ngOnInit', () => {{
    const component = new {class_name}();
    const result = component.ngOnInit();
    expect(result).toEqual(undefined);
  }});
}});
",
        class_name = class_name,
        base_name = location.base_name,
    );
    (location.spec_path(), content)
}
