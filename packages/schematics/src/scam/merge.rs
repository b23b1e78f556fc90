//! Component / Module Merge
//!
//! Folds a generated module file into the generated component file. Both
//! inputs come out of the component and module schematics, so the merge works
//! line by line: import lines are told apart from everything else, a handful
//! of named imports are rewritten, and the rest of the text is carried over
//! untouched. Hand-written files that stray from that shape are not
//! supported.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Import source of the framework core.
pub const CORE_MODULE: &str = "@angular/core";

/// Decorator the module class needs once it lives in the component file.
pub const NG_MODULE_SYMBOL: &str = "NgModule";

static NAMED_IMPORT_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<indent>\s*)import\s*\{(?P<symbols>[^}]*)\}\s*from\s*(?P<source>'[^']*'|"[^"]*")(?P<rest>.*)$"#,
    )
    .unwrap()
});

/// Two or more consecutive blank lines, whitespace-only lines included.
static BLANK_LINES_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").unwrap());

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("merged file still imports \"{specifier}\": {line}")]
    DanglingModuleImport { specifier: String, line: String },
}

#[derive(Debug, Clone, Copy)]
pub struct MergeInput<'a> {
    pub component_content: &'a str,
    pub module_content: &'a str,
}

pub fn is_import_line(line: &str) -> bool {
    line.trim_start().starts_with("import ")
}

/// `import { A, B } from 'source';` split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NamedImport<'a> {
    indent: &'a str,
    symbols: Vec<&'a str>,
    quoted_source: &'a str,
    rest: &'a str,
}

impl<'a> NamedImport<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let caps = NAMED_IMPORT_REGEXP.captures(line)?;
        Some(NamedImport {
            indent: caps.name("indent")?.as_str(),
            symbols: caps
                .name("symbols")?
                .as_str()
                .split(',')
                .map(str::trim)
                .filter(|symbol| !symbol.is_empty())
                .collect(),
            quoted_source: caps.name("source")?.as_str(),
            rest: caps.name("rest")?.as_str(),
        })
    }

    fn source(&self) -> &'a str {
        &self.quoted_source[1..self.quoted_source.len() - 1]
    }

    fn render(&self) -> String {
        format!(
            "{}import {{ {} }} from {}{}",
            self.indent,
            self.symbols.join(", "),
            self.quoted_source,
            self.rest
        )
    }
}

type ImportedSymbols = HashSet<(String, String)>;

fn collect_imported_symbols<'l>(lines: impl Iterator<Item = &'l String>) -> ImportedSymbols {
    lines
        .filter_map(|line| NamedImport::parse(line))
        .flat_map(|import| {
            let source = import.source().to_string();
            import
                .symbols
                .into_iter()
                .map(move |symbol| (source.clone(), symbol.to_string()))
        })
        .collect()
}

/// Add `NgModule` to the component's core import, keeping the symbols in
/// alphabetical order. Lines that are not a single-line named import of the
/// core are returned unchanged.
fn add_ng_module_import(line: &str) -> Option<String> {
    if !is_import_line(line) {
        return None;
    }
    let mut import = NamedImport::parse(line)?;
    if import.source() != CORE_MODULE || import.symbols.contains(&NG_MODULE_SYMBOL) {
        return None;
    }
    let position = import
        .symbols
        .iter()
        .position(|symbol| *symbol > NG_MODULE_SYMBOL)
        .unwrap_or(import.symbols.len());
    import.symbols.insert(position, NG_MODULE_SYMBOL);
    Some(import.render())
}

/// Decide what becomes of a module line. Non-import lines are kept; of the
/// imports only core symbols survive, minus `NgModule` and anything already
/// imported.
fn retain_module_line(line: &str, imported: &mut ImportedSymbols) -> Option<String> {
    if !is_import_line(line) {
        return Some(line.to_string());
    }

    let Some(mut import) = NamedImport::parse(line) else {
        let trimmed = line.trim();
        let is_core = trimmed.contains(&format!("'{}'", CORE_MODULE))
            || trimmed.contains(&format!("\"{}\"", CORE_MODULE));
        return (is_core && !trimmed.contains(NG_MODULE_SYMBOL)).then(|| line.to_string());
    };

    if import.source() != CORE_MODULE {
        return None;
    }

    let original_len = import.symbols.len();
    import.symbols.retain(|symbol| {
        *symbol != NG_MODULE_SYMBOL
            && imported.insert((CORE_MODULE.to_string(), symbol.to_string()))
    });

    if import.symbols.is_empty() {
        None
    } else if import.symbols.len() == original_len {
        Some(line.to_string())
    } else {
        Some(import.render())
    }
}

/// Merge a component file and the module file declaring it into one file.
///
/// Imports of both files are hoisted to the top (component first), followed
/// by the rest of both files in their original order. Runs of blank lines,
/// whitespace-only ones included, are collapsed to a single empty line.
pub fn merge_component_and_module(input: MergeInput<'_>) -> String {
    let mut ng_module_added = false;
    let component_lines: Vec<String> = input
        .component_content
        .split('\n')
        .map(|line| {
            if !ng_module_added {
                if let Some(rewritten) = add_ng_module_import(line) {
                    ng_module_added = true;
                    return rewritten;
                }
            }
            line.to_string()
        })
        .collect();

    let mut imported = collect_imported_symbols(component_lines.iter());
    let module_lines: Vec<String> = input
        .module_content
        .split('\n')
        .filter_map(|line| retain_module_line(line, &mut imported))
        .collect();

    let (import_lines, other_lines): (Vec<String>, Vec<String>) = component_lines
        .into_iter()
        .chain(module_lines)
        .partition(|line| is_import_line(line));

    let content = import_lines
        .into_iter()
        .chain(other_lines)
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_LINES_REGEXP.replace_all(&content, "\n\n").into_owned()
}

/// Import specifier the component used to reach the module: `./<base>.module`.
pub fn module_specifier(base_name: &str) -> String {
    format!("./{}.module", base_name)
}

/// Make sure nothing in `merged` still imports the module file that is about
/// to be deleted.
pub fn verify_detached(merged: &str, specifier: &str) -> Result<(), MergeError> {
    let quoted = [format!("'{}'", specifier), format!("\"{}\"", specifier)];
    match merged
        .split('\n')
        .filter(|line| is_import_line(line))
        .find(|line| quoted.iter().any(|q| line.contains(q.as_str())))
    {
        Some(line) => Err(MergeError::DanglingModuleImport {
            specifier: specifier.to_string(),
            line: line.trim().to_string(),
        }),
        None => Ok(()),
    }
}
