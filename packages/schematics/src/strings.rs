//! String Utilities
//!
//! Name conversions used by the Angular devkit when turning a user supplied
//! name into file names, class names and selectors.

use once_cell::sync::Lazy;
use regex::Regex;

static STRING_DECAMELIZE_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());
static STRING_DASHERIZE_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ _]").unwrap());
static STRING_CAMELIZE_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:-|_|\.|\s)+(.)?").unwrap());

/// Convert camelCase to lower_snake_case.
///
/// `innerHTML` becomes `inner_html`, `Hello World` is left spaced.
pub fn decamelize(input: &str) -> String {
    STRING_DECAMELIZE_REGEXP
        .replace_all(input, "${1}_${2}")
        .to_lowercase()
}

/// Convert a name to kebab-case. Path separators are left untouched, so every
/// segment of `greetings/HelloWorld` is converted on its own.
pub fn dasherize(input: &str) -> String {
    STRING_DASHERIZE_REGEXP
        .replace_all(&decamelize(input), "-")
        .into_owned()
}

/// Convert a dashed, underscored, dotted or spaced name to lowerCamelCase.
pub fn camelize(input: &str) -> String {
    let camelized = STRING_CAMELIZE_REGEXP.replace_all(input, |caps: &regex::Captures| {
        caps.get(1)
            .map(|chr| chr.as_str().to_uppercase())
            .unwrap_or_default()
    });

    let mut chars = camelized.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            first.to_ascii_lowercase().to_string() + chars.as_str()
        }
        _ => camelized.into_owned(),
    }
}

/// Upper-case the first character.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert a name to UpperCamelCase. Dots separate words like dashes do.
pub fn classify(input: &str) -> String {
    input
        .split('.')
        .map(|part| capitalize(&camelize(part)))
        .collect()
}
