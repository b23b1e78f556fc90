use once_cell::sync::Lazy;
use regex::Regex;

static TS_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.ts$").unwrap());

/// Convert Windows-style separators to POSIX separators.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Remove a trailing .ts extension from a file name.
pub fn strip_extension(path: &str) -> String {
    TS_EXTENSION.replace(path, "").to_string()
}

/// Fold `.` and `..` segments and duplicate separators.
///
/// Absolute inputs stay absolute; `..` never climbs above the root.
pub fn clean_path(path: &str) -> String {
    let normalized = normalize_separators(path);

    let bytes = normalized.as_bytes();
    let is_windows_absolute =
        bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    let is_unix_absolute = normalized.starts_with('/');

    let (drive_prefix, path_part) = if is_windows_absolute {
        normalized.split_at(2)
    } else {
        ("", normalized.as_str())
    };

    let mut segments = Vec::new();
    for segment in path_part.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");

    if is_windows_absolute {
        format!("{}/{}", drive_prefix, joined)
    } else if is_unix_absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Normalize a path inside the generated tree: always `/`-rooted and clean.
pub fn normalize_tree_path(path: &str) -> String {
    let cleaned = clean_path(path);
    if cleaned.starts_with('/') {
        cleaned
    } else {
        format!("/{}", cleaned)
    }
}

/// Relative import specifier from the file `from` to the file `to`, both
/// tree paths. The result always starts with `./` or `../` and drops the
/// `.ts` extension, as TypeScript import paths do.
pub fn build_relative_path(from: &str, to: &str) -> String {
    let from = normalize_tree_path(from);
    let to = normalize_tree_path(&strip_extension(to));

    let mut from_dirs: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    from_dirs.pop();
    let mut to_parts: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();
    let to_file = to_parts.pop().unwrap_or_default();

    let common = from_dirs
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative: Vec<&str> = vec![".."; from_dirs.len() - common];
    relative.extend(&to_parts[common..]);
    relative.push(to_file);

    let joined = relative.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{}", joined)
    }
}
