use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::Metadata;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"%(\w+)%").unwrap());

/// Resolve a path-derived pseudo-tag for `file`.
///
/// - `filepath`: the full path
/// - `folderpath`: the containing directory
/// - `filename`: file name without extension
/// - `filename_ext`: file name with extension
/// - `directory`: name of the containing directory
fn path_variable(name: &str, file: &Path) -> Option<String> {
    let lossy = |p: Option<&std::ffi::OsStr>| {
        p.map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let parent = file.parent().unwrap_or_else(|| Path::new(""));

    match name {
        "filepath" => Some(file.to_string_lossy().into_owned()),
        "folderpath" => Some(parent.to_string_lossy().into_owned()),
        "filename" => Some(lossy(file.file_stem())),
        "filename_ext" => Some(lossy(file.file_name())),
        "directory" => Some(lossy(parent.file_name())),
        _ => None,
    }
}

/// Substitute every `%name%` placeholder in `template`.
///
/// Path pseudo-tags win over metadata. Unknown tags are left as the literal
/// `%name%` text.
pub fn resolve_template(template: &str, file: &Path, metadata: &Metadata) -> String {
    TAG_PATTERN
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            path_variable(name, file)
                .or_else(|| metadata.get(name).map(str::to_string))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Resolve the lyrics file path for an audio file.
/// Relative results are placed next to the audio file.
pub fn resolve_lrc_path(template: &str, file: &Path, metadata: &Metadata) -> PathBuf {
    let resolved = PathBuf::from(resolve_template(template, file, metadata));
    if resolved.is_absolute() {
        return resolved;
    }
    match file.parent() {
        Some(dir) => dir.join(resolved),
        None => resolved,
    }
}
