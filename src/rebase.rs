//! Lexical path math for rebasing relative URLs.
//!
//! Everything here is string-level: `.` and `..` segments are folded out of
//! joined paths without consulting the filesystem, and `..` cannot climb
//! above the root.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Rebase `url` from the directory `from` to the directory `to`.
///
/// The URL is resolved to an absolute path against `from`, then expressed
/// relative to `to`.
pub(crate) fn rebase(url: &str, from: &Utf8Path, to: &Utf8Path) -> String {
    let absolute = normalize(&from.join(url));
    relative_to(&absolute, &normalize(to)).into_string()
}

/// Fold `.` and `..` components out of `path`.
fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match out.components().next_back() {
                Some(Utf8Component::Normal(_)) => {
                    out.pop();
                }
                // `..` cannot climb above the root
                Some(Utf8Component::RootDir) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_str()),
        }
    }
    out
}

/// Express `path` relative to the directory `base`.
///
/// Both inputs must already be normalized. Returns an empty path when they
/// are equal.
fn relative_to(path: &Utf8Path, base: &Utf8Path) -> Utf8PathBuf {
    let path_components: Vec<Utf8Component> = path.components().collect();
    let base_components: Vec<Utf8Component> = base.components().collect();
    let shared = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(path_part, base_part)| path_part == base_part)
        .count();

    let mut out = Utf8PathBuf::new();
    for _ in shared..base_components.len() {
        out.push("..");
    }
    for component in &path_components[shared..] {
        out.push(component.as_str());
    }
    out
}
