//! Query-string path resolution.
//!
//! Queries are plain strings rather than `PathBuf`s because a trailing
//! separator is meaningful: it is the only marker that a query names a
//! directory. Every function here is lexical; only [`is_valid_query`] touches
//! the file system, and only to check that a root exists.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use crate::fs::host::HostFs;

/// The host's native path separator.
pub const SEP: char = MAIN_SEPARATOR;

const VALID_PREFIXES: [&str; 4] = ["", "~", ".", ".."];

/// Expands a leading `~<sep>` to the home directory. Other paths, and all
/// paths when `home` is unknown, are returned unchanged.
pub fn resolve_tilde(path: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return path.to_string();
    };
    let Some(rest) = path.strip_prefix('~') else {
        return path.to_string();
    };
    if !rest.starts_with(SEP) {
        return path.to_string();
    }
    let home = home.to_string_lossy();
    format!("{}{}", home.trim_end_matches(SEP), rest)
}

/// Returns `true` iff `path` ends with the separator.
pub fn is_directory_path(path: &str) -> bool {
    path.ends_with(SEP)
}

/// Appends a separator unless `path` already ends with one.
pub fn directory_shaped(mut path: String) -> String {
    if !is_directory_path(&path) {
        path.push(SEP);
    }
    path
}

/// Resolves `query` to an absolute path against `base`.
///
/// A trailing `<sep>.` or `<sep>..` is kept literally so the caller can
/// still tell which directory to list and what name to match. A
/// directory-shaped query yields a directory-shaped result, which makes the
/// function idempotent on its own directory output.
pub fn resolve_query(query: &str, base: &str, home: Option<&Path>) -> String {
    let base = resolve_tilde(base, home);
    let query = resolve_tilde(query, home);

    for literal in ["..", "."] {
        let suffix = format!("{SEP}{literal}");
        if query.ends_with(&suffix) {
            let head = &query[..query.len() - literal.len()];
            let resolved = absolute(&base, head);
            return if is_directory_path(&resolved) {
                format!("{resolved}{literal}")
            } else {
                format!("{resolved}{SEP}{literal}")
            };
        }
    }

    absolute(&base, &query)
}

/// The directory that has to be listed to complete `path`.
///
/// A directory-shaped path is its own containing directory; anything else
/// yields its parent, made directory-shaped.
pub fn containing_directory(path: &str) -> String {
    if is_directory_path(path) {
        return path.to_string();
    }
    let dir = match path.rfind(SEP) {
        Some(0) => SEP.to_string(),
        Some(idx) => path[..idx].to_string(),
        None => ".".to_string(),
    };
    directory_shaped(dir)
}

/// Base name of a resolved query: everything after the last separator.
pub fn base_name(path: &str) -> &str {
    match path.rfind(SEP) {
        Some(idx) => &path[idx + SEP.len_utf8()..],
        None => path,
    }
}

/// Decides whether `query` is complete enough to resolve.
///
/// Relative, home and root-anchored prefixes are always accepted. Otherwise
/// the query's root must exist; a bare volume designator such as `C:` is
/// rejected as ambiguous.
pub fn is_valid_query(query: &str, host: &dyn HostFs) -> bool {
    if VALID_PREFIXES
        .iter()
        .any(|prefix| query.starts_with(&format!("{prefix}{SEP}")))
    {
        return true;
    }
    if query.ends_with(':') {
        return false;
    }
    let root: PathBuf = Path::new(query)
        .components()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect();
    !root.as_os_str().is_empty() && host.exists(&root)
}

/// Joins `path` onto `base` and normalises `.` and `..` lexically, keeping a
/// trailing separator when `path` has one.
fn absolute(base: &str, path: &str) -> String {
    let joined = Path::new(base).join(path);
    let resolved = normalize(&joined);
    if is_directory_path(path) {
        directory_shaped(resolved)
    } else {
        resolved
    }
}

fn normalize(path: &Path) -> String {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::ParentDir) | None => out.push(".."),
                // `..` at the root stays at the root
                _ => {}
            },
            Component::Normal(name) => out.push(name),
        }
    }
    if out.as_os_str().is_empty() {
        return ".".to_string();
    }
    out.to_string_lossy().into_owned()
}
