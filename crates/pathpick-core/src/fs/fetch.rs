//! Directory listing for the picker.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::Entry;
use crate::fs::host::HostFs;
use crate::nav::resolve::resolve_query;

/// Name of the pseudo-entry that points at the parent directory.
pub const PARENT_ENTRY: &str = "..";

/// The raw entries of exactly one directory.
///
/// A listing is immutable. Re-listing produces a new value that replaces the
/// old one wholesale. Affordance rows are never stored here; the classifier
/// adds them at filter time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    dir: String,
    entries: Vec<Entry>,
}

impl DirectoryListing {
    /// A listing for a directory that does not exist.
    pub fn empty(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            entries: Vec::new(),
        }
    }

    /// The directory-shaped path this listing belongs to.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// The `..` entry followed by the children in host order.
    /// Empty when the directory does not exist.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lists `dir` and stats every child.
///
/// A missing directory yields an empty listing rather than an error, so the
/// caller can still offer to create it. Each child is stat'ed twice: once
/// following symlinks and once without. If either call fails only that child
/// degrades to [`EntryKind::StatError`](crate::fs::entry::EntryKind::StatError).
///
/// # Errors
///
/// - [`CoreError::NotADirectory`]: `dir` names an existing file.
/// - [`CoreError::DirectoryList`]: the directory exists but could not be read.
pub fn fetch_directory(host: &dyn HostFs, dir: &str) -> CoreResult<DirectoryListing> {
    let path = Path::new(dir);
    if !host.exists(path) {
        tracing::debug!("{dir} does not exist, listing is empty");
        return Ok(DirectoryListing::empty(dir));
    }
    if matches!(host.stat_target(path), Ok(stat) if !stat.is_dir) {
        return Err(CoreError::NotADirectory(path.to_path_buf()));
    }

    let names = host
        .list_dir(path)
        .map_err(|source| CoreError::DirectoryList {
            path: path.to_path_buf(),
            source,
        })?;

    let mut entries = Vec::with_capacity(names.len() + 1);
    entries.push(fetch_entry(host, dir, OsStr::new(PARENT_ENTRY)));
    entries.extend(names.iter().map(|name| fetch_entry(host, dir, name)));

    Ok(DirectoryListing {
        dir: dir.to_string(),
        entries,
    })
}

/// Stats one child. `full` keeps the on-disk name; only the display
/// fragment goes through lossy UTF-8 conversion.
fn fetch_entry(host: &dyn HostFs, dir: &str, name: &OsStr) -> Entry {
    let full = if name == PARENT_ENTRY {
        PathBuf::from(resolve_query(PARENT_ENTRY, dir, None))
    } else {
        Path::new(dir).join(name)
    };
    let name = name.to_string_lossy();
    let stats = host
        .stat_target(&full)
        .and_then(|target| host.stat_link(&full).map(|link| (target, link)));
    match stats {
        Ok((target, link)) => Entry::from_stats(full, &name, target, link),
        Err(e) => {
            tracing::trace!("stat failed for {}: {e}", full.display());
            Entry::stat_error(full, &name)
        }
    }
}
