//! The file system operations the picker needs from its host.
//!
//! [`HostFs`] is the seam between the resolver and the outside world.
//! [`LocalFs`] implements it on the local disk; hosts with a virtual or
//! remote file system supply their own implementation.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Result of a stat call that follows symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetStat {
    pub is_dir: bool,
    pub is_file: bool,
}

/// Result of a stat call that does not follow symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkStat {
    pub is_symlink: bool,
}

/// File system operations consumed by the picker core.
///
/// Every method is blocking. The [`Picker`](crate::picker::Picker) calls
/// them from `spawn_blocking` tasks, never from the input path.
pub trait HostFs: Send + Sync {
    /// The user's home directory, used for `~` expansion.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Returns `true` if `path` exists (following symlinks).
    fn exists(&self, path: &Path) -> bool;

    /// Names of the immediate children of `path`, in host order, as stored
    /// on disk.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Stats the target of `path`, following symlinks.
    fn stat_target(&self, path: &Path) -> io::Result<TargetStat>;

    /// Stats `path` itself without following symlinks.
    fn stat_link(&self, path: &Path) -> io::Result<LinkStat>;

    /// Creates `path` and any missing ancestors.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// [`HostFs`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl HostFs for LocalFs {
    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for dir_entry in std::fs::read_dir(path)? {
            let dir_entry = match dir_entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            names.push(dir_entry.file_name());
        }
        Ok(names)
    }

    fn stat_target(&self, path: &Path) -> io::Result<TargetStat> {
        let meta = std::fs::metadata(path)?;
        Ok(TargetStat {
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
        })
    }

    fn stat_link(&self, path: &Path) -> io::Result<LinkStat> {
        let meta = std::fs::symlink_metadata(path)?;
        Ok(LinkStat {
            is_symlink: meta.file_type().is_symlink(),
        })
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}
