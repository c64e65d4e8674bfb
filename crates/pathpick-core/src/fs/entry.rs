//! Directory entry representation.

use std::path::{Path, PathBuf};

use crate::fs::host::{LinkStat, TargetStat};
use crate::nfc_string;

/// Classification of a picker row.
///
/// The first five kinds describe real file system children and are the only
/// kinds an [`Entry`] can carry. The two `Create*` kinds belong to the
/// synthetic affordance rows built by the classifier
/// (see [`Row::kind`](crate::nav::filter::Row::kind)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
    SymlinkFile,
    SymlinkDirectory,
    /// One of the two stat calls failed. The name is still listed.
    StatError,
    CreateFileAffordance,
    CreateDirectoryAffordance,
}

impl EntryKind {
    /// Returns `true` for directories, whether reached directly or through a symlink.
    pub fn is_dir(self) -> bool {
        matches!(self, Self::Directory | Self::SymlinkDirectory)
    }

    /// Returns `true` for files, whether reached directly or through a symlink.
    pub fn is_file(self) -> bool {
        matches!(self, Self::File | Self::SymlinkFile)
    }

    pub fn is_symlink(self) -> bool {
        matches!(self, Self::SymlinkFile | Self::SymlinkDirectory)
    }

    /// Returns `true` for the synthetic "create" kinds.
    pub fn is_affordance(self) -> bool {
        matches!(
            self,
            Self::CreateFileAffordance | Self::CreateDirectoryAffordance
        )
    }
}

/// One child of a listed directory, including the `..` pseudo-entry.
///
/// `Entry` is immutable. Construct it with [`Entry::from_stats`] when both
/// stat calls succeeded, or with [`Entry::stat_error`] when either failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    fragment: String,
    full: PathBuf,
    kind: EntryKind,
}

impl Entry {
    /// Creates an entry from the target stat (follows symlinks) and the
    /// link stat (does not).
    ///
    /// Anything that is not a directory is classified as a file.
    pub fn from_stats(full: PathBuf, name: &str, target: TargetStat, link: LinkStat) -> Self {
        let kind = match (target.is_dir, link.is_symlink) {
            (true, true) => EntryKind::SymlinkDirectory,
            (true, false) => EntryKind::Directory,
            (false, true) => EntryKind::SymlinkFile,
            (false, false) => EntryKind::File,
        };
        Self {
            fragment: nfc_string(name),
            full,
            kind,
        }
    }

    /// Creates a placeholder for an entry whose metadata could not be read.
    pub fn stat_error(full: PathBuf, name: &str) -> Self {
        Self {
            fragment: nfc_string(name),
            full,
            kind: EntryKind::StatError,
        }
    }

    /// Display name: the base name as listed, NFC-normalised.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Absolute path of the entry.
    pub fn full(&self) -> &Path {
        &self.full
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    pub fn is_error(&self) -> bool {
        self.kind == EntryKind::StatError
    }
}
