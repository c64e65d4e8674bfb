//! Command and event types exchanged between a host UI and the picker.
//!
//! The host translates user input into [`Command`]s and hands them to
//! [`Picker::handle`](crate::picker::Picker::handle). The picker reports
//! outcomes that the host must act on as [`Event`]s. Row and selection
//! changes are not events; they are published as
//! [`Snapshot`](crate::nav::query::Snapshot)s.

use std::path::PathBuf;

/// An action the host requests the picker to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The query text changed.
    SetQuery(String),
    /// Navigate to a directory (absolute, relative to the base, or `~/`).
    MoveDirectory(String),
    /// Navigate to the parent of the directory being completed.
    MoveUpDirectory,
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,
    /// Move the selection to the given row.
    SelectIndex(usize),
    /// Confirm the selected row.
    Confirm,
    /// Select the given row and confirm it, as a mouse click does.
    ConfirmIndex(usize),
    /// Ask the host to add the selected directory as a workspace root.
    AddRoot,
    /// Ask the host to remove the selected directory from the workspace roots.
    RemoveRoot,
    /// Dismiss the picker.
    Cancel,
}

/// A notification the picker sends back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user chose a file. It may not exist yet; its directory does.
    ConfirmFile(PathBuf),
    RequestAddRoot(PathBuf),
    RequestRemoveRoot(PathBuf),
    /// The picker was dismissed without a choice.
    Cancel,
}
