//! pathpick core library: incremental path-query resolution for file pickers.
//!
//! A user types a path fragment; the picker resolves it against a base
//! directory, lists the containing directory off the input path, fuzzy-filters
//! its children and offers to create whatever does not exist yet. The crate is
//! UI-agnostic: a host drives it with [`Command`]s, renders
//! [`Snapshot`]s and reacts to [`Event`]s.
//!
//! # Modules
//!
//! - [`fs`]: Host file system seam ([`HostFs`]), entries and directory listings.
//! - [`nav`]: Path resolution, classification, the query state machine, confirmation.
//! - [`picker`]: Async driver running listings on Tokio's blocking pool.
//! - [`config`]: TOML-based picker settings.
//! - [`event`]: Command and event types for host ↔ picker communication.
//! - [`error`]: Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod nav;
pub mod picker;

pub use config::settings::Config;
pub use error::{CoreError, CoreResult};
pub use event::{Command, Event};
pub use fs::{DirectoryListing, Entry, EntryKind, HostFs, LocalFs};
pub use nav::confirm::{Confirmation, Confirmed};
pub use nav::filter::{FilterOptions, Filtered, Row};
pub use nav::query::{FetchOutcome, FetchRequest, QueryState, Snapshot};
pub use picker::Picker;

/// Normalises a string to NFC (composed) form.
///
/// macOS stores filenames in NFD (decomposed), so the same name can arrive
/// with different byte sequences. Entry names are re-composed before display
/// and matching.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}
