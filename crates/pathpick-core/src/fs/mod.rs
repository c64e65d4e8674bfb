//! File system access for the picker.
//!
//! [`host::HostFs`] is the boundary to the outside world, [`entry::Entry`]
//! describes one listed child, and [`fetch::fetch_directory`] turns a
//! directory into a [`fetch::DirectoryListing`].

pub mod entry;
pub mod fetch;
pub mod host;

pub use entry::{Entry, EntryKind};
pub use fetch::DirectoryListing;
pub use host::{HostFs, LocalFs};
