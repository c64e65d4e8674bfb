//! The query state machine.
//!
//! [`QueryState`] owns the live query, the cached [`DirectoryListing`], the
//! derived rows and the selection. It never performs directory I/O itself:
//! transitions that need a listing return a [`FetchRequest`], and the caller
//! hands the result back through [`QueryState::apply_fetch`].
//!
//! Every `set_query`/`move_directory` call bumps a generation counter. A
//! request carries the generation that issued it, and its outcome is applied
//! only while the state is still waiting on that generation. Anything else is
//! stale and is dropped, so a slow listing can never overwrite the result of
//! a later query.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::fs::fetch::DirectoryListing;
use crate::fs::host::HostFs;
use crate::nav::filter::{filter, FilterOptions, Row};
use crate::nav::resolve::{
    containing_directory, directory_shaped, is_directory_path, is_valid_query, resolve_query, SEP,
};

/// A directory listing the state is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    /// Directory-shaped absolute path to list.
    pub dir: String,
}

/// The completed result of a [`FetchRequest`].
#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    pub dir: String,
    pub result: CoreResult<DirectoryListing>,
}

/// Immutable view of the state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// The query text as the input field should show it.
    pub query: String,
    /// Absolute path the query denotes. Empty while the query is not valid.
    pub resolved_path: String,
    pub rows: Vec<Row>,
    pub selection_index: usize,
    pub error: Option<String>,
    /// `true` while a listing for the current query is outstanding.
    pub loading: bool,
}

/// State of one picker session.
#[derive(Debug)]
pub struct QueryState {
    raw_query: String,
    base_path: String,
    resolved_path: String,
    listing: Option<DirectoryListing>,
    rows: Vec<Row>,
    selection_index: usize,
    last_error: Option<Arc<CoreError>>,
    generation: u64,
    awaiting: Option<u64>,
    home: Option<PathBuf>,
    options: FilterOptions,
}

impl QueryState {
    /// Creates an idle state: empty query, empty base path, no listing.
    pub fn new(home: Option<PathBuf>, options: FilterOptions) -> Self {
        Self {
            raw_query: String::new(),
            base_path: String::new(),
            resolved_path: String::new(),
            listing: None,
            rows: Vec::new(),
            selection_index: 0,
            last_error: None,
            generation: 0,
            awaiting: None,
            home,
            options,
        }
    }

    /// Stores `path`, resolved against `cwd` and made directory-shaped, as the
    /// base for relative queries. Does not fetch anything.
    pub fn set_base_path(&mut self, path: &str, cwd: &str) {
        let resolved = resolve_query(path, cwd, self.home.as_deref());
        self.base_path = directory_shaped(resolved);
    }

    /// Applies a new query string.
    ///
    /// Returns a request when the query's containing directory changed and
    /// must be listed; `None` when the cached listing was reused, the query
    /// is unchanged, or it is not valid yet.
    pub fn set_query(&mut self, raw: &str, host: &dyn HostFs) -> Option<FetchRequest> {
        if raw == self.raw_query {
            return None;
        }

        if !is_valid_query(raw, host) {
            self.generation += 1;
            self.raw_query = raw.to_string();
            self.resolved_path.clear();
            self.listing = None;
            self.rows.clear();
            self.selection_index = 0;
            self.last_error = None;
            self.awaiting = None;
            return None;
        }

        if is_directory_path(raw) {
            return Some(self.move_directory(raw));
        }

        self.generation += 1;
        let resolved = resolve_query(raw, &self.base_path, self.home.as_deref());
        let previous_dir = self.current_dir();
        let next_dir = containing_directory(&resolved);

        self.raw_query = raw.to_string();
        self.resolved_path = resolved;
        self.selection_index = 0;

        if previous_dir.as_deref() == Some(next_dir.as_str()) {
            self.refilter();
            return None;
        }

        Some(self.begin_fetch(next_dir))
    }

    /// Navigates to `target`. Directory navigation always lists afresh.
    ///
    /// The query text becomes the resolved, directory-shaped path.
    pub fn move_directory(&mut self, target: &str) -> FetchRequest {
        self.generation += 1;
        let resolved = directory_shaped(resolve_query(
            target,
            &self.base_path,
            self.home.as_deref(),
        ));
        self.raw_query = resolved.clone();
        self.resolved_path = resolved.clone();
        self.selection_index = 0;
        self.begin_fetch(resolved)
    }

    /// Navigates to the parent of the directory currently being completed.
    pub fn move_up_directory(&mut self, host: &dyn HostFs) -> Option<FetchRequest> {
        let dir = self
            .current_dir()
            .unwrap_or_else(|| self.base_path.clone());
        self.set_query(&format!("{dir}..{SEP}"), host)
    }

    /// Applies a completed listing if it is the one the state waits for.
    ///
    /// Returns `false` when the outcome was stale and dropped.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> bool {
        if self.awaiting != Some(outcome.generation) {
            tracing::debug!(
                "dropping stale listing of {} (generation {}, current {})",
                outcome.dir,
                outcome.generation,
                self.generation
            );
            return false;
        }

        self.awaiting = None;
        match outcome.result {
            Ok(listing) => {
                tracing::debug!(
                    "applied listing of {} ({} entries, generation {})",
                    listing.dir(),
                    listing.entries().len(),
                    outcome.generation
                );
                self.listing = Some(listing);
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!("listing {} failed: {e}", outcome.dir);
                self.listing = None;
                self.last_error = Some(Arc::new(e));
            }
        }
        self.refilter();
        true
    }

    /// Moves the selection down, wrapping to the first row.
    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selection_index = (self.selection_index + 1) % self.rows.len();
    }

    /// Moves the selection up, wrapping to the last row.
    pub fn select_previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selection_index = match self.selection_index {
            0 => self.rows.len() - 1,
            n => n - 1,
        };
    }

    pub fn select_first(&mut self) {
        self.selection_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selection_index = self.rows.len().saturating_sub(1);
    }

    /// Selects `index`, clamped to the row set.
    pub fn select_index(&mut self, index: usize) {
        self.selection_index = index.min(self.rows.len().saturating_sub(1));
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.rows.get(self.selection_index)
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn resolved_path(&self) -> &str {
        &self.resolved_path
    }

    pub fn listing(&self) -> Option<&DirectoryListing> {
        self.listing.as_ref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn selection_index(&self) -> usize {
        self.selection_index
    }

    pub fn last_error(&self) -> Option<&CoreError> {
        self.last_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` while a listing for the current query is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            query: self.raw_query.clone(),
            resolved_path: self.resolved_path.clone(),
            rows: self.rows.clone(),
            selection_index: self.selection_index,
            error: self.last_error.as_ref().map(|e| e.to_string()),
            loading: self.is_fetching(),
        }
    }

    /// Containing directory of the current resolved path, if any.
    fn current_dir(&self) -> Option<String> {
        if self.resolved_path.is_empty() {
            None
        } else {
            Some(containing_directory(&self.resolved_path))
        }
    }

    fn begin_fetch(&mut self, dir: String) -> FetchRequest {
        self.listing = None;
        self.rows.clear();
        self.last_error = None;
        self.awaiting = Some(self.generation);
        tracing::debug!("listing {dir} (generation {})", self.generation);
        FetchRequest {
            generation: self.generation,
            dir,
        }
    }

    /// Rebuilds the rows and selects the best match for the query.
    fn refilter(&mut self) {
        let filtered = filter(self.listing.as_ref(), &self.resolved_path, &self.options);
        self.rows = filtered.rows;
        self.selection_index = filtered.best;
    }
}
