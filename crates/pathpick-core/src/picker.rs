//! Async driver that connects a [`QueryState`] to a host.
//!
//! The picker runs directory listings on Tokio's blocking pool and receives
//! their results on an unbounded channel, so no keystroke ever waits on
//! disk I/O. Host-facing outcomes go out as [`Event`]s. Every state change
//! is published as a [`Snapshot`] on a `watch` channel.
//!
//! A host loop usually looks like:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = commands.recv() => picker.handle(cmd)?,
//!         _ = picker.next_fetch() => {}
//!     }
//! }
//! ```
//!
//! Every method that may start a listing must be called from within a Tokio
//! runtime.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;

use crate::config::settings::Config;
use crate::error::CoreResult;
use crate::event::{Command, Event};
use crate::fs::fetch::fetch_directory;
use crate::fs::host::HostFs;
use crate::nav::confirm::{self, Confirmed};
use crate::nav::query::{FetchOutcome, FetchRequest, QueryState, Snapshot};
use crate::nav::resolve::SEP;

pub struct Picker {
    state: QueryState,
    host: Arc<dyn HostFs>,
    events: UnboundedSender<Event>,
    snapshots: watch::Sender<Snapshot>,
    fetch_tx: UnboundedSender<FetchOutcome>,
    fetch_rx: UnboundedReceiver<FetchOutcome>,
}

impl Picker {
    /// Creates an idle picker based at the process's working directory.
    /// Nothing is listed until [`Picker::open`] or a query arrives.
    pub fn new(host: Arc<dyn HostFs>, config: &Config, events: UnboundedSender<Event>) -> Self {
        let mut state = QueryState::new(host.home_dir(), config.filter_options());
        let cwd = current_dir();
        state.set_base_path(&cwd, &cwd);
        let (snapshots, _) = watch::channel(state.snapshot());
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        Self {
            state,
            host,
            events,
            snapshots,
            fetch_tx,
            fetch_rx,
        }
    }

    /// A receiver that always holds the latest [`Snapshot`].
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Attaches the picker to `base` and lists it.
    pub fn open(&mut self, base: &str) {
        self.state.set_base_path(base, &current_dir());
        let base = self.state.base_path().to_string();
        let request = self.state.move_directory(&base);
        self.spawn_fetch(request);
        self.publish();
    }

    /// Changes the base for relative queries without listing anything.
    pub fn set_base_path(&mut self, base: &str) {
        self.state.set_base_path(base, &current_dir());
    }

    pub fn set_query(&mut self, query: &str) {
        if let Some(request) = self.state.set_query(query, self.host.as_ref()) {
            self.spawn_fetch(request);
        }
        self.publish();
    }

    pub fn move_directory(&mut self, target: &str) {
        let request = self.state.move_directory(target);
        self.spawn_fetch(request);
        self.publish();
    }

    pub fn move_up_directory(&mut self) {
        if let Some(request) = self.state.move_up_directory(self.host.as_ref()) {
            self.spawn_fetch(request);
        }
        self.publish();
    }

    /// Confirms the selected row.
    ///
    /// Emits [`Event::ConfirmFile`] for files (creating the containing
    /// directory first when the file is new) and navigates into directories.
    ///
    /// # Errors
    ///
    /// - [`CoreError::CreateDirectory`](crate::error::CoreError::CreateDirectory)
    ///   if a directory could not be created. The state is unchanged.
    pub fn confirm(&mut self) -> CoreResult<()> {
        let confirmed = confirm::confirm(&mut self.state, self.host.as_ref())
            .inspect_err(|e| tracing::warn!("confirm failed: {e}"))?;
        match confirmed {
            Confirmed::File(path) => {
                tracing::debug!("confirmed {}", path.display());
                self.emit(Event::ConfirmFile(path));
            }
            Confirmed::Navigate(request) => self.spawn_fetch(request),
            Confirmed::Nothing => {}
        }
        self.publish();
        Ok(())
    }

    /// Selects row `index` and confirms it.
    pub fn confirm_index(&mut self, index: usize) -> CoreResult<()> {
        self.state.select_index(index);
        self.confirm()
    }

    pub fn request_add_root(&self) {
        if let Some(path) = confirm::root_target(&self.state) {
            self.emit(Event::RequestAddRoot(path));
        }
    }

    pub fn request_remove_root(&self) {
        if let Some(path) = confirm::root_target(&self.state) {
            self.emit(Event::RequestRemoveRoot(path));
        }
    }

    pub fn cancel(&self) {
        self.emit(Event::Cancel);
    }

    /// Dispatches one host command.
    pub fn handle(&mut self, command: Command) -> CoreResult<()> {
        tracing::trace!("command {command:?}");
        match command {
            Command::SetQuery(query) => self.set_query(&query),
            Command::MoveDirectory(target) => self.move_directory(&target),
            Command::MoveUpDirectory => self.move_up_directory(),
            Command::SelectNext => self.select_with(QueryState::select_next),
            Command::SelectPrevious => self.select_with(QueryState::select_previous),
            Command::SelectFirst => self.select_with(QueryState::select_first),
            Command::SelectLast => self.select_with(QueryState::select_last),
            Command::SelectIndex(index) => self.select_with(|s| s.select_index(index)),
            Command::Confirm => self.confirm()?,
            Command::ConfirmIndex(index) => self.confirm_index(index)?,
            Command::AddRoot => self.request_add_root(),
            Command::RemoveRoot => self.request_remove_root(),
            Command::Cancel => self.cancel(),
        }
        Ok(())
    }

    /// Waits for the next completed listing and applies it.
    ///
    /// Returns `false` if the listing was stale and dropped.
    pub async fn next_fetch(&mut self) -> bool {
        let Some(outcome) = self.fetch_rx.recv().await else {
            return false;
        };
        let applied = self.state.apply_fetch(outcome);
        if applied {
            self.publish();
        }
        applied
    }

    /// Waits until the listing for the current query has been applied.
    pub async fn settle(&mut self) {
        while self.state.is_fetching() {
            self.next_fetch().await;
        }
    }

    fn select_with(&mut self, f: impl FnOnce(&mut QueryState)) {
        f(&mut self.state);
        self.publish();
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let host = Arc::clone(&self.host);
        let tx = self.fetch_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = fetch_directory(host.as_ref(), &request.dir);
            let _ = tx.send(FetchOutcome {
                generation: request.generation,
                dir: request.dir,
                result,
            });
        });
    }

    fn emit(&self, event: Event) {
        let _ = self.events.send(event);
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.snapshot());
    }
}

fn current_dir() -> String {
    std::env::current_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| SEP.to_string())
}
