//! Fleetdeck tabular list controller.
//!
//! One `TableController` manages the view over one screen: which partition
//! is active, what the user searched for, how the table is sorted and which
//! page is shown. It owns no global state; the backend service and the
//! shared screen store are injected. Rendering is someone else's problem:
//! the controller exposes a derived [`TableView`] plus imperative handlers
//! and queues [`Notice`]s for whatever frontend drains them.
//!
//! Fetches are not cancelled when superseded; a late resolution may briefly
//! overwrite the current view. Snapshot epochs bound this: a snapshot older
//! than the one already adopted is ignored.

#![forbid(unsafe_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, info, warn};

use fleetdeck_api::{ApiResult, ListBackend, WriteOutcome};
use fleetdeck_core::{PartitionSpec, ScreenSpec, TableRow};
use fleetdeck_store::ScreenStore;

pub mod filter;
pub mod gate;
pub mod paging;
pub mod sort;

pub use gate::TransitionDecision;
pub use sort::SortDirection;

/// Ephemeral view parameters. Created with the screen's defaults on mount,
/// mutated by the handlers, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub search_term: String,
    pub sort_key: &'static str,
    pub sort_direction: SortDirection,
    pub page_index: usize,
    pub page_size: usize,
    pub partition: &'static str,
}

impl ViewState {
    fn defaults(spec: &ScreenSpec) -> Self {
        Self {
            search_term: String::new(),
            sort_key: spec.default_sort_key,
            sort_direction: SortDirection::Asc,
            page_index: 0,
            page_size: spec.default_page_size,
            partition: spec.default_partition,
        }
    }
}

/// Derived render model for one frame.
#[derive(Debug, Clone)]
pub struct TableView<R> {
    pub rows: Vec<R>,
    pub total_filtered: usize,
    pub empty_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub sort_key: &'static str,
    pub sort_direction: SortDirection,
    pub partition: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Transient user-facing message. Nothing here is fatal; every failure
/// degrades to a notice plus retry-by-user-action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

pub struct TableController<R: TableRow> {
    spec: ScreenSpec,
    backend: Arc<dyn ListBackend<R>>,
    store: Arc<ScreenStore<R>>,
    view: ViewState,
    /// Local working copy of the active partition, optimistic edits applied.
    rows: Vec<R>,
    /// Epoch of the store snapshot `rows` derives from; 0 = nothing adopted.
    rows_epoch: u64,
    notices: VecDeque<Notice>,
}

impl<R: TableRow> TableController<R> {
    pub fn new(
        spec: ScreenSpec,
        backend: Arc<dyn ListBackend<R>>,
        store: Arc<ScreenStore<R>>,
    ) -> Self {
        Self {
            view: ViewState::defaults(&spec),
            spec,
            backend,
            store,
            rows: Vec::new(),
            rows_epoch: 0,
            notices: VecDeque::new(),
        }
    }

    pub fn spec(&self) -> &ScreenSpec {
        &self.spec
    }

    pub fn state(&self) -> &ViewState {
        &self.view
    }

    pub fn active_partition(&self) -> &PartitionSpec {
        // partition names are validated before they enter the view state
        self.spec
            .partition(self.view.partition)
            .unwrap_or(&self.spec.partitions[0])
    }

    pub fn count(&self, partition: &str) -> u64 {
        self.store.count(partition).unwrap_or(0)
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn push_notice(&mut self, severity: Severity, message: impl Into<String>) {
        self.notices.push_back(Notice { severity, message: message.into() });
    }

    // ---- lifecycle ----

    /// Initial load: all partition counts concurrently, then the default
    /// partition's list. Failures surface as notices; prior (empty) state
    /// stays in place.
    pub async fn mount(&mut self) {
        info!(screen = %self.spec.title, "mounting list screen");
        let res = self.refresh_counts().await;
        if let Err(e) = res {
            warn!(screen = %self.spec.title, error = %e, "initial count load failed");
            self.push_notice(Severity::Error, "Failed to load initial data");
        }
        self.ensure_partition_loaded(true).await;
    }

    /// Adopt the store's snapshot for the active partition when it is newer
    /// than what the local copy derives from. Optimistic edits are discarded
    /// on adoption; the authoritative list wins.
    pub fn sync_from_store(&mut self) {
        let snap = self.store.list(self.view.partition);
        if let Some(snap) = snap {
            if snap.epoch > self.rows_epoch {
                self.rows = snap.rows.clone();
                self.rows_epoch = snap.epoch;
            }
        }
    }

    async fn ensure_partition_loaded(&mut self, force: bool) {
        let partition = self.view.partition;
        let cached = self.store.list(partition).is_some();
        if force || !cached {
            let res =
                fleetdeck_store::load_partition(&*self.backend, &self.store, partition).await;
            match res {
                Ok(snap) => {
                    debug!(partition, epoch = snap.epoch, rows = snap.rows.len(), "partition loaded")
                }
                Err(e) => {
                    warn!(partition, error = %e, "partition load failed");
                    self.push_notice(
                        Severity::Error,
                        format!("Failed to load {} records", partition),
                    );
                }
            }
        }
        self.sync_from_store();
    }

    // ---- handlers ----

    /// Column-header click: new sortable column sorts ascending, clicking
    /// the active column toggles direction. Unsortable columns are ignored.
    pub fn on_sort_click(&mut self, key: &str) {
        let Some(col) = self.spec.column(key).filter(|c| c.sortable) else {
            debug!(key, "ignoring sort on unsortable column");
            return;
        };
        if self.view.sort_key == col.key {
            self.view.sort_direction = self.view.sort_direction.toggle();
        } else {
            self.view.sort_key = col.key;
            self.view.sort_direction = SortDirection::Asc;
        }
    }

    pub fn on_page_change(&mut self, page: usize) {
        self.view.page_index = page;
    }

    pub fn on_page_size_change(&mut self, size: usize) {
        if size == 0 {
            return;
        }
        self.view.page_size = size;
        self.view.page_index = 0;
    }

    pub fn on_search_change(&mut self, term: &str) {
        self.view.search_term = term.to_string();
        self.view.page_index = 0;
    }

    /// Switch the active partition: resets page and search, loads the
    /// partition's list when the store has no snapshot for it yet.
    pub async fn select_partition(&mut self, name: &str) {
        let Some(part) = self.spec.partition(name) else {
            warn!(partition = %name, "unknown partition selected");
            return;
        };
        if self.view.partition != part.name {
            self.view.partition = part.name;
            self.view.page_index = 0;
            self.view.search_term.clear();
            self.rows.clear();
            self.rows_epoch = 0;
        }
        self.ensure_partition_loaded(false).await;
    }

    /// Force re-fetch of the active partition.
    pub async fn refresh(&mut self) {
        self.ensure_partition_loaded(true).await;
    }

    /// Refresh every partition count concurrently. Successes commit even
    /// when a sibling fetch fails; the failure still surfaces.
    pub async fn refresh_counts(&mut self) -> ApiResult<()> {
        fleetdeck_store::refresh_counts(&*self.backend, &self.store, &self.partition_names()).await
    }

    // ---- derived view ----

    /// Filter, sort and page the local rows. The page index is clamped so
    /// the window never runs more than one page past the filtered count.
    pub fn view(&self) -> TableView<R> {
        let searchable: Vec<&str> = self.spec.searchable.to_vec();
        let filtered = filter::filter_indices(&self.rows, &self.view.search_term, &searchable);
        let total_filtered = filtered.len();
        let sorted = sort::sort_indices(
            &self.rows,
            filtered,
            self.view.sort_key,
            self.view.sort_direction,
        );
        let w = paging::window(total_filtered, self.view.page_index, self.view.page_size);
        let rows = sorted[w.start..w.end].iter().map(|&i| self.rows[i].clone()).collect();
        TableView {
            rows,
            total_filtered,
            empty_rows: w.empty_rows,
            page: paging::clamp_page(total_filtered, self.view.page_index, self.view.page_size),
            page_size: self.view.page_size,
            sort_key: self.view.sort_key,
            sort_direction: self.view.sort_direction,
            partition: self.view.partition,
        }
    }

    /// Message for the empty table body.
    pub fn empty_state_message(&self) -> String {
        if !self.view.search_term.is_empty() {
            format!("No {} match your search", self.spec.noun)
        } else if self.active_partition().status.is_some() {
            format!("No {} {} found", self.view.partition, self.spec.noun)
        } else {
            format!("No {} found", self.spec.noun)
        }
    }

    // ---- status transitions ----

    /// Gate a requested transition without performing it.
    pub fn request_status_change(&self, id: &str, new_status: &str) -> Option<TransitionDecision> {
        let row = self.rows.iter().find(|r| r.id() == id)?;
        Some(gate::decide(row.status(), new_status, self.active_partition()))
    }

    /// Status values the action menu should offer: everything except the
    /// active partition's own defining status.
    pub fn status_options(&self) -> Vec<&'static fleetdeck_core::StatusDef> {
        let blocked = self.active_partition().status;
        self.spec
            .statuses
            .iter()
            .filter(|s| Some(s.value) != blocked)
            .collect()
    }

    /// Perform a confirmed status change. Re-gates first; only a
    /// `NeedsConfirmation` decision reaches the backend.
    ///
    /// On a fulfilled write the row is optimistically dropped from the local
    /// view when its new status no longer matches the active partition (the
    /// unfiltered partition keeps it), counts are recounted, and the active
    /// partition is re-fetched when the row should still appear in it.
    pub async fn confirm_status_change(&mut self, id: &str, new_status: &str) {
        match self.request_status_change(id, new_status) {
            None => {
                self.push_notice(Severity::Error, format!("No record selected: {}", id));
                return;
            }
            Some(TransitionDecision::NoOp) => {
                self.push_notice(
                    Severity::Info,
                    format!("Record is already {}", self.spec.status_label(new_status)),
                );
                return;
            }
            Some(TransitionDecision::PartitionBlocked) => {
                self.push_notice(
                    Severity::Info,
                    format!(
                        "Cannot set {} from the {} view",
                        self.spec.status_label(new_status),
                        self.view.partition
                    ),
                );
                return;
            }
            Some(TransitionDecision::NeedsConfirmation) => {}
        }

        info!(id, new_status, partition = %self.view.partition, "status change start");
        let res = self.backend.update_status(id, new_status).await;
        match res {
            Ok(WriteOutcome::Fulfilled) => {
                self.push_notice(
                    Severity::Success,
                    format!("Status changed to {}", self.spec.status_label(new_status)),
                );
                let retained = self.active_partition().retains(Some(new_status));
                if !retained {
                    // optimistic removal; reconciled by the next snapshot
                    self.rows.retain(|r| r.id() != id);
                }
                if let Err(e) = self.refresh_counts().await {
                    warn!(error = %e, "count refresh after status change failed");
                }
                if retained {
                    self.ensure_partition_loaded(true).await;
                }
            }
            Ok(WriteOutcome::Rejected) => {
                self.push_notice(Severity::Error, "Failed to update status. Please try again.");
            }
            Err(e) => {
                warn!(id, error = %e, "status change failed");
                self.push_notice(Severity::Error, "Error updating status. Please try again.");
            }
        }
    }

    /// Perform a confirmed delete, then recount and re-fetch.
    pub async fn delete_record(&mut self, id: &str) {
        info!(id, partition = %self.view.partition, "delete start");
        let res = self.backend.delete_record(id).await;
        match res {
            Ok(WriteOutcome::Fulfilled) => {
                self.push_notice(Severity::Success, "Record deleted successfully");
                if let Err(e) = self.refresh_counts().await {
                    warn!(error = %e, "count refresh after delete failed");
                }
                self.ensure_partition_loaded(true).await;
            }
            Ok(WriteOutcome::Rejected) => {
                self.push_notice(Severity::Error, "Failed to delete record. Please try again.");
            }
            Err(e) => {
                warn!(id, error = %e, "delete failed");
                self.push_notice(Severity::Error, "Error deleting record. Please try again.");
            }
        }
    }

    fn partition_names(&self) -> Vec<&'static str> {
        self.spec.partitions.iter().map(|p| p.name).collect()
    }
}
