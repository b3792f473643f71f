//! Fleetdeck backend façade.
//!
//! This crate defines the traits and types the frontends (CLI, controller)
//! depend on. The real backend lives elsewhere; implementations can be
//! in-process fixtures or remote services.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use fleetdeck_core::TableRow;

/// API errors suitable for transport over RPC later.
#[derive(Debug, thiserror::Error, Serialize, Deserialize)]
pub enum ApiError {
    #[error("load: {0}")]
    Load(String),
    #[error("write: {0}")]
    Write(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("not_found: {0}")]
    NotFound(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Outcome of a write as reported by the backend. Callers branch on this
/// alone; no structured error payload is assumed beyond presence/absence of
/// success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteOutcome {
    Fulfilled,
    Rejected,
}

impl WriteOutcome {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, WriteOutcome::Fulfilled)
    }
}

/// Per-domain list backend: partitioned reads plus id-keyed writes.
///
/// Partition names are the ones declared by the screen's
/// [`fleetdeck_core::ScreenSpec`]; asking for an unknown partition is a
/// `Validation` error.
#[async_trait::async_trait]
pub trait ListBackend<R: TableRow>: Send + Sync {
    /// Fetch the full record list of one partition.
    async fn fetch_list(&self, partition: &str) -> ApiResult<Vec<R>>;

    /// Fetch the record count of one partition.
    async fn fetch_count(&self, partition: &str) -> ApiResult<u64>;

    async fn create_record(&self, record: R) -> ApiResult<WriteOutcome>;

    async fn update_record(&self, id: &str, record: R) -> ApiResult<WriteOutcome>;

    async fn delete_record(&self, id: &str) -> ApiResult<WriteOutcome>;

    /// Move a record to a new status (drives partition membership).
    async fn update_status(&self, id: &str, status: &str) -> ApiResult<WriteOutcome>;
}
