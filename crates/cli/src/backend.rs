//! JSON-fixture backend: one file stands in for the remote service.
//!
//! The file holds all three domains; reads filter in memory and writes
//! mutate the shared data, which `save` flushes back to disk. Business
//! rejections (unknown id) come back as `WriteOutcome::Rejected`, matching
//! the fulfilled/rejected-only write contract; malformed requests are
//! `ApiError`s.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use fleetdeck_api::{ApiError, ApiResult, ListBackend, WriteOutcome};
use fleetdeck_domain::booking::DateWindow;
use fleetdeck_domain::driver::DriverStatus;
use fleetdeck_domain::{booking, customer, driver, Booking, Customer, Driver};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

pub struct FixtureBackend {
    path: PathBuf,
    data: Mutex<FixtureData>,
    /// Date window applied to booking reads, when the query carries one.
    window: Option<DateWindow>,
}

impl FixtureBackend {
    pub fn load(path: &Path) -> anyhow::Result<Arc<Self>> {
        Self::build(path, None)
    }

    pub fn load_windowed(path: &Path, window: DateWindow) -> anyhow::Result<Arc<Self>> {
        Self::build(path, Some(window))
    }

    fn build(path: &Path, window: Option<DateWindow>) -> anyhow::Result<Arc<Self>> {
        let raw = std::fs::read_to_string(path)?;
        let data: FixtureData = serde_json::from_str(&raw)?;
        info!(
            path = %path.display(),
            drivers = data.drivers.len(),
            customers = data.customers.len(),
            bookings = data.bookings.len(),
            "fixture loaded"
        );
        Ok(Arc::new(Self { path: path.to_path_buf(), data: Mutex::new(data), window }))
    }

    pub async fn save(&self) -> anyhow::Result<()> {
        let data = self.data.lock().await;
        let raw = serde_json::to_string_pretty(&*data)?;
        std::fs::write(&self.path, raw)?;
        info!(path = %self.path.display(), "fixture saved");
        Ok(())
    }
}

fn driver_matches(partition: &str, d: &Driver) -> ApiResult<bool> {
    match driver::SCREEN.partition(partition) {
        Some(p) => Ok(p.retains(Some(d.status.as_str()))),
        None => Err(ApiError::Validation(format!("unknown driver partition: {partition}"))),
    }
}

#[async_trait::async_trait]
impl ListBackend<Driver> for FixtureBackend {
    async fn fetch_list(&self, partition: &str) -> ApiResult<Vec<Driver>> {
        let data = self.data.lock().await;
        let mut out = Vec::new();
        for d in &data.drivers {
            if driver_matches(partition, d)? {
                out.push(d.clone());
            }
        }
        Ok(out)
    }

    async fn fetch_count(&self, partition: &str) -> ApiResult<u64> {
        let data = self.data.lock().await;
        let mut n = 0;
        for d in &data.drivers {
            if driver_matches(partition, d)? {
                n += 1;
            }
        }
        Ok(n)
    }

    async fn create_record(&self, record: Driver) -> ApiResult<WriteOutcome> {
        let mut data = self.data.lock().await;
        if data.drivers.iter().any(|d| d.driver_id == record.driver_id) {
            return Ok(WriteOutcome::Rejected);
        }
        data.drivers.push(record);
        Ok(WriteOutcome::Fulfilled)
    }

    async fn update_record(&self, id: &str, record: Driver) -> ApiResult<WriteOutcome> {
        let mut data = self.data.lock().await;
        match data.drivers.iter_mut().find(|d| d.driver_id == id) {
            Some(slot) => {
                *slot = record;
                Ok(WriteOutcome::Fulfilled)
            }
            None => Ok(WriteOutcome::Rejected),
        }
    }

    async fn delete_record(&self, id: &str) -> ApiResult<WriteOutcome> {
        let mut data = self.data.lock().await;
        let before = data.drivers.len();
        data.drivers.retain(|d| d.driver_id != id);
        if data.drivers.len() == before {
            return Ok(WriteOutcome::Rejected);
        }
        Ok(WriteOutcome::Fulfilled)
    }

    async fn update_status(&self, id: &str, status: &str) -> ApiResult<WriteOutcome> {
        let parsed = DriverStatus::parse(status)
            .ok_or_else(|| ApiError::Validation(format!("unknown driver status: {status}")))?;
        let mut data = self.data.lock().await;
        match data.drivers.iter_mut().find(|d| d.driver_id == id) {
            Some(d) => {
                d.status = parsed;
                Ok(WriteOutcome::Fulfilled)
            }
            None => Ok(WriteOutcome::Rejected),
        }
    }
}

fn customer_matches(partition: &str, c: &Customer) -> ApiResult<bool> {
    match customer::SCREEN.partition(partition) {
        Some(p) => Ok(p.retains(Some(c.status.as_str()))),
        None => Err(ApiError::Validation(format!("unknown customer partition: {partition}"))),
    }
}

#[async_trait::async_trait]
impl ListBackend<Customer> for FixtureBackend {
    async fn fetch_list(&self, partition: &str) -> ApiResult<Vec<Customer>> {
        let data = self.data.lock().await;
        let mut out = Vec::new();
        for c in &data.customers {
            if customer_matches(partition, c)? {
                out.push(c.clone());
            }
        }
        Ok(out)
    }

    async fn fetch_count(&self, partition: &str) -> ApiResult<u64> {
        let data = self.data.lock().await;
        let mut n = 0;
        for c in &data.customers {
            if customer_matches(partition, c)? {
                n += 1;
            }
        }
        Ok(n)
    }

    async fn create_record(&self, record: Customer) -> ApiResult<WriteOutcome> {
        let mut data = self.data.lock().await;
        if data.customers.iter().any(|c| c.customer_id == record.customer_id) {
            return Ok(WriteOutcome::Rejected);
        }
        data.customers.push(record);
        Ok(WriteOutcome::Fulfilled)
    }

    async fn update_record(&self, id: &str, record: Customer) -> ApiResult<WriteOutcome> {
        let mut data = self.data.lock().await;
        match data.customers.iter_mut().find(|c| c.customer_id == id) {
            Some(slot) => {
                *slot = record;
                Ok(WriteOutcome::Fulfilled)
            }
            None => Ok(WriteOutcome::Rejected),
        }
    }

    async fn delete_record(&self, id: &str) -> ApiResult<WriteOutcome> {
        let mut data = self.data.lock().await;
        let before = data.customers.len();
        data.customers.retain(|c| c.customer_id != id);
        if data.customers.len() == before {
            return Ok(WriteOutcome::Rejected);
        }
        Ok(WriteOutcome::Fulfilled)
    }

    async fn update_status(&self, id: &str, status: &str) -> ApiResult<WriteOutcome> {
        let parsed = match status {
            "active" => customer::CustomerStatus::Active,
            "blacklist" => customer::CustomerStatus::Blacklist,
            other => {
                return Err(ApiError::Validation(format!("unknown customer status: {other}")))
            }
        };
        let mut data = self.data.lock().await;
        match data.customers.iter_mut().find(|c| c.customer_id == id) {
            Some(c) => {
                c.status = parsed;
                Ok(WriteOutcome::Fulfilled)
            }
            None => Ok(WriteOutcome::Rejected),
        }
    }
}

impl FixtureBackend {
    async fn windowed_bookings(&self, partition: &str) -> ApiResult<Vec<Booking>> {
        if booking::SCREEN.partition(partition).is_none() {
            return Err(ApiError::Validation(format!("unknown booking partition: {partition}")));
        }
        let data = self.data.lock().await;
        Ok(data
            .bookings
            .iter()
            .filter(|b| self.window.map(|w| w.contains(b.date)).unwrap_or(true))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl ListBackend<Booking> for FixtureBackend {
    async fn fetch_list(&self, partition: &str) -> ApiResult<Vec<Booking>> {
        self.windowed_bookings(partition).await
    }

    async fn fetch_count(&self, partition: &str) -> ApiResult<u64> {
        Ok(self.windowed_bookings(partition).await?.len() as u64)
    }

    async fn create_record(&self, record: Booking) -> ApiResult<WriteOutcome> {
        let mut data = self.data.lock().await;
        if data.bookings.iter().any(|b| b.id == record.id) {
            return Ok(WriteOutcome::Rejected);
        }
        data.bookings.push(record);
        Ok(WriteOutcome::Fulfilled)
    }

    async fn update_record(&self, id: &str, record: Booking) -> ApiResult<WriteOutcome> {
        let mut data = self.data.lock().await;
        match data.bookings.iter_mut().find(|b| b.id == id) {
            Some(slot) => {
                *slot = record;
                Ok(WriteOutcome::Fulfilled)
            }
            None => Ok(WriteOutcome::Rejected),
        }
    }

    async fn delete_record(&self, id: &str) -> ApiResult<WriteOutcome> {
        let mut data = self.data.lock().await;
        let before = data.bookings.len();
        data.bookings.retain(|b| b.id != id);
        if data.bookings.len() == before {
            return Ok(WriteOutcome::Rejected);
        }
        Ok(WriteOutcome::Fulfilled)
    }

    async fn update_status(&self, _id: &str, _status: &str) -> ApiResult<WriteOutcome> {
        Err(ApiError::Validation("bookings carry no status".into()))
    }
}
