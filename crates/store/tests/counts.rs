#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fleetdeck_api::{ApiError, ApiResult, ListBackend, WriteOutcome};
use fleetdeck_core::{FieldValue, TableRow};
use fleetdeck_store::{refresh_counts, ScreenStore};

#[derive(Clone)]
struct Item {
    id: String,
}

impl TableRow for Item {
    fn id(&self) -> &str {
        &self.id
    }
    fn field(&self, _key: &str) -> FieldValue {
        FieldValue::Missing
    }
}

/// Counts succeed everywhere except the partition named `fail`.
struct CountBackend {
    calls: AtomicU64,
}

#[async_trait::async_trait]
impl ListBackend<Item> for CountBackend {
    async fn fetch_list(&self, _partition: &str) -> ApiResult<Vec<Item>> {
        Ok(Vec::new())
    }

    async fn fetch_count(&self, partition: &str) -> ApiResult<u64> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match partition {
            "fail" => Err(ApiError::Load("count backend down".into())),
            "total" => Ok(40),
            "available" => Ok(25),
            "deactivated" => Ok(3),
            other => Err(ApiError::Validation(format!("unknown partition: {other}"))),
        }
    }

    async fn create_record(&self, _record: Item) -> ApiResult<WriteOutcome> {
        Ok(WriteOutcome::Rejected)
    }
    async fn update_record(&self, _id: &str, _record: Item) -> ApiResult<WriteOutcome> {
        Ok(WriteOutcome::Rejected)
    }
    async fn delete_record(&self, _id: &str) -> ApiResult<WriteOutcome> {
        Ok(WriteOutcome::Rejected)
    }
    async fn update_status(&self, _id: &str, _status: &str) -> ApiResult<WriteOutcome> {
        Ok(WriteOutcome::Rejected)
    }
}

#[tokio::test]
async fn failing_count_surfaces_but_siblings_still_commit() {
    let store = ScreenStore::<Item>::new();
    let backend = CountBackend { calls: AtomicU64::new(0) };

    let res =
        refresh_counts(&backend, &store, &["total", "available", "fail", "deactivated"]).await;
    assert!(res.is_err());

    // all four fetches were issued; the three successes are committed
    assert_eq!(backend.calls.load(Ordering::Relaxed), 4);
    assert_eq!(store.count("total"), Some(40));
    assert_eq!(store.count("available"), Some(25));
    assert_eq!(store.count("deactivated"), Some(3));
    assert_eq!(store.count("fail"), None);
}

#[tokio::test]
async fn successful_refresh_updates_previous_counts() {
    let store = ScreenStore::<Item>::new();
    store.commit_count("total", 1);
    let backend = CountBackend { calls: AtomicU64::new(0) };
    refresh_counts(&backend, &store, &["total"]).await.unwrap();
    assert_eq!(store.count("total"), Some(40));
}

#[test]
fn commit_list_cleans_input_and_bumps_epoch() {
    let store = ScreenStore::<Item>::new();
    let raw = vec![
        Item { id: "A".into() },
        Item { id: "A".into() },
        Item { id: "B".into() },
        Item { id: "".into() },
    ];
    let e1 = store.commit_list("total", &raw);
    let snap = store.list("total").unwrap();
    assert_eq!(snap.epoch, e1);
    let ids: Vec<&str> = snap.rows.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["A", "B"]);

    let e2 = store.commit_list("total", &raw[..1]);
    assert!(e2 > e1);
    assert_eq!(store.list("total").unwrap().rows.len(), 1);
    // other partitions are untouched
    assert!(store.list("available").is_none());
}

#[test]
fn shared_arc_readers_see_swapped_snapshots() {
    let store = Arc::new(ScreenStore::<Item>::new());
    let reader = Arc::clone(&store);
    store.commit_list("active", &[Item { id: "X".into() }]);
    assert_eq!(reader.list("active").unwrap().rows[0].id(), "X");
}
