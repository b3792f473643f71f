//! Incoming booking (quotation) queries.
//!
//! Bookings are fetched for an inclusive date window rather than a status
//! partition; the screen declares a single `incoming` partition and the
//! window travels with the fetch. The plain-text report mirrors what the
//! screen's export produces.

#![forbid(unsafe_code)]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fleetdeck_core::columns::col;
use fleetdeck_core::{FieldDescriptor, FieldValue, PartitionSpec, ScreenSpec, TableRow};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub order_by: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub pickup: String,
    #[serde(default)]
    pub receiver: String,
    #[serde(default)]
    pub drop: String,
    #[serde(default)]
    pub contact: Option<String>,
}

impl TableRow for Booking {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "orderBy" => FieldValue::text(&self.order_by),
            "date" => FieldValue::text(self.date.format("%Y-%m-%d").to_string()),
            "sender" => FieldValue::text(&self.sender),
            "pickup" => FieldValue::text(&self.pickup),
            "receiver" => FieldValue::text(&self.receiver),
            "drop" => FieldValue::text(&self.drop),
            "contact" => match &self.contact {
                Some(c) => FieldValue::text(c),
                None => FieldValue::Missing,
            },
            _ => FieldValue::Missing,
        }
    }
}

/// Inclusive date window for a booking query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("Please select both start and end dates")]
    MissingBound,
}

impl DateWindow {
    /// Both bounds are required before a query may be issued.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, WindowError> {
        match (from, to) {
            (Some(from), Some(to)) => Ok(Self { from, to }),
            _ => Err(WindowError::MissingBound),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Plain-text booking report for an already-fetched window.
pub fn render_report(window: &DateWindow, rows: &[Booking]) -> String {
    let mut out = String::from("Booking Report\n");
    out.push_str(&format!(
        "Start Date: {}\nEnd Date: {}\n",
        window.from.format("%d/%m/%Y"),
        window.to.format("%d/%m/%Y")
    ));
    for (i, b) in rows.iter().enumerate() {
        out.push_str(&format!("{}. {} -> {} ({})\n", i + 1, b.sender, b.receiver, b.drop));
    }
    out
}

pub const COLUMNS: &[FieldDescriptor] = &[
    col("sno", "S.No", false),
    col("orderBy", "Order By", false),
    col("date", "Date", true),
    col("sender", "Sender Name", true),
    col("pickup", "Pick Up", false),
    col("receiver", "Receiver Name", true),
    col("drop", "Drop", false),
    col("contact", "Contact", false),
    col("action", "Action", false),
];

pub const PARTITIONS: &[PartitionSpec] = &[PartitionSpec::unfiltered("incoming")];

pub const SCREEN: ScreenSpec = ScreenSpec {
    title: "Booking Queries",
    noun: "bookings",
    columns: COLUMNS,
    searchable: &["sender", "receiver", "drop"],
    partitions: PARTITIONS,
    statuses: &[],
    default_partition: "incoming",
    default_sort_key: "date",
    default_page_size: 5,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn booking(sender: &str, receiver: &str, drop: &str) -> Booking {
        Booking {
            id: "Q1".into(),
            order_by: "web".into(),
            date: day(2),
            sender: sender.into(),
            pickup: "Depot".into(),
            receiver: receiver.into(),
            drop: drop.into(),
            contact: None,
        }
    }

    #[test]
    fn window_requires_both_bounds() {
        assert_eq!(DateWindow::new(Some(day(1)), None), Err(WindowError::MissingBound));
        assert_eq!(DateWindow::new(None, Some(day(1))), Err(WindowError::MissingBound));
        let w = DateWindow::new(Some(day(1)), Some(day(3))).unwrap();
        assert!(w.contains(day(2)));
        assert!(!w.contains(day(4)));
    }

    #[test]
    fn report_lines_match_export_format() {
        let w = DateWindow { from: day(1), to: day(3) };
        let text = render_report(&w, &[booking("Acme", "Bolt", "Pier 4")]);
        assert!(text.contains("Booking Report"));
        assert!(text.contains("Start Date: 01/06/2025"));
        assert!(text.contains("1. Acme -> Bolt (Pier 4)"));
    }
}
