//! Driver management screen.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use fleetdeck_core::columns::col;
use fleetdeck_core::{FieldDescriptor, FieldValue, PartitionSpec, ScreenSpec, StatusDef, TableRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverStatus {
    Available,
    Deactive,
    Blacklist,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Available => "available",
            DriverStatus::Deactive => "deactive",
            DriverStatus::Blacklist => "blacklist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(DriverStatus::Available),
            "deactive" => Some(DriverStatus::Deactive),
            "blacklist" => Some(DriverStatus::Blacklist),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(default)]
    pub driver_id: String,
    /// Full display name; absent upstream records carry first/last instead.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    pub status: DriverStatus,
}

impl Driver {
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(n) if !n.trim().is_empty() => n.clone(),
            _ => {
                let first = self.first_name.as_deref().unwrap_or("");
                let last = self.last_name.as_deref().unwrap_or("");
                format!("{} {}", first, last).trim().to_string()
            }
        }
    }
}

impl TableRow for Driver {
    fn id(&self) -> &str {
        &self.driver_id
    }

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "driverId" => FieldValue::text(&self.driver_id),
            "name" => FieldValue::text(self.display_name()),
            "contactNumber" => match &self.contact_number {
                Some(c) => FieldValue::text(c),
                None => FieldValue::Missing,
            },
            "status" => FieldValue::text(self.status.as_str()),
            _ => FieldValue::Missing,
        }
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

pub const COLUMNS: &[FieldDescriptor] = &[
    col("sno", "S.No", false),
    col("driverId", "Driver ID", true),
    col("name", "Name", true),
    col("contactNumber", "Contact", true),
    col("status", "Status", true),
    col("action", "Action", false),
];

pub const PARTITIONS: &[PartitionSpec] = &[
    PartitionSpec::unfiltered("total"),
    PartitionSpec::filtered("available", "available"),
    PartitionSpec::filtered("blacklisted", "blacklist"),
    PartitionSpec::filtered("deactivated", "deactive"),
];

pub const STATUSES: &[StatusDef] = &[
    StatusDef { value: "available", label: "Active" },
    StatusDef { value: "deactive", label: "Inactive" },
    StatusDef { value: "blacklist", label: "Blacklisted" },
];

pub const SCREEN: ScreenSpec = ScreenSpec {
    title: "Driver Management",
    noun: "drivers",
    columns: COLUMNS,
    searchable: &["driverId", "name", "contactNumber"],
    partitions: PARTITIONS,
    statuses: STATUSES,
    default_partition: "total",
    default_sort_key: "name",
    default_page_size: 5,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_first_last() {
        let d = Driver {
            driver_id: "DRV1".into(),
            name: None,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            contact_number: None,
            status: DriverStatus::Available,
        };
        assert_eq!(d.display_name(), "Ada Lovelace");
        assert_eq!(d.field("name").render(), "Ada Lovelace");
    }

    #[test]
    fn wire_values_round_trip() {
        let j = serde_json::json!({
            "driverId": "DRV9",
            "name": "Sam",
            "contactNumber": "555-0101",
            "status": "blacklist"
        });
        let d: Driver = serde_json::from_value(j).unwrap();
        assert_eq!(d.status, DriverStatus::Blacklist);
        assert_eq!(d.status(), Some("blacklist"));
        assert_eq!(DriverStatus::parse("deactive"), Some(DriverStatus::Deactive));
        assert_eq!(DriverStatus::parse("gone"), None);
    }

    #[test]
    fn screen_defaults_name_declared_entries() {
        assert!(SCREEN.partition(SCREEN.default_partition).is_some());
        assert!(SCREEN.is_sortable(SCREEN.default_sort_key));
        assert!(!SCREEN.is_sortable("action"));
    }
}
