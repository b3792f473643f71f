//! Customer management screen.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use fleetdeck_core::columns::col;
use fleetdeck_core::{FieldDescriptor, FieldValue, PartitionSpec, ScreenSpec, StatusDef, TableRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Blacklist,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Blacklist => "blacklist",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact_number: Option<String>,
    pub status: CustomerStatus,
}

impl TableRow for Customer {
    fn id(&self) -> &str {
        &self.customer_id
    }

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "customerId" => FieldValue::text(&self.customer_id),
            "name" => FieldValue::text(&self.name),
            "contact" => match &self.contact_number {
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
    col("index", "S. No", false),
    col("customerId", "Customer ID", true),
    col("name", "Name", true),
    col("contact", "Contact", false),
    col("actions", "Actions", false),
];

pub const PARTITIONS: &[PartitionSpec] = &[
    PartitionSpec::filtered("active", "active"),
    PartitionSpec::filtered("blacklisted", "blacklist"),
];

pub const STATUSES: &[StatusDef] = &[
    StatusDef { value: "active", label: "Active" },
    StatusDef { value: "blacklist", label: "Blacklisted" },
];

pub const SCREEN: ScreenSpec = ScreenSpec {
    title: "Customer Management",
    noun: "customers",
    columns: COLUMNS,
    searchable: &["customerId", "name"],
    partitions: PARTITIONS,
    statuses: STATUSES,
    default_partition: "active",
    default_sort_key: "name",
    default_page_size: 5,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_is_displayable_but_not_sortable() {
        assert!(SCREEN.column("contact").is_some());
        assert!(!SCREEN.is_sortable("contact"));
    }

    #[test]
    fn both_partitions_are_status_filtered() {
        for p in PARTITIONS {
            assert!(p.status.is_some());
        }
    }
}
