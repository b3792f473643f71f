//! Column descriptors and per-screen configuration.
//!
//! A screen is described declaratively: which columns it shows, which field
//! keys participate in search, which partitions exist and what the view
//! defaults are. The controller consumes this; the domain crate provides one
//! `ScreenSpec` per screen.

use crate::PartitionSpec;

/// One displayable column. `sortable: false` marks presentation-only columns
/// (serial numbers, action menus) the controller must refuse to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

pub const fn col(key: &'static str, label: &'static str, sortable: bool) -> FieldDescriptor {
    FieldDescriptor { key, label, sortable }
}

/// One status a domain's records can carry, with its human-facing label
/// (e.g. wire value `deactive`, label `Inactive`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDef {
    pub value: &'static str,
    pub label: &'static str,
}

/// Static description of one list screen. Screens declare at least one
/// partition; the defaults below must name declared entries.
#[derive(Debug, Clone, Copy)]
pub struct ScreenSpec {
    pub title: &'static str,
    /// Plural noun for user-facing messages ("drivers", "customers").
    pub noun: &'static str,
    pub columns: &'static [FieldDescriptor],
    /// Field keys the substring search runs over.
    pub searchable: &'static [&'static str],
    pub partitions: &'static [PartitionSpec],
    /// Status enumeration, empty for domains without status transitions.
    pub statuses: &'static [StatusDef],
    pub default_partition: &'static str,
    pub default_sort_key: &'static str,
    pub default_page_size: usize,
}

impl ScreenSpec {
    pub fn partition(&self, name: &str) -> Option<&PartitionSpec> {
        self.partitions.iter().find(|p| p.name == name)
    }

    /// Label for a status value; unknown values echo back verbatim.
    pub fn status_label<'a>(&self, value: &'a str) -> &'a str {
        self.statuses
            .iter()
            .find(|s| s.value == value)
            .map(|s| s.label)
            .unwrap_or(value)
    }

    pub fn column(&self, key: &str) -> Option<&FieldDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn is_sortable(&self, key: &str) -> bool {
        self.column(key).map(|c| c.sortable).unwrap_or(false)
    }
}
