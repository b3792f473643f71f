//! Fleetdeck core types: table rows, field values, partitions, list hygiene.

#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub mod columns;

pub use columns::{FieldDescriptor, ScreenSpec, StatusDef};

/// Rendered value of a single displayable/sortable field.
///
/// Ordering is the natural one for the variant: lexicographic for text,
/// numeric for numbers. A `Missing` field compares as the empty string, so
/// rows without a value group at the top of an ascending sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Missing,
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// Human-facing rendering; `Missing` renders empty.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Missing => String::new(),
        }
    }

    /// Natural comparison. Two numbers compare numerically; everything else
    /// falls back to the rendered text, so numeric-looking strings ("9" vs
    /// "10") compare lexicographically unless the field is a real `Number`.
    pub fn cmp_natural(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (a, b) => a.render().cmp(&b.render()),
        }
    }
}

/// A row a screen can list, sort and search. Implemented by the concrete
/// domain records (drivers, customers, bookings).
pub trait TableRow: Clone + Send + Sync + 'static {
    /// Unique identifier within a partition. Empty/whitespace ids mark the
    /// record as structurally invalid (see [`sanitize_records`]).
    fn id(&self) -> &str;

    /// Field lookup by descriptor key; unknown keys yield `Missing`.
    fn field(&self, key: &str) -> FieldValue;

    /// Status value driving partition membership, if the domain has one.
    fn status(&self) -> Option<&str> {
        None
    }
}

/// A named subset of records selected by status.
///
/// `status: None` marks the unfiltered partition ("all records"): it retains
/// rows regardless of status and has no defining status for the transition
/// gate to protect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSpec {
    pub name: &'static str,
    pub status: Option<&'static str>,
}

impl PartitionSpec {
    pub const fn filtered(name: &'static str, status: &'static str) -> Self {
        Self { name, status: Some(status) }
    }

    pub const fn unfiltered(name: &'static str) -> Self {
        Self { name, status: None }
    }

    /// Whether a row with the given status still belongs in this partition.
    pub fn retains(&self, status: Option<&str>) -> bool {
        match self.status {
            None => true,
            Some(want) => status == Some(want),
        }
    }
}

/// Outcome of cleaning one upstream list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized<R> {
    pub rows: Vec<R>,
    pub dropped_invalid: usize,
    pub dropped_duplicates: usize,
}

/// Validate and deduplicate a raw upstream list without mutating it.
///
/// Records with an empty (after trim) id are dropped; among records sharing
/// an id, the first occurrence wins and later ones are dropped. Input order
/// is otherwise preserved.
pub fn sanitize_records<R: TableRow>(raw: &[R]) -> Sanitized<R> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(raw.len());
    let mut out = Sanitized {
        rows: Vec::with_capacity(raw.len()),
        dropped_invalid: 0,
        dropped_duplicates: 0,
    };
    for r in raw {
        let id = r.id();
        if id.trim().is_empty() {
            out.dropped_invalid += 1;
            continue;
        }
        if !seen.insert(id) {
            out.dropped_duplicates += 1;
            continue;
        }
        out.rows.push(r.clone());
    }
    out
}

pub mod prelude {
    pub use super::{
        sanitize_records, FieldDescriptor, FieldValue, PartitionSpec, Sanitized, ScreenSpec,
        StatusDef, TableRow,
    };
}
