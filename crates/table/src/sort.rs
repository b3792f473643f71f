//! Stable multi-direction sorting over row indices.

#![forbid(unsafe_code)]

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use fleetdeck_core::TableRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn is_asc(self) -> bool {
        matches!(self, SortDirection::Asc)
    }
}

/// Order `indices` (positions into `rows`) by the given field.
///
/// Descending is the negated ascending comparator, not a separate algorithm.
/// Ties always break by original position ascending, so equal-key rows keep
/// their input order in both directions.
pub fn sort_indices<R: TableRow>(
    rows: &[R],
    mut indices: Vec<usize>,
    key: &str,
    dir: SortDirection,
) -> Vec<usize> {
    indices.sort_by(|&a, &b| {
        let ord = compare_rows(&rows[a], &rows[b], key, dir);
        ord.then(a.cmp(&b))
    });
    indices
}

fn compare_rows<R: TableRow>(a: &R, b: &R, key: &str, dir: SortDirection) -> Ordering {
    let ord = a.field(key).cmp_natural(&b.field(key));
    match dir {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdeck_core::FieldValue;

    #[derive(Clone)]
    struct Row {
        id: &'static str,
        name: &'static str,
    }

    impl TableRow for Row {
        fn id(&self) -> &str {
            self.id
        }
        fn field(&self, key: &str) -> FieldValue {
            match key {
                "name" => FieldValue::text(self.name),
                _ => FieldValue::Missing,
            }
        }
    }

    const ROWS: &[Row] = &[
        Row { id: "1", name: "carol" },
        Row { id: "2", name: "alice" },
        Row { id: "3", name: "bob" },
        Row { id: "4", name: "alice" },
    ];

    #[test]
    fn ascending_then_descending_reverses_unequal_keys() {
        let asc = sort_indices(ROWS, (0..ROWS.len()).collect(), "name", SortDirection::Asc);
        assert_eq!(asc, vec![1, 3, 2, 0]);
        let desc = sort_indices(ROWS, (0..ROWS.len()).collect(), "name", SortDirection::Desc);
        assert_eq!(desc, vec![0, 2, 1, 3]);
    }

    #[test]
    fn equal_keys_keep_input_order_in_both_directions() {
        let asc = sort_indices(ROWS, (0..ROWS.len()).collect(), "name", SortDirection::Asc);
        let desc = sort_indices(ROWS, (0..ROWS.len()).collect(), "name", SortDirection::Desc);
        // the two "alice" rows stay 1 before 3 either way
        let pos = |v: &[usize], i: usize| v.iter().position(|&x| x == i).unwrap();
        assert!(pos(&asc, 1) < pos(&asc, 3));
        assert!(pos(&desc, 1) < pos(&desc, 3));
    }

    #[test]
    fn missing_field_sorts_as_empty_string() {
        let rows = vec![
            Row { id: "1", name: "zed" },
            Row { id: "2", name: "" },
        ];
        let asc = sort_indices(&rows, vec![0, 1], "name", SortDirection::Asc);
        assert_eq!(asc, vec![1, 0]);
        // unknown key: everything equal, input order preserved
        let same = sort_indices(&rows, vec![0, 1], "nope", SortDirection::Desc);
        assert_eq!(same, vec![0, 1]);
    }
}
