//! Substring search over the configured searchable fields.

#![forbid(unsafe_code)]

use fleetdeck_core::TableRow;

/// Positions of rows matching the search term.
///
/// Case-insensitive, unanchored, single term; a row matches when any
/// searchable field's rendered text contains the lowercased term. An empty
/// term matches every row.
pub fn filter_indices<R: TableRow>(rows: &[R], term: &str, fields: &[&str]) -> Vec<usize> {
    if term.is_empty() {
        return (0..rows.len()).collect();
    }
    let needle = term.to_lowercase();
    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let hit = fields
            .iter()
            .any(|key| row.field(key).render().to_lowercase().contains(&needle));
        if hit {
            out.push(i);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdeck_core::FieldValue;

    #[derive(Clone)]
    struct Cust {
        id: &'static str,
        name: &'static str,
    }

    impl TableRow for Cust {
        fn id(&self) -> &str {
            self.id
        }
        fn field(&self, key: &str) -> FieldValue {
            match key {
                "customerId" => FieldValue::text(self.id),
                "name" => FieldValue::text(self.name),
                _ => FieldValue::Missing,
            }
        }
    }

    const ROWS: &[Cust] = &[
        Cust { id: "CUST1", name: "Alice" },
        Cust { id: "CUST2", name: "Bob" },
    ];
    const FIELDS: &[&str] = &["customerId", "name"];

    #[test]
    fn empty_term_matches_all_in_order() {
        assert_eq!(filter_indices(ROWS, "", FIELDS), vec![0, 1]);
    }

    #[test]
    fn term_is_case_insensitive_and_unanchored() {
        assert_eq!(filter_indices(ROWS, "cust1", FIELDS), vec![0]);
        assert_eq!(filter_indices(ROWS, "LIC", FIELDS), vec![0]);
        assert_eq!(filter_indices(ROWS, "cust", FIELDS), vec![0, 1]);
    }

    #[test]
    fn non_searchable_fields_do_not_match() {
        assert!(filter_indices(ROWS, "alice", &["customerId"]).is_empty());
    }
}
