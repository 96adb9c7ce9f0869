//! Filter engine: narrows the record set by per-column term selections.
//!
//! Each user interaction produces a [`FilterSelection`] which is applied in
//! one pass against the startup-loaded [`RecordTable`]. Columns compose by
//! intersection, so application order never changes the result, and an empty
//! selection for a column means "no restriction". An empty result is a
//! normal outcome (`count == 0`), not an error.

use std::collections::{BTreeMap, HashSet};

use anyhow::{Result, anyhow};
use serde_json::{Value, json};

use crate::{
    dictionary::Dictionary,
    records::{Record, RecordTable},
};

/// Column name → selected raw terms. Empty term lists are allowed and mean
/// the column is unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selections: BTreeMap<String, Vec<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select<I, S>(mut self, column: &str, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections
            .insert(column.to_string(), terms.into_iter().map(Into::into).collect());
        self
    }

    /// Columns that actually restrict the record set.
    pub fn restricted(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.selections
            .iter()
            .filter(|(_, terms)| !terms.is_empty())
            .map(|(column, terms)| (column.as_str(), terms.as_slice()))
    }

    pub fn is_unrestricted(&self) -> bool {
        self.restricted().next().is_none()
    }
}

/// Parses CLI `--select "Column=TermA,TermB"` directives into a selection.
pub fn parse_selection(directives: &[String], dictionary: &Dictionary) -> Result<FilterSelection> {
    let mut selection = FilterSelection::new();
    for directive in directives {
        let (column, terms) = directive
            .split_once('=')
            .ok_or_else(|| anyhow!("Selection '{directive}' must look like 'Column=TermA,TermB'"))?;
        let column = column.trim();
        if dictionary.descriptor(column).is_none() {
            return Err(anyhow!("Unknown filter column '{column}'"));
        }
        let terms: Vec<String> = terms
            .split(',')
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty())
            .collect();
        selection = selection.select(column, terms);
    }
    Ok(selection)
}

/// The filtered view handed to the presentation layer: row count, the full
/// identifier list for cross-referencing the detail table, column names, and
/// the surviving rows (borrowed; the base table is never mutated).
#[derive(Debug, Clone)]
pub struct FilterResult<'a> {
    pub count: usize,
    pub id_list: Vec<u32>,
    pub columns: Vec<String>,
    pub id_column: String,
    pub rows: Vec<&'a Record>,
}

impl FilterResult<'_> {
    /// Zero matches: surfaced as a "no matching records" message upstream.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// JSON payload for the dashboard's client-side data store.
    pub fn to_store_json(&self) -> Value {
        json!({
            "count": self.count,
            "id_list": self.id_list,
            "columns": self.columns,
            "data": self
                .rows
                .iter()
                .map(|record| record.to_json(&self.id_column))
                .collect::<Vec<_>>(),
        })
    }
}

/// Applies a selection to the base table. Per restricted column: rows with a
/// missing value are dropped, then multi-valued columns keep rows whose term
/// list overlaps the selected set while scalar columns keep rows whose value
/// is a member of it.
pub fn apply<'a>(
    table: &'a RecordTable,
    dictionary: &Dictionary,
    selection: &FilterSelection,
) -> FilterResult<'a> {
    let mut rows: Vec<&Record> = table.records.iter().collect();

    for (column, terms) in selection.restricted() {
        if !table.columns.iter().any(|c| c == column) {
            continue;
        }
        let selected: HashSet<&str> = terms.iter().map(String::as_str).collect();
        let multi_valued = dictionary.is_multi_valued(column);
        rows.retain(|record| match record.field(column) {
            None => false,
            Some(field) if field.is_missing() => false,
            Some(field) => {
                if multi_valued {
                    field
                        .terms()
                        .is_some_and(|terms| terms.iter().any(|t| selected.contains(t.as_str())))
                } else {
                    field.scalar().is_some_and(|value| selected.contains(value))
                }
            }
        });
    }

    FilterResult {
        count: rows.len(),
        id_list: rows.iter().map(|record| record.id).collect(),
        columns: table.columns.clone(),
        id_column: table.id_column.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Field;
    use std::collections::BTreeMap;

    fn record(id: u32, sectors: &[&str], city: Option<&str>) -> Record {
        let mut fields = BTreeMap::new();
        fields.insert(
            "Sector".to_string(),
            Field::Terms(sectors.iter().map(|s| s.to_string()).collect()),
        );
        fields.insert(
            "City".to_string(),
            Field::Scalar(city.map(|c| c.to_string())),
        );
        Record { id, fields }
    }

    fn table() -> RecordTable {
        RecordTable {
            id_column: "orgID".to_string(),
            columns: vec!["Sector".to_string(), "City".to_string()],
            records: vec![
                record(1, &["a", "b"], Some("Austin")),
                record(2, &["a"], Some("Dallas")),
                record(3, &["c"], None),
            ],
        }
    }

    fn dictionary() -> Dictionary {
        use crate::sheets::SheetGrid;
        let columns = SheetGrid::new(
            vec![
                "table_name".into(),
                "column_name".into(),
                "display_name".into(),
                "multiple_values".into(),
                "directory_column_order".into(),
            ],
            vec![
                vec!["Organizations".into(), "Sector".into(), "Sector".into(), "Yes".into(), "1".into()],
                vec!["Organizations".into(), "City".into(), "City".into(), "No".into(), "2".into()],
            ],
        );
        let terms = SheetGrid::new(
            vec!["table_name".into(), "column_name".into(), "term".into()],
            vec![],
        );
        Dictionary::load(
            &columns,
            &terms,
            "Organizations",
            &["Sector".to_string(), "City".to_string()],
        )
        .expect("dictionary")
    }

    #[test]
    fn empty_selection_returns_everything() {
        let table = table();
        let result = apply(&table, &dictionary(), &FilterSelection::new());
        assert_eq!(result.count, 3);
        assert_eq!(result.id_list, vec![1, 2, 3]);
    }

    #[test]
    fn empty_term_list_means_no_restriction() {
        let table = table();
        let selection = FilterSelection::new().select("City", Vec::<String>::new());
        assert!(selection.is_unrestricted());
        let result = apply(&table, &dictionary(), &selection);
        assert_eq!(result.count, 3);
    }

    #[test]
    fn multi_valued_columns_match_by_overlap() {
        let table = table();
        let selection = FilterSelection::new().select("Sector", ["b", "c"]);
        let result = apply(&table, &dictionary(), &selection);
        assert_eq!(result.id_list, vec![1, 3]);

        let selection = FilterSelection::new().select("Sector", ["d"]);
        assert!(apply(&table, &dictionary(), &selection).is_empty());
    }

    #[test]
    fn scalar_columns_match_by_membership_and_drop_missing() {
        let table = table();
        let selection = FilterSelection::new().select("City", ["Austin", "Dallas"]);
        let result = apply(&table, &dictionary(), &selection);
        // Record 3 has no city and is dropped before matching.
        assert_eq!(result.id_list, vec![1, 2]);
    }

    #[test]
    fn filters_compose_by_intersection() {
        let table = table();
        let dict = dictionary();
        let both = FilterSelection::new()
            .select("Sector", ["a"])
            .select("City", ["Austin"]);
        let result = apply(&table, &dict, &both);
        assert_eq!(result.id_list, vec![1]);
    }

    #[test]
    fn store_payload_carries_count_ids_and_rows() {
        let table = table();
        let result = apply(&table, &dictionary(), &FilterSelection::new());
        let payload = result.to_store_json();
        assert_eq!(payload["count"], 3);
        assert_eq!(payload["id_list"][2], 3);
        assert_eq!(payload["data"][0]["City"], "Austin");
        assert_eq!(payload["data"][2]["City"], Value::Null);
    }

    #[test]
    fn parse_selection_validates_columns() {
        let dict = dictionary();
        let parsed =
            parse_selection(&["Sector=a, b".to_string()], &dict).expect("parse selection");
        let restricted: Vec<_> = parsed.restricted().collect();
        assert_eq!(
            restricted,
            vec![("Sector", &["a".to_string(), "b".to_string()][..])]
        );

        assert!(parse_selection(&["Nope=a".to_string()], &dict).is_err());
        assert!(parse_selection(&["Sector".to_string()], &dict).is_err());
    }
}
