//! Chart data shaping: turns a filtered record set into renderer-ready rows.
//!
//! The shaper explodes multi-valued term lists into long format, joins in
//! display terms from the dictionary, counts distinct records per display
//! term, and sorts. A column with nothing to count yields
//! [`ChartData::NoData`] so the presentation layer can draw a placeholder
//! instead of an empty chart.

use std::collections::BTreeSet;

use itertools::Itertools;
use serde::Serialize;
use serde_json::{Value, json};

use crate::{dictionary::Dictionary, filter::FilterResult, records::Field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRow {
    pub display_term: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartTable {
    pub column: String,
    pub display_name: String,
    pub rows: Vec<ChartRow>,
}

/// Shaped chart data, or the explicit no-data sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartData {
    NoData,
    Table(ChartTable),
}

impl ChartData {
    pub fn table(&self) -> Option<&ChartTable> {
        match self {
            ChartData::Table(table) => Some(table),
            ChartData::NoData => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ChartData::NoData => json!({ "no_data": true }),
            ChartData::Table(table) => json!({
                "no_data": false,
                "column": table.column,
                "display_name": table.display_name,
                "rows": table.rows,
            }),
        }
    }
}

/// Shapes `column` across the filtered rows into ordered (display term,
/// count) pairs. A record contributes once to each distinct term it holds,
/// so one with terms {A, B} raises both A's and B's count.
pub fn shape(
    result: &FilterResult<'_>,
    column: &str,
    dictionary: &Dictionary,
    sort: SortOrder,
) -> ChartData {
    // (display term, dictionary order) → record count. The order rides along
    // for tie-breaking.
    let mut counts: Vec<(String, i64, usize)> = Vec::new();
    let mut observed_any = false;

    for record in &result.rows {
        let Some(field) = record.field(column) else {
            continue;
        };
        let raw_terms: Vec<&str> = match field {
            Field::Terms(terms) => terms.iter().map(String::as_str).collect(),
            Field::Scalar(Some(value)) => vec![value.as_str()],
            Field::Scalar(None) => continue,
        };
        if raw_terms.is_empty() {
            continue;
        }
        observed_any = true;

        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for raw in raw_terms {
            let display = dictionary.display_term(column, raw);
            if !seen.insert(display) {
                continue;
            }
            let order = dictionary.term_order(column, raw).unwrap_or(i64::MAX);
            match counts.iter_mut().find(|(term, _, _)| term.as_str() == display) {
                Some(entry) => {
                    entry.1 = entry.1.min(order);
                    entry.2 += 1;
                }
                None => counts.push((display.to_string(), order, 1)),
            }
        }
    }

    if !observed_any {
        return ChartData::NoData;
    }

    let rows = counts
        .into_iter()
        .sorted_by(|a, b| {
            let primary = match sort {
                SortOrder::Ascending => a.2.cmp(&b.2),
                SortOrder::Descending => b.2.cmp(&a.2),
            };
            primary.then(a.1.cmp(&b.1)).then_with(|| a.0.cmp(&b.0))
        })
        .map(|(display_term, _, count)| ChartRow {
            display_term,
            count,
        })
        .collect();

    ChartData::Table(ChartTable {
        column: column.to_string(),
        display_name: dictionary
            .display_name(column)
            .unwrap_or(column)
            .to_string(),
        rows,
    })
}

/// Record count per named geographic zone, for the choropleth collaborator.
/// Sorted by descending count, then zone name.
pub fn zone_counts(result: &FilterResult<'_>, zone_column: &str) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in &result.rows {
        let Some(zone) = record.field(zone_column).and_then(Field::scalar) else {
            continue;
        };
        match counts.iter_mut().find(|(name, _)| name.as_str() == zone) {
            Some(entry) => entry.1 += 1,
            None => counts.push((zone.to_string(), 1)),
        }
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}
