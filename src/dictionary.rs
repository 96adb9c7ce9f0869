//! Data-dictionary model: column descriptors and controlled-vocabulary terms.
//!
//! The dictionary is the single source of truth for which record columns the
//! dashboard keeps, how they are labeled, which hold multiple delimited
//! values, and which feed filters and chart dropdowns. It is loaded once at
//! startup, restricted to the configured table and to columns actually
//! present in the record data, and then shared read-only with every
//! downstream computation.

use std::collections::BTreeSet;

use crate::{error::DataError, sheets::SheetGrid};

/// Per-column metadata from the `columns_dictionary` sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub table_name: String,
    pub column_name: String,
    pub display_name: String,
    /// Cells in this column encode a delimited set of terms.
    pub multiple_values: bool,
    /// Positive order keeps the column in the directory; 0 excludes it.
    pub column_order: i64,
    pub directory_display: bool,
    pub directory_download: bool,
    pub dashboard_filter: bool,
    /// Rank in the pie-chart dropdown, when positive.
    pub pie_dropdown: Option<i64>,
    /// Rank in the bar-chart dropdown, when positive.
    pub bar_dropdown: Option<i64>,
}

/// One controlled-vocabulary entry from the `terms_dictionary` sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermDescriptor {
    pub table_name: String,
    pub column_name: String,
    pub term: String,
    pub display_term: String,
    pub term_order: i64,
    /// Display name of the owning column, joined in at load.
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct Dictionary {
    /// Kept column descriptors, ordered by `column_order`.
    pub columns: Vec<ColumnDescriptor>,
    /// Terms restricted to kept columns, in sheet order.
    pub terms: Vec<TermDescriptor>,
}

impl Dictionary {
    /// Builds the dictionary from the two lookup sheets, restricted to
    /// `table_name` and to columns listed in `present_columns` (the raw
    /// record headers) with a positive directory order.
    pub fn load(
        columns_grid: &SheetGrid,
        terms_grid: &SheetGrid,
        table_name: &str,
        present_columns: &[String],
    ) -> Result<Self, DataError> {
        let mut columns = Vec::new();
        let mut seen = BTreeSet::new();
        let reader = GridReader::new(
            columns_grid,
            "columns_dictionary",
            COLUMN_SHEET_FIELDS,
            &["table_name", "column_name", "display_name"],
        )?;
        for row in &columns_grid.rows {
            let descriptor = ColumnDescriptor {
                table_name: reader.text(row, "table_name"),
                column_name: reader.text(row, "column_name"),
                display_name: reader.text(row, "display_name"),
                multiple_values: parse_flag(&reader.text(row, "multiple_values")),
                column_order: parse_order("directory_column_order", &reader.text(row, "directory_column_order"))?
                    .unwrap_or(0),
                directory_display: parse_flag(&reader.text(row, "directory_display")),
                directory_download: parse_flag(&reader.text(row, "directory_download")),
                dashboard_filter: parse_flag(&reader.text(row, "dashboard_filter")),
                pie_dropdown: parse_rank("dashboard_pie_dropdown", &reader.text(row, "dashboard_pie_dropdown"))?,
                bar_dropdown: parse_rank("dashboard_bar_dropdown", &reader.text(row, "dashboard_bar_dropdown"))?,
            };
            if descriptor.table_name != table_name
                || descriptor.column_order <= 0
                || !present_columns.contains(&descriptor.column_name)
            {
                continue;
            }
            // One descriptor per (table, column); first row wins.
            if seen.insert(descriptor.column_name.clone()) {
                columns.push(descriptor);
            }
        }
        columns.sort_by_key(|c| c.column_order);

        let mut terms = Vec::new();
        let term_reader = GridReader::new(
            terms_grid,
            "terms_dictionary",
            TERM_SHEET_FIELDS,
            &["table_name", "column_name", "term"],
        )?;
        for row in &terms_grid.rows {
            let table = term_reader.text(row, "table_name");
            let column = term_reader.text(row, "column_name");
            let Some(owner) = columns
                .iter()
                .find(|c| c.table_name == table && c.column_name == column)
            else {
                continue;
            };
            let term = term_reader.text(row, "term");
            let display_term = match term_reader.text(row, "display_term") {
                ref s if s.is_empty() => term.clone(),
                s => s,
            };
            terms.push(TermDescriptor {
                table_name: table,
                column_name: column,
                term,
                display_term,
                term_order: parse_order("term_order", &term_reader.text(row, "term_order"))?.unwrap_or(0),
                display_name: owner.display_name.clone(),
            });
        }

        Ok(Self { columns, terms })
    }

    /// Names of the kept record columns, in directory order.
    pub fn kept_columns(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.column_name.clone()).collect()
    }

    pub fn descriptor(&self, column: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.column_name == column)
    }

    pub fn is_multi_valued(&self, column: &str) -> bool {
        self.descriptor(column).is_some_and(|c| c.multiple_values)
    }

    pub fn multi_valued_columns(&self) -> BTreeSet<String> {
        self.columns
            .iter()
            .filter(|c| c.multiple_values)
            .map(|c| c.column_name.clone())
            .collect()
    }

    pub fn display_name(&self, column: &str) -> Option<&str> {
        self.descriptor(column).map(|c| c.display_name.as_str())
    }

    /// Display form of a raw term; unknown terms keep their raw form.
    pub fn display_term<'a>(&'a self, column: &str, term: &'a str) -> &'a str {
        self.terms
            .iter()
            .find(|t| t.column_name == column && t.term == term)
            .map(|t| t.display_term.as_str())
            .unwrap_or(term)
    }

    pub fn term_order(&self, column: &str, term: &str) -> Option<i64> {
        self.terms
            .iter()
            .find(|t| t.column_name == column && t.term == term)
            .map(|t| t.term_order)
    }

    /// (raw, display) options for a column's UI control, in term order.
    pub fn term_options(&self, column: &str) -> Vec<(&str, &str)> {
        let mut options: Vec<&TermDescriptor> = self
            .terms
            .iter()
            .filter(|t| t.column_name == column)
            .collect();
        options.sort_by(|a, b| a.term_order.cmp(&b.term_order).then_with(|| a.term.cmp(&b.term)));
        options
            .into_iter()
            .map(|t| (t.term.as_str(), t.display_term.as_str()))
            .collect()
    }

    /// Columns offered as dashboard filters: flagged in the dictionary and
    /// backed by at least one controlled term, in directory order.
    pub fn filter_columns(&self) -> Vec<&ColumnDescriptor> {
        self.columns
            .iter()
            .filter(|c| c.dashboard_filter)
            .filter(|c| self.terms.iter().any(|t| t.column_name == c.column_name))
            .collect()
    }

    pub fn pie_dropdown(&self) -> Vec<&ColumnDescriptor> {
        self.ranked(|c| c.pie_dropdown)
    }

    pub fn bar_dropdown(&self) -> Vec<&ColumnDescriptor> {
        self.ranked(|c| c.bar_dropdown)
    }

    fn ranked(&self, rank: impl Fn(&ColumnDescriptor) -> Option<i64>) -> Vec<&ColumnDescriptor> {
        let mut ranked: Vec<(i64, &ColumnDescriptor)> = self
            .columns
            .iter()
            .filter_map(|c| rank(c).map(|r| (r, c)))
            .collect();
        ranked.sort_by_key(|(r, _)| *r);
        ranked.into_iter().map(|(_, c)| c).collect()
    }
}

struct GridReader<'a> {
    grid: &'a SheetGrid,
    indices: Vec<(&'static str, Option<usize>)>,
}

const COLUMN_SHEET_FIELDS: &[&str] = &[
    "table_name",
    "column_name",
    "display_name",
    "multiple_values",
    "directory_column_order",
    "directory_download",
    "directory_display",
    "dashboard_filter",
    "dashboard_pie_dropdown",
    "dashboard_bar_dropdown",
];

const TERM_SHEET_FIELDS: &[&str] = &[
    "table_name",
    "column_name",
    "term",
    "display_term",
    "term_order",
];

impl<'a> GridReader<'a> {
    fn new(
        grid: &'a SheetGrid,
        sheet: &str,
        fields: &'static [&'static str],
        required: &[&str],
    ) -> Result<Self, DataError> {
        for name in required {
            if grid.column_index(name).is_none() {
                return Err(DataError::missing(
                    format!("column '{name}' in sheet '{sheet}'"),
                    sheet,
                ));
            }
        }
        let indices = fields
            .iter()
            .map(|name| (*name, grid.column_index(name)))
            .collect();
        Ok(Self { grid, indices })
    }

    fn text(&self, row: &[String], field: &str) -> String {
        self.indices
            .iter()
            .find(|(name, _)| *name == field)
            .and_then(|(_, idx)| *idx)
            .map(|idx| self.grid.cell(row, idx).trim().to_string())
            .unwrap_or_default()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

/// Numeric order fields may arrive as "2" or "2.0" from a workbook; anything
/// else non-empty is a load-time failure.
fn parse_order(column: &str, value: &str) -> Result<Option<i64>, DataError> {
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(parsed) = value.parse::<i64>() {
        return Ok(Some(parsed));
    }
    match value.parse::<f64>() {
        Ok(parsed) if parsed.fract() == 0.0 => Ok(Some(parsed as i64)),
        _ => Err(DataError::parse(column, value)),
    }
}

fn parse_rank(column: &str, value: &str) -> Result<Option<i64>, DataError> {
    Ok(parse_order(column, value)?.filter(|rank| *rank > 0))
}
