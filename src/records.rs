//! Record loading: the primary entity table.
//!
//! Raw rows become [`Record`]s with a stable identifier (the 1-based original
//! row position), only the dictionary-kept columns, and multi-valued cells
//! split into ordered term lists. Coordinates are captured into a side table
//! before column pruning so the map renderer keeps them even when they are
//! excluded from the directory.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::{dictionary::Dictionary, error::DataError, settings::Settings, sheets::SheetGrid};

/// What a missing multi-valued cell splits into. The original loader
/// stringified missing markers before splitting, so downstream counts see a
/// literal one-term list; preserved so filter and chart totals stay
/// comparable with the existing dashboard.
pub const MISSING_TERM: &str = "nan";

/// One attribute value: a scalar (possibly missing) or an ordered term list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Scalar(Option<String>),
    Terms(Vec<String>),
}

impl Field {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Scalar(None))
    }

    pub fn scalar(&self) -> Option<&str> {
        match self {
            Field::Scalar(value) => value.as_deref(),
            Field::Terms(_) => None,
        }
    }

    pub fn terms(&self) -> Option<&[String]> {
        match self {
            Field::Terms(terms) => Some(terms),
            Field::Scalar(_) => None,
        }
    }

    /// String form for the directory table: term lists re-join with the
    /// delimiter they were split on.
    pub fn render(&self, delimiter: &str) -> String {
        match self {
            Field::Scalar(value) => value.clone().unwrap_or_default(),
            Field::Terms(terms) => terms.join(delimiter),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Field::Scalar(None) => Value::Null,
            Field::Scalar(Some(value)) => json!(value),
            Field::Terms(terms) => json!(terms),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: u32,
    pub fields: BTreeMap<String, Field>,
}

impl Record {
    pub fn field(&self, column: &str) -> Option<&Field> {
        self.fields.get(column)
    }

    /// List-of-records JSON form consumed by the presentation layer's store.
    pub fn to_json(&self, id_column: &str) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(id_column.to_string(), json!(self.id));
        for (name, field) in &self.fields {
            map.insert(name.clone(), field.to_json());
        }
        Value::Object(map)
    }
}

/// The loaded entity table: kept columns in directory order plus records.
#[derive(Debug, Clone)]
pub struct RecordTable {
    pub id_column: String,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl RecordTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Coordinates for one record, captured before column pruning.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub id: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RecordSet {
    pub table: RecordTable,
    pub coordinates: Vec<GeoPoint>,
}

pub fn load(
    grid: &SheetGrid,
    dictionary: &Dictionary,
    settings: &Settings,
) -> Result<RecordSet, DataError> {
    let name_index = grid.column_index(&settings.name_column).ok_or_else(|| {
        DataError::missing(
            format!("column '{}' in records sheet", settings.name_column),
            &settings.table_name,
        )
    })?;
    let latitude_index = grid.column_index(&settings.latitude_column);
    let longitude_index = grid.column_index(&settings.longitude_column);

    let kept = dictionary.kept_columns();
    let kept_indices: Vec<(String, usize, bool)> = kept
        .iter()
        .filter_map(|column| {
            grid.column_index(column)
                .map(|idx| (column.clone(), idx, dictionary.is_multi_valued(column)))
        })
        .collect();

    let mut records = Vec::new();
    let mut coordinates = Vec::new();
    for (position, row) in grid.rows.iter().enumerate() {
        // Identifiers are original row positions; dropped rows leave gaps.
        let id = (position + 1) as u32;
        if grid.cell(row, name_index).trim().is_empty() {
            continue;
        }

        coordinates.push(GeoPoint {
            id,
            latitude: latitude_index.and_then(|idx| grid.cell(row, idx).trim().parse().ok()),
            longitude: longitude_index.and_then(|idx| grid.cell(row, idx).trim().parse().ok()),
        });

        let mut fields = BTreeMap::new();
        for (column, index, multi_valued) in &kept_indices {
            let raw = grid.cell(row, *index);
            let field = if *multi_valued {
                Field::Terms(split_terms(raw, &settings.term_delimiter))
            } else if raw.is_empty() {
                Field::Scalar(None)
            } else {
                Field::Scalar(Some(raw.to_string()))
            };
            fields.insert(column.clone(), field);
        }
        records.push(Record { id, fields });
    }

    Ok(RecordSet {
        table: RecordTable {
            id_column: settings.id_column.clone(),
            columns: kept,
            records,
        },
        coordinates,
    })
}

fn split_terms(raw: &str, delimiter: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return vec![MISSING_TERM.to_string()];
    }
    raw.split(delimiter).map(|term| term.to_string()).collect()
}
