//! Directory table rendering and CSV download.
//!
//! The directory tab shows the filtered records as strings: term lists are
//! re-joined with the delimiter they were split on, columns follow the
//! dictionary order, and headers use display names. The downloadable form
//! uses the dictionary's download flags instead of the display flags.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use csv::QuoteStyle;

use crate::{filter::FilterResult, records::Field, store::DataStore};

/// Which dictionary flag picks the columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryScope {
    Display,
    Download,
}

/// A fully stringified table, ready for a table widget or a CSV writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Builds the directory table for the filtered records: the identifier
/// column first, then flagged columns in dictionary order.
pub fn directory_view(
    store: &DataStore,
    result: &FilterResult<'_>,
    scope: DirectoryScope,
) -> DirectoryView {
    let columns: Vec<&str> = store
        .dictionary
        .columns
        .iter()
        .filter(|c| match scope {
            DirectoryScope::Display => c.directory_display,
            DirectoryScope::Download => c.directory_download,
        })
        .map(|c| c.column_name.as_str())
        .collect();

    let mut headers = vec![store.records.id_column.clone()];
    headers.extend(columns.iter().map(|column| {
        store
            .dictionary
            .display_name(column)
            .unwrap_or(column)
            .to_string()
    }));

    let delimiter = store.settings.term_delimiter.as_str();
    let rows = result
        .rows
        .iter()
        .map(|record| {
            let mut row = vec![record.id.to_string()];
            row.extend(columns.iter().map(|column| {
                record
                    .field(column)
                    .map(|field| field.render(delimiter))
                    .unwrap_or_default()
            }));
            row
        })
        .collect();

    DirectoryView { headers, rows }
}

/// Writes a directory view as CSV; `-` or no path writes to stdout.
pub fn write_csv(view: &DirectoryView, path: Option<&Path>) -> Result<()> {
    let sink: Box<dyn Write> = match path {
        Some(p) if p != Path::new("-") => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(sink);

    writer
        .write_record(&view.headers)
        .context("Writing directory headers")?;
    for row in &view.rows {
        writer.write_record(row).context("Writing directory row")?;
    }
    writer.flush().context("Flushing directory output")?;
    Ok(())
}
