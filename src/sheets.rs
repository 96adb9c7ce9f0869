//! Labeled-sheet input sources.
//!
//! All reference data enters through [`SheetSource`]: either a spreadsheet
//! workbook (`.xls`/`.xlsx`, read via `calamine`) whose sheets are addressed
//! by name, or a directory holding one `<sheet>.csv` file per sheet, which is
//! the format the test fixtures use. Both produce the same [`SheetGrid`] of
//! string cells, so the loaders never know where a table came from.

use std::path::{Path, PathBuf};

use calamine::{DataType, Reader, open_workbook_auto};

use crate::error::DataError;

/// One worksheet materialized as strings: a header row plus data rows.
#[derive(Debug, Clone)]
pub struct SheetGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetGrid {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers.iter().map(|h| h.trim().to_string()).collect();
        Self { headers, rows }
    }

    /// Index of a column by canonical (trimmed) header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name.trim())
    }

    /// Cell value at (row, column), empty string when the row is short.
    pub fn cell<'a>(&'a self, row: &'a [String], index: usize) -> &'a str {
        row.get(index).map(|s| s.as_str()).unwrap_or("")
    }
}

/// Where a named sheet comes from.
#[derive(Debug, Clone)]
pub enum SheetSource {
    /// A labeled-sheet workbook file.
    Workbook(PathBuf),
    /// A directory of `<sheet>.csv` files.
    CsvDir(PathBuf),
}

impl SheetSource {
    /// Picks the source kind from the path: directories hold per-sheet CSV
    /// files, anything else is treated as a workbook.
    pub fn from_path(path: &Path) -> Self {
        if path.is_dir() {
            Self::CsvDir(path.to_path_buf())
        } else {
            Self::Workbook(path.to_path_buf())
        }
    }

    pub fn sheet(&self, name: &str) -> Result<SheetGrid, DataError> {
        match self {
            Self::Workbook(path) => read_workbook_sheet(path, name),
            Self::CsvDir(dir) => read_csv_sheet(dir, name),
        }
    }
}

fn read_workbook_sheet(path: &Path, name: &str) -> Result<SheetGrid, DataError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|_| DataError::missing(format!("workbook '{}'", path.display()), path))?;
    let range = workbook
        .worksheet_range(name)
        .ok_or_else(|| DataError::missing(format!("sheet '{name}'"), path))?
        .map_err(|_| DataError::missing(format!("sheet '{name}'"), path))?;

    let mut rows = range.rows().map(|row| {
        row.iter()
            .map(cell_to_string)
            .collect::<Vec<_>>()
    });
    let headers = rows.next().unwrap_or_default();
    Ok(SheetGrid::new(headers, rows.collect()))
}

fn read_csv_sheet(dir: &Path, name: &str) -> Result<SheetGrid, DataError> {
    let path = dir.join(format!("{name}.csv"));
    if !path.is_file() {
        return Err(DataError::missing(format!("sheet '{name}'"), &path));
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
        .map_err(|_| DataError::missing(format!("sheet '{name}'"), &path))?;

    let mut grid_rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|_| DataError::missing(format!("sheet '{name}'"), &path))?;
        grid_rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    let headers = if grid_rows.is_empty() {
        Vec::new()
    } else {
        grid_rows.remove(0)
    };
    Ok(SheetGrid::new(headers, grid_rows))
}

/// Workbook cells carry spreadsheet types; the dashboard data model is all
/// strings, so integral floats lose their trailing `.0` (Excel renders the
/// order column 1, 2, 3 but stores 1.0, 2.0, 3.0).
fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => {
            if f.fract() == 0.0 {
                format!("{f:.0}")
            } else {
                f.to_string()
            }
        }
        DataType::Bool(b) => b.to_string(),
        DataType::Error(_) => String::new(),
        // Date and duration cells keep their serial rendering.
        other => other.to_string(),
    }
}
