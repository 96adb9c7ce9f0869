//! Dashboard settings: table, sheet, and column naming.
//!
//! Everything here defaults to the organization-directory layout, so a
//! settings file is only needed when the workbook deviates from it.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Table the dictionary rows are scoped to.
    pub table_name: String,
    /// Worksheet holding the column descriptors.
    pub columns_sheet: String,
    /// Worksheet holding the controlled-vocabulary terms.
    pub terms_sheet: String,
    /// Synthetic identifier column added to every record.
    pub id_column: String,
    /// Records lacking a value in this column are dropped at load.
    pub name_column: String,
    /// Separator between terms inside a multi-valued cell.
    pub term_delimiter: String,
    pub latitude_column: String,
    pub longitude_column: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table_name: "Organizations".to_string(),
            columns_sheet: "columns_dictionary".to_string(),
            terms_sheet: "terms_dictionary".to_string(),
            id_column: "orgID".to_string(),
            name_column: "Organization".to_string(),
            term_delimiter: ", ".to_string(),
            latitude_column: "Latitude".to_string(),
            longitude_column: "Longitude".to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Opening settings file {path:?}"))?;
        serde_yaml::from_str(&raw).with_context(|| format!("Parsing settings file {path:?}"))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_yaml::to_string(self).context("Serializing settings")?;
        fs::write(path, serialized).with_context(|| format!("Writing settings file {path:?}"))
    }
}
