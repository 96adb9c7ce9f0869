//! One-time startup load of all reference data.
//!
//! A [`DataStore`] is constructed once per process, then passed by shared
//! reference into the filter engine, chart shaper, and export. Nothing
//! mutates it afterwards; every derived table is a fresh value.

use anyhow::{Context, Result};
use log::info;

use crate::{
    dictionary::Dictionary,
    records::{self, GeoPoint, RecordTable},
    settings::Settings,
    sheets::SheetSource,
};

#[derive(Debug, Clone)]
pub struct DataStore {
    pub settings: Settings,
    pub dictionary: Dictionary,
    pub records: RecordTable,
    pub coordinates: Vec<GeoPoint>,
}

impl DataStore {
    /// Loads the dictionary sheets and the records sheet, restricts the
    /// dictionary to columns actually present, and builds the record table.
    pub fn load(
        dictionary_source: &SheetSource,
        records_source: &SheetSource,
        settings: Settings,
    ) -> Result<Self> {
        let records_grid = records_source
            .sheet(&settings.table_name)
            .with_context(|| format!("Loading records sheet '{}'", settings.table_name))?;
        let columns_grid = dictionary_source
            .sheet(&settings.columns_sheet)
            .with_context(|| format!("Loading dictionary sheet '{}'", settings.columns_sheet))?;
        let terms_grid = dictionary_source
            .sheet(&settings.terms_sheet)
            .with_context(|| format!("Loading dictionary sheet '{}'", settings.terms_sheet))?;

        let dictionary = Dictionary::load(
            &columns_grid,
            &terms_grid,
            &settings.table_name,
            &records_grid.headers,
        )
        .context("Building data dictionary")?;

        let record_set = records::load(&records_grid, &dictionary, &settings)
            .with_context(|| format!("Loading records for table '{}'", settings.table_name))?;

        info!(
            "Loaded {} record(s), {} kept column(s), {} controlled term(s)",
            record_set.table.len(),
            dictionary.columns.len(),
            dictionary.terms.len()
        );

        Ok(Self {
            settings,
            dictionary,
            records: record_set.table,
            coordinates: record_set.coordinates,
        })
    }
}
