//! Fatal load-time error taxonomy.
//!
//! Only startup failures are expressed as errors: the reference data is
//! required by every downstream operation, so a missing sheet or a malformed
//! ordering field aborts the load. Per-interaction outcomes such as an empty
//! filter result or a chart with nothing to count are ordinary values
//! ([`crate::filter::FilterResult`] with a zero count,
//! [`crate::chart::ChartData::NoData`]) and never travel through this type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    /// An expected file or worksheet was absent at startup.
    #[error("missing resource: {resource} (looked in {path:?})")]
    MissingResource { resource: String, path: PathBuf },

    /// A configured numeric field (column order, dropdown rank) was malformed.
    #[error("column '{column}': cannot parse '{value}' as a number")]
    Parse { column: String, value: String },
}

impl DataError {
    pub fn missing(resource: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingResource {
            resource: resource.into(),
            path: path.into(),
        }
    }

    pub fn parse(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            column: column.into(),
            value: value.into(),
        }
    }
}
