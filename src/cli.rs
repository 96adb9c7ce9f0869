use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::chart::SortOrder;

#[derive(Debug, Parser)]
#[command(author, version, about = "Organization directory dashboard data engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the dictionary's kept column descriptors
    Columns(ColumnsArgs),
    /// List the controlled-vocabulary options for one column
    Terms(TermsArgs),
    /// Apply filter selections and show the matching directory records
    Filter(FilterArgs),
    /// Shape (display term, count) chart data for a column
    Chart(ChartArgs),
    /// Count records per named geographic zone
    Zones(ZonesArgs),
    /// Write the filtered downloadable directory table as CSV
    Export(ExportArgs),
}

/// Shared input arguments: where the reference data lives.
#[derive(Debug, Args)]
pub struct DataArgs {
    /// Data dictionary workbook (.xls/.xlsx) or directory of per-sheet CSV files
    #[arg(short = 'd', long = "dictionary")]
    pub dictionary: PathBuf,
    /// Records workbook or directory of per-sheet CSV files
    #[arg(short = 'r', long = "records")]
    pub records: PathBuf,
    /// YAML settings file overriding the default table/sheet/column names
    #[arg(short = 's', long = "settings")]
    pub settings: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Debug, Args)]
pub struct TermsArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Column whose term options to list
    #[arg(short = 'C', long = "column")]
    pub column: String,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Repeatable selections such as `Sector=k12,higher_ed`
    #[arg(long = "select", action = clap::ArgAction::Append)]
    pub select: Vec<String>,
    /// Emit the client store payload as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Column to shape
    #[arg(short = 'C', long = "column")]
    pub column: String,
    /// Repeatable selections such as `Sector=k12,higher_ed`
    #[arg(long = "select", action = clap::ArgAction::Append)]
    pub select: Vec<String>,
    /// Sort direction for the counts
    #[arg(long, value_enum, default_value = "desc")]
    pub sort: SortDirection,
    /// Emit the shaped rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ZonesArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Scalar column naming the geographic zone
    #[arg(short = 'C', long = "column")]
    pub column: String,
    /// Repeatable selections such as `Sector=k12,higher_ed`
    #[arg(long = "select", action = clap::ArgAction::Append)]
    pub select: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Repeatable selections such as `Sector=k12,higher_ed`
    #[arg(long = "select", action = clap::ArgAction::Append)]
    pub select: Vec<String>,
    /// Output CSV file (stdout if omitted or `-`)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl From<SortDirection> for SortOrder {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => SortOrder::Ascending,
            SortDirection::Desc => SortOrder::Descending,
        }
    }
}
