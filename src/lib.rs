pub mod chart;
pub mod cli;
pub mod dictionary;
pub mod error;
pub mod export;
pub mod filter;
pub mod records;
pub mod settings;
pub mod sheets;
pub mod store;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    chart::ChartData,
    cli::{Cli, Commands, DataArgs},
    export::DirectoryScope,
    filter::parse_selection,
    settings::Settings,
    sheets::SheetSource,
    store::DataStore,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("org_dashboard", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Columns(args) => handle_columns(&args),
        Commands::Terms(args) => handle_terms(&args),
        Commands::Filter(args) => handle_filter(&args),
        Commands::Chart(args) => handle_chart(&args),
        Commands::Zones(args) => handle_zones(&args),
        Commands::Export(args) => handle_export(&args),
    }
}

fn load_store(data: &DataArgs) -> Result<DataStore> {
    let settings = match &data.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let dictionary = SheetSource::from_path(&data.dictionary);
    let records = SheetSource::from_path(&data.records);
    DataStore::load(&dictionary, &records, settings)
        .with_context(|| format!("Loading reference data from {:?}", data.dictionary))
}

fn handle_columns(args: &cli::ColumnsArgs) -> Result<()> {
    let store = load_store(&args.data)?;
    let rows = store
        .dictionary
        .columns
        .iter()
        .map(|column| {
            vec![
                column.column_order.to_string(),
                column.column_name.clone(),
                column.display_name.clone(),
                yes_no(column.multiple_values),
                yes_no(column.dashboard_filter),
                column.pie_dropdown.map(|r| r.to_string()).unwrap_or_default(),
                column.bar_dropdown.map(|r| r.to_string()).unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    let headers = ["#", "column", "display", "multi", "filter", "pie", "bar"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    info!("Listed {} kept column(s)", store.dictionary.columns.len());
    Ok(())
}

fn handle_terms(args: &cli::TermsArgs) -> Result<()> {
    let store = load_store(&args.data)?;
    let display = store
        .dictionary
        .display_name(&args.column)
        .with_context(|| format!("Unknown column '{}'", args.column))?
        .to_string();
    let rows = store
        .dictionary
        .term_options(&args.column)
        .into_iter()
        .map(|(term, display_term)| vec![term.to_string(), display_term.to_string()])
        .collect::<Vec<_>>();
    let headers = vec!["term".to_string(), format!("display ({display})")];
    table::print_table(&headers, &rows);
    Ok(())
}

fn handle_filter(args: &cli::FilterArgs) -> Result<()> {
    let store = load_store(&args.data)?;
    let selection = parse_selection(&args.select, &store.dictionary)?;
    let result = filter::apply(&store.records, &store.dictionary, &selection);
    info!(
        "{} of {} record(s) match",
        result.count,
        store.records.len()
    );

    if args.json {
        // The client store keys the payload by table name.
        let mut payload = serde_json::Map::new();
        payload.insert(store.settings.table_name.clone(), result.to_store_json());
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::Object(payload))?
        );
        return Ok(());
    }
    if result.is_empty() {
        println!("There are no records that match this search query. Please change the filters.");
        return Ok(());
    }
    let view = export::directory_view(&store, &result, DirectoryScope::Display);
    table::print_table(&view.headers, &view.rows);
    Ok(())
}

fn handle_chart(args: &cli::ChartArgs) -> Result<()> {
    let store = load_store(&args.data)?;
    let selection = parse_selection(&args.select, &store.dictionary)?;
    let result = filter::apply(&store.records, &store.dictionary, &selection);
    let shaped = chart::shape(&result, &args.column, &store.dictionary, args.sort.into());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&shaped.to_json())?);
        return Ok(());
    }
    match shaped {
        ChartData::NoData => {
            println!("No data to display for '{}'.", args.column);
        }
        ChartData::Table(chart_table) => {
            let headers = vec![chart_table.display_name.clone(), "count".to_string()];
            let rows = chart_table
                .rows
                .iter()
                .map(|row| vec![row.display_term.clone(), row.count.to_string()])
                .collect::<Vec<_>>();
            table::print_table(&headers, &rows);
        }
    }
    Ok(())
}

fn handle_zones(args: &cli::ZonesArgs) -> Result<()> {
    let store = load_store(&args.data)?;
    let selection = parse_selection(&args.select, &store.dictionary)?;
    let result = filter::apply(&store.records, &store.dictionary, &selection);
    let counts = chart::zone_counts(&result, &args.column);
    let headers = vec![args.column.clone(), "count".to_string()];
    let rows = counts
        .into_iter()
        .map(|(zone, count)| vec![zone, count.to_string()])
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    Ok(())
}

fn handle_export(args: &cli::ExportArgs) -> Result<()> {
    let store = load_store(&args.data)?;
    let selection = parse_selection(&args.select, &store.dictionary)?;
    let result = filter::apply(&store.records, &store.dictionary, &selection);
    let view = export::directory_view(&store, &result, DirectoryScope::Download);
    export::write_csv(&view, args.output.as_deref())
        .with_context(|| format!("Writing directory export to {:?}", args.output))?;
    info!(
        "Exported {} record(s) across {} column(s)",
        view.rows.len(),
        view.headers.len()
    );
    Ok(())
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}
