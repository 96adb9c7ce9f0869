mod common;

use std::sync::OnceLock;

use org_dashboard::{
    chart::{self, ChartData, SortOrder},
    filter::{self, FilterSelection},
    settings::Settings,
    sheets::SheetSource,
    store::DataStore,
};

fn store() -> &'static DataStore {
    static STORE: OnceLock<DataStore> = OnceLock::new();
    STORE.get_or_init(|| {
        let workspace = common::fixture_workspace();
        let source = SheetSource::CsvDir(workspace.path().to_path_buf());
        DataStore::load(&source, &source, Settings::default()).expect("load store")
    })
}

fn unfiltered() -> filter::FilterResult<'static> {
    let store = store();
    filter::apply(&store.records, &store.dictionary, &FilterSelection::new())
}

#[test]
fn sector_counts_use_display_terms() {
    let store = store();
    let shaped = chart::shape(&unfiltered(), "Sector", &store.dictionary, SortOrder::Descending);
    let table = shaped.table().expect("chart table");
    assert_eq!(table.display_name, "Sector served");
    let rows: Vec<(&str, usize)> = table
        .rows
        .iter()
        .map(|r| (r.display_term.as_str(), r.count))
        .collect();
    assert_eq!(
        rows,
        vec![("K-12 education", 3), ("Community", 2), ("Higher education", 1)]
    );
}

#[test]
fn count_ties_break_by_configured_term_order() {
    let store = store();
    let shaped = chart::shape(&unfiltered(), "Theme", &store.dictionary, SortOrder::Descending);
    let rows = &shaped.table().expect("chart table").rows;
    // Climate and Water both count 2; Climate has the lower term order. The
    // empty Theme cell surfaces as the raw "nan" term with count 1.
    assert_eq!(rows[0].display_term, "Climate");
    assert_eq!(rows[1].display_term, "Water");
    assert_eq!(rows[2].display_term, "nan");
    assert_eq!(rows[2].count, 1);
}

#[test]
fn ascending_sort_reverses_the_ordering() {
    let store = store();
    let shaped = chart::shape(&unfiltered(), "Sector", &store.dictionary, SortOrder::Ascending);
    let rows = &shaped.table().expect("chart table").rows;
    assert_eq!(rows.first().unwrap().display_term, "Higher education");
    assert_eq!(rows.last().unwrap().display_term, "K-12 education");
}

#[test]
fn shaping_respects_the_active_filter() {
    let store = store();
    let result = filter::apply(
        &store.records,
        &store.dictionary,
        &FilterSelection::new().select("City", ["Austin"]),
    );
    let shaped = chart::shape(&result, "Sector", &store.dictionary, SortOrder::Descending);
    let rows: Vec<(&str, usize)> = shaped
        .table()
        .expect("chart table")
        .rows
        .iter()
        .map(|r| (r.display_term.as_str(), r.count))
        .collect();
    // Alpha Learning and Charlie Center remain.
    assert_eq!(rows, vec![("Community", 2), ("K-12 education", 1)]);
}

#[test]
fn empty_filter_result_shapes_to_no_data() {
    let store = store();
    let result = filter::apply(
        &store.records,
        &store.dictionary,
        &FilterSelection::new().select("Sector", ["nonexistent"]),
    );
    let shaped = chart::shape(&result, "Sector", &store.dictionary, SortOrder::Descending);
    assert_eq!(shaped, ChartData::NoData);
    assert_eq!(shaped.to_json()["no_data"], true);
}

#[test]
fn zone_counts_skip_records_without_a_zone() {
    let counts = chart::zone_counts(&unfiltered(), "Education_Service_Center");
    // Delta Org has no region and does not contribute.
    assert_eq!(
        counts,
        vec![("Region 13".to_string(), 2), ("Region 1".to_string(), 1)]
    );
}
