//! End-to-end: load, derive, rank and export.

mod common;

use common::assert_close;
use fuel_report::aggregate::filtered_records;
use fuel_report::reports::{self, export_filtered};
use fuel_report::{load_prices, DatasetCache, DerivedTables, FilterRequest, Report, TrendScope};
use std::fs;

const PRODUCT: &str = "Euro-super 95";

// ---------------------------------------------------------------------------
// derived tables
// ---------------------------------------------------------------------------

#[test]
fn country_means_exclude_null_prices() {
    let (path, _tmp) = common::sample_csv();
    let (data, _) = load_prices(&path).unwrap();
    let tables = DerivedTables::compute(&data, &FilterRequest::new(PRODUCT));

    let fr = tables.country_aggregates.iter().find(|a| a.country == "FR").unwrap();
    assert_close(fr.mean_price, 1.725);
    assert_eq!(fr.region_code_3, Some("FRA"));

    let xx = tables.country_aggregates.iter().find(|a| a.country == "XX").unwrap();
    assert_eq!(xx.region_code_3, None);

    let rel_avg = tables
        .country_aggregates
        .iter()
        .map(|a| a.relative_to_regional_mean)
        .sum::<f64>()
        / tables.country_aggregates.len() as f64;
    assert_close(rel_avg, 100.0);
}

#[test]
fn trend_is_product_filtered_and_date_ordered() {
    let (path, _tmp) = common::sample_csv();
    let (data, _) = load_prices(&path).unwrap();
    let tables = DerivedTables::compute(&data, &FilterRequest::new(PRODUCT));

    let values: Vec<f64> = tables.regional_trend.iter().map(|p| p.mean_price).collect();
    assert_eq!(values.len(), 3);
    assert_close(values[0], (1.8 + 1.7 + 1.6 + 1.5) / 4.0);
    assert_close(values[1], (1.85 + 1.75) / 2.0);
    assert_close(values[2], (1.9 + 1.7) / 2.0);

    let all = DerivedTables::compute(
        &data,
        &FilterRequest::new(PRODUCT).trend_scope(TrendScope::AllProducts),
    );
    assert_close(
        all.regional_trend[0].mean_price,
        (1.8 + 1.7 + 1.6 + 1.5 + 1.7 + 1.6) / 6.0,
    );
}

#[test]
fn heatmap_covers_selected_countries_only() {
    let (path, _tmp) = common::sample_csv();
    let (data, _) = load_prices(&path).unwrap();
    let req = FilterRequest::new(PRODUCT).countries(["IT", "DE"]);
    let tables = DerivedTables::compute(&data, &req);

    assert_eq!(tables.monthly_heat.len(), 2);
    let de = tables.monthly_heat.iter().find(|c| c.country == "DE").unwrap();
    assert_eq!(de.month, "2024-01");
    assert_close(de.mean_price, 1.65);
    assert_eq!(tables.comparison.len(), 2);
    assert_eq!(tables.comparison[0].country, "IT");
}

#[test]
fn unknown_product_is_an_empty_view() {
    let (path, _tmp) = common::sample_csv();
    let (data, _) = load_prices(&path).unwrap();
    let report = Report::build(&data, &FilterRequest::new("euro-super 95"), 3);
    assert!(report.is_empty());
    assert!(report.summary.is_none());
    assert!(report.rankings.is_empty());
    assert!(report.trend.is_empty());
}

// ---------------------------------------------------------------------------
// KPIs and rankings
// ---------------------------------------------------------------------------

#[test]
fn summary_and_rankings() {
    let (path, _tmp) = common::sample_csv();
    let (data, _) = load_prices(&path).unwrap();
    let report = Report::build(&data, &FilterRequest::new(PRODUCT), 2);

    let summary = report.summary.as_ref().unwrap();
    assert_eq!(summary.country_count, 4);
    assert_close(summary.overall_max, 1.85);
    assert_close(summary.overall_min, 1.5);
    let wow = summary.week_over_week_variation.unwrap();
    assert_close(wow, (1.8 - 1.8) / 1.8 * 100.0);
    assert!(summary.monthly_volatility.is_some());

    let top: Vec<_> = report.rankings.iter().filter(|r| r.list == "Top").collect();
    let bottom: Vec<_> = report.rankings.iter().filter(|r| r.list == "Bottom").collect();
    assert_eq!(top.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(), vec!["IT", "FR"]);
    assert_eq!(bottom.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(), vec!["XX", "DE"]);
}

#[test]
fn single_date_leaves_trend_kpis_unavailable() {
    let (path, _tmp) = common::write_csv(
        "Country,Product,Date,Price\nIT,LPG,01/01/2024,0.8\nFR,LPG,01/01/2024,0.9\n",
    );
    let (data, _) = load_prices(&path).unwrap();
    let report = Report::build(&data, &FilterRequest::new("LPG"), 5);
    let summary = report.summary.unwrap();
    assert!(summary.week_over_week_variation.is_none());
    assert!(summary.monthly_volatility.is_none());
    assert_close(summary.overall_mean, 0.85);
}

// ---------------------------------------------------------------------------
// exports
// ---------------------------------------------------------------------------

#[test]
fn export_keeps_null_fields_as_empty_cells() {
    let (path, tmp) = common::sample_csv();
    let (data, _) = load_prices(&path).unwrap();
    let req = FilterRequest::new(PRODUCT).countries(["FR"]);
    assert_eq!(filtered_records(data.records(), &req).len(), 3);

    let out = tmp.path().join("fr.csv");
    let rows = export_filtered(&out, &data, &req).unwrap();
    assert_eq!(rows, 3);
    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Country,RegionCode3,Product,Date,Price");
    assert_eq!(lines[3], "FR,FRA,Euro-super 95,15/01/2024,");
}

#[test]
fn write_all_creates_every_file() {
    let (path, tmp) = common::sample_csv();
    let (data, _) = load_prices(&path).unwrap();
    let req = FilterRequest::new(PRODUCT);
    let report = Report::build(&data, &req, 3);
    let out_dir = tmp.path().join("out");
    let written = report.write_all(&data, &req, &out_dir).unwrap();
    assert_eq!(written.len(), 8);
    for p in &written {
        assert!(p.exists(), "{}", p.display());
    }

    let json = fs::read_to_string(out_dir.join(reports::SUMMARY_FILE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["product"], PRODUCT);
    assert_eq!(value["country_count"], 4);
}

// ---------------------------------------------------------------------------
// cache
// ---------------------------------------------------------------------------

#[test]
fn cache_loads_once_and_reloads_on_demand() {
    let (path, _tmp) = common::sample_csv();
    let mut cache = DatasetCache::new(&path);
    assert!(!cache.is_loaded());
    assert_eq!(cache.get_or_load().unwrap().0.len(), 12);

    fs::write(&path, "Country,Product,Date,Price\nIT,LPG,01/01/2024,0.8\n").unwrap();
    assert_eq!(cache.get_or_load().unwrap().0.len(), 12);
    assert_eq!(cache.reload().unwrap().0.len(), 1);
}
