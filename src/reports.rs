// One report run: derive every table for a filter, export them and build
// the KPI summary.
use crate::aggregate::{filtered_records, DerivedTables, FilterRequest};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::output::{write_csv, write_json};
use crate::ranking::{ranking_rows, summarize};
use crate::types::{
    CountryMeanRow, ExportRow, KpiSummary, MonthlyHeatRow, RankingRow, SeriesRow, TrendRow,
};
use log::info;
use std::path::{Path, PathBuf};

pub const COUNTRY_MEANS_FILE: &str = "country_means.csv";
pub const COMPARISON_FILE: &str = "country_comparison.csv";
pub const HEATMAP_FILE: &str = "monthly_heatmap.csv";
pub const TREND_FILE: &str = "regional_trend.csv";
pub const SERIES_FILE: &str = "country_series.csv";
pub const RANKINGS_FILE: &str = "rankings.csv";
pub const EXPORT_FILE: &str = "filtered_export.csv";
pub const SUMMARY_FILE: &str = "kpi_summary.json";

/// Formatted rows for every view, ready to preview or write.
#[derive(Debug, Clone)]
pub struct Report {
    pub tables: DerivedTables,
    pub country_means: Vec<CountryMeanRow>,
    pub comparison: Vec<CountryMeanRow>,
    pub heatmap: Vec<MonthlyHeatRow>,
    pub trend: Vec<TrendRow>,
    pub series: Vec<SeriesRow>,
    pub rankings: Vec<RankingRow>,
    /// `None` when the filter matched no priced records.
    pub summary: Option<KpiSummary>,
}

impl Report {
    pub fn build(dataset: &Dataset, request: &FilterRequest, top_n: usize) -> Self {
        let tables = DerivedTables::compute(dataset, request);
        let means = tables.means();
        Report {
            country_means: tables.country_aggregates.iter().map(Into::into).collect(),
            comparison: tables.comparison.iter().map(Into::into).collect(),
            heatmap: tables.monthly_heat.iter().map(Into::into).collect(),
            trend: tables.regional_trend.iter().map(Into::into).collect(),
            series: tables.country_series.iter().map(Into::into).collect(),
            rankings: ranking_rows(&means, top_n),
            summary: summarize(request.product(), &means, &tables.regional_trend),
            tables,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Write every table into `dir`, plus the raw filtered subset. Returns
    /// the paths written.
    pub fn write_all(
        &self,
        dataset: &Dataset,
        request: &FilterRequest,
        dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let path = |name: &str| dir.join(name);
        write_csv(&path(COUNTRY_MEANS_FILE), &self.country_means)?;
        write_csv(&path(COMPARISON_FILE), &self.comparison)?;
        write_csv(&path(HEATMAP_FILE), &self.heatmap)?;
        write_csv(&path(TREND_FILE), &self.trend)?;
        write_csv(&path(SERIES_FILE), &self.series)?;
        write_csv(&path(RANKINGS_FILE), &self.rankings)?;
        export_filtered(&path(EXPORT_FILE), dataset, request)?;
        let mut written: Vec<PathBuf> = [
            COUNTRY_MEANS_FILE,
            COMPARISON_FILE,
            HEATMAP_FILE,
            TREND_FILE,
            SERIES_FILE,
            RANKINGS_FILE,
            EXPORT_FILE,
        ]
        .into_iter()
        .map(path)
        .collect();
        if let Some(summary) = &self.summary {
            write_json(&path(SUMMARY_FILE), summary)?;
            written.push(path(SUMMARY_FILE));
        }
        info!("Wrote {} report files to {}", written.len(), dir.display());
        Ok(written)
    }
}

/// Export the normalized records matching the filter. Returns the row count.
pub fn export_filtered(path: &Path, dataset: &Dataset, request: &FilterRequest) -> Result<usize> {
    let rows: Vec<ExportRow> = filtered_records(dataset.records(), request)
        .into_iter()
        .map(ExportRow::from)
        .collect();
    write_csv(path, &rows)?;
    Ok(rows.len())
}
