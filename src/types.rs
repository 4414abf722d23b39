use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::util::{format_date, format_number, format_opt};

/// One CSV row as read from disk. Every field is optional text; coercion
/// happens in the loader.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Product")]
    pub product: Option<String>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<String>,
}

/// A normalized price observation. Unparsable date/price and unmapped
/// countries are kept as `None` rather than dropping the row.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub country: String,
    pub region_code_3: Option<&'static str>,
    pub product: String,
    pub date: Option<NaiveDate>,
    pub price: Option<f64>,
}

impl PriceRecord {
    /// Date and price both present.
    pub fn observation(&self) -> Option<(NaiveDate, f64)> {
        Some((self.date?, self.price?))
    }
}

/// Export shape of a `PriceRecord`; nulls render as empty cells.
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    #[serde(rename = "Country")]
    pub country: &'a str,
    #[serde(rename = "RegionCode3")]
    pub region_code_3: Option<&'a str>,
    #[serde(rename = "Product")]
    pub product: &'a str,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
}

impl<'a> From<&'a PriceRecord> for ExportRow<'a> {
    fn from(r: &'a PriceRecord) -> Self {
        ExportRow {
            country: &r.country,
            region_code_3: r.region_code_3,
            product: &r.product,
            date: r.date.map(format_date),
            price: r.price,
        }
    }
}

/// Per-country aggregate for the comparison and map views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryAggregate {
    pub country: String,
    pub region_code_3: Option<&'static str>,
    pub mean_price: f64,
    pub relative_to_regional_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyHeatCell {
    pub country: String,
    pub month: String,
    pub mean_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalTrendPoint {
    pub date: NaiveDate,
    pub mean_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub country: String,
    pub date: NaiveDate,
    pub mean_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub product: String,
    pub country_count: usize,
    pub overall_mean: f64,
    pub overall_min: f64,
    pub overall_max: f64,
    /// `None` when the trend series is too short or the baseline is zero.
    pub week_over_week_variation: Option<f64>,
    pub monthly_volatility: Option<f64>,
}

// Table rows below are pre-formatted for CSV export and console preview.

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CountryMeanRow {
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "RegionCode3")]
    #[tabled(rename = "RegionCode3")]
    pub region_code_3: String,
    #[serde(rename = "MeanPrice")]
    #[tabled(rename = "MeanPrice")]
    pub mean_price: String,
    #[serde(rename = "RelativeToMean")]
    #[tabled(rename = "RelativeToMean")]
    pub relative_to_mean: String,
}

impl From<&CountryAggregate> for CountryMeanRow {
    fn from(a: &CountryAggregate) -> Self {
        CountryMeanRow {
            country: a.country.clone(),
            region_code_3: a.region_code_3.unwrap_or("").to_string(),
            mean_price: format_number(a.mean_price, 3),
            relative_to_mean: format_number(a.relative_to_regional_mean, 2),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MonthlyHeatRow {
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "MeanPrice")]
    #[tabled(rename = "MeanPrice")]
    pub mean_price: String,
}

impl From<&MonthlyHeatCell> for MonthlyHeatRow {
    fn from(c: &MonthlyHeatCell) -> Self {
        MonthlyHeatRow {
            country: c.country.clone(),
            month: c.month.clone(),
            mean_price: format_number(c.mean_price, 3),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "MeanPrice")]
    #[tabled(rename = "MeanPrice")]
    pub mean_price: String,
}

impl From<&RegionalTrendPoint> for TrendRow {
    fn from(p: &RegionalTrendPoint) -> Self {
        TrendRow {
            date: format_date(p.date),
            mean_price: format_number(p.mean_price, 3),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SeriesRow {
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "MeanPrice")]
    #[tabled(rename = "MeanPrice")]
    pub mean_price: String,
}

impl From<&SeriesPoint> for SeriesRow {
    fn from(p: &SeriesPoint) -> Self {
        SeriesRow {
            country: p.country.clone(),
            date: format_date(p.date),
            mean_price: format_number(p.mean_price, 3),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RankingRow {
    #[serde(rename = "List")]
    #[tabled(rename = "List")]
    pub list: String,
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "MeanPrice")]
    #[tabled(rename = "MeanPrice")]
    pub mean_price: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct KpiRow {
    #[serde(rename = "Mean")]
    #[tabled(rename = "Mean")]
    pub mean: String,
    #[serde(rename = "Min")]
    #[tabled(rename = "Min")]
    pub min: String,
    #[serde(rename = "Max")]
    #[tabled(rename = "Max")]
    pub max: String,
    #[serde(rename = "WoW%")]
    #[tabled(rename = "WoW%")]
    pub week_over_week: String,
    #[serde(rename = "Volatility%")]
    #[tabled(rename = "Volatility%")]
    pub volatility: String,
}

impl From<&KpiSummary> for KpiRow {
    fn from(k: &KpiSummary) -> Self {
        KpiRow {
            mean: format_number(k.overall_mean, 3),
            min: format_number(k.overall_min, 3),
            max: format_number(k.overall_max, 3),
            week_over_week: format_opt(k.week_over_week_variation, 2),
            volatility: format_opt(k.monthly_volatility, 2),
        }
    }
}
