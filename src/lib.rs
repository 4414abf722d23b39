//! Fuel price loading, aggregation and ranking.
//!
//! Raw `Country,Product,Date,Price` rows are normalized by [`loader`],
//! grouped into per-country, per-month and per-date tables by
//! [`aggregate`], and summarized by [`ranking`]. [`reports`] ties the three
//! together for one filter state and exports the results.
pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod output;
pub mod ranking;
pub mod regions;
pub mod reports;
pub mod types;
pub mod util;

pub use aggregate::{DerivedTables, FilterRequest, TrendScope};
pub use config::Config;
pub use dataset::{Dataset, DatasetCache};
pub use error::{PriceError, Result};
pub use loader::{load_prices, LoadReport};
pub use reports::Report;
pub use types::{CountryAggregate, KpiSummary, MonthlyHeatCell, PriceRecord, RegionalTrendPoint};
