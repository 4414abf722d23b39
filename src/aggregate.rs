use crate::dataset::Dataset;
use crate::types::{
    CountryAggregate, MonthlyHeatCell, PriceRecord, RegionalTrendPoint, SeriesPoint,
};
use crate::util::month_label;
use chrono::NaiveDate;
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

/// Which records feed the regional trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendScope {
    /// Only the product being viewed.
    #[default]
    SelectedProduct,
    /// Every product in the dataset.
    AllProducts,
}

/// Filter state the derived tables are computed for.
///
/// ```ignore
/// let req = FilterRequest::new("Euro-super 95").countries(["IT", "FR"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    product: String,
    countries: Option<BTreeSet<String>>,
    trend_scope: TrendScope,
}

impl FilterRequest {
    pub fn new(product: impl Into<String>) -> Self {
        FilterRequest {
            product: product.into(),
            countries: None,
            trend_scope: TrendScope::default(),
        }
    }

    /// Restrict per-country views to these codes. An empty selection means
    /// no country is selected.
    pub fn countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = Some(countries.into_iter().map(Into::into).collect());
        self
    }

    pub fn trend_scope(mut self, scope: TrendScope) -> Self {
        self.trend_scope = scope;
        self
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn scope(&self) -> TrendScope {
        self.trend_scope
    }

    pub fn matches_product(&self, r: &PriceRecord) -> bool {
        r.product == self.product
    }

    pub fn matches_country(&self, country: &str) -> bool {
        self.countries
            .as_ref()
            .map_or(true, |set| set.contains(country))
    }

    pub fn matches(&self, r: &PriceRecord) -> bool {
        self.matches_product(r) && self.matches_country(&r.country)
    }
}

#[derive(Default, Clone, Copy)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    fn mean(self) -> f64 {
        self.sum / self.count as f64
    }
}

fn means<K: Ord>(map: BTreeMap<K, MeanAcc>) -> impl Iterator<Item = (K, f64)> {
    // Keys only exist once a value was pushed, so count is never zero.
    map.into_iter().map(|(k, acc)| (k, acc.mean()))
}

/// Mean price per country over non-null prices of `product`.
///
/// Countries with no usable price do not appear.
pub fn country_means(records: &[PriceRecord], product: &str) -> BTreeMap<String, f64> {
    let mut map: BTreeMap<String, MeanAcc> = BTreeMap::new();
    for r in records.iter().filter(|r| r.product == product) {
        if let Some(p) = r.price {
            map.entry(r.country.clone()).or_default().push(p);
        }
    }
    means(map).collect()
}

/// Each country mean as a percentage of the unweighted mean of all
/// country means.
pub fn relative_to_mean(means: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    if means.is_empty() {
        return BTreeMap::new();
    }
    let overall = means.values().sum::<f64>() / means.len() as f64;
    means
        .iter()
        .map(|(c, m)| {
            let rel = if overall == 0.0 { 0.0 } else { m / overall * 100.0 };
            (c.clone(), rel)
        })
        .collect()
}

/// Map-ready rows: mean, 3-letter code and relative-to-mean, ordered by
/// country code.
pub fn country_aggregates(records: &[PriceRecord], product: &str) -> Vec<CountryAggregate> {
    let means = country_means(records, product);
    let relative = relative_to_mean(&means);
    let codes: BTreeMap<&str, Option<&'static str>> = records
        .iter()
        .map(|r| (r.country.as_str(), r.region_code_3))
        .collect();
    means
        .into_iter()
        .map(|(country, mean_price)| CountryAggregate {
            region_code_3: codes.get(country.as_str()).copied().flatten(),
            relative_to_regional_mean: relative.get(&country).copied().unwrap_or(0.0),
            country,
            mean_price,
        })
        .collect()
}

/// Mean price per (country, `YYYY-MM`) over records matching the filter
/// with both date and price present.
pub fn monthly_heat(records: &[PriceRecord], request: &FilterRequest) -> Vec<MonthlyHeatCell> {
    let mut map: BTreeMap<(String, String), MeanAcc> = BTreeMap::new();
    for r in records.iter().filter(|r| request.matches(r)) {
        if let Some((date, price)) = r.observation() {
            map.entry((r.country.clone(), month_label(date)))
                .or_default()
                .push(price);
        }
    }
    means(map)
        .map(|((country, month), mean_price)| MonthlyHeatCell {
            country,
            month,
            mean_price,
        })
        .collect()
}

/// Mean price per date across countries, ascending by date.
///
/// Ignores the country selection; the product filter applies unless
/// `scope` is `AllProducts`.
pub fn regional_trend(
    records: &[PriceRecord],
    product: &str,
    scope: TrendScope,
) -> Vec<RegionalTrendPoint> {
    let mut map: BTreeMap<NaiveDate, MeanAcc> = BTreeMap::new();
    let in_scope = |r: &&PriceRecord| scope == TrendScope::AllProducts || r.product == product;
    for r in records.iter().filter(in_scope) {
        if let Some((date, price)) = r.observation() {
            map.entry(date).or_default().push(price);
        }
    }
    means(map)
        .map(|(date, mean_price)| RegionalTrendPoint { date, mean_price })
        .collect()
}

/// Per-country time series for the selected countries, ordered by country
/// then date.
pub fn country_series(records: &[PriceRecord], request: &FilterRequest) -> Vec<SeriesPoint> {
    let mut map: BTreeMap<(String, NaiveDate), MeanAcc> = BTreeMap::new();
    for r in records.iter().filter(|r| request.matches(r)) {
        if let Some((date, price)) = r.observation() {
            map.entry((r.country.clone(), date)).or_default().push(price);
        }
    }
    means(map)
        .map(|((country, date), mean_price)| SeriesPoint {
            country,
            date,
            mean_price,
        })
        .collect()
}

/// Every normalized record matching the filter, nulls included, in load
/// order.
pub fn filtered_records<'a>(
    records: &'a [PriceRecord],
    request: &FilterRequest,
) -> Vec<&'a PriceRecord> {
    records.iter().filter(|r| request.matches(r)).collect()
}

/// All derived tables for one filter state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedTables {
    /// All countries with a usable price for the product (map view).
    pub country_aggregates: Vec<CountryAggregate>,
    /// Selected countries only, highest mean first.
    pub comparison: Vec<CountryAggregate>,
    pub monthly_heat: Vec<MonthlyHeatCell>,
    pub regional_trend: Vec<RegionalTrendPoint>,
    pub country_series: Vec<SeriesPoint>,
}

impl DerivedTables {
    pub fn compute(dataset: &Dataset, request: &FilterRequest) -> Self {
        let records = dataset.records();
        let country_aggregates = country_aggregates(records, request.product());
        if country_aggregates.is_empty() {
            info!("No prices for product {:?}; nothing to derive", request.product());
            return DerivedTables::default();
        }

        let mut comparison: Vec<CountryAggregate> = country_aggregates
            .iter()
            .filter(|a| request.matches_country(&a.country))
            .cloned()
            .collect();
        // Stable: equal means keep country-code order.
        comparison.sort_by(|a, b| b.mean_price.total_cmp(&a.mean_price));

        let tables = DerivedTables {
            monthly_heat: monthly_heat(records, request),
            regional_trend: regional_trend(records, request.product(), request.scope()),
            country_series: country_series(records, request),
            comparison,
            country_aggregates,
        };
        debug!(
            "Derived {} country means, {} heat cells, {} trend points, {} series points",
            tables.country_aggregates.len(),
            tables.monthly_heat.len(),
            tables.regional_trend.len(),
            tables.country_series.len()
        );
        tables
    }

    pub fn is_empty(&self) -> bool {
        self.country_aggregates.is_empty()
    }

    /// Country means in country-code order, as fed to the ranker.
    pub fn means(&self) -> Vec<(String, f64)> {
        self.country_aggregates
            .iter()
            .map(|a| (a.country.clone(), a.mean_price))
            .collect()
    }
}
