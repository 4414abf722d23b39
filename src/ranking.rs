use crate::error::{PriceError, Result};
use crate::types::{KpiSummary, RankingRow, RegionalTrendPoint};
use crate::util::{format_number, pct_changes, sample_std_dev};

/// Overall mean, min and max across country means. `None` when empty.
pub fn overall_stats(means: &[(String, f64)]) -> Option<(f64, f64, f64)> {
    if means.is_empty() {
        return None;
    }
    let (mut min, mut max, mut sum) = (f64::MAX, f64::MIN, 0.0);
    for (_, m) in means {
        min = min.min(*m);
        max = max.max(*m);
        sum += m;
    }
    Some((sum / means.len() as f64, min, max))
}

/// The `k` most expensive countries, highest first. Ties keep input order.
pub fn top_n(means: &[(String, f64)], k: usize) -> Vec<(String, f64)> {
    let mut sorted = means.to_vec();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    sorted.truncate(k);
    sorted
}

/// The `k` cheapest countries, lowest first. Ties keep input order.
pub fn bottom_n(means: &[(String, f64)], k: usize) -> Vec<(String, f64)> {
    let mut sorted = means.to_vec();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
    sorted.truncate(k);
    sorted
}

/// Percent change between the last two points of the trend series.
pub fn week_over_week_variation(trend: &[RegionalTrendPoint]) -> Result<f64> {
    let [.., prev, last] = trend else {
        return Err(PriceError::InsufficientData {
            statistic: "week-over-week variation",
            required: 2,
            available: trend.len(),
        });
    };
    if prev.mean_price == 0.0 {
        return Err(PriceError::ZeroBaseline("week-over-week variation"));
    }
    Ok((last.mean_price - prev.mean_price) / prev.mean_price * 100.0)
}

/// Sample standard deviation of the period-over-period percent change.
pub fn monthly_volatility(trend: &[RegionalTrendPoint]) -> Result<f64> {
    let values: Vec<f64> = trend.iter().map(|p| p.mean_price).collect();
    let changes = pct_changes(&values);
    sample_std_dev(&changes).ok_or(PriceError::InsufficientData {
        statistic: "monthly volatility",
        required: 3,
        available: trend.len(),
    })
}

/// KPI summary for the current product; `None` when there are no country
/// means. Trend KPIs that cannot be computed are left as `None`.
pub fn summarize(
    product: &str,
    means: &[(String, f64)],
    trend: &[RegionalTrendPoint],
) -> Option<KpiSummary> {
    let (overall_mean, overall_min, overall_max) = overall_stats(means)?;
    Some(KpiSummary {
        product: product.to_string(),
        country_count: means.len(),
        overall_mean,
        overall_min,
        overall_max,
        week_over_week_variation: available(week_over_week_variation(trend)),
        monthly_volatility: available(monthly_volatility(trend)),
    })
}

fn available(stat: Result<f64>) -> Option<f64> {
    match stat {
        Ok(v) => Some(v),
        Err(e) => {
            log::info!("{}", e);
            None
        }
    }
}

/// Top and bottom lists flattened into rows for export.
pub fn ranking_rows(means: &[(String, f64)], k: usize) -> Vec<RankingRow> {
    let top = top_n(means, k).into_iter().enumerate().map(|(i, (c, m))| ("Top", i, c, m));
    let bottom = bottom_n(means, k)
        .into_iter()
        .enumerate()
        .map(|(i, (c, m))| ("Bottom", i, c, m));
    top.chain(bottom)
        .map(|(list, idx, country, mean)| RankingRow {
            list: list.to_string(),
            rank: idx + 1,
            country,
            mean_price: format_number(mean, 3),
        })
        .collect()
}
