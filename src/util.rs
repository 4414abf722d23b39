// Utility helpers for parsing and basic statistics.
//
// All the forgiving CSV/number/date handling lives here so the loader and
// aggregator can work with typed, optional values.
use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Day/month/year layout used by the price bulletin.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a price field into `f64`.
///
/// - Trims whitespace.
/// - Rejects values containing alphabetic characters (so `NaN`/`inf` never
///   sneak through `str::parse`).
/// - Rejects commas: `.` is the only decimal separator accepted.
/// - Returns `None` for anything else that does not parse to a finite number.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic() || c == ',') {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a `dd/mm/yyyy` date. The year must be exactly four digits;
/// chrono's `%Y` alone would read `01/02/24` as year 24.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    let (_, year) = s.rsplit_once('/')?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// `YYYY-MM` label used as the heatmap column key.
pub fn month_label(d: NaiveDate) -> String {
    format!("{:04}-{:02}", d.year(), d.month())
}

pub fn average(v: &[f64]) -> f64 {
    // Returns 0 for an empty slice to avoid NaNs; callers that must tell
    // "no data" apart check emptiness first.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Sample standard deviation (n - 1 denominator). `None` below two values.
pub fn sample_std_dev(v: &[f64]) -> Option<f64> {
    if v.len() < 2 {
        return None;
    }
    let mean = average(v);
    let var = v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (v.len() - 1) as f64;
    Some(var.sqrt())
}

/// Period-over-period percentage changes of a series.
///
/// Steps whose previous value is zero are skipped rather than producing
/// an infinite change.
pub fn pct_changes(v: &[f64]) -> Vec<f64> {
    v.windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .collect()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // 1234.5678 with 3 decimals -> "1,234.568"
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Render an optional value for a table cell, `n/a` when missing.
pub fn format_opt(n: Option<f64>, decimals: usize) -> String {
    n.map(|v| format_number(v, decimals))
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_prices() {
        assert_eq!(parse_f64_safe(Some("1.659")), Some(1.659));
        assert_eq!(parse_f64_safe(Some("  1659.20 ")), Some(1659.2));
        assert_eq!(parse_f64_safe(Some("-3")), Some(-3.0));
    }

    #[test]
    fn rejects_malformed_prices() {
        assert_eq!(parse_f64_safe(Some("abc")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(Some("inf")), None);
        assert_eq!(parse_f64_safe(Some("1,659")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn date_round_trips() {
        for (y, m, d) in [(2024, 1, 1), (2023, 12, 31), (2024, 2, 29), (1999, 7, 4)] {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            let text = format_date(date);
            assert_eq!(parse_date_safe(Some(&text)), Some(date));
        }
    }

    #[test]
    fn malformed_dates_are_none() {
        for s in [
            "",
            "2024-01-15",
            "32/01/2024",
            "29/02/2023",
            "15/13/2024",
            "yesterday",
            "01/02/24",
            "01/02/024",
            "01/02/+2024",
            "01/02/20245",
        ] {
            assert_eq!(parse_date_safe(Some(s)), None, "{s}");
        }
        assert_eq!(parse_date_safe(None), None);
    }

    #[test]
    fn year_must_have_four_digits() {
        assert_eq!(parse_date_safe(Some("01/02/24")), None);
        assert_eq!(
            parse_date_safe(Some(" 01/02/2024 ")),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
    }

    #[test]
    fn day_comes_first() {
        let d = parse_date_safe(Some("03/04/2024")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());
    }

    #[test]
    fn month_label_is_zero_padded() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(month_label(d), "2024-03");
    }

    #[test]
    fn std_dev_needs_two_values() {
        assert_eq!(sample_std_dev(&[]), None);
        assert_eq!(sample_std_dev(&[1.0]), None);
        let sd = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - 2.138_089_935).abs() < 1e-6);
    }

    #[test]
    fn pct_changes_skip_zero_base() {
        assert_eq!(pct_changes(&[100.0, 110.0]), vec![10.0]);
        assert_eq!(pct_changes(&[0.0, 5.0, 10.0]), vec![100.0]);
        assert!(pct_changes(&[1.0]).is_empty());
    }

    #[test]
    fn formats_numbers_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1.5, 1), "-1.5");
        assert_eq!(format_number(0.0, 3), "0.000");
        assert_eq!(format_number(12.0, 0), "12");
        assert_eq!(format_int(9855), "9,855");
        assert_eq!(format_opt(None, 2), "n/a");
    }
}
