use crate::dataset::Dataset;
use crate::error::{PriceError, Result};
use crate::regions::region_code_3;
use crate::types::{PriceRecord, RawRow};
use crate::util::{parse_date_safe, parse_f64_safe};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows the CSV layer could not decode or that carry no country/product.
    pub skipped_rows: usize,
    pub null_dates: usize,
    pub null_prices: usize,
    /// Distinct country codes absent from the region table.
    pub unmapped_countries: Vec<String>,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Load and normalize the price CSV.
///
/// A missing path is `SourceNotFound`; a file that yields no records is
/// `EmptySource`; read failures surface as `Csv` I/O errors. Bad
/// dates/prices and unknown countries are nulled on the record, never fatal.
pub fn load_prices<P: AsRef<Path>>(path: P) -> Result<(Dataset, LoadReport)> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PriceError::SourceNotFound(path.to_path_buf()));
    }
    let rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_path(path)?;
    let (records, report) = normalize(rdr)?;
    if records.is_empty() {
        return Err(PriceError::EmptySource(path.to_path_buf()));
    }
    info!(
        "Loaded {} price records from {} ({} skipped, {} null dates, {} null prices)",
        report.loaded_rows,
        path.display(),
        report.skipped_rows,
        report.null_dates,
        report.null_prices
    );
    Ok((Dataset::new(records), report))
}

fn normalize<R: std::io::Read>(
    mut rdr: csv::Reader<R>,
) -> Result<(Vec<PriceRecord>, LoadReport)> {
    let mut report = LoadReport::default();
    let mut unmapped: BTreeSet<String> = BTreeSet::new();
    let mut records: Vec<PriceRecord> = Vec::new();

    // Header read failures (unreadable file, directory) are fatal.
    rdr.headers()?;
    for (line, result) in rdr.deserialize::<RawRow>().enumerate() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!("Skipping row {}: {}", line + 1, e);
                report.skipped_rows += 1;
                continue;
            }
        };

        let (Some(country), Some(product)) = (non_empty(row.country), non_empty(row.product))
        else {
            debug!("Skipping row {}: missing country or product", line + 1);
            report.skipped_rows += 1;
            continue;
        };

        let date = parse_date_safe(row.date.as_deref());
        if date.is_none() {
            debug!("Row {}: unparsable date {:?}", line + 1, row.date);
            report.null_dates += 1;
        }
        let price = parse_f64_safe(row.price.as_deref());
        if price.is_none() {
            debug!("Row {}: unparsable price {:?}", line + 1, row.price);
            report.null_prices += 1;
        }

        let code_3 = region_code_3(&country);
        if code_3.is_none() && unmapped.insert(country.clone()) {
            warn!("Country code {} has no region mapping", country);
        }

        records.push(PriceRecord {
            country,
            region_code_3: code_3,
            product,
            date,
            price,
        });
    }

    report.loaded_rows = records.len();
    report.unmapped_countries = unmapped.into_iter().collect();
    Ok((records, report))
}
