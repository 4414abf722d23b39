// Runtime settings read from the environment (and `.env` when present).
use log::warn;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_SOURCE: &str = "fuel_prices.csv";
pub const DEFAULT_PRODUCT: &str = "Euro-super 95";
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: PathBuf,
    pub product: String,
    /// `None` selects every country.
    pub countries: Option<Vec<String>>,
    pub top_n: usize,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: PathBuf::from(DEFAULT_SOURCE),
            product: DEFAULT_PRODUCT.to_string(),
            countries: None,
            top_n: DEFAULT_TOP_N,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Config::default();
        if let Some(v) = get("FUEL_PRICES_CSV") {
            cfg.source = PathBuf::from(v);
        }
        if let Some(v) = get("FUEL_PRODUCT") {
            cfg.product = v;
        }
        if let Some(v) = get("FUEL_COUNTRIES") {
            cfg.countries = Some(parse_country_list(&v));
        }
        if let Some(v) = get("FUEL_TOP_N") {
            match v.parse::<usize>() {
                Ok(n) if n > 0 => cfg.top_n = n,
                _ => warn!("Ignoring FUEL_TOP_N={:?}; using {}", v, DEFAULT_TOP_N),
            }
        }
        if let Some(v) = get("FUEL_OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(v);
        }
        cfg
    }
}

/// Split `"IT, fr ,DE"` into `["IT", "FR", "DE"]`.
pub fn parse_country_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}
