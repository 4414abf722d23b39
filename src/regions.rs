// Static 2-letter -> 3-letter region code table.
//
// The 2-letter code is what the price bulletin uses to identify a country;
// the 3-letter ISO code is what map renderers key on.
use once_cell::sync::Lazy;
use std::collections::HashMap;

const REGION_CODES: &[(&str, &str)] = &[
    ("AT", "AUT"),
    ("BE", "BEL"),
    ("BG", "BGR"),
    ("CY", "CYP"),
    ("CZ", "CZE"),
    ("DE", "DEU"),
    ("DK", "DNK"),
    ("EE", "EST"),
    ("ES", "ESP"),
    ("FI", "FIN"),
    ("FR", "FRA"),
    ("GR", "GRC"),
    // EU bulletins use EL for Greece.
    ("EL", "GRC"),
    ("HR", "HRV"),
    ("HU", "HUN"),
    ("IE", "IRL"),
    ("IT", "ITA"),
    ("LT", "LTU"),
    ("LU", "LUX"),
    ("LV", "LVA"),
    ("MT", "MLT"),
    ("NL", "NLD"),
    ("PL", "POL"),
    ("PT", "PRT"),
    ("RO", "ROU"),
    ("SE", "SWE"),
    ("SI", "SVN"),
    ("SK", "SVK"),
];

static REGION_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| REGION_CODES.iter().copied().collect());

/// Look up the 3-letter code for a 2-letter country code.
///
/// Matching is exact after trimming; unknown codes yield `None`.
pub fn region_code_3(country: &str) -> Option<&'static str> {
    REGION_TABLE.get(country.trim()).copied()
}

pub fn known_countries() -> impl Iterator<Item = &'static str> {
    REGION_CODES.iter().map(|(code, _)| *code)
}
