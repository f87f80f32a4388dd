use anyhow::{Context, Result};
use serde::Deserialize;

/// One entry of the country registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawCountry")]
pub struct CountryRecord {
    pub common_name: String,
    pub official_name: String,
    pub alpha2: String,
    pub alt_spellings: Vec<String>,
}

// world-countries layout; everything we don't read is ignored.
#[derive(Deserialize)]
struct RawCountry {
    name: RawName,
    cca2: String,
    #[serde(rename = "altSpellings", default)]
    alt_spellings: Vec<String>,
}

#[derive(Deserialize)]
struct RawName {
    common: String,
    official: String,
}

impl From<RawCountry> for CountryRecord {
    fn from(raw: RawCountry) -> Self {
        CountryRecord {
            common_name: raw.name.common,
            official_name: raw.name.official,
            alpha2: raw.cca2,
            alt_spellings: raw.alt_spellings,
        }
    }
}

/// Parse a registry from world-countries JSON (an array of country objects).
pub fn parse_registry(json: &str) -> Result<Vec<CountryRecord>> {
    serde_json::from_str(json).context("Failed to parse country registry")
}
