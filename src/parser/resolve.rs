use std::sync::LazyLock;

use regex::Regex;

use crate::countries::CountryRecord;

static ARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[tT]he\s+").unwrap());

#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    Resolved(&'a CountryRecord),
    /// Zero or several candidates at the first tier that matched anything.
    Unresolved { candidates: Vec<&'a CountryRecord> },
}

/// Drop a leading "The "/"the " and surrounding whitespace.
pub fn clean_country_name(raw: &str) -> String {
    ARTICLE_RE.replace(raw.trim(), "").trim().to_string()
}

/// Matches free-text country names against the registry.
///
/// Tiers, first non-empty one wins:
/// 1. exact common or official name
/// 2. name is a substring of the common or official name
/// 3. name is a substring of an alternative spelling
///
/// A tier only resolves when it yields exactly one country.
pub struct Resolver<'a> {
    countries: &'a [CountryRecord],
}

impl<'a> Resolver<'a> {
    pub fn new(countries: &'a [CountryRecord]) -> Self {
        Resolver { countries }
    }

    pub fn resolve(&self, name: &str) -> Resolution<'a> {
        let tiers: [&dyn Fn(&CountryRecord) -> bool; 3] = [
            &|c: &CountryRecord| c.common_name == name || c.official_name == name,
            &|c: &CountryRecord| c.common_name.contains(name) || c.official_name.contains(name),
            &|c: &CountryRecord| c.alt_spellings.iter().any(|s| s.contains(name)),
        ];

        let mut candidates = Vec::new();
        for matches in tiers {
            candidates = self.countries.iter().filter(|&c| matches(c)).collect();
            if !candidates.is_empty() {
                break;
            }
        }

        if candidates.len() == 1 {
            Resolution::Resolved(candidates[0])
        } else {
            Resolution::Unresolved { candidates }
        }
    }
}
