use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::parser::numbers::extract_number;
use crate::parser::ResolvedRow;

/// Persisted numbers for one country. Notes are not written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceNumbers {
    pub police: Option<String>,
    pub medical: Option<String>,
    pub fire: Option<String>,
}

impl From<&ResolvedRow> for ServiceNumbers {
    fn from(row: &ResolvedRow) -> Self {
        ServiceNumbers {
            police: extract_number(row.police.as_deref()),
            medical: extract_number(row.medical.as_deref()),
            fire: extract_number(row.fire.as_deref()),
        }
    }
}

pub type ByAlpha2 = BTreeMap<String, ServiceNumbers>;

/// Normalize numbers and key by alpha2. A later row for the same code replaces an earlier one.
pub fn aggregate(rows: &[ResolvedRow]) -> ByAlpha2 {
    let mut map = ByAlpha2::new();
    for row in rows {
        if let Some(prev) = map.insert(row.alpha2.clone(), ServiceNumbers::from(row)) {
            debug!("Replacing earlier entry for {}: {:?}", row.alpha2, prev);
        }
    }
    map
}

/// Write the mapping as compact JSON, replacing any existing file.
pub async fn write_json(path: &Path, map: &ByAlpha2) -> Result<()> {
    let json = serde_json::to_string(map)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} countries to {}", map.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries::parse_registry;
    use crate::parser::{extract_rows, resolve::Resolver};
    use scraper::Html;

    fn row(alpha2: &str, police: &str, fire: &str, medical: &str) -> ResolvedRow {
        ResolvedRow {
            alpha2: alpha2.to_string(),
            police: Some(police.to_string()),
            fire: Some(fire.to_string()),
            medical: Some(medical.to_string()),
            notes: Some("ignored".to_string()),
        }
    }

    #[test]
    fn later_duplicate_wins() {
        let map = aggregate(&[row("GB", "999", "999", "999"), row("GB", "112", "113", "114")]);
        assert_eq!(map.len(), 1);
        assert_eq!(
            map["GB"],
            ServiceNumbers {
                police: Some("112".into()),
                medical: Some("114".into()),
                fire: Some("113".into()),
            }
        );
    }

    #[test]
    fn normalizes_each_field() {
        let mut r = row("DE", "110[3]", "112 (EU)", "Call 112");
        r.fire = None;
        let map = aggregate(&[r]);
        assert_eq!(map["DE"].police.as_deref(), Some("110"));
        assert_eq!(map["DE"].medical.as_deref(), Some("112"));
        assert_eq!(map["DE"].fire, None);
    }

    #[test]
    fn serializes_without_notes() {
        let map = aggregate(&[row("AW", "100", "100", "100")]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"AW":{"police":"100","medical":"100","fire":"100"}}"#);
    }

    #[test]
    fn nulls_are_written() {
        let map = aggregate(&[ResolvedRow {
            alpha2: "XK".into(),
            police: Some("192".into()),
            fire: None,
            medical: Some(String::new()),
            notes: None,
        }]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"XK":{"police":"192","medical":null,"fire":null}}"#);
    }

    #[tokio::test]
    async fn writes_single_country_document() {
        let doc = Html::parse_document(
            r#"<table class="wikitable"><tbody>
                 <tr><th>Country</th><th>Police</th><th>Fire</th><th>Ambulance</th><th>Notes</th></tr>
                 <tr><td>Aruba</td><td>100</td><td>100</td><td>100</td><td>see notes</td></tr>
               </tbody></table>"#,
        );
        let registry = parse_registry(&std::fs::read_to_string("tests/fixtures/countries.json").unwrap()).unwrap();
        let map = aggregate(&extract_rows(&doc, &Resolver::new(&registry)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("byAlpha2.json");
        write_json(&path, &map).await.unwrap();

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let expected: serde_json::Value =
            serde_json::from_str(r#"{"AW":{"police":"100","fire":"100","medical":"100"}}"#).unwrap();
        assert_eq!(written, expected);
    }

    #[tokio::test]
    async fn fixture_end_to_end_overwrites() {
        let html = std::fs::read_to_string("tests/fixtures/emergency_numbers.html").unwrap();
        let registry = parse_registry(&std::fs::read_to_string("tests/fixtures/countries.json").unwrap()).unwrap();
        let map = aggregate(&extract_rows(&Html::parse_document(&html), &Resolver::new(&registry)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("byAlpha2.json");
        std::fs::write(&path, r#"{"ZZ":{"police":"0","medical":"0","fire":"0"}}"#).unwrap();
        write_json(&path, &map).await.unwrap();

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let expected = serde_json::json!({
            "AW": {"police": "100", "medical": "100", "fire": "100"},
            "BS": {"police": "919", "medical": "919", "fire": "919"},
            "CD": {"police": "112", "medical": "114", "fire": "118"},
            "DE": {"police": "110", "medical": "112", "fire": "112"},
            "GB": {"police": "112", "medical": "112", "fire": "112"},
        });
        assert_eq!(written, expected);
    }

    #[tokio::test]
    async fn unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("byAlpha2.json");
        let err = write_json(&path, &ByAlpha2::new()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to write"));
    }
}
