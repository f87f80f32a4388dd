pub mod numbers;
pub mod resolve;
pub mod tables;

use scraper::Html;
use tracing::{debug, info, warn};

use resolve::{Resolution, Resolver};
use tables::RowDefect;

/// A body row whose country resolved to exactly one registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRow {
    pub alpha2: String,
    pub police: Option<String>,
    pub fire: Option<String>,
    pub medical: Option<String>,
    pub notes: Option<String>,
}

/// Three-stage pipeline: tables → raw rows → resolved rows, in document order.
pub fn extract_rows(doc: &Html, resolver: &Resolver) -> Vec<ResolvedRow> {
    let selected = tables::select_tables(doc);
    info!("Selected {} tables with a Police column", selected.len());

    let mut rows = Vec::new();
    for (t, table) in selected.into_iter().enumerate() {
        let headers = tables::header_fields(table);
        if headers.len() < 5 {
            warn!("Skipping table {}: only {} usable headers {:?}", t, headers.len(), headers);
            continue;
        }

        for row in tables::body_rows(table) {
            let cells = tables::row_cells(row);
            let record = match tables::map_row(&headers, &cells) {
                Ok(record) => record,
                Err(RowDefect::Empty) => continue,
                Err(defect) => {
                    let name = cells.first().map(|c| c.text.as_str()).unwrap_or_default();
                    debug!("Dropping malformed row {:?} in table {}: {}", name, t, defect);
                    continue;
                }
            };

            let name = resolve::clean_country_name(&record.country);
            match resolver.resolve(&name) {
                Resolution::Resolved(country) => {
                    let resolved = ResolvedRow {
                        alpha2: country.alpha2.clone(),
                        police: record.police,
                        fire: record.fire,
                        medical: record.ambulance,
                        notes: record.notes,
                    };
                    debug!("Data for {}: {:?}", name, resolved);
                    rows.push(resolved);
                }
                Resolution::Unresolved { candidates } => {
                    let codes: Vec<&str> = candidates.iter().map(|c| c.alpha2.as_str()).collect();
                    debug!("Cannot determine country for name {:?}, matched {:?}", name, codes);
                }
            }
        }
    }

    info!("Resolved {} rows", rows.len());
    rows
}

// ── Tests ──
