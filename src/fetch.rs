use std::path::Path;

use anyhow::{Context, Result};
use reqwest::Client;
use scraper::Html;
use tracing::info;

use crate::countries::{self, CountryRecord};

pub const SOURCE_URL: &str = "https://en.wikipedia.org/wiki/List_of_emergency_telephone_numbers";
pub const REGISTRY_URL: &str = "https://raw.githubusercontent.com/mledoze/countries/master/countries.json";

/// Fetch a page and return its body. Non-2xx statuses are errors.
async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("Bad status from {}", url))?
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", url))
}

/// Load the source document, from a local file when given, otherwise over HTTP.
pub async fn load_document(client: &Client, url: &str, html_path: Option<&Path>) -> Result<Html> {
    let html = match html_path {
        Some(path) => {
            info!("Reading document from {}", path.display());
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => {
            info!("Fetching document: {}", url);
            fetch_text(client, url).await?
        }
    };
    Ok(Html::parse_document(&html))
}

/// Load the country registry, from a local file when given, otherwise over HTTP.
pub async fn load_registry(client: &Client, path: Option<&Path>) -> Result<Vec<CountryRecord>> {
    let json = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            info!("Fetching country registry: {}", REGISTRY_URL);
            fetch_text(client, REGISTRY_URL).await?
        }
    };
    let registry = countries::parse_registry(&json)?;
    info!("Loaded {} countries", registry.len());
    Ok(registry)
}
