mod countries;
mod fetch;
mod output;
mod parser;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::info;

use parser::resolve::Resolver;

#[derive(Parser)]
#[command(
    name = "emergency-numbers",
    about = "Scrape emergency telephone numbers per country into byAlpha2.json"
)]
struct Cli {
    /// Page listing emergency numbers per country
    #[arg(long, env = "EMERGENCY_NUMBERS_URL", default_value = fetch::SOURCE_URL)]
    url: String,
    /// Read the page from a local HTML file instead of fetching it
    #[arg(long, env = "EMERGENCY_NUMBERS_HTML")]
    html: Option<PathBuf>,
    /// Country registry in world-countries JSON layout (downloaded when omitted)
    #[arg(long, env = "EMERGENCY_NUMBERS_COUNTRIES")]
    countries: Option<PathBuf>,
    /// Output file, relative to the working directory
    #[arg(short, long, env = "EMERGENCY_NUMBERS_OUTPUT", default_value = "byAlpha2.json")]
    output: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "off".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    info!("start");

    let client = reqwest::Client::new();
    let registry = fetch::load_registry(&client, cli.countries.as_deref()).await?;
    let doc = fetch::load_document(&client, &cli.url, cli.html.as_deref()).await?;

    let rows = parser::extract_rows(&doc, &Resolver::new(&registry));
    let by_alpha2 = output::aggregate(&rows);

    let path = std::env::current_dir()?.join(&cli.output);
    output::write_json(&path, &by_alpha2).await?;
    println!("Wrote {} countries to {}", by_alpha2.len(), path.display());

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("Done in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}
