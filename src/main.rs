mod error;
mod fetch;
mod parser;
mod schema;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use settings::Settings;

#[derive(Parser)]
#[command(
    name = "bot-api-schema",
    about = "Extract a typed object/method schema from the Telegram Bot API documentation"
)]
struct Cli {
    /// Cached documentation page (downloaded on first run)
    #[arg(long)]
    html: Option<PathBuf>,
    /// Where to write the schema JSON
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(html) = cli.html {
        settings.cache_path = html;
    }
    if let Some(out) = cli.out {
        settings.schema_path = out;
    }
    info!(settings = ?settings, "Starting schema extraction");

    let html = fetch::load_or_fetch(&settings.doc_url, &settings.cache_path)?;
    let schema = parser::extract_schema(&html, &settings)
        .with_context(|| format!("Failed to parse {}", settings.cache_path.display()))?;
    let path = schema.write(&settings.schema_path)?;

    info!(
        "Wrote {} objects and {} methods in {:.1}s",
        schema.objects.len(),
        schema.methods.len(),
        t0.elapsed().as_secs_f64()
    );
    println!("{}", path.display());
    Ok(())
}
