use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use coursefinder::config::{Config, DEFAULT_KEYWORDS};
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(
    name = "coursefinder",
    version,
    about = "Search the course catalog for topic keywords and export a CSV sheet"
)]
struct Cli {
    /// Keywords to search for; the built-in AI topic list when omitted.
    #[arg(value_name = "KEYWORD")]
    keywords: Vec<String>,

    /// Report path (overrides COURSEFINDER_OUTPUT).
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Catalog root URL (overrides COURSEFINDER_BASE_URL).
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds (overrides COURSEFINDER_REQUEST_TIMEOUT_SECS).
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Skip the pre-enrichment summary report.
    #[arg(long)]
    no_interim: bool,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url)?;
        }
        if let Some(output) = &self.output {
            config = config.with_output_path(output);
        }
        if let Some(secs) = self.timeout {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if self.no_interim {
            config = config.with_interim_report(false);
        }
        Ok(config)
    }

    fn keywords(&self) -> Vec<String> {
        if self.keywords.is_empty() {
            DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
        } else {
            self.keywords.clone()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config().context("invalid configuration")?;
    let keywords = cli.keywords();

    // The search runs on its own task; this one only prints its progress.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let search = tokio::spawn(async move { coursefinder::run(&config, &keywords, &tx).await });

    while let Some(message) = rx.recv().await {
        println!("{message}");
    }

    let summary = search.await.context("search task panicked")??;
    println!(
        "{} keyword(s), {} listing(s), {} course(s) written to {}",
        summary.keywords,
        summary.raw_rows,
        summary.courses,
        summary.output_path.display()
    );
    Ok(())
}
