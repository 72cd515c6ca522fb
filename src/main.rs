//! mailru_share CLI - Download every public share listed in a file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailru_share::config::{DEFAULT_DOWNLOAD_ROOT, DEFAULT_LINKS_FILE, DEFAULT_MAX_RETRIES};
use mailru_share::url_parser::read_link_list;
use mailru_share::{Config, RetryPolicy, ShareClient};

/// Download public Cloud Mail.ru shares listed in a text file.
#[derive(Parser)]
#[command(name = "mailru_share")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File with one share link per line.
    #[arg(long, default_value = DEFAULT_LINKS_FILE)]
    links: PathBuf,

    /// Directory the shares are mirrored into.
    #[arg(long, short = 'o', default_value = DEFAULT_DOWNLOAD_ROOT)]
    output: PathBuf,

    /// Retries after an empty download response.
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// List the files of each share without downloading them.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailru_share=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let links = read_link_list(&cli.links)
        .with_context(|| format!("Failed to read link list from {:?}", cli.links))?;

    let config = Config {
        download_root: cli.output,
        retry: RetryPolicy {
            max_retries: cli.max_retries,
            ..RetryPolicy::default()
        },
        ..Config::default()
    };
    let client = ShareClient::new(config);

    info!("Processing {} link(s)", links.len());

    let mut downloaded = 0;
    let mut failed = 0;

    for link in &links {
        match client.process_link(link, cli.dry_run).await {
            Ok(report) => {
                downloaded += report.downloaded;
                failed += report.failed;
            }
            Err(e) => warn!("Skipping {}: {}", link, e),
        }
    }

    info!("Done: {} downloaded, {} failed", downloaded, failed);

    Ok(())
}
