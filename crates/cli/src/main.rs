//! httpcache-info: inspect a single cached response.
//!
//! Looks an entry up by the URL it was requested with, prints its metadata
//! and expiry status, and optionally writes the body to a file. The cache
//! is never modified. Logging goes to stderr so stdout stays clean for the
//! report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use httpcache_core::cache::compute_cache_key;
use httpcache_core::{AppConfig, CacheDb, EntryCache, PolicySet};
use tracing_subscriber::EnvFilter;

mod report;

#[derive(Parser, Debug)]
#[command(name = "httpcache-info")]
#[command(version)]
#[command(about = "Show the cached entry for a URL", long_about = None)]
struct Cli {
    /// URL to look up, exactly as it was requested
    #[arg(short, long)]
    url: String,

    /// Write the cached body to this file
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Cache directory (overrides HTTPCACHE_CACHE_DIR)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Policy file used to judge freshness (overrides HTTPCACHE_POLICIES_FILE)
    #[arg(long)]
    policies_file: Option<PathBuf>,

    /// Number of body characters to preview
    #[arg(long, default_value_t = 200)]
    preview_chars: usize,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load().context("failed to load configuration")?;
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = dir;
    }
    if let Some(file) = cli.policies_file {
        config.policies_file = Some(file);
    }

    let store_path = config.store_path();
    if !store_path.exists() {
        println!("No cache found at {}", store_path.display());
        return Ok(());
    }

    let policies = PolicySet::load(config.policies_file.as_deref()).context("failed to load cache policies")?;
    let store = CacheDb::open_read_only(&store_path)
        .await
        .with_context(|| format!("failed to open cache store {}", store_path.display()))?;
    let entries = EntryCache::new(std::sync::Arc::new(store), std::sync::Arc::new(policies));

    let key = compute_cache_key(&cli.url);
    tracing::debug!(key = %key, url = %cli.url, "looking up cache entry");

    let found = entries.peek(&key).await.context("error reading from cache")?;
    let Some((entry, freshness)) = found else {
        println!("No cache entry found for URL: {}", cli.url);
        entries.close().await?;
        return Ok(());
    };

    print!("{}", report::render(&key, &entry, &freshness, chrono::Utc::now(), cli.preview_chars));

    if let Some(outfile) = cli.outfile {
        std::fs::write(&outfile, &entry.data)
            .with_context(|| format!("error writing to output file {}", outfile.display()))?;
        println!("Cache content saved to: {}", outfile.display());
    }

    if freshness.expired {
        println!("Note: This cache entry is expired");
    }

    entries.close().await?;
    Ok(())
}
