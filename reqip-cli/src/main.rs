//! reqip CLI
//!
//! Looks up the public IP address, caching the answer in a JSON file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reqip_core::constants::{DEFAULT_ENDPOINT, LAST_RESPONSE_DATA_KEY, LAST_RESPONSE_TIME_KEY};
use reqip_core::traits::{Clock, SystemClock};
use reqip_core::CachedRecord;
use reqip_fetch::{IpifyClient, IpifyConfig};
use reqip_resolver::{AddressResolver, ConfigStore, ResolverConfig};
use reqip_store::FileStore;

/// reqip - cached public IP address lookup
#[derive(Parser)]
#[command(name = "reqip")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file holding the cached address
    #[arg(long, global = true, env = "REQIP_STORE_PATH", default_value = "reqip-cache.json")]
    store: PathBuf,

    /// How long a cached address stays valid, in milliseconds
    #[arg(long, global = true, env = "REQIP_RETENTION_MS", default_value_t = 3_600_000)]
    retention_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the public address, fetching it if the cache has expired
    Lookup {
        /// Address-echo endpoint
        #[arg(long, env = "REQIP_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
        /// Request timeout in seconds (transport default when unset)
        #[arg(long, env = "REQIP_TIMEOUT_SECONDS")]
        timeout_seconds: Option<u64>,
    },

    /// Show the cached address without touching the network
    Show,

    /// Remove the cached address
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "reqip=debug,info"
    } else {
        "reqip=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Lookup {
            endpoint,
            timeout_seconds,
        } => {
            let config = IpifyConfig {
                endpoint,
                timeout_seconds,
            };
            cmd_lookup(&cli.store, cli.retention_ms, config).await
        }
        Commands::Show => cmd_show(&cli.store, cli.retention_ms).await,
        Commands::Clear => cmd_clear(&cli.store).await,
    }
}

async fn open_store(store_path: &Path) -> Result<FileStore> {
    FileStore::open(store_path)
        .await
        .with_context(|| format!("Failed to open cache file {}", store_path.display()))
}

/// Reads the cached record straight from the file, without a resolver
async fn read_cached(store_path: &Path) -> Result<CachedRecord> {
    let store = open_store(store_path).await?;
    CachedRecord::load(&store)
        .await
        .context("Failed to read cache")
}

/// Look up the public address
async fn cmd_lookup(store_path: &Path, retention_ms: u64, config: IpifyConfig) -> Result<()> {
    debug!(endpoint = %config.endpoint, retention_ms, "Looking up public address");

    let client = IpifyClient::with_config(config).context("Invalid endpoint configuration")?;
    let store = open_store(store_path).await?;
    let configs = ConfigStore::initialized(ResolverConfig::new(Arc::new(store), retention_ms));
    let resolver = AddressResolver::from_source(configs, Arc::new(client));

    match resolver.request_ip().await.context("Lookup failed")? {
        Some(address) => {
            println!("{}", address);
            Ok(())
        }
        None => bail!("address could not be determined"),
    }
}

/// Show the cached record
async fn cmd_show(store_path: &Path, retention_ms: u64) -> Result<()> {
    let record = read_cached(store_path).await?;

    if record.is_empty() {
        println!("{}", "No cached address.".yellow());
        return Ok(());
    }

    let now_ms = SystemClock.now_millis();
    let status = if record.is_fresh(now_ms, retention_ms) {
        "fresh".green()
    } else {
        "expired".red()
    };

    println!(
        "   {} {}",
        "Address:".dimmed(),
        record.address.as_deref().unwrap_or("-")
    );
    println!(
        "   {} {}",
        "Fetched at:".dimmed(),
        record.fetched_at.as_deref().unwrap_or("-")
    );
    if let Some(age_ms) = record.age_millis(now_ms) {
        println!(
            "   {} {}",
            "Age:".dimmed(),
            format_age(chrono::Duration::milliseconds(age_ms))
        );
    }
    println!("   {} {}", "Status:".dimmed(), status);

    Ok(())
}

/// Remove cached entries
async fn cmd_clear(store_path: &Path) -> Result<()> {
    let store = open_store(store_path).await?;

    let address = store.remove(LAST_RESPONSE_DATA_KEY).await?;
    store.remove(LAST_RESPONSE_TIME_KEY).await?;

    match address {
        Some(address) => println!("{} {}", "Cleared cached address".green(), address),
        None => println!("{}", "Cache already empty.".yellow()),
    }

    Ok(())
}

fn format_age(age: chrono::Duration) -> String {
    if age < chrono::Duration::zero() {
        return "in the future (clock skew)".into();
    }

    let secs = age.num_seconds();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
