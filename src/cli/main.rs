//! Command-line batch geocoder.
//!
//! Resolves a list of free-text addresses in order and prints coordinates,
//! or `null` markers in JSON mode for addresses that did not resolve.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use narra::config::Config;
use narra::provider::NominatimProvider;
use narra::rate_limit::RateLimiter;
use narra::AddressResolver;

#[derive(Parser, Debug)]
#[command(name = "narra")]
#[command(about = "Resolve free-text Philippine addresses to coordinates")]
struct Args {
    /// Addresses to resolve, in order
    #[arg(required = true)]
    addresses: Vec<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the provider base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Emit results as a JSON array
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(base_url) = args.base_url {
        config.provider.base_url = base_url;
    }

    info!(
        "Resolving {} address(es) via {}",
        args.addresses.len(),
        config.provider.base_url
    );

    let provider = NominatimProvider::new(
        &config.provider.base_url,
        &config.provider.country_code,
        &config.provider.country_name,
        &config.provider.user_agent,
        Duration::from_secs(config.limits.timeout_secs),
    );
    let rate_limiter = RateLimiter::new(Duration::from_millis(config.limits.min_interval_ms));
    let resolver = AddressResolver::new(
        provider,
        rate_limiter,
        &config.provider.country_name,
        config.bounds,
    );

    let results = resolver.geocode_addresses(&args.addresses).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for (address, result) in args.addresses.iter().zip(&results) {
            match result {
                Some(r) => println!("{} -> {:.6}, {:.6} ({})", address, r.lat, r.lng, r.display_name),
                None => println!("{} -> no result", address),
            }
        }
    }

    Ok(())
}
