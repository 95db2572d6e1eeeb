//! Review-Scout main entry point
//!
//! Command-line interface for the review-card discovery service.

use clap::Parser;
use review_scout::config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Review-Scout: review-card discovery for the open web
///
/// Serves ranked review cards for a topic (or a direct URL) by querying a
/// fallback chain of link-discovery sources and extracting main-content
/// excerpts from the proposed pages.
#[derive(Parser, Debug)]
#[command(name = "review-scout")]
#[command(version = "0.1.0")]
#[command(about = "Review-card discovery service", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address from the config file
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the effective settings without serving
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }

    if cli.dry_run {
        print_effective_config(&config);
        return Ok(());
    }

    tracing::info!(
        "Starting review-scout on {} ({} extraction workers)",
        config.server.bind_address,
        config.pipeline.max_concurrent_extractions
    );

    review_scout::server::serve(config).await?;
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("review_scout=info,warn"),
            1 => EnvFilter::new("review_scout=debug,info"),
            2 => EnvFilter::new("review_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Prints the effective configuration for --dry-run
fn print_effective_config(config: &review_scout::Config) {
    println!("=== Review-Scout Dry Run ===\n");

    println!("Server:");
    println!("  Bind address: {}", config.server.bind_address);
    println!("  Allowed origin: {}", config.server.allowed_origin);

    println!("\nFetch:");
    println!("  Connect timeout: {}s", config.fetch.connect_timeout_secs);
    println!("  Request timeout: {}s", config.fetch.request_timeout_secs);
    println!(
        "  Retries: {} attempts, delays {:?}ms",
        config.fetch.retry.max_attempts, config.fetch.retry.delays_ms
    );

    println!("\nPipeline:");
    println!(
        "  Extraction workers: {}",
        config.pipeline.max_concurrent_extractions
    );
    println!("  Over-ask factor: {}", config.pipeline.over_ask_factor);

    println!("\nDiscovery sources:");
    println!(
        "  LLM proposer: {} (model {}, key {})",
        config.discovery.llm.api_base,
        config.discovery.llm.model,
        presence(config.discovery.llm.api_key.is_some())
    );
    println!(
        "  Keyed search: {} (key {})",
        config.discovery.serper.api_base,
        presence(config.discovery.serper.api_key.is_some())
    );
    println!(
        "  Instant answer: {} ({})",
        config.discovery.instant.api_base,
        if config.discovery.instant.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    println!("\n✓ Configuration is valid");
}

fn presence(present: bool) -> &'static str {
    if present {
        "set"
    } else {
        "not set"
    }
}
