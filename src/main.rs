//! Contact-Ripple main entry point
//!
//! This is the command-line interface for the Contact-Ripple email finder.

use anyhow::Context;
use clap::{Parser, Subcommand};
use contact_ripple::api::{self, parse_request, AppState};
use contact_ripple::batch::{BatchOptions, BatchRunner};
use contact_ripple::config::{load_config_with_hash, Config};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Contact-Ripple: a contact email finder
///
/// Contact-Ripple crawls each website breadth-first from its homepage and
/// reports the first email address it finds.
#[derive(Parser, Debug)]
#[command(name = "contact-ripple")]
#[command(version)]
#[command(about = "Find a contact email for each of a batch of websites", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Path to TOML configuration file
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Address to listen on (overrides the config file)
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Process a JSON file of websites once and print the result
    Scan {
        /// JSON array of records, or an object with a `websites` array
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Path to TOML configuration file
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Use the cooperative single-task scheduler instead of the worker pool
        #[arg(long)]
        sequential: bool,

        /// Maximum number of sites crawled at once
        #[arg(long, value_name = "N")]
        max_workers: Option<usize>,

        /// Page ceiling per site
        #[arg(long, value_name = "N")]
        max_pages: Option<usize>,
    },

    /// Validate a configuration file and show the effective settings
    CheckConfig {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Serve { config, bind } => handle_serve(config.as_deref(), bind).await,
        Command::Scan {
            input,
            config,
            sequential,
            max_workers,
            max_pages,
        } => {
            let config = load_or_default(config.as_deref())?;
            let mut options = BatchOptions::from_config(&config.crawler);
            if sequential {
                options.concurrent = false;
            }
            if let Some(n) = max_workers {
                options.max_workers = n;
            }
            options.max_pages = max_pages;
            handle_scan(&config, &input, options).await
        }
        Command::CheckConfig { config } => handle_check_config(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("contact_ripple=info,warn"),
            1 => EnvFilter::new("contact_ripple=debug,info"),
            2 => EnvFilter::new("contact_ripple=trace,tower_http=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file if one was given, defaults otherwise
fn load_or_default(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the `serve` command: runs the HTTP API
async fn handle_serve(config_path: Option<&Path>, bind: Option<String>) -> anyhow::Result<()> {
    let config = load_or_default(config_path)?;
    let bind = bind.unwrap_or_else(|| config.server.bind_address.clone());

    let runner = BatchRunner::from_config(&config)?;
    let state = AppState::new(runner, BatchOptions::from_config(&config.crawler));

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;

    api::serve(listener, state).await?;
    Ok(())
}

/// Handles the `scan` command: one batch from a file, JSON to stdout
async fn handle_scan(config: &Config, input: &Path, defaults: BatchOptions) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", input.display()))?;

    // A bare array is shorthand for {"websites": [...]}
    let body = if value.is_array() {
        json!({ "websites": value })
    } else {
        value
    };

    let (records, options) = parse_request(&body, &defaults)?;
    tracing::info!("Loaded {} website(s) from {}", records.len(), input.display());

    let runner = BatchRunner::from_config(config)?;
    let result = runner.run_batch(records, &options).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Handles the `check-config` command: validates config and shows what would be used
fn handle_check_config(path: &Path) -> anyhow::Result<()> {
    let config = load_or_default(Some(path))?;

    println!("=== Contact-Ripple Configuration ===\n");

    println!("Crawler:");
    println!("  Max pages per site: {}", config.crawler.max_pages);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!("  Max workers: {}", config.crawler.max_workers);
    println!("  Concurrent by default: {}", config.crawler.concurrent);
    println!(
        "  Skipped extensions: {}",
        config.crawler.skip_extensions.join(", ")
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nServer:");
    println!("  Bind address: {}", config.server.bind_address);

    println!("\n✓ Configuration is valid");

    Ok(())
}
