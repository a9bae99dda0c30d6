//! Autotrader-Harvest main entry point
//!
//! This is the command-line interface for the listing harvester.

use anyhow::Context;
use autotrader_harvest::config::{parse_config_with_hash, validate, Config, RendererKind};
use autotrader_harvest::crawler::run_harvest;
use autotrader_harvest::output::{output_path, print_summary};
use autotrader_harvest::search::{AxisSpace, SearchUrlBuilder};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Autotrader-Harvest: a bounded listing harvester
///
/// Walks every body type and mileage bracket of a saved search, collects the listings on
/// each results page and writes them to a dated tab-separated file.
#[derive(Parser, Debug)]
#[command(name = "autotrader-harvest")]
#[command(version)]
#[command(about = "A bounded listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be walked without starting a browser
    #[arg(long)]
    dry_run: bool,

    /// Directory for the output file
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Number of concurrent browser sessions
    #[arg(long, value_name = "N")]
    workers: Option<u32>,

    /// Page renderer to use
    #[arg(long, value_enum)]
    engine: Option<Engine>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Engine {
    /// Real browser through a WebDriver endpoint
    Webdriver,
    /// Plain HTTP requests, no script execution
    Http,
}

impl From<Engine> for RendererKind {
    fn from(engine: Engine) -> Self {
        match engine {
            Engine::Webdriver => RendererKind::Webdriver,
            Engine::Http => RendererKind::Http,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config)?;
        return Ok(());
    }

    handle_harvest(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("autotrader_harvest=info,warn"),
            1 => EnvFilter::new("autotrader_harvest=debug,info"),
            2 => EnvFilter::new("autotrader_harvest=trace,debug"),
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

/// Builds the run configuration: file (or defaults), then overrides, then one validation
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load(path)?,
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, cli);
    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

/// Parses the configuration file, logging its hash
fn load(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = parse_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.to_string_lossy().into_owned();
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(engine) = cli.engine {
        config.browser.engine = engine.into();
    }
}

/// Handles the --dry-run mode: validates config and shows what would be walked
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let axes = AxisSpace::from_config(&config.axes);
    let urls = SearchUrlBuilder::new(&config.search)?;

    println!("=== Autotrader-Harvest Dry Run ===\n");

    println!("Search:");
    println!("  Base URL: {}", config.search.base_url);
    println!("  Postcode: {}", config.search.postcode);
    println!(
        "  Price: {} - {}",
        config.search.price_from, config.search.price_to
    );
    println!("  Radius: {}", config.search.radius);
    println!("  Sort: {}", config.search.sort);

    println!("\nCrawler:");
    println!("  Max pages per bracket: {}", config.crawler.max_pages);
    println!("  Workers: {}", config.crawler.workers);
    println!(
        "  Delay after each page: {}-{}ms",
        config.crawler.min_delay_ms, config.crawler.max_delay_ms
    );
    println!("  Engine: {:?}", config.browser.engine);

    println!("\nCategories ({}):", axes.categories().len());
    for category in axes.categories() {
        println!("  - {}", category);
    }

    println!("\nMileage Brackets ({}):", axes.brackets().len());
    for bracket in axes.brackets() {
        println!("  - {}", bracket);
    }

    let gaps = axes.gaps();
    if !gaps.is_empty() {
        println!("\nUncovered Mileage Ranges ({}):", gaps.len());
        for gap in &gaps {
            println!("  - {}", gap);
        }
    }

    println!("\nOutput:");
    println!(
        "  File: {}",
        output_path(
            Path::new(&config.output.directory),
            chrono::Local::now().date_naive()
        )
        .display()
    );
    println!("  Error log: {}", config.output.error_log);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would walk {} slots of up to {} pages each",
        axes.slot_count(),
        config.crawler.max_pages
    );
    if let Some(slot) = axes.slots().next() {
        println!("✓ First request: {}", urls.url_for(&slot, 1));
    }

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, quiet: bool) -> anyhow::Result<()> {
    match run_harvest(config).await {
        Ok(report) => {
            tracing::info!(
                "Harvest completed: {} records, {} errors",
                report.summary.records_written,
                report.summary.errors
            );
            if !quiet {
                print_summary(&report.summary);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("autotrader-harvest").chain(args.iter().copied()))
    }

    #[test]
    fn test_override_repairs_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.toml");
        std::fs::write(&path, "[crawler]\nworkers = 0\n").unwrap();
        let path = path.to_string_lossy().into_owned();

        assert!(resolve_config(&cli(&[&path])).is_err());

        let config = resolve_config(&cli(&["--workers", "4", &path])).unwrap();
        assert_eq!(config.crawler.workers, 4);
    }

    #[test]
    fn test_override_is_validated() {
        let err = resolve_config(&cli(&["--workers", "0"])).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_engine_and_output_overrides() {
        let config = resolve_config(&cli(&["--engine", "http", "--output-dir", "/tmp/raw"])).unwrap();
        assert_eq!(config.browser.engine, RendererKind::Http);
        assert_eq!(config.output.directory, "/tmp/raw");
    }
}
