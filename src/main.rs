//! Linkwalk main entry point
//!
//! This is the command-line interface for the linkwalk crawler.

use anyhow::Context;
use clap::Parser;
use linkwalk::config::{load_config_with_hash, validate, Config};
use linkwalk::crawler::{crawl, CrawlLimits, CrawlStats};
use linkwalk::storage::{open_storage, FrontierStore, MemoryFrontier};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Linkwalk: a bounded, single-threaded link crawler
///
/// Linkwalk starts at one URL, pops discovered links from a frontier until
/// an iteration bound is reached, and prints every visited page accepted by
/// the search terms. The max-depth and max-links bounds both cap frontier
/// pops, not true link depth.
#[derive(Parser, Debug)]
#[command(name = "linkwalk")]
#[command(version)]
#[command(about = "A bounded, single-threaded link crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Search term; a page matches if its URL contains any term (repeatable)
    #[arg(short = 't', long = "term", value_name = "TERM")]
    terms: Vec<String>,

    /// Maximum number of links to process (non-positive keeps the default)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    max_links: Option<i64>,

    /// Depth bound, counted in frontier pops (non-positive keeps the default)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    max_depth: Option<i64>,

    /// Start a fresh crawl, ignoring previous state
    #[arg(long, conflicts_with = "in_memory")]
    fresh: bool,

    /// Keep crawl state in memory instead of the database
    #[arg(long)]
    in_memory: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective settings without crawling
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid command-line settings")?;

    if cli.dry_run {
        handle_dry_run(&config, &cli);
        return Ok(());
    }

    if cli.in_memory {
        run(&config, MemoryFrontier::new(), &cli.start_url, cli.quiet)
    } else {
        let path = Path::new(&config.output.database_path);
        let store = open_storage(path, cli.fresh)
            .with_context(|| format!("failed to open {}", path.display()))?;
        run(&config, store, &cli.start_url, cli.quiet)
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only result URLs.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkwalk=info,warn"),
            1 => EnvFilter::new("linkwalk=debug,info"),
            2 => EnvFilter::new("linkwalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Command-line bounds and terms take precedence over the config file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.max_links.is_some() {
        config.crawler.max_links = cli.max_links;
    }
    if cli.max_depth.is_some() {
        config.crawler.max_depth = cli.max_depth;
    }
    if !cli.terms.is_empty() {
        config.search.terms = cli.terms.clone();
    }
}

/// Handles the --dry-run mode: shows the settings a crawl would use
fn handle_dry_run(config: &Config, cli: &Cli) {
    let limits = CrawlLimits::from_overrides(config.crawler.max_links, config.crawler.max_depth);

    println!("=== Linkwalk Dry Run ===\n");
    println!("Start URL: {}", cli.start_url);

    println!("\nCrawler Configuration:");
    println!("  Max links: {}", limits.max_links());
    println!("  Max depth: {}", limits.max_depth());

    println!("\nFetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    match config.fetch.read_timeout_secs {
        Some(secs) => println!("  Read timeout: {}s", secs),
        None => println!("  Read timeout: none"),
    }

    println!("\nStorage:");
    if cli.in_memory {
        println!("  In memory");
    } else {
        println!("  Database: {}", config.output.database_path);
        println!("  Fresh: {}", cli.fresh);
    }

    println!("\nSearch Terms ({}):", config.search.terms.len());
    for term in &config.search.terms {
        println!("  - {}", term);
    }
}

/// Handles the main crawl operation
fn run<S: FrontierStore>(
    config: &Config,
    store: S,
    start_url: &str,
    quiet: bool,
) -> anyhow::Result<()> {
    tracing::info!("Starting crawl at {}", start_url);

    let (results, stats) = match crawl(config, store, start_url) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    for url in &results {
        println!("{}", url);
    }

    tracing::info!("Crawl completed with {} results", results.len());
    if !quiet {
        print_summary(&stats);
    }
    Ok(())
}

fn print_summary(stats: &CrawlStats) {
    eprintln!();
    eprintln!("Iterations: {}", stats.iterations);
    eprintln!(
        "Pages fetched: {} ({} failed, {:.1}% success)",
        stats.pages_fetched,
        stats.fetch_failures,
        stats.success_rate()
    );
    eprintln!(
        "Links: {} extracted, {} enqueued",
        stats.links_extracted, stats.links_enqueued
    );
    eprintln!("Matches: {}", stats.matches);
}
