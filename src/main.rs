//! UI Faculty Finder main entry point
//!
//! Command-line interface for crawling the University of Indonesia website
//! for faculties and searching the resulting database.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use ui_faculty_finder::catalog::expected_faculty_set;
use ui_faculty_finder::config::{load_config_with_hash, Config};
use ui_faculty_finder::crawler::{Crawler, CrawlerOptions, HttpFetcher};
use ui_faculty_finder::output::{
    generate_markdown_summary, load_statistics, print_statistics, print_verification,
    run_status_for, CrawlSummary,
};
use ui_faculty_finder::search::{Indexer, SearchDebugInfo, SearchEngine, SearchResult, SearchType};
use ui_faculty_finder::storage::{open_storage, CrawlRunRecord, NewCrawlRun, Storage};
use tracing_subscriber::EnvFilter;

/// UI Faculty Finder: discovers University of Indonesia faculties and makes
/// them searchable
#[derive(Parser, Debug)]
#[command(name = "ui-faculty-finder")]
#[command(version)]
#[command(about = "Crawl and search University of Indonesia faculties", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

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
    /// Crawl the university site and store the discovered faculties
    Crawl {
        /// Delete previously stored faculties before importing
        #[arg(long)]
        fresh: bool,
    },

    /// Search stored faculties
    Search {
        query: String,

        /// comprehensive, name, description or program
        #[arg(long = "type", default_value = "comprehensive")]
        search_type: String,

        /// Maximum number of results (defaults to the configured limit)
        #[arg(long)]
        limit: Option<u32>,

        /// Print diagnostics for the query instead of results
        #[arg(long)]
        debug: bool,
    },

    /// Suggest faculty and program names for a partial query
    Suggest {
        partial: String,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// List faculties stored with a given type
    ByType {
        faculty_type: String,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Rebuild the search index and verify it
    Reindex,

    /// Show faculty and search index statistics
    Stats,

    /// Regenerate the markdown summary of the latest crawl
    ExportSummary,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Crawl { fresh } => handle_crawl(&config, &config_hash, fresh).await,
        Command::Search {
            query,
            search_type,
            limit,
            debug,
        } => handle_search(&config, &query, &search_type, limit, debug),
        Command::Suggest { partial, limit } => handle_suggest(&config, &partial, limit),
        Command::ByType {
            faculty_type,
            limit,
        } => handle_by_type(&config, &faculty_type, limit),
        Command::Reindex => handle_reindex(&config),
        Command::Stats => handle_stats(&config),
        Command::ExportSummary => handle_export_summary(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ui_faculty_finder=info,warn"),
            1 => EnvFilter::new("ui_faculty_finder=debug,info"),
            2 => EnvFilter::new("ui_faculty_finder=trace,debug"),
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

/// Runs the crawl, imports the faculties and writes the summary
async fn handle_crawl(config: &Config, config_hash: &str, fresh: bool) -> Result<()> {
    let mut storage = open_storage(Path::new(&config.output.database_path))
        .context("failed to open faculty database")?;

    if fresh {
        tracing::info!("Starting fresh crawl (clearing stored faculties)");
        storage.delete_all()?;
    }

    let fetcher = HttpFetcher::new(&config.user_agent, config.crawler.request_timeout())
        .context("failed to build HTTP client")?;
    let options = CrawlerOptions::from_config(&config.crawler);
    let expected = options.expected_faculties.clone();

    let started_at = Utc::now();
    let report = Crawler::new(fetcher, options).run().await;
    let finished_at = Utc::now();

    let import = storage.bulk_import(&report.faculties)?;
    tracing::info!(
        "Imported {} faculties ({} failed)",
        import.success,
        import.failed
    );
    for error in &import.errors {
        tracing::warn!("Import error: {}", error);
    }

    let status = run_status_for(&report);
    let duration_secs = report.elapsed.as_secs_f64();
    let run_id = storage.record_crawl_run(&NewCrawlRun {
        base_url: &config.crawler.base_url,
        started_at,
        finished_at,
        config_hash,
        total_faculties: import.success,
        pages_crawled: report.pages_crawled,
        duration_secs,
        status,
    })?;

    let run = CrawlRunRecord {
        id: run_id,
        base_url: config.crawler.base_url.clone(),
        started_at: started_at.to_rfc3339(),
        finished_at: finished_at.to_rfc3339(),
        config_hash: config_hash.to_string(),
        total_faculties: import.success,
        pages_crawled: report.pages_crawled,
        duration_secs,
        status,
    };
    let summary = CrawlSummary::from_report(&report, &run, &expected);
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))
        .context("failed to write crawl summary")?;

    println!(
        "Found {} of {} faculties in {} pages ({})",
        report.faculties.len(),
        expected.len(),
        report.pages_crawled,
        report.termination
    );
    println!("Summary written to: {}", config.output.summary_path);

    Ok(())
}

fn open_engine(config: &Config) -> Result<SearchEngine> {
    SearchEngine::open(Path::new(&config.output.database_path))
        .with_context(|| format!("failed to open database {}", config.output.database_path))
}

fn handle_search(
    config: &Config,
    query: &str,
    search_type: &str,
    limit: Option<u32>,
    debug: bool,
) -> Result<()> {
    let engine = open_engine(config)?;

    if debug {
        print_debug_info(&engine.debug_search(query));
        return Ok(());
    }

    let search_type = SearchType::from(search_type);
    let limit = limit.unwrap_or(config.search.results_limit);
    let results = engine.search(query, limit, search_type);

    println!("{} results for \"{}\" ({})\n", results.len(), query, search_type);
    print_results(&results);
    Ok(())
}

fn handle_suggest(config: &Config, partial: &str, limit: Option<u32>) -> Result<()> {
    let engine = open_engine(config)?;
    let limit = limit.unwrap_or(config.search.suggestion_limit);

    for suggestion in engine.suggestions(partial, limit) {
        println!("{}", suggestion);
    }
    Ok(())
}

fn handle_by_type(config: &Config, faculty_type: &str, limit: Option<u32>) -> Result<()> {
    let engine = open_engine(config)?;
    let limit = limit.unwrap_or(config.search.results_limit);

    let results = engine.faculties_by_type(faculty_type, limit);
    println!("{} faculties of type {}\n", results.len(), faculty_type);
    print_results(&results);
    Ok(())
}

fn handle_reindex(config: &Config) -> Result<()> {
    let mut storage = open_storage(Path::new(&config.output.database_path))
        .context("failed to open faculty database")?;

    let summary = Indexer::default()
        .rebuild_all(&mut storage)
        .context("index rebuild failed")?;
    println!(
        "Indexed {} faculties ({} failed), {} entries\n",
        summary.success, summary.failed, summary.total_entries
    );

    print_verification(&storage.verify_index()?);
    Ok(())
}

fn handle_stats(config: &Config) -> Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))
        .context("failed to open faculty database")?;
    let stats = load_statistics(&storage)?;

    print_statistics(&stats);
    Ok(())
}

fn handle_export_summary(config: &Config) -> Result<()> {
    println!("=== Exporting Crawl Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = open_storage(Path::new(&config.output.database_path))
        .context("failed to open faculty database")?;

    tracing::info!("Loading crawl data from database...");
    let summary = CrawlSummary::from_storage(&storage, &expected_faculty_set())?;

    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;
    println!("Summary exported to: {}", config.output.summary_path);

    Ok(())
}

fn print_results(results: &[SearchResult]) {
    for (i, result) in results.iter().enumerate() {
        println!("{}. {} [score {}]", i + 1, result.name, result.score);
        println!("   {}", result.url);
        if !result.description.is_empty() {
            println!("   {}", result.description);
        }
        if !result.programs.is_empty() {
            println!("   Programs: {}", result.programs.join(", "));
        }
        if !result.departments.is_empty() {
            println!("   Departments: {}", result.departments.join(", "));
        }
        if let Some(email) = &result.contact.email {
            println!("   Email: {}", email);
        }
        if let Some(phone) = &result.contact.phone {
            println!("   Phone: {}", phone);
        }
        if !result.route.is_empty() {
            let route: Vec<&str> = result.route.iter().map(|s| s.name.as_str()).collect();
            println!("   Route: {}", route.join(" -> "));
        }
        println!();
    }
}

fn print_debug_info(info: &SearchDebugInfo) {
    println!("Query: {}", info.query);
    println!("Processed terms: {}", info.processed_terms.join(", "));
    println!("Tables: {}", info.tables.join(", "));
    println!("Faculties: {}", info.faculty_count);
    println!("Index entries: {}", info.index_row_count);
    for (id, name) in &info.sample_faculties {
        println!("  #{} {}", id, name);
    }
    if let Some(error) = &info.error {
        println!("Error: {}", error);
    }
}
