//! Column-Scribe main entry point
//!
//! This is the command-line interface for the Column-Scribe archiver.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use column_scribe::config::{load_config_or_default, Config};
use column_scribe::crawler::{convert_article, crawl_column, CrawlContext, CrawlMode};
use column_scribe::index::{discover_columns, read_index, write_index};
use column_scribe::output::print_statistics;
use dialoguer::Input;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Column-Scribe: a documentation column archiver
///
/// Column-Scribe walks the articles of a documentation column, converts
/// each article body to Markdown and stores its images locally.
#[derive(Parser, Debug)]
#[command(name = "column-scribe")]
#[command(version = "1.0.0")]
#[command(about = "A documentation column archiver", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

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
    /// Crawl a single column
    Column {
        /// Column name, used as the output directory
        #[arg(long)]
        name: Option<String>,

        /// Start URL (first article, or column page in menu mode)
        #[arg(long)]
        url: Option<String>,

        /// How to find the column's articles
        #[arg(long, value_enum, default_value_t = ModeArg::Pagination)]
        mode: ModeArg,
    },

    /// Convert a single article
    Article {
        /// Article URL
        #[arg(long)]
        url: String,

        /// Directory to write the article into
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Build the column index from the site listing
    Discover {
        /// Index file to write
        #[arg(long, value_name = "FILE")]
        index: Option<PathBuf>,
    },

    /// Crawl every column listed in the index file
    All {
        /// Index file to read
        #[arg(long, value_name = "FILE")]
        index: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ModeArg {
    /// Follow next-page links from the first article
    Pagination,
    /// Enumerate the column page's navigation menu
    Menu,
}

impl From<ModeArg> for CrawlMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pagination => CrawlMode::Pagination,
            ModeArg::Menu => CrawlMode::Menu,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Command::Column { name, url, mode } => handle_column(&config, name, url, mode.into()).await,
        Command::Article { url, output } => handle_article(config, &url, output).await,
        Command::Discover { index } => handle_discover(&config, index).await,
        Command::All { index } => handle_all(&config, index).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("column_scribe=info,warn"),
            1 => EnvFilter::new("column_scribe=debug,info"),
            2 => EnvFilter::new("column_scribe=trace,debug"),
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

/// Returns `value`, or asks for it on the terminal
fn value_or_prompt(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => {
            let input = Input::<String>::new().with_prompt(prompt).interact_text()?;
            Ok(input.trim().to_string())
        }
    }
}

/// Handles `column`: crawls one column and prints its report
async fn handle_column(
    config: &Config,
    name: Option<String>,
    url: Option<String>,
    mode: CrawlMode,
) -> anyhow::Result<()> {
    let name = value_or_prompt(name, "Column name")?;
    let url = value_or_prompt(url, "Start URL")?;

    tracing::info!("Crawling column {} from {} ({:?})", name, url, mode);
    let report = crawl_column(config, &name, &url, mode).await?;

    print_statistics(std::slice::from_ref(&report));
    Ok(())
}

/// Handles `article`: converts one article URL
async fn handle_article(
    mut config: Config,
    url: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(dir) = output {
        config.output.article_dir = dir.to_string_lossy().into_owned();
    }

    let outcome = convert_article(&config, url).await?;
    println!(
        "Saved {} ({} images localized, {} left remote)",
        outcome.path.display(),
        outcome.images_localized,
        outcome.images_unresolved
    );
    Ok(())
}

/// Handles `discover`: writes the column index
async fn handle_discover(config: &Config, index: Option<PathBuf>) -> anyhow::Result<()> {
    let index_path = index.unwrap_or_else(|| PathBuf::from(&config.output.index_path));
    let listing_url = Url::parse(&config.site.listing_url)
        .with_context(|| format!("Invalid listing URL: {}", config.site.listing_url))?;

    let context = CrawlContext::from_config(config)?;
    let entries = discover_columns(&context, &listing_url).await;
    let written = write_index(&index_path, &entries)?;

    println!("Wrote {} columns to {}", written, index_path.display());
    Ok(())
}

/// Handles `all`: crawls every column in the index, one after another
async fn handle_all(config: &Config, index: Option<PathBuf>) -> anyhow::Result<()> {
    let index_path = index.unwrap_or_else(|| PathBuf::from(&config.output.index_path));
    let entries = read_index(&index_path)?;
    tracing::info!("Crawling {} columns from {}", entries.len(), index_path.display());

    let mut reports = Vec::with_capacity(entries.len());
    for entry in &entries {
        match crawl_column(config, &entry.column, &entry.first_article_url, CrawlMode::Pagination)
            .await
        {
            Ok(report) => reports.push(report),
            Err(e) => tracing::error!("Column {} could not be crawled: {}", entry.column, e),
        }
    }

    print_statistics(&reports);
    Ok(())
}
