use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::info;

use crate::background::SwitcherHost;
use crate::channel::stdio;
use crate::config::Config;
use crate::host::MemoryTabHost;
use crate::logging;
use crate::models::{MatchField, RankedResult, TabId};
use crate::query::{QueryEngine, mark, registry};
use crate::recency::RecencyLog;

#[derive(Parser)]
#[command(name = "tabhop")]
#[command(version)]
#[command(about = "Recently-used tab switching with fuzzy and structured search", long_about = None)]
pub struct Cli {
    /// Config file (defaults to $TABHOP_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer switcher requests as newline-delimited JSON on stdin/stdout
    Serve {
        /// JSON array of tab snapshots
        #[arg(long)]
        tabs: PathBuf,
        /// Activation history, most recent first
        #[arg(long, value_delimiter = ',')]
        recent: Vec<TabId>,
    },
    /// Order tabs by recency and evaluate a query against them
    Search {
        /// JSON array of tab snapshots
        #[arg(long)]
        tabs: PathBuf,
        /// Activation history, most recent first
        #[arg(long, value_delimiter = ',')]
        recent: Vec<TabId>,
        /// Free text or `field:value` filters
        query: Vec<String>,
    },
    /// List the fields usable in structured queries
    Fields,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    logging::init(config.log_filter.as_deref());

    match cli.command {
        Some(Commands::Serve { tabs, recent }) => block_on(serve(&config, &tabs, recent))?,
        Some(Commands::Search { tabs, recent, query }) => {
            block_on(search(&config, &tabs, recent, &query.join(" ")))?
        }
        Some(Commands::Fields) => show_fields(),
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(future)
}

fn load_switcher(tabs: &Path, recent: Vec<TabId>) -> Result<SwitcherHost<MemoryTabHost>> {
    let host = MemoryTabHost::from_json_file(tabs)
        .with_context(|| format!("Failed to load tabs from {}", tabs.display()))?;
    let log = RecencyLog::from_recent(recent).into_shared();
    Ok(SwitcherHost::with_log(Arc::new(host), log))
}

async fn serve(config: &Config, tabs: &Path, recent: Vec<TabId>) -> Result<()> {
    let switcher = load_switcher(tabs, recent)?;
    let feed = switcher.spawn_activation_feed(switcher.host().subscribe_activations());
    let compaction = switcher.spawn_compaction(config.compaction_interval());

    let (port, reader, writer) =
        stdio::bridge(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    info!(tabs = switcher.host().tabs().len(), "serving switcher requests on stdio");
    switcher.serve(port).await;

    compaction.abort();
    feed.abort();
    reader.abort();
    writer.await.context("Transport writer failed")?;
    Ok(())
}

async fn search(config: &Config, tabs: &Path, recent: Vec<TabId>, query: &str) -> Result<()> {
    let switcher = load_switcher(tabs, recent)?;
    let ordered = switcher.ordered_tabs().await.context("Failed to list tabs")?;
    let results = QueryEngine::new(config.fuzzy).evaluate(&ordered, query);

    if results.is_empty() {
        println!("No Results Found");
        return Ok(());
    }
    for result in &results {
        println!("{}", format_result(result));
    }
    Ok(())
}

/// `rank. title (hostname) #id`, matched runs wrapped in brackets
fn format_result(result: &RankedResult) -> String {
    let tab = &result.tab;
    let title = mark(tab.title_text(), result.spans_for(MatchField::Title), "[", "]");
    let mut line = format!("{:>3}. {}", result.rank + 1, title);
    if let Some(hostname) = tab.hostname() {
        let hostname = mark(&hostname, result.spans_for(MatchField::Hostname), "[", "]");
        line.push_str(&format!(" ({})", hostname));
    }
    if tab.pinned {
        line.push_str(" [pinned]");
    }
    line.push_str(&format!(" #{}", tab.id));
    line
}

fn show_fields() {
    println!("Structured query fields");
    println!("=======================");
    for field in registry() {
        let aliases = if field.aliases.is_empty() {
            String::new()
        } else {
            format!(" (alias: {})", field.aliases.join(", "))
        };
        println!("  {}{}: {}", field.name, aliases, field.description);
    }
}
