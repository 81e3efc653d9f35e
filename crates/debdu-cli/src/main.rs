#![forbid(unsafe_code)]

//! debdu: report the disk footprint of every installed Debian package,
//! own size and transitive-dependency size side by side.

mod dpkg;
mod report;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use debdu_core::{Catalog, DEFAULT_BATCH_SIZE, load_catalog, parse_status};
use debdu_graph::{AliasIndex, SizeGraph, transitive_sizes};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::dpkg::DpkgSource;
use crate::report::Report;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "debdu: disk usage of installed Debian packages, dependencies included",
    long_about = None
)]
struct Cli {
    /// Read a dpkg status database dump (e.g. a copy of
    /// /var/lib/dpkg/status) instead of invoking dpkg-query.
    /// Every stanza in the file is treated as installed.
    #[arg(long, value_name = "PATH")]
    status_file: Option<PathBuf>,

    /// Maximum package names passed to one dpkg-query --status call.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, value_name = "N")]
    batch_size: usize,

    /// Print only the N largest packages (by own size).
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long)]
    json: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = load(&cli)?;
    info!(packages = catalog.len(), "catalog loaded");

    let aliases = AliasIndex::from_catalog(&catalog);
    let graph = SizeGraph::from_catalog(&catalog, &aliases);
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        unresolved = graph.unresolved.len(),
        "dependency graph built"
    );

    let entries = transitive_sizes(&graph);
    let report = Report::assemble(entries, cli.top);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        report.render_json(&mut out).context("write JSON report")?;
        writeln!(out)?;
    } else {
        report.render_human(&mut out).context("write report")?;
    }

    Ok(())
}

/// Build the catalog from the requested source.
fn load(cli: &Cli) -> anyhow::Result<Catalog> {
    if let Some(path) = &cli.status_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read status file {}", path.display()))?;
        let catalog = parse_status(&text)
            .context("parse status file")?
            .into_iter()
            .map(|record| (record.name.clone(), record))
            .collect();
        return Ok(catalog);
    }

    load_catalog(&DpkgSource, cli.batch_size).context("query dpkg")
}

/// Stderr tracing with `DEBDU_LOG` override; unresolved-dependency
/// warnings must stay visible by default.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("DEBDU_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
