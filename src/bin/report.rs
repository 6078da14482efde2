//! Headless counterpart of the dashboard: runs one CSV through its
//! pipeline and prints the presentation and chart specs as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use bizboard::{pipeline, render_all, DashboardConfig, DatasetKind, JsonSink};

/// Clean a business CSV and print its dashboard content as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dataset kind: finance, sales or purchase
    #[arg(short, long)]
    kind: DatasetKind,

    /// Path to the input CSV file
    #[arg(short, long)]
    input: PathBuf,

    /// JSON config file (defaults to $BIZBOARD_CONFIG, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => DashboardConfig::from_env().context("reading config from environment")?,
    };

    let presentation = pipeline::run_file(args.kind, &args.input, &config)
        .with_context(|| format!("An error occurred with the {} data", args.kind))?;

    let mut sink = JsonSink::default();
    let reports = render_all(&mut sink, &presentation.charts);
    for msg in reports.iter().filter_map(|r| r.message()) {
        log::warn!("{msg}");
    }

    let output = serde_json::json!({
        "presentation": presentation,
        "charts": sink.charts,
        "chart_reports": reports,
    });
    let text = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");
    Ok(())
}
