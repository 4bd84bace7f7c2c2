//! Chart generation tool.
//!
//! Reads the benchmark harness logs and writes one SVG per panel, the shared
//! legends, and optionally a JSON report of every plotted coordinate.
//!
//! Usage: `cargo run --bin bench-charts -- --log-dir logs --out-dir charts all`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use kvs_bench_charts::experiments::{self, Experiment};
use kvs_bench_charts::pipeline::save_report;
use kvs_bench_charts::render::SvgRenderer;
use kvs_bench_charts::{ChartRun, RenderConfig};

#[derive(Parser, Debug)]
#[command(name = "bench-charts")]
#[command(about = "Render comparison charts from key-value store benchmark logs")]
struct Args {
    /// Directory holding the harness logs
    #[arg(short = 'l', long, default_value = "logs")]
    log_dir: PathBuf,

    /// Directory the artifacts are written to
    #[arg(short = 'o', long, default_value = "charts")]
    out_dir: PathBuf,

    /// JSON file overriding the default render configuration
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Also write the plotted data as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log every loaded file and rendered artifact
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Every figure
    All,
    /// Line charts only (figures 10 and 12)
    Lines,
    /// Edge composition bars only (figures 9a and 9b)
    Edges,
    /// A single figure by index, e.g. `10` or `9b`
    Figure { index: String },
}

fn select(command: &Command) -> Result<Vec<Experiment>> {
    let all = experiments::catalog();
    Ok(match command {
        Command::All => all,
        Command::Lines => all
            .into_iter()
            .filter(|e| matches!(e, Experiment::Lines(_)))
            .collect(),
        Command::Edges => all
            .into_iter()
            .filter(|e| matches!(e, Experiment::Edges(_)))
            .collect(),
        Command::Figure { index } => match experiments::find(index) {
            Some(e) => vec![e],
            None => bail!("unknown figure '{}'", index),
        },
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")?;

    let config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let selected = select(&args.command)?;
    info!(
        figures = selected.len(),
        log_dir = %args.log_dir.display(),
        "starting chart run"
    );

    let renderer = SvgRenderer::new(config.clone());
    let mut run = ChartRun::new(&args.log_dir, &args.out_dir, config, renderer);
    let report = run.run(&selected).context("chart run failed")?;

    if let Some(path) = &args.report {
        save_report(&report, path).with_context(|| format!("writing report {}", path.display()))?;
    }
    Ok(())
}
