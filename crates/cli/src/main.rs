mod present;
mod render;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gachasim_core::{DrawCount, DrawEngine, RngState};
use gachasim_data::{default_history_path, load_bundle, FileHistoryStore};
use render::{history_table, result_line, stats_table, Tally};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gachasim", version, about = "Gacha draw simulator")]
struct Cli {
    /// Directory holding rates.json, pickup.json, promotion.json, gate.json and content/.
    #[arg(long, global = true, default_value = "assets")]
    assets: PathBuf,

    /// History file. Defaults to $GACHASIM_HISTORY, then a dotfile in $HOME.
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Seed for a reproducible run.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Draw once, or ten times with `--ten`, and record the batch.
    Draw {
        #[arg(long)]
        ten: bool,
        /// Reveal slot by slot.
        #[arg(long)]
        step: bool,
        /// A skip runs to the end instead of stopping on high-value slots.
        #[arg(long, requires = "step")]
        skip_all: bool,
        /// Print the batch as JSON.
        #[arg(long, conflicts_with = "step")]
        json: bool,
        #[arg(long, default_value_t = 400)]
        pause_ms: u64,
    },
    /// Show per-tier weights and rosters.
    Stats,
    /// Show recorded draws, newest first.
    History,
    /// Delete recorded draws.
    ClearHistory,
    /// Roll many batches without recording and compare observed rates.
    Simulate {
        #[arg(long, default_value_t = 10_000)]
        batches: u64,
        #[arg(long)]
        ten: bool,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let report = load_bundle(&cli.assets)
        .with_context(|| format!("load assets from {}", cli.assets.display()))?;
    let history = history_store(cli.history.clone())?;
    let rng = match cli.seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::from_entropy(),
    };
    info!(seed = rng.seed(), history = %history.path().display(), "session ready");
    let engine: Engine = DrawEngine::new(report.rules, report.content, rng, history);

    match cli.command {
        Command::Draw {
            ten,
            step,
            skip_all,
            json,
            pause_ms,
        } => draw(engine, count(ten), step, skip_all, json, Duration::from_millis(pause_ms)),
        Command::Stats => {
            print!("{}", stats_table(&engine.stats()));
            Ok(())
        }
        Command::History => {
            let entries = engine.history_entries()?;
            print!("{}", history_table(&entries));
            Ok(())
        }
        Command::ClearHistory => {
            let mut engine = engine;
            engine.clear_history()?;
            println!("history cleared");
            Ok(())
        }
        Command::Simulate { batches, ten } => simulate(engine, count(ten), batches),
    }
}

type Engine = DrawEngine<RngState, FileHistoryStore>;

fn history_store(path: Option<PathBuf>) -> anyhow::Result<FileHistoryStore> {
    let path = path
        .or_else(default_history_path)
        .context("no history path: pass --history or set GACHASIM_HISTORY")?;
    Ok(FileHistoryStore::new(path))
}

fn count(ten: bool) -> DrawCount {
    if ten {
        DrawCount::Ten
    } else {
        DrawCount::Single
    }
}

fn draw(
    mut engine: Engine,
    count: DrawCount,
    step: bool,
    skip_all: bool,
    json: bool,
    pause: Duration,
) -> anyhow::Result<()> {
    let batch = engine.draw(count);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &batch)?;
        writeln!(out)?;
        return Ok(());
    }
    if step {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        return present::run_stepped(&batch, skip_all, pause, &mut input, &mut out);
    }
    writeln!(out, "{}", batch.gate_text)?;
    for (slot, result) in batch.results.iter().enumerate() {
        writeln!(out, "{}", result_line(slot, result))?;
    }
    Ok(())
}

fn simulate(mut engine: Engine, count: DrawCount, batches: u64) -> anyhow::Result<()> {
    if batches == 0 {
        warn!("simulate called with zero batches");
    }
    let mut tally = Tally::default();
    for _ in 0..batches {
        let batch = engine.draw_unrecorded(count);
        for result in &batch.results {
            tally.add(result);
        }
    }
    print!("{}", tally.report(engine.rules(), count));
    Ok(())
}
