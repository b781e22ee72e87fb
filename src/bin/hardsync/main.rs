//! hardsync - terminal hard-sync synthesizer
//!
//! Run with: cargo run -- [--config params.toml]

mod app;
mod config;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};

use app::Instrument;

#[derive(Parser)]
#[command(name = "hardsync")]
#[command(about = "Play a 12-voice hard-sync synth from the computer keyboard")]
struct Cli {
    /// TOML file with initial control values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write logs (the terminal belongs to the UI)
    #[arg(long, default_value = "hardsync.log")]
    log_file: PathBuf,

    /// How long a key press holds its note, in milliseconds
    #[arg(long, default_value = "600")]
    gate_ms: u64,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log = File::create(&cli.log_file)
        .wrap_err_with(|| format!("failed to create log file {}", cli.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    let params = match &cli.config {
        Some(path) => config::load_params(path)?,
        None => Default::default(),
    };
    tracing::info!(?params, gate_ms = cli.gate_ms, "starting hardsync");

    let instrument = Instrument::new(params, cli.gate_ms);

    let mut terminal = ratatui::init();
    let res = instrument.run(&mut terminal);
    ratatui::restore();

    if let Err(err) = &res {
        tracing::error!(%err, "hardsync exited with error");
    }
    res
}
