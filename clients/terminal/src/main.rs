//! Terminal front end: a human player against the AI paddle.

use clap::{Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use std::fs::File;
use std::path::{Path, PathBuf};
use tennis_core::{Config, ServePause};

use crate::app::App;

mod app;
mod event;
mod ui;

/// Pause behavior after each point
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PauseArg {
    /// Freeze the simulation for a number of ticks
    Ticks,
    /// Block the game loop for the pause duration
    Blocking,
}

impl From<PauseArg> for ServePause {
    fn from(arg: PauseArg) -> Self {
        match arg {
            PauseArg::Ticks => ServePause::Ticks,
            PauseArg::Blocking => ServePause::Blocking,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tennis-terminal", version, about = "Play tennis against the computer")]
struct Args {
    /// Seed for serve directions (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Pause behavior after each point
    #[arg(long, value_enum, default_value_t = PauseArg::Ticks)]
    pause: PauseArg,

    /// Write log output to this file (RUST_LOG filters it)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// The terminal owns stderr, so logs only go to a file when asked for
fn init_logging(path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = Config {
        seed: args.seed.unwrap_or_else(rand::random),
        serve_pause: args.pause.into(),
        ..Config::default()
    };

    let terminal = ratatui::init();
    let result = App::new(config).and_then(|app| app.run(terminal));
    ratatui::restore();
    result
}
