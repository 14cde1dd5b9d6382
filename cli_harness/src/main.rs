//! Headless harness for running tennis_core deterministically.
//!
//! Drives the player paddle from a script, an autopilot, or not at all, and
//! prints a summary of the run. Useful for parity checks against recorded
//! matches: fix `--seed` or `--serve` and the run is fully reproducible.

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{ensure, eyre, WrapErr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tennis_core::*;

/// Pause behavior after each point
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PauseArg {
    /// Freeze the simulation for a number of ticks
    Ticks,
    /// Block the thread for the pause duration
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
#[command(name = "tennis_harness", version, about = "Headless runner for tennis_core")]
struct Args {
    /// Seed for serve directions (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of ticks to simulate
    #[arg(long, default_value_t = 60 * 60 * 5)]
    ticks: u32,

    /// Pause behavior after each point
    #[arg(long, value_enum, default_value_t = PauseArg::Ticks)]
    pause: PauseArg,

    /// Fixed serve signs, x then y per serve, e.g. "++-+" (overrides --seed)
    #[arg(long)]
    serve: Option<String>,

    /// Player intents per tick, cycled: U = up, D = down, - = hold
    #[arg(long, conflicts_with = "autopilot")]
    player: Option<String>,

    /// Drive the player paddle with the AI tracking policy
    #[arg(long)]
    autopilot: bool,

    /// Print the final court as text
    #[arg(long)]
    frame: bool,
}

/// Where player input comes from each tick
enum PlayerDriver {
    Idle,
    Script { intents: Vec<Intent>, cursor: usize },
    Autopilot,
}

impl PlayerDriver {
    fn from_args(args: &Args) -> color_eyre::Result<Self> {
        if args.autopilot {
            return Ok(PlayerDriver::Autopilot);
        }
        match &args.player {
            Some(script) => {
                ensure!(!script.is_empty(), "--player script must not be empty");
                Ok(PlayerDriver::Script {
                    intents: script.bytes().map(Intent::from_code).collect(),
                    cursor: 0,
                })
            }
            None => Ok(PlayerDriver::Idle),
        }
    }

    fn next_input<S: ServeSource>(&mut self, game: &Game<S>) -> Input {
        match self {
            PlayerDriver::Idle => Input::zero(),
            PlayerDriver::Script { intents, cursor } => {
                let intent = intents[*cursor];
                *cursor = (*cursor + 1) % intents.len();
                intent.into()
            }
            PlayerDriver::Autopilot => {
                ai_intent(&game.player, &game.ball, game.config.player_speed).into()
            }
        }
    }
}

/// Counters collected over a run
#[derive(Debug, Default)]
struct RunStats {
    ticks: u32,
    wall_bounces: u32,
    paddle_bounces: u32,
    points: u32,
}

fn run(args: &Args, running: &AtomicBool) -> color_eyre::Result<RunStats> {
    let config = Config {
        seed: args.seed.unwrap_or_else(rand::random),
        serve_pause: args.pause.into(),
        ..Config::default()
    };

    let serve: Box<dyn ServeSource> = match &args.serve {
        Some(script) => {
            ensure!(!script.trim().is_empty(), "--serve script must not be empty");
            Box::new(
                ScriptedServe::parse(script)
                    .ok_or_else(|| eyre!("--serve accepts only '+' and '-', got {script:?}"))?,
            )
        }
        None => Box::new(RngServe::from_config(&config)),
    };

    log::info!(
        "starting run: seed={} pause={:?} ticks={}",
        config.seed,
        config.serve_pause,
        args.ticks
    );

    let mut game = Game::with_serve(config, serve);
    let mut driver = PlayerDriver::from_args(args)?;
    let mut stats = RunStats::default();

    while running.load(Ordering::SeqCst) && stats.ticks < args.ticks && !game.is_over() {
        let input = driver.next_input(&game);
        for event in game.step(input) {
            match event {
                Event::WallBounce => stats.wall_bounces += 1,
                Event::PaddleBounce => stats.paddle_bounces += 1,
                Event::Scored { .. } => stats.points += 1,
                Event::MatchOver { winner } => log::info!("{}", winner.winner_label()),
                Event::ServePause(pause) => thread::sleep(pause),
            }
        }
        stats.ticks += 1;
    }

    if !running.load(Ordering::SeqCst) {
        log::warn!("interrupted after {} ticks", stats.ticks);
    }

    let view = game.view();
    println!("Ticks:          {}", stats.ticks);
    println!("Score:          {} - {}", view.score.player, view.score.ai);
    println!("Status:         {}", game.status_string());
    println!("Winner:         {}", view.winner_label.unwrap_or("-"));
    println!("Wall bounces:   {}", stats.wall_bounces);
    println!("Paddle bounces: {}", stats.paddle_bounces);
    println!("Points played:  {}", stats.points);

    if args.frame {
        let helper = RenderHelper::new(60, 20, &game.config);
        for line in helper.frame_lines(&view) {
            println!("|{line}|");
        }
    }

    Ok(stats)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Finish the current tick on Ctrl+C, then print what we have
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .wrap_err("failed to install Ctrl-C handler")?;

    run(&args, &running)?;
    Ok(())
}
