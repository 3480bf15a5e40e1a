use std::{
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use chrono::Local;
use clap::{Parser, ValueEnum};
use fern::Dispatch;
use log::{error, info};
use slingshot_sim::{
    Environment, IdlePilot, Pilot, Preset, RandomPilot, SimConfig, SlingshotEnv, TargetSeeker,
    ui::{log_to_terminal, print_episode_summary},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PilotKind {
    Seeker,
    Random,
    Idle,
}

#[derive(Parser, Debug)]
#[command(name = "slingshot-sim", about = "Headless runner for the slingshot environment")]
struct Args {
    /// Built-in constant set
    #[arg(long, value_enum, default_value_t = Preset::Slingshot)]
    preset: Preset,

    /// JSON config; overrides the preset
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 5)]
    episodes: usize,

    #[arg(long, value_enum, default_value_t = PilotKind::Seeker)]
    pilot: PilotKind,

    /// Redraw the status block after every step
    #[arg(long)]
    watch: bool,

    /// Delay between redraws in watch mode
    #[arg(long, default_value_t = 20)]
    frame_ms: u64,

    #[arg(long, default_value = "slingshot.log")]
    log_file: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

fn setup_logger(log_file: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::fs::File::create(log_file)?)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}

fn build_pilot(kind: PilotKind, seed: u64) -> Box<dyn Pilot> {
    match kind {
        PilotKind::Seeker => Box::new(TargetSeeker::default()),
        PilotKind::Random => Box::new(RandomPilot::new(seed)),
        PilotKind::Idle => Box::new(IdlePilot),
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::from_preset(args.preset),
    };

    let mut env = SlingshotEnv::new(config, args.seed)?;
    let mut pilot = build_pilot(args.pilot, args.seed);
    info!(
        "running {} episode(s), preset {:?}, pilot {:?}, seed {}",
        args.episodes, args.preset, args.pilot, args.seed
    );

    for episode in 0..args.episodes {
        if episode > 0 {
            env.reset();
        }
        pilot.reset();

        let mut total_reward = 0.0;
        loop {
            let heading = env.render_state().rocket_angle;
            let action = pilot.act(&env.get_observation(), heading);
            let outcome = env.step(action)?;
            total_reward += outcome.reward;

            if args.watch {
                log_to_terminal(&env, action, &outcome);
                thread::sleep(Duration::from_millis(args.frame_ms));
            }

            if outcome.done {
                break;
            }
        }

        print_episode_summary(episode, &env, total_reward);
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = setup_logger(&args.log_file, args.verbose) {
        eprintln!("failed to set up logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}
