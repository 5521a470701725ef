use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rockyard_input::{InputSource, InputState, ScriptedInput};
use rockyard_kernel::{FixedStepClock, Frame, Simulation, WorldConfig, WorldEvent};
use rockyard_render::{DebugTextRenderer, Projection, present};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Frames simulated when neither `--frames` nor `--script` is given.
const DEFAULT_FRAMES: u64 = 600;

#[derive(Parser)]
#[command(name = "rockyard-cli", about = "Headless driver for the rockyard simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Run the frame loop against scripted input and print the last frame
    Run {
        /// Number of frames to simulate (defaults to the script length)
        #[arg(short, long)]
        frames: Option<u64>,
        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: f64,
        /// Input script, e.g. "w:60,wd:30,-:10,esc"
        #[arg(short, long)]
        script: Option<String>,
        /// YAML world configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the last frame and the events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the default world configuration as YAML
    DumpConfig,
}

#[derive(Serialize)]
struct RunReport<'a> {
    frames: u64,
    closed: bool,
    item_collected: bool,
    last_frame: Option<&'a Frame>,
    events: &'a [WorldEvent],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Info => {
            println!("rockyard-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", rockyard_kernel::crate_info());
            println!("render: {}", rockyard_render::crate_info());
        }
        Commands::Run {
            frames,
            fps,
            script,
            config,
            json,
        } => run(frames, fps, script.as_deref(), config, json)?,
        Commands::DumpConfig => {
            print!("{}", WorldConfig::default().to_yaml()?);
        }
    }

    Ok(())
}

fn run(
    frames: Option<u64>,
    fps: f64,
    script: Option<&str>,
    config: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(fps.is_finite() && fps > 0.0, "--fps must be positive, got {fps}");

    let config = match config {
        Some(path) => WorldConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WorldConfig::default(),
    };

    let mut input: Box<dyn InputSource> = Box::new(InputState::idle());
    let mut limit = frames.unwrap_or(DEFAULT_FRAMES);
    if let Some(text) = script {
        let scripted: ScriptedInput = text.parse().context("parsing input script")?;
        limit = frames.unwrap_or(scripted.len_frames());
        input = Box::new(scripted);
    }

    tracing::info!(frames = limit, fps, "starting headless run");

    let mut sim = Simulation::new(config);
    let mut clock = FixedStepClock::from_fps(fps);
    let projection = Projection::default();
    let mut renderer = DebugTextRenderer::new();
    let mut last_frame = None;
    let mut last_text = String::new();
    let mut events = Vec::new();

    let produced = sim.run(input.as_mut(), &mut clock, Some(limit), |frame| {
        present(frame, &projection, &mut renderer);
        last_text = renderer.take_output();
        events.extend(frame.events.iter().cloned());
        last_frame = Some(frame.clone());
    });

    let world = sim.world();
    let timer = sim.frame_timer();
    tracing::info!(
        frames = produced,
        tick = world.tick(),
        item_collected = world.item().collected,
        avg_tick = ?timer.average(),
        max_tick = ?timer.max(),
        "run finished"
    );

    if json {
        let report = RunReport {
            frames: produced,
            closed: !sim.is_running(),
            item_collected: sim.world().item().collected,
            last_frame: last_frame.as_ref(),
            events: &events,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{last_text}");
    let count = |f: fn(&WorldEvent) -> bool| events.iter().filter(|e| f(e)).count();
    println!(
        "Frames: {produced}  Obstacle contacts: {}  Knockbacks: {}  Item collected: {}",
        count(|e| matches!(e, WorldEvent::ObstacleResolved { .. })),
        count(|e| matches!(e, WorldEvent::KnockedBack { .. })),
        if sim.world().item().collected { "yes" } else { "no" }
    );
    if !sim.is_running() {
        println!("Stopped: close requested");
    }
    Ok(())
}
