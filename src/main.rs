use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use orrery::config::Config;
use orrery::demo::SolarSystem;
use orrery::render_queue::RenderQueue;
use orrery::{engine, snapshot};

/// Animates a sun, planets and moons through a scene graph.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to run, overriding the configuration
    #[arg(short, long)]
    frames: Option<u32>,

    /// Write the last frame as a PPM image
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Sleep between frames to run in real time
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(frames) = args.frames {
        config.frames = frames;
    }

    let mut state = SolarSystem::new(&config).context("Failed to build solar system")?;
    let mut queue = RenderQueue::new();
    let dt = config.frame_time_secs();

    for _ in 0..config.frames {
        engine::frame(&mut state, &mut queue, dt)?;

        if args.realtime {
            std::thread::sleep(Duration::from_millis(config.frame_time_ms));
        }
    }

    log::info!(
        "Ran {} frames, {} draw calls in the last one",
        config.frames,
        queue.len()
    );

    if let Some(path) = &args.snapshot {
        let image = snapshot::render(&queue, config.resolution.width, config.resolution.height);
        image
            .save_ppm(path)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        log::info!("Wrote snapshot to {}", path.display());
    }

    Ok(())
}
