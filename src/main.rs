//! Squash and stretch headless runner.
//!
//! Spawns one animator from a named preset, drives it at a fixed frame rate
//! and prints the animated scale of every frame as CSV
//! (`frame,time,x,y,z`) on stdout. Logs go to stderr through `env_logger`.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults if missing), then apply CLI overrides
//! 2. Load the presets JSON (built-in default preset if missing)
//! 3. Spawn the animator and trigger it
//! 4. Tick the [`Simulation`] once per frame and print the scale
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --preset jump --frames 60
//! RUST_LOG=debug cargo run -- --config demos/config.ini
//! ```

use clap::Parser;
use glam::Vec3;
use std::path::PathBuf;

use squashstretch::events::squashstretch::SquashStretchFinishedEvent;
use squashstretch::resources::presets::{DEFAULT_PRESET, SquashStretchPresets};
use squashstretch::resources::simconfig::SimConfig;
use squashstretch::sim::Simulation;

/// Squash and stretch animation runner
#[derive(Parser)]
#[command(version, about = "Plays a squash and stretch preset headlessly and prints the scale per frame")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON presets file (overrides the config file).
    #[arg(long, value_name = "PATH")]
    presets: Option<PathBuf>,

    /// Preset to play (overrides the config file).
    #[arg(long)]
    preset: Option<String>,

    /// Number of frames to simulate.
    #[arg(long)]
    frames: Option<u32>,

    /// Fixed simulation rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Seed for the play-chance rolls.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the available preset names and exit.
    #[arg(long)]
    list_presets: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => SimConfig::with_path(path),
        None => SimConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        log::info!("{}, using defaults", e);
    }
    if let Some(path) = cli.presets {
        config.presets_path = path;
    }
    if let Some(preset) = cli.preset {
        config.preset = preset;
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let presets = match SquashStretchPresets::load_from_file(&config.presets_path) {
        Ok(presets) => presets,
        Err(e) => {
            log::warn!("{}; only the '{}' preset is available", e, DEFAULT_PRESET);
            SquashStretchPresets::with_builtin()
        }
    };

    if cli.list_presets {
        for name in presets.names() {
            println!("{}", name);
        }
        return;
    }

    let Some(settings) = presets.get(&config.preset).cloned() else {
        eprintln!(
            "Error: preset '{}' not found (available: {})",
            config.preset,
            presets.names().join(", ")
        );
        std::process::exit(1);
    };
    if !settings.notes.is_empty() {
        log::info!("{}: {}", config.preset, settings.notes);
    }

    let mut sim = Simulation::new(config.seed).with_time_scale(config.time_scale);
    sim.world_mut()
        .add_observer(|trigger: bevy_ecs::observer::On<SquashStretchFinishedEvent>| {
            log::info!("Animator {:?} finished", trigger.event().entity);
        });

    let play_on_start = settings.play_on_start;
    let animator = sim.spawn_animator(settings, Vec3::ONE);
    let dt = config.frame_delta();
    let mut time = 0.0_f32;

    println!("frame,time,x,y,z");
    for frame in 0..config.frames {
        let first_trigger = frame == 0 && !play_on_start;
        let periodic = config.trigger_every > 0 && frame > 0 && frame % config.trigger_every == 0;
        if first_trigger || periodic {
            sim.play(animator);
        }

        sim.tick(dt);
        time += dt * config.time_scale;

        if let Some(scale) = sim.scale_of(animator) {
            println!(
                "{},{:.4},{:.5},{:.5},{:.5}",
                frame, time, scale.x, scale.y, scale.z
            );
        }
    }
}
