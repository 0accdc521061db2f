//! audio3d - 3D positional audio demo
//!
//! Headless executable: a camera-mounted listener flies past a circling cat
//! and a barking dog while the audio manager keeps every sound spatialized.

mod config;
mod entities;
mod game;
mod headless;
mod input;
mod scripted_input;

use anyhow::{Context, Result};
use audio3d_audio::backend::{SimulatedEngine, SimulatedLoader};
use config::Audio3dConfig;
use headless::HeadlessConfig;
use std::{env, path::PathBuf};
use tracing::info;

/// Ticks run when neither `--max-ticks` nor `--realtime` bounds the run.
const DEFAULT_HEADLESS_TICKS: u64 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Simulated,
    Rodio,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting audio3d v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let mut config = match cli.config.as_deref() {
        Some(path) => Audio3dConfig::load_from_path(path),
        None => Audio3dConfig::load(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(path) = cli.save_config.as_deref() {
        config
            .save_to_path(path)
            .with_context(|| format!("failed to save config to {}", path.display()))?;
        info!(path = %path.display(), "Saved effective config");
    }

    let max_ticks = match (cli.max_ticks, cli.realtime) {
        (Some(max), _) => Some(max),
        (None, true) => None,
        (None, false) => Some(DEFAULT_HEADLESS_TICKS),
    };

    let run = HeadlessConfig {
        config,
        scripted_input: cli.scripted_input,
        max_ticks,
        realtime: cli.realtime,
    };

    let stats = match cli.backend {
        Backend::Simulated => {
            let mut loader = SimulatedLoader::new(
                run.config
                    .sounds
                    .iter()
                    .map(|entry| (entry.name.clone(), entry.duration())),
            );
            headless::run(SimulatedEngine::new(), &mut loader, run)?
        }
        Backend::Rodio => run_rodio(run)?,
    };

    info!(ticks = stats.ticks, "Exiting audio3d");
    Ok(())
}

#[cfg(feature = "rodio_backend")]
fn run_rodio(run: HeadlessConfig) -> Result<game::RunStats> {
    use audio3d_audio::backend::rodio_backend::RodioEngine;
    use audio3d_audio::backend::FileLoader;

    let engine = RodioEngine::new()?;
    let mut loader = FileLoader::new(run.config.assets_dir.clone());
    info!(root = %loader.root().display(), "Loading sounds from disk");
    headless::run(engine, &mut loader, run)
}

#[cfg(not(feature = "rodio_backend"))]
fn run_rodio(_run: HeadlessConfig) -> Result<game::RunStats> {
    anyhow::bail!("--backend rodio requires building with the `rodio_backend` feature")
}

struct CliOptions {
    config: Option<PathBuf>,
    save_config: Option<PathBuf>,
    scripted_input: Option<PathBuf>,
    max_ticks: Option<u64>,
    seed: Option<u64>,
    backend: Backend,
    realtime: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            config: None,
            save_config: None,
            scripted_input: None,
            max_ticks: None,
            seed: None,
            backend: Backend::Simulated,
            realtime: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--save-config" => {
                    if let Some(path) = args.next() {
                        opts.save_config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--save-config requires a file path");
                    }
                }
                "--scripted-input" => {
                    if let Some(path) = args.next() {
                        opts.scripted_input = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--scripted-input requires a file path");
                    }
                }
                "--max-ticks" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.max_ticks = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--max-ticks must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--max-ticks requires an integer");
                    }
                }
                "--seed" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.seed = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--seed must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--seed requires an integer");
                    }
                }
                "--backend" => match args.next().as_deref() {
                    Some("simulated") => opts.backend = Backend::Simulated,
                    Some("rodio") => opts.backend = Backend::Rodio,
                    Some(other) => {
                        tracing::error!(value = other, "--backend must be `simulated` or `rodio`");
                    }
                    None => tracing::error!("--backend requires `simulated` or `rodio`"),
                },
                "--realtime" => opts.realtime = true,
                other => tracing::warn!(arg = other, "Ignoring unknown argument"),
            }
        }

        opts
    }
}
