use crate::config::Audio3dConfig;
use crate::game::{GameWorld, RunStats};
use crate::input::InputSource;
use crate::scripted_input::ScriptedInputPlayer;
use anyhow::{Context, Result};
use audio3d_audio::{AudioManager, PlaybackEngine, ResourceLoader};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

pub struct HeadlessConfig {
    pub config: Audio3dConfig,
    pub scripted_input: Option<PathBuf>,
    pub max_ticks: Option<u64>,
    /// Sleep between ticks so audio plays at wall-clock speed.
    pub realtime: bool,
}

/// Build the scene on `engine` and run it until the tick budget runs out or
/// the script asks to quit.
pub fn run<E, L>(engine: E, loader: &mut L, cfg: HeadlessConfig) -> Result<RunStats>
where
    E: PlaybackEngine,
    L: ResourceLoader<Waveform = E::Waveform>,
{
    let input = match cfg.scripted_input.as_deref() {
        Some(path) => InputSource::Scripted(ScriptedInputPlayer::from_path(path)?),
        None => InputSource::Idle,
    };

    let audio = AudioManager::initialize(
        engine,
        loader,
        &cfg.config.sound_names(),
        cfg.config.audio,
    )
    .context("failed to initialize audio")?;

    let mut world = GameWorld::new(audio, input, &cfg.config);
    run_loop(&mut world, cfg.max_ticks, cfg.realtime, cfg.config.tick_rate);

    let stats = world.shutdown();
    info!(
        ticks = stats.ticks,
        retired = stats.retired,
        orphaned = stats.orphaned,
        entity_errors = stats.entity_errors,
        "Headless run finished"
    );
    Ok(stats)
}

fn run_loop<E: PlaybackEngine>(
    world: &mut GameWorld<E>,
    max_ticks: Option<u64>,
    realtime: bool,
    tick_rate: u32,
) {
    let tick_duration = world.tick_duration();
    let report_every = u64::from(tick_rate.max(1));
    let started = Instant::now();
    let mut tick: u64 = 0;

    loop {
        if max_ticks.is_some_and(|max| tick >= max) {
            info!(tick, "Reached max ticks");
            break;
        }

        let actions = world.step();
        tick += 1;

        if tick % report_every == 0 {
            let position = world.camera().position;
            let stats = world.stats();
            info!(
                tick,
                active = world.audio().active_count(),
                retired = stats.retired,
                orphaned = stats.orphaned,
                x = position.x,
                z = position.z,
                "Audio scene"
            );
            for entity in world.entities() {
                debug!(
                    entity = entity.name(),
                    distance = entity.body().state().position.distance(position),
                    "Entity distance"
                );
            }
        }

        if actions.quit {
            info!(tick, "Scripted input requested quit");
            break;
        }

        if realtime {
            let target = tick_duration * u32::try_from(tick).unwrap_or(u32::MAX);
            if let Some(remaining) = target.checked_sub(started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }
}
