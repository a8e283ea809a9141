mod components;
mod config;
mod game;
mod logger;
mod systems;

use anyhow::{Result, ensure};
use clap::Parser;
use crossbeam::channel::Receiver;
use log::info;

use crate::{
    config::Config,
    game::Game,
    logger::{ChannelLogger, LogMessage},
};

fn main() -> Result<()> {
    let config = Config::parse();
    ensure!(
        config.delta > 0.0,
        "--delta must be positive, got {}",
        config.delta
    );

    let logs = ChannelLogger::install(config.log_level)?;

    let mut game = Game::new(&config);
    game.setup();
    drain(&logs);

    for _ in 0..config.frames {
        game.frame()?;
        drain(&logs);
    }

    let stats = game.stats();
    info!(
        "ran {} frames: {} projectiles fired, {} expired, {} hits, {} of {} enemies destroyed, {} entities alive",
        stats.frames,
        stats.projectiles_fired,
        stats.projectiles_expired,
        stats.hits,
        stats.enemies_destroyed,
        config.enemies,
        game.registry().entity_count()
    );
    drain(&logs);
    Ok(())
}

/// Print every log record captured since the last call.
fn drain(logs: &Receiver<LogMessage>) {
    for message in logs.try_iter() {
        println!("{message}");
    }
}
