use clap::Parser;
use log::LevelFilter;

/// Headless frame loop driving the tiny2d ECS.
#[derive(Debug, Clone, Parser)]
#[command(name = "tiny2d", version)]
pub struct Config {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    /// Number of enemies to spawn
    #[arg(long, default_value_t = 8)]
    pub enemies: u32,

    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub delta: f32,

    /// Maximum log level: off, error, warn, info, debug or trace
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}
