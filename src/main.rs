use anyhow::Result;
use log::info;

mod app;
mod config;
mod core;
mod engine;
mod game;

use config::GameConfig;

fn main() -> Result<()> {
    // Initialize logger; RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Kuro Run...");

    let config = GameConfig::load_or_default(GameConfig::default_path())?;
    app::run(config)?;

    info!("Goodbye");
    Ok(())
}
