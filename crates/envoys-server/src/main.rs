mod chat;
mod config;
mod console;
mod rewards;
mod tick;
mod world;

use config::ServerConfig;
use envoys_core::{EnvoyConfig, EnvoyCoordinator, Messages, RewardTable};
use rewards::ItemRewards;
use std::path::Path;
use tokio::sync::{mpsc, watch};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Envoys server...");

    let config = ServerConfig::load(Path::new("config/server.toml"))?;
    let envoy_config = EnvoyConfig::load(Path::new(&config.envoys_config))?;
    let messages = Messages::load(Path::new(&config.messages_config))?;
    info!(
        "Config loaded: {} worlds, {} spawn regions, despawn_timer={}s",
        config.worlds.len(),
        envoy_config.spawn_locations.len(),
        envoy_config.despawn_timer
    );

    let world = world::WorldState::new(&config.worlds);

    // Claims queue rewards here; the tick loop hands them out.
    let (grant_tx, grant_rx) = mpsc::unbounded_channel();
    let rewards = ItemRewards::new(RewardTable::new(envoy_config.rewards.clone()), grant_tx);

    let coordinator = EnvoyCoordinator::new(
        envoy_config,
        messages,
        Box::new(rewards),
        config.data_file(),
        &world,
    )?;
    info!("Restored {} envoy texts", coordinator.displays().len());

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    // Stdin reads block and cannot be cancelled, so they stay off the runtime.
    std::thread::Builder::new()
        .name("console".into())
        .spawn(move || console::read_console(std::io::stdin().lock(), command_tx))?;

    // Graceful shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ctrlc_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received shutdown signal");
        let _ = ctrlc_tx.send(true);
    });

    tick::run_tick_loop(
        tick::ServerHost::new(world),
        coordinator,
        tick::TickInputs {
            commands: command_rx,
            grants: grant_rx,
            shutdown_rx,
            shutdown_tx,
        },
    )
    .await;

    info!("Server shut down cleanly");
    Ok(())
}
