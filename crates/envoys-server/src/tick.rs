use crate::chat::ConsoleMessenger;
use crate::console::{ConsoleCommand, HELP};
use crate::rewards::RewardGrant;
use crate::world::WorldState;
use envoys_core::{EnvoyCoordinator, EnvoyTask, Host, SpawnTimer, WorldService};
use envoys_scheduler::TickScheduler;
use envoys_types::WorldPos;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

pub const TICKS_PER_SECOND: u64 = 20;

/// Host services owned by the tick loop.
pub struct ServerHost {
    pub world: WorldState,
    pub scheduler: TickScheduler<EnvoyTask>,
    pub messenger: ConsoleMessenger,
}

impl ServerHost {
    pub fn new(world: WorldState) -> Self {
        Self {
            world,
            scheduler: TickScheduler::new(),
            messenger: ConsoleMessenger,
        }
    }

    pub fn host(&mut self) -> Host<'_> {
        Host {
            world: &mut self.world,
            scheduler: &mut self.scheduler,
            messenger: &mut self.messenger,
        }
    }
}

/// Channels feeding the tick loop.
pub struct TickInputs {
    pub commands: mpsc::UnboundedReceiver<ConsoleCommand>,
    pub grants: mpsc::UnboundedReceiver<RewardGrant>,
    pub shutdown_rx: watch::Receiver<bool>,
    pub shutdown_tx: watch::Sender<bool>,
}

/// The main game loop. Runs at 20 TPS and owns the coordinator and all
/// world state, so envoy callbacks never race each other.
pub async fn run_tick_loop(
    mut server: ServerHost,
    mut coordinator: EnvoyCoordinator,
    mut inputs: TickInputs,
) {
    let mut rng = StdRng::from_entropy();
    let config = coordinator.config();
    let mut spawn_timer =
        SpawnTimer::new(config.spawn_interval_min, config.spawn_interval_max, &mut rng);

    let tick_duration = Duration::from_millis(1000 / TICKS_PER_SECOND);
    let mut tick_count: u64 = 0;

    info!(
        "Tick loop started ({} TPS), first spawn cycle in {}s",
        TICKS_PER_SECOND,
        spawn_timer.seconds_left()
    );

    loop {
        let tick_start = Instant::now();

        if *inputs.shutdown_rx.borrow() {
            break;
        }

        // 1. Console commands
        while let Ok(cmd) = inputs.commands.try_recv() {
            handle_command(&mut server, &mut coordinator, cmd, &inputs.shutdown_tx);
        }

        // 2. Scheduled envoy tasks
        for (_, task) in server.scheduler.advance() {
            coordinator.run_task(&task, &mut server.host());
        }

        // 3. Spawn cycles
        if tick_count % TICKS_PER_SECOND == 0 && spawn_timer.tick_second(&mut rng) {
            let spawned = coordinator.spawn_cycle(&mut server.host());
            info!("Spawn cycle placed {} envoys", spawned.len());
        }

        // 4. Rewards queued by claims
        while let Ok(grant) = inputs.grants.try_recv() {
            if server.world.give_item(&grant.player, grant.stack.clone()) {
                info!(
                    "Gave {} x{} to {}",
                    grant.item, grant.stack.count, grant.player.name
                );
            } else {
                warn!("{} left before receiving {}", grant.player.name, grant.item);
            }
        }

        tick_count += 1;

        let elapsed = tick_start.elapsed();
        if elapsed < tick_duration {
            tokio::time::sleep(tick_duration - elapsed).await;
        } else if tick_count % 100 == 0 {
            warn!("Tick {} took {:?} (over {:?} budget)", tick_count, elapsed, tick_duration);
        }
    }

    match coordinator.save_data() {
        Ok(()) => info!("Envoy data saved"),
        Err(e) => error!("Failed to save envoy data: {}", e),
    }
}

fn handle_command(
    server: &mut ServerHost,
    coordinator: &mut EnvoyCoordinator,
    cmd: ConsoleCommand,
    shutdown_tx: &watch::Sender<bool>,
) {
    match cmd {
        ConsoleCommand::Start => {
            let spawned = coordinator.spawn_cycle(&mut server.host());
            info!("Spawn cycle placed {} envoys", spawned.len());
        }
        ConsoleCommand::Spawn { world, x, y, z } => {
            if !server.world.world_exists(&world) {
                warn!(
                    "Unknown world '{}' (available: {})",
                    world,
                    server.world.world_names().join(", ")
                );
                return;
            }
            coordinator.spawn_envoy(WorldPos::new(world, x, y, z), &mut server.host());
        }
        ConsoleCommand::Join { name, world } => match server.world.join(&name, &world) {
            Some(player) => info!("{} joined {} ({})", player.name, world, player.id),
            None => warn!("{} cannot join '{}'", name, world),
        },
        ConsoleCommand::Leave { name } => match server.world.leave(&name) {
            Some(online) => info!(
                "{} left carrying {} reward stacks",
                online.player.name,
                online.inventory.len()
            ),
            None => warn!("{} is not online", name),
        },
        ConsoleCommand::Use { name, x, y, z } => {
            let Some(online) = server.world.player(&name) else {
                warn!("{} is not online", name);
                return;
            };
            let player = online.player.clone();
            let pos = WorldPos::new(online.world.clone(), x, y, z);
            if !coordinator.handle_interact(&player, &pos, &mut server.host()) {
                info!("{} found no envoy at {}", player.name, pos);
            }
        }
        ConsoleCommand::List => {
            let envoys = coordinator.active_envoys();
            info!("{} active envoys", envoys.len());
            let mut tags: Vec<_> = envoys.values().collect();
            tags.sort_by(|a, b| a.tag.cmp(&b.tag));
            for envoy in tags {
                info!("  {} ({}s left)", envoy.tag, envoy.time_left);
            }
        }
        ConsoleCommand::Save => match coordinator.save_data() {
            Ok(()) => info!("Envoy data saved"),
            Err(e) => error!("Failed to save envoy data: {}", e),
        },
        ConsoleCommand::Help => {
            for line in &HELP {
                info!("{}", line);
            }
        }
        ConsoleCommand::Stop => {
            info!("Stopping server");
            let _ = shutdown_tx.send(true);
        }
    }
}
