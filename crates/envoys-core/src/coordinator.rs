use crate::config::{EnvoyConfig, SpawnRegion};
use crate::error::EnvoyResult;
use crate::floating_text::FloatingTexts;
use crate::host::{EnvoyTask, Host, Particle, RewardService, WorldService, AIR, CHEST};
use crate::messages::{Messages, ENVOY_CLAIMED, ENVOY_SPAWNED, ENVOY_SPAWNED_TEXT};
use envoys_scheduler::TaskId;
use envoys_types::{PlayerRef, TextComponent, WorldPos};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Attempts per region before giving up on finding an air block.
pub const MAX_SPAWN_RETRIES: u32 = 10;
/// Period of the countdown and particle tasks (one second at 20 TPS).
pub const TASK_PERIOD_TICKS: u64 = 20;

/// Everything that has to be retired together when an envoy goes away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvoyHandles {
    /// Key of the countdown display in `FloatingTexts`.
    pub display: String,
    pub countdown: TaskId,
    pub particles: TaskId,
}

/// A live envoy.
#[derive(Debug, Clone)]
pub struct Envoy {
    pub tag: String,
    pub pos: WorldPos,
    /// Seconds until despawn.
    pub time_left: u32,
    pub handles: EnvoyHandles,
}

/// Owns the active envoys and drives their lifecycle.
pub struct EnvoyCoordinator {
    config: EnvoyConfig,
    messages: Messages,
    rewards: Box<dyn RewardService>,
    active: HashMap<String, Envoy>,
    displays: FloatingTexts,
    data_file: PathBuf,
    rng: StdRng,
}

impl EnvoyCoordinator {
    pub fn new(
        config: EnvoyConfig,
        messages: Messages,
        rewards: Box<dyn RewardService>,
        data_file: PathBuf,
        world: &dyn WorldService,
    ) -> EnvoyResult<Self> {
        Self::with_rng(config, messages, rewards, data_file, world, StdRng::from_entropy())
    }

    pub fn with_rng(
        config: EnvoyConfig,
        messages: Messages,
        rewards: Box<dyn RewardService>,
        data_file: PathBuf,
        world: &dyn WorldService,
        rng: StdRng,
    ) -> EnvoyResult<Self> {
        config.validate()?;

        let displays = match FloatingTexts::load_from_file(&data_file, |w| world.world_exists(w)) {
            Ok(displays) => displays,
            Err(e) => {
                error!("Failed to load envoy data: {}", e);
                FloatingTexts::new()
            }
        };

        Ok(Self {
            config,
            messages,
            rewards,
            active: HashMap::new(),
            displays,
            data_file,
            rng,
        })
    }

    /// Spawn a random number of envoys across every configured region.
    /// Returns the tags of the envoys that were placed.
    pub fn spawn_cycle(&mut self, host: &mut Host<'_>) -> Vec<String> {
        let count = self
            .rng
            .gen_range(self.config.min_envoys..=self.config.max_envoys);
        let regions: Vec<(String, SpawnRegion)> = self
            .config
            .spawn_locations
            .iter()
            .map(|(world, region)| (world.clone(), *region))
            .collect();

        info!("Starting envoy spawn cycle ({} per region)", count);
        let mut spawned = Vec::new();
        for _ in 0..count {
            for (world, region) in &regions {
                if !host.world.world_exists(world) {
                    continue;
                }
                if let Some(tag) = self.try_spawn_in_region(world, region, host) {
                    spawned.push(tag);
                }
            }
        }
        spawned
    }

    fn try_spawn_in_region(
        &mut self,
        world: &str,
        region: &SpawnRegion,
        host: &mut Host<'_>,
    ) -> Option<String> {
        for _ in 0..MAX_SPAWN_RETRIES {
            let pos = WorldPos::new(
                world,
                self.rng.gen_range(region.x_min..=region.x_max),
                self.rng.gen_range(region.y_min..=region.y_max),
                self.rng.gen_range(region.z_min..=region.z_max),
            );

            // Never force a chunk load for an envoy.
            if !host.world.is_chunk_loaded(world, pos.chunk_pos()) {
                warn!(
                    "Skipped envoy spawn at {}, {}, {} in {} because the chunk is not loaded",
                    pos.x, pos.y, pos.z, world
                );
                return None;
            }

            if host.world.block_at(&pos) == AIR {
                let tag = pos.tag();
                return self.spawn_envoy(pos, host).then_some(tag);
            }
        }

        warn!(
            "Failed to find an air block for envoy spawn in {} after {} retries",
            world, MAX_SPAWN_RETRIES
        );
        None
    }

    /// Place an envoy at `pos`. Returns false if one is already live there.
    pub fn spawn_envoy(&mut self, pos: WorldPos, host: &mut Host<'_>) -> bool {
        let tag = pos.tag();
        if self.active.contains_key(&tag) {
            warn!("Envoy {} is already active", tag);
            return false;
        }

        host.world.set_block(&pos, CHEST);

        let time_left = self.config.despawn_timer;
        self.refresh_display(&tag, &pos, time_left);
        let particles = host
            .scheduler
            .schedule_repeating(EnvoyTask::Particles(tag.clone()), TASK_PERIOD_TICKS);

        let text = self.messages.format(
            ENVOY_SPAWNED,
            &[
                ("world", &pos.world),
                ("x", &pos.x.to_string()),
                ("y", &pos.y.to_string()),
                ("z", &pos.z.to_string()),
            ],
        );
        host.messenger.broadcast(TextComponent::colored(text, "green"));

        let countdown = host
            .scheduler
            .schedule_repeating(EnvoyTask::Countdown(tag.clone()), TASK_PERIOD_TICKS);

        info!("Spawned envoy {} ({}s)", tag, time_left);
        self.active.insert(
            tag.clone(),
            Envoy {
                tag: tag.clone(),
                pos,
                time_left,
                handles: EnvoyHandles {
                    display: tag,
                    countdown,
                    particles,
                },
            },
        );
        true
    }

    /// Dispatch a task the scheduler reported as due.
    pub fn run_task(&mut self, task: &EnvoyTask, host: &mut Host<'_>) {
        match task {
            EnvoyTask::Countdown(tag) => self.tick_countdown(tag, host),
            EnvoyTask::Particles(tag) => self.emit_particles(tag, host),
        }
    }

    fn tick_countdown(&mut self, tag: &str, host: &mut Host<'_>) {
        let Some(envoy) = self.active.get_mut(tag) else {
            return;
        };

        if envoy.time_left > 0 {
            envoy.time_left -= 1;
            let (pos, time_left) = (envoy.pos.clone(), envoy.time_left);
            self.refresh_display(tag, &pos, time_left);
        } else {
            debug!("Envoy {} despawned", tag);
            self.remove_envoy(tag, host);
        }
    }

    fn emit_particles(&mut self, tag: &str, host: &mut Host<'_>) {
        let Some(envoy) = self.active.get(tag) else {
            return;
        };
        let viewers = host.world.players_in(&envoy.pos.world);
        host.world.add_particle(
            &envoy.pos.world,
            envoy.pos.center_above(1.0),
            Particle::Lava,
            &viewers,
        );
    }

    fn refresh_display(&mut self, tag: &str, pos: &WorldPos, time_left: u32) {
        let time = format_time(time_left);
        let text = self.messages.format(ENVOY_SPAWNED_TEXT, &[("time", &time)]);
        self.displays.upsert(tag, pos, text);
    }

    /// Retire an envoy: clear its block, drop its display and cancel both of
    /// its tasks. Returns false if `tag` was not active.
    pub fn remove_envoy(&mut self, tag: &str, host: &mut Host<'_>) -> bool {
        let Some(envoy) = self.active.remove(tag) else {
            return false;
        };

        host.world.set_block(&envoy.pos, AIR);
        self.displays.remove(&envoy.handles.display);
        host.scheduler.cancel(envoy.handles.particles);
        host.scheduler.cancel(envoy.handles.countdown);
        true
    }

    /// A player claimed the envoy at `pos`.
    ///
    /// The confirmation, effect and reward are delivered even when no active
    /// envoy matches the position.
    pub fn claim_envoy(&mut self, player: &PlayerRef, pos: &WorldPos, host: &mut Host<'_>) {
        let matched = self
            .active
            .values()
            .find(|e| e.pos == *pos)
            .map(|e| e.tag.clone());
        match matched {
            Some(tag) => {
                self.remove_envoy(&tag, host);
                info!("{} claimed envoy {}", player.name, tag);
            }
            None => debug!("{} claimed {} with no active envoy there", player.name, pos),
        }

        let text = self.messages.format(ENVOY_CLAIMED, &[("player", &player.name)]);
        host.messenger.send_to(player, TextComponent::colored(text, "gold"));

        let viewers = host.world.players_in(&pos.world);
        host.world
            .add_particle(&pos.world, pos.center_above(1.0), Particle::Wind, &viewers);

        self.rewards.give_reward(player);
    }

    /// Block interaction hook. Returns true when the interaction hit an envoy
    /// and was consumed by the claim.
    pub fn handle_interact(
        &mut self,
        player: &PlayerRef,
        pos: &WorldPos,
        host: &mut Host<'_>,
    ) -> bool {
        if !self.is_envoy_position(pos) {
            return false;
        }
        self.claim_envoy(player, pos, host);
        true
    }

    pub fn is_envoy_position(&self, pos: &WorldPos) -> bool {
        self.active.values().any(|e| e.pos == *pos)
    }

    pub fn active_envoys(&self) -> &HashMap<String, Envoy> {
        &self.active
    }

    pub fn envoy(&self, tag: &str) -> Option<&Envoy> {
        self.active.get(tag)
    }

    pub fn displays(&self) -> &FloatingTexts {
        &self.displays
    }

    pub fn config(&self) -> &EnvoyConfig {
        &self.config
    }

    pub fn save_data(&self) -> EnvoyResult<()> {
        self.displays.save_to_file(&self.data_file)?;
        debug!("Saved {} envoy texts to {}", self.displays.len(), self.data_file.display());
        Ok(())
    }
}

/// Render seconds as `1m5s`, dropping zero components.
pub fn format_time(seconds: u32) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    let mut out = String::new();
    if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if seconds > 0 {
        out.push_str(&format!("{}s", seconds));
    }
    out
}
