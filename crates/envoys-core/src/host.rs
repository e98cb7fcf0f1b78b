use envoys_scheduler::{TaskId, TickScheduler};
use envoys_types::{ChunkPos, PlayerRef, TextComponent, Vec3d, WorldPos};

/// Block state ID for air.
pub const AIR: i32 = 0;
/// Block state ID placed for an envoy (a chest).
pub const CHEST: i32 = 2955;

/// Particle effects the envoy feature emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Particle {
    /// Ambient effect above a live envoy.
    Lava,
    /// Burst shown when an envoy is claimed.
    Wind,
}

/// Payload of a repeating envoy task, handed back by the scheduler when due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvoyTask {
    Countdown(String),
    Particles(String),
}

/// Block and particle access to the host's worlds.
pub trait WorldService {
    fn world_exists(&self, world: &str) -> bool;
    fn is_chunk_loaded(&self, world: &str, chunk: ChunkPos) -> bool;
    fn block_at(&self, pos: &WorldPos) -> i32;
    fn set_block(&mut self, pos: &WorldPos, state_id: i32);
    fn players_in(&self, world: &str) -> Vec<PlayerRef>;
    fn add_particle(&mut self, world: &str, at: Vec3d, particle: Particle, viewers: &[PlayerRef]);
}

/// Host tick scheduler.
pub trait Scheduler {
    fn schedule_repeating(&mut self, task: EnvoyTask, period_ticks: u64) -> TaskId;
    fn cancel(&mut self, id: TaskId) -> bool;
}

impl Scheduler for TickScheduler<EnvoyTask> {
    fn schedule_repeating(&mut self, task: EnvoyTask, period_ticks: u64) -> TaskId {
        TickScheduler::schedule_repeating(self, task, period_ticks)
    }

    fn cancel(&mut self, id: TaskId) -> bool {
        TickScheduler::cancel(self, id)
    }
}

/// Chat delivery.
pub trait Messenger {
    fn broadcast(&mut self, message: TextComponent);
    fn send_to(&mut self, player: &PlayerRef, message: TextComponent);
}

/// Grants the reward for a claimed envoy.
pub trait RewardService {
    fn give_reward(&mut self, player: &PlayerRef);
}

/// Host services borrowed for the duration of one coordinator call.
pub struct Host<'a> {
    pub world: &'a mut dyn WorldService,
    pub scheduler: &'a mut dyn Scheduler,
    pub messenger: &'a mut dyn Messenger,
}
