use crate::config::WorldConfig;
use envoys_core::host::AIR;
use envoys_core::{Particle, WorldService};
use envoys_types::{BlockPos, ChunkPos, ItemStack, PlayerRef, Vec3d, WorldPos};
use std::collections::HashMap;
use tracing::trace;

/// Block state filling the flat terrain.
pub const STONE: i32 = 1;

/// One world: flat stone up to `ground_level`, with block edits on top.
struct Level {
    ground_level: i32,
    loaded_chunk_radius: i32,
    blocks: HashMap<BlockPos, i32>,
}

impl Level {
    fn get_block(&self, pos: &BlockPos) -> i32 {
        match self.blocks.get(pos) {
            Some(&state_id) => state_id,
            None if pos.y <= self.ground_level => STONE,
            None => AIR,
        }
    }

    fn is_chunk_loaded(&self, chunk: ChunkPos) -> bool {
        chunk.x.abs() <= self.loaded_chunk_radius && chunk.z.abs() <= self.loaded_chunk_radius
    }
}

/// A player connected through the console.
pub struct OnlinePlayer {
    pub player: PlayerRef,
    pub world: String,
    pub inventory: Vec<ItemStack>,
}

/// World state: levels and online players.
pub struct WorldState {
    levels: HashMap<String, Level>,
    players: HashMap<String, OnlinePlayer>,
}

impl WorldState {
    pub fn new(worlds: &[WorldConfig]) -> Self {
        let levels = worlds
            .iter()
            .map(|w| {
                (
                    w.name.clone(),
                    Level {
                        ground_level: w.ground_level,
                        loaded_chunk_radius: w.loaded_chunk_radius,
                        blocks: HashMap::new(),
                    },
                )
            })
            .collect();
        Self {
            levels,
            players: HashMap::new(),
        }
    }

    pub fn world_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.levels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Add a player to `world`. Returns None if the world does not exist or
    /// the name is taken.
    pub fn join(&mut self, name: &str, world: &str) -> Option<PlayerRef> {
        if !self.levels.contains_key(world) {
            return None;
        }
        let key = name.to_lowercase();
        if self.players.contains_key(&key) {
            return None;
        }
        let player = PlayerRef::new(name);
        self.players.insert(
            key,
            OnlinePlayer {
                player: player.clone(),
                world: world.to_string(),
                inventory: Vec::new(),
            },
        );
        Some(player)
    }

    pub fn leave(&mut self, name: &str) -> Option<OnlinePlayer> {
        self.players.remove(&name.to_lowercase())
    }

    pub fn player(&self, name: &str) -> Option<&OnlinePlayer> {
        self.players.get(&name.to_lowercase())
    }

    /// Add an item to an online player's inventory. Returns false if they left.
    pub fn give_item(&mut self, player: &PlayerRef, item: ItemStack) -> bool {
        match self.players.values_mut().find(|p| p.player.id == player.id) {
            Some(online) => {
                online.inventory.push(item);
                true
            }
            None => false,
        }
    }
}

impl WorldService for WorldState {
    fn world_exists(&self, world: &str) -> bool {
        self.levels.contains_key(world)
    }

    fn is_chunk_loaded(&self, world: &str, chunk: ChunkPos) -> bool {
        self.levels
            .get(world)
            .map(|l| l.is_chunk_loaded(chunk))
            .unwrap_or(false)
    }

    fn block_at(&self, pos: &WorldPos) -> i32 {
        self.levels
            .get(&pos.world)
            .map(|l| l.get_block(&pos.block_pos()))
            .unwrap_or(AIR)
    }

    fn set_block(&mut self, pos: &WorldPos, state_id: i32) {
        if let Some(level) = self.levels.get_mut(&pos.world) {
            level.blocks.insert(pos.block_pos(), state_id);
        }
    }

    fn players_in(&self, world: &str) -> Vec<PlayerRef> {
        self.players
            .values()
            .filter(|p| p.world == world)
            .map(|p| p.player.clone())
            .collect()
    }

    fn add_particle(&mut self, world: &str, at: Vec3d, particle: Particle, viewers: &[PlayerRef]) {
        trace!(
            "{:?} particle in {} at ({:.1}, {:.1}, {:.1}) for {} players",
            particle,
            world,
            at.x,
            at.y,
            at.z,
            viewers.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envoys_core::host::CHEST;

    fn world_state() -> WorldState {
        WorldState::new(&[WorldConfig {
            name: "world".into(),
            ground_level: 63,
            loaded_chunk_radius: 1,
        }])
    }

    #[test]
    fn test_flat_terrain() {
        let ws = world_state();
        assert_eq!(ws.block_at(&WorldPos::new("world", 0, 63, 0)), STONE);
        assert_eq!(ws.block_at(&WorldPos::new("world", 0, 64, 0)), AIR);
        assert_eq!(ws.block_at(&WorldPos::new("missing", 0, 0, 0)), AIR);
    }

    #[test]
    fn test_set_block_overrides_terrain() {
        let mut ws = world_state();
        let pos = WorldPos::new("world", 3, 10, 3);
        ws.set_block(&pos, CHEST);
        assert_eq!(ws.block_at(&pos), CHEST);
        ws.set_block(&pos, AIR);
        assert_eq!(ws.block_at(&pos), AIR);
    }

    #[test]
    fn test_loaded_chunk_radius() {
        let ws = world_state();
        assert!(ws.is_chunk_loaded("world", ChunkPos::new(-1, 1)));
        assert!(!ws.is_chunk_loaded("world", ChunkPos::new(2, 0)));
        assert!(!ws.is_chunk_loaded("nether", ChunkPos::new(0, 0)));
    }

    #[test]
    fn test_join_and_players_in() {
        let mut ws = world_state();
        let steve = ws.join("Steve", "world").unwrap();
        assert!(ws.join("steve", "world").is_none());
        assert!(ws.join("Alex", "nether").is_none());
        assert_eq!(ws.players_in("world"), vec![steve.clone()]);

        assert!(ws.give_item(&steve, ItemStack::new(5, 2)));
        assert_eq!(ws.player("STEVE").unwrap().inventory.len(), 1);

        ws.leave("Steve");
        assert!(!ws.give_item(&steve, ItemStack::new(5, 2)));
    }
}
