use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A block position in a world (x, y, z integers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn chunk_pos(&self) -> ChunkPos {
        ChunkPos {
            x: self.x >> 4,
            z: self.z >> 4,
        }
    }
}

/// A chunk position (x, z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// A 3D position with double precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A block position qualified by the name of the world it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPos {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPos {
    pub fn new(world: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    pub fn from_block(world: impl Into<String>, pos: BlockPos) -> Self {
        Self::new(world, pos.x, pos.y, pos.z)
    }

    pub fn block_pos(&self) -> BlockPos {
        BlockPos::new(self.x, self.y, self.z)
    }

    pub fn chunk_pos(&self) -> ChunkPos {
        self.block_pos().chunk_pos()
    }

    /// Unique key for this position: `world:x,y,z`.
    pub fn tag(&self) -> String {
        format!("{}:{},{},{}", self.world, self.x, self.y, self.z)
    }

    /// Horizontal center of the block, `dy` above its bottom face.
    pub fn center_above(&self, dy: f64) -> Vec3d {
        Vec3d::new(
            self.x as f64 + 0.5,
            self.y as f64 + dy,
            self.z as f64 + 0.5,
        )
    }
}

impl std::fmt::Display for WorldPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {}, {})", self.world, self.x, self.y, self.z)
    }
}

/// An online player as seen by gameplay code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: Uuid,
    pub name: String,
}

impl PlayerRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// An item stack handed out as a reward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub item_id: i32,
    /// Number of items in this stack (1-127).
    pub count: i8,
}

impl ItemStack {
    pub fn new(item_id: i32, count: i8) -> Self {
        Self { item_id, count }
    }
}

/// Text component for chat messages (simplified JSON text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextComponent {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub extra: Vec<TextComponent>,
}

impl TextComponent {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: None,
            italic: None,
            extra: Vec::new(),
        }
    }

    pub fn colored(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::plain(text)
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"text":""}"#.to_string())
    }

    /// The visible text with all formatting dropped.
    pub fn to_plain(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.extra {
            out.push_str(&child.to_plain());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_pos_negative_coords() {
        assert_eq!(BlockPos::new(-1, 64, -17).chunk_pos(), ChunkPos::new(-1, -2));
        assert_eq!(BlockPos::new(15, 0, 16).chunk_pos(), ChunkPos::new(0, 1));
    }

    #[test]
    fn test_world_pos_tag() {
        let pos = WorldPos::new("world", 10, 64, -3);
        assert_eq!(pos.tag(), "world:10,64,-3");
    }

    #[test]
    fn test_world_pos_equality_includes_world() {
        let a = WorldPos::new("world", 1, 2, 3);
        let b = WorldPos::new("nether", 1, 2, 3);
        assert_ne!(a, b);
        assert_eq!(a, WorldPos::from_block("world", BlockPos::new(1, 2, 3)));
    }

    #[test]
    fn test_center_above() {
        let pos = WorldPos::new("world", 4, 70, -2);
        assert_eq!(pos.center_above(1.0), Vec3d::new(4.5, 71.0, -1.5));
    }

    #[test]
    fn test_text_component_json_skips_empty_fields() {
        let text = TextComponent::colored("hi", "green");
        assert_eq!(text.to_json(), r#"{"text":"hi","color":"green"}"#);
    }

    #[test]
    fn test_to_plain_flattens_extra() {
        let mut text = TextComponent::plain("a");
        text.extra.push(TextComponent::colored("b", "gold"));
        assert_eq!(text.to_plain(), "ab");
    }
}
