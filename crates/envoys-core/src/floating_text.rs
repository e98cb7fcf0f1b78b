use crate::error::{EnvoyError, EnvoyResult};
use envoys_types::WorldPos;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// A floating label above a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingText {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub text: String,
}

impl FloatingText {
    pub fn pos(&self) -> WorldPos {
        WorldPos::new(self.world.clone(), self.x, self.y, self.z)
    }
}

/// Countdown displays keyed by envoy tag. This is the only envoy state that
/// survives a restart.
#[derive(Debug, Clone, Default)]
pub struct FloatingTexts {
    texts: BTreeMap<String, FloatingText>,
}

impl FloatingTexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the display for `tag`, or replace its text if it exists.
    pub fn upsert(&mut self, tag: &str, pos: &WorldPos, text: impl Into<String>) {
        let text = text.into();
        match self.texts.get_mut(tag) {
            Some(existing) => existing.text = text,
            None => {
                self.texts.insert(
                    tag.to_string(),
                    FloatingText {
                        world: pos.world.clone(),
                        x: pos.x,
                        y: pos.y,
                        z: pos.z,
                        text,
                    },
                );
            }
        }
    }

    pub fn remove(&mut self, tag: &str) -> Option<FloatingText> {
        self.texts.remove(tag)
    }

    pub fn get(&self, tag: &str) -> Option<&FloatingText> {
        self.texts.get(tag)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Load saved displays. Entries for worlds that no longer exist are dropped.
    pub fn load_from_file(path: &Path, world_exists: impl Fn(&str) -> bool) -> EnvoyResult<Self> {
        if !path.exists() {
            debug!("No envoy data at {}", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| EnvoyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let saved: BTreeMap<String, FloatingText> =
            serde_json::from_str(&contents).map_err(|source| EnvoyError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let mut texts = BTreeMap::new();
        for (tag, text) in saved {
            if world_exists(&text.world) {
                texts.insert(tag, text);
            } else {
                warn!("Dropping saved envoy text '{}': world '{}' not found", tag, text.world);
            }
        }
        debug!("Loaded {} envoy texts from {}", texts.len(), path.display());
        Ok(Self { texts })
    }

    pub fn save_to_file(&self, path: &Path) -> EnvoyResult<()> {
        let io_err = |source| EnvoyError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.texts).map_err(|source| EnvoyError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_text_only() {
        let mut texts = FloatingTexts::new();
        let pos = WorldPos::new("world", 1, 2, 3);
        texts.upsert(&pos.tag(), &pos, "5s");
        texts.upsert(&pos.tag(), &WorldPos::new("other", 0, 0, 0), "4s");
        let text = texts.get("world:1,2,3").unwrap();
        assert_eq!(text.text, "4s");
        assert_eq!(text.pos(), pos);
        assert_eq!(texts.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("envoy_data.json");

        let mut texts = FloatingTexts::new();
        let a = WorldPos::new("world", 1, 64, 1);
        let b = WorldPos::new("gone", 5, 64, 5);
        texts.upsert(&a.tag(), &a, "1m");
        texts.upsert(&b.tag(), &b, "2m");
        texts.save_to_file(&path).unwrap();

        let loaded = FloatingTexts::load_from_file(&path, |w| w == "world").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(&a.tag()).unwrap().text, "1m");
        assert!(loaded.get(&b.tag()).is_none());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded =
            FloatingTexts::load_from_file(&dir.path().join("none.json"), |_| true).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("envoy_data.json");
        std::fs::write(&path, "[not an object").unwrap();
        assert!(matches!(
            FloatingTexts::load_from_file(&path, |_| true),
            Err(EnvoyError::Json { .. })
        ));
    }
}
