use crate::error::{EnvoyError, EnvoyResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Axis-aligned box of block coordinates an envoy may spawn in. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpawnRegion {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
    pub z_min: i32,
    pub z_max: i32,
}

impl SpawnRegion {
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        (self.x_min..=self.x_max).contains(&x)
            && (self.y_min..=self.y_max).contains(&y)
            && (self.z_min..=self.z_max).contains(&z)
    }

    fn validate(&self, world: &str) -> EnvoyResult<()> {
        for (axis, min, max) in [
            ("x", self.x_min, self.x_max),
            ("y", self.y_min, self.y_max),
            ("z", self.z_min, self.z_max),
        ] {
            if min > max {
                return Err(EnvoyError::InvalidConfig(format!(
                    "spawn region '{}': {}-min {} is greater than {}-max {}",
                    world, axis, min, axis, max
                )));
            }
        }
        Ok(())
    }
}

/// One weighted entry of the reward pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewardEntry {
    /// Display name, e.g. "minecraft:diamond".
    pub item: String,
    pub item_id: i32,
    #[serde(default = "default_count")]
    pub min_count: i8,
    #[serde(default = "default_count")]
    pub max_count: i8,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvoyConfig {
    #[serde(default)]
    pub spawn_locations: BTreeMap<String, SpawnRegion>,
    /// Seconds an envoy stays before despawning.
    #[serde(default = "default_despawn_timer")]
    pub despawn_timer: u32,
    #[serde(default = "default_min_envoys")]
    pub min_envoys: u32,
    #[serde(default = "default_max_envoys")]
    pub max_envoys: u32,
    /// Seconds between spawn cycles, drawn uniformly from this range.
    #[serde(default = "default_spawn_interval_min")]
    pub spawn_interval_min: u32,
    #[serde(default = "default_spawn_interval_max")]
    pub spawn_interval_max: u32,
    #[serde(default)]
    pub rewards: Vec<RewardEntry>,
}

fn default_despawn_timer() -> u32 {
    300
}

fn default_min_envoys() -> u32 {
    1
}

fn default_max_envoys() -> u32 {
    3
}

fn default_spawn_interval_min() -> u32 {
    600
}

fn default_spawn_interval_max() -> u32 {
    1200
}

fn default_count() -> i8 {
    1
}

fn default_weight() -> u32 {
    1
}

impl Default for EnvoyConfig {
    fn default() -> Self {
        Self {
            spawn_locations: BTreeMap::new(),
            despawn_timer: default_despawn_timer(),
            min_envoys: default_min_envoys(),
            max_envoys: default_max_envoys(),
            spawn_interval_min: default_spawn_interval_min(),
            spawn_interval_max: default_spawn_interval_max(),
            rewards: Vec::new(),
        }
    }
}

impl EnvoyConfig {
    pub fn load(path: &Path) -> EnvoyResult<Self> {
        if !path.exists() {
            tracing::info!("No envoy config found at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| EnvoyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| EnvoyError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn validate(&self) -> EnvoyResult<()> {
        if self.min_envoys > self.max_envoys {
            return Err(EnvoyError::InvalidConfig(format!(
                "min_envoys {} is greater than max_envoys {}",
                self.min_envoys, self.max_envoys
            )));
        }
        if self.spawn_interval_min > self.spawn_interval_max {
            return Err(EnvoyError::InvalidConfig(format!(
                "spawn_interval_min {} is greater than spawn_interval_max {}",
                self.spawn_interval_min, self.spawn_interval_max
            )));
        }
        for (world, region) in &self.spawn_locations {
            region.validate(world)?;
        }
        for reward in &self.rewards {
            if reward.weight == 0 {
                return Err(EnvoyError::InvalidConfig(format!(
                    "reward '{}' has zero weight",
                    reward.item
                )));
            }
            if reward.min_count < 1 || reward.min_count > reward.max_count {
                return Err(EnvoyError::InvalidConfig(format!(
                    "reward '{}' count range {}..={} is invalid",
                    reward.item, reward.min_count, reward.max_count
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
despawn_timer = 65
min_envoys = 2
max_envoys = 4

[spawn_locations.world]
x-min = -100
x-max = 100
y-min = 60
y-max = 80
z-min = -50
z-max = 50

[[rewards]]
item = "minecraft:diamond"
item_id = 800
min_count = 1
max_count = 3
weight = 5
"#;

    #[test]
    fn test_parse_sample() {
        let config = EnvoyConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.despawn_timer, 65);
        assert_eq!(config.min_envoys, 2);
        assert_eq!(config.max_envoys, 4);
        assert_eq!(config.spawn_interval_min, 600);
        let region = config.spawn_locations["world"];
        assert_eq!(region.x_min, -100);
        assert_eq!(region.z_max, 50);
        assert_eq!(config.rewards.len(), 1);
        assert_eq!(config.rewards[0].weight, 5);
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EnvoyConfig::parse("").unwrap();
        assert_eq!(config.despawn_timer, 300);
        assert!(config.spawn_locations.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EnvoyConfig::load(&dir.path().join("envoys.toml")).unwrap();
        assert_eq!(config.max_envoys, 3);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("envoys.toml");
        std::fs::write(&path, "despawn_timer = \"soon\"").unwrap();
        assert!(matches!(EnvoyConfig::load(&path), Err(EnvoyError::Toml { .. })));
    }

    #[test]
    fn test_validate_rejects_inverted_counts() {
        let config = EnvoyConfig {
            min_envoys: 5,
            max_envoys: 1,
            ..EnvoyConfig::default()
        };
        assert!(matches!(config.validate(), Err(EnvoyError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_region() {
        let mut config = EnvoyConfig::default();
        config.spawn_locations.insert(
            "world".into(),
            SpawnRegion {
                x_min: 0,
                x_max: 10,
                y_min: 20,
                y_max: 10,
                z_min: 0,
                z_max: 10,
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_region_contains_is_inclusive() {
        let region = SpawnRegion {
            x_min: 0,
            x_max: 10,
            y_min: 0,
            y_max: 10,
            z_min: 0,
            z_max: 10,
        };
        assert!(region.contains(0, 10, 5));
        assert!(!region.contains(11, 0, 0));
        assert!(!region.contains(0, -1, 0));
    }
}
