use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Directory holding plugin state (envoy_data.json).
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_envoys_config")]
    pub envoys_config: String,
    #[serde(default = "default_messages_config")]
    pub messages_config: String,
    #[serde(default = "default_worlds")]
    pub worlds: Vec<WorldConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorldConfig {
    pub name: String,
    /// Highest solid block Y of the flat terrain.
    #[serde(default = "default_ground_level")]
    pub ground_level: i32,
    /// Chunks within this radius of the origin stay loaded.
    #[serde(default = "default_loaded_chunk_radius")]
    pub loaded_chunk_radius: i32,
}

fn default_data_dir() -> String {
    "data".into()
}

fn default_envoys_config() -> String {
    "config/envoys.toml".into()
}

fn default_messages_config() -> String {
    "config/messages.toml".into()
}

fn default_worlds() -> Vec<WorldConfig> {
    vec![WorldConfig {
        name: "world".into(),
        ground_level: default_ground_level(),
        loaded_chunk_radius: default_loaded_chunk_radius(),
    }]
}

fn default_ground_level() -> i32 {
    63
}

fn default_loaded_chunk_radius() -> i32 {
    8
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            envoys_config: default_envoys_config(),
            messages_config: default_messages_config(),
            worlds: default_worlds(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: ServerConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::info!("No config file found at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn data_file(&self) -> PathBuf {
        Path::new(&self.data_dir).join("envoy_data.json")
    }
}
