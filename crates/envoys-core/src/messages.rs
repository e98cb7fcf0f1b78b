use crate::error::{EnvoyError, EnvoyResult};
use std::collections::HashMap;
use std::path::Path;

pub const ENVOY_SPAWNED: &str = "envoy_spawned";
pub const ENVOY_SPAWNED_TEXT: &str = "envoy_spawned_text";
pub const ENVOY_CLAIMED: &str = "envoy_claimed";

fn builtin(id: &str) -> Option<&'static str> {
    match id {
        ENVOY_SPAWNED => Some("An envoy has spawned in {world} at {x}, {y}, {z}!"),
        ENVOY_SPAWNED_TEXT => Some("Envoy despawns in {time}"),
        ENVOY_CLAIMED => Some("You claimed an envoy!"),
        _ => None,
    }
}

/// Message templates keyed by id, with `{name}` placeholders.
#[derive(Debug, Clone, Default)]
pub struct Messages {
    templates: HashMap<String, String>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load templates from a flat TOML table of `id = "template"`.
    pub fn load(path: &Path) -> EnvoyResult<Self> {
        if !path.exists() {
            tracing::info!("No messages file found at {}, using defaults", path.display());
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
        let templates: HashMap<String, String> = toml::from_str(contents)?;
        Ok(Self { templates })
    }

    pub fn set(&mut self, id: &str, template: impl Into<String>) {
        self.templates.insert(id.to_string(), template.into());
    }

    /// Render message `id`, replacing each `{name}` with its value.
    pub fn format(&self, id: &str, args: &[(&str, &str)]) -> String {
        let template = match self.templates.get(id).map(String::as_str).or_else(|| builtin(id)) {
            Some(t) => t,
            None => {
                tracing::warn!("Unknown message id '{}'", id);
                return id.to_string();
            }
        };

        // Substituted values are copied as-is, never rescanned.
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after.find('}').and_then(|close| {
                let name = &after[..close];
                args.iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, v)| (*v, close))
            });
            match value {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}
