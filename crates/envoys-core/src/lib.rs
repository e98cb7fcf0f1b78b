pub mod config;
pub mod coordinator;
pub mod error;
pub mod floating_text;
pub mod host;
pub mod messages;
pub mod rewards;
pub mod timer;

pub use config::{EnvoyConfig, RewardEntry, SpawnRegion};
pub use coordinator::{Envoy, EnvoyCoordinator, EnvoyHandles};
pub use error::{EnvoyError, EnvoyResult};
pub use floating_text::{FloatingText, FloatingTexts};
pub use host::{EnvoyTask, Host, Messenger, Particle, RewardService, Scheduler, WorldService};
pub use messages::Messages;
pub use rewards::RewardTable;
pub use timer::SpawnTimer;
