use envoys_core::Messenger;
use envoys_types::{PlayerRef, TextComponent};
use tracing::info;

/// Chat output for a headless server: every message goes to the log.
#[derive(Default)]
pub struct ConsoleMessenger;

impl Messenger for ConsoleMessenger {
    fn broadcast(&mut self, message: TextComponent) {
        info!("[Broadcast] {}", message.to_plain());
    }

    fn send_to(&mut self, player: &PlayerRef, message: TextComponent) {
        info!("[-> {}] {}", player.name, message.to_plain());
    }
}
