use envoys_core::{RewardService, RewardTable};
use envoys_types::{ItemStack, PlayerRef};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::warn;

/// An item owed to a player, applied by the tick loop.
#[derive(Debug)]
pub struct RewardGrant {
    pub player: PlayerRef,
    pub item: String,
    pub stack: ItemStack,
}

/// Draws from the configured reward table and queues the grant.
pub struct ItemRewards {
    table: RewardTable,
    rng: StdRng,
    tx: mpsc::UnboundedSender<RewardGrant>,
}

impl ItemRewards {
    pub fn new(table: RewardTable, tx: mpsc::UnboundedSender<RewardGrant>) -> Self {
        Self {
            table,
            rng: StdRng::from_entropy(),
            tx,
        }
    }
}

impl RewardService for ItemRewards {
    fn give_reward(&mut self, player: &PlayerRef) {
        let Some((entry, stack)) = self.table.pick(&mut self.rng) else {
            warn!("No envoy rewards configured, {} gets nothing", player.name);
            return;
        };
        let grant = RewardGrant {
            player: player.clone(),
            item: entry.item.clone(),
            stack,
        };
        if self.tx.send(grant).is_err() {
            warn!("Reward channel closed, dropping reward for {}", player.name);
        }
    }
}
