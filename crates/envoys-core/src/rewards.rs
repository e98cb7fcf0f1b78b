use crate::config::RewardEntry;
use envoys_types::ItemStack;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Weighted pool of item rewards.
#[derive(Debug, Clone)]
pub struct RewardTable {
    entries: Vec<RewardEntry>,
    index: Option<WeightedIndex<u32>>,
}

impl RewardTable {
    pub fn new(entries: Vec<RewardEntry>) -> Self {
        let index = WeightedIndex::new(entries.iter().map(|e| e.weight)).ok();
        Self { entries, index }
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_none()
    }

    /// Draw one reward. `None` if the table is empty.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&RewardEntry, ItemStack)> {
        let index = self.index.as_ref()?;
        let entry = &self.entries[index.sample(rng)];
        let count = rng.gen_range(entry.min_count..=entry.max_count);
        Some((entry, ItemStack::new(entry.item_id, count)))
    }
}
