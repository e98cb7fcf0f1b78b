use rand::Rng;

/// Whole-second countdown to the next spawn cycle, re-armed with a random
/// delay each time it elapses.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    min_seconds: u32,
    max_seconds: u32,
    seconds_left: u32,
}

impl SpawnTimer {
    pub fn new<R: Rng + ?Sized>(min_seconds: u32, max_seconds: u32, rng: &mut R) -> Self {
        let (min_seconds, max_seconds) = if min_seconds <= max_seconds {
            (min_seconds, max_seconds)
        } else {
            (max_seconds, min_seconds)
        };
        let mut timer = Self {
            min_seconds: min_seconds.max(1),
            max_seconds: max_seconds.max(1),
            seconds_left: 0,
        };
        timer.rearm(rng);
        timer
    }

    /// Count down one second. Returns true when a spawn cycle is due.
    pub fn tick_second<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            self.rearm(rng);
            true
        } else {
            false
        }
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    fn rearm<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.seconds_left = rng.gen_range(self.min_seconds..=self.max_seconds);
        tracing::debug!("Next envoy spawn cycle in {}s", self.seconds_left);
    }
}
