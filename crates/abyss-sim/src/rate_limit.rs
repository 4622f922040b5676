//! Per-actor, per-category command rate limiting at the engine boundary.
//!
//! Entries are purged when an actor disconnects and opportunistically swept
//! once they are older than the entry TTL, so the map stays bounded.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use abyss_core::constants::{RATE_LIMIT_ENTRY_TTL_MS, RATE_LIMIT_SWEEP_CHANCE};
use abyss_core::enums::CommandCategory;
use abyss_core::types::ActorId;

pub struct RateLimiter {
    last_accepted: HashMap<ActorId, HashMap<CommandCategory, u64>>,
    rng: ChaCha8Rng,
}

impl RateLimiter {
    pub fn new(seed: u64) -> Self {
        Self {
            last_accepted: HashMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Returns true and records the arrival if the actor's previous accepted
    /// command in this category is at least its cooldown old.
    pub fn check(&mut self, actor: ActorId, category: CommandCategory, now_ms: u64) -> bool {
        if self.rng.gen_bool(RATE_LIMIT_SWEEP_CHANCE) {
            self.sweep(now_ms);
        }

        let per_actor = self.last_accepted.entry(actor).or_default();
        if let Some(&last) = per_actor.get(&category) {
            if now_ms.saturating_sub(last) < category.cooldown_ms() {
                trace!(?actor, ?category, "command rate limited");
                return false;
            }
        }
        per_actor.insert(category, now_ms);
        true
    }

    /// Drop all state for a disconnected actor.
    pub fn forget(&mut self, actor: ActorId) {
        self.last_accepted.remove(&actor);
    }

    /// Remove entries older than the TTL, and actors left with none.
    pub fn sweep(&mut self, now_ms: u64) {
        let before = self.last_accepted.len();
        for per_actor in self.last_accepted.values_mut() {
            per_actor.retain(|_, &mut last| now_ms.saturating_sub(last) <= RATE_LIMIT_ENTRY_TTL_MS);
        }
        self.last_accepted.retain(|_, per_actor| !per_actor.is_empty());
        debug!(
            removed = before - self.last_accepted.len(),
            "rate limiter swept"
        );
    }

    /// Number of actors currently tracked.
    pub fn tracked_actors(&self) -> usize {
        self.last_accepted.len()
    }
}
