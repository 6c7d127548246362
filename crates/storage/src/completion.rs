//! In-memory per-user completion ledger.

use dashmap::DashMap;
use questline_core::{ChainResult, MissionId, UserId};
use rustc_hash::FxHashSet;

use crate::traits::CompletionSource;

/// Records which missions each user has completed.
#[derive(Debug, Default)]
pub struct CompletionLedger {
    completed: DashMap<UserId, FxHashSet<MissionId>>,
}

impl CompletionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `mission_id` completed for `user_id`. Returns false if it already was.
    pub fn mark_completed(&self, user_id: UserId, mission_id: MissionId) -> bool {
        self.completed.entry(user_id).or_default().insert(mission_id)
    }

    /// Clear a completion. Returns false if there was nothing to clear.
    pub fn clear(&self, user_id: UserId, mission_id: MissionId) -> bool {
        self.completed
            .get_mut(&user_id)
            .map(|mut set| set.remove(&mission_id))
            .unwrap_or(false)
    }

    /// Number of missions `user_id` has completed.
    pub fn completed_count(&self, user_id: UserId) -> usize {
        self.completed
            .get(&user_id)
            .map(|set| set.len())
            .unwrap_or(0)
    }
}

impl CompletionSource for CompletionLedger {
    fn is_completed(&self, mission_id: MissionId, user_id: UserId) -> ChainResult<bool> {
        Ok(self
            .completed
            .get(&user_id)
            .map(|set| set.contains(&mission_id))
            .unwrap_or(false))
    }
}
