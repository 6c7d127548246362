//! Per-user chain progress.
//!
//! Progress is derived, read-only state. Dependencies decide `is_unlocked`
//! and `next_available` for display, but completion itself is whatever the
//! [`CompletionSource`] reports; nothing here re-validates it against the graph.

use std::sync::Arc;

use questline_core::{ChainId, ChainResult, MissionChain, MissionId, UserId};
use questline_graph::DependencyIndex;
use questline_storage::{ChainRepository, CompletionSource, MissionLookup};
use serde::Serialize;

use crate::manager::MissionChainManager;

/// Progress of one mission within a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionProgress {
    /// The mission.
    pub mission_id: MissionId,
    /// 1-based order position.
    pub position: usize,
    /// Completion as reported by the completion source.
    pub is_completed: bool,
    /// True if every direct prerequisite is completed.
    pub is_unlocked: bool,
}

/// Progress of a whole chain for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainProgress {
    /// The chain.
    pub chain_id: ChainId,
    /// Per-mission progress, in order position.
    pub missions: Vec<MissionProgress>,
    /// True if the chain has missions and every one is completed.
    pub chain_is_completed: bool,
    /// Number of completed missions.
    pub completed_count: usize,
    /// Number of missions in the chain.
    pub total: usize,
    /// Missions not yet completed whose prerequisites all are, in order position.
    pub next_available: Vec<MissionId>,
}

impl ChainProgress {
    /// Completion ratio in `0.0..=1.0`. An empty chain reports `0.0`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed_count as f64 / self.total as f64
        }
    }
}

/// Compute progress from a completion predicate.
///
/// The predicate is asked once per member mission.
pub fn project<F>(chain: &MissionChain, mut is_completed: F) -> ChainResult<ChainProgress>
where
    F: FnMut(MissionId) -> ChainResult<bool>,
{
    let mut completed = Vec::with_capacity(chain.len());
    for mission in &chain.missions {
        completed.push(is_completed(*mission)?);
    }

    let index = DependencyIndex::from_edges(&chain.dependencies);
    let done = |mission: MissionId| {
        chain
            .position_of(mission)
            .map(|pos| completed[pos - 1])
            .unwrap_or(false)
    };

    let missions: Vec<MissionProgress> = chain
        .missions
        .iter()
        .enumerate()
        .map(|(idx, mission_id)| MissionProgress {
            mission_id: *mission_id,
            position: idx + 1,
            is_completed: completed[idx],
            is_unlocked: index.prerequisites(*mission_id).iter().all(|p| done(*p)),
        })
        .collect();

    let completed_count = completed.iter().filter(|c| **c).count();
    let total = chain.len();
    let next_available = missions
        .iter()
        .filter(|m| !m.is_completed && m.is_unlocked)
        .map(|m| m.mission_id)
        .collect();

    Ok(ChainProgress {
        chain_id: chain.id,
        missions,
        chain_is_completed: total > 0 && completed_count == total,
        completed_count,
        total,
        next_available,
    })
}

/// Projects chain progress for users from a completion source.
pub struct ChainProgressProjector<C> {
    source: Arc<C>,
}

impl<C: CompletionSource> ChainProgressProjector<C> {
    /// Create a projector over a completion source.
    pub fn new(source: Arc<C>) -> Self {
        Self { source }
    }

    /// Progress of `chain` for `user_id`.
    pub fn compute(&self, chain: &MissionChain, user_id: UserId) -> ChainResult<ChainProgress> {
        project(chain, |mission| self.source.is_completed(mission, user_id))
    }
}

impl<R: ChainRepository, L: MissionLookup> MissionChainManager<R, L> {
    /// Load the chain and compute its progress for `user_id`.
    pub fn compute_progress_for_user<C: CompletionSource>(
        &self,
        chain_id: ChainId,
        user_id: UserId,
        projector: &ChainProgressProjector<C>,
    ) -> ChainResult<ChainProgress> {
        let chain = self.get_chain(chain_id)?;
        projector.compute(&chain, user_id)
    }
}
