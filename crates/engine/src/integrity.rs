//! Referential integrity hook for the mission catalog.
//!
//! When a mission is deleted from the catalog, this module detaches it from
//! every chain that still lists it.

use questline_core::{ChainError, ChainId, ChainResult, MissionId};
use questline_storage::{ChainRepository, MissionLookup};

use crate::manager::{detach_mission, MissionChainManager};

/// Outcome of detaching a deleted mission from every chain that listed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "chains in `failed` still list the deleted mission"]
pub struct DetachReport {
    /// Chains the mission was removed from, sorted by id.
    pub modified: Vec<ChainId>,
    /// Chains whose transaction failed, with the error. They still list the mission.
    pub failed: Vec<(ChainId, ChainError)>,
}

impl DetachReport {
    /// True if every containing chain was updated.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// The modified chains, or the first failure if any chain was left behind.
    pub fn into_result(self) -> ChainResult<Vec<ChainId>> {
        match self.failed.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Ok(self.modified),
        }
    }
}

impl<R: ChainRepository, L: MissionLookup> MissionChainManager<R, L> {
    /// Handle deletion of a mission from the catalog.
    ///
    /// Each containing chain is updated in its own transaction: the mission
    /// leaves membership, positions are compacted and incident edges are
    /// dropped. A failing chain does not stop the sweep; its error is
    /// returned in [`DetachReport::failed`].
    pub fn on_mission_deleted(&self, mission_id: MissionId) -> ChainResult<DetachReport> {
        self.ensure_writable()?;
        let chain_ids = self.repository().chains_containing(mission_id)?;

        let mut report = DetachReport::default();
        for chain_id in chain_ids {
            let result = self.repository().transaction(chain_id, |txn| {
                // Another writer may have removed it since the scan
                if !txn.chain().contains(mission_id) {
                    return Ok(false);
                }
                detach_mission(txn, mission_id).map(|_| true)
            });

            match result {
                Ok((true, _)) => report.modified.push(chain_id),
                Ok((false, _)) => {}
                Err(e) => {
                    tracing::warn!(
                        target: "questline::integrity",
                        chain_id = %chain_id,
                        mission_id = %mission_id,
                        error = %e,
                        "Mission integrity hook failed"
                    );
                    report.failed.push((chain_id, e));
                }
            }
        }

        tracing::debug!(
            target: "questline::integrity",
            mission_id = %mission_id,
            modified = report.modified.len(),
            failed = report.failed.len(),
            "Mission detached from chains"
        );
        Ok(report)
    }
}
