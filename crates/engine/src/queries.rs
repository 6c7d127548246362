//! Read-only graph queries over a chain's dependencies.

use questline_core::{ChainError, ChainId, ChainResult, MissionId};
use questline_graph::{topological_order, DependencyIndex};
use questline_storage::{ChainRepository, MissionLookup};

use crate::manager::MissionChainManager;

impl<R: ChainRepository, L: MissionLookup> MissionChainManager<R, L> {
    /// Every mission `mission_id` transitively depends on, nearest first.
    pub fn prerequisites(&self, chain_id: ChainId, mission_id: MissionId) -> ChainResult<Vec<MissionId>> {
        let chain = self.get_chain(chain_id)?;
        if !chain.contains(mission_id) {
            return Err(ChainError::MissionNotFound { mission_id });
        }
        Ok(DependencyIndex::from_edges(&chain.dependencies).prerequisite_closure(mission_id))
    }

    /// Every mission that transitively depends on `mission_id`, nearest first.
    pub fn dependants(&self, chain_id: ChainId, mission_id: MissionId) -> ChainResult<Vec<MissionId>> {
        let chain = self.get_chain(chain_id)?;
        if !chain.contains(mission_id) {
            return Err(ChainError::MissionNotFound { mission_id });
        }
        Ok(DependencyIndex::from_edges(&chain.dependencies).dependant_closure(mission_id))
    }

    /// Members ordered so each prerequisite precedes its dependants.
    /// Ties keep the chain's order positions.
    pub fn topological_order(&self, chain_id: ChainId) -> ChainResult<Vec<MissionId>> {
        let chain = self.get_chain(chain_id)?;
        topological_order(&chain.missions, &chain.dependencies)
    }
}
