//! Mission chain manager: the single write path for chain structure.
//!
//! Every structural mutation runs inside one [`ChainRepository::transaction`],
//! so the load, validate, mutate and persist steps for a chain are atomic with
//! respect to other mutations of the same chain. Each operation returns the
//! chain exactly as its own transaction left it.
//!
//! The manager takes ownership of its repository and never hands it out, so
//! the repository's write methods are reachable only through the checks in
//! this module.

use std::collections::BTreeSet;
use std::sync::Arc;

use questline_core::{
    validate_chain_name, AccessMode, ChainDetailsUpdate, ChainError, ChainId, ChainResult,
    DependencyEdge, EngineConfig, MissionChain, MissionId, MissionOrderEntry, NewMissionChain,
};
use questline_graph::check_candidate;
use questline_storage::{ChainRepository, ChainTxn, MissionLookup};
use tracing::debug;

/// Orchestrates chain mutations over a repository and a mission catalog.
///
/// Clones share the same repository. Use [`read_only`](Self::read_only) to
/// hand out a handle that can read but never write.
pub struct MissionChainManager<R, L> {
    repo: Arc<R>,
    missions: Arc<L>,
    config: EngineConfig,
}

impl<R, L> Clone for MissionChainManager<R, L> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            missions: Arc::clone(&self.missions),
            config: self.config.clone(),
        }
    }
}

impl<R: ChainRepository, L: MissionLookup> MissionChainManager<R, L> {
    /// Create a manager with the default configuration.
    pub fn new(repo: R, missions: Arc<L>) -> Self {
        Self::with_config(repo, missions, EngineConfig::default())
    }

    /// Create a manager with an explicit configuration.
    pub fn with_config(repo: R, missions: Arc<L>, config: EngineConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            missions,
            config,
        }
    }

    /// A handle over the same chains that rejects every mutation with `ReadOnly`.
    pub fn read_only(&self) -> Self {
        let mut config = self.config.clone();
        config.access_mode = AccessMode::ReadOnly;
        Self {
            repo: Arc::clone(&self.repo),
            missions: Arc::clone(&self.missions),
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn repository(&self) -> &R {
        &self.repo
    }

    pub(crate) fn ensure_writable(&self) -> ChainResult<()> {
        if self.config.is_read_only() {
            return Err(ChainError::ReadOnly);
        }
        Ok(())
    }

    // =========================================================================
    // Chain lifecycle
    // =========================================================================

    /// Create an empty chain.
    pub fn create_chain(&self, draft: NewMissionChain) -> ChainResult<MissionChain> {
        self.ensure_writable()?;
        let name = validate_chain_name(&draft.name)?;

        if self.repo.get_chain_by_name(&name)?.is_some() {
            return Err(ChainError::DuplicateChainName { name });
        }

        let chain = self.repo.insert_chain(NewMissionChain { name, ..draft })?;
        debug!(target: "questline::manager", chain_id = %chain.id, name = %chain.name, "Chain created");
        Ok(chain)
    }

    /// Fetch a chain.
    pub fn get_chain(&self, chain_id: ChainId) -> ChainResult<MissionChain> {
        self.repo
            .get_chain(chain_id)?
            .ok_or(ChainError::ChainNotFound { chain_id })
    }

    /// All chains, sorted by id.
    pub fn list_chains(&self) -> ChainResult<Vec<MissionChain>> {
        self.repo.list_chains()
    }

    /// Partially update a chain's name, description or rewards.
    pub fn update_chain_details(
        &self,
        chain_id: ChainId,
        update: ChainDetailsUpdate,
    ) -> ChainResult<MissionChain> {
        self.ensure_writable()?;
        if update.is_empty() {
            return self.get_chain(chain_id);
        }

        if let Some(name) = update.name.as_deref() {
            let name = validate_chain_name(name)?;
            if let Some(other) = self.repo.get_chain_by_name(&name)? {
                if other.id != chain_id {
                    return Err(ChainError::DuplicateChainName { name });
                }
            }
        }

        let chain = self.repo.update_details(chain_id, update)?;
        debug!(target: "questline::manager", chain_id = %chain_id, version = chain.version, "Chain details updated");
        Ok(chain)
    }

    /// Delete a chain together with its missions, order and dependencies.
    pub fn delete_chain(&self, chain_id: ChainId) -> ChainResult<()> {
        self.ensure_writable()?;
        self.repo.delete_chain(chain_id)?;
        debug!(target: "questline::manager", chain_id = %chain_id, "Chain deleted");
        Ok(())
    }

    // =========================================================================
    // Membership and order
    // =========================================================================

    /// Append a mission at position `N + 1`.
    pub fn add_mission_to_chain(
        &self,
        chain_id: ChainId,
        mission_id: MissionId,
    ) -> ChainResult<MissionChain> {
        self.ensure_writable()?;
        let limit = self.config.limits.max_missions_per_chain;

        let (position, chain) = self.repo.transaction(chain_id, |txn| {
            if !self.missions.mission_exists(mission_id)? {
                return Err(ChainError::MissionNotFound { mission_id });
            }
            let chain = txn.chain();
            if chain.contains(mission_id) {
                return Err(ChainError::MissionAlreadyInChain {
                    chain_id,
                    mission_id,
                });
            }
            if let Some(max) = limit {
                if chain.len() >= max {
                    return Err(ChainError::LimitExceeded {
                        limit: max,
                        reason: format!("chain {} cannot hold more missions", chain_id),
                    });
                }
            }

            let mut missions = chain.missions.clone();
            missions.push(mission_id);
            let position = missions.len();
            txn.save_mission_membership(missions)?;
            Ok(position)
        })?;

        debug!(target: "questline::manager", chain_id = %chain_id, mission_id = %mission_id, position, "Mission added to chain");
        Ok(chain)
    }

    /// Remove a mission, compact the remaining positions and drop its edges.
    pub fn remove_mission_from_chain(
        &self,
        chain_id: ChainId,
        mission_id: MissionId,
    ) -> ChainResult<MissionChain> {
        self.ensure_writable()?;

        let (dropped_edges, chain) = self.repo.transaction(chain_id, |txn| {
            if !txn.chain().contains(mission_id) {
                return Err(ChainError::MissionNotFound { mission_id });
            }
            detach_mission(txn, mission_id)
        })?;

        debug!(target: "questline::manager", chain_id = %chain_id, mission_id = %mission_id, dropped_edges, "Mission removed from chain");
        Ok(chain)
    }

    /// Move a mission to `new_order`, shifting the missions in between by one.
    pub fn update_mission_order(
        &self,
        chain_id: ChainId,
        mission_id: MissionId,
        new_order: usize,
    ) -> ChainResult<MissionChain> {
        self.ensure_writable()?;

        let (moved, chain) = self.repo.transaction(chain_id, |txn| {
            let chain = txn.chain();
            let current = chain
                .position_of(mission_id)
                .ok_or(ChainError::MissionNotFound { mission_id })?;
            let max = chain.len();
            if new_order == 0 || new_order > max {
                debug!(target: "questline::manager", chain_id = %chain_id, mission_id = %mission_id, new_order, max, "Mission order rejected");
                return Err(ChainError::InvalidMissionOrder {
                    requested: new_order,
                    max,
                });
            }
            if new_order == current {
                return Ok(false);
            }

            let mut missions = chain.missions.clone();
            let mission = missions.remove(current - 1);
            missions.insert(new_order - 1, mission);

            let entries: Vec<MissionOrderEntry> = missions
                .iter()
                .enumerate()
                .map(|(idx, id)| MissionOrderEntry {
                    mission_id: *id,
                    position: idx + 1,
                })
                .collect();
            txn.save_order(&entries)?;
            Ok(true)
        })?;

        if moved {
            debug!(target: "questline::manager", chain_id = %chain_id, mission_id = %mission_id, new_order, "Mission reordered");
        }
        Ok(chain)
    }

    // =========================================================================
    // Dependencies
    // =========================================================================

    /// Declare that `mission_id` depends on `prerequisite_id`.
    ///
    /// Fails with `CircularDependency` if the edge is a self-loop or would
    /// close a cycle of any length; nothing is persisted in that case.
    pub fn add_mission_dependency(
        &self,
        chain_id: ChainId,
        mission_id: MissionId,
        prerequisite_id: MissionId,
    ) -> ChainResult<MissionChain> {
        self.ensure_writable()?;
        let limit = self.config.limits.max_dependencies_per_chain;
        let edge = DependencyEdge::new(mission_id, prerequisite_id);

        let ((), chain) = self.repo.transaction(chain_id, |txn| {
            let chain = txn.chain();
            if edge.is_self_loop() {
                reject_cycle(chain_id, &chain.dependencies, edge)?;
            }
            if !chain.contains(mission_id) {
                return Err(ChainError::MissionNotFound { mission_id });
            }
            if !chain.contains(prerequisite_id) {
                return Err(ChainError::PrerequisiteMissionNotFound {
                    mission_id: prerequisite_id,
                });
            }
            if chain.has_dependency(&edge) {
                return Err(ChainError::DependencyAlreadyExists {
                    mission_id,
                    prerequisite_id,
                });
            }
            reject_cycle(chain_id, &chain.dependencies, edge)?;
            if let Some(max) = limit {
                if chain.dependencies.len() >= max {
                    return Err(ChainError::LimitExceeded {
                        limit: max,
                        reason: format!("chain {} cannot hold more dependencies", chain_id),
                    });
                }
            }

            let mut dependencies = chain.dependencies.clone();
            dependencies.insert(edge);
            txn.save_dependencies(dependencies);
            Ok(())
        })?;

        debug!(target: "questline::manager", chain_id = %chain_id, mission_id = %mission_id, prerequisite_id = %prerequisite_id, "Dependency added");
        Ok(chain)
    }

    /// Remove a dependency edge. Removing an absent edge is a no-op success.
    pub fn remove_mission_dependency(
        &self,
        chain_id: ChainId,
        mission_id: MissionId,
        prerequisite_id: MissionId,
    ) -> ChainResult<MissionChain> {
        self.ensure_writable()?;
        let edge = DependencyEdge::new(mission_id, prerequisite_id);

        let (removed, chain) = self.repo.transaction(chain_id, |txn| {
            let chain = txn.chain();
            if !chain.contains(mission_id) {
                return Err(ChainError::MissionNotFound { mission_id });
            }
            if !chain.contains(prerequisite_id) {
                return Err(ChainError::PrerequisiteMissionNotFound {
                    mission_id: prerequisite_id,
                });
            }
            if !chain.has_dependency(&edge) {
                return Ok(false);
            }

            let mut dependencies = chain.dependencies.clone();
            dependencies.remove(&edge);
            txn.save_dependencies(dependencies);
            Ok(true)
        })?;

        debug!(target: "questline::manager", chain_id = %chain_id, mission_id = %mission_id, prerequisite_id = %prerequisite_id, removed, "Dependency removal");
        Ok(chain)
    }
}

/// Stage removal of `mission_id` and every edge touching it.
/// Returns the number of edges dropped.
pub(crate) fn detach_mission(txn: &mut ChainTxn, mission_id: MissionId) -> ChainResult<usize> {
    let chain = txn.chain();
    let missions: Vec<MissionId> = chain
        .missions
        .iter()
        .copied()
        .filter(|m| *m != mission_id)
        .collect();
    let before = chain.dependencies.len();
    let dependencies = chain
        .dependencies
        .iter()
        .copied()
        .filter(|edge| !edge.touches(mission_id))
        .collect::<BTreeSet<_>>();
    let dropped = before - dependencies.len();

    txn.save_mission_membership(missions)?;
    txn.save_dependencies(dependencies);
    Ok(dropped)
}

fn reject_cycle(
    chain_id: ChainId,
    dependencies: &BTreeSet<DependencyEdge>,
    edge: DependencyEdge,
) -> ChainResult<()> {
    check_candidate(dependencies, edge).map_err(|e| {
        debug!(target: "questline::manager", chain_id = %chain_id, error = %e, "Dependency rejected");
        e
    })
}
