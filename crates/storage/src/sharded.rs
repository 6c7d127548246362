//! Sharded in-memory chain store
//!
//! One slot per chain, each behind its own mutex, indexed by a DashMap.
//!
//! # Design
//!
//! - DashMap: sharded index from ChainId to slot, lock-free reads of the index
//! - Per-chain `Mutex`: serialises transactions on one chain, so every
//!   read-validate-write sequence sees the latest committed state
//! - Name index: a single mutex guarding the name → id map, so name
//!   uniqueness holds under concurrent creates and renames
//!
//! # Lock order
//!
//! Name index first, then a chain slot. Transactions take only their slot.
//! The DashMap guard is always released before a slot is locked.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use questline_core::{
    validate_chain_name, ChainDetailsUpdate, ChainError, ChainId, ChainResult, MissionChain,
    MissionId, NewMissionChain,
};
use questline_graph::check_acyclic;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::traits::ChainRepository;
use crate::txn::ChainTxn;

/// A chain slot. `None` once the chain has been deleted, so a transaction
/// that was waiting on the lock observes the deletion.
type Slot = Arc<Mutex<Option<MissionChain>>>;

/// In-memory [`ChainRepository`] with per-chain serialisation.
///
/// # Thread Safety
///
/// - Transactions on the same chain run one at a time
/// - Transactions on different chains never contend
/// - Readers clone the committed chain and never see a half-applied transaction
///
/// # Example
///
/// ```ignore
/// use questline_storage::{ChainRepository, ShardedChainStore};
/// use questline_core::NewMissionChain;
///
/// let store = ShardedChainStore::new();
/// let chain = store.insert_chain(NewMissionChain::new("Onboarding"))?;
/// ```
pub struct ShardedChainStore {
    /// Per-chain slots
    chains: DashMap<ChainId, Slot>,
    /// Chain name → id
    names: Mutex<FxHashMap<String, ChainId>>,
    /// Last assigned chain id
    next_id: AtomicI64,
    /// Committed mutations across all chains
    commits: AtomicU64,
}

impl ShardedChainStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            chains: DashMap::new(),
            names: Mutex::new(FxHashMap::default()),
            next_id: AtomicI64::new(0),
            commits: AtomicU64::new(0),
        }
    }

    /// Create with expected number of chains
    pub fn with_capacity(num_chains: usize) -> Self {
        Self {
            chains: DashMap::with_capacity(num_chains),
            names: Mutex::new(FxHashMap::with_capacity_and_hasher(
                num_chains,
                Default::default(),
            )),
            next_id: AtomicI64::new(0),
            commits: AtomicU64::new(0),
        }
    }

    /// Number of live chains
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Total committed mutations (creates, detail updates, transactions)
    #[inline]
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::Acquire)
    }

    fn slot(&self, chain_id: ChainId) -> ChainResult<Slot> {
        // Clone the Arc so the DashMap shard guard is dropped before locking
        self.chains
            .get(&chain_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(ChainError::ChainNotFound { chain_id })
    }

    fn read(&self, chain_id: ChainId) -> Option<MissionChain> {
        let slot = self.slot(chain_id).ok()?;
        let guard = slot.lock();
        guard.clone()
    }

    fn snapshot_slots(&self) -> Vec<Slot> {
        self.chains
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Validate a fully staged chain before it is published.
    fn check_commit(chain: &MissionChain) -> ChainResult<()> {
        chain.check_invariants()?;
        check_acyclic(&chain.missions, &chain.dependencies)
    }
}

impl Default for ShardedChainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedChainStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedChainStore")
            .field("chain_count", &self.chain_count())
            .field("commit_count", &self.commit_count())
            .finish()
    }
}

impl ChainRepository for ShardedChainStore {
    fn get_chain(&self, chain_id: ChainId) -> ChainResult<Option<MissionChain>> {
        Ok(self.read(chain_id))
    }

    fn get_chain_by_name(&self, name: &str) -> ChainResult<Option<MissionChain>> {
        let id = self.names.lock().get(name.trim()).copied();
        Ok(id.and_then(|id| self.read(id)))
    }

    fn list_chains(&self) -> ChainResult<Vec<MissionChain>> {
        let mut chains: Vec<MissionChain> = self
            .snapshot_slots()
            .into_iter()
            .filter_map(|slot| slot.lock().clone())
            .collect();
        chains.sort_by_key(|c| c.id);
        Ok(chains)
    }

    fn chains_containing(&self, mission: MissionId) -> ChainResult<Vec<ChainId>> {
        let mut ids: Vec<ChainId> = self
            .snapshot_slots()
            .into_iter()
            .filter_map(|slot| {
                let guard = slot.lock();
                guard
                    .as_ref()
                    .filter(|chain| chain.contains(mission))
                    .map(|chain| chain.id)
            })
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn insert_chain(&self, draft: NewMissionChain) -> ChainResult<MissionChain> {
        let name = validate_chain_name(&draft.name)?;

        let mut names = self.names.lock();
        if names.contains_key(&name) {
            return Err(ChainError::DuplicateChainName { name });
        }

        let chain_id = ChainId(self.next_id.fetch_add(1, Ordering::AcqRel) + 1);
        let chain = MissionChain::new(chain_id, NewMissionChain { name, ..draft });

        self.chains
            .insert(chain_id, Arc::new(Mutex::new(Some(chain.clone()))));
        names.insert(chain.name.clone(), chain_id);
        self.commits.fetch_add(1, Ordering::AcqRel);

        debug!(target: "questline::storage", chain_id = %chain_id, name = %chain.name, "Chain inserted");
        Ok(chain)
    }

    fn update_details(
        &self,
        chain_id: ChainId,
        update: ChainDetailsUpdate,
    ) -> ChainResult<MissionChain> {
        let new_name = update
            .name
            .as_deref()
            .map(validate_chain_name)
            .transpose()?;

        let mut names = self.names.lock();
        let slot = self.slot(chain_id)?;
        let mut guard = slot.lock();
        let current = guard
            .as_ref()
            .ok_or(ChainError::ChainNotFound { chain_id })?;

        let mut next = current.clone();
        if let Some(name) = new_name {
            if name != current.name {
                if names.contains_key(&name) {
                    return Err(ChainError::DuplicateChainName { name });
                }
                names.remove(&current.name);
                names.insert(name.clone(), chain_id);
                next.name = name;
            }
        }
        if let Some(description) = update.description {
            next.description = description;
        }
        if let Some(xp) = update.reward_xp {
            next.reward_xp = xp;
        }
        if let Some(mana) = update.reward_mana {
            next.reward_mana = mana;
        }

        if next != *current {
            next.version += 1;
            *guard = Some(next.clone());
            self.commits.fetch_add(1, Ordering::AcqRel);
            debug!(target: "questline::storage", chain_id = %chain_id, version = next.version, "Chain details updated");
        }
        Ok(next)
    }

    fn delete_chain(&self, chain_id: ChainId) -> ChainResult<()> {
        let mut names = self.names.lock();
        let (_, slot) = self
            .chains
            .remove(&chain_id)
            .ok_or(ChainError::ChainNotFound { chain_id })?;

        let removed = slot
            .lock()
            .take()
            .ok_or(ChainError::ChainNotFound { chain_id })?;
        names.remove(&removed.name);
        self.commits.fetch_add(1, Ordering::AcqRel);

        debug!(
            target: "questline::storage",
            chain_id = %chain_id,
            missions = removed.missions.len(),
            dependencies = removed.dependencies.len(),
            "Chain deleted"
        );
        Ok(())
    }

    fn transaction<T, F>(&self, chain_id: ChainId, f: F) -> ChainResult<(T, MissionChain)>
    where
        F: FnOnce(&mut ChainTxn) -> ChainResult<T>,
    {
        let slot = self.slot(chain_id)?;
        let mut guard = slot.lock();
        let snapshot = guard
            .as_ref()
            .cloned()
            .ok_or(ChainError::ChainNotFound { chain_id })?;

        let mut txn = ChainTxn::begin(snapshot);
        let out = f(&mut txn)?;

        let (mut next, dirty) = txn.finish();
        if dirty {
            Self::check_commit(&next)?;
            next.version += 1;
            debug!(
                target: "questline::storage",
                chain_id = %chain_id,
                version = next.version,
                missions = next.missions.len(),
                dependencies = next.dependencies.len(),
                "Chain transaction committed"
            );
            *guard = Some(next.clone());
            self.commits.fetch_add(1, Ordering::AcqRel);
        }
        Ok((out, next))
    }
}
