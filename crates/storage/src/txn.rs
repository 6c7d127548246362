//! Working copy handed to [`ChainRepository::transaction`](crate::ChainRepository::transaction) closures.
//!
//! A `ChainTxn` starts as a clone of the latest committed chain. Reads see
//! the transaction's own staged writes. Nothing is published until the store
//! takes the working copy back via `finish`.

use std::collections::{BTreeSet, HashSet};

use questline_core::{
    ChainError, ChainId, ChainResult, DependencyEdge, MissionChain, MissionId, MissionOrderEntry,
};

/// Private, mutable view of one chain inside a transaction.
#[derive(Debug)]
pub struct ChainTxn {
    working: MissionChain,
    dirty: bool,
}

impl ChainTxn {
    pub(crate) fn begin(snapshot: MissionChain) -> Self {
        Self {
            working: snapshot,
            dirty: false,
        }
    }

    /// The chain as this transaction currently sees it.
    pub fn chain(&self) -> &MissionChain {
        &self.working
    }

    /// Id of the chain under transaction.
    pub fn chain_id(&self) -> ChainId {
        self.working.id
    }

    /// True once any staged write differs from the snapshot.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Stage a new membership list. The list order becomes the new order.
    ///
    /// Edges touching removed missions are not dropped here; stage them
    /// through [`save_dependencies`](Self::save_dependencies) in the same
    /// transaction or the commit check will reject the result.
    pub fn save_mission_membership(&mut self, missions: Vec<MissionId>) -> ChainResult<()> {
        let mut seen = HashSet::with_capacity(missions.len());
        if let Some(dup) = missions.iter().find(|m| !seen.insert(**m)) {
            return Err(ChainError::invariant(format!(
                "staged membership lists mission {} twice",
                dup
            )));
        }

        if missions != self.working.missions {
            self.working.missions = missions;
            self.dirty = true;
        }
        Ok(())
    }

    /// Stage a full reorder. `entries` must cover every current member
    /// exactly once with positions forming `1..=N`.
    pub fn save_order(&mut self, entries: &[MissionOrderEntry]) -> ChainResult<()> {
        let n = self.working.missions.len();
        if entries.len() != n {
            return Err(ChainError::invariant(format!(
                "staged order has {} entries for {} missions",
                entries.len(),
                n
            )));
        }

        let mut slots: Vec<Option<MissionId>> = vec![None; n];
        for entry in entries {
            if !self.working.contains(entry.mission_id) {
                return Err(ChainError::invariant(format!(
                    "staged order places mission {} which is not a member",
                    entry.mission_id
                )));
            }
            let slot = entry
                .position
                .checked_sub(1)
                .and_then(|idx| slots.get_mut(idx))
                .ok_or_else(|| {
                    ChainError::invariant(format!(
                        "staged position {} is outside 1..={}",
                        entry.position, n
                    ))
                })?;
            if slot.replace(entry.mission_id).is_some() {
                return Err(ChainError::invariant(format!(
                    "staged order assigns position {} twice",
                    entry.position
                )));
            }
        }

        // All n slots are filled; a mission listed twice fails the membership check
        let reordered: Vec<MissionId> = slots.into_iter().flatten().collect();
        self.save_mission_membership(reordered)
    }

    /// Stage a full replacement of the dependency edge set.
    pub fn save_dependencies(&mut self, dependencies: BTreeSet<DependencyEdge>) {
        if dependencies != self.working.dependencies {
            self.working.dependencies = dependencies;
            self.dirty = true;
        }
    }

    /// Hand the working copy back to the store, with whether it changed.
    pub(crate) fn finish(self) -> (MissionChain, bool) {
        (self.working, self.dirty)
    }
}
