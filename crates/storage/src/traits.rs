//! Contracts between the chain manager and its collaborators.

use std::sync::Arc;

use questline_core::{
    ChainDetailsUpdate, ChainId, ChainResult, Mission, MissionChain, MissionId, NewMissionChain,
    UserId,
};

use crate::txn::ChainTxn;

/// Durable store of mission chains.
///
/// # Atomicity
///
/// [`transaction`](Self::transaction) is the unit of atomic read-modify-write
/// for one chain. Implementations must guarantee that:
/// - transactions on the same `chain_id` are serialised, so a closure always
///   validates against the latest committed state
/// - staged changes are published only if the closure returns `Ok`, and then
///   all together
/// - transactions on different chains do not block each other
///
/// The closure must not call back into the same repository for the same chain.
pub trait ChainRepository: Send + Sync {
    /// Fetch a chain by id.
    fn get_chain(&self, chain_id: ChainId) -> ChainResult<Option<MissionChain>>;

    /// Fetch a chain by its unique name.
    fn get_chain_by_name(&self, name: &str) -> ChainResult<Option<MissionChain>>;

    /// All chains, sorted by id.
    fn list_chains(&self) -> ChainResult<Vec<MissionChain>>;

    /// Ids of every chain that has `mission` as a member, sorted.
    fn chains_containing(&self, mission: MissionId) -> ChainResult<Vec<ChainId>>;

    /// Create an empty chain. Fails with `DuplicateChainName` if the name is taken.
    fn insert_chain(&self, draft: NewMissionChain) -> ChainResult<MissionChain>;

    /// Apply a partial update to a chain's descriptive fields.
    fn update_details(
        &self,
        chain_id: ChainId,
        update: ChainDetailsUpdate,
    ) -> ChainResult<MissionChain>;

    /// Delete a chain with all its missions, order and dependencies.
    fn delete_chain(&self, chain_id: ChainId) -> ChainResult<()>;

    /// Run `f` against a private working copy of the chain and publish its
    /// staged changes atomically if it returns `Ok`.
    ///
    /// Returns the closure's value together with the chain as this
    /// transaction left it: the committed state, or the unchanged snapshot if
    /// nothing was staged.
    fn transaction<T, F>(&self, chain_id: ChainId, f: F) -> ChainResult<(T, MissionChain)>
    where
        F: FnOnce(&mut ChainTxn) -> ChainResult<T>;
}

/// Read access to the mission catalog.
pub trait MissionLookup: Send + Sync {
    /// True if the mission exists in the catalog.
    fn mission_exists(&self, mission_id: MissionId) -> ChainResult<bool>;

    /// Fetch a mission record.
    fn get_mission(&self, mission_id: MissionId) -> ChainResult<Option<Mission>>;
}

/// Per-user mission completion feed.
pub trait CompletionSource: Send + Sync {
    /// True if `user_id` has completed `mission_id`.
    fn is_completed(&self, mission_id: MissionId, user_id: UserId) -> ChainResult<bool>;
}

impl<T: MissionLookup + ?Sized> MissionLookup for Arc<T> {
    fn mission_exists(&self, mission_id: MissionId) -> ChainResult<bool> {
        (**self).mission_exists(mission_id)
    }

    fn get_mission(&self, mission_id: MissionId) -> ChainResult<Option<Mission>> {
        (**self).get_mission(mission_id)
    }
}

impl<T: CompletionSource + ?Sized> CompletionSource for Arc<T> {
    fn is_completed(&self, mission_id: MissionId, user_id: UserId) -> ChainResult<bool> {
        (**self).is_completed(mission_id, user_id)
    }
}
