//! Questline: mission dependency graph and chain ordering engine.
//!
//! A mission chain is an ordered, named set of missions plus a dependency
//! graph over them. This crate re-exports the public API of the workspace:
//!
//! - [`MissionChainManager`]: the only write path for chain structure
//! - [`would_create_cycle`]: the pure dependency validator
//! - [`ShardedChainStore`], [`InMemoryMissionCatalog`], [`CompletionLedger`]:
//!   in-memory implementations of the storage contracts
//! - [`ChainProgressProjector`]: per-user progress
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use questline::*;
//!
//! let catalog = Arc::new(InMemoryMissionCatalog::new());
//! catalog.insert(Mission::new(MissionId(1), "Tutorial"));
//! catalog.insert(Mission::new(MissionId(2), "First quest"));
//!
//! let manager = MissionChainManager::new(ShardedChainStore::new(), catalog);
//! let chain = manager.create_chain(NewMissionChain::new("Onboarding"))?;
//! manager.add_mission_to_chain(chain.id, MissionId(1))?;
//! manager.add_mission_to_chain(chain.id, MissionId(2))?;
//! manager.add_mission_dependency(chain.id, MissionId(2), MissionId(1))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::str::FromStr;

pub use questline_core::{
    validate_chain_name, AccessMode, ChainDetailsUpdate, ChainError, ChainId, ChainLimits,
    ChainResult, CycleKind, DependencyEdge, EngineConfig, LoggingConfig, Mission, MissionChain,
    MissionId, MissionOrderEntry, NewMissionChain, UserId, MAX_CHAIN_NAME_LEN,
};
pub use questline_engine::{
    project, ChainProgress, ChainProgressProjector, DetachReport, MissionChainManager,
    MissionProgress,
};
pub use questline_graph::{
    check_acyclic, check_candidate, topological_order, would_create_cycle, CycleVerdict,
    DependencyIndex,
};
pub use questline_storage::{
    ChainRepository, ChainTxn, CompletionLedger, CompletionSource, InMemoryMissionCatalog,
    MissionLookup, ShardedChainStore,
};

/// Install a global `tracing` subscriber configured from `config`.
///
/// Returns `Ok(false)` if a global subscriber was already installed, so
/// calling this more than once is harmless.
pub fn init_tracing(config: &LoggingConfig) -> ChainResult<bool> {
    let level = tracing::Level::from_str(config.level.trim()).map_err(|_| {
        ChainError::config(format!("unknown log level '{}'", config.level))
    })?;

    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(config.ansi)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}

/// Build a manager over fresh in-memory stores.
pub fn in_memory_manager(
    catalog: std::sync::Arc<InMemoryMissionCatalog>,
    config: EngineConfig,
) -> MissionChainManager<ShardedChainStore, InMemoryMissionCatalog> {
    MissionChainManager::with_config(ShardedChainStore::new(), catalog, config)
}
