//! Shared helpers for the chain engine suite.

#![allow(dead_code)]

use std::sync::Arc;

use questline::{
    ChainId, EngineConfig, InMemoryMissionCatalog, Mission, MissionChainManager, MissionId,
    NewMissionChain, ShardedChainStore,
};

pub type Manager = MissionChainManager<ShardedChainStore, InMemoryMissionCatalog>;

pub fn m(id: i64) -> MissionId {
    MissionId(id)
}

/// Catalog holding missions `1..=count`.
pub fn catalog(count: i64) -> Arc<InMemoryMissionCatalog> {
    Arc::new(InMemoryMissionCatalog::with_missions(
        (1..=count).map(|i| Mission::new(m(i), format!("Mission {}", i))),
    ))
}

pub fn setup() -> Manager {
    setup_with(EngineConfig::default())
}

pub fn setup_with(config: EngineConfig) -> Manager {
    questline::in_memory_manager(catalog(50), config)
}

/// Create a chain and append `missions` in order.
pub fn chain_with(mgr: &Manager, name: &str, missions: &[i64]) -> ChainId {
    let id = mgr.create_chain(NewMissionChain::new(name)).unwrap().id;
    for i in missions {
        mgr.add_mission_to_chain(id, m(*i)).unwrap();
    }
    id
}

pub fn ids(raw: &[i64]) -> Vec<MissionId> {
    raw.iter().map(|r| m(*r)).collect()
}
