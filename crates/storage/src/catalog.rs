//! In-memory mission catalog.

use dashmap::DashMap;
use questline_core::{ChainResult, Mission, MissionId};

use crate::traits::MissionLookup;

/// Concurrent map of mission records, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryMissionCatalog {
    missions: DashMap<MissionId, Mission>,
}

impl InMemoryMissionCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from mission records.
    pub fn with_missions(missions: impl IntoIterator<Item = Mission>) -> Self {
        let catalog = Self::new();
        for mission in missions {
            catalog.insert(mission);
        }
        catalog
    }

    /// Insert or replace a mission. Returns the previous record.
    pub fn insert(&self, mission: Mission) -> Option<Mission> {
        self.missions.insert(mission.id, mission)
    }

    /// Remove a mission from the catalog.
    ///
    /// Chains are not touched; run the engine's mission-deleted hook to
    /// detach the mission from every chain.
    pub fn remove(&self, mission_id: MissionId) -> Option<Mission> {
        self.missions.remove(&mission_id).map(|(_, m)| m)
    }

    /// Number of missions.
    pub fn len(&self) -> usize {
        self.missions.len()
    }

    /// True if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }
}

impl MissionLookup for InMemoryMissionCatalog {
    fn mission_exists(&self, mission_id: MissionId) -> ChainResult<bool> {
        Ok(self.missions.contains_key(&mission_id))
    }

    fn get_mission(&self, mission_id: MissionId) -> ChainResult<Option<Mission>> {
        Ok(self.missions.get(&mission_id).map(|m| m.value().clone()))
    }
}
