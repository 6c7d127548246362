//! The mission chain aggregate.
//!
//! A [`MissionChain`] owns three pieces of structural state:
//! - `missions`: membership and order in one dense array (position = index + 1)
//! - `dependencies`: "mission depends on prerequisite" edges between members
//! - `version`: bumped by the store on every committed mutation
//!
//! Storing order as a dense array means positions are a permutation of `1..=N`
//! by construction; [`MissionChain::check_invariants`] covers the rest.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};
use crate::types::{ChainId, MissionId};

/// Maximum length of a chain name, in characters.
pub const MAX_CHAIN_NAME_LEN: usize = 255;

/// Validate and normalize a chain name. Returns the trimmed name.
pub fn validate_chain_name(name: &str) -> ChainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ChainError::invalid_input("Chain name must not be empty"));
    }
    if trimmed.chars().count() > MAX_CHAIN_NAME_LEN {
        return Err(ChainError::invalid_input(format!(
            "Chain name must not exceed {} characters",
            MAX_CHAIN_NAME_LEN
        )));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ChainError::invalid_input(
            "Chain name must not contain control characters",
        ));
    }
    Ok(trimmed.to_string())
}

/// A directed dependency: `mission_id` cannot be complete before `prerequisite_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The dependant mission.
    pub mission_id: MissionId,
    /// The mission that must be completed first.
    pub prerequisite_id: MissionId,
}

impl DependencyEdge {
    /// Create an edge "`mission_id` depends on `prerequisite_id`".
    pub fn new(mission_id: MissionId, prerequisite_id: MissionId) -> Self {
        Self {
            mission_id,
            prerequisite_id,
        }
    }

    /// True if the edge points a mission at itself.
    pub fn is_self_loop(&self) -> bool {
        self.mission_id == self.prerequisite_id
    }

    /// True if either endpoint is `mission`.
    pub fn touches(&self, mission: MissionId) -> bool {
        self.mission_id == mission || self.prerequisite_id == mission
    }
}

/// A mission together with its 1-based position in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissionOrderEntry {
    /// The mission.
    pub mission_id: MissionId,
    /// 1-based position, unique and contiguous within the chain.
    pub position: usize,
}

/// A mission record as held by the external mission catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// Catalog identifier.
    pub id: MissionId,
    /// Display name.
    pub name: String,
}

impl Mission {
    /// Create a mission record.
    pub fn new(id: MissionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Fields required to create a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMissionChain {
    /// Unique chain name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Experience granted when the chain is completed.
    #[serde(default)]
    pub reward_xp: u64,
    /// Mana granted when the chain is completed.
    #[serde(default)]
    pub reward_mana: u64,
}

impl NewMissionChain {
    /// Start a draft with the given name and no rewards.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set both rewards.
    pub fn rewards(mut self, xp: u64, mana: u64) -> Self {
        self.reward_xp = xp;
        self.reward_mana = mana;
        self
    }
}

/// Partial update of a chain's descriptive fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDetailsUpdate {
    /// New unique name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New experience reward.
    pub reward_xp: Option<u64>,
    /// New mana reward.
    pub reward_mana: Option<u64>,
}

impl ChainDetailsUpdate {
    /// True if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.reward_xp.is_none()
            && self.reward_mana.is_none()
    }
}

/// Aggregate root: an ordered, named collection of missions plus a
/// dependency graph over them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionChain {
    /// Chain identifier.
    pub id: ChainId,
    /// Unique name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Experience granted on completion.
    pub reward_xp: u64,
    /// Mana granted on completion.
    pub reward_mana: u64,
    /// Members in order; the mission at index `i` has position `i + 1`.
    pub missions: Vec<MissionId>,
    /// Dependency edges between members.
    pub dependencies: BTreeSet<DependencyEdge>,
    /// Number of committed mutations since creation.
    pub version: u64,
}

impl MissionChain {
    /// Create an empty chain from a validated draft.
    pub fn new(id: ChainId, draft: NewMissionChain) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            reward_xp: draft.reward_xp,
            reward_mana: draft.reward_mana,
            missions: Vec::new(),
            dependencies: BTreeSet::new(),
            version: 0,
        }
    }

    /// Number of member missions.
    pub fn len(&self) -> usize {
        self.missions.len()
    }

    /// True if the chain has no missions.
    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    /// True if `mission` is a member.
    pub fn contains(&self, mission: MissionId) -> bool {
        self.missions.contains(&mission)
    }

    /// 1-based position of `mission`, or None if it is not a member.
    pub fn position_of(&self, mission: MissionId) -> Option<usize> {
        self.missions
            .iter()
            .position(|m| *m == mission)
            .map(|idx| idx + 1)
    }

    /// Mission at a 1-based position.
    pub fn mission_at(&self, position: usize) -> Option<MissionId> {
        position
            .checked_sub(1)
            .and_then(|idx| self.missions.get(idx).copied())
    }

    /// Order entries for every member, in position order.
    pub fn orders(&self) -> Vec<MissionOrderEntry> {
        self.missions
            .iter()
            .enumerate()
            .map(|(idx, mission_id)| MissionOrderEntry {
                mission_id: *mission_id,
                position: idx + 1,
            })
            .collect()
    }

    /// True if the exact edge is present.
    pub fn has_dependency(&self, edge: &DependencyEdge) -> bool {
        self.dependencies.contains(edge)
    }

    /// Direct prerequisites of `mission`.
    pub fn prerequisites_of(&self, mission: MissionId) -> Vec<MissionId> {
        self.dependencies
            .iter()
            .filter(|e| e.mission_id == mission)
            .map(|e| e.prerequisite_id)
            .collect()
    }

    /// Missions that directly depend on `mission`.
    pub fn dependants_of(&self, mission: MissionId) -> Vec<MissionId> {
        self.dependencies
            .iter()
            .filter(|e| e.prerequisite_id == mission)
            .map(|e| e.mission_id)
            .collect()
    }

    /// Check the structural invariants that do not need graph traversal:
    /// no duplicate members, no self-loops, every edge endpoint is a member.
    ///
    /// Acyclicity beyond self-loops is checked by the graph crate.
    pub fn check_invariants(&self) -> ChainResult<()> {
        let mut seen = HashSet::with_capacity(self.missions.len());
        for mission in &self.missions {
            if !seen.insert(*mission) {
                return Err(ChainError::invariant(format!(
                    "mission {} appears more than once in chain {}",
                    mission, self.id
                )));
            }
        }

        for edge in &self.dependencies {
            if edge.is_self_loop() {
                return Err(ChainError::invariant(format!(
                    "mission {} depends on itself in chain {}",
                    edge.mission_id, self.id
                )));
            }
            if !seen.contains(&edge.mission_id) || !seen.contains(&edge.prerequisite_id) {
                return Err(ChainError::invariant(format!(
                    "dependency {} -> {} references a mission outside chain {}",
                    edge.mission_id, edge.prerequisite_id, self.id
                )));
            }
        }

        Ok(())
    }
}
