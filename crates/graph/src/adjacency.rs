//! In-memory adjacency index over a chain's dependency edges.
//!
//! The index is a materialized view of an edge set, built once per validation
//! and then queried in O(1) per node instead of scanning the whole set for
//! every step of a traversal.

use questline_core::{DependencyEdge, MissionId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

type Neighbors = SmallVec<[MissionId; 4]>;

/// Adjacency index for one chain's dependency graph.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    /// Forward adjacency: mission → direct prerequisites
    prerequisites: FxHashMap<MissionId, Neighbors>,
    /// Reverse adjacency: prerequisite → direct dependants
    dependants: FxHashMap<MissionId, Neighbors>,
}

impl DependencyIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from an edge set.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a DependencyEdge>,
    {
        let mut index = Self::new();
        for edge in edges {
            index.add_edge(*edge);
        }
        index
    }

    /// Add an edge. Adding an edge that is already present is a no-op.
    pub fn add_edge(&mut self, edge: DependencyEdge) {
        let prereqs = self.prerequisites.entry(edge.mission_id).or_default();
        if prereqs.contains(&edge.prerequisite_id) {
            return;
        }
        prereqs.push(edge.prerequisite_id);
        self.dependants
            .entry(edge.prerequisite_id)
            .or_default()
            .push(edge.mission_id);
    }

    /// Direct prerequisites of `mission`.
    pub fn prerequisites(&self, mission: MissionId) -> &[MissionId] {
        self.prerequisites
            .get(&mission)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }

    /// Missions that directly depend on `mission`.
    pub fn dependants(&self, mission: MissionId) -> &[MissionId] {
        self.dependants
            .get(&mission)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }
}
