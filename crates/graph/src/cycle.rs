//! Cycle verdicts for candidate dependency edges.
//!
//! A candidate edge `mission -> prerequisite` closes a cycle exactly when the
//! prerequisite already reaches the mission through existing edges. The check
//! is a single reachability search starting at the prerequisite, so it catches
//! cycles of any length, not only the mirrored two-node case.

use questline_core::{ChainError, ChainResult, CycleKind, DependencyEdge, MissionId};

use super::adjacency::DependencyIndex;

/// Outcome of checking a candidate edge against an existing edge set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleVerdict {
    /// The edge can be added without creating a cycle.
    Acyclic,
    /// The edge points a mission at itself.
    SelfDependency,
    /// The edge would close a cycle through an existing path.
    ClosesCycle {
        /// Existing path from the candidate's prerequisite to its mission.
        path: Vec<MissionId>,
    },
}

impl CycleVerdict {
    /// True for both cycle verdicts.
    pub fn is_cycle(&self) -> bool {
        !matches!(self, CycleVerdict::Acyclic)
    }

    /// Convert a cycle verdict into the error-facing [`CycleKind`].
    pub fn into_cycle_kind(self) -> Option<CycleKind> {
        match self {
            CycleVerdict::Acyclic => None,
            CycleVerdict::SelfDependency => Some(CycleKind::SelfDependency),
            CycleVerdict::ClosesCycle { path } => Some(CycleKind::Transitive { path }),
        }
    }
}

/// Decide whether adding `candidate` to `edges` would introduce a cycle.
///
/// Pure: reads `edges`, allocates a private index, and returns a verdict.
/// Endpoint membership is the caller's concern.
pub fn would_create_cycle<'a, I>(edges: I, candidate: DependencyEdge) -> CycleVerdict
where
    I: IntoIterator<Item = &'a DependencyEdge>,
{
    if candidate.is_self_loop() {
        return CycleVerdict::SelfDependency;
    }

    let index = DependencyIndex::from_edges(edges);
    match index.path_between(candidate.prerequisite_id, candidate.mission_id) {
        Some(path) => CycleVerdict::ClosesCycle { path },
        None => CycleVerdict::Acyclic,
    }
}

/// [`would_create_cycle`] mapped onto [`ChainError::CircularDependency`].
pub fn check_candidate<'a, I>(edges: I, candidate: DependencyEdge) -> ChainResult<()>
where
    I: IntoIterator<Item = &'a DependencyEdge>,
{
    match would_create_cycle(edges, candidate).into_cycle_kind() {
        None => Ok(()),
        Some(kind) => Err(ChainError::CircularDependency {
            mission_id: candidate.mission_id,
            prerequisite_id: candidate.prerequisite_id,
            kind,
        }),
    }
}
