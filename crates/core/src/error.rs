//! Error taxonomy for chain operations.
//!
//! Every fallible questline operation returns [`ChainResult`]. The variants map
//! one-to-one onto the outcomes a caller may want to present differently, so
//! callers match on the variant rather than parsing messages.

use std::fmt;

use thiserror::Error;

use crate::types::{ChainId, MissionId};

/// Result alias used throughout questline.
pub type ChainResult<T> = Result<T, ChainError>;

/// How a rejected dependency would have closed a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleKind {
    /// The mission was asked to depend on itself.
    SelfDependency,
    /// The prerequisite already (transitively) depends on the mission.
    ///
    /// `path` starts at the prerequisite and ends at the dependant mission,
    /// following existing "depends on" edges.
    Transitive {
        /// Missions along the existing dependency path.
        path: Vec<MissionId>,
    },
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleKind::SelfDependency => write!(f, "self-dependency"),
            CycleKind::Transitive { path } => {
                let rendered: Vec<String> = path.iter().map(|m| m.to_string()).collect();
                write!(f, "existing path {}", rendered.join(" -> "))
            }
        }
    }
}

/// Errors returned by chain operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The referenced chain does not exist.
    #[error("mission chain {chain_id} not found")]
    ChainNotFound {
        /// Chain that was looked up.
        chain_id: ChainId,
    },

    /// The target mission does not exist or is not a member of the chain.
    #[error("mission {mission_id} not found")]
    MissionNotFound {
        /// Mission that was looked up.
        mission_id: MissionId,
    },

    /// The prerequisite side of a dependency does not exist or is not a member.
    #[error("mission {mission_id} is not a valid prerequisite")]
    PrerequisiteMissionNotFound {
        /// Prerequisite that was looked up.
        mission_id: MissionId,
    },

    /// The mission is already a member of the chain.
    #[error("mission {mission_id} is already in chain {chain_id}")]
    MissionAlreadyInChain {
        /// Chain being modified.
        chain_id: ChainId,
        /// Mission that was added twice.
        mission_id: MissionId,
    },

    /// The dependency edge is already present.
    #[error("mission {mission_id} already depends on mission {prerequisite_id}")]
    DependencyAlreadyExists {
        /// Dependant mission.
        mission_id: MissionId,
        /// Prerequisite mission.
        prerequisite_id: MissionId,
    },

    /// Adding the dependency would introduce a cycle.
    #[error(
        "dependency of mission {mission_id} on mission {prerequisite_id} would create a cycle ({kind})"
    )]
    CircularDependency {
        /// Dependant mission of the rejected edge.
        mission_id: MissionId,
        /// Prerequisite mission of the rejected edge.
        prerequisite_id: MissionId,
        /// Self-dependency or the existing path the edge would close.
        kind: CycleKind,
    },

    /// Requested order position is outside `1..=max`.
    #[error("invalid mission order {requested}: must be between 1 and {max}")]
    InvalidMissionOrder {
        /// Position that was requested.
        requested: usize,
        /// Current number of missions in the chain.
        max: usize,
    },

    /// Another chain already uses this name.
    #[error("a mission chain named '{name}' already exists")]
    DuplicateChainName {
        /// Conflicting name.
        name: String,
    },

    /// Input failed validation.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// A mutation was attempted while the engine is configured read-only.
    #[error("engine is configured read-only")]
    ReadOnly,

    /// A configured per-chain limit would be exceeded.
    #[error("limit of {limit} exceeded: {reason}")]
    LimitExceeded {
        /// Configured limit.
        limit: usize,
        /// Which limit was hit.
        reason: String,
    },

    /// A staged change would have left the chain inconsistent.
    #[error("chain invariant violated: {reason}")]
    InvariantViolation {
        /// Which invariant failed.
        reason: String,
    },

    /// The backing store failed.
    #[error("storage error: {reason}")]
    Storage {
        /// Store-specific failure description.
        reason: String,
    },

    /// Configuration could not be parsed or loaded.
    #[error("configuration error: {reason}")]
    Config {
        /// Parse or I/O failure description.
        reason: String,
    },
}

impl ChainError {
    /// Create an `InvalidInput` error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        ChainError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an `InvariantViolation` error.
    pub fn invariant(reason: impl Into<String>) -> Self {
        ChainError::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Create a `Storage` error.
    pub fn storage(reason: impl Into<String>) -> Self {
        ChainError::Storage {
            reason: reason.into(),
        }
    }

    /// Create a `Config` error.
    pub fn config(reason: impl Into<String>) -> Self {
        ChainError::Config {
            reason: reason.into(),
        }
    }

    /// True for the lookup failures (`ChainNotFound`, `MissionNotFound`,
    /// `PrerequisiteMissionNotFound`).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ChainError::ChainNotFound { .. }
                | ChainError::MissionNotFound { .. }
                | ChainError::PrerequisiteMissionNotFound { .. }
        )
    }

    /// True for errors caused by the caller's request rather than the system.
    ///
    /// These are recoverable by fixing the request; none of them are retried.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            ChainError::InvariantViolation { .. }
                | ChainError::Storage { .. }
                | ChainError::Config { .. }
        )
    }

    /// True if the error is a rejected cycle.
    pub fn is_circular(&self) -> bool {
        matches!(self, ChainError::CircularDependency { .. })
    }
}
