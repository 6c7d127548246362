//! Core types for questline.
//!
//! This crate defines the vocabulary shared by every other questline crate:
//! - Identifier newtypes ([`ChainId`], [`MissionId`], [`UserId`])
//! - The [`MissionChain`] aggregate with its dense order array and dependency edge set
//! - The [`ChainError`] taxonomy returned by every fallible operation
//! - [`EngineConfig`] and friends, loaded from TOML
//!
//! Nothing in here performs I/O apart from [`EngineConfig::load`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod config;
pub mod error;
pub mod types;

pub use chain::{
    validate_chain_name, ChainDetailsUpdate, DependencyEdge, Mission, MissionChain,
    MissionOrderEntry, NewMissionChain, MAX_CHAIN_NAME_LEN,
};
pub use config::{AccessMode, ChainLimits, EngineConfig, LoggingConfig};
pub use error::{ChainError, ChainResult, CycleKind};
pub use types::{ChainId, MissionId, UserId};
