//! Storage layer for questline.
//!
//! This crate defines the contracts the chain manager consumes and ships
//! in-memory reference implementations of each:
//! - [`ChainRepository`]: durable chain state with per-chain atomic
//!   read-modify-write ([`ShardedChainStore`])
//! - [`MissionLookup`]: existence checks against the mission catalog
//!   ([`InMemoryMissionCatalog`])
//! - [`CompletionSource`]: per-user mission completion ([`CompletionLedger`])
//!
//! The only way to change a chain's missions, order or dependencies is
//! [`ChainRepository::transaction`], and the only fields a transaction can
//! stage are the ones exposed by [`ChainTxn`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod completion;
pub mod sharded;
pub mod traits;
pub mod txn;

pub use catalog::InMemoryMissionCatalog;
pub use completion::CompletionLedger;
pub use sharded::ShardedChainStore;
pub use traits::{ChainRepository, CompletionSource, MissionLookup};
pub use txn::ChainTxn;
