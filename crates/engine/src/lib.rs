//! Chain engine for questline.
//!
//! [`MissionChainManager`] is the only component that mutates chain structure.
//! It composes the dependency validator from `questline-graph` with a
//! [`ChainRepository`](questline_storage::ChainRepository) and runs every
//! mutation as one per-chain transaction. [`ChainProgressProjector`] derives
//! per-user progress from the same state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod integrity;
pub mod manager;
pub mod progress;
pub mod queries;

pub use integrity::DetachReport;
pub use manager::MissionChainManager;
pub use progress::{project, ChainProgress, ChainProgressProjector, MissionProgress};
