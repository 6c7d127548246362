//! Dependency graph validation for mission chains.
//!
//! Everything in this crate is a pure function over a snapshot of a chain's
//! edge set: no I/O, no interior mutability, deterministic output. The chain
//! manager calls [`would_create_cycle`] before committing a new edge, and the
//! store calls [`check_acyclic`] as a last guard before publishing a
//! transaction.
//!
//! Edges point from a dependant to its prerequisite ("A depends on B" is the
//! edge `A -> B`), and every traversal here walks in that direction unless
//! the function name says otherwise.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adjacency;
pub mod cycle;
pub mod traversal;

pub use adjacency::DependencyIndex;
pub use cycle::{check_candidate, would_create_cycle, CycleVerdict};
pub use traversal::{check_acyclic, topological_order};
