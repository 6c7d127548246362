//! Chain Engine Integration Suite
//!
//! Exercises the workspace through the `questline` facade, using the
//! in-memory store and catalog.
//!
//! ## Test Tiers
//!
//! - **Tier 1**: Dependency validator (pure, no storage)
//! - **Tier 2**: Manager operations and their error kinds
//! - **Tier 3**: Order and graph invariants under mutation sequences
//! - **Tier 4**: End-to-end scenarios, progress and catalog integrity
//! - **Tier 5**: Concurrent mutations on shared chains
//! - **Tier 6**: Configuration loading and enforcement
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test chain_engine
//! ```

// Test modules
mod test_utils;

// Tier 1: Validator
mod tier1_validator;



// Tier 4: End-to-end
mod tier4_end_to_end;

// Tier 5: Concurrency
mod tier5_concurrency;

// Tier 6: Configuration
mod tier6_config;
