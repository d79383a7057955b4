//! Battle-level test suite.
//!
//! - `determinism.rs`: fixed-seed reproducibility of whole battles
//! - `integration.rs`: end-to-end scenarios and engine invariants
//! - `helpers.rs`: catalog and universe factories shared by both

mod determinism;
mod helpers;

pub use helpers::*;
