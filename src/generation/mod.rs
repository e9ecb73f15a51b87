//! Music generation task lifecycle for Berlioz.
//!
//! This module owns the full lifecycle of a composition request: creating an
//! internally-addressable task distinct from the provider's job id, driving a
//! bounded polling loop against the provider's status endpoint, mapping the
//! provider's unstable status vocabulary onto a small internal state machine,
//! and exposing a race-free view of task state to concurrent readers while
//! the watcher is still mutating it in the background. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
