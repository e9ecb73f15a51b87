//! Berlioz: mood-driven music composition orchestration.
//!
//! This crate accepts a mood and a target duration, asks an external
//! composition provider to render a music track, and lets callers poll for
//! completion. The orchestration core drives a bounded asynchronous polling
//! loop against the provider while exposing a consistent, race-free view of
//! task state to concurrent readers.
//!
//! # Architecture
//!
//! Berlioz follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (provider HTTP API,
//!   in-memory storage)
//!
//! # Modules
//!
//! - [`generation`]: Music generation task lifecycle and provider polling

pub mod generation;
