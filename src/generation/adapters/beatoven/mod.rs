//! HTTP adapter for the Beatoven composition API.
//!
//! Implements the [`crate::generation::ports::CompositionProvider`] port
//! against the provider's `/tracks/compose` and `/tasks/{id}` endpoints.

mod client;
mod config;
mod wire;

pub use client::BeatovenClient;
pub use config::ProviderConfig;
