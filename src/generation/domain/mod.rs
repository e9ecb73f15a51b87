//! Domain model for music generation task lifecycle.
//!
//! The generation domain models composition requests, the per-task state
//! machine, and the mapping from the provider's status vocabulary onto
//! internal states, while keeping all infrastructure concerns outside of the
//! domain boundary.

mod error;
mod ids;
mod mood;
mod request;
mod status;
mod task;

pub use error::GenerationDomainError;
pub use ids::{ExternalTaskId, TaskId};
pub use mood::Mood;
pub use request::{CompositionRequest, MoodIntensity, Theme, TrackDuration};
pub use status::ProviderTrackStatus;
pub use task::{GenerationState, GenerationTask};
