//! Application services for music generation orchestration.

mod lifecycle;
pub(crate) mod watcher;

pub use lifecycle::{
    GenerationServiceError, GenerationServiceResult, GenerationStatus, InitiateGenerationRequest,
    InitiateReceipt, InitiationStatus, MusicGenerationService,
};
pub use watcher::PollPolicy;
