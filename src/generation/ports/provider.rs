//! Provider port for starting compositions and polling their status.

use crate::generation::domain::{CompositionRequest, ExternalTaskId};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for composition provider operations.
pub type CompositionProviderResult<T> = Result<T, CompositionProviderError>;

/// Point-in-time view of a provider job.
///
/// The status string is reported verbatim; interpretation happens in the
/// domain via [`crate::generation::domain::ProviderTrackStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStatusSnapshot {
    /// Raw provider status string.
    pub status: String,
    /// Rendered track URL, when the provider reports one.
    pub track_url: Option<String>,
    /// Provider-side failure message, when the provider reports one.
    pub error_message: Option<String>,
}

/// External composition service contract.
///
/// Implementations are stateless beyond their network plumbing and safely
/// callable from any number of concurrent watcher activities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompositionProvider: Send + Sync {
    /// Asks the provider to start rendering a track.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionProviderError::Unreachable`] on connection
    /// failure, [`CompositionProviderError::Rejected`] on a non-success HTTP
    /// status, or [`CompositionProviderError::Protocol`] when the response
    /// lacks the provider job id.
    async fn start_composition(
        &self,
        request: &CompositionRequest,
    ) -> CompositionProviderResult<ExternalTaskId>;

    /// Retrieves the current status of a provider job.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`CompositionProvider::start_composition`], with
    /// [`CompositionProviderError::Protocol`] covering responses missing the
    /// status field.
    async fn poll_status(
        &self,
        external_task_id: &ExternalTaskId,
    ) -> CompositionProviderResult<ProviderStatusSnapshot>;
}

/// Errors returned by composition provider implementations.
///
/// Always terminal for the affected task; the watcher absorbs them into the
/// task's `error` field and never lets them cross into the request path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompositionProviderError {
    /// The provider could not be reached at the transport level.
    #[error("could not reach the composition provider: {0}")]
    Unreachable(String),

    /// The provider answered with a non-success HTTP status.
    #[error("composition provider rejected the request (HTTP {status}): {body}")]
    Rejected {
        /// HTTP status code of the rejection.
        status: u16,
        /// Response body, when one was readable.
        body: String,
    },

    /// The response was well-formed HTTP but lacked the expected fields.
    #[error("composition provider protocol error: {0}")]
    Protocol(String),
}
