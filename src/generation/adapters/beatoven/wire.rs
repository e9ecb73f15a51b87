//! Wire types for the provider's compose and status endpoints.

use serde::{Deserialize, Serialize};

use crate::generation::{
    domain::{CompositionRequest, ExternalTaskId},
    ports::{CompositionProviderError, ProviderStatusSnapshot},
};

/// Body of `POST /tracks/compose`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct ComposeRequestBody {
    prompt: PromptBody,
    duration: u32,
    format: TrackFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct PromptBody {
    text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum TrackFormat {
    Mp3,
}

impl ComposeRequestBody {
    pub(super) fn from_request(request: &CompositionRequest) -> Self {
        Self {
            prompt: PromptBody {
                text: request.prompt_text(),
            },
            duration: request.duration().seconds(),
            format: TrackFormat::Mp3,
        }
    }
}

/// Body of the compose response, `{"task_id": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(super) struct ComposeResponseBody {
    #[serde(default)]
    task_id: Option<String>,
}

impl ComposeResponseBody {
    /// Extracts the provider job id.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionProviderError::Protocol`] when the field is
    /// missing or empty.
    pub(super) fn into_external_task_id(
        self,
    ) -> Result<ExternalTaskId, CompositionProviderError> {
        let Some(raw) = self.task_id else {
            return Err(CompositionProviderError::Protocol(
                "compose response did not contain a task_id".to_owned(),
            ));
        };
        ExternalTaskId::new(raw).map_err(|_| {
            CompositionProviderError::Protocol("compose response contained an empty task_id".to_owned())
        })
    }
}

/// Body of `GET /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(super) struct TrackStatusBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    meta: Option<TrackMetaBody>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(super) struct TrackMetaBody {
    #[serde(default)]
    track_url: Option<String>,
}

impl TrackStatusBody {
    /// Converts the response into a port-level snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionProviderError::Protocol`] when the status field
    /// is missing or empty.
    pub(super) fn into_snapshot(
        self,
    ) -> Result<ProviderStatusSnapshot, CompositionProviderError> {
        let Some(status) = self.status.filter(|value| !value.trim().is_empty()) else {
            return Err(CompositionProviderError::Protocol(
                "status response did not contain a status field".to_owned(),
            ));
        };
        Ok(ProviderStatusSnapshot {
            status,
            track_url: self.meta.and_then(|meta| meta.track_url),
            error_message: self.error_message,
        })
    }
}
