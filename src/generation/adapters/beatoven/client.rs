//! Reqwest-backed composition provider client.

use async_trait::async_trait;
use std::time::Duration;

use super::config::ProviderConfig;
use super::wire::{ComposeRequestBody, ComposeResponseBody, TrackStatusBody};
use crate::generation::{
    domain::{CompositionRequest, ExternalTaskId},
    ports::{
        CompositionProvider, CompositionProviderError, CompositionProviderResult,
        ProviderStatusSnapshot,
    },
};

/// Upper bound on the compose call, which the provider answers slowly.
const COMPOSE_TIMEOUT: Duration = Duration::from_secs(60);

/// Upper bound on a single status check.
const STATUS_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the composition provider.
///
/// Stateless beyond its connection pool; one instance serves any number of
/// concurrent watcher activities.
#[derive(Debug, Clone)]
pub struct BeatovenClient {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl BeatovenClient {
    /// Creates a client for the given provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionProviderError::Unreachable`] when the underlying
    /// HTTP client cannot be constructed.
    pub fn new(config: ProviderConfig) -> CompositionProviderResult<Self> {
        let client = reqwest::Client::builder().build().map_err(|err| {
            CompositionProviderError::Unreachable(format!("failed to construct HTTP client: {err}"))
        })?;
        Ok(Self { client, config })
    }

    /// Attaches the bearer token when one is configured.
    ///
    /// Without a key the request goes out unauthenticated and the provider's
    /// 401-class answer surfaces as [`CompositionProviderError::Rejected`].
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key() {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

/// Maps a transport-level send failure.
fn transport_error(err: &reqwest::Error) -> CompositionProviderError {
    CompositionProviderError::Unreachable(err.to_string())
}

/// Maps an undecodable response body.
fn decode_error(err: &reqwest::Error) -> CompositionProviderError {
    CompositionProviderError::Protocol(format!("undecodable response body: {err}"))
}

/// Passes success responses through and converts the rest into rejections.
async fn check_status(
    response: reqwest::Response,
) -> CompositionProviderResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(CompositionProviderError::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CompositionProvider for BeatovenClient {
    async fn start_composition(
        &self,
        request: &CompositionRequest,
    ) -> CompositionProviderResult<ExternalTaskId> {
        let url = format!("{}/tracks/compose", self.config.base_url());
        let body = ComposeRequestBody::from_request(request);
        tracing::debug!(%url, mood = %request.mood(), duration = %request.duration(), "sending compose request");

        let response = self
            .authorize(self.client.post(&url))
            .timeout(COMPOSE_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|err| transport_error(&err))?;
        let response = check_status(response).await?;
        let decoded: ComposeResponseBody = response
            .json()
            .await
            .map_err(|err| decode_error(&err))?;
        decoded.into_external_task_id()
    }

    async fn poll_status(
        &self,
        external_task_id: &ExternalTaskId,
    ) -> CompositionProviderResult<ProviderStatusSnapshot> {
        let url = format!("{}/tasks/{external_task_id}", self.config.base_url());
        tracing::debug!(%url, "sending status request");

        let response = self
            .authorize(self.client.get(&url))
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(|err| transport_error(&err))?;
        let response = check_status(response).await?;
        let decoded: TrackStatusBody = response
            .json()
            .await
            .map_err(|err| decode_error(&err))?;
        decoded.into_snapshot()
    }
}
