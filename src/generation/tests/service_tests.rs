//! Service orchestration tests for the generation façade.

use std::sync::Arc;

use async_trait::async_trait;
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;

use crate::generation::{
    adapters::memory::InMemoryTaskStore,
    domain::{CompositionRequest, ExternalTaskId, GenerationDomainError, GenerationState, TaskId},
    ports::{CompositionProvider, CompositionProviderResult, ProviderStatusSnapshot},
    services::{GenerationServiceError, InitiateGenerationRequest, MusicGenerationService},
};

/// Provider whose calls never resolve, pinning tasks in `Processing`.
struct PendingProvider;

#[async_trait]
impl CompositionProvider for PendingProvider {
    async fn start_composition(
        &self,
        _request: &CompositionRequest,
    ) -> CompositionProviderResult<ExternalTaskId> {
        std::future::pending().await
    }

    async fn poll_status(
        &self,
        _external_task_id: &ExternalTaskId,
    ) -> CompositionProviderResult<ProviderStatusSnapshot> {
        std::future::pending().await
    }
}

type TestService = MusicGenerationService<InMemoryTaskStore, PendingProvider, DefaultClock>;

#[fixture]
fn service() -> TestService {
    MusicGenerationService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(PendingProvider),
        Arc::new(DefaultClock),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn initiate_rejects_unknown_mood(service: TestService) -> eyre::Result<()> {
    let result = service
        .initiate(InitiateGenerationRequest::new("vengeful", 30))
        .await;
    ensure!(matches!(
        result,
        Err(GenerationServiceError::Validation(
            GenerationDomainError::UnknownMood(_)
        ))
    ));
    Ok(())
}

#[rstest]
#[case(9)]
#[case(301)]
#[tokio::test(flavor = "multi_thread")]
async fn initiate_rejects_out_of_range_duration(
    service: TestService,
    #[case] duration_seconds: u32,
) -> eyre::Result<()> {
    let result = service
        .initiate(InitiateGenerationRequest::new("calm", duration_seconds))
        .await;
    ensure!(matches!(
        result,
        Err(GenerationServiceError::Validation(
            GenerationDomainError::InvalidDuration(seconds)
        )) if seconds == duration_seconds
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn initiate_rejects_invalid_prompt_modifiers(service: TestService) -> eyre::Result<()> {
    let bad_intensity = service
        .initiate(InitiateGenerationRequest::new("calm", 30).with_intensity(1.5))
        .await;
    ensure!(matches!(
        bad_intensity,
        Err(GenerationServiceError::Validation(
            GenerationDomainError::InvalidIntensity(_)
        ))
    ));

    let empty_theme = service
        .initiate(InitiateGenerationRequest::new("calm", 30).with_theme("  "))
        .await;
    ensure!(matches!(
        empty_theme,
        Err(GenerationServiceError::Validation(
            GenerationDomainError::EmptyTheme
        ))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn initiated_task_is_immediately_readable_as_processing(
    service: TestService,
) -> eyre::Result<()> {
    let receipt = service
        .initiate(InitiateGenerationRequest::new("calm", 30))
        .await?;

    let status = service.status(receipt.task_id()).await?;
    ensure!(status.status() == GenerationState::Processing);
    ensure!(status.music_url().is_none());
    ensure!(status.error().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_of_unknown_id_is_not_found(service: TestService) -> eyre::Result<()> {
    let missing = TaskId::new();
    let result = service.status(missing).await;
    ensure!(matches!(
        result,
        Err(GenerationServiceError::NotFound(id)) if id == missing
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn receipt_serializes_to_the_inbound_contract(service: TestService) -> eyre::Result<()> {
    let receipt = service
        .initiate(InitiateGenerationRequest::new("calm", 30))
        .await?;

    let value = serde_json::to_value(receipt)?;
    ensure!(
        value
            == json!({
                "status": "generation_initiated",
                "task_id": receipt.task_id().into_inner(),
            })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn processing_status_serializes_with_null_outcome_fields(
    service: TestService,
) -> eyre::Result<()> {
    let receipt = service
        .initiate(InitiateGenerationRequest::new("calm", 30))
        .await?;

    let status = service.status(receipt.task_id()).await?;
    let value = serde_json::to_value(status)?;
    ensure!(
        value
            == json!({
                "status": "processing",
                "music_url": null,
                "error": null,
            })
    );
    Ok(())
}
