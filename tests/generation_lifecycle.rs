//! End-to-end generation lifecycle tests against stub providers.
//!
//! The provider port is swapped for in-process stubs implementing the same
//! contract as the HTTP client, so the façade, store, and watcher run
//! exactly as in production.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eyre::ensure;
use mockable::{Clock, DefaultClock};
use rstest::rstest;

use berlioz::generation::{
    adapters::memory::InMemoryTaskStore,
    domain::{CompositionRequest, ExternalTaskId, GenerationState, TaskId},
    ports::{
        CompositionProvider, CompositionProviderError, CompositionProviderResult,
        GenerationTaskStore, ProviderStatusSnapshot,
    },
    services::{GenerationStatus, InitiateGenerationRequest, MusicGenerationService, PollPolicy},
};

/// Replays a fixed sequence of status snapshots for a single task.
struct ScriptedProvider {
    external_task_id: &'static str,
    polls: Mutex<Vec<ProviderStatusSnapshot>>,
}

impl ScriptedProvider {
    fn new(
        external_task_id: &'static str,
        polls: impl IntoIterator<Item = ProviderStatusSnapshot>,
    ) -> Self {
        let mut scripted: Vec<ProviderStatusSnapshot> = polls.into_iter().collect();
        scripted.reverse();
        Self {
            external_task_id,
            polls: Mutex::new(scripted),
        }
    }
}

#[async_trait]
impl CompositionProvider for ScriptedProvider {
    async fn start_composition(
        &self,
        _request: &CompositionRequest,
    ) -> CompositionProviderResult<ExternalTaskId> {
        ExternalTaskId::new(self.external_task_id)
            .map_err(|err| CompositionProviderError::Protocol(err.to_string()))
    }

    async fn poll_status(
        &self,
        _external_task_id: &ExternalTaskId,
    ) -> CompositionProviderResult<ProviderStatusSnapshot> {
        let next = self
            .polls
            .lock()
            .map_err(|err| CompositionProviderError::Protocol(err.to_string()))?
            .pop();
        next.ok_or_else(|| CompositionProviderError::Protocol("status script exhausted".to_owned()))
    }
}

/// Issues a unique job id per compose call and completes every poll with a
/// URL derived from the polled job id.
#[derive(Default)]
struct CountingProvider {
    accepted: AtomicUsize,
}

#[async_trait]
impl CompositionProvider for CountingProvider {
    async fn start_composition(
        &self,
        _request: &CompositionRequest,
    ) -> CompositionProviderResult<ExternalTaskId> {
        let sequence = self.accepted.fetch_add(1, Ordering::SeqCst);
        ExternalTaskId::new(format!("ext-{sequence}"))
            .map_err(|err| CompositionProviderError::Protocol(err.to_string()))
    }

    async fn poll_status(
        &self,
        external_task_id: &ExternalTaskId,
    ) -> CompositionProviderResult<ProviderStatusSnapshot> {
        Ok(ProviderStatusSnapshot {
            status: "composed".to_owned(),
            track_url: Some(format!("https://cdn.example/{external_task_id}/track.mp3")),
            error_message: None,
        })
    }
}

/// Provider whose compose call always fails at the transport level.
struct FailingProvider;

#[async_trait]
impl CompositionProvider for FailingProvider {
    async fn start_composition(
        &self,
        _request: &CompositionRequest,
    ) -> CompositionProviderResult<ExternalTaskId> {
        Err(CompositionProviderError::Unreachable(
            "dns resolution failed".to_owned(),
        ))
    }

    async fn poll_status(
        &self,
        _external_task_id: &ExternalTaskId,
    ) -> CompositionProviderResult<ProviderStatusSnapshot> {
        Err(CompositionProviderError::Unreachable(
            "dns resolution failed".to_owned(),
        ))
    }
}

fn snapshot(status: &str, track_url: Option<&str>) -> ProviderStatusSnapshot {
    ProviderStatusSnapshot {
        status: status.to_owned(),
        track_url: track_url.map(ToOwned::to_owned),
        error_message: None,
    }
}

fn fast_policy() -> PollPolicy {
    PollPolicy::new(10, Duration::from_millis(5))
}

/// Polls the façade until the task leaves `Processing`.
async fn wait_for_terminal<S, P, C>(
    service: &MusicGenerationService<S, P, C>,
    task_id: TaskId,
) -> eyre::Result<GenerationStatus>
where
    S: GenerationTaskStore + 'static,
    P: CompositionProvider + 'static,
    C: Clock + Send + Sync,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let status = service.status(task_id).await?;
            if status.status() != GenerationState::Processing {
                return Ok::<_, eyre::Report>(status);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await?
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn calm_track_request_completes_end_to_end() -> eyre::Result<()> {
    let provider = ScriptedProvider::new(
        "beatoven-calm-1",
        [
            snapshot("composing", None),
            snapshot("composed", Some("https://cdn.example/calm/full_track.mp3")),
        ],
    );
    let service = MusicGenerationService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(provider),
        Arc::new(DefaultClock),
    )
    .with_policy(fast_policy());

    let receipt = service
        .initiate(InitiateGenerationRequest::new("calm", 30))
        .await?;

    let status = wait_for_terminal(&service, receipt.task_id()).await?;
    ensure!(status.status() == GenerationState::Completed);
    ensure!(status.music_url() == Some("https://cdn.example/calm/full_track.mp3"));
    ensure!(status.error().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn compose_failure_surfaces_in_the_task_error() -> eyre::Result<()> {
    let service = MusicGenerationService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(FailingProvider),
        Arc::new(DefaultClock),
    )
    .with_policy(fast_policy());

    let receipt = service
        .initiate(InitiateGenerationRequest::new("gloomy", 60))
        .await?;

    let status = wait_for_terminal(&service, receipt.task_id()).await?;
    ensure!(status.status() == GenerationState::Failed);
    ensure!(
        status.error()
            == Some("could not reach the composition provider: dns resolution failed")
    );
    ensure!(status.music_url().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn terminal_status_is_stable_across_repeated_reads() -> eyre::Result<()> {
    let provider = ScriptedProvider::new(
        "beatoven-stable-1",
        [snapshot("composed", Some("https://cdn.example/stable.mp3"))],
    );
    let service = MusicGenerationService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(provider),
        Arc::new(DefaultClock),
    )
    .with_policy(fast_policy());

    let receipt = service
        .initiate(InitiateGenerationRequest::new("serene", 45))
        .await?;
    let settled = wait_for_terminal(&service, receipt.task_id()).await?;

    tokio::time::sleep(Duration::from_millis(50)).await;
    let reread = service.status(receipt.task_id()).await?;
    ensure!(reread == settled);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_hundred_concurrent_tasks_do_not_cross_contaminate() -> eyre::Result<()> {
    let store = Arc::new(InMemoryTaskStore::new());
    let service = MusicGenerationService::new(
        Arc::clone(&store),
        Arc::new(CountingProvider::default()),
        Arc::new(DefaultClock),
    )
    .with_policy(PollPolicy::new(20, Duration::from_millis(10)));

    let mut task_ids = Vec::new();
    for _ in 0..100 {
        let receipt = service
            .initiate(InitiateGenerationRequest::new("energetic", 30))
            .await?;
        task_ids.push(receipt.task_id());
    }

    // Status reads stay prompt no matter how many watchers are mid-sleep.
    for task_id in &task_ids {
        let read = tokio::time::timeout(Duration::from_millis(500), service.status(*task_id)).await;
        ensure!(read.is_ok(), "status read timed out");
    }

    let mut seen_external_ids = HashSet::new();
    for task_id in task_ids {
        let status = wait_for_terminal(&service, task_id).await?;
        ensure!(status.status() == GenerationState::Completed);

        let record = store
            .get(task_id)
            .await?
            .ok_or_else(|| eyre::eyre!("record should exist"))?;
        let external_task_id = record
            .external_task_id()
            .ok_or_else(|| eyre::eyre!("external id should be recorded"))?;
        ensure!(
            status.music_url()
                == Some(format!("https://cdn.example/{external_task_id}/track.mp3").as_str())
        );
        ensure!(seen_external_ids.insert(external_task_id.clone()));
    }
    ensure!(seen_external_ids.len() == 100);
    Ok(())
}
