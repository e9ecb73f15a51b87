//! Façade service: initiate generation and read task status.

use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use super::watcher::{self, PollPolicy};
use crate::generation::{
    domain::{
        CompositionRequest, GenerationDomainError, GenerationState, GenerationTask, Mood,
        MoodIntensity, TaskId, Theme, TrackDuration,
    },
    ports::{CompositionProvider, GenerationTaskStore, TaskStoreError},
};

/// Request payload for initiating a music generation task.
#[derive(Debug, Clone, PartialEq)]
pub struct InitiateGenerationRequest {
    mood: String,
    duration_seconds: u32,
    theme: Option<String>,
    intensity: Option<f64>,
}

impl InitiateGenerationRequest {
    /// Creates a request with the required mood and duration.
    #[must_use]
    pub fn new(mood: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            mood: mood.into(),
            duration_seconds,
            theme: None,
            intensity: None,
        }
    }

    /// Sets a style theme for the prompt.
    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Sets a mood intensity for the prompt.
    #[must_use]
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Validates the payload into a domain composition request.
    fn into_composition_request(self) -> Result<CompositionRequest, GenerationDomainError> {
        let mood = Mood::new(&self.mood)?;
        let duration = TrackDuration::new(self.duration_seconds)?;
        let mut request = CompositionRequest::new(mood, duration);
        if let Some(theme) = self.theme {
            request = request.with_theme(Theme::new(theme)?);
        }
        if let Some(intensity) = self.intensity {
            request = request.with_intensity(MoodIntensity::new(intensity)?);
        }
        Ok(request)
    }
}

/// Acknowledgement status carried by an [`InitiateReceipt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiationStatus {
    /// The task was created and the watcher launched.
    GenerationInitiated,
}

/// Synchronous answer to a successful initiate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InitiateReceipt {
    status: InitiationStatus,
    task_id: TaskId,
}

impl InitiateReceipt {
    const fn new(task_id: TaskId) -> Self {
        Self {
            status: InitiationStatus::GenerationInitiated,
            task_id,
        }
    }

    /// Returns the internal identifier of the created task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }
}

/// Caller-facing view of a task's current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationStatus {
    status: GenerationState,
    music_url: Option<String>,
    error: Option<String>,
}

impl GenerationStatus {
    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> GenerationState {
        self.status
    }

    /// Returns the rendered track URL, when completed.
    #[must_use]
    pub fn music_url(&self) -> Option<&str> {
        self.music_url.as_deref()
    }

    /// Returns the failure diagnostic, when failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl From<GenerationTask> for GenerationStatus {
    fn from(task: GenerationTask) -> Self {
        Self {
            status: task.state(),
            music_url: task.music_url().map(ToOwned::to_owned),
            error: task.error().map(ToOwned::to_owned),
        }
    }
}

/// Service-level errors for generation operations.
#[derive(Debug, Error)]
pub enum GenerationServiceError {
    /// Caller input failed domain validation.
    #[error(transparent)]
    Validation(#[from] GenerationDomainError),

    /// No task exists under the given identifier.
    #[error("generation task {0} not found")]
    NotFound(TaskId),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for generation service operations.
pub type GenerationServiceResult<T> = Result<T, GenerationServiceError>;

/// Music generation façade.
///
/// `initiate` creates the task record, launches the watcher as an
/// independent concurrent activity, and returns without waiting; completion
/// is observable only through [`MusicGenerationService::status`], which
/// reads the store and never blocks on the watcher.
#[derive(Clone)]
pub struct MusicGenerationService<S, P, C>
where
    S: GenerationTaskStore + 'static,
    P: CompositionProvider + 'static,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    provider: Arc<P>,
    clock: Arc<C>,
    policy: PollPolicy,
}

impl<S, P, C> MusicGenerationService<S, P, C>
where
    S: GenerationTaskStore + 'static,
    P: CompositionProvider + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default polling policy.
    #[must_use]
    pub fn new(store: Arc<S>, provider: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            store,
            provider,
            clock,
            policy: PollPolicy::default(),
        }
    }

    /// Overrides the polling policy.
    #[must_use]
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates the request, creates a task, and launches its watcher.
    ///
    /// Returns as soon as the record is readable; the compose call and all
    /// polling happen in the spawned activity.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationServiceError::Validation`] when the mood,
    /// duration, theme, or intensity is rejected, or
    /// [`GenerationServiceError::Store`] when the record cannot be created.
    pub async fn initiate(
        &self,
        request: InitiateGenerationRequest,
    ) -> GenerationServiceResult<InitiateReceipt> {
        let composition = request.into_composition_request()?;
        let task = GenerationTask::new(composition.clone(), &*self.clock);
        let task_id = task.id();
        self.store.insert(&task).await?;

        tokio::spawn(watcher::run_generation(
            Arc::clone(&self.store),
            Arc::clone(&self.provider),
            task_id,
            composition,
            self.policy,
        ));

        Ok(InitiateReceipt::new(task_id))
    }

    /// Reads the current status of a task.
    ///
    /// Pure store read with no side effects; never blocks on the watcher.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationServiceError::NotFound`] when the id is
    /// unrecognized, or [`GenerationServiceError::Store`] on a storage
    /// failure.
    pub async fn status(&self, task_id: TaskId) -> GenerationServiceResult<GenerationStatus> {
        let task = self
            .store
            .get(task_id)
            .await?
            .ok_or(GenerationServiceError::NotFound(task_id))?;
        Ok(GenerationStatus::from(task))
    }
}
