//! Generation task aggregate root and its state machine.

use super::{CompositionRequest, ExternalTaskId, GenerationDomainError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Generation task lifecycle state.
///
/// `Completed` and `Failed` are sinks: a task observed in either never
/// transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    /// The composition is outstanding or still being rendered.
    Processing,
    /// The provider delivered a track; `music_url` is set.
    Completed,
    /// The task failed; `error` carries the diagnostic.
    Failed,
}

impl GenerationState {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns whether the state is a sink.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for GenerationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation task aggregate root.
///
/// All mutation goes through the methods below, which enforce the terminal
/// invariants: exactly one of `music_url`/`error` is set once the task
/// leaves `Processing`, and the external task id is write-once.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationTask {
    id: TaskId,
    request: CompositionRequest,
    state: GenerationState,
    music_url: Option<String>,
    error: Option<String>,
    external_task_id: Option<ExternalTaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GenerationTask {
    /// Creates a new task in `Processing` state for the given request.
    #[must_use]
    pub fn new(request: CompositionRequest, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            request,
            state: GenerationState::Processing,
            music_url: None,
            error: None,
            external_task_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the internal task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the originating composition request.
    #[must_use]
    pub const fn request(&self) -> &CompositionRequest {
        &self.request
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> GenerationState {
        self.state
    }

    /// Returns the rendered track URL, set only when completed.
    #[must_use]
    pub fn music_url(&self) -> Option<&str> {
        self.music_url.as_deref()
    }

    /// Returns the failure diagnostic, set only when failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the provider job identifier, once recorded.
    #[must_use]
    pub const fn external_task_id(&self) -> Option<&ExternalTaskId> {
        self.external_task_id.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records the provider's job identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationDomainError::ExternalTaskIdAlreadySet`] on a
    /// second write, or [`GenerationDomainError::TaskAlreadyTerminal`] when
    /// the task has already settled.
    pub fn record_external_task_id(
        &mut self,
        external_task_id: ExternalTaskId,
        clock: &impl Clock,
    ) -> Result<(), GenerationDomainError> {
        self.ensure_active()?;
        if self.external_task_id.is_some() {
            return Err(GenerationDomainError::ExternalTaskIdAlreadySet(self.id));
        }
        self.external_task_id = Some(external_task_id);
        self.touch(clock);
        Ok(())
    }

    /// Transitions the task to `Completed` with the delivered track URL.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationDomainError::TaskAlreadyTerminal`] when the task
    /// has already settled.
    pub fn complete(
        &mut self,
        music_url: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), GenerationDomainError> {
        self.ensure_active()?;
        self.state = GenerationState::Completed;
        self.music_url = Some(music_url.into());
        self.touch(clock);
        Ok(())
    }

    /// Transitions the task to `Failed` with a diagnostic message.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationDomainError::TaskAlreadyTerminal`] when the task
    /// has already settled.
    pub fn fail(
        &mut self,
        error: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), GenerationDomainError> {
        self.ensure_active()?;
        self.state = GenerationState::Failed;
        self.error = Some(error.into());
        self.touch(clock);
        Ok(())
    }

    /// Rejects mutation once a terminal state has been reached.
    const fn ensure_active(&self) -> Result<(), GenerationDomainError> {
        if self.state.is_terminal() {
            return Err(GenerationDomainError::TaskAlreadyTerminal {
                task_id: self.id,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
