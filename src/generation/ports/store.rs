//! Store port — the single source of truth for generation task records.

use crate::generation::domain::{
    ExternalTaskId, GenerationDomainError, GenerationState, GenerationTask, TaskId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Field-level mutation applied atomically to a stored task record.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskUpdate {
    /// The provider accepted the compose request under this job id.
    ExternalTaskAccepted(ExternalTaskId),
    /// The provider delivered a rendered track at this URL.
    Completed(String),
    /// The task settled in failure with this diagnostic.
    Failed(String),
}

/// Task persistence contract.
///
/// The store exclusively owns task records; watchers and the façade mutate
/// through [`GenerationTaskStore::update`] only and never hold private
/// copies that could diverge from the authoritative record.
#[async_trait]
pub trait GenerationTaskStore: Send + Sync {
    /// Stores a new task record.
    ///
    /// Insertion is atomic with respect to concurrent reads: a reader never
    /// observes a partially-initialized record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Duplicate`] when the task id already
    /// exists.
    async fn insert(&self, task: &GenerationTask) -> TaskStoreResult<()>;

    /// Returns an immutable snapshot of the current record.
    ///
    /// Returns `None` when the id was never created.
    async fn get(&self, id: TaskId) -> TaskStoreResult<Option<GenerationTask>>;

    /// Applies a mutation to an existing record under exclusive access.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the id is unknown and
    /// [`TaskStoreError::AlreadyTerminal`] when the record has already
    /// settled — terminal-state idempotence prevents a late duplicate update
    /// from corrupting a finished result.
    async fn update(&self, id: TaskId, update: TaskUpdate) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    Duplicate(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The record already settled and rejected the update.
    #[error("task {task_id} is already {state} and cannot be updated")]
    AlreadyTerminal {
        /// Identifier of the settled task.
        task_id: TaskId,
        /// Terminal state the task settled in.
        state: GenerationState,
    },

    /// The record rejected the mutation for a non-terminal domain reason.
    #[error(transparent)]
    Domain(#[from] GenerationDomainError),

    /// Storage-layer failure.
    #[error("storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a storage-layer error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
