//! Thread-safe in-memory task store with per-key record locking.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::generation::{
    domain::{GenerationDomainError, GenerationTask, TaskId},
    ports::{GenerationTaskStore, TaskStoreError, TaskStoreResult, TaskUpdate},
};

/// In-memory task store.
///
/// The outer lock guards only the map shape (insertion and handle lookup);
/// each record lives behind its own lock, so a read-modify-write on one task
/// never blocks readers or writers of any other task. Records are never
/// removed once created.
#[derive(Debug)]
pub struct InMemoryTaskStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    records: RwLock<HashMap<TaskId, Arc<RwLock<GenerationTask>>>>,
    clock: Arc<C>,
}

impl InMemoryTaskStore<DefaultClock> {
    /// Creates an empty store backed by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store backed by the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Looks up the per-record handle without holding the outer lock
    /// afterwards.
    fn record_handle(&self, id: TaskId) -> TaskStoreResult<Option<Arc<RwLock<GenerationTask>>>> {
        let records = self.records.read().map_err(lock_poisoned)?;
        Ok(records.get(&id).cloned())
    }
}

/// Maps a poisoned lock to a storage error.
fn lock_poisoned<T>(err: PoisonError<T>) -> TaskStoreError {
    TaskStoreError::storage(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl<C> GenerationTaskStore for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    async fn insert(&self, task: &GenerationTask) -> TaskStoreResult<()> {
        let mut records = self.records.write().map_err(lock_poisoned)?;
        if records.contains_key(&task.id()) {
            return Err(TaskStoreError::Duplicate(task.id()));
        }
        records.insert(task.id(), Arc::new(RwLock::new(task.clone())));
        Ok(())
    }

    async fn get(&self, id: TaskId) -> TaskStoreResult<Option<GenerationTask>> {
        let Some(handle) = self.record_handle(id)? else {
            return Ok(None);
        };
        let record = handle.read().map_err(lock_poisoned)?;
        Ok(Some(record.clone()))
    }

    async fn update(&self, id: TaskId, update: TaskUpdate) -> TaskStoreResult<()> {
        let handle = self
            .record_handle(id)?
            .ok_or(TaskStoreError::NotFound(id))?;
        let mut record = handle.write().map_err(lock_poisoned)?;
        let result = match update {
            TaskUpdate::ExternalTaskAccepted(external_task_id) => {
                record.record_external_task_id(external_task_id, &*self.clock)
            }
            TaskUpdate::Completed(music_url) => record.complete(music_url, &*self.clock),
            TaskUpdate::Failed(error) => record.fail(error, &*self.clock),
        };
        result.map_err(|err| match err {
            GenerationDomainError::TaskAlreadyTerminal { task_id, state } => {
                TaskStoreError::AlreadyTerminal { task_id, state }
            }
            other => TaskStoreError::Domain(other),
        })
    }
}
