//! Background watcher driving a task from compose call to terminal state.
//!
//! One watcher activity runs per task, launched by the façade immediately
//! after the record is created. It owns the per-task state machine: issue
//! the compose call, record the provider job id, then poll the provider
//! until a terminal outcome or the iteration ceiling is reached. Every
//! observation is written through the store's atomic update operation;
//! nothing raised here propagates to, or can crash, the request path.

use std::sync::Arc;
use std::time::Duration;

use crate::generation::{
    domain::{CompositionRequest, ExternalTaskId, ProviderTrackStatus, TaskId},
    ports::{CompositionProvider, GenerationTaskStore, TaskStoreError, TaskUpdate},
};

/// Diagnostic recorded when the provider reports completion without a URL.
pub(crate) const NO_DELIVERABLE_DIAGNOSTIC: &str =
    "provider reported completion without a deliverable";

/// Fallback diagnostic when the provider fails without a message.
pub(crate) const GENERIC_FAILURE_DIAGNOSTIC: &str =
    "provider reported the composition as failed";

/// Retry cadence and ceiling for provider status polling.
///
/// The ceiling is the only bound on a task's lifetime: a permanently
/// unrecognized provider status cannot hang a task past
/// `max_attempts * interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl PollPolicy {
    /// Creates a policy with an explicit ceiling and interval.
    #[must_use]
    pub const fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Returns the maximum number of polling attempts.
    #[must_use]
    pub const fn max_attempts(self) -> u32 {
        self.max_attempts
    }

    /// Returns the inter-iteration sleep.
    #[must_use]
    pub const fn interval(self) -> Duration {
        self.interval
    }
}

impl Default for PollPolicy {
    /// 60 attempts at 5-second intervals, a 5-minute ceiling.
    fn default() -> Self {
        Self::new(60, Duration::from_secs(5))
    }
}

/// Drives a single task to a terminal state.
pub(crate) async fn run_generation<S, P>(
    store: Arc<S>,
    provider: Arc<P>,
    task_id: TaskId,
    request: CompositionRequest,
    policy: PollPolicy,
) where
    S: GenerationTaskStore,
    P: CompositionProvider,
{
    let external_task_id = match provider.start_composition(&request).await {
        Ok(id) => id,
        Err(err) => {
            tracing::warn!(%task_id, error = %err, "compose request failed");
            apply_update(&*store, task_id, TaskUpdate::Failed(err.to_string())).await;
            return;
        }
    };
    tracing::info!(%task_id, %external_task_id, "composition accepted by provider");
    apply_update(
        &*store,
        task_id,
        TaskUpdate::ExternalTaskAccepted(external_task_id.clone()),
    )
    .await;

    watch_track_status(&*store, &*provider, task_id, &external_task_id, policy).await;
}

/// Polls the provider until a terminal outcome or the ceiling is reached.
async fn watch_track_status<S, P>(
    store: &S,
    provider: &P,
    task_id: TaskId,
    external_task_id: &ExternalTaskId,
    policy: PollPolicy,
) where
    S: GenerationTaskStore,
    P: CompositionProvider,
{
    for _ in 0..policy.max_attempts() {
        let snapshot = match provider.poll_status(external_task_id).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(%task_id, error = %err, "status check failed");
                apply_update(store, task_id, TaskUpdate::Failed(err.to_string())).await;
                return;
            }
        };

        match ProviderTrackStatus::from_provider(&snapshot.status) {
            ProviderTrackStatus::InProgress => {}
            ProviderTrackStatus::Complete => {
                let update = match snapshot.track_url {
                    Some(track_url) => {
                        tracing::info!(%task_id, %track_url, "composition completed");
                        TaskUpdate::Completed(track_url)
                    }
                    None => TaskUpdate::Failed(NO_DELIVERABLE_DIAGNOSTIC.to_owned()),
                };
                apply_update(store, task_id, update).await;
                return;
            }
            ProviderTrackStatus::Failed => {
                let diagnostic = snapshot
                    .error_message
                    .unwrap_or_else(|| GENERIC_FAILURE_DIAGNOSTIC.to_owned());
                tracing::warn!(%task_id, error = %diagnostic, "provider reported failure");
                apply_update(store, task_id, TaskUpdate::Failed(diagnostic)).await;
                return;
            }
            ProviderTrackStatus::Unrecognized(value) => {
                // Vocabulary drift: still counts against the ceiling.
                tracing::warn!(%task_id, status = %value, "unrecognized provider status, treating as in progress");
            }
        }

        tokio::time::sleep(policy.interval()).await;
    }

    apply_update(store, task_id, TaskUpdate::Failed(timeout_diagnostic(policy))).await;
}

/// Diagnostic recorded when the polling ceiling is exhausted.
pub(crate) fn timeout_diagnostic(policy: PollPolicy) -> String {
    let ceiling_secs = policy
        .interval()
        .as_secs()
        .saturating_mul(u64::from(policy.max_attempts()));
    format!(
        "composition timed out after {} status checks over {ceiling_secs}s",
        policy.max_attempts()
    )
}

/// Writes an observation through the store, absorbing late-write races.
///
/// A record that already settled rejects the update with `AlreadyTerminal`;
/// that is logged and swallowed so a duplicate terminal write can never
/// corrupt a finished result or escape the background activity.
async fn apply_update<S>(store: &S, task_id: TaskId, update: TaskUpdate)
where
    S: GenerationTaskStore,
{
    match store.update(task_id, update).await {
        Ok(()) => {}
        Err(TaskStoreError::AlreadyTerminal { state, .. }) => {
            tracing::warn!(%task_id, state = state.as_str(), "skipped update for task already in a terminal state");
        }
        Err(err) => {
            tracing::error!(%task_id, error = %err, "failed to record task update");
        }
    }
}
