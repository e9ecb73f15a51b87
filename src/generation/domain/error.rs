//! Error types for generation domain validation and state transitions.

use super::{GenerationState, TaskId};
use thiserror::Error;

/// Errors returned while constructing domain values or mutating a task.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationDomainError {
    /// The mood is not part of the fixed vocabulary.
    #[error("unknown mood: {0}")]
    UnknownMood(String),

    /// The requested duration falls outside the supported range.
    #[error("invalid duration {0}s, expected 10-300 seconds")]
    InvalidDuration(u32),

    /// The mood intensity falls outside `[0.0, 1.0]`.
    #[error("invalid mood intensity {0}, expected a value in [0.0, 1.0]")]
    InvalidIntensity(f64),

    /// The theme is empty after trimming.
    #[error("theme must not be empty")]
    EmptyTheme,

    /// The provider job identifier is empty after trimming.
    #[error("external task id must not be empty")]
    EmptyExternalTaskId,

    /// The task is already in a terminal state and rejects further
    /// transitions.
    #[error("task {task_id} is already terminal ({state}) and cannot change")]
    TaskAlreadyTerminal {
        /// Identifier of the task that rejected the mutation.
        task_id: TaskId,
        /// Terminal state the task settled in.
        state: GenerationState,
    },

    /// The provider job identifier has already been recorded on the task.
    #[error("external task id is already set for task {0}")]
    ExternalTaskIdAlreadySet(TaskId),
}
