//! # Group Runner Errors
//!
//! Error taxonomy for parallel group execution.
//!
//! Two levels are modelled:
//! - [`UnitError`]: the outcome of one unit of work that did not succeed, whether the
//!   framework rejected it (invalid callable, argument mismatch) or the callable itself failed.
//! - [`GroupRunnerError`]: what the error-only entry points hand back to the caller. It is
//!   returned iff at least one unit failed, and its message carries every failure's text.

use thiserror::Error;

/// Failure of a single unit of work.
#[derive(Debug, Error)]
pub enum UnitError {
    /// The supplied value is not a callable, or has a shape the entry point does not accept
    #[error("invalid callable: {reason}")]
    InvalidCallable { reason: String },

    /// Arity or parameter/result types do not line up with the callable's signature
    #[error("argument mismatch: {reason}")]
    ArgumentMismatch { reason: String },

    /// The callable ran and returned an error
    #[error("{0:#}")]
    Failed(#[from] anyhow::Error),

    /// The callable panicked while running
    #[error("unit panicked: {message}")]
    Panicked { message: String },

    /// The task was torn down before it finished (runtime shutdown)
    #[error("unit aborted: {message}")]
    Aborted { message: String },
}

impl UnitError {
    pub fn invalid_callable(reason: impl Into<String>) -> Self {
        Self::InvalidCallable {
            reason: reason.into(),
        }
    }

    pub fn argument_mismatch(reason: impl Into<String>) -> Self {
        Self::ArgumentMismatch {
            reason: reason.into(),
        }
    }

    /// True when the framework rejected the unit before invoking it
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidCallable { .. } | Self::ArgumentMismatch { .. }
        )
    }
}

/// A failed unit together with its position in the input batch.
#[derive(Debug, Error)]
#[error("[{index}] {error}")]
pub struct UnitFailure {
    pub index: usize,
    #[source]
    pub error: UnitError,
}

/// Aggregate error returned by the error-only entry points.
#[derive(Debug, Error)]
pub enum GroupRunnerError {
    /// The callable was rejected before any task was spawned
    #[error("invalid callable: {reason}")]
    InvalidCallable { reason: String },

    /// One or more units failed; failures are kept in input order
    #[error("{} of {total} units failed: {}", .failures.len(), join_failures(.failures))]
    UnitsFailed {
        total: usize,
        failures: Vec<UnitFailure>,
    },
}

impl GroupRunnerError {
    /// Per-unit failures, empty for an up-front rejection
    pub fn failures(&self) -> &[UnitFailure] {
        match self {
            Self::InvalidCallable { .. } => &[],
            Self::UnitsFailed { failures, .. } => failures,
        }
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures().iter().map(|f| f.index).collect()
    }

    /// Up-front rejection of a callable, before any unit exists
    pub(crate) fn rejected(error: UnitError) -> Self {
        let reason = match error {
            UnitError::InvalidCallable { reason } => reason,
            other => other.to_string(),
        };
        Self::InvalidCallable { reason }
    }
}

fn join_failures(failures: &[UnitFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type GroupResult<T> = Result<T, GroupRunnerError>;

/// Errors loading [`GroupRunnerConfig`](crate::config::GroupRunnerConfig)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
