//! # Result Aggregator
//!
//! Folds per-unit outcomes into what each entry point returns: a single aggregate error for
//! the error-only entry points, or the full ordered list of [`ResultSlot`]s.

use super::validator::Outcome;
use crate::error::{GroupResult, GroupRunnerError, UnitError, UnitFailure};
use std::any::{type_name, Any};

/// `(value, error)` of one unit, addressed by its position in the input batch.
///
/// Both halves can be set at once when a callable built with
/// [`Func::with_outcome`](crate::Func::with_outcome) returns a value together with an error.
/// Rejected and panicked units never carry a value.
#[derive(Debug)]
pub struct ResultSlot<R> {
    index: usize,
    value: Option<R>,
    error: Option<UnitError>,
}

impl<R> ResultSlot<R> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn value(&self) -> Option<&R> {
        self.value.as_ref()
    }

    pub fn error(&self) -> Option<&UnitError> {
        self.error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_parts(self) -> (Option<R>, Option<UnitError>) {
        (self.value, self.error)
    }

    /// Drops the value of a failed unit
    pub fn into_result(self) -> Result<R, UnitError> {
        match (self.value, self.error) {
            (_, Some(error)) => Err(error),
            (Some(value), None) => Ok(value),
            (None, None) => Err(missing_value::<R>()),
        }
    }
}

fn missing_value<R>() -> UnitError {
    UnitError::argument_mismatch(format!("unit returned no {}", type_name::<R>()))
}

/// `Ok(())` iff every unit succeeded; otherwise every failure, in index order
pub(crate) fn fold_errors(outcomes: Vec<Outcome>) -> GroupResult<()> {
    let total = outcomes.len();
    let failures: Vec<UnitFailure> = outcomes
        .into_iter()
        .enumerate()
        .filter_map(|(index, outcome)| outcome.error.map(|error| UnitFailure { index, error }))
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(GroupRunnerError::UnitsFailed { total, failures })
    }
}

/// One slot per outcome, in input order
pub(crate) fn fold_results<R: Any>(outcomes: Vec<Outcome>) -> Vec<ResultSlot<R>> {
    outcomes
        .into_iter()
        .enumerate()
        .map(|(index, Outcome { value, error })| {
            let value = value.and_then(|v| v.downcast::<R>().ok()).map(|v| *v);
            let error = match (&value, error) {
                (_, Some(error)) => Some(error),
                (Some(_), None) => None,
                (None, None) => Some(missing_value::<R>()),
            };
            ResultSlot {
                index,
                value,
                error,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok<T: Any + Send>(value: T) -> Outcome {
        Outcome {
            value: Some(Box::new(value)),
            error: None,
        }
    }

    fn failed(message: &str) -> Outcome {
        Outcome::failed(UnitError::Failed(anyhow::anyhow!(message.to_string())))
    }

    fn partial<T: Any + Send>(value: T, message: &str) -> Outcome {
        Outcome {
            value: Some(Box::new(value)),
            error: Some(UnitError::Failed(anyhow::anyhow!(message.to_string()))),
        }
    }

    #[test]
    fn all_ok_folds_to_ok() {
        assert!(fold_errors(vec![ok(()), ok(())]).is_ok());
        assert!(fold_errors(Vec::new()).is_ok());
    }

    #[test]
    fn failures_keep_index_and_text() {
        let err = fold_errors(vec![failed("proxy"), ok(()), failed("data node")]).unwrap_err();

        assert_eq!(err.failed_indices(), vec![0, 2]);
        assert_eq!(
            err.to_string(),
            "2 of 3 units failed: [0] proxy; [2] data node"
        );
    }

    #[test]
    fn partial_outcome_fails_the_batch() {
        let err = fold_errors(vec![ok(()), partial((), "half applied")]).unwrap_err();
        assert_eq!(err.failed_indices(), vec![1]);
    }

    #[test]
    fn result_slots_preserve_order_and_partial_values() {
        let slots = fold_results::<u32>(vec![ok(0u32), ok(1u32), partial(2u32, "test")]);

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].value(), Some(&0));
        assert!(slots[0].is_ok());
        assert_eq!(slots[1].value(), Some(&1));
        assert_eq!(slots[2].value(), Some(&2));
        assert!(!slots[2].is_ok());
        assert_eq!(slots[2].error().map(ToString::to_string).as_deref(), Some("test"));
        assert_eq!(
            slots.iter().map(ResultSlot::index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn failed_outcome_has_no_value() {
        let mut slots = fold_results::<u32>(vec![failed("etcd down")]);
        let (value, error) = slots.remove(0).into_parts();

        assert!(value.is_none());
        assert_eq!(error.map(|e| e.to_string()).as_deref(), Some("etcd down"));
    }

    #[test]
    fn into_result_prefers_the_error() {
        let mut slots = fold_results::<u32>(vec![partial(7u32, "late"), ok(3u32)]);
        assert!(matches!(slots.remove(0).into_result(), Err(UnitError::Failed(_))));
        assert_eq!(slots.remove(0).into_result().ok(), Some(3));
    }

    #[test]
    fn unexpected_result_type_is_a_mismatch() {
        let slots = fold_results::<u32>(vec![ok("three")]);
        assert!(matches!(
            slots[0].error(),
            Some(UnitError::ArgumentMismatch { .. })
        ));
    }
}
