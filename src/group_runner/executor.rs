//! # Parallel Executor
//!
//! Spawns one tokio task per unit of work and joins all of them before returning.
//!
//! - No task is cancelled because a sibling failed; every unit runs to completion.
//! - Outcomes come back in input order. `join_all` over the handles, kept in input order, is
//!   the slot container: each task fills exactly its own position and nothing is read until
//!   the join completes.
//! - Units rejected by the validator occupy their slot with the rejection and spawn nothing.

use super::validator::{Adapter, Outcome};
use crate::config::GroupRunnerConfig;
use crate::context::ReconcileContext;
use crate::error::UnitError;
use crate::func::ArgValue;
use futures::future::join_all;
use std::any::Any;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, debug_span, trace, Instrument};
use uuid::Uuid;

/// One unit of work, already through validation
pub(crate) enum Unit {
    Ready { adapter: Adapter, args: Vec<ArgValue> },
    Rejected(UnitError),
}

impl Unit {
    pub(crate) fn ready(adapter: Adapter, args: Vec<ArgValue>) -> Self {
        Self::Ready { adapter, args }
    }

    pub(crate) fn from_validation(
        validated: Result<Adapter, UnitError>,
        args: impl FnOnce() -> Vec<ArgValue>,
    ) -> Self {
        match validated {
            Ok(adapter) => Self::ready(adapter, args()),
            Err(error) => Self::Rejected(error),
        }
    }
}

enum Pending {
    Spawned(JoinHandle<Outcome>),
    Rejected(UnitError),
}

/// Runs every unit concurrently and returns their outcomes in input order
pub(crate) async fn execute(
    units: Vec<Unit>,
    ctx: &ReconcileContext,
    config: &GroupRunnerConfig,
) -> Vec<Outcome> {
    if units.is_empty() {
        return Vec::new();
    }

    let batch_id = Uuid::new_v4();
    let span = debug_span!(
        "group_run",
        runner = %config.name,
        batch_id = %batch_id,
        units = units.len()
    );

    async move {
        let pending: Vec<Pending> = units
            .into_iter()
            .enumerate()
            .map(|(index, unit)| spawn_unit(index, unit, ctx))
            .collect();

        debug!(
            spawned = pending
                .iter()
                .filter(|p| matches!(p, Pending::Spawned(_)))
                .count(),
            "Dispatched group units"
        );

        let joined = join_all(pending.into_iter().map(|pending| async move {
            match pending {
                Pending::Spawned(handle) => handle.await,
                Pending::Rejected(error) => Ok(Outcome::failed(error)),
            }
        }))
        .await;

        let outcomes = settle(joined, config.capture_panics);

        debug!(
            failed = outcomes.iter().filter(|o| o.is_err()).count(),
            "Group units joined"
        );

        outcomes
    }
    .instrument(span)
    .await
}

fn spawn_unit(index: usize, unit: Unit, ctx: &ReconcileContext) -> Pending {
    match unit {
        Unit::Ready { adapter, args } => {
            let span = debug_span!("group_unit", index);
            let ctx = ctx.clone();
            Pending::Spawned(tokio::spawn(
                async move {
                    trace!("Unit started");
                    let outcome = adapter.invoke(ctx, args).await;
                    trace!(failed = outcome.is_err(), "Unit finished");
                    outcome
                }
                .instrument(span),
            ))
        }
        Unit::Rejected(error) => {
            trace!(index, error = %error, "Unit rejected before dispatch");
            Pending::Rejected(error)
        }
    }
}

/// Maps join failures onto unit errors. Panics are resumed on the caller, after every
/// unit has been joined, when panic capture is off.
fn settle(joined: Vec<Result<Outcome, JoinError>>, capture_panics: bool) -> Vec<Outcome> {
    let mut resumed = None;

    let outcomes = joined
        .into_iter()
        .map(|result| match result {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => {
                let payload = err.into_panic();
                let message = panic_message(payload.as_ref());
                if !capture_panics && resumed.is_none() {
                    resumed = Some(payload);
                }
                Outcome::failed(UnitError::Panicked { message })
            }
            Err(err) => Outcome::failed(UnitError::Aborted {
                message: err.to_string(),
            }),
        })
        .collect();

    if let Some(payload) = resumed {
        std::panic::resume_unwind(payload);
    }

    outcomes
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
