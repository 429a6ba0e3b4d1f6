//! # Group Runner
//!
//! Runs a batch of independent reconciliation steps concurrently, joins them, and reports
//! either one aggregate error or an ordered list of per-step results.
//!
//! Each call goes validator → executor → aggregator:
//! - `validator` rejects callables that do not fit the entry point, per unit, without panicking
//! - `executor` spawns one task per unit and waits for all of them
//! - `aggregator` folds the outcomes, preserving input order
//!
//! The runner is stateless, so one instance can serve unrelated calls concurrently.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reconcile_group::{default_group_runner, Func, GroupRunner, ReconcileContext};
//!
//! #[derive(Clone)]
//! struct Cluster {
//!     name: String,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let steps = vec![
//!     Func::unary(|_ctx: ReconcileContext, cluster: Cluster| async move {
//!         println!("reconcile etcd for {}", cluster.name);
//!         Ok(())
//!     }),
//!     Func::unary(|_ctx: ReconcileContext, cluster: Cluster| async move {
//!         println!("reconcile storage for {}", cluster.name);
//!         Ok(())
//!     }),
//! ];
//!
//! let cluster = Cluster { name: "demo".to_string() };
//! default_group_runner()
//!     .run(&steps, &ReconcileContext::background(), cluster)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod aggregator;
mod executor;
mod validator;

pub use aggregator::ResultSlot;

use crate::config::GroupRunnerConfig;
use crate::context::ReconcileContext;
use crate::error::{GroupResult, GroupRunnerError};
use crate::func::{ArgValue, Args, Func, ParamType};
use async_trait::async_trait;
use executor::Unit;
use std::any::Any;
use std::sync::OnceLock;
use tracing::{debug, instrument};
use validator::EntryPoint;

/// Parallel invocation of reconciliation steps.
///
/// [`ParallelGroupRunner`] is the production implementation; controllers that take the trait
/// can be handed a stub in tests.
#[async_trait]
pub trait GroupRunner: Send + Sync {
    /// Runs every `(ctx, A) -> Result<()>` func with a clone of `arg`.
    ///
    /// Returns `Ok(())` iff every func succeeded. An empty batch spawns nothing.
    async fn run<A>(&self, funcs: &[Func], ctx: &ReconcileContext, arg: A) -> GroupResult<()>
    where
        A: Any + Clone + Send + Sync;

    /// Runs every `(ctx, A) -> Result<R>` or `(ctx, A) -> (R, Option<Error>)` func with a clone
    /// of `arg` and returns one slot per func, in input order. Invalid funcs fail in their own
    /// slot only.
    async fn run_with_results<A, R>(
        &self,
        funcs: &[Func],
        ctx: &ReconcileContext,
        arg: A,
    ) -> Vec<ResultSlot<R>>
    where
        A: Any + Clone + Send + Sync,
        R: Any + Send;

    /// Runs `func` once per argument tuple.
    ///
    /// A func that is not callable, or whose shape is not `(ctx, A1, .., An) -> Result<()>`,
    /// is rejected before anything is spawned. A tuple whose arity or types do not match
    /// fails as its own unit.
    async fn run_diff_args(
        &self,
        func: &Func,
        ctx: &ReconcileContext,
        args: Vec<Args>,
    ) -> GroupResult<()>;
}

/// Spawns one tokio task per unit; never short-circuits on failure.
#[derive(Debug, Clone, Default)]
pub struct ParallelGroupRunner {
    config: GroupRunnerConfig,
}

impl ParallelGroupRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GroupRunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GroupRunnerConfig {
        &self.config
    }
}

#[async_trait]
impl GroupRunner for ParallelGroupRunner {
    #[instrument(skip_all, fields(runner = %self.config.name, funcs = funcs.len()))]
    async fn run<A>(&self, funcs: &[Func], ctx: &ReconcileContext, arg: A) -> GroupResult<()>
    where
        A: Any + Clone + Send + Sync,
    {
        if funcs.is_empty() {
            return Ok(());
        }

        let params = [ParamType::of::<A>()];
        let units = funcs
            .iter()
            .map(|func| {
                Unit::from_validation(
                    validator::validate(func, EntryPoint::Uniform, &params, None),
                    || vec![ArgValue::new(arg.clone())],
                )
            })
            .collect();

        let outcomes = executor::execute(units, ctx, &self.config).await;
        aggregator::fold_errors(outcomes)
    }

    #[instrument(skip_all, fields(runner = %self.config.name, funcs = funcs.len()))]
    async fn run_with_results<A, R>(
        &self,
        funcs: &[Func],
        ctx: &ReconcileContext,
        arg: A,
    ) -> Vec<ResultSlot<R>>
    where
        A: Any + Clone + Send + Sync,
        R: Any + Send,
    {
        if funcs.is_empty() {
            return Vec::new();
        }

        let params = [ParamType::of::<A>()];
        let output = ParamType::of::<R>();
        let units = funcs
            .iter()
            .map(|func| {
                Unit::from_validation(
                    validator::validate(func, EntryPoint::WithResults, &params, Some(output)),
                    || vec![ArgValue::new(arg.clone())],
                )
            })
            .collect();

        let outcomes = executor::execute(units, ctx, &self.config).await;
        aggregator::fold_results(outcomes)
    }

    #[instrument(skip_all, fields(runner = %self.config.name, tuples = args.len()))]
    async fn run_diff_args(
        &self,
        func: &Func,
        ctx: &ReconcileContext,
        args: Vec<Args>,
    ) -> GroupResult<()> {
        let adapter = validator::validate_callable(func, EntryPoint::DiffArgs).map_err(|error| {
            debug!(error = %error, "Rejected callable before dispatch");
            GroupRunnerError::rejected(error)
        })?;

        if args.is_empty() {
            return Ok(());
        }

        let units = args
            .into_iter()
            .map(|tuple| match validator::validate_args(adapter.signature(), &tuple.types()) {
                Ok(()) => Unit::ready(adapter.clone(), tuple.into_values()),
                Err(error) => Unit::Rejected(error),
            })
            .collect();

        let outcomes = executor::execute(units, ctx, &self.config).await;
        aggregator::fold_errors(outcomes)
    }
}

static DEFAULT_GROUP_RUNNER: OnceLock<ParallelGroupRunner> = OnceLock::new();

/// Process-wide runner with default configuration
pub fn default_group_runner() -> &'static ParallelGroupRunner {
    DEFAULT_GROUP_RUNNER.get_or_init(ParallelGroupRunner::new)
}
