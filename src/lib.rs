#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Reconcile Group
//!
//! Parallel invocation of independent reconciliation steps for cluster controllers.
//!
//! ## Overview
//!
//! A controller bringing up a deployed system often has several sub-reconciliations that do
//! not depend on each other: etcd, storage, proxies, data nodes. This crate runs such a batch
//! concurrently against one shared target (or once per argument tuple), waits for all of it,
//! and reports either one aggregate error or an ordered list of per-step results.
//!
//! ## Key Properties
//!
//! - **No short-circuit**: a failing step never cancels its siblings; every step runs to completion
//! - **Input order**: results are reported by input position, whatever order steps finish in
//! - **No crashes on bad input**: non-callables and mismatched arguments become errors for that step
//! - **Cooperative cancellation**: every step receives the caller's [`ReconcileContext`]
//! - **Stateless**: one runner serves any number of concurrent, unrelated calls
//!
//! ## Module Organization
//!
//! - [`group_runner`] - The [`GroupRunner`] entry points and [`ParallelGroupRunner`]
//! - [`func`] - Type-erased callables and argument tuples
//! - [`context`] - Cancellation/deadline context
//! - [`error`] - Unit and aggregate errors
//! - [`config`] - Runner configuration
//! - [`logging`] - Console tracing setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reconcile_group::{args, default_group_runner, Func, GroupRunner, ReconcileContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scale = Func::variadic(|_ctx: ReconcileContext, component: String, replicas: u32| async move {
//!     println!("scaling {component} to {replicas}");
//!     Ok(())
//! });
//!
//! default_group_runner()
//!     .run_diff_args(
//!         &scale,
//!         &ReconcileContext::background(),
//!         vec![args!["proxy".to_string(), 2u32], args!["datanode".to_string(), 3u32]],
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod func;
pub mod group_runner;
pub mod logging;

pub use config::{GroupRunnerConfig, ENV_PREFIX};
pub use context::ReconcileContext;
pub use error::{ConfigurationError, GroupResult, GroupRunnerError, UnitError, UnitFailure};
pub use func::{ArgValue, Args, Func, ParamType, Shape, Signature, VariadicFn};
pub use group_runner::{default_group_runner, GroupRunner, ParallelGroupRunner, ResultSlot};
