//! # Callables
//!
//! [`Func`] is the type-erased unit of work a group runner dispatches. Typed closures are
//! converted once, at the call boundary, through one named constructor per supported shape:
//!
//! | Constructor | Shape |
//! |---|---|
//! | [`Func::unary`] | `(ctx, A) -> anyhow::Result<()>` |
//! | [`Func::with_result`] | `(ctx, A) -> anyhow::Result<R>` |
//! | [`Func::with_outcome`] | `(ctx, A) -> (R, Option<anyhow::Error>)` |
//! | [`Func::variadic`] | `(ctx, A1, .., An) -> anyhow::Result<()>`, `2 <= n <= 6` |
//!
//! Each `Func` remembers its [`Signature`] so a runner can check it against the arguments it
//! is about to bind. Arbitrary values can be turned into a `Func` with [`Func::from_value`];
//! anything that is not already a `Func` becomes a not-callable placeholder that fails
//! validation instead of crashing the batch. That includes bare closures: they only become
//! callable through one of the constructors above.

mod args;
mod signature;

pub use args::{ArgValue, Args};
pub use signature::{ParamType, Shape, Signature};

use crate::context::ReconcileContext;
use crate::error::UnitError;
use futures::future::BoxFuture;
use std::any::{type_name, Any};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Boxed result value of a unit, `()` for error-only shapes
pub(crate) type Output = Box<dyn Any + Send>;

/// What an erased call resolves to. A failing unit may still hand back a value.
pub(crate) struct Returned {
    pub(crate) value: Option<Output>,
    pub(crate) error: Option<anyhow::Error>,
}

impl Returned {
    fn from_result(result: anyhow::Result<Output>) -> Self {
        match result {
            Ok(value) => Self {
                value: Some(value),
                error: None,
            },
            Err(error) => Self {
                value: None,
                error: Some(error),
            },
        }
    }
}

pub(crate) type UnitFuture = BoxFuture<'static, Returned>;

pub(crate) type ErasedFn =
    dyn Fn(ReconcileContext, Vec<ArgValue>) -> Result<UnitFuture, UnitError> + Send + Sync;

/// Type-erased callable (or a value that turned out not to be one)
#[derive(Clone)]
pub struct Func {
    kind: FuncKind,
}

#[derive(Clone)]
enum FuncKind {
    Callable {
        signature: Arc<Signature>,
        call: Arc<ErasedFn>,
    },
    NotCallable {
        type_name: &'static str,
    },
}

impl Func {
    /// `(ctx, A) -> anyhow::Result<()>`
    pub fn unary<F, Fut, A>(f: F) -> Self
    where
        F: Fn(ReconcileContext, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
        A: Any + Send,
    {
        Self::with_result(f)
    }

    /// `(ctx, A) -> anyhow::Result<R>`. A failed call leaves the slot without a value.
    pub fn with_result<F, Fut, A, R>(f: F) -> Self
    where
        F: Fn(ReconcileContext, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        A: Any + Send,
        R: Any + Send,
    {
        let signature = Signature::new(vec![ParamType::of::<A>()], ParamType::of::<R>());
        let call = move |ctx: ReconcileContext, args: Vec<ArgValue>| -> Result<UnitFuture, UnitError> {
            check_arity(args.len(), 1)?;
            let mut args = args.into_iter().enumerate();
            let arg = next_arg::<A>(&mut args)?;
            let fut = f(ctx, arg);
            Ok(Box::pin(async move {
                Returned::from_result(fut.await.map(|value| Box::new(value) as Output))
            }))
        };
        Self::callable(signature, Arc::new(call))
    }

    /// `(ctx, A) -> (R, Option<anyhow::Error>)`. The value is kept even when the error is set.
    pub fn with_outcome<F, Fut, A, R>(f: F) -> Self
    where
        F: Fn(ReconcileContext, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = (R, Option<anyhow::Error>)> + Send + 'static,
        A: Any + Send,
        R: Any + Send,
    {
        let signature = Signature::new(vec![ParamType::of::<A>()], ParamType::of::<R>());
        let call = move |ctx: ReconcileContext, args: Vec<ArgValue>| -> Result<UnitFuture, UnitError> {
            check_arity(args.len(), 1)?;
            let mut args = args.into_iter().enumerate();
            let arg = next_arg::<A>(&mut args)?;
            let fut = f(ctx, arg);
            Ok(Box::pin(async move {
                let (value, error) = fut.await;
                Returned {
                    value: Some(Box::new(value) as Output),
                    error,
                }
            }))
        };
        Self::callable(signature, Arc::new(call))
    }

    /// `(ctx, A1, .., An) -> anyhow::Result<()>`
    pub fn variadic<M, F>(f: F) -> Self
    where
        F: VariadicFn<M>,
    {
        f.into_func()
    }

    /// Wraps an opaque value. A `Func` passes through untouched; anything else is not callable.
    ///
    /// Closures are opaque here too. Wrap them with [`Func::unary`], [`Func::with_result`],
    /// [`Func::with_outcome`] or [`Func::variadic`] instead.
    pub fn from_value<T: Any + Send + Sync>(value: T) -> Self {
        let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
        match boxed.downcast::<Func>() {
            Ok(func) => *func,
            Err(_) => Self {
                kind: FuncKind::NotCallable {
                    type_name: type_name::<T>(),
                },
            },
        }
    }

    fn callable(signature: Signature, call: Arc<ErasedFn>) -> Self {
        Self {
            kind: FuncKind::Callable {
                signature: Arc::new(signature),
                call,
            },
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, FuncKind::Callable { .. })
    }

    /// Declared signature, `None` for a not-callable value
    pub fn signature(&self) -> Option<&Signature> {
        match &self.kind {
            FuncKind::Callable { signature, .. } => Some(signature),
            FuncKind::NotCallable { .. } => None,
        }
    }

    /// Signature and erased call, or why the value cannot be called
    pub(crate) fn parts(&self) -> Result<(Arc<Signature>, Arc<ErasedFn>), String> {
        match &self.kind {
            FuncKind::Callable { signature, call } => Ok((Arc::clone(signature), Arc::clone(call))),
            FuncKind::NotCallable { type_name } => Err(not_callable_reason(type_name)),
        }
    }
}

fn not_callable_reason(type_name: &str) -> String {
    if type_name.contains("{{closure}}") {
        format!(
            "{type_name} is a bare closure; wrap it with Func::unary, Func::with_result, \
             Func::with_outcome or Func::variadic"
        )
    } else {
        format!("{type_name} is not callable")
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FuncKind::Callable { signature, .. } => write!(f, "Func{signature}"),
            FuncKind::NotCallable { type_name } => write!(f, "NotCallable<{type_name}>"),
        }
    }
}

/// Closures accepted by [`Func::variadic`]. `M` is the parameter tuple and only guides inference.
pub trait VariadicFn<M>: Send + Sync + 'static {
    fn into_func(self) -> Func;
}

macro_rules! impl_variadic_fn {
    ($arity:literal; $($ty:ident => $var:ident),+) => {
        impl<F, Fut, $($ty,)+> VariadicFn<($($ty,)+)> for F
        where
            F: Fn(ReconcileContext, $($ty),+) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
            $($ty: Any + Send,)+
        {
            fn into_func(self) -> Func {
                let signature = Signature::new(
                    vec![$(ParamType::of::<$ty>()),+],
                    ParamType::of::<()>(),
                );
                let f = self;
                let call = move |ctx: ReconcileContext, args: Vec<ArgValue>| -> Result<UnitFuture, UnitError> {
                    check_arity(args.len(), $arity)?;
                    let mut args = args.into_iter().enumerate();
                    $(let $var = next_arg::<$ty>(&mut args)?;)+
                    let fut = f(ctx, $($var),+);
                    Ok(Box::pin(async move {
                        Returned::from_result(fut.await.map(|()| Box::new(()) as Output))
                    }))
                };
                Func::callable(signature, Arc::new(call))
            }
        }
    };
}

impl_variadic_fn!(2; A1 => a1, A2 => a2);
impl_variadic_fn!(3; A1 => a1, A2 => a2, A3 => a3);
impl_variadic_fn!(4; A1 => a1, A2 => a2, A3 => a3, A4 => a4);
impl_variadic_fn!(5; A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5);
impl_variadic_fn!(6; A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5, A6 => a6);

fn check_arity(got: usize, expected: usize) -> Result<(), UnitError> {
    if got == expected {
        Ok(())
    } else {
        Err(UnitError::argument_mismatch(format!(
            "expected {expected} arguments, got {got}"
        )))
    }
}

fn next_arg<T: Any>(
    args: &mut impl Iterator<Item = (usize, ArgValue)>,
) -> Result<T, UnitError> {
    let (position, arg) = args
        .next()
        .ok_or_else(|| UnitError::argument_mismatch("missing argument"))?;
    arg.downcast::<T>().map_err(|found| {
        UnitError::argument_mismatch(format!(
            "argument {position}: expected {}, got {found}",
            type_name::<T>()
        ))
    })
}
