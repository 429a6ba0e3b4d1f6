//! # Signature Validator
//!
//! Checks a [`Func`] against what an entry point is about to bind to it and, on success,
//! hands back an [`Adapter`] that invokes it uniformly. Every mismatch is reported as a
//! [`UnitError`]; nothing is invoked and nothing panics.

use crate::context::ReconcileContext;
use crate::error::UnitError;
use crate::func::{ArgValue, ErasedFn, Func, Output, ParamType, Returned, Shape, Signature};
use std::sync::Arc;

/// Which entry point is validating, and therefore which shapes it accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryPoint {
    Uniform,
    WithResults,
    DiffArgs,
}

impl EntryPoint {
    fn accepts(self, shape: Shape) -> bool {
        match self {
            EntryPoint::Uniform => shape == Shape::Unary,
            EntryPoint::WithResults => matches!(shape, Shape::Unary | Shape::UnaryWithResult),
            EntryPoint::DiffArgs => matches!(shape, Shape::Unary | Shape::Variadic(_)),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            EntryPoint::Uniform => "(ctx, A) -> Result<()>",
            EntryPoint::WithResults => "(ctx, A) -> Result<R>",
            EntryPoint::DiffArgs => "(ctx, A1, .., An) -> Result<()>",
        }
    }
}

/// Normalized `(value, error)` pair of one unit. Rejections and panics carry no value.
pub(crate) struct Outcome {
    pub(crate) value: Option<Output>,
    pub(crate) error: Option<UnitError>,
}

impl Outcome {
    pub(crate) fn failed(error: UnitError) -> Self {
        Self {
            value: None,
            error: Some(error),
        }
    }

    pub(crate) fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

impl From<Returned> for Outcome {
    fn from(returned: Returned) -> Self {
        Self {
            value: returned.value,
            error: returned.error.map(UnitError::Failed),
        }
    }
}

/// Uniform invocation handle for a validated callable
#[derive(Clone)]
pub(crate) struct Adapter {
    signature: Arc<Signature>,
    call: Arc<ErasedFn>,
}

impl Adapter {
    pub(crate) fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Runs the callable and normalizes its outcome
    pub(crate) async fn invoke(self, ctx: ReconcileContext, args: Vec<ArgValue>) -> Outcome {
        match (self.call)(ctx, args) {
            Ok(fut) => fut.await.into(),
            Err(error) => Outcome::failed(error),
        }
    }
}

/// Callable-ness and shape only; used where arguments are checked later, per unit
pub(crate) fn validate_callable(func: &Func, entry: EntryPoint) -> Result<Adapter, UnitError> {
    let (signature, call) = func
        .parts()
        .map_err(UnitError::invalid_callable)?;

    let shape = signature.shape();
    if !entry.accepts(shape) {
        return Err(UnitError::invalid_callable(format!(
            "expected {}, found {}",
            entry.expected(),
            signature
        )));
    }

    Ok(Adapter { signature, call })
}

/// Arity and per-position parameter types
pub(crate) fn validate_args(signature: &Signature, args: &[ParamType]) -> Result<(), UnitError> {
    if signature.arity() != args.len() {
        return Err(UnitError::argument_mismatch(format!(
            "{signature} takes {} arguments, got {}",
            signature.arity(),
            args.len()
        )));
    }

    for (position, (param, arg)) in signature.params().iter().zip(args).enumerate() {
        if param != arg {
            return Err(UnitError::argument_mismatch(format!(
                "argument {position}: expected {param}, got {arg}"
            )));
        }
    }

    Ok(())
}

pub(crate) fn validate_output(signature: &Signature, output: ParamType) -> Result<(), UnitError> {
    if signature.output() == output {
        Ok(())
    } else {
        Err(UnitError::argument_mismatch(format!(
            "{signature} returns {}, expected {output}",
            signature.output()
        )))
    }
}

/// Full check for the shared-argument entry points
pub(crate) fn validate(
    func: &Func,
    entry: EntryPoint,
    args: &[ParamType],
    output: Option<ParamType>,
) -> Result<Adapter, UnitError> {
    let adapter = validate_callable(func, entry)?;
    validate_args(adapter.signature(), args)?;
    if let Some(output) = output {
        validate_output(adapter.signature(), output)?;
    }
    Ok(adapter)
}
