//! Declared parameter/result types of a callable and the shape they form.

use std::any::{type_name, Any, TypeId};
use std::fmt;

/// Runtime identity of one parameter or result type
#[derive(Debug, Clone, Copy)]
pub struct ParamType {
    id: TypeId,
    name: &'static str,
}

impl ParamType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_unit(&self) -> bool {
        self.id == TypeId::of::<()>()
    }
}

impl PartialEq for ParamType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ParamType {}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Supported callable shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `(ctx, A) -> Result<()>`
    Unary,
    /// `(ctx, A) -> Result<R>` or `(ctx, A) -> (R, Option<Error>)`
    UnaryWithResult,
    /// `(ctx, A1, .., An) -> Result<()>`, `n >= 2`
    Variadic(usize),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Unary => f.write_str("(ctx, A) -> Result<()>"),
            Shape::UnaryWithResult => f.write_str("(ctx, A) -> Result<R>"),
            Shape::Variadic(arity) => write!(f, "(ctx, A1..A{arity}) -> Result<()>"),
        }
    }
}

/// Parameters (after the leading context) and result type of a callable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<ParamType>,
    output: ParamType,
}

impl Signature {
    pub fn new(params: Vec<ParamType>, output: ParamType) -> Self {
        Self { params, output }
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub fn output(&self) -> ParamType {
        self.output
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn shape(&self) -> Shape {
        match (self.params.len(), self.output.is_unit()) {
            (1, true) => Shape::Unary,
            (1, false) => Shape::UnaryWithResult,
            (arity, _) => Shape::Variadic(arity),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(ctx")?;
        for param in &self.params {
            write!(f, ", {param}")?;
        }
        write!(f, ") -> Result<{}>", self.output)
    }
}
