//! Type-erased argument tuples for repeated-callable batches.

use super::signature::ParamType;
use std::any::Any;
use std::fmt;

/// One positional argument, boxed together with its type identity
pub struct ArgValue {
    value: Box<dyn Any + Send>,
    ty: ParamType,
}

impl ArgValue {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            value: Box::new(value),
            ty: ParamType::of::<T>(),
        }
    }

    pub fn param_type(&self) -> ParamType {
        self.ty
    }

    /// Unboxes the value, handing back the actual type name on mismatch
    pub fn downcast<T: Any>(self) -> Result<T, &'static str> {
        let Self { value, ty } = self;
        value.downcast::<T>().map(|v| *v).map_err(|_| ty.name())
    }
}

impl fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgValue<{}>", self.ty)
    }
}

/// Ordered, fixed-arity argument tuple bound positionally after the context
#[derive(Debug, Default)]
pub struct Args {
    values: Vec<ArgValue>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Any + Send>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    pub fn push<T: Any + Send>(&mut self, value: T) {
        self.values.push(ArgValue::new(value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn types(&self) -> Vec<ParamType> {
        self.values.iter().map(ArgValue::param_type).collect()
    }

    pub(crate) fn into_values(self) -> Vec<ArgValue> {
        self.values
    }
}

impl From<Vec<ArgValue>> for Args {
    fn from(values: Vec<ArgValue>) -> Self {
        Self { values }
    }
}

/// Builds an [`Args`] tuple from a list of values.
///
/// ```
/// use reconcile_group::args;
///
/// let tuple = args![0usize, 4i32];
/// assert_eq!(tuple.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::func::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::func::Args::new()$(.with($value))+
    };
}
