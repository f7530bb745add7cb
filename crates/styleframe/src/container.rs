//! A value paired with its style handle

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Rem, Sub};

use crate::error::{Result, StyleFrameError};
use crate::styler::{StyleRef, Styler};
use crate::value::{ArithOp, Value};

/// One styled cell, header or index label
///
/// Equality, ordering and hashing look at the value only.
#[derive(Debug, Clone)]
pub struct Container {
    pub value: Value,
    pub style: StyleRef,
}

impl Container {
    /// Wrap a value with the default style for its kind
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        let style = Self::inferred_style(&value);
        Self {
            value,
            style: StyleRef::new(style),
        }
    }

    /// Wrap a value with its own copy of `style`
    pub fn with_style(value: impl Into<Value>, style: Styler) -> Self {
        Self {
            value: value.into(),
            style: StyleRef::new(style),
        }
    }

    /// The default style with the number format matching the value kind
    pub fn inferred_style(value: &Value) -> Styler {
        let style = Styler::default();
        let format = style.format_for(value.temporal_kind()).to_string();
        style.with_number_format(format)
    }

    /// Copy with a style handle of its own
    pub fn deep_clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            style: self.style.deep_clone(),
        }
    }

    /// Apply `op` to the values; the result gets an inferred style
    pub fn apply(&self, op: ArithOp, other: impl Into<Value>) -> Result<Container> {
        self.value.apply(op, &other.into()).map(Container::new)
    }

    pub fn floor_div(&self, other: impl Into<Value>) -> Result<Container> {
        self.apply(ArithOp::FloorDiv, other)
    }

    pub fn pow(&self, other: impl Into<Value>) -> Result<Container> {
        self.apply(ArithOp::Pow, other)
    }

    /// Text length; other kinds have no length
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Result<usize> {
        self.value.len()
    }

    pub fn is_truthy(&self) -> bool {
        self.value.is_truthy()
    }
}

impl From<Value> for Container {
    fn from(value: Value) -> Self {
        Container::new(value)
    }
}

impl From<&Container> for Value {
    fn from(c: &Container) -> Self {
        c.value.clone()
    }
}

impl From<Container> for Value {
    fn from(c: Container) -> Self {
        c.value
    }
}

macro_rules! impl_arith {
    ($($trait:ident :: $method:ident => $op:ident),* $(,)?) => {
        $(
            impl<T: Into<Value>> $trait<T> for &Container {
                type Output = Result<Container>;

                fn $method(self, other: T) -> Result<Container> {
                    self.apply(ArithOp::$op, other)
                }
            }

            impl<T: Into<Value>> $trait<T> for Container {
                type Output = Result<Container>;

                fn $method(self, other: T) -> Result<Container> {
                    self.apply(ArithOp::$op, other)
                }
            }
        )*
    };
}

impl_arith! {
    Add::add => Add,
    Sub::sub => Sub,
    Mul::mul => Mul,
    Div::div => Div,
    Rem::rem => Rem,
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for Container {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

macro_rules! impl_cmp_with {
    ($($t:ty),*) => {
        $(
            impl PartialEq<$t> for Container {
                fn eq(&self, other: &$t) -> bool {
                    self.value == Value::from(other.clone())
                }
            }

            impl PartialOrd<$t> for Container {
                fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                    self.value.partial_cmp(&Value::from(other.clone()))
                }
            }
        )*
    };
}

impl_cmp_with!(Value, i64, f64, &str);

impl Hash for Container {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl TryFrom<&Container> for i64 {
    type Error = StyleFrameError;

    fn try_from(c: &Container) -> Result<i64> {
        i64::try_from(&c.value)
    }
}

impl TryFrom<&Container> for f64 {
    type Error = StyleFrameError;

    fn try_from(c: &Container) -> Result<f64> {
        f64::try_from(&c.value)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
