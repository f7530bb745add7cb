//! Data values held by styled cells
//!
//! [`Value`] is the closed set of value kinds a frame can hold. Each kind maps
//! to a default number format: dates, times and date-times pick the matching
//! format of their style, everything else keeps the style's own format.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};
use styleframe_core::{date, CellValue, NumberFormat, TemporalKind};

use crate::error::{Result, StyleFrameError};

/// A cell, header or index value
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Missing value
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

/// Arithmetic operators supported on values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Rem,
    Pow,
}

impl ArithOp {
    fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::FloorDiv => "//",
            ArithOp::Rem => "%",
            ArithOp::Pow => "**",
        }
    }
}

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

/// 2^63, the first float past `i64::MAX`
const I64_END: f64 = 9_223_372_036_854_775_808.0;

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    /// Exact ordering, without rounding integers through `f64`
    fn compare(self, other: Num) -> Option<Ordering> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
            (Num::Float(a), Num::Float(b)) => a.partial_cmp(&b),
            (Num::Int(i), Num::Float(f)) => cmp_int_float(i, f),
            (Num::Float(f), Num::Int(i)) => cmp_int_float(i, f).map(Ordering::reverse),
        }
    }
}

fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= I64_END {
        return Some(Ordering::Less);
    }
    if f < -I64_END {
        return Some(Ordering::Greater);
    }
    let floor = f.floor();
    match i.cmp(&(floor as i64)) {
        Ordering::Equal if f > floor => Some(Ordering::Less),
        ord => Some(ord),
    }
}

impl Value {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// Null, or a float NaN
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Name of the value kind, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
        }
    }

    /// Which type-specific number format this value defaults to
    pub fn temporal_kind(&self) -> Option<TemporalKind> {
        match self {
            Value::Date(_) => Some(TemporalKind::Date),
            Value::Time(_) => Some(TemporalKind::Time),
            Value::DateTime(_) => Some(TemporalKind::DateTime),
            _ => None,
        }
    }

    /// Get as text, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a float, if this is numeric
    pub fn as_f64(&self) -> Option<f64> {
        self.num().map(Num::as_f64)
    }

    fn num(&self) -> Option<Num> {
        match self {
            Value::Bool(b) => Some(Num::Int(*b as i64)),
            Value::Int(i) => Some(Num::Int(*i)),
            Value::Float(f) => Some(Num::Float(*f)),
            _ => None,
        }
    }

    /// Truthiness: zero, empty text and null are false
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::Date(_) | Value::Time(_) | Value::DateTime(_) => true,
        }
    }

    /// Character count of a text value
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Result<usize> {
        match self {
            Value::Text(s) => Ok(s.chars().count()),
            other => Err(StyleFrameError::invalid_type(format!(
                "object of type '{}' has no len()",
                other.type_name()
            ))),
        }
    }

    /// Apply an arithmetic operator
    ///
    /// Integers stay integers except for `/`, which always yields a float.
    /// Floor division and remainder round toward negative infinity.
    pub fn apply(&self, op: ArithOp, other: &Value) -> Result<Value> {
        if let (ArithOp::Add, Value::Text(a), Value::Text(b)) = (op, self, other) {
            return Ok(Value::Text(format!("{a}{b}")));
        }
        let (a, b) = match (self.num(), other.num()) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(StyleFrameError::invalid_type(format!(
                    "unsupported operand types for {}: '{}' and '{}'",
                    op.symbol(),
                    self.type_name(),
                    other.type_name()
                )))
            }
        };
        match (a, b) {
            (Num::Int(x), Num::Int(y)) => int_op(op, x, y),
            _ => float_op(op, a.as_f64(), b.as_f64()),
        }
    }

    /// Value to write into a native cell; nulls become `na_rep`
    pub fn to_cell_value(&self, na_rep: &str) -> CellValue {
        match self {
            v if v.is_null() => {
                if na_rep.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::string(na_rep)
                }
            }
            Value::Bool(b) => CellValue::Boolean(*b),
            Value::Int(i) => CellValue::Number(*i as f64),
            Value::Float(f) => CellValue::Number(*f),
            Value::Text(s) if s.starts_with('=') => CellValue::formula(s.as_str()),
            Value::Text(s) => CellValue::string(s.as_str()),
            Value::Date(d) => CellValue::Number(date::date_to_serial(*d)),
            Value::Time(t) => CellValue::Number(date::time_to_serial(*t)),
            Value::DateTime(dt) => CellValue::Number(date::datetime_to_serial(*dt)),
            Value::Null => CellValue::Empty,
        }
    }

    /// Value read back from a native cell
    ///
    /// Numbers under a date or time format come back as temporal values;
    /// whole numbers come back as integers.
    pub fn from_cell_value(cell: &CellValue, format: &NumberFormat) -> Value {
        match cell {
            CellValue::Empty => Value::Null,
            CellValue::Boolean(b) => Value::Bool(*b),
            CellValue::String(s) => Value::Text(s.clone()),
            CellValue::Formula(f) => Value::Text(format!("={f}")),
            CellValue::Number(n) => {
                let temporal = match format.temporal_kind() {
                    Some(TemporalKind::Date) => date::serial_to_date(*n).map(Value::Date),
                    Some(TemporalKind::Time) => date::serial_to_time(*n).map(Value::Time),
                    Some(TemporalKind::DateTime) => {
                        date::serial_to_datetime(*n).map(Value::DateTime)
                    }
                    None => None,
                };
                temporal.unwrap_or_else(|| number_value(*n))
            }
        }
    }
}

fn number_value(n: f64) -> Value {
    // 2^53: beyond this floats no longer hold every integer
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::Int(n as i64)
    } else {
        Value::Float(n)
    }
}

fn division_by_zero() -> StyleFrameError {
    StyleFrameError::invalid_value("division by zero")
}

fn int_op(op: ArithOp, x: i64, y: i64) -> Result<Value> {
    let checked = match op {
        ArithOp::Add => x.checked_add(y),
        ArithOp::Sub => x.checked_sub(y),
        ArithOp::Mul => x.checked_mul(y),
        ArithOp::Div => {
            if y == 0 {
                return Err(division_by_zero());
            }
            return Ok(Value::Float(x as f64 / y as f64));
        }
        ArithOp::FloorDiv => {
            if y == 0 {
                return Err(division_by_zero());
            }
            x.checked_div(y).map(|q| {
                if x % y != 0 && ((x < 0) != (y < 0)) {
                    q - 1
                } else {
                    q
                }
            })
        }
        ArithOp::Rem => {
            if y == 0 {
                return Err(division_by_zero());
            }
            x.checked_rem(y)
                .map(|r| if r != 0 && ((r < 0) != (y < 0)) { r + y } else { r })
        }
        ArithOp::Pow => {
            if y < 0 {
                return float_op(op, x as f64, y as f64);
            }
            u32::try_from(y).ok().and_then(|e| x.checked_pow(e))
        }
    };
    match checked {
        Some(v) => Ok(Value::Int(v)),
        // Overflow falls back to float arithmetic
        None => float_op(op, x as f64, y as f64),
    }
}

fn float_op(op: ArithOp, x: f64, y: f64) -> Result<Value> {
    let v = match op {
        ArithOp::Add => x + y,
        ArithOp::Sub => x - y,
        ArithOp::Mul => x * y,
        ArithOp::Div | ArithOp::FloorDiv | ArithOp::Rem if y == 0.0 => {
            return Err(division_by_zero())
        }
        ArithOp::Div => x / y,
        ArithOp::FloorDiv => (x / y).floor(),
        ArithOp::Rem => {
            let r = x % y;
            if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
                r + y
            } else {
                r
            }
        }
        ArithOp::Pow => {
            if x == 0.0 && y < 0.0 {
                return Err(division_by_zero());
            }
            x.powf(y)
        }
    };
    Ok(Value::Float(v))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            _ => match (self.num(), other.num()) {
                (Some(a), Some(b)) => a.compare(b) == Some(Ordering::Equal),
                _ => false,
            },
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
            (Value::Date(a), Value::Date(b)) => a.partial_cmp(b),
            (Value::Time(a), Value::Time(b)) => a.partial_cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.partial_cmp(b),
            _ => match (self.num(), other.num()) {
                (Some(a), Some(b)) => a.compare(b),
                _ => None,
            },
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
            Value::Date(d) => {
                2u8.hash(state);
                d.hash(state);
            }
            Value::Time(t) => {
                3u8.hash(state);
                t.hash(state);
            }
            Value::DateTime(dt) => {
                4u8.hash(state);
                dt.hash(state);
            }
            // Equal numbers hash alike whatever their kind
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => match self.num() {
                Some(Num::Int(i)) => {
                    5u8.hash(state);
                    i.hash(state);
                }
                Some(Num::Float(f)) if f.fract() == 0.0 && (-I64_END..I64_END).contains(&f) => {
                    5u8.hash(state);
                    (f as i64).hash(state);
                }
                Some(Num::Float(f)) => {
                    6u8.hash(state);
                    f.to_bits().hash(state);
                }
                None => {}
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl TryFrom<&Value> for i64 {
    type Error = StyleFrameError;

    fn try_from(value: &Value) -> Result<i64> {
        match value {
            Value::Bool(b) => Ok(*b as i64),
            Value::Int(i) => Ok(*i),
            Value::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
            Value::Text(s) => s.trim().parse().map_err(|_| {
                StyleFrameError::invalid_value(format!("invalid literal for int(): '{s}'"))
            }),
            other => Err(StyleFrameError::invalid_type(format!(
                "cannot convert {} to int",
                other.type_name()
            ))),
        }
    }
}

impl TryFrom<&Value> for f64 {
    type Error = StyleFrameError;

    fn try_from(value: &Value) -> Result<f64> {
        match value {
            Value::Text(s) => s.trim().parse().map_err(|_| {
                StyleFrameError::invalid_value(format!(
                    "could not convert string to float: '{s}'"
                ))
            }),
            other => other.as_f64().ok_or_else(|| {
                StyleFrameError::invalid_type(format!(
                    "cannot convert {} to float",
                    other.type_name()
                ))
            }),
        }
    }
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v $(as $cast)?)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i64 => Int,
    i32 => Int as i64,
    u32 => Int as i64,
    f64 => Float,
    f32 => Float as f64,
    String => Text,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or(Value::Float(v as f64), Value::Int)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::from(&v)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality_across_kinds() {
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Bool(true), Value::Int(1));
        assert_ne!(Value::Int(1), Value::text("1"));
        assert_eq!(Value::Null, Value::Null);
        assert!(Value::Int(1) < Value::Float(1.5));
        assert!(Value::text("a") < Value::text("b"));
        assert_eq!(Value::text("a").partial_cmp(&Value::Int(1)), None);
    }

    #[test]
    fn test_equal_numbers_hash_alike() {
        use std::collections::hash_map::DefaultHasher;
        let hash = |v: &Value| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&Value::Int(3)), hash(&Value::Float(3.0)));
        assert_eq!(hash(&Value::Float(0.0)), hash(&Value::Float(-0.0)));

        // past 2^53 an integer no longer rounds onto a float
        let big = 1i64 << 53;
        assert_ne!(Value::Int(big + 1), Value::Float(big as f64));
        assert!(Value::Int(big + 1) > Value::Float(big as f64));
        assert_eq!(Value::Int(big), Value::Float(big as f64));
        assert_eq!(hash(&Value::Int(big)), hash(&Value::Float(big as f64)));
        assert!(Value::Int(i64::MAX) < Value::Float(I64_END));
        assert!(Value::Int(2) > Value::Float(1.5));
        assert!(Value::Float(-1.5) < Value::Int(-1));
        assert_ne!(hash(&Value::Int(3)), hash(&Value::text("3")));
    }

    #[test]
    fn test_arithmetic() {
        let add = Value::Int(2).apply(ArithOp::Add, &Value::Int(3)).unwrap();
        assert!(matches!(add, Value::Int(5)));
        let div = Value::Int(7).apply(ArithOp::Div, &Value::Int(2)).unwrap();
        assert!(matches!(div, Value::Float(f) if f == 3.5));
        assert_eq!(
            Value::Int(-7).apply(ArithOp::FloorDiv, &Value::Int(2)).unwrap(),
            Value::Int(-4)
        );
        assert_eq!(
            Value::Int(-7).apply(ArithOp::Rem, &Value::Int(3)).unwrap(),
            Value::Int(2)
        );
        assert_eq!(
            Value::Float(-7.5).apply(ArithOp::Rem, &Value::Int(2)).unwrap(),
            Value::Float(0.5)
        );
        assert_eq!(
            Value::Int(2).apply(ArithOp::Pow, &Value::Int(10)).unwrap(),
            Value::Int(1024)
        );
        assert_eq!(
            Value::Int(2).apply(ArithOp::Pow, &Value::Int(-1)).unwrap(),
            Value::Float(0.5)
        );
        assert_eq!(
            Value::text("ab").apply(ArithOp::Add, &Value::text("c")).unwrap(),
            Value::text("abc")
        );
    }

    #[test]
    fn test_arithmetic_errors() {
        assert!(matches!(
            Value::Int(1).apply(ArithOp::Div, &Value::Int(0)),
            Err(StyleFrameError::InvalidValue(_))
        ));
        assert!(matches!(
            Value::Float(1.0).apply(ArithOp::Rem, &Value::Float(0.0)),
            Err(StyleFrameError::InvalidValue(_))
        ));
        assert!(matches!(
            Value::text("a").apply(ArithOp::Sub, &Value::Int(1)),
            Err(StyleFrameError::InvalidType(_))
        ));
    }

    #[test]
    fn test_overflow_falls_back_to_float() {
        let v = Value::Int(i64::MAX).apply(ArithOp::Add, &Value::Int(1)).unwrap();
        assert!(matches!(v, Value::Float(_)));
    }

    #[test]
    fn test_cell_value_mapping() {
        assert_eq!(Value::Null.to_cell_value(""), CellValue::Empty);
        assert_eq!(Value::Float(f64::NAN).to_cell_value("-"), CellValue::string("-"));
        assert_eq!(
            Value::text("=SUM(A1:A2)").to_cell_value(""),
            CellValue::Formula("SUM(A1:A2)".into())
        );
        let d = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(Value::Date(d).to_cell_value(""), CellValue::Number(36526.0));
    }

    #[test]
    fn test_from_cell_value_uses_format() {
        let date_fmt = NumberFormat::from_string("DD/MM/YY");
        assert_eq!(
            Value::from_cell_value(&CellValue::Number(36526.0), &date_fmt),
            Value::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        );
        let time_fmt = NumberFormat::from_string("HH:MM");
        assert_eq!(
            Value::from_cell_value(&CellValue::Number(0.5), &time_fmt),
            Value::Time(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
        );
        let general = NumberFormat::General;
        assert!(matches!(
            Value::from_cell_value(&CellValue::Number(3.0), &general),
            Value::Int(3)
        ));
        assert!(matches!(
            Value::from_cell_value(&CellValue::Number(2.5), &general),
            Value::Float(_)
        ));
        assert_eq!(
            Value::from_cell_value(&CellValue::Formula("A1".into()), &general),
            Value::text("=A1")
        );
    }

    #[test]
    fn test_conversions() {
        assert_eq!(i64::try_from(&Value::Float(2.7)).unwrap(), 2);
        assert_eq!(f64::try_from(&Value::text("20")).unwrap(), 20.0);
        assert!(matches!(
            f64::try_from(&Value::text("x")),
            Err(StyleFrameError::InvalidValue(_))
        ));
        assert!(matches!(
            f64::try_from(&Value::Null),
            Err(StyleFrameError::InvalidType(_))
        ));
        assert_eq!(Value::text("abc").len().unwrap(), 3);
        assert!(Value::Int(3).len().is_err());
        assert!(!Value::Int(0).is_truthy());
        assert_eq!(Value::from(Some(3)), Value::Int(3));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_from_json() {
        let v: Value = serde_json::from_str("[1, 2.5, \"x\", null, true]")
            .map(|j: serde_json::Value| Value::from(&j))
            .unwrap();
        assert_eq!(v, Value::text("[1,2.5,\"x\",null,true]"));
        let n: Value = serde_json::from_str("42").unwrap();
        assert!(matches!(n, Value::Int(42)));
    }
}
