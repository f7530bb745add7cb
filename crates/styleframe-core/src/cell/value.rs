//! What a native cell holds

use std::fmt;

/// Cell content as xlsx stores it
///
/// Dates are numbers here; whether they display as dates depends on the
/// cell's number format.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Boolean(bool),
    Number(f64),
    String(String),
    /// Formula text without the leading `=`. Only the text is kept.
    Formula(String),
}

impl CellValue {
    pub fn string(s: impl Into<String>) -> Self {
        CellValue::String(s.into())
    }

    /// Accepts text with or without a leading `=`
    pub fn formula(text: impl Into<String>) -> Self {
        let text = text.into();
        let body = text.strip_prefix('=').map(str::to_string);
        CellValue::Formula(body.unwrap_or(text))
    }

    pub fn is_empty(&self) -> bool {
        *self == CellValue::Empty
    }

    pub fn as_str(&self) -> Option<&str> {
        if let CellValue::String(s) = self {
            Some(s)
        } else {
            None
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

/// Spreadsheet rendering: `TRUE`/`FALSE`, formulas with their `=`
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::String(s) => f.write_str(s),
            CellValue::Formula(text) => write!(f, "={text}"),
        }
    }
}
