//! Fonts

use super::keyword::xlsx_keyword;
use super::Color;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    /// Family, e.g. "Arial"
    pub name: String,
    /// Points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strikethrough: bool,
    pub color: Color,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
            underline: Underline::None,
            strikethrough: false,
            color: Color::Auto,
        }
    }
}

// Sizes come from finite literals or parsed attributes, so bitwise
// equality of `size` agrees with `PartialEq`.
impl Eq for FontStyle {}

impl Hash for FontStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (&self.name, self.size.to_bits(), self.bold, self.italic).hash(state);
        (self.underline, self.strikethrough, &self.color).hash(state);
    }
}

xlsx_keyword! {
    /// `u@val`
    Underline, "underline" {
        None => "none",
        Single => "single",
        Double => "double",
        SingleAccounting => "singleAccounting",
        DoubleAccounting => "doubleAccounting",
    }
}
