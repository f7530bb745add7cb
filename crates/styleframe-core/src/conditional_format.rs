//! Color-scale conditional formatting
//!
//! ```rust
//! use styleframe_core::{CellRange, ColorScaleRule, Workbook};
//! use styleframe_core::style::Color;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! let rule = ColorScaleRule::two_color(Color::RED, Color::rgb(0, 255, 0))
//!     .with_range(CellRange::parse("A1:A10").unwrap());
//! sheet.add_color_scale(rule);
//! ```

use crate::cell::CellRange;
use crate::style::keyword::xlsx_keyword;
use crate::style::Color;

/// A 2- or 3-stop color scale applied to one or more ranges
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScaleRule {
    /// Cell ranges this rule applies to
    pub ranges: Vec<CellRange>,
    /// Stops from low to high
    pub colors: Vec<CfColorValue>,
    /// Priority (lower = higher priority)
    pub priority: u32,
}

impl ColorScaleRule {
    /// Create a rule from explicit stops
    pub fn new(colors: Vec<CfColorValue>) -> Self {
        Self {
            ranges: Vec::new(),
            colors,
            priority: 1,
        }
    }

    /// Create a 2-color scale (min to max)
    pub fn two_color(min_color: Color, max_color: Color) -> Self {
        Self::new(vec![
            CfColorValue::new(CfValueType::Min, None, min_color),
            CfColorValue::new(CfValueType::Max, None, max_color),
        ])
    }

    /// Add a range this rule applies to
    pub fn with_range(mut self, range: CellRange) -> Self {
        self.ranges.push(range);
        self
    }

    /// Set priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Space-separated A1 ranges for the `sqref` attribute
    pub fn sqref(&self) -> String {
        self.ranges
            .iter()
            .map(CellRange::to_a1_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A color-scale stop
#[derive(Debug, Clone, PartialEq)]
pub struct CfColorValue {
    /// How to interpret the value
    pub value_type: CfValueType,
    /// The value (if applicable)
    pub value: Option<String>,
    /// Color at this threshold
    pub color: Color,
}

impl CfColorValue {
    /// Create a new stop
    pub fn new(value_type: CfValueType, value: Option<String>, color: Color) -> Self {
        Self {
            value_type,
            value,
            color,
        }
    }
}

xlsx_keyword! {
    /// How a `<cfvo>` threshold is computed
    CfValueType, "conditional formatting type" {
        Min => "min",
        Max => "max",
        Num => "num",
        Percent => "percent",
        Percentile => "percentile",
        Formula => "formula",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_color_scale() {
        let rule = ColorScaleRule::two_color(Color::RED, Color::rgb(0, 0, 0xFF))
            .with_range(CellRange::parse("A1:A5").unwrap())
            .with_range(CellRange::parse("C1:C5").unwrap());
        assert_eq!(rule.colors.len(), 2);
        assert_eq!(rule.colors[0].value_type, CfValueType::Min);
        assert_eq!(rule.sqref(), "A1:A5 C1:C5");
    }

    #[test]
    fn test_value_type_keywords() {
        assert_eq!("percentile".parse::<CfValueType>().unwrap(), CfValueType::Percentile);
        assert_eq!(CfValueType::Num.as_str(), "num");
        assert!("autoMin".parse::<CfValueType>().is_err());
    }
}
