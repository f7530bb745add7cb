//! Color-scale conditional formatting rules attached to a frame

use styleframe_core::{CellRange, CfColorValue, CfValueType, ColorScaleRule};

use super::options::resolve_color;
use crate::error::{Result, StyleFrameError};
use crate::utils::colors;
use crate::value::Value;

/// One stop of a color scale
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScaleStop {
    pub value_type: CfValueType,
    /// Threshold; unused for min and max stops
    pub value: Option<String>,
    /// Hex color
    pub color: String,
}

impl ColorScaleStop {
    /// A stop with a color given by name or hex
    pub fn new(value_type: CfValueType, color: &str) -> Self {
        Self {
            value_type,
            value: None,
            color: resolve_color(Some(color), colors::BLACK),
        }
    }

    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }

    fn to_native(&self) -> CfColorValue {
        CfColorValue::new(
            self.value_type,
            self.value.clone(),
            styleframe_core::Color::from_hex(&self.color).unwrap_or_default(),
        )
    }
}

/// A color scale over one column, or a span of columns given by its two ends
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScaleConditionalFormatRule {
    pub start: ColorScaleStop,
    pub mid: Option<ColorScaleStop>,
    pub end: ColorScaleStop,
    pub columns_range: Vec<Value>,
}

impl ColorScaleConditionalFormatRule {
    /// Create a rule; `columns_range` must name one or two columns
    pub fn new(
        start: ColorScaleStop,
        end: ColorScaleStop,
        mid: Option<ColorScaleStop>,
        columns_range: Vec<Value>,
    ) -> Result<Self> {
        if columns_range.is_empty() || columns_range.len() > 2 {
            return Err(StyleFrameError::invalid_type(
                "columns_range should contain 1 or 2 values",
            ));
        }
        Ok(Self {
            start,
            mid,
            end,
            columns_range,
        })
    }

    /// The native rule over `range`
    pub(crate) fn to_native(&self, range: CellRange, priority: u32) -> ColorScaleRule {
        let mut stops = vec![self.start.to_native()];
        stops.extend(self.mid.as_ref().map(ColorScaleStop::to_native));
        stops.push(self.end.to_native());
        ColorScaleRule::new(stops)
            .with_range(range)
            .with_priority(priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_range_length() {
        let start = ColorScaleStop::new(CfValueType::Min, "red");
        let end = ColorScaleStop::new(CfValueType::Max, "green");
        assert!(ColorScaleConditionalFormatRule::new(
            start.clone(),
            end.clone(),
            None,
            vec![]
        )
        .is_err());
        assert!(ColorScaleConditionalFormatRule::new(
            start.clone(),
            end.clone(),
            None,
            vec!["a".into(), "b".into(), "c".into()]
        )
        .is_err());
        assert!(
            ColorScaleConditionalFormatRule::new(start, end, None, vec!["a".into()]).is_ok()
        );
    }

    #[test]
    fn test_native_rule_has_three_stops_with_mid() {
        let rule = ColorScaleConditionalFormatRule::new(
            ColorScaleStop::new(CfValueType::Num, "red").with_value(0),
            ColorScaleStop::new(CfValueType::Num, "green").with_value(100),
            Some(ColorScaleStop::new(CfValueType::Percentile, "yellow").with_value(50)),
            vec!["score".into()],
        )
        .unwrap();
        let native = rule.to_native(CellRange::parse("B1:B4").unwrap(), 2);
        assert_eq!(native.colors.len(), 3);
        assert_eq!(native.colors[1].value.as_deref(), Some("50"));
        assert_eq!(native.priority, 2);
        assert_eq!(native.ranges[0].to_a1_string(), "B1:B4");
    }
}
