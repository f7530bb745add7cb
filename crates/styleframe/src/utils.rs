//! Named constants for colors, number formats, fonts and style keywords
//!
//! ```rust
//! use styleframe::utils::{colors, number_formats};
//!
//! assert_eq!(colors::get("dark_blue"), Some("00000080"));
//! assert_eq!(number_formats::decimal_with_num_of_digits(3), "0.000");
//! ```

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEX_COLOR: Regex =
        Regex::new(r"^([A-Fa-f0-9]{8}|[A-Fa-f0-9]{6})$").expect("hex color regex must compile");
}

/// Check for a 6 or 8 digit hex color without the leading '#'
pub fn is_hex_color_string(s: &str) -> bool {
    HEX_COLOR.is_match(s)
}

/// Hex colors by name
pub mod colors {
    pub const WHITE: &str = "00FFFFFF";
    pub const BLUE: &str = "000000FF";
    pub const DARK_BLUE: &str = "00000080";
    pub const YELLOW: &str = "00FFFF00";
    pub const DARK_YELLOW: &str = "00808000";
    pub const GREEN: &str = "0000FF00";
    pub const DARK_GREEN: &str = "00008000";
    pub const BLACK: &str = "00000000";
    pub const RED: &str = "00FF0000";
    pub const DARK_RED: &str = "00800000";
    pub const PURPLE: &str = "800080";
    pub const GREY: &str = "D3D3D3";

    /// Look up a color by its lowercase name
    pub fn get(name: &str) -> Option<&'static str> {
        Some(match name {
            "white" => WHITE,
            "blue" => BLUE,
            "dark_blue" => DARK_BLUE,
            "yellow" => YELLOW,
            "dark_yellow" => DARK_YELLOW,
            "green" => GREEN,
            "dark_green" => DARK_GREEN,
            "black" => BLACK,
            "red" => RED,
            "dark_red" => DARK_RED,
            "purple" => PURPLE,
            "grey" => GREY,
            _ => return None,
        })
    }
}

/// Number format strings
pub mod number_formats {
    pub const GENERAL: &str = "General";
    pub const GENERAL_INTEGER: &str = "0";
    pub const GENERAL_FLOAT: &str = "0.00";
    pub const PERCENT: &str = "0.0%";
    pub const THOUSANDS_COMMA_SEP: &str = "#,##0";
    pub const DATE: &str = "DD/MM/YY";
    pub const TIME_24_HOURS: &str = "HH:MM";
    pub const TIME_24_HOURS_WITH_SECONDS: &str = "HH:MM:SS";
    pub const TIME_12_HOURS: &str = "h:MM AM/PM";
    pub const TIME_12_HOURS_WITH_SECONDS: &str = "h:MM:SS AM/PM";
    pub const DATE_TIME: &str = "DD/MM/YY HH:MM";
    pub const DATE_TIME_WITH_SECONDS: &str = "DD/MM/YY HH:MM:SS";

    pub const DEFAULT_DATE_FORMAT: &str = DATE;
    pub const DEFAULT_TIME_FORMAT: &str = TIME_24_HOURS;
    pub const DEFAULT_DATE_TIME_FORMAT: &str = DATE_TIME;

    /// A fixed-point format with `digits` decimals, e.g. `"0.00"` for 2
    pub fn decimal_with_num_of_digits(digits: usize) -> String {
        format!("0.{}", "0".repeat(digits))
    }
}

/// Font family names
pub mod fonts {
    pub const AEGEAN: &str = "Aegean";
    pub const AEGYPTUS: &str = "Aegyptus";
    pub const AHARONI: &str = "Aharoni CLM";
    pub const ANAKTORIA: &str = "Anaktoria";
    pub const ANALECTA: &str = "Analecta";
    pub const ANATOLIAN: &str = "Anatolian";
    pub const ARIAL: &str = "Arial";
    pub const CALIBRI: &str = "Calibri";
    pub const DAVID: &str = "David CLM";
    pub const DEJAVU_SANS: &str = "DejaVu Sans";
    pub const ELLINIA: &str = "Ellinia CLM";
}

/// Border line keywords
pub mod borders {
    pub const DASH_DOT: &str = "dashDot";
    pub const DASH_DOT_DOT: &str = "dashDotDot";
    pub const DASHED: &str = "dashed";
    pub const DOTTED: &str = "dotted";
    pub const DOUBLE: &str = "double";
    pub const HAIR: &str = "hair";
    pub const MEDIUM: &str = "medium";
    pub const MEDIUM_DASH_DOT: &str = "mediumDashDot";
    pub const MEDIUM_DASH_DOT_DOT: &str = "mediumDashDotDot";
    pub const MEDIUM_DASHED: &str = "mediumDashed";
    pub const SLANT_DASH_DOT: &str = "slantDashDot";
    pub const THICK: &str = "thick";
    pub const THIN: &str = "thin";
    /// No border and no fill, so the sheet grid lines show through
    pub const DEFAULT_GRID: &str = "default_grid";
}

/// Threshold types for color-scale stops
pub mod conditional_formatting_types {
    pub const NUM: &str = "num";
    pub const PERCENT: &str = "percent";
    pub const MAX: &str = "max";
    pub const MIN: &str = "min";
    pub const FORMULA: &str = "formula";
    pub const PERCENTILE: &str = "percentile";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_detection() {
        assert!(is_hex_color_string("00FFFFFF"));
        assert!(is_hex_color_string("d3d3d3"));
        assert!(!is_hex_color_string("#D3D3D3"));
        assert!(!is_hex_color_string("FFFFF"));
        assert!(!is_hex_color_string("yellow"));
    }

    #[test]
    fn test_color_table() {
        assert_eq!(colors::get("grey"), Some(colors::GREY));
        assert_eq!(colors::get("magenta"), None);
        assert!(["white", "purple", "dark_red"]
            .iter()
            .all(|n| colors::get(n).map_or(false, is_hex_color_string)));
    }

    #[test]
    fn test_cf_types_parse() {
        use styleframe_core::CfValueType;
        for t in [
            conditional_formatting_types::NUM,
            conditional_formatting_types::PERCENTILE,
            conditional_formatting_types::FORMULA,
        ] {
            assert_eq!(t.parse::<CfValueType>().unwrap().as_str(), t);
        }
    }
}
