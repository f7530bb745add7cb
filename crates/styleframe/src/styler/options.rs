//! Loosely typed style options
//!
//! [`StyleOptions`] is what callers and JSON documents hand in: every field
//! optional, colors as names or hex, keywords as their xlsx spellings.
//! [`StyleOptions::build`] validates it into a [`Styler`].

use std::str::FromStr;

use schemars::JsonSchema;
use serde::Deserialize;
use styleframe_core::style::{BorderLineStyle, PatternType};

use super::Styler;
use crate::error::{Result, StyleFrameError};
use crate::utils::{borders, colors, is_hex_color_string};

/// Style attributes, each optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StyleOptions {
    /// Color name (e.g. "yellow") or hex, with or without '#'
    pub bg_color: Option<String>,
    pub bold: Option<bool>,
    pub font: Option<String>,
    pub font_size: Option<f64>,
    /// Color name or hex
    pub font_color: Option<String>,
    pub number_format: Option<String>,
    pub protection: Option<bool>,
    /// "single", "double", "singleAccounting", "doubleAccounting" or "none"
    pub underline: Option<String>,
    /// An xlsx border line style, "none", or "default_grid"
    pub border_type: Option<String>,
    pub horizontal_alignment: Option<String>,
    pub vertical_alignment: Option<String>,
    pub wrap_text: Option<bool>,
    pub shrink_to_fit: Option<bool>,
    /// An xlsx pattern type, or "none" for no fill
    pub fill_pattern_type: Option<String>,
    pub indent: Option<u8>,
    pub comment_author: Option<String>,
    pub comment_text: Option<String>,
    pub text_rotation: Option<i16>,
    pub date_format: Option<String>,
    pub time_format: Option<String>,
    pub date_time_format: Option<String>,
    pub strikethrough: Option<bool>,
    pub italic: Option<bool>,
}

macro_rules! setters {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $name(mut self, value: impl Into<$ty>) -> Self {
                self.$name = Some(value.into());
                self
            }
        )*
    };
}

impl StyleOptions {
    /// Options with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    setters!(
        bg_color: String,
        bold: bool,
        font: String,
        font_size: f64,
        font_color: String,
        number_format: String,
        protection: bool,
        underline: String,
        border_type: String,
        horizontal_alignment: String,
        vertical_alignment: String,
        wrap_text: bool,
        shrink_to_fit: bool,
        fill_pattern_type: String,
        indent: u8,
        comment_author: String,
        comment_text: String,
        text_rotation: i16,
        date_format: String,
        time_format: String,
        date_time_format: String,
        strikethrough: bool,
        italic: bool,
    );

    /// Validate the options into a [`Styler`]
    ///
    /// Unset fields take their defaults. Unknown keywords fail with
    /// [`StyleFrameError::InvalidType`]; `border_type = "default_grid"` fails
    /// with [`StyleFrameError::Configuration`] when combined with a
    /// background color or a non-solid fill.
    pub fn build(&self) -> Result<Styler> {
        let default = Styler::default();

        let bg_color = resolve_color(self.bg_color.as_deref(), &default.bg_color);
        let font_color = resolve_color(self.font_color.as_deref(), &default.font_color);
        let mut fill_pattern_type = parse_keyword::<PatternType>(
            self.fill_pattern_type.as_deref(),
            "fill_pattern_type",
        )?
        .unwrap_or(default.fill_pattern_type);

        let border_type = match self.border_type.as_deref() {
            Some(borders::DEFAULT_GRID) => {
                if bg_color != default.bg_color || fill_pattern_type != default.fill_pattern_type
                {
                    return Err(StyleFrameError::Configuration(format!(
                        "bg_color or fill_pattern_type can not be used together with border_type={}",
                        borders::DEFAULT_GRID
                    )));
                }
                fill_pattern_type = PatternType::None;
                BorderLineStyle::None
            }
            other => parse_keyword(other, "border_type")?.unwrap_or(default.border_type),
        };

        Ok(Styler {
            bg_color,
            bold: self.bold.unwrap_or(default.bold),
            font: self.font.clone().unwrap_or(default.font),
            font_size: self.font_size.unwrap_or(default.font_size),
            font_color,
            number_format: self.number_format.clone().unwrap_or(default.number_format),
            protection: self.protection.unwrap_or(default.protection),
            underline: parse_keyword(self.underline.as_deref(), "underline")?
                .unwrap_or(default.underline),
            border_type,
            horizontal_alignment: parse_keyword(
                self.horizontal_alignment.as_deref(),
                "horizontal_alignment",
            )?
            .unwrap_or(default.horizontal_alignment),
            vertical_alignment: parse_keyword(
                self.vertical_alignment.as_deref(),
                "vertical_alignment",
            )?
            .unwrap_or(default.vertical_alignment),
            wrap_text: self.wrap_text.unwrap_or(default.wrap_text),
            shrink_to_fit: self.shrink_to_fit.unwrap_or(default.shrink_to_fit),
            fill_pattern_type,
            indent: self.indent.unwrap_or(default.indent),
            comment_author: self.comment_author.clone(),
            comment_text: self.comment_text.clone(),
            text_rotation: self.text_rotation.unwrap_or(default.text_rotation),
            date_format: self.date_format.clone().unwrap_or(default.date_format),
            time_format: self.time_format.clone().unwrap_or(default.time_format),
            date_time_format: self
                .date_time_format
                .clone()
                .unwrap_or(default.date_time_format),
            strikethrough: self.strikethrough.unwrap_or(default.strikethrough),
            italic: self.italic.unwrap_or(default.italic),
        })
    }
}

/// Normalize a color given as hex (with or without '#') or as a name
///
/// Anything else falls back to `default`.
pub(crate) fn resolve_color(input: Option<&str>, default: &str) -> String {
    let Some(input) = input else {
        return default.to_string();
    };
    let stripped = input.trim_start_matches('#');
    if is_hex_color_string(stripped) {
        return stripped.to_ascii_uppercase();
    }
    match colors::get(&input.to_ascii_lowercase()) {
        Some(hex) => hex.to_string(),
        None => {
            log::debug!("unknown color {:?}, using {}", input, default);
            default.to_string()
        }
    }
}

fn parse_keyword<T>(value: Option<&str>, field: &str) -> Result<Option<T>>
where
    T: FromStr<Err = styleframe_core::Error>,
{
    value
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| StyleFrameError::invalid_type(format!("{}: {}", field, e)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use styleframe_core::style::{HorizontalAlignment, Underline};

    #[test]
    fn test_empty_options_build_default() {
        assert_eq!(StyleOptions::new().build().unwrap(), Styler::default());
    }

    #[test]
    fn test_colors_by_name_and_hex() {
        let s = StyleOptions::new()
            .bg_color("#d3d3d3")
            .font_color("dark_blue")
            .build()
            .unwrap();
        assert_eq!(s.bg_color, "D3D3D3");
        assert_eq!(s.font_color, colors::DARK_BLUE);
    }

    #[test]
    fn test_unknown_color_falls_back() {
        let s = StyleOptions::new().bg_color("magenta").build().unwrap();
        assert_eq!(s.bg_color, colors::WHITE);
    }

    #[test]
    fn test_keywords_parse() {
        let s = StyleOptions::new()
            .underline("double")
            .horizontal_alignment("left")
            .border_type("dashDot")
            .fill_pattern_type("lightGrid")
            .build()
            .unwrap();
        assert_eq!(s.underline, Underline::Double);
        assert_eq!(s.horizontal_alignment, HorizontalAlignment::Left);
        assert_eq!(s.border_type, BorderLineStyle::DashDot);
        assert_eq!(s.fill_pattern_type, PatternType::LightGrid);
    }

    #[test]
    fn test_unknown_keyword_is_invalid_type() {
        let err = StyleOptions::new().underline("wavy").build().unwrap_err();
        assert!(matches!(err, StyleFrameError::InvalidType(_)));
        assert!(err.to_string().contains("underline"));
    }

    #[test]
    fn test_default_grid() {
        let s = StyleOptions::new().border_type("default_grid").build().unwrap();
        assert_eq!(s.border_type, BorderLineStyle::None);
        assert_eq!(s.fill_pattern_type, PatternType::None);

        let err = StyleOptions::new()
            .border_type("default_grid")
            .bg_color("yellow")
            .build()
            .unwrap_err();
        assert!(matches!(err, StyleFrameError::Configuration(_)));
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let ok: StyleOptions =
            serde_json::from_str(r#"{"bold": true, "font_size": 20}"#).unwrap();
        assert_eq!(ok.font_size, Some(20.0));
        assert!(serde_json::from_str::<StyleOptions>(r#"{"bolder": true}"#).is_err());
    }
}
