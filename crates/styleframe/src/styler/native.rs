//! Conversion between [`Styler`] and the native [`Style`]

use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Mutex;

use ahash::AHashMap;
use lazy_static::lazy_static;
use styleframe_core::style::{
    Alignment, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle, NumberFormat,
    PatternType, Protection, Style, ThemePalette,
};
use styleframe_core::CellComment;

use super::Styler;
use crate::utils::colors;

lazy_static! {
    /// Built native styles keyed by the styler's hash
    static ref NATIVE_STYLES: Mutex<AHashMap<u64, (Styler, Style)>> =
        Mutex::new(AHashMap::new());
    static ref NATIVE_STYLE_HASHER: ahash::RandomState = ahash::RandomState::new();
}

impl Styler {
    /// The native style this styler writes as
    ///
    /// Equal stylers produce equal styles; built styles are memoized.
    pub fn to_native_style(&self) -> Style {
        let key = {
            let mut hasher = NATIVE_STYLE_HASHER.build_hasher();
            self.hash(&mut hasher);
            hasher.finish()
        };

        match NATIVE_STYLES.lock() {
            Ok(cache) => {
                if let Some((styler, style)) = cache.get(&key) {
                    if styler == self {
                        return style.clone();
                    }
                }
            }
            Err(_) => return self.build_native_style(),
        }

        let style = self.build_native_style();
        if let Ok(mut cache) = NATIVE_STYLES.lock() {
            cache.insert(key, (self.clone(), style.clone()));
        }
        style
    }

    fn build_native_style(&self) -> Style {
        let fill = match self.fill_pattern_type {
            PatternType::None => FillStyle::None,
            PatternType::Solid => FillStyle::solid(hex_color(&self.bg_color)),
            pattern => FillStyle::pattern(pattern, hex_color(&self.bg_color), Color::Auto),
        };

        let border = match self.border_type {
            BorderLineStyle::None => BorderStyle::new(),
            line => BorderStyle::all(line, hex_color(colors::BLACK)),
        };

        Style {
            font: FontStyle {
                name: self.font.clone(),
                size: self.font_size,
                bold: self.bold,
                italic: self.italic,
                underline: self.underline,
                strikethrough: self.strikethrough,
                color: hex_color(&self.font_color),
            },
            fill,
            border,
            alignment: Alignment {
                horizontal: self.horizontal_alignment,
                vertical: self.vertical_alignment,
                wrap_text: self.wrap_text,
                shrink_to_fit: self.shrink_to_fit,
                indent: self.indent,
                rotation: self.text_rotation,
            },
            number_format: NumberFormat::from_string(self.number_format.as_str()),
            protection: Protection {
                locked: self.protection,
                hidden: false,
            },
        }
    }

    /// Rebuild a styler from a native style read back from a workbook
    ///
    /// Theme colors resolve through `theme`, falling back to the default
    /// color with the tint applied when the slot is missing.
    pub fn from_native_style(
        style: &Style,
        theme: &ThemePalette,
        comment: Option<&CellComment>,
    ) -> Styler {
        let default = Styler::default();

        let (fill_pattern_type, bg_color) = match &style.fill {
            FillStyle::None => (PatternType::None, default.bg_color.clone()),
            FillStyle::Solid { color } => {
                (PatternType::Solid, color_to_hex(color, theme, colors::WHITE))
            }
            FillStyle::Pattern {
                pattern,
                foreground,
                ..
            } => (*pattern, color_to_hex(foreground, theme, colors::WHITE)),
        };

        let border_type = style
            .border
            .bottom
            .as_ref()
            .map_or(BorderLineStyle::None, |edge| edge.style);

        let (comment_author, comment_text) = match comment {
            Some(c) => (
                Some(c.author.clone()).filter(|a| !a.is_empty()),
                Some(c.text.clone()),
            ),
            None => (None, None),
        };

        Styler {
            bg_color,
            bold: style.font.bold,
            font: style.font.name.clone(),
            font_size: style.font.size,
            font_color: color_to_hex(&style.font.color, theme, colors::BLACK),
            number_format: style.number_format.format_string().to_string(),
            protection: style.protection.locked,
            underline: style.font.underline,
            border_type,
            horizontal_alignment: style.alignment.horizontal,
            vertical_alignment: style.alignment.vertical,
            wrap_text: style.alignment.wrap_text,
            shrink_to_fit: style.alignment.shrink_to_fit,
            fill_pattern_type,
            indent: style.alignment.indent,
            comment_author,
            comment_text,
            text_rotation: style.alignment.rotation,
            strikethrough: style.font.strikethrough,
            italic: style.font.italic,
            ..default
        }
    }
}

/// Stylers only hold validated hex, so the fallback is unreachable in practice
fn hex_color(hex: &str) -> Color {
    Color::from_hex(hex).unwrap_or(Color::Auto)
}

fn color_to_hex(color: &Color, theme: &ThemePalette, default: &str) -> String {
    match color {
        Color::Auto => default.to_string(),
        Color::Theme { index, tint } => theme
            .resolve(*index as usize, *tint)
            .or_else(|| ThemePalette::new([default]).resolve(0, *tint))
            .unwrap_or_else(|| default.to_string()),
        Color::Rgb { .. } | Color::Argb { .. } | Color::Indexed(_) => color.to_hex(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StyleOptions;
    use pretty_assertions::assert_eq;
    use styleframe_core::style::{HorizontalAlignment, Underline};

    #[test]
    fn test_default_native_style() {
        let style = Styler::default().to_native_style();
        assert_eq!(style.font.name, "Arial");
        assert_eq!(style.font.size, 12.0);
        assert_eq!(style.font.color, Color::argb(0, 0, 0, 0));
        assert_eq!(
            style.fill,
            FillStyle::solid(Color::argb(0, 0xFF, 0xFF, 0xFF))
        );
        assert_eq!(
            style.border,
            BorderStyle::all(BorderLineStyle::Thin, Color::argb(0, 0, 0, 0))
        );
        assert_eq!(style.alignment.horizontal, HorizontalAlignment::Center);
        assert!(style.alignment.wrap_text);
        assert_eq!(style.number_format, NumberFormat::General);
        assert!(!style.protection.locked);
    }

    #[test]
    fn test_no_fill_and_no_border() {
        let s = StyleOptions::new()
            .fill_pattern_type("none")
            .border_type("none")
            .build()
            .unwrap();
        let style = s.to_native_style();
        assert_eq!(style.fill, FillStyle::None);
        assert!(style.border.is_empty());
    }

    #[test]
    fn test_pattern_fill_uses_bg_as_foreground() {
        let s = StyleOptions::new()
            .fill_pattern_type("darkGrid")
            .bg_color("grey")
            .build()
            .unwrap();
        assert_eq!(
            s.to_native_style().fill,
            FillStyle::pattern(PatternType::DarkGrid, Color::rgb(0xD3, 0xD3, 0xD3), Color::Auto)
        );
    }

    #[test]
    fn test_conversion_is_memoized_consistently() {
        let s = StyleOptions::new().bold(true).font("Impact").build().unwrap();
        assert_eq!(s.to_native_style(), s.to_native_style());
        assert_eq!(s.to_native_style(), s.clone().to_native_style());
    }

    #[test]
    fn test_round_trip_through_native() {
        let s = StyleOptions::new()
            .bg_color("yellow")
            .font("Impact")
            .font_size(20)
            .font_color("dark_red")
            .underline("single")
            .number_format("0.00")
            .protection(true)
            .border_type("double")
            .horizontal_alignment("left")
            .indent(2u8)
            .text_rotation(45i16)
            .italic(true)
            .strikethrough(true)
            .build()
            .unwrap();
        let back = Styler::from_native_style(&s.to_native_style(), &ThemePalette::empty(), None);
        assert_eq!(back, s);
    }

    #[test]
    fn test_theme_colors_resolve() {
        let style = Style::new()
            .fill_color(Color::theme(4, 0.0))
            .font_color(Color::theme(1, 0.0));
        let s = Styler::from_native_style(&style, &ThemePalette::office_default(), None);
        assert_eq!(s.bg_color, "4F81BD");
        assert_eq!(s.font_color, "000000");
    }

    #[test]
    fn test_missing_theme_slot_tints_default() {
        let style = Style::new().fill_color(Color::theme(7, -0.5));
        let s = Styler::from_native_style(&style, &ThemePalette::empty(), None);
        assert_eq!(s.bg_color, "808080");
    }

    #[test]
    fn test_comment_is_read_back() {
        let comment = CellComment::new("", "check");
        let s = Styler::from_native_style(&Style::new(), &ThemePalette::empty(), Some(&comment));
        assert_eq!(s.comment_author, None);
        assert_eq!(s.comment_text.as_deref(), Some("check"));
        assert_eq!(s.underline, Underline::None);
    }
}
