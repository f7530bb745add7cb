//! Style descriptors
//!
//! A [`Styler`] holds every visual attribute of one cell. Stylers compare and
//! hash structurally, combine with override semantics and convert to and from
//! the native [`Style`](styleframe_core::Style) written to xlsx.
//!
//! ```rust
//! use styleframe::{StyleOptions, Styler};
//!
//! let base = StyleOptions::new().bg_color("yellow").build().unwrap();
//! let bold = Styler::default().with_bold(true);
//!
//! let combined = Styler::combine([&base, &bold]);
//! assert!(combined.bold);
//! assert_eq!(combined.bg_color, "00FFFF00");
//! assert_eq!(&base + &bold, combined);
//! ```

mod color_scale;
mod native;
mod options;

pub use color_scale::{ColorScaleConditionalFormatRule, ColorScaleStop};
pub use options::StyleOptions;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;
use std::rc::Rc;

use styleframe_core::style::{
    BorderLineStyle, HorizontalAlignment, PatternType, Underline, VerticalAlignment,
};
use styleframe_core::{CellComment, TemporalKind};

use crate::utils::{colors, fonts, number_formats};

/// Every visual attribute of one cell
///
/// Colors are stored as uppercase 6 or 8 digit hex without a leading '#'.
/// `border_type` of [`BorderLineStyle::None`] means no border and
/// `fill_pattern_type` of [`PatternType::None`] means no fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Styler {
    pub bg_color: String,
    pub bold: bool,
    pub font: String,
    pub font_size: f64,
    pub font_color: String,
    pub number_format: String,
    /// Cell is locked when the sheet is protected
    pub protection: bool,
    pub underline: Underline,
    pub border_type: BorderLineStyle,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub wrap_text: bool,
    pub shrink_to_fit: bool,
    pub fill_pattern_type: PatternType,
    pub indent: u8,
    pub comment_author: Option<String>,
    pub comment_text: Option<String>,
    pub text_rotation: i16,
    /// Number format for date values
    pub date_format: String,
    /// Number format for time values
    pub time_format: String,
    /// Number format for date-time values
    pub date_time_format: String,
    pub strikethrough: bool,
    pub italic: bool,
}

impl Default for Styler {
    fn default() -> Self {
        Self {
            bg_color: colors::WHITE.to_string(),
            bold: false,
            font: fonts::ARIAL.to_string(),
            font_size: 12.0,
            font_color: colors::BLACK.to_string(),
            number_format: number_formats::GENERAL.to_string(),
            protection: false,
            underline: Underline::None,
            border_type: BorderLineStyle::Thin,
            horizontal_alignment: HorizontalAlignment::Center,
            vertical_alignment: VerticalAlignment::Center,
            wrap_text: true,
            shrink_to_fit: true,
            fill_pattern_type: PatternType::Solid,
            indent: 0,
            comment_author: None,
            comment_text: None,
            text_rotation: 0,
            date_format: number_formats::DEFAULT_DATE_FORMAT.to_string(),
            time_format: number_formats::DEFAULT_TIME_FORMAT.to_string(),
            date_time_format: number_formats::DEFAULT_DATE_TIME_FORMAT.to_string(),
            strikethrough: false,
            italic: false,
        }
    }
}

impl Eq for Styler {}

impl Hash for Styler {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bg_color.hash(state);
        self.bold.hash(state);
        self.font.hash(state);
        self.font_size.to_bits().hash(state);
        self.font_color.hash(state);
        self.number_format.hash(state);
        self.protection.hash(state);
        self.underline.hash(state);
        self.border_type.hash(state);
        self.horizontal_alignment.hash(state);
        self.vertical_alignment.hash(state);
        self.wrap_text.hash(state);
        self.shrink_to_fit.hash(state);
        self.fill_pattern_type.hash(state);
        self.indent.hash(state);
        self.comment_author.hash(state);
        self.comment_text.hash(state);
        self.text_rotation.hash(state);
        self.date_format.hash(state);
        self.time_format.hash(state);
        self.date_time_format.hash(state);
        self.strikethrough.hash(state);
        self.italic.hash(state);
    }
}

/// Copy every field of `$from` that differs from `$default` into `$into`
macro_rules! overlay_fields {
    ($into:ident, $from:ident, $default:ident; $($field:ident),* $(,)?) => {
        $(
            if $from.$field != $default.$field {
                $into.$field = $from.$field.clone();
            }
        )*
    };
}

impl Styler {
    /// Build a styler from options
    pub fn new(options: &StyleOptions) -> crate::Result<Self> {
        options.build()
    }

    /// The style headers get unless they were styled explicitly
    pub fn default_header_style() -> Self {
        Self::default().with_bold(true)
    }

    /// Combine stylers left to right
    ///
    /// Starts from a fresh default; every attribute an argument sets away from
    /// its default overwrites the running result.
    pub fn combine<'a, I>(styles: I) -> Styler
    where
        I: IntoIterator<Item = &'a Styler>,
    {
        let default = Styler::default();
        let mut result = Styler::default();
        for style in styles {
            overlay_fields!(result, style, default;
                bg_color, bold, font, font_size, font_color, number_format, protection,
                underline, border_type, horizontal_alignment, vertical_alignment, wrap_text,
                shrink_to_fit, fill_pattern_type, indent, comment_author, comment_text,
                text_rotation, date_format, time_format, date_time_format, strikethrough,
                italic,
            );
        }
        result
    }

    /// Copy with bold set
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Copy with a different number format
    pub fn with_number_format<S: Into<String>>(mut self, format: S) -> Self {
        self.number_format = format.into();
        self
    }

    /// The number format a value of `kind` gets under this style
    pub fn format_for(&self, kind: Option<TemporalKind>) -> &str {
        match kind {
            Some(TemporalKind::Date) => &self.date_format,
            Some(TemporalKind::Time) => &self.time_format,
            Some(TemporalKind::DateTime) => &self.date_time_format,
            None => &self.number_format,
        }
    }

    /// Whether the number format is the general one
    pub fn has_general_format(&self) -> bool {
        self.number_format == number_formats::GENERAL
    }

    /// The cell comment this style carries, if any
    pub fn generate_comment(&self) -> Option<CellComment> {
        if self.comment_author.is_none() && self.comment_text.is_none() {
            return None;
        }
        Some(CellComment::new(
            self.comment_author.clone().unwrap_or_default(),
            self.comment_text.clone().unwrap_or_default(),
        ))
    }
}

impl Add for &Styler {
    type Output = Styler;

    fn add(self, other: &Styler) -> Styler {
        Styler::combine([self, other])
    }
}

impl Add for Styler {
    type Output = Styler;

    fn add(self, other: Styler) -> Styler {
        Styler::combine([&self, &other])
    }
}

impl fmt::Display for Styler {
    /// Lists the attributes that differ from the default
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let default = Styler::default();
        let mut parts = Vec::new();
        macro_rules! changed {
            ($($field:ident),*) => {
                $(
                    if self.$field != default.$field {
                        parts.push(format!("{}: {:?}", stringify!($field), self.$field));
                    }
                )*
            };
        }
        changed!(
            bg_color, bold, font, font_size, font_color, number_format, protection, underline,
            border_type, horizontal_alignment, vertical_alignment, wrap_text, shrink_to_fit,
            fill_pattern_type, indent, comment_author, comment_text, text_rotation, date_format,
            time_format, date_time_format, strikethrough, italic
        );
        write!(f, "Styler {{{}}}", parts.join(", "))
    }
}

/// Shared handle to a [`Styler`]
///
/// Cells styled by one operation share a handle, so mutating through it
/// restyles all of them. Cloning the handle shares; [`StyleRef::deep_clone`]
/// copies.
#[derive(Clone)]
pub struct StyleRef(Rc<RefCell<Styler>>);

impl StyleRef {
    /// Wrap a styler in a new handle
    pub fn new(styler: Styler) -> Self {
        StyleRef(Rc::new(RefCell::new(styler)))
    }

    pub fn borrow(&self) -> Ref<'_, Styler> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Styler> {
        self.0.borrow_mut()
    }

    /// Snapshot of the current styler
    pub fn get(&self) -> Styler {
        self.0.borrow().clone()
    }

    /// Replace the styler for every holder of this handle
    pub fn set(&self, styler: Styler) {
        *self.0.borrow_mut() = styler;
    }

    /// Whether both handles point at the same styler
    pub fn ptr_eq(&self, other: &StyleRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// A new handle holding a copy of the styler
    pub fn deep_clone(&self) -> StyleRef {
        StyleRef::new(self.get())
    }

    /// Identity of the shared styler, stable while any handle lives
    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl From<Styler> for StyleRef {
    fn from(styler: Styler) -> Self {
        StyleRef::new(styler)
    }
}

impl PartialEq for StyleRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.borrow() == *other.borrow()
    }
}

impl fmt::Debug for StyleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.borrow().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(s: &Styler) -> u64 {
        let mut h = DefaultHasher::new();
        s.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_structural_equality() {
        let a = StyleOptions::new().bold(true).font_size(20).build().unwrap();
        let b = StyleOptions::new().bold(true).font_size(20.0).build().unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let mut c = a.clone();
        c.italic = true;
        assert_ne!(a, c);
        assert_ne!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn test_combine_overrides_non_defaults() {
        let base = StyleOptions::new()
            .bg_color("blue")
            .font("Impact")
            .build()
            .unwrap();
        let over = StyleOptions::new()
            .bg_color("red")
            .bold(true)
            .build()
            .unwrap();
        let combined = Styler::combine([&base, &over]);
        assert_eq!(combined.bg_color, colors::RED);
        assert_eq!(combined.font, "Impact");
        assert!(combined.bold);
    }

    #[test]
    fn test_combine_cannot_reset_to_default() {
        let base = Styler::default().with_bold(true);
        let plain = Styler::default();
        assert!(Styler::combine([&base, &plain]).bold);
    }

    #[test]
    fn test_combine_identities() {
        let s = StyleOptions::new().italic(true).indent(2u8).build().unwrap();
        assert_eq!(Styler::combine([&s]), s);
        assert_eq!(Styler::combine([&Styler::default(), &s]), s);
        assert_eq!(Styler::combine(std::iter::empty()), Styler::default());
    }

    #[test]
    fn test_default_header_style() {
        let header = Styler::default_header_style();
        assert!(header.bold);
        assert_eq!(header.clone().with_bold(false), Styler::default());
    }

    #[test]
    fn test_format_for_kind() {
        let s = Styler::default();
        assert_eq!(s.format_for(Some(TemporalKind::Date)), "DD/MM/YY");
        assert_eq!(s.format_for(Some(TemporalKind::Time)), "HH:MM");
        assert_eq!(s.format_for(Some(TemporalKind::DateTime)), "DD/MM/YY HH:MM");
        assert_eq!(s.format_for(None), "General");
    }

    #[test]
    fn test_generate_comment() {
        assert!(Styler::default().generate_comment().is_none());
        let s = StyleOptions::new().comment_text("note").build().unwrap();
        let comment = s.generate_comment().unwrap();
        assert_eq!(comment.author, "");
        assert_eq!(comment.text, "note");
    }

    #[test]
    fn test_style_ref_sharing() {
        let shared = StyleRef::new(Styler::default());
        let alias = shared.clone();
        let copy = shared.deep_clone();
        alias.borrow_mut().bold = true;
        assert!(shared.borrow().bold);
        assert!(!copy.borrow().bold);
        assert!(shared.ptr_eq(&alias));
        assert!(!shared.ptr_eq(&copy));
    }

    #[test]
    fn test_display_lists_changes() {
        let s = Styler::default().with_bold(true);
        assert_eq!(s.to_string(), "Styler {bold: true}");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_styler() -> impl Strategy<Value = Styler> {
        (
            any::<bool>(),
            prop::sample::select(vec!["Arial", "Impact", "Calibri"]),
            prop::sample::select(vec![10.0, 12.0, 20.0]),
            prop::sample::select(vec![colors::WHITE, colors::RED, colors::GREY]),
            prop::sample::select(vec![
                BorderLineStyle::Thin,
                BorderLineStyle::None,
                BorderLineStyle::Double,
            ]),
            any::<bool>(),
            0u8..3,
        )
            .prop_map(|(bold, font, size, bg, border, wrap, indent)| Styler {
                bold,
                font: font.to_string(),
                font_size: size,
                bg_color: bg.to_string(),
                border_type: border,
                wrap_text: wrap,
                indent,
                ..Styler::default()
            })
    }

    proptest! {
        #[test]
        fn combine_is_associative(a in arb_styler(), b in arb_styler(), c in arb_styler()) {
            let left = Styler::combine([&Styler::combine([&a, &b]), &c]);
            prop_assert_eq!(left, Styler::combine([&a, &b, &c]));
        }

        #[test]
        fn default_is_neutral(s in arb_styler()) {
            prop_assert_eq!(Styler::combine([&Styler::default(), &s]), s.clone());
            prop_assert_eq!(Styler::combine([&s]), s);
        }
    }
}
