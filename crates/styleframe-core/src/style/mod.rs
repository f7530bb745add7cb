//! Native cell formatting
//!
//! A [`Style`] is everything one `<xf>` record in `styles.xml` can express.
//! Worksheets intern styles in a [`StylePool`].

mod alignment;
mod border;
mod color;
mod fill;
mod font;
pub(crate) mod keyword;
mod number_format;
mod pool;
mod theme;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderStyle};
pub use color::Color;
pub use fill::{FillStyle, PatternType};
pub use font::{FontStyle, Underline};
pub use number_format::{NumberFormat, TemporalKind};
pub use pool::StylePool;
pub use theme::ThemePalette;

/// Formatting of one cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub font: FontStyle,
    pub fill: FillStyle,
    pub border: BorderStyle,
    pub alignment: Alignment,
    pub number_format: NumberFormat,
    pub protection: Protection,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    /// Points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }

    pub fn font_name(mut self, name: impl Into<String>) -> Self {
        self.font.name = name.into();
        self
    }

    pub fn font_color(mut self, color: Color) -> Self {
        self.font.color = color;
        self
    }

    /// Solid background
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = FillStyle::solid(color);
        self
    }

    pub fn number_format(mut self, code: impl Into<String>) -> Self {
        self.number_format = NumberFormat::from_string(code);
        self
    }

    pub fn horizontal_alignment(mut self, horizontal: HorizontalAlignment) -> Self {
        self.alignment.horizontal = horizontal;
        self
    }

    pub fn vertical_alignment(mut self, vertical: VerticalAlignment) -> Self {
        self.alignment.vertical = vertical;
        self
    }

    pub fn border_all(mut self, line: BorderLineStyle, color: Color) -> Self {
        self.border = BorderStyle::all(line, color);
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.protection.locked = locked;
        self
    }
}

/// Cell flags that take effect once the sheet is protected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Protection {
    pub locked: bool,
    /// Hide the formula in the formula bar
    pub hidden: bool,
}

impl Default for Protection {
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}
