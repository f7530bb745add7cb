//! # styleframe-core
//!
//! Native spreadsheet model used by styleframe.
//!
//! - [`CellValue`] - Cell values (numbers, strings, booleans, formulas)
//! - [`CellAddress`] and [`CellRange`] - A1 addressing
//! - [`Style`] - Cell formatting (fonts, fills, borders, alignment, protection)
//! - [`ThemePalette`] - Theme colors and tint resolution
//! - [`Workbook`], [`Worksheet`] - The document structures
//!
//! ## Example
//!
//! ```rust
//! use styleframe_core::{CellValue, Style, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("A1", "Hello").unwrap();
//! sheet.set_cell_value_at(1, 0, CellValue::Number(3.5)).unwrap();
//! sheet.set_cell_style_at(0, 0, &Style::new().bold(true)).unwrap();
//! sheet.set_column_width(0, 20.0);
//! ```

pub mod cell;
pub mod comment;
pub mod conditional_format;
pub mod date;
pub mod error;
pub mod style;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellData, CellRange, CellValue};
pub use comment::CellComment;
pub use conditional_format::{CfColorValue, CfValueType, ColorScaleRule};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::{FreezePanes, SheetProtection, Worksheet};

pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, PatternType, Protection, Style, StylePool, TemporalKind,
    ThemePalette, Underline, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
