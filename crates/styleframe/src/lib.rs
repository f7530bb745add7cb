//! # styleframe
//!
//! Styled tables exported to and imported from xlsx workbooks.
//!
//! A [`StyleFrame`] wraps a [`Table`] so every cell, column header and row
//! label carries its own [`Styler`]. Styles are applied by column, by row
//! selection or to headers, and the frame is written into a worksheet
//! together with column widths, row heights, frozen panes, filters,
//! protection and color scales.
//!
//! ## Example
//!
//! ```rust
//! use styleframe::prelude::*;
//!
//! let mut sf = StyleFrame::from_columns(
//!     vec![("a", vec![1, 2]), ("b", vec![3, 4])],
//!     None,
//! )
//! .unwrap();
//!
//! let bold = StyleOptions::new().bold(true).build().unwrap();
//! sf.apply_column_style(["a"], &bold, &ColumnStyleOptions::default())
//!     .unwrap();
//! sf.set_column_width(["b"], 20).unwrap();
//!
//! let mut writer = ExcelWriter::new("output.xlsx");
//! sf.to_excel(&mut writer, &ExportOptions::default()).unwrap();
//! // writer.save().unwrap();
//! ```

pub mod container;
pub mod error;
pub mod frame;
pub mod prelude;
pub mod styler;
pub mod table;
pub mod utils;
pub mod value;
pub mod writer;

pub use container::Container;
pub use error::{Result, StyleFrameError};
pub use frame::{
    ColumnStyleOptions, ColumnView, ExportOptions, IndexStyleOptions, ReadOptions, SheetSelector,
    StyleFrame,
};
pub use styler::{
    ColorScaleConditionalFormatRule, ColorScaleStop, StyleOptions, StyleRef, Styler,
};
pub use table::{RowSelection, Table};
pub use value::{ArithOp, Value};
pub use writer::ExcelWriter;

// Re-export the native model used at the edges
pub use styleframe_core::{
    BorderLineStyle, CellComment, CfValueType, Color, HorizontalAlignment, PatternType,
    ThemePalette, Underline, VerticalAlignment, Workbook, Worksheet,
};
pub use styleframe_xlsx::{XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt {
    /// Open a workbook from a file
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook>;

    /// Save the workbook to a file
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

fn is_xlsx_path(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    matches!(extension.as_deref(), Some("xlsx") | Some("xlsm"))
}

fn unsupported(path: &Path) -> StyleFrameError {
    StyleFrameError::InvalidValue(format!("Unsupported file format: {}", path.display()))
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        let path = path.as_ref();
        if !is_xlsx_path(path) {
            return Err(unsupported(path));
        }
        Ok(XlsxReader::read_file(path)?)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !is_xlsx_path(path) {
            return Err(unsupported(path));
        }
        Ok(XlsxWriter::write_file(self, path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_dispatch() {
        assert!(is_xlsx_path(Path::new("a/b.XLSX")));
        assert!(is_xlsx_path(Path::new("b.xlsm")));
        assert!(!is_xlsx_path(Path::new("b.csv")));
        assert!(matches!(
            Workbook::new().save("out.csv"),
            Err(StyleFrameError::InvalidValue(_))
        ));
        assert!(matches!(
            Workbook::open("in.txt"),
            Err(StyleFrameError::InvalidValue(_))
        ));
    }
}
