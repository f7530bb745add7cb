//! # styleframe-xlsx
//!
//! XLSX (Office Open XML) reader and writer for the styleframe workbook model.
//!
//! Besides cell values and styles this covers the sheet-level features a
//! styled export needs: column widths and hidden columns, row heights,
//! frozen panes, right-to-left views, sheet protection, auto filters,
//! color-scale conditional formatting, cell comments and the theme palette.

pub mod error;
pub mod reader;
pub mod writer;

mod styles;
mod theme;
mod xml;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
