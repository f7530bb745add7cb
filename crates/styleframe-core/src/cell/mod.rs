//! Cell-related types
//!
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] / [`CellRange`] - A1-style locations
//! - [`CellData`] / [`CellStorage`] - Sparse cell grid with pooled styles

mod address;
mod storage;
mod value;

pub use address::{CellAddress, CellRange};
pub use storage::{CellData, CellStorage, Dimensions};
pub use value::CellValue;
