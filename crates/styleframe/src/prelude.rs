//! Prelude module - common imports for styleframe users
//!
//! ```rust
//! use styleframe::prelude::*;
//! ```

pub use crate::{
    // Native model
    BorderLineStyle,
    CfValueType,
    Color,
    // Color scales
    ColorScaleConditionalFormatRule,
    ColorScaleStop,
    // Styling options
    ColumnStyleOptions,
    Container,
    ExcelWriter,
    ExportOptions,
    HorizontalAlignment,
    IndexStyleOptions,
    PatternType,
    ReadOptions,
    Result,
    RowSelection,
    SheetSelector,
    // Main types
    StyleFrame,
    StyleFrameError,
    StyleOptions,
    Styler,
    Table,
    Underline,
    Value,
    VerticalAlignment,
    Workbook,
    // Extension traits
    WorkbookExt,
};
