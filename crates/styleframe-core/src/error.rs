//! Errors of the native model

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row past the sheet limit, with the largest allowed row
    #[error("Row {0} is past the last row {1}")]
    RowOutOfBounds(u32, u32),

    /// Column past the sheet limit, with the largest allowed column
    #[error("Column {0} is past the last column {1}")]
    ColumnOutOfBounds(u16, u16),

    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Sheet names compare case-insensitively
    #[error("A sheet named '{0}' already exists")]
    DuplicateSheetName(String),

    /// A keyword such as a fill pattern or border style that xlsx does not define
    #[error("'{value}' is not a valid {kind}")]
    UnknownKeyword { kind: &'static str, value: String },
}

impl Error {
    pub(crate) fn unknown_keyword(kind: &'static str, value: &str) -> Self {
        Error::UnknownKeyword {
            kind,
            value: value.to_string(),
        }
    }
}
