//! Error types for styleframe

use thiserror::Error;

/// Result type alias using [`StyleFrameError`]
pub type Result<T> = std::result::Result<T, StyleFrameError>;

/// Errors raised by the styling layer
#[derive(Debug, Error)]
pub enum StyleFrameError {
    /// Mutually exclusive style options were combined
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An argument had the wrong shape or type
    #[error("{0}")]
    InvalidType(String),

    /// A named column or label does not exist
    #[error("Key error: {0}")]
    Key(String),

    /// A row or column position is outside the written sheet
    #[error("Index error: {0}")]
    Index(String),

    /// An argument had the right type but an unusable value
    #[error("{0}")]
    InvalidValue(String),

    /// Command line input failed validation
    #[error("{0}")]
    Validation(String),

    /// Error from the xlsx reader or writer
    #[error("XLSX error: {0}")]
    Xlsx(#[from] styleframe_xlsx::XlsxError),

    /// Error from the native workbook model
    #[error("Workbook error: {0}")]
    Core(#[from] styleframe_core::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StyleFrameError {
    pub(crate) fn invalid_type<S: Into<String>>(msg: S) -> Self {
        StyleFrameError::InvalidType(msg.into())
    }

    pub(crate) fn invalid_value<S: Into<String>>(msg: S) -> Self {
        StyleFrameError::InvalidValue(msg.into())
    }

    pub(crate) fn key<S: Into<String>>(msg: S) -> Self {
        StyleFrameError::Key(msg.into())
    }

    pub(crate) fn index<S: Into<String>>(msg: S) -> Self {
        StyleFrameError::Index(msg.into())
    }

    /// Bad input the CLI reports instead of failing on
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StyleFrameError::InvalidType(_)
                | StyleFrameError::InvalidValue(_)
                | StyleFrameError::Validation(_)
                | StyleFrameError::Configuration(_)
        )
    }
}
