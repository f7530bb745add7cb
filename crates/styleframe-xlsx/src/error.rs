//! Failures while reading or writing an xlsx package

use thiserror::Error;

pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

#[derive(Debug, Error)]
pub enum XlsxError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Zip container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The package is readable but not a spreadsheet
    #[error("Not an xlsx workbook: {0}")]
    InvalidFormat(String),

    /// A part referenced by the package is absent
    #[error("Package part '{0}' is missing")]
    MissingPart(String),

    /// An attribute or element value could not be interpreted
    #[error("Bad sheet data: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] styleframe_core::Error),
}
