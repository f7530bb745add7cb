//! Workbook target for exported frames

use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use styleframe_core::Workbook;
use styleframe_xlsx::XlsxWriter;

use crate::error::Result;
use crate::WorkbookExt;

/// An empty workbook bound to the path it will be saved to
///
/// Several frames can be written as separate sheets before saving.
#[derive(Debug)]
pub struct ExcelWriter {
    path: PathBuf,
    workbook: Workbook,
}

impl ExcelWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            workbook: Workbook::empty(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }

    pub fn into_workbook(self) -> Workbook {
        self.workbook
    }

    /// Save to the bound path
    pub fn save(&self) -> Result<()> {
        log::info!(
            "saving {} sheet(s) to {}",
            self.workbook.sheet_count(),
            self.path.display()
        );
        self.workbook.save(&self.path)
    }

    /// Write the xlsx package to `writer` instead of the bound path
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        XlsxWriter::write(&self.workbook, writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_empty_writer() {
        let writer = ExcelWriter::new("out.xlsx");
        assert_eq!(writer.path(), Path::new("out.xlsx"));
        assert_eq!(writer.workbook().sheet_count(), 0);
    }

    #[test]
    fn test_write_to_memory() {
        let mut writer = ExcelWriter::new("out.xlsx");
        writer.workbook_mut().add_worksheet_with_name("data").unwrap();
        let mut buf = Cursor::new(Vec::new());
        writer.write_to(&mut buf).unwrap();
        assert!(buf.get_ref().starts_with(b"PK"));
    }
}
