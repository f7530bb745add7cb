//! XLSX writer
//!
//! Every part is produced in memory with [`XmlPart`] and then stored in the
//! zip container. Sheet `n` (1-based) lives at `xl/worksheets/sheet{n}.xml`;
//! sheets with comments also get `xl/comments{n}.xml` and a VML drawing.

mod comments;
mod sheet;

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::StyleTable;
use crate::theme::theme_xml;
use crate::xml::{XmlPart, MAIN_NS, PACKAGE_REL_NS, REL_NS};
use styleframe_core::Workbook;

const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const SPREADSHEETML: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml";

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let path = path.as_ref();
        log::debug!("writing workbook to {}", path.display());
        Self::write(workbook, File::create(path)?)
    }

    /// Write a workbook to any seekable sink
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        if workbook.is_empty() {
            return Err(XlsxError::InvalidFormat(
                "a workbook needs at least one sheet".into(),
            ));
        }

        let styles = StyleTable::build(workbook);
        let mut package = Package {
            zip: ZipWriter::new(writer),
        };

        package.put("[Content_Types].xml", content_types(workbook)?)?;
        package.put("_rels/.rels", root_rels()?)?;
        package.put("xl/workbook.xml", workbook_xml(workbook)?)?;
        package.put("xl/_rels/workbook.xml.rels", workbook_rels(workbook)?)?;
        package.put("xl/styles.xml", styles.to_styles_xml()?)?;
        package.put("xl/theme/theme1.xml", theme_xml(workbook.theme())?)?;

        for (i, worksheet) in workbook.worksheets().enumerate() {
            let n = i + 1;
            package.put(
                &format!("xl/worksheets/sheet{n}.xml"),
                sheet::worksheet_xml(worksheet, i, &styles)?,
            )?;
            if worksheet.comment_count() == 0 {
                continue;
            }
            package.put(
                &format!("xl/worksheets/_rels/sheet{n}.xml.rels"),
                comments::sheet_rels(n)?,
            )?;
            package.put(
                &format!("xl/comments{n}.xml"),
                comments::comments_xml(worksheet)?,
            )?;
            package.put(
                &format!("xl/drawings/vmlDrawing{n}.vml"),
                comments::vml_drawing(worksheet)?,
            )?;
        }

        package.zip.finish()?;
        Ok(())
    }
}

struct Package<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl<W: Write + Seek> Package<W> {
    fn put(&mut self, name: &str, bytes: Vec<u8>) -> XlsxResult<()> {
        log::trace!("{name}: {} bytes", bytes.len());
        self.zip.start_file(name, SimpleFileOptions::default())?;
        self.zip.write_all(&bytes)?;
        Ok(())
    }
}

/// `<Relationship>` with an officeDocument relationship type
pub(super) fn relationship(part: &mut XmlPart, id: usize, kind: &str, target: &str) -> XlsxResult<()> {
    part.tag("Relationship")
        .attr("Id", format!("rId{id}"))
        .attr("Type", format!("{REL_NS}/{kind}"))
        .attr("Target", target)
        .empty()
}

fn content_types(workbook: &Workbook) -> XlsxResult<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.tag("Types").attr("xmlns", CONTENT_TYPES_NS).open()?;

    for (extension, content_type) in [
        ("rels", "application/vnd.openxmlformats-package.relationships+xml"),
        ("xml", "application/xml"),
        ("vml", "application/vnd.openxmlformats-officedocument.vmlDrawing"),
    ] {
        part.tag("Default")
            .attr("Extension", extension)
            .attr("ContentType", content_type)
            .empty()?;
    }

    let mut overrides = vec![
        ("/xl/workbook.xml".to_string(), format!("{SPREADSHEETML}.sheet.main+xml")),
        ("/xl/styles.xml".to_string(), format!("{SPREADSHEETML}.styles+xml")),
        (
            "/xl/theme/theme1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.theme+xml".to_string(),
        ),
    ];
    for (i, worksheet) in workbook.worksheets().enumerate() {
        let n = i + 1;
        overrides.push((
            format!("/xl/worksheets/sheet{n}.xml"),
            format!("{SPREADSHEETML}.worksheet+xml"),
        ));
        if worksheet.comment_count() > 0 {
            overrides.push((
                format!("/xl/comments{n}.xml"),
                format!("{SPREADSHEETML}.comments+xml"),
            ));
        }
    }
    for (name, content_type) in &overrides {
        part.tag("Override")
            .attr("PartName", name)
            .attr("ContentType", content_type)
            .empty()?;
    }

    part.close("Types")?;
    Ok(part.into_bytes())
}

fn root_rels() -> XlsxResult<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.tag("Relationships").attr("xmlns", PACKAGE_REL_NS).open()?;
    relationship(&mut part, 1, "officeDocument", "xl/workbook.xml")?;
    part.close("Relationships")?;
    Ok(part.into_bytes())
}

fn workbook_xml(workbook: &Workbook) -> XlsxResult<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.tag("workbook")
        .attr("xmlns", MAIN_NS)
        .attr("xmlns:r", REL_NS)
        .open()?;
    part.tag("sheets").open()?;
    for (i, worksheet) in workbook.worksheets().enumerate() {
        part.tag("sheet")
            .attr("name", worksheet.name())
            .attr("sheetId", i + 1)
            .attr("r:id", format!("rId{}", i + 1))
            .empty()?;
    }
    part.close("sheets")?;
    part.close("workbook")?;
    Ok(part.into_bytes())
}

/// Sheets take `rId1..=rIdN`; styles and theme follow
fn workbook_rels(workbook: &Workbook) -> XlsxResult<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.tag("Relationships").attr("xmlns", PACKAGE_REL_NS).open()?;
    let sheets = workbook.sheet_count();
    for n in 1..=sheets {
        relationship(&mut part, n, "worksheet", &format!("worksheets/sheet{n}.xml"))?;
    }
    relationship(&mut part, sheets + 1, "styles", "styles.xml")?;
    relationship(&mut part, sheets + 2, "theme", "theme/theme1.xml")?;
    part.close("Relationships")?;
    Ok(part.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn part_text(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut text = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_empty_workbook_is_rejected() {
        let err = XlsxWriter::write(&Workbook::empty(), Cursor::new(Vec::new())).unwrap_err();
        assert!(matches!(err, XlsxError::InvalidFormat(_)));
    }

    #[test]
    fn test_package_layout() {
        let mut wb = Workbook::new();
        wb.add_worksheet_with_name("R&D").unwrap();
        let mut out = Cursor::new(Vec::new());
        XlsxWriter::write(&wb, &mut out).unwrap();
        let bytes = out.into_inner();

        let workbook = part_text(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"<sheet name="R&amp;D" sheetId="2" r:id="rId2"/>"#));

        let rels = part_text(&bytes, "xl/_rels/workbook.xml.rels");
        assert!(rels.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles""#));
        assert!(rels.contains(r#"Target="theme/theme1.xml""#));

        let types = part_text(&bytes, "[Content_Types].xml");
        assert!(types.contains(r#"PartName="/xl/worksheets/sheet2.xml""#));
        assert!(!types.contains("comments"));
    }
}
