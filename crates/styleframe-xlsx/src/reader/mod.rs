//! XLSX reader
//!
//! Sheets are located the way Excel does it: `workbook.xml` lists them by
//! relationship id and `workbook.xml.rels` maps each id to a part. Shared
//! strings, styles and the theme are optional.

mod comments;
mod sheet;

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use zip::ZipArchive;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::read_styles_xml;
use crate::theme::read_theme_xml;
use crate::xml::{attr_value, for_each_event};
use styleframe_core::style::Style;
use styleframe_core::Workbook;

/// Expand `_xHHHH_` escapes, which Excel uses for control characters
/// (`_x000D_` is CR, `_x005F_` a literal underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(at) = rest.find("_x") {
        out.push_str(&rest[..at]);
        let tail = &rest[at..];
        let escaped = tail
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| tail.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match escaped {
            Some(c) => {
                out.push(c);
                rest = &tail[7..];
            }
            None => {
                out.push_str("_x");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// `Relationship` entry of a `.rels` part
#[derive(Debug, Clone)]
struct Relationship {
    id: String,
    kind: String,
    /// Archive path, already resolved against the source part's folder
    target: String,
}

impl Relationship {
    fn is(&self, kind: &str) -> bool {
        self.kind.rsplit('/').next() == Some(kind)
    }
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let path = path.as_ref();
        log::debug!("reading workbook from {}", path.display());
        Self::read(File::open(path)?)
    }

    /// Read a workbook from any seekable source
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut package = Package {
            archive: ZipArchive::new(reader)?,
        };
        if package.part("[Content_Types].xml").is_none() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = match package.part("xl/sharedStrings.xml") {
            Some(part) => read_shared_strings(part)?,
            None => Vec::new(),
        };
        let styles = match package.part("xl/styles.xml") {
            Some(part) => read_styles_xml(part)?,
            None => vec![Style::default()],
        };
        let sheets = read_sheet_list(package.required("xl/workbook.xml")?)?;
        let rels = package
            .rels("xl/_rels/workbook.xml.rels", "xl")?
            .ok_or_else(|| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut workbook = Workbook::empty();
        if let Some(theme) = rels.iter().find(|r| r.is("theme")) {
            match package.part(&theme.target) {
                Some(part) => workbook.set_theme(read_theme_xml(part)?),
                None => log::warn!("theme part {} is missing", theme.target),
            }
        }

        for (name, rel_id) in &sheets {
            let Some(rel) = rels.iter().find(|r| &r.id == rel_id && r.is("worksheet")) else {
                log::warn!("sheet '{name}' has no worksheet relationship; skipping");
                continue;
            };
            let index = workbook.add_worksheet_with_name(name)?;
            let worksheet = workbook
                .worksheet_mut(index)
                .ok_or_else(|| XlsxError::InvalidFormat(format!("sheet '{name}' vanished")))?;

            log::debug!("reading sheet '{name}' from {}", rel.target);
            sheet::read_worksheet(
                package.required(&rel.target)?,
                worksheet,
                &shared_strings,
                &styles,
            )?;

            let (dir, file) = rel.target.rsplit_once('/').unwrap_or(("", rel.target.as_str()));
            let sheet_rels = package.rels(&format!("{dir}/_rels/{file}.rels"), dir)?;
            if let Some(target) = sheet_rels
                .iter()
                .flatten()
                .find(|r| r.is("comments"))
                .map(|r| r.target.clone())
            {
                comments::read_comments(package.required(&target)?, worksheet)?;
            }
        }

        if workbook.is_empty() {
            return Err(XlsxError::InvalidFormat("workbook has no sheets".into()));
        }
        Ok(workbook)
    }
}

struct Package<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> Package<R> {
    fn part(&mut self, name: &str) -> Option<impl Read + '_> {
        self.archive.by_name(name).ok()
    }

    fn required(&mut self, name: &str) -> XlsxResult<impl Read + '_> {
        self.archive
            .by_name(name)
            .map_err(|_| XlsxError::MissingPart(name.to_string()))
    }

    /// Relationships of a `.rels` part, or `None` when it does not exist
    fn rels(&mut self, name: &str, base_dir: &str) -> XlsxResult<Option<Vec<Relationship>>> {
        let Some(part) = self.part(name) else {
            return Ok(None);
        };
        let mut rels = Vec::new();
        for_each_event(part, true, |event| {
            if let Event::Start(e) | Event::Empty(e) = event {
                if e.name().as_ref() == b"Relationship" {
                    let id = attr_value(&e, b"Id");
                    let kind = attr_value(&e, b"Type");
                    let target = attr_value(&e, b"Target");
                    if let (Some(id), Some(kind), Some(target)) = (id, kind, target) {
                        rels.push(Relationship {
                            id,
                            kind,
                            target: resolve_target(base_dir, &target),
                        });
                    }
                }
            }
            Ok(())
        })?;
        Ok(Some(rels))
    }
}

/// `(name, relationship id)` of every `<sheet>` in workbook order
fn read_sheet_list(part: impl Read) -> XlsxResult<Vec<(String, String)>> {
    let mut sheets = Vec::new();
    for_each_event(part, true, |event| {
        if let Event::Start(e) | Event::Empty(e) = event {
            if e.name().as_ref() == b"sheet" {
                // the relationships prefix is usually `r:` but not always
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref().ends_with(b":id"))
                    .and_then(|a| a.unescape_value().ok())
                    .map(|v| v.into_owned());
                if let (Some(name), Some(rel_id)) = (attr_value(&e, b"name"), rel_id) {
                    sheets.push((name, rel_id));
                }
            }
        }
        Ok(())
    })?;
    Ok(sheets)
}

/// Plain text of each `<si>`, rich runs joined and phonetic runs dropped
fn read_shared_strings(part: impl Read) -> XlsxResult<Vec<String>> {
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_phonetic = false;

    for_each_event(part, false, |event| {
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"si" => current = Some(String::new()),
                b"rPh" => in_phonetic = true,
                b"t" => in_text = current.is_some() && !in_phonetic,
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(e) if in_text => {
                if let Some(current) = current.as_mut() {
                    current.push_str(&e.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"si" => strings.extend(current.take().map(|s| decode_excel_escapes(&s))),
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            _ => {}
        }
        Ok(())
    })?;

    log::debug!("read {} shared strings", strings.len());
    Ok(strings)
}

/// Archive path of a relationship target relative to `base_dir`
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut path: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                path.pop();
            }
            name => path.push(name),
        }
    }
    path.join("/")
}
