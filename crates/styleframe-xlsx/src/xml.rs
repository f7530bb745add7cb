//! quick-xml plumbing shared by every part

use std::fmt::Display;
use std::io::{BufReader, Read};
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use crate::error::XlsxResult;

pub(crate) const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const PACKAGE_REL_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

/// An XML document being written, starting with the standalone declaration
pub(crate) struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    pub(crate) fn new() -> XlsxResult<Self> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { writer })
    }

    /// Begin an element; finish it with [`Tag::empty`], [`Tag::open`] or [`Tag::text`]
    pub(crate) fn tag(&mut self, name: &'static str) -> Tag<'_> {
        Tag {
            part: self,
            name,
            start: BytesStart::new(name),
        }
    }

    pub(crate) fn close(&mut self, name: &'static str) -> XlsxResult<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Pre-serialized markup, written unchanged
    pub(crate) fn raw(&mut self, markup: &'static str) -> XlsxResult<()> {
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(markup)))?;
        Ok(())
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

pub(crate) struct Tag<'p> {
    part: &'p mut XmlPart,
    name: &'static str,
    start: BytesStart<'static>,
}

impl Tag<'_> {
    pub(crate) fn attr(mut self, key: &str, value: impl Display) -> Self {
        let value = value.to_string();
        self.start.push_attribute((key, value.as_str()));
        self
    }

    pub(crate) fn attr_if(self, condition: bool, key: &str, value: impl Display) -> Self {
        if condition {
            self.attr(key, value)
        } else {
            self
        }
    }

    pub(crate) fn attr_opt(self, key: &str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.attr(key, value),
            None => self,
        }
    }

    /// `<name .../>`
    pub(crate) fn empty(self) -> XlsxResult<()> {
        self.part.writer.write_event(Event::Empty(self.start))?;
        Ok(())
    }

    /// `<name ...>`, closed later with [`XmlPart::close`]
    pub(crate) fn open(self) -> XlsxResult<()> {
        self.part.writer.write_event(Event::Start(self.start))?;
        Ok(())
    }

    /// `<name ...>text</name>` with the text escaped
    pub(crate) fn text(self, text: &str) -> XlsxResult<()> {
        let Tag { part, name, start } = self;
        part.writer.write_event(Event::Start(start))?;
        part.writer.write_event(Event::Text(BytesText::new(text)))?;
        part.close(name)
    }
}

/// Hand every event of `source` to `handle`, stopping at the end of input
///
/// Text is trimmed only when `trim` is set; cell and comment text keeps its
/// whitespace.
pub(crate) fn for_each_event<R: Read>(
    source: R,
    trim: bool,
    mut handle: impl FnMut(Event<'_>) -> XlsxResult<()>,
) -> XlsxResult<()> {
    let mut xml = Reader::from_reader(BufReader::new(source));
    xml.trim_text(trim);
    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Eof => return Ok(()),
            event => handle(event)?,
        }
        buf.clear();
    }
}

/// Unescaped value of an attribute, matched on its qualified name
pub(crate) fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

pub(crate) fn attr_num<T: FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    attr_value(e, key)?.parse().ok()
}

/// xsd:boolean, `1`/`true` or `0`/`false`
pub(crate) fn attr_flag(e: &BytesStart<'_>, key: &[u8]) -> Option<bool> {
    attr_value(e, key).map(|v| v == "1" || v == "true")
}
