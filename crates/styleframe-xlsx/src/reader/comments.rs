//! Comments part linked from a worksheet's rels

use std::io::Read;

use quick_xml::events::Event;

use super::decode_excel_escapes;
use crate::error::XlsxResult;
use crate::xml::{attr_num, attr_value, for_each_event};
use styleframe_core::{CellAddress, CellComment, Worksheet};

#[derive(Debug, Default)]
struct OpenComment {
    reference: String,
    author_id: Option<usize>,
    text: String,
    in_text: bool,
}

pub(super) fn read_comments(part: impl Read, worksheet: &mut Worksheet) -> XlsxResult<()> {
    let mut authors: Vec<String> = Vec::new();
    let mut author: Option<String> = None;
    let mut comment: Option<OpenComment> = None;

    for_each_event(part, false, |event| {
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"author" => author = Some(String::new()),
                b"comment" => {
                    comment = Some(OpenComment {
                        reference: attr_value(&e, b"ref").unwrap_or_default(),
                        author_id: attr_num(&e, b"authorId"),
                        ..OpenComment::default()
                    })
                }
                b"t" => {
                    if let Some(open) = comment.as_mut() {
                        open.in_text = true;
                    }
                }
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"author" => authors.push(String::new()),
            Event::Text(e) => {
                if let Some(name) = author.as_mut() {
                    name.push_str(&e.unescape()?);
                } else if let Some(open) = comment.as_mut().filter(|c| c.in_text) {
                    open.text.push_str(&e.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"author" => authors.extend(author.take()),
                b"t" => {
                    if let Some(open) = comment.as_mut() {
                        open.in_text = false;
                    }
                }
                b"comment" => {
                    if let Some(open) = comment.take() {
                        attach(worksheet, &authors, open);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        Ok(())
    })
}

fn attach(worksheet: &mut Worksheet, authors: &[String], open: OpenComment) {
    let at = match CellAddress::parse(&open.reference) {
        Ok(at) => at,
        Err(err) => {
            log::warn!("skipping comment on '{}': {err}", open.reference);
            return;
        }
    };
    let author = open
        .author_id
        .and_then(|id| authors.get(id))
        .cloned()
        .unwrap_or_default();
    let note = CellComment::new(author, decode_excel_escapes(&open.text));
    worksheet.set_comment_at(at.row, at.col, note);
}
