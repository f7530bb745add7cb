//! Cell comments: the comments part, the sheet rels pointing at it, and the
//! legacy VML drawing Excel needs before it shows a note

use std::collections::HashMap;

use super::relationship;
use super::sheet::LEGACY_DRAWING_REL;
use crate::error::XlsxResult;
use crate::xml::{XmlPart, MAIN_NS, PACKAGE_REL_NS};
use styleframe_core::{CellAddress, Worksheet};

/// Rels of `sheet{n}.xml`: the comments part and its drawing
pub(super) fn sheet_rels(n: usize) -> XlsxResult<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.tag("Relationships").attr("xmlns", PACKAGE_REL_NS).open()?;
    relationship(&mut part, 1, "comments", &format!("../comments{n}.xml"))?;
    relationship(
        &mut part,
        LEGACY_DRAWING_REL,
        "vmlDrawing",
        &format!("../drawings/vmlDrawing{n}.vml"),
    )?;
    part.close("Relationships")?;
    Ok(part.into_bytes())
}

pub(super) fn comments_xml(sheet: &Worksheet) -> XlsxResult<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.tag("comments").attr("xmlns", MAIN_NS).open()?;

    let authors = sheet.comment_authors();
    part.tag("authors").open()?;
    if authors.is_empty() {
        part.tag("author").text("")?;
    }
    for author in authors {
        part.tag("author").text(author)?;
    }
    part.close("authors")?;

    let author_ids: HashMap<&str, usize> = authors
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    part.tag("commentList").open()?;
    for ((row, col), comment) in sheet.comments() {
        part.tag("comment")
            .attr("ref", CellAddress::new(row, col))
            .attr("authorId", author_ids.get(comment.author.as_str()).copied().unwrap_or(0))
            .open()?;
        part.tag("text").open()?;
        part.tag("r").open()?;
        part.tag("t").attr("xml:space", "preserve").text(&comment.text)?;
        part.close("r")?;
        part.close("text")?;
        part.close("comment")?;
    }
    part.close("commentList")?;

    part.close("comments")?;
    Ok(part.into_bytes())
}

/// First shape id in drawing block 1
const FIRST_SHAPE_ID: usize = 1025;

const NOTE_BOX_STYLE: &str =
    "position:absolute;margin-left:59.25pt;margin-top:1.5pt;width:108pt;height:59.25pt";
const NOTE_FILL: &str = "#ffffe1";

pub(super) fn vml_drawing(sheet: &Worksheet) -> XlsxResult<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.tag("xml")
        .attr("xmlns:v", "urn:schemas-microsoft-com:vml")
        .attr("xmlns:o", "urn:schemas-microsoft-com:office:office")
        .attr("xmlns:x", "urn:schemas-microsoft-com:office:excel")
        .open()?;

    part.tag("o:shapelayout").attr("v:ext", "edit").open()?;
    part.tag("o:idmap").attr("v:ext", "edit").attr("data", 1).empty()?;
    part.close("o:shapelayout")?;

    // Shape type 202 is the text box every note shape refers to
    part.tag("v:shapetype")
        .attr("id", "_x0000_t202")
        .attr("coordsize", "21600,21600")
        .attr("o:spt", 202)
        .attr("path", "m,l,21600r21600,l21600,xe")
        .open()?;
    part.tag("v:stroke").attr("joinstyle", "miter").empty()?;
    part.tag("v:path")
        .attr("gradientshapeok", "t")
        .attr("o:connecttype", "rect")
        .empty()?;
    part.close("v:shapetype")?;

    for (i, ((row, col), comment)) in sheet.comments().into_iter().enumerate() {
        let visibility = if comment.visible { "visible" } else { "hidden" };
        part.tag("v:shape")
            .attr("id", format!("_x0000_s{}", FIRST_SHAPE_ID + i))
            .attr("type", "#_x0000_t202")
            .attr(
                "style",
                format!("{NOTE_BOX_STYLE};z-index:{};visibility:{visibility}", i + 1),
            )
            .attr("fillcolor", NOTE_FILL)
            .attr("o:insetmode", "auto")
            .open()?;
        part.tag("v:fill").attr("color2", NOTE_FILL).empty()?;
        part.tag("v:shadow")
            .attr("on", "t")
            .attr("color", "black")
            .attr("obscured", "t")
            .empty()?;
        part.tag("v:path").attr("o:connecttype", "none").empty()?;
        part.tag("v:textbox").attr("style", "mso-direction-alt:auto").open()?;
        part.tag("div").attr("style", "text-align:left").text("")?;
        part.close("v:textbox")?;

        part.tag("x:ClientData").attr("ObjectType", "Note").open()?;
        part.tag("x:MoveWithCells").empty()?;
        part.tag("x:SizeWithCells").empty()?;
        part.tag("x:AutoFill").text("False")?;
        part.tag("x:Row").text(&row.to_string())?;
        part.tag("x:Column").text(&col.to_string())?;
        if comment.visible {
            part.tag("x:Visible").empty()?;
        }
        part.close("x:ClientData")?;
        part.close("v:shape")?;
    }

    part.close("xml")?;
    Ok(part.into_bytes())
}
