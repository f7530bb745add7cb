//! Theme part (xl/theme/theme1.xml)
//!
//! Only the color scheme is modeled. Fonts and effects are written as the
//! stock Office values so the part stays valid.

use std::io::Read;

use quick_xml::events::Event;

use crate::error::XlsxResult;
use crate::xml::{attr_value, for_each_event, XmlPart};
use styleframe_core::ThemePalette;

const DRAWINGML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// Scheme slots in `<color theme="n">` order
const SLOT_TAGS: [&str; ThemePalette::SLOTS] = [
    "a:lt1", "a:dk1", "a:lt2", "a:dk2", "a:accent1", "a:accent2", "a:accent3", "a:accent4",
    "a:accent5", "a:accent6",
];

/// Everything after the color scheme's slots, identical in every theme we write
const STOCK_THEME_TAIL: &str = concat!(
    r#"<a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme>"#,
    r#"<a:fontScheme name="Office"><a:majorFont><a:latin typeface="Cambria"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
    r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme>"#,
    r#"<a:fmtScheme name="Office"><a:fillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:fillStyleLst><a:lnStyleLst>"#,
    r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"</a:lnStyleLst><a:effectStyleLst>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"</a:effectStyleLst><a:bgFillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/>"#,
);

fn slot_of(local_name: &[u8]) -> Option<usize> {
    SLOT_TAGS
        .iter()
        .position(|tag| tag.as_bytes()[2..] == *local_name)
}

/// Parse the clrScheme of a theme part
///
/// Slots that are missing or unreadable fall back to the stock Office color.
pub(crate) fn read_theme_xml<R: Read>(reader: R) -> XlsxResult<ThemePalette> {
    let mut found: [Option<String>; ThemePalette::SLOTS] = Default::default();
    let mut slot: Option<usize> = None;
    let mut in_scheme = false;

    for_each_event(reader, true, |event| {
        match event {
            Event::Start(e) => {
                let name = e.local_name();
                if name.as_ref() == b"clrScheme" {
                    in_scheme = true;
                } else if in_scheme {
                    slot = slot_of(name.as_ref());
                }
            }
            Event::Empty(e) => {
                // system colors carry their resolved value in lastClr
                let value = match e.local_name().as_ref() {
                    b"srgbClr" => attr_value(&e, b"val"),
                    b"sysClr" => attr_value(&e, b"lastClr"),
                    _ => None,
                };
                if let (Some(slot), Some(value)) = (slot, value) {
                    found[slot] = Some(value);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"clrScheme" => in_scheme = false,
                name if slot_of(name).is_some() => slot = None,
                _ => {}
            },
            _ => {}
        }
        Ok(())
    })?;

    let defaults = ThemePalette::office_default();
    let colors = found.into_iter().enumerate().map(|(i, hex)| {
        hex.unwrap_or_else(|| {
            log::warn!("theme is missing {}; using the Office color", SLOT_TAGS[i]);
            defaults.get(i).unwrap_or("000000").to_string()
        })
    });
    Ok(ThemePalette::new(colors))
}

/// A theme part carrying `palette` as its color scheme
pub(crate) fn theme_xml(palette: &ThemePalette) -> XlsxResult<Vec<u8>> {
    let defaults = ThemePalette::office_default();
    let mut part = XmlPart::new()?;
    part.tag("a:theme")
        .attr("xmlns:a", DRAWINGML_NS)
        .attr("name", "Office Theme")
        .open()?;
    part.tag("a:themeElements").open()?;
    part.tag("a:clrScheme").attr("name", "Office").open()?;
    for (i, tag) in SLOT_TAGS.into_iter().enumerate() {
        let hex = palette
            .get(i)
            .or_else(|| defaults.get(i))
            .unwrap_or("000000");
        part.tag(tag).open()?;
        part.tag("a:srgbClr").attr("val", hex).empty()?;
        part.close(tag)?;
    }
    part.raw(STOCK_THEME_TAIL)?;
    part.close("a:theme")?;
    Ok(part.into_bytes())
}
