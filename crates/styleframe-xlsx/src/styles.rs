//! `xl/styles.xml`
//!
//! Writing flattens every sheet's style pool into one `cellXfs` list and
//! splits each style into shared font, fill, border and number format
//! records. Reading does the reverse and yields one [`Style`] per `cellXfs`
//! entry.

use std::collections::HashMap;
use std::hash::Hash;
use std::io::Read;

use quick_xml::events::{BytesStart, Event};

use crate::error::XlsxResult;
use crate::xml::{attr_flag, attr_num, attr_value, for_each_event, XmlPart, MAIN_NS};
use styleframe_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    NumberFormat, PatternType, Protection, Style, Underline,
};
use styleframe_core::Workbook;

/// Ids below this are reserved for built-in number formats
const FIRST_CUSTOM_NUM_FMT: u32 = 164;

/// Distinct values in first-seen order
#[derive(Debug)]
struct Interner<T> {
    items: Vec<T>,
    ids: HashMap<T, u32>,
}

impl<T: Clone + Eq + Hash> Interner<T> {
    fn seeded(first: impl IntoIterator<Item = T>) -> Self {
        let mut interner = Self {
            items: Vec::new(),
            ids: HashMap::new(),
        };
        for item in first {
            interner.id(&item);
        }
        interner
    }

    fn id(&mut self, item: &T) -> u32 {
        if let Some(&id) = self.ids.get(item) {
            return id;
        }
        let id = self.items.len() as u32;
        self.items.push(item.clone());
        self.ids.insert(item.clone(), id);
        id
    }
}

/// Workbook-wide cell formats
#[derive(Debug)]
pub(crate) struct StyleTable {
    /// Position is the `s` attribute written on cells; 0 is the default style
    formats: Interner<Style>,
    /// Per sheet: style pool index to position in `formats`
    sheet_maps: Vec<HashMap<u32, u32>>,
}

/// Record ids one `<xf>` points at
struct XfIds {
    num_fmt: u32,
    font: u32,
    fill: u32,
    border: u32,
}

impl StyleTable {
    pub(crate) fn build(workbook: &Workbook) -> Self {
        let mut formats = Interner::seeded([Style::default()]);
        let sheet_maps = workbook
            .worksheets()
            .map(|sheet| {
                let mut map = HashMap::from([(0, 0)]);
                for (_, _, cell) in sheet.iter_cells() {
                    if map.contains_key(&cell.style_index) {
                        continue;
                    }
                    let style = sheet.style_by_index(cell.style_index).cloned().unwrap_or_default();
                    map.insert(cell.style_index, formats.id(&style));
                }
                map
            })
            .collect();
        log::debug!("{} distinct cell formats", formats.items.len());
        Self {
            formats,
            sheet_maps,
        }
    }

    /// `s` attribute for a cell of sheet `sheet` with pool index `pool_index`
    pub(crate) fn xf_id_for(&self, sheet: usize, pool_index: u32) -> u32 {
        self.sheet_maps
            .get(sheet)
            .and_then(|map| map.get(&pool_index))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn to_styles_xml(&self) -> XlsxResult<Vec<u8>> {
        let mut fonts = Interner::seeded([FontStyle::default()]);
        // Applications expect fills 0 and 1 to be "none" and "gray125"
        let mut fills = Interner::seeded([
            FillStyle::None,
            FillStyle::pattern(PatternType::Gray125, Color::Auto, Color::Auto),
        ]);
        let mut borders = Interner::seeded([BorderStyle::default()]);
        let mut custom_formats: Interner<String> = Interner::seeded([]);

        let xfs: Vec<XfIds> = self
            .formats
            .items
            .iter()
            .map(|style| XfIds {
                num_fmt: match &style.number_format {
                    NumberFormat::General => 0,
                    NumberFormat::BuiltIn(id) => *id,
                    NumberFormat::Custom(code) => FIRST_CUSTOM_NUM_FMT + custom_formats.id(code),
                },
                font: fonts.id(&style.font),
                fill: fills.id(&style.fill),
                border: borders.id(&style.border),
            })
            .collect();

        let mut part = XmlPart::new()?;
        part.tag("styleSheet").attr("xmlns", MAIN_NS).open()?;

        if !custom_formats.items.is_empty() {
            write_list(&mut part, "numFmts", &custom_formats.items, |part, code| {
                let id = FIRST_CUSTOM_NUM_FMT + custom_formats.ids[code];
                part.tag("numFmt")
                    .attr("numFmtId", id)
                    .attr("formatCode", code)
                    .empty()
            })?;
        }
        write_list(&mut part, "fonts", &fonts.items, write_font)?;
        write_list(&mut part, "fills", &fills.items, write_fill)?;
        write_list(&mut part, "borders", &borders.items, write_border)?;

        part.tag("cellStyleXfs").attr("count", 1).open()?;
        part.tag("xf")
            .attr("numFmtId", 0)
            .attr("fontId", 0)
            .attr("fillId", 0)
            .attr("borderId", 0)
            .empty()?;
        part.close("cellStyleXfs")?;

        let records: Vec<(&Style, &XfIds)> = self.formats.items.iter().zip(&xfs).collect();
        write_list(&mut part, "cellXfs", &records, |part, (style, ids)| {
            write_xf(part, style, ids)
        })?;

        part.tag("cellStyles").attr("count", 1).open()?;
        part.tag("cellStyle")
            .attr("name", "Normal")
            .attr("xfId", 0)
            .attr("builtinId", 0)
            .empty()?;
        part.close("cellStyles")?;
        part.tag("dxfs").attr("count", 0).empty()?;
        part.tag("tableStyles")
            .attr("count", 0)
            .attr("defaultTableStyle", "TableStyleMedium9")
            .attr("defaultPivotStyle", "PivotStyleLight16")
            .empty()?;

        part.close("styleSheet")?;
        Ok(part.into_bytes())
    }
}

/// `<tag count="n">` around one record per item
fn write_list<T>(
    part: &mut XmlPart,
    tag: &'static str,
    items: &[T],
    mut each: impl FnMut(&mut XmlPart, &T) -> XlsxResult<()>,
) -> XlsxResult<()> {
    part.tag(tag).attr("count", items.len()).open()?;
    for item in items {
        each(part, item)?;
    }
    part.close(tag)
}

/// `<fgColor>`, `<color>` and friends
pub(crate) fn write_color(part: &mut XmlPart, tag: &'static str, color: &Color) -> XlsxResult<()> {
    let element = part.tag(tag);
    match *color {
        Color::Auto => element.attr("auto", 1),
        Color::Rgb { .. } => element.attr("rgb", format!("FF{}", color.to_hex())),
        Color::Argb { .. } => element.attr("rgb", color.to_hex()),
        Color::Indexed(i) => element.attr("indexed", i),
        Color::Theme { index, tint } => element
            .attr("theme", index)
            .attr_if(tint != 0.0, "tint", tint),
    }
    .empty()
}

fn write_font(part: &mut XmlPart, font: &FontStyle) -> XlsxResult<()> {
    part.tag("font").open()?;
    for (on, tag) in [(font.bold, "b"), (font.italic, "i"), (font.strikethrough, "strike")] {
        if on {
            part.tag(tag).empty()?;
        }
    }
    match font.underline {
        Underline::None => {}
        Underline::Single => part.tag("u").empty()?,
        other => part.tag("u").attr("val", other).empty()?,
    }
    part.tag("sz").attr("val", font.size).empty()?;
    if !font.color.is_auto() {
        write_color(part, "color", &font.color)?;
    }
    part.tag("name").attr("val", &font.name).empty()?;
    part.close("font")
}

fn write_fill(part: &mut XmlPart, fill: &FillStyle) -> XlsxResult<()> {
    part.tag("fill").open()?;
    match fill {
        FillStyle::None => part.tag("patternFill").attr("patternType", "none").empty()?,
        FillStyle::Solid { color } => {
            part.tag("patternFill").attr("patternType", "solid").open()?;
            write_color(part, "fgColor", color)?;
            part.tag("bgColor").attr("indexed", 64).empty()?;
            part.close("patternFill")?;
        }
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => {
            part.tag("patternFill").attr("patternType", pattern).open()?;
            write_color(part, "fgColor", foreground)?;
            write_color(part, "bgColor", background)?;
            part.close("patternFill")?;
        }
    }
    part.close("fill")
}

fn write_border(part: &mut XmlPart, border: &BorderStyle) -> XlsxResult<()> {
    part.tag("border").open()?;
    for (tag, edge) in border.edges() {
        match edge {
            Some(edge) if edge.style != BorderLineStyle::None => {
                part.tag(tag).attr("style", edge.style).open()?;
                write_color(part, "color", &edge.color)?;
                part.close(tag)?;
            }
            _ => part.tag(tag).empty()?,
        }
    }
    part.tag("diagonal").empty()?;
    part.close("border")
}

fn write_xf(part: &mut XmlPart, style: &Style, ids: &XfIds) -> XlsxResult<()> {
    let al = &style.alignment;
    let default_al = Alignment::default();
    let has_alignment = *al != default_al;
    let has_protection = style.protection != Protection::default();

    let xf = part
        .tag("xf")
        .attr("numFmtId", ids.num_fmt)
        .attr("fontId", ids.font)
        .attr("fillId", ids.fill)
        .attr("borderId", ids.border)
        .attr("xfId", 0)
        .attr_if(ids.num_fmt != 0, "applyNumberFormat", 1)
        .attr_if(ids.font != 0, "applyFont", 1)
        .attr_if(ids.fill != 0, "applyFill", 1)
        .attr_if(ids.border != 0, "applyBorder", 1)
        .attr_if(has_alignment, "applyAlignment", 1)
        .attr_if(has_protection, "applyProtection", 1);
    if !has_alignment && !has_protection {
        return xf.empty();
    }
    xf.open()?;

    if has_alignment {
        part.tag("alignment")
            .attr_if(al.horizontal != default_al.horizontal, "horizontal", al.horizontal)
            .attr_if(al.vertical != default_al.vertical, "vertical", al.vertical)
            .attr_if(al.wrap_text, "wrapText", 1)
            .attr_if(al.shrink_to_fit, "shrinkToFit", 1)
            .attr_if(al.indent != 0, "indent", al.indent)
            .attr_if(al.rotation != 0, "textRotation", al.rotation)
            .empty()?;
    }
    if has_protection {
        part.tag("protection")
            .attr("locked", u8::from(style.protection.locked))
            .attr("hidden", u8::from(style.protection.hidden))
            .empty()?;
    }
    part.close("xf")
}

/// A `<color>`-like element; `rgb` wins over `theme`, which wins over `indexed`
pub(crate) fn parse_color_attrs(e: &BytesStart<'_>) -> Color {
    if let Some(color) = attr_value(e, b"rgb").and_then(|hex| Color::from_hex(&hex)) {
        return color;
    }
    if let Some(index) = attr_num::<u8>(e, b"theme") {
        return Color::theme(index, attr_num(e, b"tint").unwrap_or(0.0));
    }
    match attr_num::<u8>(e, b"indexed") {
        // 64 is the system foreground
        Some(64) | None => Color::Auto,
        Some(i) => Color::Indexed(i),
    }
}

/// The `<xf>` being read: record ids plus its inline children
#[derive(Debug, Default)]
struct XfRecord {
    num_fmt_id: u32,
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    alignment: Alignment,
    protection: Protection,
}

#[derive(Debug, Default)]
struct PendingFill {
    pattern: Option<PatternType>,
    foreground: Color,
    background: Color,
}

impl PendingFill {
    fn finish(self) -> FillStyle {
        match self.pattern.unwrap_or_default() {
            PatternType::None => FillStyle::None,
            PatternType::Solid => FillStyle::solid(self.foreground),
            pattern => FillStyle::pattern(pattern, self.foreground, self.background),
        }
    }
}

/// Tables collected from styles.xml plus the record currently open
///
/// Self-closing elements are opened and immediately closed, so `<xf/>`,
/// `<font/>` and empty border edges are handled like their long forms.
#[derive(Debug, Default)]
struct StylesParser {
    num_fmts: HashMap<u32, String>,
    fonts: Vec<FontStyle>,
    fills: Vec<FillStyle>,
    borders: Vec<BorderStyle>,
    cell_xfs: Vec<Style>,

    font: Option<FontStyle>,
    fill: Option<PendingFill>,
    border: Option<BorderStyle>,
    edge: Option<&'static str>,
    xf: Option<XfRecord>,
    in_cell_xfs: bool,
}

fn edge_tag(name: &[u8]) -> Option<&'static str> {
    Some(match name {
        b"left" => "left",
        b"right" => "right",
        b"top" => "top",
        b"bottom" => "bottom",
        _ => return None,
    })
}

impl StylesParser {
    fn open(&mut self, e: &BytesStart<'_>) {
        let name = e.name();
        match name.as_ref() {
            b"numFmt" => {
                if let (Some(id), Some(code)) = (attr_num(e, b"numFmtId"), attr_value(e, b"formatCode")) {
                    self.num_fmts.insert(id, code);
                }
            }
            b"cellXfs" => self.in_cell_xfs = true,
            b"font" => self.font = Some(FontStyle::default()),
            b"b" | b"i" | b"strike" | b"u" | b"sz" | b"name" => {
                if let Some(font) = self.font.as_mut() {
                    read_font_child(font, e);
                }
            }
            b"fill" => self.fill = Some(PendingFill::default()),
            b"patternFill" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.pattern = attr_value(e, b"patternType").and_then(|v| v.parse().ok());
                }
            }
            b"fgColor" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.foreground = parse_color_attrs(e);
                }
            }
            b"bgColor" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.background = parse_color_attrs(e);
                }
            }
            b"border" => self.border = Some(BorderStyle::default()),
            tag if self.border.is_some() && edge_tag(tag).is_some() => {
                self.edge = edge_tag(tag);
                let style: BorderLineStyle = attr_value(e, b"style")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_default();
                if let (Some(border), Some(tag), false) =
                    (self.border.as_mut(), self.edge, style == BorderLineStyle::None)
                {
                    if let Some(slot) = border.edge_mut(tag) {
                        *slot = Some(BorderEdge {
                            style,
                            color: Color::Auto,
                        });
                    }
                }
            }
            b"color" => {
                let color = parse_color_attrs(e);
                if let Some(font) = self.font.as_mut() {
                    font.color = color;
                } else if let (Some(border), Some(tag)) = (self.border.as_mut(), self.edge) {
                    if let Some(Some(edge)) = border.edge_mut(tag) {
                        edge.color = color;
                    }
                }
            }
            b"xf" if self.in_cell_xfs => {
                self.xf = Some(XfRecord {
                    num_fmt_id: attr_num(e, b"numFmtId").unwrap_or(0),
                    font_id: attr_num(e, b"fontId").unwrap_or(0),
                    fill_id: attr_num(e, b"fillId").unwrap_or(0),
                    border_id: attr_num(e, b"borderId").unwrap_or(0),
                    ..XfRecord::default()
                });
            }
            b"alignment" => {
                if let Some(xf) = self.xf.as_mut() {
                    read_alignment(&mut xf.alignment, e);
                }
            }
            b"protection" => {
                if let Some(xf) = self.xf.as_mut() {
                    let p = &mut xf.protection;
                    p.locked = attr_flag(e, b"locked").unwrap_or(p.locked);
                    p.hidden = attr_flag(e, b"hidden").unwrap_or(p.hidden);
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"font" => self.fonts.extend(self.font.take()),
            b"fill" => {
                if let Some(fill) = self.fill.take() {
                    self.fills.push(fill.finish());
                }
            }
            b"border" => {
                self.borders.extend(self.border.take());
                self.edge = None;
            }
            tag if edge_tag(tag).is_some() => self.edge = None,
            b"xf" => {
                if let Some(xf) = self.xf.take() {
                    let style = self.style_of(xf);
                    self.cell_xfs.push(style);
                }
            }
            b"cellXfs" => self.in_cell_xfs = false,
            _ => {}
        }
    }

    fn style_of(&self, xf: XfRecord) -> Style {
        Style {
            font: self.fonts.get(xf.font_id).cloned().unwrap_or_default(),
            fill: self.fills.get(xf.fill_id).cloned().unwrap_or_default(),
            border: self.borders.get(xf.border_id).cloned().unwrap_or_default(),
            alignment: xf.alignment,
            protection: xf.protection,
            number_format: match self.num_fmts.get(&xf.num_fmt_id) {
                Some(code) => NumberFormat::from_string(code.as_str()),
                None => NumberFormat::from_id(xf.num_fmt_id),
            },
        }
    }
}

fn read_font_child(font: &mut FontStyle, e: &BytesStart<'_>) {
    // <b val="0"/> switches a flag off
    let flag = attr_flag(e, b"val").unwrap_or(true);
    match e.name().as_ref() {
        b"b" => font.bold = flag,
        b"i" => font.italic = flag,
        b"strike" => font.strikethrough = flag,
        b"u" => {
            font.underline = attr_value(e, b"val")
                .and_then(|v| v.parse().ok())
                .unwrap_or(Underline::Single)
        }
        b"sz" => font.size = attr_num(e, b"val").unwrap_or(font.size),
        b"name" => font.name = attr_value(e, b"val").unwrap_or_else(|| font.name.clone()),
        _ => {}
    }
}

fn read_alignment(al: &mut Alignment, e: &BytesStart<'_>) {
    if let Some(h) = attr_value(e, b"horizontal").and_then(|v| v.parse().ok()) {
        al.horizontal = h;
    }
    if let Some(v) = attr_value(e, b"vertical").and_then(|v| v.parse().ok()) {
        al.vertical = v;
    }
    al.wrap_text = attr_flag(e, b"wrapText").unwrap_or(false);
    al.shrink_to_fit = attr_flag(e, b"shrinkToFit").unwrap_or(false);
    al.indent = attr_num(e, b"indent").unwrap_or(0);
    al.rotation = attr_num(e, b"textRotation").unwrap_or(0);
}

/// One [`Style`] per `cellXfs` entry, at least the default
pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<Vec<Style>> {
    let mut parser = StylesParser::default();
    for_each_event(reader, true, |event| {
        match event {
            Event::Start(e) => parser.open(&e),
            Event::Empty(e) => {
                parser.open(&e);
                parser.close(e.name().as_ref());
            }
            Event::End(e) => parser.close(e.name().as_ref()),
            _ => {}
        }
        Ok(())
    })?;

    log::debug!(
        "styles.xml: {} fonts, {} fills, {} borders, {} cell formats",
        parser.fonts.len(),
        parser.fills.len(),
        parser.borders.len(),
        parser.cell_xfs.len()
    );
    if parser.cell_xfs.is_empty() {
        parser.cell_xfs.push(Style::default());
    }
    Ok(parser.cell_xfs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use styleframe_core::style::{HorizontalAlignment, VerticalAlignment};

    fn styled_workbook(style: &Style) -> Workbook {
        let mut wb = Workbook::new();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_cell_value("A1", "x").unwrap();
        sheet.set_cell_style("A1", style).unwrap();
        wb
    }

    fn styles_xml(wb: &Workbook) -> String {
        String::from_utf8(StyleTable::build(wb).to_styles_xml().unwrap()).unwrap()
    }

    #[test]
    fn test_reserved_fills_come_first() {
        let style = Style::new().fill_color(Color::rgb(255, 255, 0));
        let xml = styles_xml(&styled_workbook(&style));

        let none = xml.find(r#"patternType="none""#).unwrap();
        let gray = xml.find(r#"patternType="gray125""#).unwrap();
        let solid = xml.find(r#"patternType="solid""#).unwrap();
        assert!(none < gray && gray < solid);
        assert!(xml.contains(r#"fillId="2""#));
    }

    #[test]
    fn test_custom_number_formats_are_numbered_from_164() {
        let wb = styled_workbook(&Style::new().number_format("0.000%"));
        let xml = styles_xml(&wb);
        assert!(xml.contains(r#"<numFmt numFmtId="164" formatCode="0.000%"/>"#));
        assert!(xml.contains(r#"numFmtId="164" fontId="0""#));
    }

    #[test]
    fn test_styles_xml_parses_back() {
        let mut style = Style::new()
            .bold(true)
            .font_name("Impact & Co")
            .font_size(20.0)
            .fill_color(Color::argb(0, 255, 255, 0))
            .number_format("0.00")
            .horizontal_alignment(HorizontalAlignment::Center)
            .vertical_alignment(VerticalAlignment::Top)
            .border_all(BorderLineStyle::Thin, Color::Auto)
            .locked(false);
        style.font.underline = Underline::Double;
        style.font.color = Color::theme(4, -0.25);
        style.alignment.wrap_text = true;
        style.alignment.rotation = 90;

        let wb = styled_workbook(&style);
        let table = StyleTable::build(&wb);
        let pool_index = wb.worksheet(0).unwrap().cell_style_index_at(0, 0);
        assert_eq!(table.xf_id_for(0, pool_index), 1);

        let parsed = read_styles_xml(table.to_styles_xml().unwrap().as_slice()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], Style::default());
        assert_eq!(parsed[1], style);
    }

    #[test]
    fn test_color_attribute_priority() {
        let xml = r#"<styleSheet><fonts count="3">
            <font><color rgb="FF112233" theme="1"/><sz val="11"/><name val="A"/></font>
            <font><color theme="3" tint="0.4"/><sz val="11"/><name val="B"/></font>
            <font><color indexed="10"/><sz val="11"/><name val="C"/></font>
        </fonts>
        <cellXfs count="3">
            <xf fontId="0"/><xf fontId="1"/><xf fontId="2"/>
        </cellXfs></styleSheet>"#;
        let parsed = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(parsed[0].font.color, Color::argb(255, 0x11, 0x22, 0x33));
        assert_eq!(parsed[1].font.color, Color::theme(3, 0.4));
        assert_eq!(parsed[2].font.color, Color::Indexed(10));
    }

    #[test]
    fn test_cell_style_xfs_are_not_cell_formats() {
        let xml = r#"<styleSheet>
            <cellStyleXfs count="1"><xf numFmtId="0" fontId="0"/></cellStyleXfs>
            <cellXfs count="1"><xf numFmtId="14" fontId="0"/></cellXfs>
        </styleSheet>"#;
        let parsed = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].number_format, NumberFormat::BuiltIn(14));
    }
}
