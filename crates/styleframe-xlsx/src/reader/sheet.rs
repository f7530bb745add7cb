//! Worksheet part: cells, view settings, dimensions and color scales

use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::events::{BytesStart, Event};

use super::decode_excel_escapes;
use crate::error::{XlsxError, XlsxResult};
use crate::styles::parse_color_attrs;
use crate::xml::{attr_flag, attr_num, attr_value, for_each_event};
use styleframe_core::date::datetime_to_serial;
use styleframe_core::style::Style;
use styleframe_core::{
    CellAddress, CellRange, CellValue, CfColorValue, CfValueType, Color, ColorScaleRule,
    SheetProtection, Worksheet, MAX_COLS,
};

pub(super) fn read_worksheet(
    part: impl Read,
    worksheet: &mut Worksheet,
    shared_strings: &[String],
    styles: &[Style],
) -> XlsxResult<()> {
    let mut parser = SheetParser {
        worksheet,
        shared_strings,
        styles,
        row: None,
        next_col: 0,
        cell: None,
        text: None,
        cf_ranges: Vec::new(),
        scale: None,
    };
    // cell text keeps its whitespace
    for_each_event(part, false, |event| {
        match event {
            Event::Start(e) => parser.open(&e)?,
            Event::Empty(e) => {
                parser.open(&e)?;
                parser.close(e.name().as_ref())?;
            }
            Event::End(e) => parser.close(e.name().as_ref())?,
            Event::Text(e) => parser.text(&e.unescape()?),
            _ => {}
        }
        Ok(())
    })
}

/// A `<c>` whose children are still being read
#[derive(Debug)]
struct OpenCell {
    at: CellAddress,
    kind: Option<String>,
    style: u32,
    value: Option<String>,
    formula: Option<String>,
}

/// Child of `<c>` that receives text
#[derive(Debug, Clone, Copy)]
enum TextSlot {
    Value,
    Formula,
}

/// A colorScale `<cfRule>`: thresholds and colors arrive as separate lists
#[derive(Debug)]
struct OpenScale {
    priority: u32,
    thresholds: Vec<(CfValueType, Option<String>)>,
    colors: Vec<Color>,
}

impl OpenScale {
    fn finish(self, ranges: &[CellRange]) -> ColorScaleRule {
        let stops = self
            .thresholds
            .into_iter()
            .zip(self.colors)
            .map(|((value_type, value), color)| CfColorValue::new(value_type, value, color))
            .collect();
        let mut rule = ColorScaleRule::new(stops).with_priority(self.priority);
        rule.ranges = ranges.to_vec();
        rule
    }
}

struct SheetParser<'a> {
    worksheet: &'a mut Worksheet,
    shared_strings: &'a [String],
    styles: &'a [Style],

    /// Last `<row>` seen
    row: Option<u32>,
    /// Column a `<c>` without `r` lands in
    next_col: u16,
    cell: Option<OpenCell>,
    text: Option<TextSlot>,

    cf_ranges: Vec<CellRange>,
    scale: Option<OpenScale>,
}

impl SheetParser<'_> {
    fn open(&mut self, e: &BytesStart<'_>) -> XlsxResult<()> {
        match e.name().as_ref() {
            b"sheetView" => {
                if attr_flag(e, b"rightToLeft") == Some(true) {
                    self.worksheet.set_right_to_left(true);
                }
            }
            b"pane" => {
                if matches!(attr_value(e, b"state").as_deref(), Some("frozen" | "frozenSplit")) {
                    // split counts are written as doubles by some producers
                    let cols = attr_num::<f64>(e, b"xSplit").unwrap_or(0.0) as u16;
                    let rows = attr_num::<f64>(e, b"ySplit").unwrap_or(0.0) as u32;
                    self.worksheet.set_freeze_panes(rows, cols);
                }
            }
            b"col" => self.read_col(e),
            b"row" => {
                let row = match attr_num::<u32>(e, b"r") {
                    Some(r) => r.saturating_sub(1),
                    None => self.row.map_or(0, |last| last + 1),
                };
                self.row = Some(row);
                self.next_col = 0;
                if let Some(height) = attr_num(e, b"ht") {
                    self.worksheet.set_row_height(row, height);
                }
            }
            b"c" => {
                let at = match attr_value(e, b"r") {
                    Some(r) => CellAddress::parse(&r).map_err(|err| {
                        XlsxError::Parse(format!("Invalid cell reference '{r}': {err}"))
                    })?,
                    None => CellAddress::new(self.row.unwrap_or(0), self.next_col),
                };
                self.cell = Some(OpenCell {
                    at,
                    kind: attr_value(e, b"t"),
                    style: attr_num(e, b"s").unwrap_or(0),
                    value: None,
                    formula: None,
                });
            }
            // `<t>` only occurs inside an inline string's `<is>`
            b"v" | b"t" if self.cell.is_some() => self.text = Some(TextSlot::Value),
            b"f" if self.cell.is_some() => self.text = Some(TextSlot::Formula),
            b"sheetProtection" => {
                if attr_flag(e, b"sheet") == Some(true) {
                    self.worksheet.set_protection(Some(SheetProtection {
                        protected: true,
                        auto_filter: attr_flag(e, b"autoFilter") == Some(false),
                    }));
                }
            }
            b"autoFilter" => {
                if let Some(reference) = attr_value(e, b"ref") {
                    match CellRange::parse(&reference) {
                        Ok(range) => self.worksheet.set_auto_filter(Some(range)),
                        Err(err) => log::warn!("ignoring auto filter '{reference}': {err}"),
                    }
                }
            }
            b"conditionalFormatting" => {
                let sqref = attr_value(e, b"sqref").unwrap_or_default();
                self.cf_ranges = sqref
                    .split_whitespace()
                    .filter_map(|r| CellRange::parse(r).ok())
                    .collect();
            }
            b"cfRule" => {
                if attr_value(e, b"type").as_deref() == Some("colorScale") {
                    self.scale = Some(OpenScale {
                        priority: attr_num(e, b"priority").unwrap_or(1),
                        thresholds: Vec::new(),
                        colors: Vec::new(),
                    });
                }
            }
            b"cfvo" => {
                if let Some(scale) = self.scale.as_mut() {
                    let value_type = attr_value(e, b"type")
                        .and_then(|t| t.parse().ok())
                        .unwrap_or_default();
                    scale.thresholds.push((value_type, attr_value(e, b"val")));
                }
            }
            b"color" => {
                if let Some(scale) = self.scale.as_mut() {
                    scale.colors.push(parse_color_attrs(e));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// `<col min max>` covers a 1-based inclusive span
    fn read_col(&mut self, e: &BytesStart<'_>) {
        let first: u16 = attr_num(e, b"min").unwrap_or(1).max(1);
        let last: u16 = attr_num(e, b"max").unwrap_or(first).min(MAX_COLS);
        let width: Option<f64> = attr_num(e, b"width");
        let hidden = attr_flag(e, b"hidden") == Some(true);
        for col in first - 1..last {
            if let Some(width) = width {
                self.worksheet.set_column_width(col, width);
            }
            if hidden {
                self.worksheet.set_column_hidden(col, true);
            }
        }
    }

    fn text(&mut self, text: &str) {
        let (Some(slot), Some(cell)) = (self.text, self.cell.as_mut()) else {
            return;
        };
        let target = match slot {
            TextSlot::Value => &mut cell.value,
            TextSlot::Formula => &mut cell.formula,
        };
        target.get_or_insert_with(String::new).push_str(text);
    }

    fn close(&mut self, name: &[u8]) -> XlsxResult<()> {
        match name {
            b"v" | b"t" | b"f" => self.text = None,
            b"c" => {
                if let Some(cell) = self.cell.take() {
                    self.store(cell)?;
                }
            }
            b"cfRule" => {
                if let Some(scale) = self.scale.take() {
                    let rule = scale.finish(&self.cf_ranges);
                    self.worksheet.add_color_scale(rule);
                }
            }
            b"conditionalFormatting" => self.cf_ranges.clear(),
            _ => {}
        }
        Ok(())
    }

    fn store(&mut self, cell: OpenCell) -> XlsxResult<()> {
        let OpenCell { at, kind, style, value, formula } = cell;
        self.next_col = at.col.saturating_add(1);

        // a formula wins over its cached result
        let value = match (formula, value) {
            (Some(formula), _) => Some(CellValue::formula(formula)),
            (None, Some(raw)) => Some(self.typed_value(kind.as_deref(), &raw)?),
            (None, None) => None,
        };
        if let Some(value) = value {
            self.worksheet.set_cell_value_at(at.row, at.col, value)?;
        }

        if style != 0 {
            let style = self.styles.get(style as usize).ok_or_else(|| {
                XlsxError::Parse(format!("Style index {style} out of bounds"))
            })?;
            self.worksheet.set_cell_style_at(at.row, at.col, style)?;
        }
        Ok(())
    }

    fn typed_value(&self, kind: Option<&str>, raw: &str) -> XlsxResult<CellValue> {
        let value = match kind {
            None | Some("n") => match raw.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::from(raw),
            },
            Some("s") => {
                let index: usize = raw.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {raw}"))
                })?;
                let text = self.shared_strings.get(index).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {index} out of bounds"))
                })?;
                CellValue::String(text.clone())
            }
            Some("b") => CellValue::Boolean(raw == "1" || raw.eq_ignore_ascii_case("true")),
            Some("inlineStr" | "str") => CellValue::String(decode_excel_escapes(raw)),
            // ISO dates are stored as serials like every other date
            Some("d") => match parse_iso_datetime(raw) {
                Some(dt) => CellValue::Number(datetime_to_serial(dt)),
                None => CellValue::from(raw),
            },
            Some("e") => CellValue::from(raw),
            Some(other) => {
                log::warn!("unknown cell type '{other}'; keeping text");
                CellValue::from(raw)
            }
        };
        Ok(value)
    }
}

fn parse_iso_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0))
}
