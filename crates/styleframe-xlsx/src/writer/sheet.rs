//! `xl/worksheets/sheet{n}.xml`

use std::collections::BTreeSet;

use crate::error::XlsxResult;
use crate::styles::{write_color, StyleTable};
use crate::xml::{XmlPart, MAIN_NS, REL_NS};
use styleframe_core::{CellAddress, CellData, CellValue, Worksheet};

/// `rId` number of the comments drawing in the sheet's rels part
pub(super) const LEGACY_DRAWING_REL: usize = 2;

pub(super) fn worksheet_xml(
    sheet: &Worksheet,
    index: usize,
    styles: &StyleTable,
) -> XlsxResult<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.tag("worksheet")
        .attr("xmlns", MAIN_NS)
        .attr("xmlns:r", REL_NS)
        .open()?;

    // CT_Worksheet is a sequence, so the order below is fixed
    sheet_views(&mut part, sheet)?;
    cols(&mut part, sheet)?;
    sheet_data(&mut part, sheet, index, styles)?;

    if let Some(protection) = sheet.protection().filter(|p| p.protected) {
        // autoFilter="1" locks filtering
        part.tag("sheetProtection")
            .attr("sheet", 1)
            .attr("autoFilter", u8::from(!protection.auto_filter))
            .empty()?;
    }
    if let Some(range) = sheet.auto_filter() {
        part.tag("autoFilter").attr("ref", range).empty()?;
    }
    conditional_formatting(&mut part, sheet)?;
    if sheet.comment_count() > 0 {
        part.tag("legacyDrawing")
            .attr("r:id", format!("rId{LEGACY_DRAWING_REL}"))
            .empty()?;
    }

    part.close("worksheet")?;
    Ok(part.into_bytes())
}

fn sheet_views(part: &mut XmlPart, sheet: &Worksheet) -> XlsxResult<()> {
    part.tag("sheetViews").open()?;
    let view = part
        .tag("sheetView")
        .attr_if(sheet.is_right_to_left(), "rightToLeft", 1)
        .attr("workbookViewId", 0);

    match sheet.freeze_panes() {
        None => view.empty()?,
        Some(freeze) => {
            view.open()?;
            let pane = match (freeze.row > 0, freeze.col > 0) {
                (true, true) => "bottomRight",
                (true, false) => "bottomLeft",
                _ => "topRight",
            };
            let top_left = freeze.top_left_cell();
            part.tag("pane")
                .attr_if(freeze.col > 0, "xSplit", freeze.col)
                .attr_if(freeze.row > 0, "ySplit", freeze.row)
                .attr("topLeftCell", &top_left)
                .attr("activePane", pane)
                .attr("state", "frozen")
                .empty()?;
            part.tag("selection")
                .attr("pane", pane)
                .attr("activeCell", &top_left)
                .attr("sqref", &top_left)
                .empty()?;
            part.close("sheetView")?;
        }
    }
    part.close("sheetViews")
}

/// One `<col>` per column with a custom width or hidden flag
fn cols(part: &mut XmlPart, sheet: &Worksheet) -> XlsxResult<()> {
    let widths = sheet.custom_column_widths();
    let columns: BTreeSet<u16> = widths
        .keys()
        .chain(sheet.hidden_columns())
        .copied()
        .collect();
    if columns.is_empty() {
        return Ok(());
    }

    part.tag("cols").open()?;
    for col in columns {
        part.tag("col")
            .attr("min", col + 1)
            .attr("max", col + 1)
            .attr("width", sheet.column_width(col))
            .attr_if(widths.contains_key(&col), "customWidth", 1)
            .attr_if(sheet.is_column_hidden(col), "hidden", 1)
            .empty()?;
    }
    part.close("cols")
}

fn sheet_data(
    part: &mut XmlPart,
    sheet: &Worksheet,
    index: usize,
    styles: &StyleTable,
) -> XlsxResult<()> {
    let heights = sheet.custom_row_heights();
    // A custom height needs its <row> even when the row holds no cells
    let rows: BTreeSet<u32> = sheet
        .row_indices()
        .chain(heights.keys().copied())
        .collect();

    part.tag("sheetData").open()?;
    for row in rows {
        let height = heights.get(&row);
        part.tag("row")
            .attr("r", row + 1)
            .attr_opt("ht", height)
            .attr_if(height.is_some(), "customHeight", 1)
            .open()?;
        for (col, cell) in sheet.iter_row(row) {
            let xf = styles.xf_id_for(index, cell.style_index);
            cell_xml(part, CellAddress::new(row, col), cell, xf)?;
        }
        part.close("row")?;
    }
    part.close("sheetData")
}

fn cell_xml(part: &mut XmlPart, address: CellAddress, cell: &CellData, xf: u32) -> XlsxResult<()> {
    let c = part.tag("c").attr("r", address).attr_if(xf != 0, "s", xf);
    match &cell.value {
        // A style-only cell keeps its formatting
        CellValue::Empty if xf != 0 => return c.empty(),
        CellValue::Empty => return Ok(()),
        CellValue::Number(n) => {
            c.open()?;
            part.tag("v").text(&n.to_string())?;
        }
        CellValue::Boolean(b) => {
            c.attr("t", "b").open()?;
            part.tag("v").text(if *b { "1" } else { "0" })?;
        }
        CellValue::String(s) => {
            c.attr("t", "inlineStr").open()?;
            part.tag("is").open()?;
            part.tag("t").attr("xml:space", "preserve").text(s)?;
            part.close("is")?;
        }
        CellValue::Formula(formula) => {
            c.open()?;
            part.tag("f").text(formula)?;
        }
    }
    part.close("c")
}

fn conditional_formatting(part: &mut XmlPart, sheet: &Worksheet) -> XlsxResult<()> {
    for rule in sheet.color_scales() {
        if rule.ranges.is_empty() || rule.colors.len() < 2 {
            log::warn!(
                "skipping color scale on '{}' without ranges or stops",
                sheet.name()
            );
            continue;
        }

        part.tag("conditionalFormatting").attr("sqref", rule.sqref()).open()?;
        part.tag("cfRule")
            .attr("type", "colorScale")
            .attr("priority", rule.priority.max(1))
            .open()?;
        part.tag("colorScale").open()?;
        // all thresholds first, then all colors
        for stop in &rule.colors {
            part.tag("cfvo")
                .attr("type", stop.value_type)
                .attr_opt("val", stop.value.as_deref())
                .empty()?;
        }
        for stop in &rule.colors {
            write_color(part, "color", &stop.color)?;
        }
        part.close("colorScale")?;
        part.close("cfRule")?;
        part.close("conditionalFormatting")?;
    }
    Ok(())
}
