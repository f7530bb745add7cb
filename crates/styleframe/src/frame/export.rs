//! Writing a frame into a worksheet

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use styleframe_core::{CellAddress, CellRange, SheetProtection, Underline, Worksheet};

use super::StyleFrame;
use crate::error::{Result, StyleFrameError};
use crate::styler::Styler;
use crate::utils::colors;
use crate::value::Value;
use crate::writer::ExcelWriter;

/// Sheet level settings for [`StyleFrame::to_excel`]
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ExportOptions {
    pub sheet_name: String,
    /// Protect the sheet; unlocked cells stay editable
    pub allow_protection: bool,
    pub right_to_left: bool,
    /// Column names, 1-based positions or letters
    #[serde(deserialize_with = "one_or_many")]
    #[schemars(with = "serde_json::Value")]
    pub columns_to_hide: Vec<Value>,
    /// 0-based sheet row holding the auto-filter buttons
    pub row_to_add_filters: Option<i64>,
    /// Top-left cell of the scrollable pane, e.g. `"B2"`
    pub columns_and_rows_to_freeze: Option<String>,
    /// Columns sized to their longest rendered value
    #[serde(deserialize_with = "one_or_many")]
    #[schemars(with = "serde_json::Value")]
    pub best_fit: Vec<Value>,
    pub header: bool,
    pub index: bool,
    /// Text written for missing values
    pub na_rep: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            allow_protection: false,
            right_to_left: false,
            columns_to_hide: Vec::new(),
            row_to_add_filters: None,
            columns_and_rows_to_freeze: None,
            best_fit: Vec::new(),
            header: true,
            index: false,
            na_rep: String::new(),
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    pub fn allow_protection(mut self, allow: bool) -> Self {
        self.allow_protection = allow;
        self
    }

    pub fn right_to_left(mut self, rtl: bool) -> Self {
        self.right_to_left = rtl;
        self
    }

    pub fn columns_to_hide<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Value>,
    {
        self.columns_to_hide = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn row_to_add_filters(mut self, row: i64) -> Self {
        self.row_to_add_filters = Some(row);
        self
    }

    pub fn columns_and_rows_to_freeze(mut self, cell: impl Into<String>) -> Self {
        self.columns_and_rows_to_freeze = Some(cell.into());
        self
    }

    pub fn best_fit<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Value>,
    {
        self.best_fit = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }

    pub fn na_rep(mut self, na_rep: impl Into<String>) -> Self {
        self.na_rep = na_rep.into();
        self
    }
}

/// Accepts a single column id or a list of them
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let json = serde_json::Value::deserialize(deserializer)?;
    Ok(match &json {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Array(items) => items.iter().map(Value::from).collect(),
        single => vec![Value::from(single)],
    })
}

fn to_row(pos: usize) -> Result<u32> {
    u32::try_from(pos).map_err(|_| StyleFrameError::index(format!("row: {pos} is out of range")))
}

fn to_col(pos: usize) -> Result<u16> {
    u16::try_from(pos)
        .map_err(|_| StyleFrameError::index(format!("column: {pos} is out of range")))
}

fn is_column_letters(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_uppercase())
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
    style: &Styler,
    na_rep: &str,
) -> Result<()> {
    sheet.set_cell_value_at(row, col, value.to_cell_value(na_rep))?;
    sheet.set_cell_style_at(row, col, &style.to_native_style())?;
    if let Some(comment) = style.generate_comment() {
        sheet.set_comment_at(row, col, comment);
    }
    Ok(())
}

/// Positions resolved for one export
struct Layout {
    header_rows: u32,
    startcol: u16,
    /// 1-based, never below 1
    max_row: usize,
    max_col: usize,
}

impl StyleFrame {
    /// Width units added to the longest value of a best-fit column
    pub const A_FACTOR: f64 = 13.0;
    /// Multiplier applied to best-fit widths
    pub const P_FACTOR: f64 = 1.3;

    /// A writer targeting `path`
    pub fn excel_writer(path: impl AsRef<Path>) -> ExcelWriter {
        ExcelWriter::new(path.as_ref())
    }

    /// Export into a new workbook and save it to `path`
    pub fn to_excel_file(&self, path: impl AsRef<Path>, options: &ExportOptions) -> Result<()> {
        let mut writer = Self::excel_writer(path);
        self.to_excel(&mut writer, options)?;
        writer.save()
    }

    /// Write the frame into a new sheet of `writer`'s workbook
    pub fn to_excel(&self, writer: &mut ExcelWriter, options: &ExportOptions) -> Result<()> {
        let workbook = writer.workbook_mut();
        let sheet_index = workbook.add_worksheet_with_name(&options.sheet_name)?;
        let sheet = workbook.worksheet_mut(sheet_index).ok_or_else(|| {
            StyleFrameError::index(format!("worksheet {} was not created", options.sheet_name))
        })?;
        self.write_sheet(sheet, options)?;
        log::debug!(
            "wrote {} rows x {} columns to sheet '{}'",
            self.len(),
            self.data.num_columns(),
            options.sheet_name
        );
        Ok(())
    }

    fn write_sheet(&self, sheet: &mut Worksheet, options: &ExportOptions) -> Result<()> {
        let header_rows = u32::from(options.header);
        let startcol = u16::from(options.index);
        let layout = Layout {
            header_rows,
            startcol,
            max_row: (header_rows as usize + self.len()).max(1),
            max_col: (startcol as usize + self.data.num_columns()).max(1),
        };

        sheet.set_right_to_left(options.right_to_left);
        self.write_cells(sheet, options, &layout)?;

        for (column, width) in self.effective_widths(&options.best_fit)? {
            let col = self.resolve_column(&column, &layout)?;
            sheet.set_column_width(col, width);
        }

        for (&row, &height) in &self.rows_height {
            if row < 1 || row as usize > layout.max_row {
                return Err(StyleFrameError::index(format!("row: {row} is out of range")));
            }
            sheet.set_row_height((row - 1) as u32, height);
        }

        if let Some(row) = options.row_to_add_filters {
            if row < 0 || row as usize + 1 > layout.max_row {
                return Err(StyleFrameError::index(format!(
                    "row: {row} is out of rows range"
                )));
            }
            let (first, last) = self.data_column_span(&layout)?;
            let row = row as u32;
            sheet.set_auto_filter(Some(CellRange::from_indices(row, first, row, last)));
        }

        if let Some(cell) = &options.columns_and_rows_to_freeze {
            let addr = Self::freeze_address(cell)?;
            if addr.col as usize + 1 > layout.max_col {
                return Err(StyleFrameError::index(format!(
                    "column: {} is out of columns range.",
                    CellAddress::column_to_letters(addr.col)
                )));
            }
            if addr.row as usize + 1 > layout.max_row {
                return Err(StyleFrameError::index(format!(
                    "row: {} is out of rows range.",
                    addr.row + 1
                )));
            }
            sheet.set_freeze_panes(addr.row, addr.col);
        }

        if options.allow_protection {
            sheet.set_protection(Some(SheetProtection {
                protected: true,
                auto_filter: true,
            }));
        }

        for column in &options.columns_to_hide {
            let col = self.resolve_column(column, &layout)?;
            sheet.set_column_hidden(col, true);
        }

        let last_row = to_row(self.len())?;
        for (i, rule) in self.cond_formatting.iter().enumerate() {
            let ends = (rule.columns_range.first(), rule.columns_range.last());
            let (Some(first), Some(last)) = ends else {
                continue;
            };
            let first = self.resolve_column(first, &layout)?;
            let last = self.resolve_column(last, &layout)?;
            let range = CellRange::from_indices(0, first, last_row, last);
            sheet.add_color_scale(rule.to_native(range, i as u32 + 1));
        }

        Ok(())
    }

    fn write_cells(&self, sheet: &mut Worksheet, options: &ExportOptions, layout: &Layout) -> Result<()> {
        let default_header_style = Styler::default_header_style();
        let use_default_headers = options.header && !self.has_custom_headers_style;

        if options.index {
            if options.header {
                if let Some(name) = self.data.index_name() {
                    let style = &self.index_header_style;
                    write_cell(sheet, 0, 0, &Value::text(name), style, "")?;
                }
            }
            for (row, label) in self.data.index().iter().enumerate() {
                let row = layout.header_rows + to_row(row)?;
                write_cell(sheet, row, 0, &label.value, &label.style.borrow(), &options.na_rep)?;
            }
        }

        for (pos, header) in self.data.columns().iter().enumerate() {
            let col = layout.startcol + to_col(pos)?;
            if options.header {
                if use_default_headers {
                    write_cell(sheet, 0, col, &header.value, &default_header_style, "")?;
                } else {
                    write_cell(sheet, 0, col, &header.value, &header.style.borrow(), "")?;
                }
            }

            let best_fit = options.best_fit.contains(&header.value);
            for (row, cell) in self.data.column_at(pos).unwrap_or_default().iter().enumerate() {
                let mut style = cell.style.get();
                if cell.value.to_string().contains("=HYPERLINK") {
                    style.font_color = colors::BLUE.to_string();
                    style.underline = Underline::Single;
                } else if best_fit {
                    style.wrap_text = false;
                    style.shrink_to_fit = false;
                }
                let row = layout.header_rows + to_row(row)?;
                write_cell(sheet, row, col, &cell.value, &style, &options.na_rep)?;
            }
        }
        Ok(())
    }

    /// Recorded widths with best-fit widths upserted
    fn effective_widths(&self, best_fit: &[Value]) -> Result<Vec<(Value, f64)>> {
        let mut widths = self.columns_width.clone();
        for name in best_fit {
            let pos = self
                .data
                .column_position(name)
                .ok_or_else(|| StyleFrameError::key(name.to_string()))?;
            let longest = self
                .data
                .column_at(pos)
                .unwrap_or_default()
                .iter()
                .map(|c| fit_len(&c.value))
                .max()
                .unwrap_or(0);
            let width = (longest as f64 + Self::A_FACTOR) * Self::P_FACTOR;
            match widths.iter_mut().find(|(column, _)| column == name) {
                Some(entry) => entry.1 = width,
                None => widths.push((name.clone(), width)),
            }
        }
        Ok(widths)
    }

    /// 0-based sheet column for a column name, 1-based position or letters
    fn resolve_column(&self, id: &Value, layout: &Layout) -> Result<u16> {
        if !matches!(id, Value::Int(_) | Value::Text(_)) {
            return Err(StyleFrameError::invalid_type(format!(
                "column {id} must be a column name, index or letter"
            )));
        }
        let one_based = match self.data.column_position(id) {
            Some(pos) => Some(layout.startcol as usize + pos + 1),
            None => match id {
                Value::Int(n) if *n >= 1 => Some((layout.startcol as usize).saturating_add(*n as usize)),
                Value::Text(s) if is_column_letters(s) => CellAddress::letters_to_column(s)
                    .ok()
                    .map(|c| c as usize + 1),
                _ => None,
            },
        };
        match one_based {
            Some(col) if col <= layout.max_col => to_col(col - 1),
            _ => Err(StyleFrameError::index(format!(
                "column: {id} is out of columns range."
            ))),
        }
    }

    fn data_column_span(&self, layout: &Layout) -> Result<(u16, u16)> {
        let columns = self.data.columns();
        match (columns.first(), columns.last()) {
            (Some(first), Some(last)) => Ok((
                self.resolve_column(&first.value, layout)?,
                self.resolve_column(&last.value, layout)?,
            )),
            _ => Err(StyleFrameError::index("frame has no columns")),
        }
    }

    fn freeze_address(cell: &str) -> Result<CellAddress> {
        let invalid = || {
            StyleFrameError::invalid_type(
                "columns_and_rows_to_freeze must be a str for example: 'C3'",
            )
        };
        if cell.chars().count() < 2 {
            return Err(invalid());
        }
        CellAddress::parse(cell).map_err(|_| invalid())
    }
}

/// Characters `value` takes when measured for best fit
///
/// Whole floats count their trailing `.0`.
fn fit_len(value: &Value) -> usize {
    match value {
        Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
            format!("{x:.1}").len()
        }
        _ => value.to_string().chars().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styler::StyleOptions;
    use crate::table::Table;
    use pretty_assertions::assert_eq;
    use styleframe_core::{CellValue, Color, FillStyle, NumberFormat};

    fn frame() -> StyleFrame {
        StyleFrame::from_columns(
            vec![
                ("a", vec![Value::from(1), Value::from(2)]),
                ("b", vec![Value::from("x"), Value::Null]),
            ],
            None,
        )
        .unwrap()
    }

    fn export(sf: &StyleFrame, options: &ExportOptions) -> Result<ExcelWriter> {
        let mut writer = ExcelWriter::new("unused.xlsx");
        sf.to_excel(&mut writer, options)?;
        Ok(writer)
    }

    fn sheet(writer: &ExcelWriter) -> &Worksheet {
        writer.workbook().worksheet(0).unwrap()
    }

    #[test]
    fn test_headers_and_values() {
        let writer = export(&frame(), &ExportOptions::default()).unwrap();
        let ws = sheet(&writer);
        assert_eq!(ws.name(), "Sheet1");
        assert_eq!(ws.get_value_at(0, 0), CellValue::string("a"));
        assert_eq!(ws.get_value_at(1, 0), CellValue::Number(1.0));
        assert_eq!(ws.get_value_at(2, 1), CellValue::Empty);
        assert!(ws.cell_style_at(0, 0).font.bold);
        assert!(!ws.cell_style_at(1, 0).font.bold);
    }

    #[test]
    fn test_na_rep_and_no_header() {
        let options = ExportOptions::new().header(false).na_rep("N/A");
        let writer = export(&frame(), &options).unwrap();
        let ws = sheet(&writer);
        assert_eq!(ws.get_value_at(0, 0), CellValue::Number(1.0));
        assert_eq!(ws.get_value_at(1, 1), CellValue::string("N/A"));
    }

    #[test]
    fn test_index_column() {
        let table = Table::from_columns(vec![("a", vec![Value::from(5)])])
            .unwrap()
            .with_index_name("id");
        let sf = StyleFrame::new(table, None);
        let writer = export(&sf, &ExportOptions::new().index(true)).unwrap();
        let ws = sheet(&writer);
        assert_eq!(ws.get_value_at(0, 0), CellValue::string("id"));
        assert_eq!(ws.get_value_at(1, 0), CellValue::Number(0.0));
        assert_eq!(ws.get_value_at(0, 1), CellValue::string("a"));
        assert_eq!(ws.get_value_at(1, 1), CellValue::Number(5.0));
        // only the column headers get the bold default
        assert!(!ws.cell_style_at(0, 0).font.bold);
        assert!(ws.cell_style_at(0, 1).font.bold);
    }

    #[test]
    fn test_custom_headers_keep_their_style() {
        let mut sf = frame();
        let header = StyleOptions::new().bg_color("red").build().unwrap();
        sf.apply_headers_style(&header, false, None).unwrap();
        let writer = export(&sf, &ExportOptions::default()).unwrap();
        let fill = &sheet(&writer).cell_style_at(0, 1).fill;
        assert_eq!(fill, &FillStyle::solid(Color::argb(0, 0xFF, 0, 0)));
    }

    #[test]
    fn test_widths_heights_and_hidden_columns() {
        let mut sf = frame();
        sf.set_column_width(["b"], 20).unwrap();
        sf.set_row_height([1], 30).unwrap();
        let options = ExportOptions::new().columns_to_hide([Value::from("A")]);
        let writer = export(&sf, &options).unwrap();
        let ws = sheet(&writer);
        assert_eq!(ws.custom_column_widths().get(&1), Some(&20.0));
        assert_eq!(ws.custom_row_heights().get(&0), Some(&30.0));
        assert!(ws.is_column_hidden(0));
    }

    #[test]
    fn test_width_out_of_range() {
        let mut sf = frame();
        sf.set_column_width([5], 20).unwrap();
        assert!(matches!(
            export(&sf, &ExportOptions::default()),
            Err(StyleFrameError::Index(_))
        ));
    }

    #[test]
    fn test_height_out_of_range() {
        let mut sf = frame();
        sf.set_row_height([4], 20).unwrap();
        assert!(matches!(
            export(&sf, &ExportOptions::default()),
            Err(StyleFrameError::Index(_))
        ));
    }

    #[test]
    fn test_best_fit() {
        let sf = StyleFrame::from_columns(vec![("a", vec!["abcd", "ab"])], None).unwrap();
        let writer = export(&sf, &ExportOptions::new().best_fit(["a"])).unwrap();
        let ws = sheet(&writer);
        let width = ws.custom_column_widths()[&0];
        assert!((width - (4.0 + 13.0) * 1.3).abs() < 1e-9);
        assert!(!ws.cell_style_at(1, 0).alignment.wrap_text);
        assert!(!ws.cell_style_at(1, 0).alignment.shrink_to_fit);
    }

    #[test]
    fn test_best_fit_counts_whole_float_decimals() {
        let sf = StyleFrame::from_columns(vec![("f", vec![100.0, 2.5])], None).unwrap();
        let writer = export(&sf, &ExportOptions::new().best_fit(["f"])).unwrap();
        let width = sheet(&writer).custom_column_widths()[&0];
        assert!((width - (5.0 + 13.0) * 1.3).abs() < 1e-9);
        assert_eq!(fit_len(&Value::Float(-12.0)), 5);
        assert_eq!(fit_len(&Value::Int(12)), 2);
    }

    #[test]
    fn test_best_fit_missing_column() {
        let options = ExportOptions::new().best_fit(["zzz"]);
        assert!(matches!(
            export(&frame(), &options),
            Err(StyleFrameError::Key(_))
        ));
    }

    #[test]
    fn test_hyperlink_style() {
        let sf = StyleFrame::from_columns(
            vec![("link", vec![r#"=HYPERLINK("http://a.b", "a")"#])],
            None,
        )
        .unwrap();
        let writer = export(&sf, &ExportOptions::default()).unwrap();
        let ws = sheet(&writer);
        let style = ws.cell_style_at(1, 0);
        assert_eq!(style.font.color, Color::argb(0, 0, 0, 0xFF));
        assert_eq!(style.font.underline, Underline::Single);
        assert!(matches!(ws.get_value_at(1, 0), CellValue::Formula(_)));
    }

    #[test]
    fn test_freeze_panes() {
        let options = ExportOptions::new().columns_and_rows_to_freeze("B2");
        let writer = export(&frame(), &options).unwrap();
        let panes = sheet(&writer).freeze_panes().unwrap();
        assert_eq!((panes.row, panes.col), (1, 1));
    }

    #[test]
    fn test_freeze_validation() {
        let bad = ExportOptions::new().columns_and_rows_to_freeze("A");
        assert!(matches!(
            export(&frame(), &bad),
            Err(StyleFrameError::InvalidType(_))
        ));
        let outside = ExportOptions::new().columns_and_rows_to_freeze("D2");
        assert!(matches!(
            export(&frame(), &outside),
            Err(StyleFrameError::Index(_))
        ));
        let below = ExportOptions::new().columns_and_rows_to_freeze("A9");
        assert!(matches!(
            export(&frame(), &below),
            Err(StyleFrameError::Index(_))
        ));
    }

    #[test]
    fn test_filters_and_protection() {
        let options = ExportOptions::new()
            .row_to_add_filters(0)
            .allow_protection(true)
            .right_to_left(true);
        let writer = export(&frame(), &options).unwrap();
        let ws = sheet(&writer);
        assert_eq!(ws.auto_filter().unwrap().to_a1_string(), "A1:B1");
        let protection = ws.protection().unwrap();
        assert!(protection.protected && protection.auto_filter);
        assert!(ws.is_right_to_left());

        let outside = ExportOptions::new().row_to_add_filters(3);
        assert!(export(&frame(), &outside).is_err());
    }

    #[test]
    fn test_color_scale_range() {
        let mut sf = frame();
        sf.add_color_scale_conditional_formatting(
            crate::styler::ColorScaleStop::new(styleframe_core::CfValueType::Min, "red"),
            crate::styler::ColorScaleStop::new(styleframe_core::CfValueType::Max, "green"),
            None,
            Some(vec![Value::from("a")]),
        )
        .unwrap();
        let writer = export(&sf, &ExportOptions::default()).unwrap();
        let scales = sheet(&writer).color_scales();
        assert_eq!(scales.len(), 1);
        assert_eq!(scales[0].ranges[0].to_a1_string(), "A1:A3");
        assert_eq!(scales[0].priority, 1);
    }

    #[test]
    fn test_date_cells_carry_format() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let sf = StyleFrame::from_columns(vec![("d", vec![date])], None).unwrap();
        let writer = export(&sf, &ExportOptions::default()).unwrap();
        let style = sheet(&writer).cell_style_at(1, 0);
        assert_eq!(style.number_format, NumberFormat::Custom("DD/MM/YY".into()));
    }

    #[test]
    fn test_duplicate_sheet_name() {
        let mut writer = ExcelWriter::new("unused.xlsx");
        frame().to_excel(&mut writer, &ExportOptions::default()).unwrap();
        assert!(frame()
            .to_excel(&mut writer, &ExportOptions::default())
            .is_err());
    }

    #[test]
    fn test_options_from_json() {
        let options: ExportOptions = serde_json::from_value(serde_json::json!({
            "best_fit": "a",
            "columns_to_hide": ["b", 1],
            "row_to_add_filters": 0
        }))
        .unwrap();
        assert_eq!(options.best_fit, vec![Value::from("a")]);
        assert_eq!(options.columns_to_hide, vec![Value::from("b"), Value::from(1)]);
        assert_eq!(options.sheet_name, "Sheet1");
        assert!(serde_json::from_value::<ExportOptions>(serde_json::json!({"bogus": 1})).is_err());
    }
}
