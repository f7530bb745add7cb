//! JSON front end for styleframe
//!
//! The input document is an array of sheets. Each sheet lists its columns
//! with their cells; styles may be given per cell, per column or as sheet
//! defaults:
//!
//! ```json
//! [{
//!   "sheet_name": "Sheet1",
//!   "default_styles": {"headers": {"bold": true}},
//!   "columns": [
//!     {"col_name": "a", "width": 20, "style": {"bg_color": "yellow"},
//!      "cells": [{"value": 1}, {"value": 2, "style": {"italic": true}}]}
//!   ],
//!   "row_heights": {"1": 30},
//!   "extra_features": {"row_to_add_filters": 0}
//! }]
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::Deserialize;
use styleframe::{
    ExcelWriter, ExportOptions, ReadOptions, Result, StyleFrame, StyleFrameError, StyleOptions,
    StyleRef, Table, Value, XlsxReader,
};

/// One cell of a column
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CellEntry {
    pub value: serde_json::Value,
    #[serde(default)]
    pub style: Option<StyleOptions>,
}

/// One column with its cells
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ColumnEntry {
    pub col_name: String,
    #[serde(default)]
    pub width: Option<f64>,
    /// Style for cells without a style of their own
    #[serde(default)]
    pub style: Option<StyleOptions>,
    pub cells: Vec<CellEntry>,
}

/// Sheet-wide fallback styles
#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DefaultStyles {
    #[serde(default)]
    pub headers: Option<StyleOptions>,
    #[serde(default)]
    pub cells: Option<StyleOptions>,
}

/// One sheet of the output workbook
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SheetEntry {
    pub sheet_name: String,
    pub columns: Vec<ColumnEntry>,
    #[serde(default)]
    pub default_styles: DefaultStyles,
    /// 1-based sheet row number to height
    #[serde(default)]
    pub row_heights: BTreeMap<String, f64>,
    /// Passed to the export; the sheet name always comes from `sheet_name`
    #[serde(default)]
    pub extra_features: Option<ExportOptions>,
}

/// The JSON schema of the input document
pub fn schema_json() -> Result<String> {
    let schema = schemars::schema_for!(Vec<SheetEntry>);
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Versions of the command line tool and the library
pub fn versions() -> String {
    format!(
        "styleframe-cli {}\nstyleframe {}",
        env!("CARGO_PKG_VERSION"),
        styleframe::VERSION
    )
}

/// Parse and check an input document
pub fn parse_sheets(json: &str) -> Result<Vec<SheetEntry>> {
    let sheets: Vec<SheetEntry> =
        serde_json::from_str(json).map_err(|e| StyleFrameError::Validation(e.to_string()))?;
    validate(&sheets)?;
    Ok(sheets)
}

fn validation(msg: impl Into<String>) -> StyleFrameError {
    StyleFrameError::Validation(msg.into())
}

/// Checks the document structure can't express
fn validate(sheets: &[SheetEntry]) -> Result<()> {
    if sheets.is_empty() {
        return Err(validation("at least one sheet is required"));
    }
    for sheet in sheets {
        if sheet.columns.is_empty() {
            return Err(validation(format!(
                "sheet '{}' must have at least one column",
                sheet.sheet_name
            )));
        }
        let mut names = HashSet::new();
        for column in &sheet.columns {
            if !names.insert(column.col_name.as_str()) {
                return Err(validation(format!(
                    "column '{}' appears more than once in sheet '{}'",
                    column.col_name, sheet.sheet_name
                )));
            }
            if let Some(width) = column.width {
                if width.is_nan() || width <= 0.0 {
                    return Err(validation(format!(
                        "width of column '{}' must be positive",
                        column.col_name
                    )));
                }
            }
        }
        for (row, height) in &sheet.row_heights {
            match row.parse::<i64>() {
                Ok(n) if n >= 1 => {}
                _ => return Err(validation(format!("row '{row}' is not a row number"))),
            }
            if height.is_nan() || *height <= 0.0 {
                return Err(validation(format!("height of row {row} must be positive")));
            }
        }
    }
    Ok(())
}

/// Empty style objects count as absent
fn non_empty(style: Option<&StyleOptions>) -> Option<&StyleOptions> {
    style.filter(|s| **s != StyleOptions::default())
}

/// Where the input document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Path(PathBuf),
    Json(String),
}

/// Builds one frame per input sheet and writes them to a workbook
pub struct CommandLineInterface {
    input: Option<Input>,
    writer: ExcelWriter,
    frames: Vec<(String, StyleFrame)>,
}

impl CommandLineInterface {
    pub fn new(input: Option<Input>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input,
            writer: ExcelWriter::new(output_path),
            frames: Vec::new(),
        }
    }

    /// The frame built for `sheet_name`
    pub fn frame(&self, sheet_name: &str) -> Option<&StyleFrame> {
        self.frames
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, sf)| sf)
    }

    pub fn writer(&self) -> &ExcelWriter {
        &self.writer
    }

    /// Load the input and save the workbook
    ///
    /// Input errors are printed and nothing is saved; other errors are
    /// returned.
    pub fn parse_as_json(&mut self) -> Result<()> {
        match self.load() {
            Ok(()) => self.writer.save(),
            Err(err) if err.is_recoverable() => {
                println!("Got the following error:\n{err}.");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Build and export every sheet without saving
    pub fn load(&mut self) -> Result<()> {
        let json = match &self.input {
            Some(Input::Json(json)) => json.clone(),
            Some(Input::Path(path)) => fs::read_to_string(path)?,
            None => {
                return Err(StyleFrameError::InvalidType(
                    "Neither --json nor --json_path were provided.".to_string(),
                ))
            }
        };
        for sheet in parse_sheets(&json)? {
            self.load_sheet(&sheet)?;
        }
        Ok(())
    }

    fn load_sheet(&mut self, sheet: &SheetEntry) -> Result<()> {
        log::debug!("building sheet '{}'", sheet.sheet_name);
        let default_cells = non_empty(sheet.default_styles.cells.as_ref());

        let columns = sheet.columns.iter().map(|column| {
            let values: Vec<Value> = column.cells.iter().map(|c| Value::from(&c.value)).collect();
            (column.col_name.as_str(), values)
        });
        let mut sf = StyleFrame::new(Table::from_columns(columns)?, None);

        for (col, column) in sheet.columns.iter().enumerate() {
            for (row, cell) in column.cells.iter().enumerate() {
                let options = non_empty(cell.style.as_ref())
                    .or_else(|| non_empty(column.style.as_ref()))
                    .or(default_cells)
                    .cloned()
                    .unwrap_or_default();
                sf.iloc_mut(row, col)?.style = StyleRef::new(options.build()?);
            }
        }

        if let Some(headers) = non_empty(sheet.default_styles.headers.as_ref()) {
            sf.apply_headers_style(&headers.build()?, false, None)?;
        }

        let widths = sheet
            .columns
            .iter()
            .filter_map(|c| c.width.map(|w| (c.col_name.as_str(), w)));
        sf.set_column_width_dict(widths)?;
        let heights = sheet
            .row_heights
            .iter()
            .map(|(row, height)| (row.parse::<i64>().unwrap_or_default(), *height));
        sf.set_row_height_dict(heights)?;

        let mut options = sheet.extra_features.clone().unwrap_or_default();
        options.sheet_name = sheet.sheet_name.clone();
        sf.to_excel(&mut self.writer, &options)?;
        self.frames.push((sheet.sheet_name.clone(), sf));
        Ok(())
    }
}

const SMOKE_DOCUMENT: &str = r#"[{
    "sheet_name": "smoke",
    "default_styles": {"headers": {"bold": true, "bg_color": "grey"}},
    "columns": [
        {"col_name": "name", "width": 18, "style": {"bg_color": "yellow"},
         "cells": [{"value": "alpha"}, {"value": "beta", "style": {"italic": true}}]},
        {"col_name": "score", "cells": [{"value": 1.5}, {"value": null}]}
    ],
    "row_heights": {"2": 24},
    "extra_features": {"row_to_add_filters": 0, "columns_and_rows_to_freeze": "A2"}
}]"#;

/// Build a small workbook in memory, read it back and compare
pub fn run_smoke_test() -> Result<()> {
    let mut cli = CommandLineInterface::new(Some(Input::Json(SMOKE_DOCUMENT.into())), "smoke.xlsx");
    cli.load()?;
    let mut buf = Cursor::new(Vec::new());
    cli.writer().write_to(&mut buf)?;
    buf.set_position(0);

    let workbook = XlsxReader::read(buf)?;
    let back = StyleFrame::from_workbook(&workbook, &ReadOptions::new().read_style(true))?;
    let built = cli
        .frame("smoke")
        .ok_or_else(|| validation("smoke sheet was not built"))?;

    if back.len() != built.len() || back.columns() != built.columns() {
        return Err(validation("smoke test: shape changed on the way through xlsx"));
    }
    for col in 0..built.data().num_columns() {
        for row in 0..built.len() {
            let (expected, actual) = (built.iloc(row, col)?, back.iloc(row, col)?);
            if expected.value != actual.value || expected.style.get() != actual.style.get() {
                return Err(validation(format!(
                    "smoke test: cell ({row}, {col}) differs: {expected} vs {actual}"
                )));
            }
        }
    }
    log::info!("smoke test passed");
    Ok(())
}
