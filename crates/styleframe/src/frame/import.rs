//! Reading frames back from workbooks

use std::path::Path;

use styleframe_core::{Workbook, Worksheet};

use super::StyleFrame;
use crate::container::Container;
use crate::error::{Result, StyleFrameError};
use crate::styler::{StyleRef, Styler};
use crate::table::Table;
use crate::value::Value;
use crate::WorkbookExt;

/// Which sheet to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Name(String),
    /// 0-based
    Index(usize),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl From<&str> for SheetSelector {
    fn from(name: &str) -> Self {
        SheetSelector::Name(name.to_string())
    }
}

impl From<String> for SheetSelector {
    fn from(name: String) -> Self {
        SheetSelector::Name(name)
    }
}

impl From<usize> for SheetSelector {
    fn from(index: usize) -> Self {
        SheetSelector::Index(index)
    }
}

/// Options for [`StyleFrame::read_excel`]
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOptions {
    pub sheet: SheetSelector,
    /// Rebuild cell styles, row heights and column widths
    pub read_style: bool,
    /// Also read comments into the styles; needs `read_style`
    pub read_comments: bool,
    /// First row holds the column names
    pub header_row: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            sheet: SheetSelector::default(),
            read_style: false,
            read_comments: false,
            header_row: true,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, sheet: impl Into<SheetSelector>) -> Self {
        self.sheet = sheet.into();
        self
    }

    pub fn read_style(mut self, read_style: bool) -> Self {
        self.read_style = read_style;
        self
    }

    pub fn read_comments(mut self, read_comments: bool) -> Self {
        self.read_comments = read_comments;
        self
    }

    pub fn header_row(mut self, header_row: bool) -> Self {
        self.header_row = header_row;
        self
    }
}

fn select_sheet<'a>(workbook: &'a Workbook, selector: &SheetSelector) -> Result<&'a Worksheet> {
    match selector {
        SheetSelector::Name(name) => workbook
            .worksheet_by_name(name)
            .ok_or_else(|| StyleFrameError::key(format!("Worksheet named '{name}' not found"))),
        SheetSelector::Index(index) => workbook.worksheet(*index).ok_or_else(|| {
            StyleFrameError::index(format!(
                "Worksheet index {index} is invalid, {} worksheets found",
                workbook.sheet_count()
            ))
        }),
    }
}

/// Rows and columns spanned by cells holding a value
fn value_extent(sheet: &Worksheet) -> (usize, usize) {
    sheet
        .iter_cells()
        .filter(|(_, _, data)| !data.value.is_empty())
        .fold((0, 0), |(rows, cols), (row, col, _)| {
            (rows.max(row as usize + 1), cols.max(col as usize + 1))
        })
}

fn value_at(sheet: &Worksheet, row: u32, col: u16) -> Value {
    let style = sheet.cell_style_at(row, col);
    Value::from_cell_value(&sheet.get_value_at(row, col), &style.number_format)
}

impl StyleFrame {
    /// Read a sheet of an xlsx file
    pub fn read_excel(path: impl AsRef<Path>, options: &ReadOptions) -> Result<StyleFrame> {
        let path = path.as_ref();
        let workbook = Workbook::open(path)?;
        log::debug!("reading {:?} from {}", options.sheet, path.display());
        Self::from_workbook(&workbook, options)
    }

    /// Read a sheet of an in-memory workbook
    pub fn from_workbook(workbook: &Workbook, options: &ReadOptions) -> Result<StyleFrame> {
        let sheet = select_sheet(workbook, &options.sheet)?;
        let (total_rows, ncols) = value_extent(sheet);
        let header_rows = u32::from(options.header_row);
        let nrows = total_rows.saturating_sub(header_rows as usize);

        let mut columns = Vec::with_capacity(ncols);
        for pos in 0..ncols {
            let col = pos as u16;
            let name = if options.header_row {
                match value_at(sheet, 0, col) {
                    Value::Null => Value::text(format!("Unnamed: {pos}")),
                    name => name,
                }
            } else {
                Value::from(pos)
            };
            let values: Vec<Value> = (0..nrows)
                .map(|row| value_at(sheet, header_rows + row as u32, col))
                .collect();
            columns.push((name, values));
        }
        let mut sf = StyleFrame::new(Table::from_columns(columns)?, None);

        if options.read_style {
            sf.read_styles(workbook, sheet, options, header_rows as usize + nrows);
        }
        Ok(sf)
    }

    fn read_styles(
        &mut self,
        workbook: &Workbook,
        sheet: &Worksheet,
        options: &ReadOptions,
        used_rows: usize,
    ) {
        let header_rows = u32::from(options.header_row);
        let theme = workbook.theme();
        let style_at = |row: u32, col: u16| {
            let comment = if options.read_comments {
                sheet.comment_at(row, col)
            } else {
                None
            };
            StyleRef::new(Styler::from_native_style(
                sheet.cell_style_at(row, col),
                theme,
                comment,
            ))
        };

        for pos in 0..self.data.num_columns() {
            let col = pos as u16;
            if options.header_row {
                self.data.columns_mut()[pos].style = style_at(0, col);
            }
            if let Some(cells) = self.data.column_at_mut(pos) {
                for (row, cell) in cells.iter_mut().enumerate() {
                    cell.style = style_at(header_rows + row as u32, col);
                }
            }
        }

        for (&row, &height) in sheet.custom_row_heights() {
            if (row as usize) < used_rows {
                self.rows_height.insert(i64::from(row) + 1, height);
            }
        }
        for (&col, &width) in sheet.custom_column_widths() {
            if let Some(header) = self.data.columns().get(col as usize) {
                self.columns_width.push((header.value.clone(), width));
            }
        }
        self.has_custom_headers_style = true;
    }

    /// Read a styled sheet as a template and fill it with `table`
    ///
    /// Overlapping cells take `table`'s values and keep the template's styles.
    /// With `use_table_boundaries` template rows and columns beyond `table`
    /// are dropped.
    pub fn read_excel_as_template(
        path: impl AsRef<Path>,
        table: &Table,
        use_table_boundaries: bool,
        options: &ReadOptions,
    ) -> Result<StyleFrame> {
        let workbook = Workbook::open(path)?;
        Self::from_workbook_as_template(&workbook, table, use_table_boundaries, options)
    }

    /// [`StyleFrame::read_excel_as_template`] over an in-memory workbook
    pub fn from_workbook_as_template(
        workbook: &Workbook,
        table: &Table,
        use_table_boundaries: bool,
        options: &ReadOptions,
    ) -> Result<StyleFrame> {
        let options = options.clone().read_style(true);
        let mut sf = Self::from_workbook(workbook, &options)?;
        let (rows, cols) = (table.len(), table.num_columns());
        let (template_rows, template_cols) = (sf.len(), sf.data.num_columns());
        let value_of = |row: usize, col: usize| table.iget(row, col).cloned().unwrap_or_default();

        for col in 0..cols.min(template_cols) {
            for row in 0..rows.min(template_rows) {
                if let Some(cell) = sf.data.iget_mut(row, col) {
                    cell.value = value_of(row, col);
                }
            }
        }

        for col in template_cols..cols {
            let cells = (0..template_rows)
                .map(|row| Container::new(value_of(row, col)))
                .collect();
            sf.data
                .push_column(Container::new(table.columns()[col].clone()), cells)?;
        }

        for row in template_rows..rows {
            let cells = (0..sf.data.num_columns())
                .map(|col| Container::new(value_of(row, col)))
                .collect();
            sf.data
                .push_row(Container::new(table.index()[row].clone()), cells)?;
        }

        let renames: Vec<(Value, Value)> = sf
            .data
            .columns()
            .iter()
            .zip(table.columns())
            .map(|(old, new)| (old.value.clone(), new.clone()))
            .collect();
        sf.rename(renames);

        if use_table_boundaries {
            sf.data.truncate(rows, cols);
            let last_row = (rows + usize::from(options.header_row)) as i64;
            sf.rows_height.retain(|&row, _| row <= last_row);
            let data = &sf.data;
            sf.columns_width
                .retain(|(id, _)| data.column_position(id).is_some());
        }
        Ok(sf)
    }
}
