//! The styled frame
//!
//! A [`StyleFrame`] is a [`Table`] of [`Container`]s plus the sheet-level
//! settings (column widths, row heights, conditional formats) applied when it
//! is exported.
//!
//! ```rust
//! use styleframe::{ColumnStyleOptions, StyleFrame, StyleOptions};
//!
//! let mut sf = StyleFrame::from_columns([("a", vec![1, 2, 3]), ("b", vec![4, 5, 6])], None)?;
//! let bold = StyleOptions::new().bold(true).build()?;
//! sf.apply_column_style(["a"], &bold, &ColumnStyleOptions::default())?
//!     .set_column_width(["b"], 20)?;
//!
//! assert!(sf.iloc(0, 0)?.style.borrow().bold);
//! assert_eq!(sf.row_indexes(), vec![1, 2, 3, 4]);
//! # Ok::<(), styleframe::StyleFrameError>(())
//! ```

mod export;
mod import;

pub use export::ExportOptions;
pub use import::{ReadOptions, SheetSelector};

use std::collections::BTreeMap;
use std::fmt;

use ahash::AHashMap;
use styleframe_core::TemporalKind;

use crate::container::Container;
use crate::error::{Result, StyleFrameError};
use crate::styler::{ColorScaleConditionalFormatRule, ColorScaleStop, StyleRef, Styler};
use crate::table::{AsValue, RowSelection, Table};
use crate::value::Value;

/// Options for [`StyleFrame::apply_column_style`]
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStyleOptions {
    /// Style the column headers too
    pub style_header: bool,
    /// Give date, time and date-time cells the style's matching format
    pub use_default_formats: bool,
    /// Width for every styled column
    pub width: Option<f64>,
    /// Use the style as is instead of combining it with the frame default
    pub overwrite_default: bool,
}

impl Default for ColumnStyleOptions {
    fn default() -> Self {
        Self {
            style_header: false,
            use_default_formats: true,
            width: None,
            overwrite_default: true,
        }
    }
}

/// Options for [`StyleFrame::apply_style_by_indexes`]
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStyleOptions {
    /// Columns to style; all when `None`
    pub columns: Option<Vec<Value>>,
    /// Height for the styled rows
    pub height: Option<f64>,
    /// Style for every row not selected
    pub complement_style: Option<Styler>,
    /// Height for the complement rows, defaulting to `height`
    pub complement_height: Option<f64>,
    /// Use the style as is instead of combining it with the frame default
    pub overwrite_default: bool,
}

impl Default for IndexStyleOptions {
    fn default() -> Self {
        Self {
            columns: None,
            height: None,
            complement_style: None,
            complement_height: None,
            overwrite_default: true,
        }
    }
}

/// One style handle per value kind, created on first use
///
/// Cells of the same kind styled by one call share a handle.
struct FormatHandles<'a> {
    base: &'a Styler,
    handles: [Option<StyleRef>; 4],
}

impl<'a> FormatHandles<'a> {
    fn new(base: &'a Styler) -> Self {
        Self {
            base,
            handles: Default::default(),
        }
    }

    /// Handle for `kind`, with its number format chosen by `format`
    fn get<F>(&mut self, kind: Option<TemporalKind>, format: F) -> StyleRef
    where
        F: FnOnce(&Styler, Option<TemporalKind>) -> String,
    {
        let slot = match kind {
            None => 0,
            Some(TemporalKind::Date) => 1,
            Some(TemporalKind::Time) => 2,
            Some(TemporalKind::DateTime) => 3,
        };
        let base = self.base;
        self.handles[slot]
            .get_or_insert_with(|| {
                let number_format = format(base, kind);
                StyleRef::new(base.clone().with_number_format(number_format))
            })
            .clone()
    }
}

/// Tabular data with a style per cell, header and row label
#[derive(Debug)]
pub struct StyleFrame {
    data: Table<Container>,
    columns_width: Vec<(Value, f64)>,
    rows_height: BTreeMap<i64, f64>,
    has_custom_headers_style: bool,
    default_style: Styler,
    index_header_style: Styler,
    cond_formatting: Vec<ColorScaleConditionalFormatRule>,
}

impl StyleFrame {
    /// Wrap a table
    ///
    /// With `default_style` every cell, header and row label gets its own copy
    /// of it; otherwise each gets the default style for its value kind.
    pub fn new(table: Table, default_style: Option<Styler>) -> Self {
        let data = table.map(|value| match &default_style {
            Some(style) => Container::with_style(value, style.clone()),
            None => Container::new(value),
        });
        let default_style = default_style.unwrap_or_default();
        Self {
            data,
            columns_width: Vec::new(),
            rows_height: BTreeMap::new(),
            has_custom_headers_style: false,
            index_header_style: default_style.clone(),
            default_style,
            cond_formatting: Vec::new(),
        }
    }

    /// Build from `(column, values)` pairs
    pub fn from_columns<I, K, V>(columns: I, default_style: Option<Styler>) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Ok(Self::new(Table::from_columns(columns)?, default_style))
    }

    /// Build from records of `(column, value)` pairs
    pub fn from_records<I, R, K, V>(records: I, default_style: Option<Styler>) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::new(Table::from_records(records), default_style)
    }

    /// Build from a JSON object of arrays or an array of objects
    pub fn from_json(json: &serde_json::Value, default_style: Option<Styler>) -> Result<Self> {
        Ok(Self::new(Table::from_json(json)?, default_style))
    }

    /// Deep copy of another frame
    ///
    /// Dimensions, the custom-header flag and the index header style carry
    /// over; cells sharing a style in `other` share one in the copy. The
    /// default style starts fresh and conditional formats are not copied.
    pub fn from_frame(other: &StyleFrame) -> Self {
        let mut copies: AHashMap<usize, StyleRef> = AHashMap::new();
        let mut copy = |c: &Container| Container {
            value: c.value.clone(),
            style: copies
                .entry(c.style.id())
                .or_insert_with(|| c.style.deep_clone())
                .clone(),
        };

        let source = &other.data;
        let columns = source.columns().iter().map(&mut copy).collect();
        let index = source.index().iter().map(&mut copy).collect();
        let cells = (0..source.num_columns())
            .map(|pos| {
                source
                    .column_at(pos)
                    .unwrap_or_default()
                    .iter()
                    .map(&mut copy)
                    .collect()
            })
            .collect();
        let data = Table::from_parts(
            columns,
            index,
            cells,
            source.index_name().map(str::to_string),
        );

        Self {
            data,
            columns_width: other.columns_width.clone(),
            rows_height: other.rows_height.clone(),
            has_custom_headers_style: other.has_custom_headers_style,
            default_style: Styler::default(),
            index_header_style: other.index_header_style.clone(),
            cond_formatting: Vec::new(),
        }
    }

    // === Accessors ===

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &Table<Container> {
        &self.data
    }

    /// Column headers
    pub fn columns(&self) -> &[Container] {
        self.data.columns()
    }

    /// Row labels
    pub fn index(&self) -> &[Container] {
        self.data.index()
    }

    pub fn default_style(&self) -> &Styler {
        &self.default_style
    }

    pub fn index_header_style(&self) -> &Styler {
        &self.index_header_style
    }

    pub fn has_custom_headers_style(&self) -> bool {
        self.has_custom_headers_style
    }

    /// Column widths by column id, in insertion order
    pub fn columns_width(&self) -> &[(Value, f64)] {
        &self.columns_width
    }

    /// Row heights by 1-based sheet row
    pub fn rows_height(&self) -> &BTreeMap<i64, f64> {
        &self.rows_height
    }

    pub fn cond_formatting(&self) -> &[ColorScaleConditionalFormatRule] {
        &self.cond_formatting
    }

    /// Sheet row numbers of the header and data rows
    pub fn row_indexes(&self) -> Vec<i64> {
        (1..=self.len() as i64 + 1).collect()
    }

    /// View of one column
    pub fn column(&self, name: impl Into<Value>) -> Result<ColumnView<'_>> {
        let name = name.into();
        let pos = self.column_position(&name)?;
        Ok(ColumnView {
            header: &self.data.columns()[pos],
            cells: self.data.column_at(pos).unwrap_or_default(),
        })
    }

    /// Cell by row label and column name
    pub fn cell(&self, row: impl Into<Value>, column: impl Into<Value>) -> Result<&Container> {
        let (row, col) = self.label_position(row.into(), column.into())?;
        self.iloc(row, col)
    }

    pub fn cell_mut(
        &mut self,
        row: impl Into<Value>,
        column: impl Into<Value>,
    ) -> Result<&mut Container> {
        let (row, col) = self.label_position(row.into(), column.into())?;
        self.iloc_mut(row, col)
    }

    /// Cell by row and column position
    pub fn iloc(&self, row: usize, col: usize) -> Result<&Container> {
        self.data
            .iget(row, col)
            .ok_or_else(|| StyleFrameError::index(format!("position ({row}, {col}) out of range")))
    }

    pub fn iloc_mut(&mut self, row: usize, col: usize) -> Result<&mut Container> {
        self.data
            .iget_mut(row, col)
            .ok_or_else(|| StyleFrameError::index(format!("position ({row}, {col}) out of range")))
    }

    /// Mask of the rows whose cell in `column` satisfies `pred`
    pub fn rows_where<F>(&self, column: impl Into<Value>, pred: F) -> Result<RowSelection>
    where
        F: FnMut(&Value) -> bool,
    {
        self.data.rows_where(&column.into(), pred)
    }

    /// Mask of the rows for which `pred` holds, given the row's values
    pub fn filter<F>(&self, pred: F) -> RowSelection
    where
        F: FnMut(&[&Value]) -> bool,
    {
        self.data.filter(pred)
    }

    // === Structure ===

    /// Set a column from raw values, replacing it if it exists
    ///
    /// Cells get the default style for their value kind.
    pub fn set_column<V: Into<Value>>(
        &mut self,
        name: impl Into<Value>,
        values: Vec<V>,
    ) -> Result<&mut Self> {
        let name = name.into();
        let cells: Vec<Container> = values.into_iter().map(Container::new).collect();
        match self.data.column_position(&name) {
            Some(pos) => self.data.replace_column(pos, cells)?,
            None => self.data.push_column(Container::new(name), cells)?,
        }
        Ok(self)
    }

    /// Remove a column, returning its cells
    pub fn remove_column(&mut self, name: impl Into<Value>) -> Result<Vec<Container>> {
        let name = name.into();
        let pos = self.column_position(&name)?;
        self.columns_width.retain(|(id, _)| *id != name);
        Ok(self
            .data
            .remove_column_at(pos)
            .map(|(_, cells)| cells)
            .unwrap_or_default())
    }

    /// Rename columns in place; names not in the frame are ignored
    ///
    /// Headers keep their styles and widths follow the new names.
    pub fn rename<I, K, V>(&mut self, mapping: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mapping: Vec<(Value, Value)> = mapping
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for header in self.data.columns_mut() {
            if let Some((_, new)) = mapping.iter().find(|(old, _)| *old == header.value) {
                header.value = new.clone();
            }
        }
        for (id, _) in &mut self.columns_width {
            if let Some((_, new)) = mapping.iter().find(|(old, _)| old == id) {
                *id = new.clone();
            }
        }
        self
    }

    /// Renamed copy; see [`StyleFrame::rename`]
    pub fn renamed<I, K, V>(&self, mapping: I) -> StyleFrame
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut copy = StyleFrame::from_frame(self);
        copy.rename(mapping);
        copy
    }

    // === Styling ===

    /// Style whole columns
    ///
    /// Every cell of each column takes `style`, or the frame default combined
    /// with `style` when `overwrite_default` is off.
    pub fn apply_column_style<I, C>(
        &mut self,
        columns: I,
        style: &Styler,
        options: &ColumnStyleOptions,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Value>,
    {
        let columns: Vec<Value> = columns.into_iter().map(Into::into).collect();
        let positions = self.column_positions(&columns)?;

        let style = self.style_to_apply(style, options.overwrite_default);
        let mut handles = FormatHandles::new(&style);
        let type_format =
            |s: &Styler, kind: Option<TemporalKind>| s.format_for(kind).to_string();

        for &pos in &positions {
            if options.style_header {
                self.data.columns_mut()[pos].style = handles.get(None, type_format);
                self.has_custom_headers_style = true;
            }
            if let Some(cells) = self.data.column_at_mut(pos) {
                for cell in cells {
                    let kind = if options.use_default_formats {
                        cell.value.temporal_kind()
                    } else {
                        None
                    };
                    cell.style = handles.get(kind, type_format);
                }
            }
        }

        if let Some(width) = options.width {
            self.set_column_width(columns, width)?;
        }
        Ok(self)
    }

    /// Style selected rows
    ///
    /// The row labels and the selected cells take `style`. When the style's
    /// number format is general each cell gets the format of its value kind.
    pub fn apply_style_by_indexes(
        &mut self,
        selection: impl Into<RowSelection>,
        style: &Styler,
        options: &IndexStyleOptions,
    ) -> Result<&mut Self> {
        let selection = selection.into();
        let rows = selection.resolve(&self.data)?;
        let columns = match &options.columns {
            Some(columns) => self.column_positions(columns)?,
            None => (0..self.data.num_columns()).collect(),
        };

        let style = self.style_to_apply(style, options.overwrite_default);
        let keep_format = !style.has_general_format();
        let mut handles = FormatHandles::new(&style);
        let value_format = |s: &Styler, kind: Option<TemporalKind>| {
            if keep_format {
                s.number_format.clone()
            } else {
                s.format_for(kind).to_string()
            }
        };

        for &row in &rows {
            let label = &mut self.data.index_mut()[row];
            label.style = handles.get(label.value.temporal_kind(), value_format);
            for &col in &columns {
                if let Some(cell) = self.data.iget_mut(row, col) {
                    cell.style = handles.get(cell.value.temporal_kind(), value_format);
                }
            }
        }

        if let Some(height) = options.height {
            self.set_row_height(rows.iter().map(|&r| r as i64 + 2), height)?;
        }

        if let Some(complement_style) = &options.complement_style {
            let complement = RowSelection::Positions(rows).complement(&self.data)?;
            let complement_options = IndexStyleOptions {
                columns: options.columns.clone(),
                height: options.complement_height.or(options.height),
                complement_style: None,
                complement_height: None,
                overwrite_default: options.overwrite_default,
            };
            self.apply_style_by_indexes(complement, complement_style, &complement_options)?;
        }
        Ok(self)
    }

    /// Style column headers
    ///
    /// `columns` defaults to every column. With `style_index_header` the
    /// index column header takes the style too.
    pub fn apply_headers_style(
        &mut self,
        style: &Styler,
        style_index_header: bool,
        columns: Option<Vec<Value>>,
    ) -> Result<&mut Self> {
        let positions = match columns {
            Some(columns) => self.column_positions(&columns)?,
            None => (0..self.data.num_columns()).collect(),
        };
        if style_index_header {
            self.index_header_style = style.clone();
        }
        let shared = StyleRef::new(style.clone());
        for pos in positions {
            self.data.columns_mut()[pos].style = shared.clone();
        }
        self.has_custom_headers_style = true;
        Ok(self)
    }

    /// Cycle `styles` over the rows: row `i` gets `styles[i % n]`
    pub fn style_alternate_rows(
        &mut self,
        styles: &[Styler],
        options: &IndexStyleOptions,
    ) -> Result<&mut Self> {
        let n = styles.len();
        for (i, style) in styles.iter().enumerate() {
            let rows: Vec<usize> = (i..self.len()).step_by(n).collect();
            self.apply_style_by_indexes(rows, style, options)?;
        }
        Ok(self)
    }

    /// Add a color scale over a column or a span of columns
    ///
    /// `columns_range` defaults to the first through last column.
    pub fn add_color_scale_conditional_formatting(
        &mut self,
        start: ColorScaleStop,
        end: ColorScaleStop,
        mid: Option<ColorScaleStop>,
        columns_range: Option<Vec<Value>>,
    ) -> Result<&mut Self> {
        let columns_range = match columns_range {
            Some(range) => range,
            None => {
                let columns = self.data.columns();
                match (columns.first(), columns.last()) {
                    (Some(first), Some(last)) => vec![first.value.clone(), last.value.clone()],
                    _ => Vec::new(),
                }
            }
        };
        let rule = ColorScaleConditionalFormatRule::new(start, end, mid, columns_range)?;
        self.cond_formatting.push(rule);
        Ok(self)
    }

    // === Dimensions ===

    /// Set the width of columns given by name, 1-based number or letter
    pub fn set_column_width<I, C>(&mut self, columns: I, width: impl Into<Value>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Value>,
    {
        let width = positive_dimension(width.into(), "columns width")?;
        for column in columns {
            let column = column.into();
            if !matches!(column, Value::Int(_) | Value::Text(_)) {
                return Err(StyleFrameError::invalid_type(
                    "column must be an index, column letter or column name",
                ));
            }
            match self.columns_width.iter_mut().find(|(id, _)| *id == column) {
                Some(entry) => entry.1 = width,
                None => self.columns_width.push((column, width)),
            }
        }
        Ok(self)
    }

    /// Set one width per column
    pub fn set_column_width_dict<I, C, W>(&mut self, widths: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (C, W)>,
        C: Into<Value>,
        W: Into<Value>,
    {
        for (column, width) in widths {
            self.set_column_width([column], width)?;
        }
        Ok(self)
    }

    /// Set the height of 1-based sheet rows; row 1 is the header
    pub fn set_row_height<I, R>(&mut self, rows: I, height: impl Into<Value>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Value>,
    {
        let height = positive_dimension(height.into(), "rows height")?;
        for row in rows {
            let row = i64::try_from(&row.into())
                .map_err(|_| StyleFrameError::invalid_type("row must be an index"))?;
            self.rows_height.insert(row, height);
        }
        Ok(self)
    }

    /// Set one height per row
    pub fn set_row_height_dict<I, R, H>(&mut self, heights: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (R, H)>,
        R: Into<Value>,
        H: Into<Value>,
    {
        for (row, height) in heights {
            self.set_row_height([row], height)?;
        }
        Ok(self)
    }

    // === Helpers ===

    fn style_to_apply(&self, style: &Styler, overwrite_default: bool) -> Styler {
        if overwrite_default {
            style.clone()
        } else {
            Styler::combine([&self.default_style, style])
        }
    }

    fn column_position(&self, name: &Value) -> Result<usize> {
        self.data
            .column_position(name)
            .ok_or_else(|| StyleFrameError::key(name.to_string()))
    }

    /// Positions of all `names`; fails if any is missing
    fn column_positions(&self, names: &[Value]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                self.data.column_position(name).ok_or_else(|| {
                    StyleFrameError::key(format!(
                        "one of the columns in [{}] wasn't found",
                        names
                            .iter()
                            .map(Value::to_string)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                })
            })
            .collect()
    }

    fn label_position(&self, row: Value, column: Value) -> Result<(usize, usize)> {
        let col = self.column_position(&column)?;
        let row = self
            .data
            .row_position(&row)
            .ok_or_else(|| StyleFrameError::key(row.to_string()))?;
        Ok((row, col))
    }
}

/// Width or height from a loosely typed value; must be a positive number
fn positive_dimension(value: Value, what: &str) -> Result<f64> {
    let number = match &value {
        Value::Null | Value::Date(_) | Value::Time(_) | Value::DateTime(_) => None,
        other => f64::try_from(other).ok(),
    }
    .ok_or_else(|| StyleFrameError::invalid_type(format!("{what} must be numeric value")))?;
    if number.is_nan() || number <= 0.0 {
        return Err(StyleFrameError::invalid_value(format!("{what} must be positive")));
    }
    Ok(number)
}

impl fmt::Display for StyleFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data.fmt(f)
    }
}

/// Borrowed view of one column
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    header: &'a Container,
    cells: &'a [Container],
}

impl<'a> ColumnView<'a> {
    pub fn name(&self) -> &'a Value {
        &self.header.value
    }

    pub fn header(&self) -> &'a Container {
        self.header
    }

    pub fn cells(&self) -> &'a [Container] {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn values(&self) -> Vec<&'a Value> {
        self.cells.iter().map(AsValue::as_value).collect()
    }

    /// Snapshot of each cell's style
    pub fn styles(&self) -> Vec<Styler> {
        self.cells.iter().map(|c| c.style.get()).collect()
    }

    /// Mask of the rows holding a null value
    pub fn is_null(&self) -> RowSelection {
        RowSelection::Mask(self.cells.iter().map(|c| c.value.is_null()).collect())
    }

    /// Mask of the rows holding a value
    pub fn not_null(&self) -> RowSelection {
        RowSelection::Mask(self.cells.iter().map(|c| !c.value.is_null()).collect())
    }
}
