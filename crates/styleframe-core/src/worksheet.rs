//! A single sheet: cells, their styles, and sheet-level settings

use std::collections::{BTreeMap, BTreeSet};

use crate::cell::{CellAddress, CellData, CellRange, CellStorage, CellValue, Dimensions};
use crate::comment::CellComment;
use crate::conditional_format::ColorScaleRule;
use crate::error::{Error, Result};
use crate::style::Style;
use crate::{MAX_COLS, MAX_ROWS};

/// One sheet of a [`Workbook`](crate::Workbook)
///
/// Rows and columns are 0-based everywhere. Methods taking an A1 string
/// parse it and forward to the `_at` variant.
#[derive(Debug)]
pub struct Worksheet {
    name: String,
    cells: CellStorage,
    dims: Dimensions,
    view: SheetView,
    notes: Notes,
    color_scales: Vec<ColorScaleRule>,
}

/// Settings stored in `<sheetViews>`, `<sheetProtection>` and `<autoFilter>`
#[derive(Debug, Default)]
struct SheetView {
    freeze_panes: Option<FreezePanes>,
    right_to_left: bool,
    protection: Option<SheetProtection>,
    auto_filter: Option<CellRange>,
}

#[derive(Debug, Default)]
struct Notes {
    by_cell: BTreeMap<(u32, u16), CellComment>,
    /// First-seen order; the comments part numbers authors by position
    authors: Vec<String>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            dims: Dimensions::default(),
            view: SheetView::default(),
            notes: Notes::default(),
            color_scales: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn check_bounds(row: u32, col: u16) -> Result<()> {
        if row >= MAX_ROWS {
            Err(Error::RowOutOfBounds(row, MAX_ROWS - 1))
        } else if col >= MAX_COLS {
            Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1))
        } else {
            Ok(())
        }
    }

    // Cells

    fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Value of a cell, [`CellValue::Empty`] when absent
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cell_at(row, col)
            .map(|data| data.value.clone())
            .unwrap_or_default()
    }

    pub fn set_cell_value(&mut self, a1: &str, value: impl Into<CellValue>) -> Result<()> {
        let at = CellAddress::parse(a1)?;
        self.set_cell_value_at(at.row, at.col, value)
    }

    pub fn set_cell_value_at(
        &mut self,
        row: u32,
        col: u16,
        value: impl Into<CellValue>,
    ) -> Result<()> {
        Self::check_bounds(row, col)?;
        self.cells.set_value(row, col, value.into());
        Ok(())
    }

    /// Pool index of a cell's style; 0 for unstyled or absent cells
    pub fn cell_style_index_at(&self, row: u32, col: u16) -> u32 {
        self.cell_at(row, col).map_or(0, |data| data.style_index)
    }

    pub fn style_by_index(&self, index: u32) -> Option<&Style> {
        self.cells.style_pool().get(index)
    }

    pub fn cell_style_at(&self, row: u32, col: u16) -> &Style {
        let pool = self.cells.style_pool();
        pool.get(self.cell_style_index_at(row, col))
            .unwrap_or_else(|| pool.default_style())
    }

    pub fn cell_style(&self, a1: &str) -> Result<&Style> {
        let at = CellAddress::parse(a1)?;
        Ok(self.cell_style_at(at.row, at.col))
    }

    /// Intern `style` in this sheet's pool and point the cell at it
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style: &Style) -> Result<()> {
        Self::check_bounds(row, col)?;
        let index = self.cells.style_pool_mut().get_or_insert(style.clone());
        self.cells.set_style(row, col, index);
        Ok(())
    }

    pub fn set_cell_style(&mut self, a1: &str, style: &Style) -> Result<()> {
        let at = CellAddress::parse(a1)?;
        self.set_cell_style_at(at.row, at.col, style)
    }

    pub fn max_row(&self) -> Option<u32> {
        self.cells.extent().map(|(row, _)| row)
    }

    pub fn max_col(&self) -> Option<u16> {
        self.cells.extent().map(|(_, col)| col)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Stored cells, row by row
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.cells.iter_row(row)
    }

    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.row_indices()
    }

    // Rows and columns

    pub fn row_height(&self, row: u32) -> f64 {
        self.dims.row_height(row)
    }

    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.dims.set_row_height(row, height);
    }

    pub fn column_width(&self, col: u16) -> f64 {
        self.dims.column_width(col)
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.dims.set_column_width(col, width);
    }

    pub fn is_column_hidden(&self, col: u16) -> bool {
        self.dims.is_column_hidden(col)
    }

    pub fn set_column_hidden(&mut self, col: u16, hidden: bool) {
        self.dims.set_column_hidden(col, hidden);
    }

    /// Only rows given an explicit height
    pub fn custom_row_heights(&self) -> &BTreeMap<u32, f64> {
        self.dims.row_heights()
    }

    /// Only columns given an explicit width
    pub fn custom_column_widths(&self) -> &BTreeMap<u16, f64> {
        self.dims.column_widths()
    }

    pub fn hidden_columns(&self) -> &BTreeSet<u16> {
        self.dims.hidden_columns()
    }

    // View, protection, filter

    pub fn freeze_panes(&self) -> Option<&FreezePanes> {
        self.view.freeze_panes.as_ref()
    }

    /// Keep rows above `row` and columns left of `col` in place while scrolling.
    /// `(0, 0)` unfreezes.
    pub fn set_freeze_panes(&mut self, row: u32, col: u16) {
        self.view.freeze_panes = (row > 0 || col > 0).then_some(FreezePanes { row, col });
    }

    pub fn is_right_to_left(&self) -> bool {
        self.view.right_to_left
    }

    pub fn set_right_to_left(&mut self, right_to_left: bool) {
        self.view.right_to_left = right_to_left;
    }

    pub fn protection(&self) -> Option<&SheetProtection> {
        self.view.protection.as_ref()
    }

    pub fn set_protection(&mut self, protection: Option<SheetProtection>) {
        self.view.protection = protection;
    }

    pub fn auto_filter(&self) -> Option<&CellRange> {
        self.view.auto_filter.as_ref()
    }

    pub fn set_auto_filter(&mut self, range: Option<CellRange>) {
        self.view.auto_filter = range;
    }

    // Notes

    pub fn set_comment(&mut self, a1: &str, comment: CellComment) -> Result<()> {
        let at = CellAddress::parse(a1)?;
        self.set_comment_at(at.row, at.col, comment);
        Ok(())
    }

    /// Attach a note, replacing any previous one on the cell
    pub fn set_comment_at(&mut self, row: u32, col: u16, comment: CellComment) {
        if !self.notes.authors.contains(&comment.author) {
            self.notes.authors.push(comment.author.clone());
        }
        self.notes.by_cell.insert((row, col), comment);
    }

    pub fn comment(&self, a1: &str) -> Result<Option<&CellComment>> {
        let at = CellAddress::parse(a1)?;
        Ok(self.comment_at(at.row, at.col))
    }

    pub fn comment_at(&self, row: u32, col: u16) -> Option<&CellComment> {
        self.notes.by_cell.get(&(row, col))
    }

    pub fn comment_count(&self) -> usize {
        self.notes.by_cell.len()
    }

    /// Notes in row-major order
    pub fn comments(&self) -> Vec<((u32, u16), &CellComment)> {
        self.notes
            .by_cell
            .iter()
            .map(|(&at, comment)| (at, comment))
            .collect()
    }

    pub fn comment_authors(&self) -> &[String] {
        &self.notes.authors
    }

    // Conditional formatting

    pub fn add_color_scale(&mut self, rule: ColorScaleRule) {
        self.color_scales.push(rule);
    }

    pub fn color_scales(&self) -> &[ColorScaleRule] {
        &self.color_scales
    }
}

/// Split position of a frozen pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreezePanes {
    /// Count of frozen rows, which is also the first scrolling row
    pub row: u32,
    /// Count of frozen columns
    pub col: u16,
}

impl FreezePanes {
    pub fn top_left_cell(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetProtection {
    pub protected: bool,
    /// Users may still filter a protected sheet
    pub auto_filter: bool,
}

impl Default for SheetProtection {
    fn default() -> Self {
        Self {
            protected: true,
            auto_filter: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_values_by_address_and_index() {
        let mut ws = Worksheet::new("Data");
        ws.set_cell_value("A1", "Hello").unwrap();
        ws.set_cell_value("B1", 42.0).unwrap();
        ws.set_cell_value_at(3, 2, true).unwrap();

        assert_eq!(ws.get_value_at(0, 0).as_str(), Some("Hello"));
        assert_eq!(ws.get_value_at(0, 1), CellValue::Number(42.0));
        assert_eq!(ws.get_value_at(3, 2), CellValue::Boolean(true));
        assert!(ws.get_value_at(7, 7).is_empty());
        assert_eq!((ws.max_row(), ws.max_col()), (Some(3), Some(2)));
    }

    #[test]
    fn test_equal_styles_share_an_index() {
        let mut ws = Worksheet::new("Data");
        let style = Style::new().bold(true).fill_color(Color::YELLOW);

        ws.set_cell_style_at(0, 0, &style).unwrap();
        ws.set_cell_style_at(3, 1, &style).unwrap();

        assert_eq!(ws.cell_style_index_at(0, 0), ws.cell_style_index_at(3, 1));
        assert_eq!(ws.cell_style("B4").unwrap(), &style);
        assert_eq!(ws.cell_style_at(9, 9), &Style::default());
    }

    #[test]
    fn test_positions_past_the_sheet_limits() {
        let mut ws = Worksheet::new("Data");
        assert!(matches!(
            ws.set_cell_value_at(MAX_ROWS, 0, 1.0),
            Err(Error::RowOutOfBounds(..))
        ));
        assert!(ws.set_cell_style_at(0, MAX_COLS, &Style::new()).is_err());
        assert!(ws.is_empty());
    }

    #[test]
    fn test_view_settings() {
        let mut ws = Worksheet::new("Data");

        ws.set_freeze_panes(2, 1);
        assert_eq!(ws.freeze_panes().unwrap().top_left_cell().to_string(), "B3");
        ws.set_freeze_panes(0, 0);
        assert!(ws.freeze_panes().is_none());

        ws.set_right_to_left(true);
        assert!(ws.is_right_to_left());

        ws.set_protection(Some(SheetProtection::default()));
        assert!(!ws.protection().unwrap().auto_filter);

        ws.set_column_hidden(4, true);
        assert!(ws.hidden_columns().contains(&4));
    }

    #[test]
    fn test_notes_are_ordered_and_authors_deduplicated() {
        let mut ws = Worksheet::new("Data");

        ws.set_comment("B2", CellComment::new("Ann", "Review this"))
            .unwrap();
        ws.set_comment_at(0, 0, CellComment::new("Ann", "Another"));
        ws.set_comment_at(2, 2, CellComment::new("Bo", "Mine"));

        assert_eq!(ws.comment_count(), 3);
        assert_eq!(ws.comment_authors(), &["Ann", "Bo"]);
        assert_eq!(ws.comment("B2").unwrap().unwrap().text, "Review this");

        let order: Vec<_> = ws.comments().into_iter().map(|(at, _)| at).collect();
        assert_eq!(order, vec![(0, 0), (1, 1), (2, 2)]);
    }
}
