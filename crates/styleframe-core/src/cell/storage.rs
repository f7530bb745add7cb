//! Sparse cell grid and sheet dimensions

use super::CellValue;
use crate::style::StylePool;
use std::collections::{BTreeMap, BTreeSet};

/// Value and pooled style of one cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellData {
    pub value: CellValue,
    /// Index into the worksheet's style pool; 0 is the default style
    pub style_index: u32,
}

impl CellData {
    pub fn new(value: CellValue) -> Self {
        Self::with_style(value, 0)
    }

    pub fn with_style(value: CellValue, style_index: u32) -> Self {
        Self { value, style_index }
    }

    /// No value and the default style
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.style_index == 0
    }
}

/// Cells keyed by `(row, col)`
///
/// Tuple keys order row-major, matching the order cells appear in sheet XML.
/// Cells that become empty are dropped.
#[derive(Debug, Default)]
pub struct CellStorage {
    cells: BTreeMap<(u32, u16), CellData>,
    style_pool: StylePool,
}

impl CellStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(&(row, col))
    }

    fn put(&mut self, row: u32, col: u16, data: CellData) {
        if data.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), data);
        }
    }

    /// Replace the value, keeping the style
    pub(crate) fn set_value(&mut self, row: u32, col: u16, value: CellValue) {
        let style_index = self.get(row, col).map_or(0, |c| c.style_index);
        self.put(row, col, CellData::with_style(value, style_index));
    }

    /// Replace the style, keeping the value
    pub(crate) fn set_style(&mut self, row: u32, col: u16, style_index: u32) {
        let value = self.get(row, col).map(|c| c.value.clone()).unwrap_or_default();
        self.put(row, col, CellData::with_style(value, style_index));
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Highest row and highest column holding a cell
    pub(crate) fn extent(&self) -> Option<(u32, u16)> {
        let (&(last_row, _), _) = self.cells.last_key_value()?;
        let last_col = self.cells.keys().map(|&(_, col)| col).max()?;
        Some((last_row, last_col))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter().map(|(&(row, col), data)| (row, col, data))
    }

    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.cells
            .range((row, 0)..=(row, u16::MAX))
            .map(|(&(_, col), data)| (col, data))
    }

    /// Distinct rows holding a cell, ascending
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        let mut last = None;
        self.cells.keys().filter_map(move |&(row, _)| {
            if last == Some(row) {
                None
            } else {
                last = Some(row);
                Some(row)
            }
        })
    }

    pub(crate) fn style_pool(&self) -> &StylePool {
        &self.style_pool
    }

    pub(crate) fn style_pool_mut(&mut self) -> &mut StylePool {
        &mut self.style_pool
    }
}

/// Row heights, column widths and hidden columns of a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Dimensions {
    default_row_height: f64,
    default_column_width: f64,
    row_heights: BTreeMap<u32, f64>,
    column_widths: BTreeMap<u16, f64>,
    hidden_columns: BTreeSet<u16>,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            default_row_height: 15.0,
            default_column_width: 8.43,
            row_heights: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            hidden_columns: BTreeSet::new(),
        }
    }
}

impl Dimensions {
    /// Height in points
    pub fn row_height(&self, row: u32) -> f64 {
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(self.default_row_height)
    }

    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.row_heights.insert(row, height);
    }

    /// Width in characters
    pub fn column_width(&self, col: u16) -> f64 {
        self.column_widths
            .get(&col)
            .copied()
            .unwrap_or(self.default_column_width)
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn is_column_hidden(&self, col: u16) -> bool {
        self.hidden_columns.contains(&col)
    }

    pub fn set_column_hidden(&mut self, col: u16, hidden: bool) {
        if hidden {
            self.hidden_columns.insert(col);
        } else {
            self.hidden_columns.remove(&col);
        }
    }

    pub fn row_heights(&self) -> &BTreeMap<u32, f64> {
        &self.row_heights
    }

    pub fn column_widths(&self) -> &BTreeMap<u16, f64> {
        &self.column_widths
    }

    pub fn hidden_columns(&self) -> &BTreeSet<u16> {
        &self.hidden_columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_and_styles_are_independent() {
        let mut storage = CellStorage::new();
        storage.set_value(0, 0, CellValue::Number(42.0));
        assert_eq!(storage.get(0, 0).unwrap().value, CellValue::Number(42.0));
        assert!(storage.get(1, 1).is_none());

        storage.set_style(2, 2, 3);
        assert!(storage.get(2, 2).unwrap().value.is_empty());
        storage.set_value(2, 2, CellValue::Number(1.0));
        assert_eq!(storage.get(2, 2).unwrap().style_index, 3);
        assert_eq!(storage.iter().count(), 2);
    }

    #[test]
    fn test_emptied_cells_are_dropped() {
        let mut storage = CellStorage::new();
        storage.set_value(0, 0, CellValue::Number(42.0));
        storage.set_value(0, 0, CellValue::Empty);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_extent_and_row_order() {
        let mut storage = CellStorage::new();
        assert!(storage.extent().is_none());

        storage.set_value(5, 3, CellValue::Number(1.0));
        storage.set_value(10, 1, CellValue::Number(2.0));
        storage.set_value(2, 7, CellValue::Number(3.0));
        storage.set_value(5, 0, CellValue::Number(4.0));

        assert_eq!(storage.extent(), Some((10, 7)));
        assert_eq!(storage.row_indices().collect::<Vec<_>>(), vec![2, 5, 10]);
        let row5: Vec<u16> = storage.iter_row(5).map(|(col, _)| col).collect();
        assert_eq!(row5, vec![0, 3]);
    }

    #[test]
    fn test_dimensions() {
        let mut dims = Dimensions::default();
        assert_eq!(dims.row_height(0), 15.0);
        assert_eq!(dims.column_width(0), 8.43);

        dims.set_row_height(5, 30.0);
        dims.set_column_width(3, 20.0);
        dims.set_column_hidden(5, true);
        assert_eq!(dims.row_height(5), 30.0);
        assert_eq!(dims.column_width(3), 20.0);
        assert!(dims.is_column_hidden(5));

        dims.set_column_hidden(5, false);
        assert!(dims.hidden_columns().is_empty());
    }
}
