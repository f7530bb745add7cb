//! Column-major tabular data with labeled rows and columns
//!
//! ```rust
//! use styleframe::{RowSelection, Table, Value};
//!
//! let table = Table::from_columns([("a", vec![1, 2, 3]), ("b", vec![4, 5, 6])]).unwrap();
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.get(&Value::Int(1), &"b".into()), Some(&Value::Int(5)));
//!
//! let big = table.rows_where(&"a".into(), |v| *v > Value::Int(1)).unwrap();
//! assert_eq!(big.resolve(&table).unwrap(), vec![1, 2]);
//! ```

use std::fmt;

use ahash::AHashSet;
use serde_json::Value as Json;

use crate::container::Container;
use crate::error::{Result, StyleFrameError};
use crate::value::Value;

/// Access to the plain value of a table element
pub trait AsValue {
    fn as_value(&self) -> &Value;
}

impl AsValue for Value {
    fn as_value(&self) -> &Value {
        self
    }
}

impl AsValue for Container {
    fn as_value(&self) -> &Value {
        &self.value
    }
}

/// A table of `T` with column labels and row labels
///
/// Cells are stored per column. Labels are matched by value, and the first
/// match wins when labels repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T = Value> {
    columns: Vec<T>,
    index: Vec<T>,
    data: Vec<Vec<T>>,
    index_name: Option<String>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            index: Vec::new(),
            data: Vec::new(),
            index_name: None,
        }
    }
}

impl Table<Value> {
    /// Build from `(column, values)` pairs with a 0-based integer index
    ///
    /// All columns must have the same length.
    pub fn from_columns<I, K, V>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut table = Table::default();
        let mut rows = None;
        for (name, values) in columns {
            let values: Vec<Value> = values.into_iter().map(Into::into).collect();
            match rows {
                None => rows = Some(values.len()),
                Some(n) if n != values.len() => {
                    return Err(StyleFrameError::invalid_value(
                        "All arrays must be of the same length",
                    ))
                }
                Some(_) => {}
            }
            table.columns.push(name.into());
            table.data.push(values);
        }
        table.index = (0..rows.unwrap_or(0)).map(Value::from).collect();
        Ok(table)
    }

    /// Build from records of `(column, value)` pairs
    ///
    /// Columns appear in first-seen order; keys missing from a record are null.
    pub fn from_records<I, R, K, V>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let records: Vec<Vec<(Value, Value)>> = records
            .into_iter()
            .map(|r| r.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
            .collect();

        let mut table = Table::default();
        for record in &records {
            for (key, _) in record {
                if !table.columns.contains(key) {
                    table.columns.push(key.clone());
                    table.data.push(Vec::with_capacity(records.len()));
                }
            }
        }
        for record in records {
            let mut row = vec![Value::Null; table.columns.len()];
            for (key, value) in record {
                if let Some(pos) = table.columns.iter().position(|c| *c == key) {
                    row[pos] = value;
                }
            }
            for (column, value) in table.data.iter_mut().zip(row) {
                column.push(value);
            }
        }
        table.index = (0..table.data.first().map_or(0, Vec::len))
            .map(Value::from)
            .collect();
        table
    }

    /// Build from a JSON object of arrays or an array of objects
    pub fn from_json(json: &Json) -> Result<Self> {
        match json {
            Json::Object(map) => {
                let mut columns = Vec::with_capacity(map.len());
                for (name, values) in map {
                    let Json::Array(values) = values else {
                        return Err(StyleFrameError::invalid_type(format!(
                            "column {name:?} must be an array"
                        )));
                    };
                    let values: Vec<Value> = values.iter().map(Value::from).collect();
                    columns.push((Value::text(name.as_str()), values));
                }
                Table::from_columns(columns)
            }
            Json::Array(records) => {
                let mut rows = Vec::with_capacity(records.len());
                for record in records {
                    let Json::Object(fields) = record else {
                        return Err(StyleFrameError::invalid_type(
                            "records must be JSON objects",
                        ));
                    };
                    rows.push(
                        fields
                            .iter()
                            .map(|(k, v)| (Value::text(k.as_str()), Value::from(v)))
                            .collect::<Vec<_>>(),
                    );
                }
                Ok(Table::from_records(rows))
            }
            other => Err(StyleFrameError::invalid_type(format!(
                "cannot build a table from JSON {}",
                json_kind(other)
            ))),
        }
    }

    /// Convert every label and cell
    pub fn map<U, F>(self, mut f: F) -> Table<U>
    where
        F: FnMut(Value) -> U,
    {
        Table {
            columns: self.columns.into_iter().map(&mut f).collect(),
            index: self.index.into_iter().map(&mut f).collect(),
            data: self
                .data
                .into_iter()
                .map(|column| column.into_iter().map(&mut f).collect())
                .collect(),
            index_name: self.index_name,
        }
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

impl<T> Table<T> {
    /// Assemble a table from parts that already agree in shape
    pub(crate) fn from_parts(
        columns: Vec<T>,
        index: Vec<T>,
        data: Vec<Vec<T>>,
        index_name: Option<String>,
    ) -> Self {
        debug_assert_eq!(columns.len(), data.len());
        Self {
            columns,
            index,
            data,
            index_name,
        }
    }

    /// Replace the row labels
    pub fn with_index<I, L>(mut self, index: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<T>,
    {
        let index: Vec<T> = index.into_iter().map(Into::into).collect();
        if index.len() != self.index.len() {
            return Err(StyleFrameError::invalid_value(format!(
                "Length mismatch: table has {} rows, new index has {} labels",
                self.index.len(),
                index.len()
            )));
        }
        self.index = index;
        Ok(self)
    }

    pub fn with_index_name<S: Into<String>>(mut self, name: S) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[T] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [T] {
        &mut self.columns
    }

    pub fn index(&self) -> &[T] {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut [T] {
        &mut self.index
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Cells of the column at `pos`
    pub fn column_at(&self, pos: usize) -> Option<&[T]> {
        self.data.get(pos).map(Vec::as_slice)
    }

    pub fn column_at_mut(&mut self, pos: usize) -> Option<&mut [T]> {
        self.data.get_mut(pos).map(Vec::as_mut_slice)
    }

    /// Cell by row and column position
    pub fn iget(&self, row: usize, col: usize) -> Option<&T> {
        self.data.get(col)?.get(row)
    }

    pub fn iget_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.data.get_mut(col)?.get_mut(row)
    }

    /// Append a column; its length must match the row count
    pub fn push_column(&mut self, name: T, values: Vec<T>) -> Result<()> {
        if values.len() != self.len() {
            return Err(StyleFrameError::invalid_value(format!(
                "Length of values ({}) does not match length of index ({})",
                values.len(),
                self.len()
            )));
        }
        self.columns.push(name);
        self.data.push(values);
        Ok(())
    }

    /// Replace the cells of the column at `pos`
    pub fn replace_column(&mut self, pos: usize, values: Vec<T>) -> Result<()> {
        if values.len() != self.len() {
            return Err(StyleFrameError::invalid_value(format!(
                "Length of values ({}) does not match length of index ({})",
                values.len(),
                self.len()
            )));
        }
        match self.data.get_mut(pos) {
            Some(column) => {
                *column = values;
                Ok(())
            }
            None => Err(StyleFrameError::index(format!("column position {pos} out of range"))),
        }
    }

    /// Remove the column at `pos`, returning its label and cells
    pub fn remove_column_at(&mut self, pos: usize) -> Option<(T, Vec<T>)> {
        if pos >= self.columns.len() {
            return None;
        }
        Some((self.columns.remove(pos), self.data.remove(pos)))
    }

    /// Append a row; it must have one cell per column
    pub fn push_row(&mut self, label: T, row: Vec<T>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(StyleFrameError::invalid_value(format!(
                "row has {} cells but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.index.push(label);
        for (column, cell) in self.data.iter_mut().zip(row) {
            column.push(cell);
        }
        Ok(())
    }

    /// Keep only the first `rows` rows and `cols` columns
    pub fn truncate(&mut self, rows: usize, cols: usize) {
        self.columns.truncate(cols);
        self.data.truncate(cols);
        self.index.truncate(rows);
        for column in &mut self.data {
            column.truncate(rows);
        }
    }
}

impl<T: AsValue> Table<T> {
    /// Position of the first column labeled `name`
    pub fn column_position(&self, name: &Value) -> Option<usize> {
        self.columns.iter().position(|c| c.as_value() == name)
    }

    /// Position of the first row labeled `label`
    pub fn row_position(&self, label: &Value) -> Option<usize> {
        self.index.iter().position(|l| l.as_value() == label)
    }

    /// Cells of the column labeled `name`
    pub fn column(&self, name: &Value) -> Option<&[T]> {
        self.column_position(name).and_then(|pos| self.column_at(pos))
    }

    /// Cell by row label and column label
    pub fn get(&self, row: &Value, column: &Value) -> Option<&T> {
        let col = self.column_position(column)?;
        let row = self.row_position(row)?;
        self.iget(row, col)
    }

    pub fn get_mut(&mut self, row: &Value, column: &Value) -> Option<&mut T> {
        let col = self.column_position(column)?;
        let row = self.row_position(row)?;
        self.iget_mut(row, col)
    }

    /// Mask of the rows whose cell in `column` satisfies `pred`
    pub fn rows_where<F>(&self, column: &Value, mut pred: F) -> Result<RowSelection>
    where
        F: FnMut(&Value) -> bool,
    {
        let cells = self
            .column(column)
            .ok_or_else(|| StyleFrameError::key(column.to_string()))?;
        Ok(RowSelection::Mask(
            cells.iter().map(|c| pred(c.as_value())).collect(),
        ))
    }

    /// Mask of the rows for which `pred` holds, given the row's cells
    pub fn filter<F>(&self, mut pred: F) -> RowSelection
    where
        F: FnMut(&[&Value]) -> bool,
    {
        RowSelection::Mask(
            (0..self.len())
                .map(|row| {
                    let cells: Vec<&Value> =
                        self.data.iter().map(|column| column[row].as_value()).collect();
                    pred(&cells)
                })
                .collect(),
        )
    }
}

impl<T: AsValue> fmt::Display for Table<T> {
    /// Plain text grid with the index as the first column
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(self.len() + 1);
        let mut header = vec![self.index_name.clone().unwrap_or_default()];
        header.extend(self.columns.iter().map(|c| c.as_value().to_string()));
        grid.push(header);
        for row in 0..self.len() {
            let mut line = vec![self.index[row].as_value().to_string()];
            line.extend(self.data.iter().map(|c| c[row].as_value().to_string()));
            grid.push(line);
        }

        let widths: Vec<usize> = (0..=self.columns.len())
            .map(|col| {
                grid.iter()
                    .map(|line| line[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        for (i, line) in grid.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{cell:>w$}"))
                .collect();
            f.write_str(cells.join("  ").trim_end())?;
        }
        Ok(())
    }
}

/// Which rows an operation applies to
#[derive(Debug, Clone, PartialEq)]
pub enum RowSelection {
    /// 0-based row positions
    Positions(Vec<usize>),
    /// Row labels
    Labels(Vec<Value>),
    /// One flag per row
    Mask(Vec<bool>),
}

impl RowSelection {
    /// Row positions this selection picks, without duplicates
    pub fn resolve<T: AsValue>(&self, table: &Table<T>) -> Result<Vec<usize>> {
        let positions = match self {
            RowSelection::Positions(positions) => {
                if let Some(bad) = positions.iter().find(|&&p| p >= table.len()) {
                    return Err(StyleFrameError::index(format!(
                        "row position {} out of range for {} rows",
                        bad,
                        table.len()
                    )));
                }
                positions.clone()
            }
            RowSelection::Labels(labels) => labels
                .iter()
                .map(|label| {
                    table
                        .row_position(label)
                        .ok_or_else(|| StyleFrameError::key(label.to_string()))
                })
                .collect::<Result<Vec<_>>>()?,
            RowSelection::Mask(mask) => {
                if mask.len() != table.len() {
                    return Err(StyleFrameError::invalid_value(format!(
                        "Item wrong length {} instead of {}",
                        mask.len(),
                        table.len()
                    )));
                }
                mask.iter()
                    .enumerate()
                    .filter_map(|(pos, &keep)| keep.then_some(pos))
                    .collect()
            }
        };
        let mut seen = AHashSet::with_capacity(positions.len());
        Ok(positions.into_iter().filter(|p| seen.insert(*p)).collect())
    }

    /// Every row this selection does not pick
    pub fn complement<T: AsValue>(&self, table: &Table<T>) -> Result<RowSelection> {
        let picked: AHashSet<usize> = self.resolve(table)?.into_iter().collect();
        Ok(RowSelection::Positions(
            (0..table.len()).filter(|p| !picked.contains(p)).collect(),
        ))
    }
}

impl From<usize> for RowSelection {
    fn from(position: usize) -> Self {
        RowSelection::Positions(vec![position])
    }
}

impl From<Vec<usize>> for RowSelection {
    fn from(positions: Vec<usize>) -> Self {
        RowSelection::Positions(positions)
    }
}

impl From<std::ops::Range<usize>> for RowSelection {
    fn from(range: std::ops::Range<usize>) -> Self {
        RowSelection::Positions(range.collect())
    }
}

impl From<Vec<bool>> for RowSelection {
    fn from(mask: Vec<bool>) -> Self {
        RowSelection::Mask(mask)
    }
}

impl From<Vec<Value>> for RowSelection {
    fn from(labels: Vec<Value>) -> Self {
        RowSelection::Labels(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ArithOp;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Table {
        Table::from_columns([("a", vec![1, 2, 3, 4]), ("b", vec![5, 6, 7, 8])]).unwrap()
    }

    #[test]
    fn test_from_columns() {
        let t = sample();
        assert_eq!(t.len(), 4);
        assert_eq!(t.columns(), &[Value::text("a"), Value::text("b")]);
        assert_eq!(t.index()[3], Value::Int(3));
        assert_eq!(t.iget(2, 1), Some(&Value::Int(7)));
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let err = Table::from_columns([("a", vec![1, 2]), ("b", vec![1])]).unwrap_err();
        assert!(matches!(err, StyleFrameError::InvalidValue(_)));
    }

    #[test]
    fn test_from_records_fills_missing() {
        let t = Table::from_records(vec![
            vec![("a", Value::Int(1))],
            vec![("b", Value::Int(2)), ("a", Value::Int(3))],
        ]);
        assert_eq!(t.columns(), &[Value::text("a"), Value::text("b")]);
        assert_eq!(t.iget(0, 1), Some(&Value::Null));
        assert_eq!(t.iget(1, 0), Some(&Value::Int(3)));
    }

    #[test]
    fn test_from_json_shapes() {
        let by_column = Table::from_json(&json!({"x": [1, 2], "y": ["a", null]})).unwrap();
        assert_eq!(by_column.iget(1, 1), Some(&Value::Null));

        let by_record = Table::from_json(&json!([{"x": 1}, {"x": 2.5}])).unwrap();
        assert_eq!(by_record.iget(1, 0), Some(&Value::Float(2.5)));

        assert!(matches!(
            Table::from_json(&json!(3)),
            Err(StyleFrameError::InvalidType(_))
        ));
    }

    #[test]
    fn test_label_lookup() {
        let t = sample().with_index(["w", "x", "y", "z"]).unwrap();
        assert_eq!(t.get(&"y".into(), &"a".into()), Some(&Value::Int(3)));
        assert_eq!(t.get(&"q".into(), &"a".into()), None);
        assert!(sample().with_index(["w"]).is_err());
    }

    #[test]
    fn test_row_selection_resolve() {
        let t = sample();
        assert_eq!(RowSelection::from(vec![2usize, 0, 2]).resolve(&t).unwrap(), vec![2, 0]);
        assert_eq!(
            RowSelection::from(vec![Value::Int(1)]).resolve(&t).unwrap(),
            vec![1]
        );
        assert!(matches!(
            RowSelection::from(vec![9usize]).resolve(&t),
            Err(StyleFrameError::Index(_))
        ));
        assert!(matches!(
            RowSelection::from(vec![Value::text("nope")]).resolve(&t),
            Err(StyleFrameError::Key(_))
        ));
        assert!(matches!(
            RowSelection::from(vec![true]).resolve(&t),
            Err(StyleFrameError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_rows_where_and_complement() {
        let t = sample();
        let even = t
            .rows_where(&"a".into(), |v| {
                v.apply(ArithOp::Rem, &Value::Int(2))
                    .map_or(false, |r| r == Value::Int(0))
            })
            .unwrap();
        assert_eq!(even.resolve(&t).unwrap(), vec![1, 3]);
        assert_eq!(even.complement(&t).unwrap(), RowSelection::Positions(vec![0, 2]));
        assert!(t.rows_where(&"zzz".into(), |_| true).is_err());
    }

    #[test]
    fn test_filter_sees_whole_row() {
        let t = sample();
        let sel = t.filter(|row| row[0] == &Value::Int(1) || row[1] == &Value::Int(8));
        assert_eq!(sel.resolve(&t).unwrap(), vec![0, 3]);
    }

    #[test]
    fn test_push_and_truncate() {
        let mut t = sample();
        t.push_row(Value::Int(4), vec![Value::Int(9), Value::Int(10)])
            .unwrap();
        assert_eq!(t.len(), 5);
        assert!(t.push_row(Value::Int(5), vec![Value::Null]).is_err());
        t.truncate(2, 1);
        assert_eq!(t.len(), 2);
        assert_eq!(t.num_columns(), 1);
        assert_eq!(t.column_at(0).unwrap().len(), 2);
    }

    #[test]
    fn test_display() {
        let t = Table::from_columns([("a", vec![1, 22])]).unwrap();
        assert_eq!(t.to_string(), "    a\n0   1\n1  22");
    }
}
