//! A1 notation

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// 0-based position of one cell
///
/// A1 text is 1-based with lettered columns. `$` anchors are accepted and
/// discarded when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    /// A is 0
    pub col: u16,
}

impl CellAddress {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// ```
    /// use styleframe_core::CellAddress;
    ///
    /// let at = CellAddress::parse("$C$3").unwrap();
    /// assert_eq!((at.row, at.col), (2, 2));
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let bad = || Error::InvalidAddress(text.to_string());

        let digits_at = text.find(|c: char| c.is_ascii_digit()).ok_or_else(bad)?;
        let (letters, digits) = text.split_at(digits_at);
        let letters = letters.trim_matches('$');
        if letters.is_empty() {
            return Err(bad());
        }
        let col = Self::letters_to_column(letters)?;
        let row = match digits.parse::<u32>() {
            Ok(0) | Err(_) => return Err(bad()),
            Ok(row) if row > MAX_ROWS => return Err(Error::RowOutOfBounds(row, MAX_ROWS)),
            Ok(row) => row - 1,
        };
        Ok(Self { row, col })
    }

    /// Bijective base-26: 0 is "A", 25 is "Z", 26 is "AA"
    pub fn column_to_letters(col: u16) -> String {
        let mut n = u32::from(col) + 1;
        let mut letters = Vec::new();
        while n > 0 {
            n -= 1;
            letters.push(char::from(b'A' + (n % 26) as u8));
            n /= 26;
        }
        letters.iter().rev().collect()
    }

    /// Inverse of [`column_to_letters`](Self::column_to_letters), case-insensitive
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        let bad = || Error::InvalidAddress(letters.to_string());
        if letters.is_empty() {
            return Err(bad());
        }
        let mut n: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(bad());
            }
            n = n * 26 + u32::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
            if n > u32::from(MAX_COLS) {
                return Err(bad());
            }
        }
        Ok((n - 1) as u16)
    }

    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Inclusive rectangle; `start` is always the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    /// Any two opposite corners
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    pub fn from_indices(first_row: u32, first_col: u16, last_row: u32, last_col: u16) -> Self {
        Self::new(
            CellAddress::new(first_row, first_col),
            CellAddress::new(last_row, last_col),
        )
    }

    /// `"A1:B2"`, or a lone `"A1"` for a one-cell range
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let corner =
            |part: &str| CellAddress::parse(part).map_err(|_| Error::InvalidRange(text.to_string()));
        let (a, b) = match text.split_once(':') {
            Some((a, b)) => (corner(a)?, corner(b)?),
            None => {
                let only = corner(text)?;
                (only, only)
            }
        };
        Ok(Self::new(a, b))
    }

    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_last_cell() {
        assert_eq!(CellAddress::parse("A1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(
            CellAddress::parse("XFD1048576").unwrap(),
            CellAddress::new(1_048_575, 16_383)
        );
    }

    #[test]
    fn test_anchors_and_lowercase() {
        assert_eq!(CellAddress::parse("$B$2").unwrap(), CellAddress::new(1, 1));
        assert_eq!("c3".parse::<CellAddress>().unwrap(), CellAddress::new(2, 2));
    }

    #[test]
    fn test_malformed_addresses() {
        for text in ["", "A", "1", "A0", "XFE1", "A1048577", "A-1"] {
            assert!(CellAddress::parse(text).is_err(), "{text:?}");
        }
    }

    #[test]
    fn test_column_letters() {
        for (col, letters) in [(0, "A"), (25, "Z"), (26, "AA"), (701, "ZZ"), (702, "AAA")] {
            assert_eq!(CellAddress::column_to_letters(col), letters);
            assert_eq!(CellAddress::letters_to_column(letters).unwrap(), col);
        }
        assert!(CellAddress::letters_to_column("A1").is_err());
    }

    #[test]
    fn test_range_corners_are_normalised() {
        let range = CellRange::parse("C3:A1").unwrap();
        assert_eq!(range.start, CellAddress::new(0, 0));
        assert_eq!(range.end, CellAddress::new(2, 2));
        assert_eq!(range.to_string(), "A1:C3");
        assert_eq!(CellRange::parse("B2").unwrap().to_string(), "B2");
        assert!(matches!(CellRange::parse("B2:"), Err(Error::InvalidRange(_))));
    }
}
