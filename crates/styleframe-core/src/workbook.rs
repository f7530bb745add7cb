//! Ordered collection of sheets sharing one theme

use crate::error::{Error, Result};
use crate::style::ThemePalette;
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Characters a sheet name may not contain
const FORBIDDEN_IN_NAME: [char; 7] = [':', '\\', '/', '?', '*', '[', ']'];

#[derive(Debug)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
    /// Palette that `theme` color references resolve against
    theme: ThemePalette,
}

impl Workbook {
    /// A workbook holding a single empty "Sheet1"
    pub fn new() -> Self {
        let mut workbook = Self::empty();
        workbook.sheets.push(Worksheet::new("Sheet1"));
        workbook
    }

    /// A workbook without sheets, to be filled with [`add_worksheet_with_name`](Self::add_worksheet_with_name)
    pub fn empty() -> Self {
        Self {
            sheets: Vec::new(),
            theme: ThemePalette::default(),
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.sheets.get(index)
    }

    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.sheets.get_mut(index)
    }

    /// Exact, case-sensitive lookup
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).map(|i| &self.sheets[i])
    }

    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|sheet| sheet.name() == name)
    }

    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.sheets.iter()
    }

    /// Append a sheet and return its position
    ///
    /// Names must be 1 to 31 characters, avoid `: \ / ? * [ ]`, and differ
    /// from every existing name ignoring case.
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.check_new_name(name)?;
        self.sheets.push(Worksheet::new(name));
        Ok(self.sheets.len() - 1)
    }

    pub fn theme(&self) -> &ThemePalette {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: ThemePalette) {
        self.theme = theme;
    }

    fn check_new_name(&self, name: &str) -> Result<()> {
        let problem = if name.is_empty() {
            Some("a sheet name cannot be empty".to_string())
        } else if name.chars().count() > MAX_SHEET_NAME_LEN {
            Some(format!("'{name}' is longer than {MAX_SHEET_NAME_LEN} characters"))
        } else {
            name.chars()
                .find(|c| FORBIDDEN_IN_NAME.contains(c))
                .map(|c| format!("'{name}' contains '{c}'"))
        };
        if let Some(problem) = problem {
            return Err(Error::InvalidSheetName(problem));
        }

        let lowered = name.to_lowercase();
        if self.sheets.iter().any(|s| s.name().to_lowercase() == lowered) {
            return Err(Error::DuplicateSheetName(name.to_string()));
        }
        Ok(())
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_empty() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.worksheet(0).unwrap().name(), "Sheet1");
        assert!(Workbook::empty().is_empty());
    }

    #[test]
    fn test_sheets_keep_insertion_order() {
        let mut wb = Workbook::empty();
        assert_eq!(wb.add_worksheet_with_name("Data").unwrap(), 0);
        assert_eq!(wb.add_worksheet_with_name("More").unwrap(), 1);
        assert_eq!(wb.sheet_index("More"), Some(1));
        assert!(wb.worksheet_by_name("Data").is_some());
        assert!(wb.worksheet_by_name("data").is_none());
    }

    #[test]
    fn test_names_clash_ignoring_case() {
        let mut wb = Workbook::new();
        assert!(matches!(
            wb.add_worksheet_with_name("SHEET1"),
            Err(Error::DuplicateSheetName(_))
        ));
    }

    #[test]
    fn test_rejected_names() {
        let mut wb = Workbook::empty();
        let too_long = "x".repeat(MAX_SHEET_NAME_LEN + 1);
        for name in ["", "a/b", "a:b", "[a]", too_long.as_str()] {
            assert!(
                matches!(
                    wb.add_worksheet_with_name(name),
                    Err(Error::InvalidSheetName(_))
                ),
                "{name:?}"
            );
        }
        assert!(wb.is_empty());
    }

    #[test]
    fn test_theme_palette() {
        let mut wb = Workbook::new();
        assert_eq!(wb.theme().get(4), Some("4F81BD"));
        wb.set_theme(ThemePalette::new(["112233"]));
        assert_eq!(wb.theme().colors().len(), 1);
    }
}
