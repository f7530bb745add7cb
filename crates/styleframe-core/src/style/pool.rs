//! Per-sheet style table

use super::Style;
use ahash::AHashMap;

/// Distinct styles of one worksheet
///
/// Cells store an index into the pool. Index 0 is always the default style,
/// so a cell that was never styled and one styled with `Style::default()`
/// are indistinguishable.
#[derive(Debug)]
pub struct StylePool {
    styles: Vec<Style>,
    lookup: AHashMap<Style, u32>,
}

impl StylePool {
    pub fn new() -> Self {
        let default = Style::default();
        let mut lookup = AHashMap::new();
        lookup.insert(default.clone(), 0);
        Self {
            styles: vec![default],
            lookup,
        }
    }

    /// Index of `style`, adding it on first sight
    pub(crate) fn get_or_insert(&mut self, style: Style) -> u32 {
        if let Some(&index) = self.lookup.get(&style) {
            return index;
        }
        let index = self.styles.len() as u32;
        self.styles.push(style.clone());
        self.lookup.insert(style, index);
        index
    }

    pub fn get(&self, index: u32) -> Option<&Style> {
        self.styles.get(index as usize)
    }

    /// Style at index 0
    pub fn default_style(&self) -> &Style {
        &self.styles[0]
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// True while only the default style is present
    pub fn is_empty(&self) -> bool {
        self.styles.len() == 1
    }

    /// Styles in insertion order with their indices
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Style)> {
        (0u32..).zip(self.styles.iter())
    }
}

impl Default for StylePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn test_starts_with_default() {
        let pool = StylePool::new();
        assert_eq!(pool.len(), 1);
        assert!(pool.is_empty());
        assert_eq!(pool.get(0), Some(&Style::default()));
    }

    #[test]
    fn test_equal_styles_share_an_index() {
        let mut pool = StylePool::new();
        let bold = pool.get_or_insert(Style::new().bold(true));
        let again = pool.get_or_insert(Style::new().bold(true));
        let italic = pool.get_or_insert(Style::new().italic(true));
        assert_eq!(bold, again);
        assert_ne!(bold, italic);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get_or_insert(Style::default()), 0);
    }

    #[test]
    fn test_theme_tint_distinguishes_styles() {
        let mut pool = StylePool::new();
        let light = Style::new().fill_color(Color::theme(4, 0.4));
        let a = pool.get_or_insert(light.clone());
        let b = pool.get_or_insert(Style::new().fill_color(Color::theme(4, -0.4)));
        assert_ne!(a, b);
        assert_eq!(pool.get(a), Some(&light));
        let indices: Vec<u32> = pool.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
