//! Colors as `<color>` elements carry them

use std::fmt;
use std::hash::{Hash, Hasher};

/// Legacy palette addressed by `<color indexed="n"/>`, as 0xRRGGBB
const INDEXED_PALETTE: [u32; 56] = [
    0x000000, 0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0xFF00FF, 0x00FFFF,
    0x000000, 0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0xFF00FF, 0x00FFFF,
    0x800000, 0x008000, 0x000080, 0x808000, 0x800080, 0x008080, 0xC0C0C0, 0x808080,
    0x9999FF, 0x993366, 0xFFFFCC, 0xCCFFFF, 0x660066, 0xFF8080, 0x0066CC, 0xCCCCFF,
    0x000080, 0xFF00FF, 0xFFFF00, 0x00FFFF, 0x800080, 0x800000, 0x008080, 0x0000FF,
    0x00CCFF, 0xCCFFFF, 0xCCFFCC, 0xFFFF99, 0x99CCFF, 0xFF99CC, 0xCC99FF, 0xFFCC99,
    0x3366FF, 0x33CCCC, 0x99CC00, 0xFFCC00, 0xFF9900, 0xFF6600, 0x666699, 0x969696,
];

/// One color reference
///
/// `Theme` colors only become RGB against a
/// [`ThemePalette`](super::ThemePalette); everything else is self-contained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Color {
    /// No color attribute; the application decides
    #[default]
    Auto,
    Rgb { r: u8, g: u8, b: u8 },
    Argb { a: u8, r: u8, g: u8, b: u8 },
    /// Slot in the theme's `clrScheme` (0 lt1, 1 dk1, 2 lt2, 3 dk2, 4..=9 accents),
    /// lightened or darkened by `tint` in -1.0..=1.0
    Theme { index: u8, tint: f64 },
    Indexed(u8),
}

impl Color {
    pub const RED: Color = Color::rgb(0xFF, 0, 0);
    pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color::Argb { a, r, g, b }
    }

    pub const fn theme(index: u8, tint: f64) -> Self {
        Color::Theme { index, tint }
    }

    /// `RRGGBB` or `AARRGGBB`, optionally after a `#`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let [a, r, g, b] = u32::from_str_radix(hex, 16).ok()?.to_be_bytes();
        match hex.len() {
            6 => Some(Color::rgb(r, g, b)),
            8 => Some(Color::argb(a, r, g, b)),
            _ => None,
        }
    }

    /// Uppercase hex without `#`: eight digits for `Argb`, six otherwise.
    /// `Auto` and `Theme` render black.
    pub fn to_hex(&self) -> String {
        let rgb = match *self {
            Color::Argb { a, r, g, b } => {
                return format!("{:08X}", u32::from_be_bytes([a, r, g, b]))
            }
            Color::Rgb { r, g, b } => u32::from_be_bytes([0, r, g, b]),
            Color::Indexed(i) => INDEXED_PALETTE.get(usize::from(i)).copied().unwrap_or(0),
            Color::Auto | Color::Theme { .. } => 0,
        };
        format!("{rgb:06X}")
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }
}

// Tints are finite values parsed from attributes, so comparing their bits
// agrees with `PartialEq`.
impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match *self {
            Color::Auto => {}
            Color::Rgb { r, g, b } => [r, g, b].hash(state),
            Color::Argb { a, r, g, b } => [a, r, g, b].hash(state),
            Color::Theme { index, tint } => (index, tint.to_bits()).hash(state),
            Color::Indexed(i) => i.hash(state),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => f.write_str("auto"),
            Color::Theme { index, tint } => write!(f, "theme({index}, {tint})"),
            Color::Indexed(i) => write!(f, "indexed({i})"),
            Color::Rgb { .. } | Color::Argb { .. } => write!(f, "#{}", self.to_hex()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("00ff00"), Some(Color::rgb(0, 255, 0)));
        assert_eq!(
            Color::from_hex("80FFFFFF"),
            Some(Color::argb(128, 255, 255, 255))
        );
        for bad in ["FFF", "GG0000", "+F0000", ""] {
            assert_eq!(Color::from_hex(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Color::RED.to_hex(), "FF0000");
        assert_eq!(Color::argb(0, 255, 255, 255).to_hex(), "00FFFFFF");
        assert_eq!(Color::Indexed(18).to_hex(), "000080");
        assert_eq!(Color::Auto.to_string(), "auto");
        assert_eq!(Color::YELLOW.to_string(), "#FFFF00");
    }

    #[test]
    fn test_theme_tint_distinguishes_colors() {
        assert_ne!(Color::theme(4, 0.4), Color::theme(4, -0.4));
        assert_eq!(Color::theme(4, 0.4), Color::theme(4, 0.4));
    }
}
