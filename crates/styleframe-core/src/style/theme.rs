//! Workbook theme palette and tint resolution

/// The ten colors of a theme's color scheme, as 6-digit hex
///
/// Order is lt1, dk1, lt2, dk2, accent1..accent6, which is how
/// `<color theme="n">` indexes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePalette {
    colors: Vec<String>,
}

impl ThemePalette {
    /// Number of slots in a color scheme
    pub const SLOTS: usize = 10;

    /// Create a palette from hex strings (leading '#' and case ignored)
    pub fn new<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            colors: colors
                .into_iter()
                .map(|c| c.as_ref().trim_start_matches('#').to_ascii_uppercase())
                .collect(),
        }
    }

    /// A palette with no colors; every theme lookup falls back
    pub fn empty() -> Self {
        Self { colors: Vec::new() }
    }

    /// The stock Office color scheme
    pub fn office_default() -> Self {
        Self::new([
            "FFFFFF", "000000", "EEECE1", "1F497D", "4F81BD", "C0504D", "9BBB59", "8064A2",
            "4BACC6", "F79646",
        ])
    }

    /// Hex of a slot, if present
    pub fn get(&self, index: usize) -> Option<&str> {
        self.colors.get(index).map(String::as_str)
    }

    /// All slots
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Check if the palette has no slots
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Resolve a theme reference to an uppercase 6-digit hex
    ///
    /// Returns `None` when the slot is missing or not a valid hex color.
    pub fn resolve(&self, index: usize, tint: f64) -> Option<String> {
        let hex = self.get(index)?;
        let hex = hex.get(hex.len().checked_sub(6)?..)?;
        let n = u32::from_str_radix(hex, 16).ok()?;
        if tint == 0.0 {
            return Some(format!("{:06X}", n));
        }
        let r = ((n >> 16) & 0xFF) as f64 / 255.0;
        let g = ((n >> 8) & 0xFF) as f64 / 255.0;
        let b = (n & 0xFF) as f64 / 255.0;
        let (h, l, s) = rgb_to_hls(r, g, b);
        let l = apply_tint(l, tint);
        let (r, g, b) = hls_to_rgb(h, l, s);
        let to_byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        Some(format!("{:02X}{:02X}{:02X}", to_byte(r), to_byte(g), to_byte(b)))
    }
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self::office_default()
    }
}

fn apply_tint(lum: f64, tint: f64) -> f64 {
    if tint < 0.0 {
        lum * (1.0 + tint)
    } else {
        lum * (1.0 - tint) + tint
    }
}

fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (min + max) / 2.0;
    if max == min {
        return (0.0, l, 0.0);
    }
    let delta = max - min;
    let s = if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_component(m1, m2, h + 1.0 / 3.0),
        hue_component(m1, m2, h),
        hue_component(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_component(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_tint() {
        let palette = ThemePalette::office_default();
        assert_eq!(palette.resolve(4, 0.0).as_deref(), Some("4F81BD"));
        assert_eq!(palette.resolve(10, 0.0), None);
        assert_eq!(ThemePalette::empty().resolve(0, 0.0), None);
    }

    #[test]
    fn test_positive_tint_lightens() {
        let palette = ThemePalette::new(["000000"]);
        // lum 0 -> 0 * (1 - 0.5) + 0.5
        assert_eq!(palette.resolve(0, 0.5).as_deref(), Some("808080"));
        let palette = ThemePalette::new(["FFFFFF"]);
        assert_eq!(palette.resolve(0, 0.3).as_deref(), Some("FFFFFF"));
    }

    #[test]
    fn test_negative_tint_darkens() {
        let palette = ThemePalette::new(["FFFFFF"]);
        // lum 1 -> 1 * (1 - 0.5)
        assert_eq!(palette.resolve(0, -0.5).as_deref(), Some("808080"));
        let palette = ThemePalette::new(["FF0000"]);
        assert_eq!(palette.resolve(0, -0.5).as_deref(), Some("800000"));
    }

    #[test]
    fn test_palette_normalizes_input() {
        let palette = ThemePalette::new(["#abcdef", "FF112233"]);
        assert_eq!(palette.get(0), Some("ABCDEF"));
        assert_eq!(palette.resolve(1, 0.0).as_deref(), Some("112233"));
    }
}
