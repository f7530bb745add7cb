//! Number format types

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

/// What a date-like format displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    /// Calendar date only
    Date,
    /// Time of day only
    Time,
    /// Date and time
    DateTime,
}

impl NumberFormat {
    /// Create a number format from a format string; "General" maps to [`NumberFormat::General`]
    pub fn from_string<S: Into<String>>(format: S) -> Self {
        let format = format.into();
        if format.eq_ignore_ascii_case("general") {
            NumberFormat::General
        } else {
            NumberFormat::Custom(format)
        }
    }

    /// Create a built-in format by ID
    pub fn from_id(id: u32) -> Self {
        if id == 0 {
            NumberFormat::General
        } else {
            NumberFormat::BuiltIn(id)
        }
    }

    /// Get the format string
    pub fn format_string(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::BuiltIn(id) => Self::builtin_format_string(*id),
            NumberFormat::Custom(s) => s,
        }
    }

    /// Built-in format string by ID
    fn builtin_format_string(id: u32) -> &'static str {
        match id {
            0 => "General",
            1 => "0",
            2 => "0.00",
            3 => "#,##0",
            4 => "#,##0.00",
            9 => "0%",
            10 => "0.00%",
            11 => "0.00E+00",
            12 => "# ?/?",
            13 => "# ??/??",
            14 => "mm-dd-yy",
            15 => "d-mmm-yy",
            16 => "d-mmm",
            17 => "mmm-yy",
            18 => "h:mm AM/PM",
            19 => "h:mm:ss AM/PM",
            20 => "h:mm",
            21 => "h:mm:ss",
            22 => "m/d/yy h:mm",
            37 => "#,##0 ;(#,##0)",
            38 => "#,##0 ;[Red](#,##0)",
            39 => "#,##0.00;(#,##0.00)",
            40 => "#,##0.00;[Red](#,##0.00)",
            45 => "mm:ss",
            46 => "[h]:mm:ss",
            47 => "mmss.0",
            49 => "@",
            _ => "General",
        }
    }

    /// Classify a date/time format by the tokens it displays
    ///
    /// Quoted literals, escaped characters and bracketed sections are ignored.
    pub fn temporal_kind(&self) -> Option<TemporalKind> {
        let format = match self {
            NumberFormat::General => return None,
            NumberFormat::BuiltIn(id) => Self::builtin_format_string(*id),
            NumberFormat::Custom(s) => s.as_str(),
        };

        let mut tokens = String::with_capacity(format.len());
        let mut chars = format.chars();
        while let Some(c) = chars.next() {
            match c {
                '"' => {
                    for q in chars.by_ref() {
                        if q == '"' {
                            break;
                        }
                    }
                }
                '\\' => {
                    chars.next();
                }
                '[' => {
                    for q in chars.by_ref() {
                        if q == ']' {
                            break;
                        }
                    }
                }
                _ => tokens.push(c.to_ascii_lowercase()),
            }
        }

        let has_date = tokens.contains('y') || tokens.contains('d');
        let has_time = tokens.contains('h') || tokens.contains('s');
        let has_month_or_minute = tokens.contains('m');
        match (has_date, has_time) {
            (true, true) => Some(TemporalKind::DateTime),
            (true, false) => Some(TemporalKind::Date),
            (false, true) => Some(TemporalKind::Time),
            (false, false) if has_month_or_minute => Some(TemporalKind::Date),
            _ => None,
        }
    }
}
