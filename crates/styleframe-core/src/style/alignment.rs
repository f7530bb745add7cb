//! Text placement inside a cell

use super::keyword::xlsx_keyword;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Alignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    pub wrap_text: bool,
    pub shrink_to_fit: bool,
    /// Indent steps, 0 to 250
    pub indent: u8,
    /// Degrees, 0 to 180; 255 stacks letters vertically
    pub rotation: i16,
}

xlsx_keyword! {
    /// `alignment@horizontal`
    HorizontalAlignment, "horizontal alignment" {
        General => "general",
        Left => "left",
        Center => "center",
        Right => "right",
        Fill => "fill",
        Justify => "justify",
        CenterContinuous => "centerContinuous",
        Distributed => "distributed",
    }
}

xlsx_keyword! {
    /// `alignment@vertical`
    VerticalAlignment, "vertical alignment" {
        Bottom => "bottom",
        Top => "top",
        Center => "center",
        Justify => "justify",
        Distributed => "distributed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BorderLineStyle, PatternType, Underline};

    #[test]
    fn test_keywords_parse_back() {
        for s in ["general", "centerContinuous", "distributed"] {
            assert_eq!(s.parse::<HorizontalAlignment>().unwrap().as_str(), s);
        }
        for s in ["top", "center", "bottom"] {
            assert_eq!(s.parse::<VerticalAlignment>().unwrap().as_str(), s);
        }
        for s in ["thin", "mediumDashDot", "slantDashDot"] {
            assert_eq!(s.parse::<BorderLineStyle>().unwrap().as_str(), s);
        }
        for s in ["solid", "darkGrid", "gray0625"] {
            assert_eq!(s.parse::<PatternType>().unwrap().to_string(), s);
        }
        assert_eq!("double".parse::<Underline>().unwrap(), Underline::Double);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(VerticalAlignment::default(), VerticalAlignment::Bottom);
        assert_eq!(HorizontalAlignment::default(), HorizontalAlignment::General);
        assert_eq!(Underline::default(), Underline::None);
    }

    #[test]
    fn test_unknown_keyword() {
        let err = "sideways".parse::<VerticalAlignment>().unwrap_err();
        assert_eq!(err.to_string(), "'sideways' is not a valid vertical alignment");
        assert!("Thin".parse::<BorderLineStyle>().is_err());
    }
}
