//! Cell borders

use super::keyword::xlsx_keyword;
use super::Color;

/// The four edges of a cell; `None` draws nothing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
}

impl BorderStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same line on every edge
    pub fn all(style: BorderLineStyle, color: Color) -> Self {
        let edge = BorderEdge { style, color };
        Self {
            left: Some(edge.clone()),
            right: Some(edge.clone()),
            top: Some(edge.clone()),
            bottom: Some(edge),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges().iter().all(|(_, edge)| edge.is_none())
    }

    /// Edges keyed by element name, in the order `<border>` lists them
    pub fn edges(&self) -> [(&'static str, &Option<BorderEdge>); 4] {
        [
            ("left", &self.left),
            ("right", &self.right),
            ("top", &self.top),
            ("bottom", &self.bottom),
        ]
    }

    pub fn edge_mut(&mut self, tag: &str) -> Option<&mut Option<BorderEdge>> {
        Some(match tag {
            "left" => &mut self.left,
            "right" => &mut self.right,
            "top" => &mut self.top,
            "bottom" => &mut self.bottom,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    pub color: Color,
}

xlsx_keyword! {
    /// Line drawn on one edge, `<left style="...">`
    BorderLineStyle, "border style" {
        None => "none",
        Thin => "thin",
        Medium => "medium",
        Thick => "thick",
        Dashed => "dashed",
        Dotted => "dotted",
        Double => "double",
        Hair => "hair",
        MediumDashed => "mediumDashed",
        DashDot => "dashDot",
        MediumDashDot => "mediumDashDot",
        DashDotDot => "dashDotDot",
        MediumDashDotDot => "mediumDashDotDot",
        SlantDashDot => "slantDashDot",
    }
}
