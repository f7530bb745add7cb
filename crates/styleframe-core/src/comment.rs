//! Cell notes

/// Note attached to a cell, shown in a popup box
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellComment {
    pub author: String,
    pub text: String,
    /// Box stays open instead of appearing on hover
    pub visible: bool,
}

impl CellComment {
    /// A hidden note
    ///
    /// ```rust
    /// use styleframe_core::CellComment;
    ///
    /// let note = CellComment::new("Reviewer", "Check this value");
    /// assert!(!note.visible);
    /// ```
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            visible: false,
        }
    }
}
