//! Position type shared by the surface, its events and the pairing engine.

/// A position in the text buffer (line and column, both 0-indexed).
///
/// Columns count characters, not bytes, so a CJK bracket occupies one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const fn zero() -> Self {
        Self { line: 0, column: 0 }
    }

    /// The position one character to the right on the same line
    pub const fn next_column(self) -> Self {
        Self::new(self.line, self.column + 1)
    }

    /// Walk this position over `text`, as if `text` were inserted here.
    pub fn advanced_by(self, text: &str) -> Self {
        text.chars().fold(self, |pos, ch| {
            if ch == '\n' {
                Self::new(pos.line + 1, 0)
            } else {
                pos.next_column()
            }
        })
    }
}
