use crate::element::Span;
use serde::{Deserialize, Serialize};

/// One text replacement over the original source buffer.
///
/// An edit set is ordered by range start and non-overlapping, so applying
/// it left to right in one pass yields the fixed region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(range: Span, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            range: Span::new(at, at),
            replacement: text.into(),
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty()
    }
}
