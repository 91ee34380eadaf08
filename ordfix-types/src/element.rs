use serde::{Deserialize, Serialize};

/// Byte range into the original source buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    Line,
    Block,
}

/// A comment observed in the gap before an element.
///
/// `text` is the comment content with markers and surrounding whitespace
/// stripped; the engine only ever pattern-matches or equality-compares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub kind: CommentKind,
}

impl Comment {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CommentKind::Line,
        }
    }

    pub fn block(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CommentKind::Block,
        }
    }
}

/// The unit being ordered.
///
/// Elements are extracted by a rule front end from one sortable region and
/// handed to the engine in source order. The engine never mutates an
/// element; resolved groups and partitions live in per-call side tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Comparison key (e.g. identifier text).
    pub name: String,

    /// Textual span length; only line-length ordering reads it.
    #[serde(default)]
    pub size: usize,

    /// Group label assigned by the extracting rule.
    #[serde(default)]
    pub group: String,

    /// Excluded from violation reporting; anchored in place by fixes.
    #[serde(default)]
    pub is_suppressed: bool,

    /// Names this element's value expression references.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Names by which other elements may declare a dependency on this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependency_names: Vec<String>,

    /// Rendered value text, for value-pattern matchers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Syntactic selector (e.g. "property", "method"), for matchers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Syntactic modifiers (e.g. "static", "readonly"), for matchers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,

    /// Opaque caller key. The engine copies it nowhere and never reads it.
    #[serde(default)]
    pub handle: u64,

    /// Span of the element text proper.
    pub span: Span,

    /// Attached leading comment block; moves with the element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_above: Option<Span>,

    /// Same-line trailing comment; moves with the element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_comment: Option<Span>,

    /// Comments in the gap before this element, attached or not.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments_above: Vec<Comment>,

    /// Measured blank lines between the previous element and this one.
    /// Zero for the first element of the region.
    #[serde(default)]
    pub blank_lines_before: u32,
}

impl Element {
    /// An element with the given name and span; `size` defaults to the span
    /// length and `dependency_names` to the name itself.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        let name = name.into();
        Self {
            size: span.len(),
            group: String::new(),
            is_suppressed: false,
            dependencies: Vec::new(),
            dependency_names: vec![name.clone()],
            value: None,
            selector: None,
            modifiers: Vec::new(),
            handle: 0,
            span,
            comment_above: None,
            trailing_comment: None,
            comments_above: Vec::new(),
            blank_lines_before: 0,
            name,
        }
    }

    /// Full movable span: the element plus its attached comments.
    pub fn full_span(&self) -> Span {
        let mut span = self.span;
        if let Some(above) = self.comment_above {
            span = span.cover(above);
        }
        if let Some(trailing) = self.trailing_comment {
            span = span.cover(trailing);
        }
        span
    }
}
