//! Error types for edit synthesis and application.
//!
//! Every variant is a contract breach between the caller's span data and
//! the source buffer; none is recoverable by the engine.

use ordfix_types::element::Span;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    /// The reconciliation does not belong to this element list.
    #[error("desired order has {desired} slots for {elements} elements")]
    LengthMismatch { elements: usize, desired: usize },

    /// A slot index points outside the element list.
    #[error("slot {slot} is out of range for {count} elements")]
    SlotOutOfRange { slot: usize, count: usize },

    /// A span reaches past the end of the source buffer.
    #[error("span {span:?} is out of bounds for a buffer of {len} bytes")]
    SpanOutOfBounds { span: Span, len: usize },

    /// A span does not fall on UTF-8 character boundaries.
    #[error("span {span:?} is not aligned to character boundaries")]
    MisalignedSpan { span: Span },

    /// Element spans must be ordered and disjoint.
    #[error("element span at index {index} overlaps its neighbour")]
    OverlappingSpans { index: usize },

    /// Applying edits found two that touch the same bytes.
    #[error("edit at {at} overlaps the previous edit")]
    OverlappingEdits { at: usize },
}

pub type EditResult<T> = Result<T, EditError>;
