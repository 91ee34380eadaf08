use crate::violation::{Summary, Violation};
use serde::{Deserialize, Serialize};

/// Required blank-line count for the gap after one desired slot.
///
/// Gaps with no requirement (unconstrained spacing, partition boundaries)
/// simply have no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingRequirement {
    /// Gap index: between desired slots `gap` and `gap + 1`.
    pub gap: usize,
    pub blank_lines: u32,
}

/// A group header comment to ensure above the element at a desired slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentInsertion {
    pub slot: usize,
    pub text: String,
}

/// Report-only output of one reconciliation.
///
/// `desired[slot]` is the original index of the element that should occupy
/// physical position `slot`. Fix synthesis consumes this together with the
/// original elements and source buffer; reporting needs only `violations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub violations: Vec<Violation>,
    pub desired: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spacing: Vec<SpacingRequirement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comment_insertions: Vec<CommentInsertion>,
    pub summary: Summary,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}
