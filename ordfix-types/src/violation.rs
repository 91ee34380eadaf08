use serde::{Deserialize, Serialize};

/// Diagnostic taxonomy, priority-ordered.
///
/// When one pair of elements qualifies for more than one order-shaped kind,
/// only the highest-priority kind is emitted for that pair. Spacing and
/// comment-above kinds are evaluated independently of the order kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    DependencyOrder,
    GroupOrder,
    Order,
    MissingSpacing,
    ExtraSpacing,
    MissingCommentAbove,
}

impl ViolationKind {
    /// Lower value wins when one pair qualifies for several kinds.
    pub fn priority(self) -> u8 {
        match self {
            ViolationKind::DependencyOrder => 0,
            ViolationKind::GroupOrder => 1,
            ViolationKind::Order => 2,
            ViolationKind::MissingSpacing => 3,
            ViolationKind::ExtraSpacing => 4,
            ViolationKind::MissingCommentAbove => 5,
        }
    }
}

/// One reported mismatch between the actual and the desired region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Name of the earlier element of the offending pair. For
    /// `MissingCommentAbove` this carries the group label instead.
    pub left_name: String,
    /// Name of the later element of the offending pair.
    pub right_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_group: Option<String>,
}

impl Violation {
    pub fn new(kind: ViolationKind, left_name: impl Into<String>, right_name: impl Into<String>) -> Self {
        Self {
            kind,
            left_name: left_name.into(),
            right_name: right_name.into(),
            left_group: None,
            right_group: None,
        }
    }

    pub fn with_groups(
        mut self,
        left_group: impl Into<String>,
        right_group: impl Into<String>,
    ) -> Self {
        self.left_group = Some(left_group.into());
        self.right_group = Some(right_group.into());
        self
    }
}

/// Violation counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub dependency_order: u64,
    pub group_order: u64,
    pub order: u64,
    pub missing_spacing: u64,
    pub extra_spacing: u64,
    pub missing_comment_above: u64,
}

impl Summary {
    pub fn record(&mut self, kind: ViolationKind) {
        match kind {
            ViolationKind::DependencyOrder => self.dependency_order += 1,
            ViolationKind::GroupOrder => self.group_order += 1,
            ViolationKind::Order => self.order += 1,
            ViolationKind::MissingSpacing => self.missing_spacing += 1,
            ViolationKind::ExtraSpacing => self.extra_spacing += 1,
            ViolationKind::MissingCommentAbove => self.missing_comment_above += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.dependency_order
            + self.group_order
            + self.order
            + self.missing_spacing
            + self.extra_spacing
            + self.missing_comment_above
    }
}
