//! The ordering policy: one immutable configuration value per sorting call.
//!
//! Semantic validation (regex compilation, cross-references between
//! `groups` and `custom_groups`, partition-mode conflicts) happens in
//! `ordfix-domain` when the policy is compiled; these types only carry the
//! configuration surface.

use serde::{Deserialize, Serialize};

/// Base comparator kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortType {
    #[default]
    Alphabetical,
    Natural,
    LineLength,
    Custom,
    Unsorted,
    SubgroupOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// What to do with non-alphanumeric characters before comparing names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialCharacters {
    #[default]
    Keep,
    Trim,
    Remove,
}

/// Specification for one comparator, including its chained tie-breaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SortSpec {
    #[serde(rename = "type")]
    pub sort_type: SortType,
    pub order: SortOrder,
    pub ignore_case: bool,
    pub special_characters: SpecialCharacters,
    /// Character sequence for `SortType::Custom`; index in this string is
    /// the character's rank.
    pub alphabet: String,
    /// Group labels for `SortType::SubgroupOrder`; position in this list is
    /// the label's rank.
    pub subgroup_order: Vec<String>,
    /// Applied when the primary comparison is a tie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_sort: Option<Box<SortSpec>>,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            sort_type: SortType::Alphabetical,
            order: SortOrder::Asc,
            ignore_case: true,
            special_characters: SpecialCharacters::Keep,
            alphabet: String::new(),
            subgroup_order: Vec::new(),
            fallback_sort: None,
        }
    }
}

/// Required blank-line spacing, either as a keyword or an exact count.
///
/// `Always` is equivalent to `Count(1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewlinesSetting {
    Always,
    Never,
    #[default]
    Ignore,
    Count(u32),
}

impl NewlinesSetting {
    /// Exact blank-line requirement, or `None` for `Ignore`.
    pub fn blank_lines(self) -> Option<u32> {
        match self {
            NewlinesSetting::Always => Some(1),
            NewlinesSetting::Never => Some(0),
            NewlinesSetting::Ignore => None,
            NewlinesSetting::Count(n) => Some(n),
        }
    }

    /// True for `Always` and any count of one or more.
    pub fn requires_spacing(self) -> bool {
        matches!(self.blank_lines(), Some(n) if n >= 1)
    }
}

/// One entry of the ordered `groups` sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupsEntry {
    /// A plain group name.
    Group(String),
    /// An unordered "any-of" slot: all listed names share one index.
    AnyOf(Vec<String>),
    /// A group reference with per-group overrides.
    Override(GroupOverride),
    /// A standalone `newlines_between` directive between two slots.
    Newlines(NewlinesSetting),
}

impl GroupsEntry {
    pub fn is_directive(&self) -> bool {
        matches!(self, GroupsEntry::Newlines(_))
    }
}

/// Reference to one or several group names from an override entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupRef {
    One(String),
    Many(Vec<String>),
}

impl GroupRef {
    pub fn names(&self) -> &[String] {
        match self {
            GroupRef::One(name) => std::slice::from_ref(name),
            GroupRef::Many(names) => names,
        }
    }
}

/// Per-group overrides attached to a `groups` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupOverride {
    pub group: GroupRef,
    /// Blank lines required between members of this group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newlines_inside: Option<NewlinesSetting>,
    /// Comment line required above the first member of this group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_above: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub sort_type: Option<SortType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_sort: Option<Box<SortSpec>>,
}

impl GroupOverride {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: GroupRef::One(group.into()),
            newlines_inside: None,
            comment_above: None,
            order: None,
            sort_type: None,
            fallback_sort: None,
        }
    }
}

/// Predicate fields of a custom-group matcher. All present fields must
/// match (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ElementMatcher {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_name_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_value_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

impl ElementMatcher {
    pub fn is_empty(&self) -> bool {
        self.element_name_pattern.is_none()
            && self.element_value_pattern.is_none()
            && self.selector.is_none()
            && self.modifiers.is_empty()
    }
}

/// A named, pattern-matched group reassignment. The first custom group
/// whose predicate matches an element (and whose name appears in `groups`)
/// becomes that element's effective group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CustomGroup {
    pub name: String,
    /// Satisfied if any sub-matcher matches (logical OR). When empty, the
    /// flattened single matcher applies instead.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<ElementMatcher>,
    #[serde(flatten)]
    pub matcher: ElementMatcher,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub sort_type: Option<SortType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_sort: Option<Box<SortSpec>>,
    /// Blank lines required between members of this custom group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newlines_inside: Option<NewlinesSetting>,
}

impl CustomGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            any_of: Vec::new(),
            matcher: ElementMatcher::default(),
            order: None,
            sort_type: None,
            fallback_sort: None,
            newlines_inside: None,
        }
    }

    /// The OR-list of matchers this group evaluates.
    pub fn matchers(&self) -> &[ElementMatcher] {
        if self.any_of.is_empty() {
            std::slice::from_ref(&self.matcher)
        } else {
            &self.any_of
        }
    }
}

/// Which comments open a new partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionByComment {
    /// Every comment.
    All,
    /// Comments matching any of these regex patterns.
    Patterns(Vec<String>),
    /// Restrict matching to block or line comments specifically.
    Scoped {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block: Option<CommentFilter>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<CommentFilter>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentFilter {
    All,
    Patterns(Vec<String>),
}

/// The full ordering policy for one sorting call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct OrderingPolicy {
    /// Base comparator applied within a group.
    pub sort: SortSpec,

    /// Ordered group sequence; elements resolving to no entry fall into an
    /// implicit trailing "unknown" slot.
    pub groups: Vec<GroupsEntry>,

    /// Evaluated in declaration order; first match wins.
    pub custom_groups: Vec<CustomGroup>,

    /// Global blank-line default between groups.
    pub newlines_between: NewlinesSetting,

    /// Start a new partition at matching comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_by_comment: Option<PartitionByComment>,

    /// Start a new partition when at least this many blank lines separate
    /// two consecutive elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_by_newline: Option<u32>,
}
