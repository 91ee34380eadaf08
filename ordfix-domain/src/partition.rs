//! Partitioning: split the element sequence into independent sorting
//! partitions at blank-line or comment boundaries. Nothing ever reorders
//! across a partition.

use crate::error::PolicyError;
use ordfix_types::element::{Comment, CommentKind, Element};
use ordfix_types::policy::{CommentFilter, OrderingPolicy, PartitionByComment};
use regex::Regex;

#[derive(Debug)]
pub(crate) enum PartitionMode {
    Off,
    ByNewline(u32),
    ByComment(CommentFence),
}

impl PartitionMode {
    pub fn compile(policy: &OrderingPolicy) -> Result<Self, PolicyError> {
        match (&policy.partition_by_comment, policy.partition_by_newline) {
            (Some(_), Some(_)) => Err(PolicyError::ConflictingPartitionModes),
            (None, None) => Ok(PartitionMode::Off),
            (None, Some(0)) => Err(PolicyError::ZeroNewlineThreshold),
            (None, Some(threshold)) => Ok(PartitionMode::ByNewline(threshold)),
            (Some(by_comment), None) => Ok(PartitionMode::ByComment(CommentFence::compile(
                by_comment,
            )?)),
        }
    }

    /// Is there a boundary between the previous element and this one?
    fn starts_new_partition(&self, element: &Element) -> bool {
        match self {
            PartitionMode::Off => false,
            PartitionMode::ByNewline(threshold) => element.blank_lines_before >= *threshold,
            PartitionMode::ByComment(fence) => element
                .comments_above
                .iter()
                .any(|comment| fence.matches(comment)),
        }
    }
}

#[derive(Debug)]
pub(crate) struct CommentFence {
    block: Option<CommentMatch>,
    line: Option<CommentMatch>,
}

#[derive(Debug)]
enum CommentMatch {
    Any,
    Patterns(Vec<Regex>),
}

impl CommentFence {
    fn compile(config: &PartitionByComment) -> Result<Self, PolicyError> {
        match config {
            PartitionByComment::All => Ok(Self {
                block: Some(CommentMatch::Any),
                line: Some(CommentMatch::Any),
            }),
            PartitionByComment::Patterns(patterns) => {
                let compiled = compile_patterns(patterns)?;
                Ok(Self {
                    block: Some(CommentMatch::Patterns(compiled.clone())),
                    line: Some(CommentMatch::Patterns(compiled)),
                })
            }
            PartitionByComment::Scoped { block, line } => Ok(Self {
                block: CommentMatch::from_filter(block)?,
                line: CommentMatch::from_filter(line)?,
            }),
        }
    }

    fn matches(&self, comment: &Comment) -> bool {
        let matcher = match comment.kind {
            CommentKind::Block => &self.block,
            CommentKind::Line => &self.line,
        };
        match matcher {
            None => false,
            Some(CommentMatch::Any) => true,
            Some(CommentMatch::Patterns(patterns)) => patterns
                .iter()
                .any(|pattern| pattern.is_match(&comment.text)),
        }
    }
}

impl CommentMatch {
    fn from_filter(filter: &Option<CommentFilter>) -> Result<Option<Self>, PolicyError> {
        match filter {
            None => Ok(None),
            Some(CommentFilter::All) => Ok(Some(CommentMatch::Any)),
            Some(CommentFilter::Patterns(patterns)) => {
                compile_patterns(patterns).map(|compiled| Some(CommentMatch::Patterns(compiled)))
            }
        }
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, PolicyError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| PolicyError::InvalidPattern {
                field: "partition_by_comment",
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Monotonically increasing partition id per element.
pub(crate) fn partition_ids(mode: &PartitionMode, elements: &[Element]) -> Vec<u32> {
    let mut id = 0;
    elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            if index > 0 && mode.starts_new_partition(element) {
                id += 1;
            }
            id
        })
        .collect()
}
