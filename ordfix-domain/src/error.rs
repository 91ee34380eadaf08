//! Error types for policy compilation.
//!
//! A malformed policy is rejected here, at construction time, rather than
//! degrading into "sort nothing" at reconciliation time.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    /// A matcher or partition pattern failed to compile.
    #[error("invalid pattern {pattern:?} in {field}: {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The same group name occupies two entries of `groups`.
    #[error("group {name:?} appears more than once in groups")]
    DuplicateGroup { name: String },

    /// Two custom groups share one name.
    #[error("custom group {name:?} is declared more than once")]
    DuplicateCustomGroup { name: String },

    /// A custom group is declared but never placed in `groups`, so it could
    /// never take effect.
    #[error("custom group {name:?} is never referenced from groups")]
    UnreferencedCustomGroup { name: String },

    /// A custom group matcher with no predicate fields would match nothing.
    #[error("custom group {name:?} has a matcher with no predicate fields")]
    EmptyMatcher { name: String },

    #[error("sort type `custom` requires a non-empty alphabet")]
    EmptyAlphabet,

    #[error("sort type `subgroup-order` requires a non-empty subgroup_order")]
    EmptySubgroupOrder,

    /// Only one partitioning mode may be configured per call.
    #[error("partition_by_comment and partition_by_newline are mutually exclusive")]
    ConflictingPartitionModes,

    #[error("partition_by_newline threshold must be at least 1")]
    ZeroNewlineThreshold,
}

#[cfg(test)]
mod tests {
    use super::PolicyError;

    #[test]
    fn messages_name_the_offending_field() {
        let err = PolicyError::DuplicateGroup {
            name: "methods".to_string(),
        };
        assert!(err.to_string().contains("methods"));

        let err = PolicyError::UnreferencedCustomGroup {
            name: "callbacks".to_string(),
        };
        assert!(err.to_string().contains("callbacks"));
    }
}
