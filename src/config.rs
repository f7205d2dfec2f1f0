//! Immutable configuration for the filtering pass.
//!
//! The operator table, strict-checking flags and standard-parameter set are
//! read-only during processing; a [`FilterConfig`] is built once and injected
//! into the orchestrator at construction.

/// Reserved query-parameter names that are never treated as filters.
pub const STANDARD_PARAMETERS: &[&str] = &[
    "sort",
    "order",
    "page",
    "per_page",
    "only",
    "group_by",
    "meta_ignore",
    "meta_count_only",
    "only_meta",
    "abstract_search",
];

/// The free-text search parameter, processed once and independently.
pub const ABSTRACT_SEARCH: &str = "abstract_search";

/// Configuration flags and reserved names for one [`FilterPass`].
///
/// [`FilterPass`]: crate::filtering::orchestrator::FilterPass
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Verify terminal columns against live schema introspection.
    pub strict_column_checking: bool,
    /// Verify every relationship path segment against live introspection.
    pub strict_relationship_checking: bool,
    /// Report allow-list violations as errors. When `false`, unknown filter
    /// keys are skipped silently.
    pub validate_all_filters: bool,
    /// Include the allow-list in `FilterNotAllowed` messages.
    pub reveal_allowed_filters: bool,
    /// Reserved parameter names never treated as filters.
    pub standard_parameters: Vec<String>,
    /// Maximum relationship path depth accepted per filter key.
    pub max_relation_depth: usize,
    /// Maximum accepted length of a single filter value, in bytes.
    pub max_value_length: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            strict_column_checking: true,
            strict_relationship_checking: true,
            validate_all_filters: true,
            reveal_allowed_filters: false,
            standard_parameters: STANDARD_PARAMETERS.iter().map(ToString::to_string).collect(),
            max_relation_depth: 10,
            max_value_length: 10_000,
        }
    }
}

impl FilterConfig {
    /// True when `name` is a reserved (non-filter) parameter.
    #[must_use]
    pub fn is_standard_parameter(&self, name: &str) -> bool {
        self.standard_parameters.iter().any(|p| p == name)
    }
}
