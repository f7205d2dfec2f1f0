//! # Error Handling for Filter Compilation
//!
//! Every failure in the filtering pass is a request-level error: it is
//! converted into an entry on an [`ErrorList`] and surfaced alongside whatever
//! partial results were computed. One bad filter never aborts the rest of the
//! request, and no error escapes the pass as a panic.
//!
//! ```rust,ignore
//! use queryfilter::{FilterError, ErrorList};
//!
//! let mut errors = ErrorList::new();
//! errors.push(FilterError::filter_not_allowed("email", None));
//! assert_eq!(errors.len(), 1);
//! ```

use serde::Serialize;
use std::fmt;

/// A single filter-level failure.
///
/// Variants map one-to-one onto the validation taxonomy: allow-list
/// violations, bad relationship paths, unknown columns, unknown operators,
/// malformed values, and inconsistent configuration/introspection metadata.
/// Where useful, a variant carries the set of valid alternatives so the
/// message can name them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FilterError {
    /// The requested filter is not in the caller's allow-list.
    FilterNotAllowed {
        /// The offending filter key.
        filter: String,
        /// The allow-list, when configured to be revealed.
        allowed: Option<Vec<String>>,
    },

    /// A relationship path segment does not name a real relation.
    InvalidRelationship {
        /// The partial path up to and including the failing segment
        /// (e.g. `"a.b"` when `b` is not a relation of `a`'s target).
        path: String,
        /// Relation names valid at the failing level.
        available: Vec<String>,
    },

    /// The terminal column does not exist on the resolved entity.
    InvalidColumn {
        /// The missing column name.
        column: String,
        /// The entity that was checked.
        entity: String,
        /// Columns that do exist on that entity.
        available: Vec<String>,
    },

    /// An operator token outside the canonical set.
    InvalidOperator {
        /// The unrecognized token.
        token: String,
    },

    /// A value whose shape does not fit the operator.
    InvalidValue {
        /// Human-readable description of the mismatch.
        message: String,
    },

    /// Inconsistent configuration or introspection metadata.
    Configuration {
        /// Human-readable description of the inconsistency.
        message: String,
    },
}

impl FilterError {
    /// Allow-list violation for `filter`; pass the allowed set to reveal it.
    pub fn filter_not_allowed(filter: impl Into<String>, allowed: Option<Vec<String>>) -> Self {
        Self::FilterNotAllowed {
            filter: filter.into(),
            allowed,
        }
    }

    /// Relationship walk failure at `path`, with the relations valid there.
    pub fn invalid_relationship(path: impl Into<String>, available: Vec<String>) -> Self {
        Self::InvalidRelationship {
            path: path.into(),
            available,
        }
    }

    /// Missing column on `entity`.
    pub fn invalid_column(
        column: impl Into<String>,
        entity: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        Self::InvalidColumn {
            column: column.into(),
            entity: entity.into(),
            available,
        }
    }

    /// Unknown operator token.
    pub fn invalid_operator(token: impl Into<String>) -> Self {
        Self::InvalidOperator {
            token: token.into(),
        }
    }

    /// Value shape mismatch.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }

    /// Configuration or introspection inconsistency.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilterNotAllowed { filter, allowed } => {
                write!(f, "filter '{filter}' is not allowed")?;
                if let Some(allowed) = allowed {
                    write!(f, "; allowed filters: {}", allowed.join(", "))?;
                }
                Ok(())
            }
            Self::InvalidRelationship { path, available } => {
                write!(
                    f,
                    "invalid relationship '{path}'; valid relations at this level: {}",
                    available.join(", ")
                )
            }
            Self::InvalidColumn {
                column,
                entity,
                available,
            } => {
                write!(
                    f,
                    "column '{column}' does not exist on '{entity}'; available columns: {}",
                    available.join(", ")
                )
            }
            Self::InvalidOperator { token } => {
                write!(
                    f,
                    "unknown filter operator '{token}'; expected one of {}",
                    crate::filtering::operators::CompareOp::TOKENS.join(", ")
                )
            }
            Self::InvalidValue { message } | Self::Configuration { message } => {
                write!(f, "{message}")
            }
        }
    }
}

impl std::error::Error for FilterError {}

/// Ordered, append-only accumulator of filter failures for one request.
///
/// Collected across the whole filtering pass and surfaced verbatim in the
/// response envelope. Serializes as a list of structured entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorList {
    errors: Vec<FilterError>,
}

impl ErrorList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one failure.
    pub fn push(&mut self, error: FilterError) {
        self.errors.push(error);
    }

    /// True when no failure was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// All recorded failures, in processing order.
    #[must_use]
    pub fn errors(&self) -> &[FilterError] {
        &self.errors
    }

    /// Human-readable messages, in processing order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Iterate over recorded failures.
    pub fn iter(&self) -> std::slice::Iter<'_, FilterError> {
        self.errors.iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "filtering finished with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a FilterError;
    type IntoIter = std::slice::Iter<'a, FilterError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
