//! Allow-list and strict-introspection validation of filter targets.
//!
//! Validation runs before any predicate is compiled. The allow-list check is
//! unconditional; the relationship walk and terminal column check are each
//! gated by their own configuration flag and skipped entirely when disabled,
//! trusting the caller's allow-list.

use super::parser::RelationPath;
use crate::config::FilterConfig;
use crate::errors::FilterError;
use crate::schema::SchemaIntrospector;

/// Caller-declared set of permitted filter/sort targets.
///
/// Entries are plain column names or canonical relationship identifiers in
/// dotted (`posts.title`) or starred (`posts*title`) form.
#[derive(Debug, Clone, Default)]
pub struct AllowedFilters {
    entries: Vec<String>,
}

impl AllowedFilters {
    /// Build from any iterable of field identifiers.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// True when `field` is an allowed target.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|e| e == field)
    }

    /// True when no filter target is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Reverse-map an underscore transport shorthand to its canonical entry.
    ///
    /// Relationship identifiers travel with `.`/`*` replaced by `_` (query
    /// parameter `posts_title` for the entry `posts.title`). Only entries that
    /// actually contain a separator participate, so a plain `verified_at`
    /// column is never shadowed.
    #[must_use]
    pub fn resolve_shorthand(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| {
                (entry.contains('.') || entry.contains('*'))
                    && entry.replace(['.', '*'], "_") == key
            })
            .map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowedFilters {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Validate a filter target against the allow-list and, when strict checking
/// is enabled, against live schema and relationship introspection.
///
/// `field` is the canonical identifier as it appears in the allow-list;
/// `path` is its parsed relationship form, when it has one.
pub fn validate_filter<S: SchemaIntrospector>(
    schema: &S,
    entity: &str,
    field: &str,
    path: Option<&RelationPath>,
    allowed: &AllowedFilters,
    config: &FilterConfig,
) -> Result<(), FilterError> {
    if !allowed.contains(field) && !config.is_standard_parameter(field) {
        let reveal = config
            .reveal_allowed_filters
            .then(|| allowed.entries().to_vec());
        return Err(FilterError::filter_not_allowed(field, reveal));
    }

    match path {
        Some(path) => {
            if path.depth() > config.max_relation_depth {
                return Err(FilterError::invalid_value(format!(
                    "relationship path '{}' exceeds the maximum depth of {}",
                    path.canonical(),
                    config.max_relation_depth
                )));
            }

            let mut current = entity.to_string();
            let mut walked: Vec<&str> = Vec::with_capacity(path.depth());
            for relation in &path.relations {
                walked.push(relation);
                if config.strict_relationship_checking && !schema.has_relation(&current, relation) {
                    return Err(FilterError::invalid_relationship(
                        walked.join("."),
                        schema.relation_names(&current),
                    ));
                }
                match schema.related_entity(&current, relation) {
                    Some(next) => current = next,
                    None if config.strict_relationship_checking => {
                        return Err(FilterError::configuration(format!(
                            "relation '{}' on '{current}' has no join metadata",
                            relation
                        )));
                    }
                    // Without strict checking there is nothing to re-base
                    // onto; the column check (if any) cannot proceed either.
                    None => return Ok(()),
                }
            }

            if config.strict_column_checking && !schema.has_column(&current, &path.column) {
                return Err(FilterError::invalid_column(
                    &path.column,
                    &current,
                    schema.columns(&current),
                ));
            }
            Ok(())
        }
        None => {
            if config.strict_column_checking && !schema.has_column(entity, field) {
                return Err(FilterError::invalid_column(
                    field,
                    entity,
                    schema.columns(entity),
                ));
            }
            Ok(())
        }
    }
}
