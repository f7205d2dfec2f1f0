//! The per-request filtering pass.
//!
//! [`FilterPass`] walks every incoming parameter, resolves legacy vs. modern
//! syntax, validates against the allow-list and (optionally) live schema
//! metadata, and compiles predicates onto one condition tree. Failures are
//! collected per parameter; a bad filter never blocks the rest of the
//! request, and the caller always receives a [`FilterOutcome`].

use sea_orm::sea_query::{Condition, SimpleExpr};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use super::conditions::{compile_condition, FilterTarget};
use super::parser::{parse_key, parse_relationship_key, resolve_value, ParsedKey};
use super::search::compile_search;
use super::sort::{parse_sort, SortSpec};
use super::validate::{validate_filter, AllowedFilters};
use crate::config::{FilterConfig, ABSTRACT_SEARCH};
use crate::errors::{ErrorList, FilterError};
use crate::schema::SchemaIntrospector;

/// Result of one filtering pass.
#[derive(Debug)]
pub struct FilterOutcome {
    /// Conjunction of every successfully compiled predicate.
    pub condition: Condition,
    /// Ordering resolved from the `sort`/`order` parameters, when present.
    pub order_by: Option<SortSpec>,
    /// Number of predicates applied (filters plus abstract search).
    pub applied: usize,
    /// Every per-parameter failure, in processing order.
    pub errors: ErrorList,
}

/// Orchestrates filtering for one root entity.
///
/// Construction takes the immutable configuration and the introspection
/// seam; [`apply`](Self::apply) is then called once per request with that
/// request's parameter map and allow-list.
pub struct FilterPass<'a, S: SchemaIntrospector> {
    schema: &'a S,
    entity: String,
    config: FilterConfig,
}

impl<'a, S: SchemaIntrospector> FilterPass<'a, S> {
    /// Create a pass rooted at `entity`.
    pub fn new(schema: &'a S, entity: impl Into<String>, config: FilterConfig) -> Self {
        Self {
            schema,
            entity: entity.into(),
            config,
        }
    }

    /// The configuration this pass runs under.
    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Run the full filtering pass over one request's parameters.
    ///
    /// `abstract_search` is handled first and exactly once (only when the
    /// allow-list is non-empty). Standard parameters and `ignored` keys are
    /// never treated as filters. Underscore transport shorthand
    /// (`posts_title`) is reverse-mapped to its canonical allow-list entry
    /// before validation.
    #[must_use]
    pub fn apply(
        &self,
        params: &Map<String, JsonValue>,
        allowed: &AllowedFilters,
        ignored: &[&str],
    ) -> FilterOutcome {
        let mut condition = Condition::all();
        let mut errors = ErrorList::new();
        let mut applied = 0usize;

        if let Some(term) = params.get(ABSTRACT_SEARCH) {
            if allowed.is_empty() {
                debug!("skipping abstract search: empty allow-list");
            } else {
                match term.as_str() {
                    Some(term) => match compile_search(
                        self.schema,
                        &self.entity,
                        term,
                        allowed,
                        &self.config,
                    ) {
                        Ok(Some(group)) => {
                            condition = condition.add(group);
                            applied += 1;
                        }
                        Ok(None) => {}
                        Err(error) => errors.push(error),
                    },
                    None => errors.push(FilterError::invalid_value(
                        "abstract search term must be a string",
                    )),
                }
            }
        }

        for (key, value) in params {
            if key == ABSTRACT_SEARCH {
                continue;
            }
            let base = key.split(':').next().unwrap_or(key);
            if self.config.is_standard_parameter(base) || ignored.contains(&base) {
                continue;
            }

            match self.process_one(key, value, allowed) {
                Ok(expr) => {
                    condition = condition.add(expr);
                    applied += 1;
                }
                Err(FilterError::FilterNotAllowed { filter, .. })
                    if !self.config.validate_all_filters =>
                {
                    debug!(filter = %filter, "skipping filter outside the allow-list");
                }
                Err(error) => errors.push(error),
            }
        }

        let order_by = match parse_sort(self.schema, &self.entity, params, allowed, &self.config) {
            Ok(spec) => spec,
            Err(error) => {
                errors.push(error);
                None
            }
        };

        FilterOutcome {
            condition,
            order_by,
            applied,
            errors,
        }
    }

    /// Parse, validate and compile a single parameter.
    fn process_one(
        &self,
        key: &str,
        value: &JsonValue,
        allowed: &AllowedFilters,
    ) -> Result<SimpleExpr, FilterError> {
        let parsed = parse_key(key)?;

        let field = allowed
            .resolve_shorthand(&parsed.field)
            .map_or(parsed.field, ToString::to_string);
        let resolved = resolve_value(
            ParsedKey {
                field,
                operator: parsed.operator,
            },
            value,
        )?;

        if resolved.value.max_str_len() > self.config.max_value_length {
            return Err(FilterError::invalid_value(format!(
                "value for filter '{}' exceeds the maximum length of {} bytes",
                resolved.field, self.config.max_value_length
            )));
        }

        let path = parse_relationship_key(&resolved.field);
        validate_filter(
            self.schema,
            &self.entity,
            &resolved.field,
            path.as_ref(),
            allowed,
            &self.config,
        )?;

        let target = match path {
            Some(path) => FilterTarget::Relation(path),
            None => FilterTarget::Column(resolved.field.clone()),
        };
        compile_condition(
            self.schema,
            &self.entity,
            &target,
            resolved.operator,
            &resolved.value,
        )
    }
}
