//! Free-text search across every allow-listed field.
//!
//! A single search term fans out into one isolated OR-group: a substring
//! LIKE per direct field and a nested existence predicate per relationship
//! field. The group composes with all other filters via AND.

use sea_orm::sea_query::Condition;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::conditions::{compile_column_condition, compile_condition, FilterTarget};
use super::operators::CompareOp;
use super::parser::{parse_relationship_key, FilterValue};
use super::validate::AllowedFilters;
use crate::config::FilterConfig;
use crate::errors::FilterError;
use crate::schema::SchemaIntrospector;

/// Compile a free-text search term into one OR-group over the allow-list.
///
/// Returns `Ok(None)` when the term is empty or nothing in the allow-list
/// survives validation. With strict column checking enabled, direct fields
/// that do not exist are dropped from the search rather than errored;
/// relationship fields that fail to compile are dropped the same way.
pub fn compile_search<S: SchemaIntrospector>(
    schema: &S,
    entity: &str,
    term: &str,
    allowed: &AllowedFilters,
    config: &FilterConfig,
) -> Result<Option<Condition>, FilterError> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(None);
    }
    if term.len() > config.max_value_length {
        return Err(FilterError::invalid_value(format!(
            "search term exceeds the maximum length of {} bytes",
            config.max_value_length
        )));
    }

    let value = FilterValue::Scalar(JsonValue::String(term.to_string()));
    let mut group = Condition::any();
    let mut matched = 0usize;

    for field in allowed.entries() {
        match parse_relationship_key(field) {
            Some(path) => {
                let mut current = entity.to_string();
                let mut valid = true;
                for relation in &path.relations {
                    if config.strict_relationship_checking
                        && !schema.has_relation(&current, relation)
                    {
                        valid = false;
                        break;
                    }
                    match schema.related_entity(&current, relation) {
                        Some(next) => current = next,
                        None => {
                            valid = false;
                            break;
                        }
                    }
                }
                if !valid
                    || (config.strict_column_checking && !schema.has_column(&current, &path.column))
                {
                    debug!(field = %field, "dropping unresolvable relationship field from search");
                    continue;
                }
                match compile_condition(
                    schema,
                    entity,
                    &FilterTarget::Relation(path),
                    CompareOp::Like,
                    &value,
                ) {
                    Ok(expr) => {
                        group = group.add(expr);
                        matched += 1;
                    }
                    Err(error) => {
                        debug!(field = %field, %error, "dropping relationship field from search");
                    }
                }
            }
            None => {
                if config.strict_column_checking && !schema.has_column(entity, field) {
                    debug!(field = %field, "dropping unknown column from search");
                    continue;
                }
                group = group.add(compile_column_condition(field, CompareOp::Like, &value)?);
                matched += 1;
            }
        }
    }

    if matched == 0 {
        return Ok(None);
    }
    Ok(Some(group))
}
