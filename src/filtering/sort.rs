//! Sorting parameter handling.
//!
//! `sort` names the target column and `order` the direction. The target goes
//! through the same key parser and validator as a filter; an invalid
//! direction silently falls back to ascending.

use sea_orm::sea_query::Order;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use super::parser::parse_relationship_key;
use super::validate::{validate_filter, AllowedFilters};
use crate::config::FilterConfig;
use crate::errors::FilterError;
use crate::schema::SchemaIntrospector;

/// A validated ordering instruction for the query under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    /// The root-entity column to order by.
    pub column: String,
    /// Sort direction.
    pub direction: Order,
}

fn parse_direction(raw: Option<&str>) -> Order {
    match raw {
        Some(dir) if dir.eq_ignore_ascii_case("desc") => Order::Desc,
        Some(dir) if dir.eq_ignore_ascii_case("asc") => Order::Asc,
        Some(dir) => {
            // Invalid direction falls back to ascending rather than erroring.
            debug!(direction = %dir, "unknown sort direction, defaulting to ascending");
            Order::Asc
        }
        None => Order::Asc,
    }
}

/// Resolve the `sort`/`order` parameters into a [`SortSpec`], if present.
///
/// The sort target must be an allow-listed direct column; relationship
/// fields are rejected because ordering across a relation would require an
/// implicit join.
pub fn parse_sort<S: SchemaIntrospector>(
    schema: &S,
    entity: &str,
    params: &Map<String, JsonValue>,
    allowed: &AllowedFilters,
    config: &FilterConfig,
) -> Result<Option<SortSpec>, FilterError> {
    let Some(raw) = params.get("sort") else {
        return Ok(None);
    };
    let Some(field) = raw.as_str().map(str::trim).filter(|f| !f.is_empty()) else {
        return Err(FilterError::invalid_value(
            "sort parameter must be a non-empty column name",
        ));
    };

    let path = parse_relationship_key(field);
    validate_filter(schema, entity, field, path.as_ref(), allowed, config)?;
    if path.is_some() {
        return Err(FilterError::invalid_value(format!(
            "cannot sort by relationship field '{field}'"
        )));
    }

    let direction = parse_direction(params.get("order").and_then(JsonValue::as_str));
    Ok(Some(SortSpec {
        column: field.to_string(),
        direction,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MemorySchema;
    use serde_json::json;

    fn schema() -> MemorySchema {
        MemorySchema::new()
            .entity("users", &["id", "name", "role"])
            .entity("posts", &["id", "user_id", "title"])
            .relation("users", "posts", "posts", "id", "user_id")
    }

    fn params(pairs: &[(&str, JsonValue)]) -> Map<String, JsonValue> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_no_sort_parameter() {
        let allowed = AllowedFilters::new(["name"]);
        let result = parse_sort(
            &schema(),
            "users",
            &params(&[]),
            &allowed,
            &FilterConfig::default(),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_sort_with_explicit_direction() {
        let allowed = AllowedFilters::new(["name"]);
        let spec = parse_sort(
            &schema(),
            "users",
            &params(&[("sort", json!("name")), ("order", json!("DESC"))]),
            &allowed,
            &FilterConfig::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(spec.column, "name");
        assert_eq!(spec.direction, Order::Desc);
    }

    #[test]
    fn test_invalid_direction_falls_back_to_ascending() {
        let allowed = AllowedFilters::new(["name"]);
        let spec = parse_sort(
            &schema(),
            "users",
            &params(&[("sort", json!("name")), ("order", json!("sideways"))]),
            &allowed,
            &FilterConfig::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(spec.direction, Order::Asc);
    }

    #[test]
    fn test_sort_target_must_be_allowed() {
        let allowed = AllowedFilters::new(["name"]);
        let err = parse_sort(
            &schema(),
            "users",
            &params(&[("sort", json!("role"))]),
            &allowed,
            &FilterConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FilterError::FilterNotAllowed { .. }));
    }

    #[test]
    fn test_sort_target_must_exist_when_strict() {
        let allowed = AllowedFilters::new(["ghost"]);
        let err = parse_sort(
            &schema(),
            "users",
            &params(&[("sort", json!("ghost"))]),
            &allowed,
            &FilterConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FilterError::InvalidColumn { .. }));
    }

    #[test]
    fn test_relationship_sort_is_rejected() {
        let allowed = AllowedFilters::new(["posts.title"]);
        let err = parse_sort(
            &schema(),
            "users",
            &params(&[("sort", json!("posts.title"))]),
            &allowed,
            &FilterConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { .. }));
    }
}
