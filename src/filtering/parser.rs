//! Key and value parsing for raw request parameters.
//!
//! A raw parameter arrives as an untyped key/value pair. The parser resolves
//! both syntaxes exactly once, before any compiler logic runs:
//!
//! - Modern: `field:operatorToken=value` — the token must exist in the
//!   operator table.
//! - Legacy: a bare field key whose value is a two-key `{operator, value}`
//!   map.
//!
//! Relationship keys use dotted (`items.product.name`, arbitrary depth) or
//! starred (`items*name`, single level) form; the two separators are
//! equivalent but a single key uses exactly one.

use serde_json::Value as JsonValue;

use super::operators::CompareOp;
use crate::errors::FilterError;

/// A filter value with its request-level shape resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// A single scalar (string, number, boolean or null).
    Scalar(JsonValue),
    /// A list of scalars.
    List(Vec<JsonValue>),
}

impl FilterValue {
    /// Longest string payload carried by this value, in bytes.
    #[must_use]
    pub fn max_str_len(&self) -> usize {
        let scalar_len = |v: &JsonValue| v.as_str().map_or(0, str::len);
        match self {
            Self::Scalar(v) => scalar_len(v),
            Self::List(values) => values.iter().map(scalar_len).max().unwrap_or(0),
        }
    }
}

/// A raw key split into base field and optional operator token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey {
    /// The field part, left of the first `:`.
    pub field: String,
    /// The operator, when the key carried a `:token` suffix.
    pub operator: Option<CompareOp>,
}

/// A fully resolved filter: field, operator and value shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilter {
    /// The (possibly relationship) field identifier.
    pub field: String,
    /// The comparison operator; defaults to `=` when neither syntax names one.
    pub operator: CompareOp,
    /// The resolved value.
    pub value: FilterValue,
}

/// An ordered relation path plus terminal column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationPath {
    /// Relation names from the root entity outward. Never empty.
    pub relations: Vec<String>,
    /// The column on the entity at the end of the path.
    pub column: String,
}

impl RelationPath {
    /// Canonical dotted identifier, e.g. `items.product.name`.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("{}.{}", self.relations.join("."), self.column)
    }

    /// Number of relation hops.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.relations.len()
    }
}

/// Split a raw key into base field and operator token.
///
/// Splits once on the first `:`; the right side must be a known operator
/// token or the parse fails with `InvalidOperator`.
pub fn parse_key(raw_key: &str) -> Result<ParsedKey, FilterError> {
    match raw_key.split_once(':') {
        Some((field, token)) => {
            let operator = CompareOp::from_token(token)
                .ok_or_else(|| FilterError::invalid_operator(token))?;
            Ok(ParsedKey {
                field: field.to_string(),
                operator: Some(operator),
            })
        }
        None => Ok(ParsedKey {
            field: raw_key.to_string(),
            operator: None,
        }),
    }
}

/// Parse a relationship field into its relation path and terminal column.
///
/// Returns `None` for plain fields. A `*` key splits once and supports a
/// single relation level; a dotted key splits on every `.` with the last
/// segment as the column.
#[must_use]
pub fn parse_relationship_key(field: &str) -> Option<RelationPath> {
    if let Some((relation, column)) = field.split_once('*') {
        if relation.is_empty() || column.is_empty() {
            return None;
        }
        return Some(RelationPath {
            relations: vec![relation.to_string()],
            column: column.to_string(),
        });
    }

    if field.contains('.') {
        let segments: Vec<&str> = field.split('.').collect();
        if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        let column = (*segments.last()?).to_string();
        let relations = segments[..segments.len() - 1]
            .iter()
            .map(ToString::to_string)
            .collect();
        return Some(RelationPath { relations, column });
    }

    None
}

/// Resolve a parsed key and its raw value into a [`ResolvedFilter`].
///
/// Legacy `{operator, value}` maps override the default `=` operator but are
/// mutually exclusive with the `:token` syntax on the same key.
pub fn resolve_value(parsed: ParsedKey, raw: &JsonValue) -> Result<ResolvedFilter, FilterError> {
    let legacy_map = raw
        .as_object()
        .filter(|map| map.len() == 2 && map.contains_key("operator") && map.contains_key("value"));

    if let Some(map) = legacy_map {
        if parsed.operator.is_some() {
            return Err(FilterError::invalid_value(format!(
                "filter '{}' mixes ':operator' syntax with a legacy operator map",
                parsed.field
            )));
        }
        let op_raw = map
            .get("operator")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| {
                FilterError::invalid_value(format!(
                    "filter '{}' has a non-string legacy operator",
                    parsed.field
                ))
            })?;
        let operator = CompareOp::parse(op_raw)?;
        let value = resolve_shape(&parsed.field, map.get("value").unwrap_or(&JsonValue::Null))?;
        return Ok(ResolvedFilter {
            field: parsed.field,
            operator,
            value,
        });
    }

    let value = resolve_shape(&parsed.field, raw)?;
    Ok(ResolvedFilter {
        operator: parsed.operator.unwrap_or(CompareOp::Eq),
        field: parsed.field,
        value,
    })
}

fn resolve_shape(field: &str, raw: &JsonValue) -> Result<FilterValue, FilterError> {
    match raw {
        JsonValue::Array(items) => {
            if items.iter().any(|v| v.is_array() || v.is_object()) {
                return Err(FilterError::invalid_value(format!(
                    "filter '{field}' has a list with non-scalar elements"
                )));
            }
            Ok(FilterValue::List(items.clone()))
        }
        JsonValue::Object(_) => Err(FilterError::invalid_value(format!(
            "filter '{field}' has an unsupported object value"
        ))),
        scalar => Ok(FilterValue::Scalar(scalar.clone())),
    }
}
