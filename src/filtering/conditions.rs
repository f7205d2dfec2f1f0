//! Predicate compilation for validated filters.
//!
//! A validated `(target, operator, value)` triple compiles to a `sea_query`
//! expression. Direct columns become plain comparisons on the root table;
//! relationship targets become existence-quantified conditions: an
//! `EXISTS (SELECT 1 ...)` subquery per relation hop, nested recursively, with
//! the innermost hop applying the actual column comparison. Each relationship
//! filter is its own independent existence check; two filters on the same
//! relation path may match different related rows.

use sea_orm::{
    Value,
    sea_query::{Alias, Expr, Query, SimpleExpr},
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::operators::CompareOp;
use super::parser::{FilterValue, RelationPath};
use crate::errors::FilterError;
use crate::schema::SchemaIntrospector;

/// What a condition applies to: a root-table column or a relationship path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterTarget {
    /// A column on the root entity.
    Column(String),
    /// A column reached through one or more relation hops.
    Relation(RelationPath),
}

/// Escape LIKE wildcards in user input before wrapping.
/// Escapes: `\` (escape char itself), `%` (match any) and `_` (match one).
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Wrap a search term for substring containment. Applied exactly once per
/// compiled predicate; the term itself is wildcard-escaped first.
fn substring_pattern(term: &str) -> String {
    format!("%{}%", escape_like_wildcards(term))
}

/// Convert a JSON scalar to a typed query value.
///
/// Numbers stay numeric, booleans stay boolean, and UUID-shaped strings are
/// promoted to typed UUIDs so they bind correctly against uuid columns.
fn scalar_value(raw: &JsonValue) -> Result<Value, FilterError> {
    match raw {
        JsonValue::String(s) => {
            if let Ok(uuid) = Uuid::parse_str(s.trim()) {
                Ok(Value::from(uuid))
            } else {
                Ok(Value::from(s.clone()))
            }
        }
        JsonValue::Number(n) => {
            if let Some(int) = n.as_i64() {
                Ok(Value::from(int))
            } else if let Some(float) = n.as_f64() {
                Ok(Value::from(float))
            } else {
                Err(FilterError::invalid_value(format!(
                    "numeric value '{n}' is out of range"
                )))
            }
        }
        JsonValue::Bool(b) => Ok(Value::from(*b)),
        other => Err(FilterError::invalid_value(format!(
            "unsupported scalar value '{other}'"
        ))),
    }
}

/// Render a JSON scalar as the plain string a LIKE pattern is built from.
fn scalar_text(raw: &JsonValue) -> Result<String, FilterError> {
    match raw {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(FilterError::invalid_value(format!(
            "value '{other}' cannot be used in a pattern match"
        ))),
    }
}

/// Coerce a filter value to a list. Scalar strings are split on commas only
/// for operators that inherently take a list (`status:in=active,pending`);
/// `=`/`!=` reach here with an already-shaped list and keep commas literal.
fn value_list(operator: CompareOp, value: &FilterValue) -> Result<Vec<Value>, FilterError> {
    match value {
        FilterValue::List(items) => items.iter().map(scalar_value).collect(),
        FilterValue::Scalar(JsonValue::String(s)) if operator.takes_list() => s
            .split(',')
            .map(|part| scalar_value(&JsonValue::String(part.trim().to_string())))
            .collect(),
        FilterValue::Scalar(scalar) => Ok(vec![scalar_value(scalar)?]),
    }
}

/// The IS NULL / IS NOT NULL sentinel, recognized only under `=`.
fn null_sentinel(value: &FilterValue) -> Option<bool> {
    match value {
        FilterValue::Scalar(JsonValue::Null) => Some(false),
        FilterValue::Scalar(JsonValue::String(s)) => {
            if s.eq_ignore_ascii_case("null") {
                Some(false)
            } else if s.eq_ignore_ascii_case("!null") {
                Some(true)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn single_scalar<'v>(
    value: &'v FilterValue,
    operator: CompareOp,
) -> Result<&'v JsonValue, FilterError> {
    match value {
        FilterValue::Scalar(scalar) => Ok(scalar),
        FilterValue::List(_) => Err(FilterError::invalid_value(format!(
            "operator '{}' requires a single value, got a list",
            operator.as_sql()
        ))),
    }
}

/// Compile the comparison for one column expression.
///
/// `col` builds a fresh column reference per use; qualification (bare vs.
/// table-prefixed) is the caller's choice.
fn apply_operator<F>(
    col: F,
    operator: CompareOp,
    value: &FilterValue,
) -> Result<SimpleExpr, FilterError>
where
    F: Fn() -> Expr,
{
    let expr = match operator {
        CompareOp::Eq => {
            // Literal null sentinels win over every other value handling.
            if let Some(negated) = null_sentinel(value) {
                return Ok(if negated {
                    col().is_not_null()
                } else {
                    col().is_null()
                });
            }
            match value {
                // A plain list under '=' means membership.
                FilterValue::List(_) => col().is_in(value_list(operator, value)?),
                FilterValue::Scalar(scalar) => col().eq(scalar_value(scalar)?),
            }
        }
        CompareOp::Ne => match value {
            FilterValue::List(_) => col().is_not_in(value_list(operator, value)?),
            FilterValue::Scalar(scalar) => col().ne(scalar_value(scalar)?),
        },
        CompareOp::Gt => col().gt(scalar_value(single_scalar(value, operator)?)?),
        CompareOp::Lt => col().lt(scalar_value(single_scalar(value, operator)?)?),
        CompareOp::Gte => col().gte(scalar_value(single_scalar(value, operator)?)?),
        CompareOp::Lte => col().lte(scalar_value(single_scalar(value, operator)?)?),
        CompareOp::Like => {
            col().like(substring_pattern(&scalar_text(single_scalar(value, operator)?)?))
        }
        CompareOp::NotLike => {
            col().not_like(substring_pattern(&scalar_text(single_scalar(value, operator)?)?))
        }
        // An empty list is a valid (constant) predicate, not an error.
        CompareOp::In => col().is_in(value_list(operator, value)?),
        CompareOp::NotIn => col().is_not_in(value_list(operator, value)?),
        CompareOp::Between | CompareOp::NotBetween => {
            let mut bounds = value_list(operator, value)?;
            if bounds.len() != 2 {
                return Err(FilterError::invalid_value(format!(
                    "operator '{}' requires exactly two values, got {}",
                    operator.as_sql(),
                    bounds.len()
                )));
            }
            let high = bounds.pop().unwrap_or(Value::Int(None));
            let low = bounds.pop().unwrap_or(Value::Int(None));
            if operator == CompareOp::Between {
                col().between(low, high)
            } else {
                col().not_between(low, high)
            }
        }
    };
    Ok(expr)
}

/// Compile a predicate on a bare root-table column.
pub fn compile_column_condition(
    column: &str,
    operator: CompareOp,
    value: &FilterValue,
) -> Result<SimpleExpr, FilterError> {
    let column = column.to_string();
    apply_operator(|| Expr::col(Alias::new(column.clone())), operator, value)
}

/// Wrap `inner` in one `EXISTS (SELECT 1 ...)` subquery per relation hop,
/// innermost hop first.
///
/// `inner` must reference columns of the entity at the end of the path,
/// table-qualified. Walks the path forward to collect join metadata, then
/// folds backward so hop N's existence filter wraps hop N+1's.
pub fn relation_exists<S: SchemaIntrospector>(
    schema: &S,
    entity: &str,
    path: &RelationPath,
    inner: SimpleExpr,
) -> Result<SimpleExpr, FilterError> {
    let mut hops = Vec::with_capacity(path.depth());
    let mut parent = entity.to_string();
    for relation in &path.relations {
        let join = schema.relation_join(&parent, relation).ok_or_else(|| {
            FilterError::configuration(format!(
                "relation '{relation}' on '{parent}' has no join metadata"
            ))
        })?;
        let next = join.related_entity.clone();
        hops.push((parent, join));
        parent = next;
    }

    let mut expr = inner;
    for (parent, join) in hops.into_iter().rev() {
        let mut sub = Query::select();
        sub.expr(Expr::val(1))
            .from(Alias::new(join.related_entity.clone()))
            .and_where(
                Expr::col((
                    Alias::new(join.related_entity.clone()),
                    Alias::new(join.foreign_key.clone()),
                ))
                .equals((Alias::new(parent), Alias::new(join.local_key.clone()))),
            )
            .and_where(expr);
        expr = Expr::exists(sub);
    }
    Ok(expr)
}

/// Compile a validated `(target, operator, value)` triple into a predicate.
pub fn compile_condition<S: SchemaIntrospector>(
    schema: &S,
    entity: &str,
    target: &FilterTarget,
    operator: CompareOp,
    value: &FilterValue,
) -> Result<SimpleExpr, FilterError> {
    match target {
        FilterTarget::Column(column) => compile_column_condition(column, operator, value),
        FilterTarget::Relation(path) => {
            // Resolve the entity at the end of the path so the innermost
            // condition can qualify its column.
            let mut current = entity.to_string();
            for relation in &path.relations {
                current = schema.related_entity(&current, relation).ok_or_else(|| {
                    FilterError::configuration(format!(
                        "relation '{relation}' on '{current}' has no join metadata"
                    ))
                })?;
            }
            let table = current.clone();
            let column = path.column.clone();
            let inner = apply_operator(
                || Expr::col((Alias::new(table.clone()), Alias::new(column.clone()))),
                operator,
                value,
            )?;
            relation_exists(schema, entity, path, inner)
        }
    }
}
