//! Relationship filter coverage: nested EXISTS shape, separator
//! equivalence, strict relationship validation and shorthand keys.

use queryfilter::{AllowedFilters, FilterConfig, FilterError, FilterPass, MemorySchema};
use sea_orm::sea_query::{Alias, Asterisk, PostgresQueryBuilder, Query};
use serde_json::{json, Map, Value as JsonValue};

fn schema() -> MemorySchema {
    MemorySchema::new()
        .entity("users", &["id", "name"])
        .entity("orders", &["id", "user_id", "total"])
        .entity("items", &["id", "order_id", "quantity"])
        .entity("products", &["id", "item_id", "name"])
        .relation("users", "orders", "orders", "id", "user_id")
        .relation("orders", "items", "items", "id", "order_id")
        .relation("items", "product", "products", "id", "item_id")
}

fn pass(schema: &MemorySchema) -> FilterPass<'_, MemorySchema> {
    FilterPass::new(schema, "users", FilterConfig::default())
}

fn params(pairs: &[(&str, JsonValue)]) -> Map<String, JsonValue> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn render(outcome: &queryfilter::FilterOutcome) -> String {
    Query::select()
        .column(Asterisk)
        .from(Alias::new("users"))
        .cond_where(outcome.condition.clone())
        .to_string(PostgresQueryBuilder)
}

#[test]
fn three_hop_path_nests_one_exists_per_hop() {
    let schema = schema();
    let allowed = AllowedFilters::new(["orders.items.product.name"]);
    let outcome = pass(&schema).apply(
        &params(&[("orders.items.product.name:like", json!("widget"))]),
        &allowed,
        &[],
    );

    assert!(outcome.errors.is_empty(), "errors: {}", outcome.errors);
    let sql = render(&outcome);
    assert_eq!(sql.matches("EXISTS").count(), 3, "got: {sql}");
    assert!(sql.contains(r#""orders"."user_id" = "users"."id""#), "got: {sql}");
    assert!(sql.contains(r#""items"."order_id" = "orders"."id""#), "got: {sql}");
    assert!(sql.contains(r#""products"."item_id" = "items"."id""#), "got: {sql}");
    assert!(sql.contains(r#""products"."name" LIKE '%widget%'"#), "got: {sql}");
}

#[test]
fn starred_and_dotted_forms_compile_identically() {
    let schema = schema();

    let dotted_allowed = AllowedFilters::new(["orders.total"]);
    let dotted = pass(&schema).apply(
        &params(&[("orders.total:gte", json!(100))]),
        &dotted_allowed,
        &[],
    );

    let starred_allowed = AllowedFilters::new(["orders*total"]);
    let starred = pass(&schema).apply(
        &params(&[("orders*total:gte", json!(100))]),
        &starred_allowed,
        &[],
    );

    assert!(dotted.errors.is_empty(), "errors: {}", dotted.errors);
    assert!(starred.errors.is_empty(), "errors: {}", starred.errors);
    assert_eq!(render(&dotted), render(&starred));
}

#[test]
fn invalid_middle_segment_reports_partial_path_and_alternatives() {
    let schema = schema();
    // `shipments` is not a relation of orders; valid there: items
    let allowed = AllowedFilters::new(["orders.shipments.status"]);
    let outcome = pass(&schema).apply(
        &params(&[("orders.shipments.status", json!("sent"))]),
        &allowed,
        &[],
    );

    assert_eq!(outcome.applied, 0);
    assert_eq!(outcome.errors.len(), 1);
    match &outcome.errors.errors()[0] {
        FilterError::InvalidRelationship { path, available } => {
            assert_eq!(path, "orders.shipments");
            assert_eq!(available, &vec!["items".to_string()]);
        }
        other => panic!("expected InvalidRelationship, got {other:?}"),
    }
}

#[test]
fn two_filters_on_one_relation_are_independent_existence_checks() {
    let schema = schema();
    let allowed = AllowedFilters::new(["orders.total", "orders.items.quantity"]);
    let outcome = pass(&schema).apply(
        &params(&[
            ("orders.total:gte", json!(100)),
            ("orders.items.quantity:gte", json!(2)),
        ]),
        &allowed,
        &[],
    );

    assert!(outcome.errors.is_empty(), "errors: {}", outcome.errors);
    assert_eq!(outcome.applied, 2);
    let sql = render(&outcome);
    // Each filter produces its own subquery chain; the single-hop filter
    // contributes one EXISTS and the two-hop filter contributes two.
    assert_eq!(sql.matches("EXISTS").count(), 3, "got: {sql}");
    assert_eq!(
        sql.matches(r#""orders"."user_id" = "users"."id""#).count(),
        2,
        "got: {sql}"
    );
}

#[test]
fn between_with_wrong_arity_is_an_invalid_value_error() {
    let schema = schema();
    let allowed = AllowedFilters::new(["orders.total"]);
    let outcome = pass(&schema).apply(
        &params(&[("orders.total:between", json!([10, 20, 30]))]),
        &allowed,
        &[],
    );

    assert_eq!(outcome.applied, 0);
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(
        outcome.errors.errors()[0],
        FilterError::InvalidValue { .. }
    ));
}

#[test]
fn shorthand_transport_keys_reverse_map_before_validation() {
    let schema = schema();
    let allowed = AllowedFilters::new(["orders.items.quantity"]);
    let outcome = pass(&schema).apply(
        &params(&[("orders_items_quantity:gte", json!(3))]),
        &allowed,
        &[],
    );

    assert!(outcome.errors.is_empty(), "errors: {}", outcome.errors);
    assert_eq!(outcome.applied, 1);
    let sql = render(&outcome);
    assert!(sql.contains(r#""items"."quantity" >= 3"#), "got: {sql}");
}

#[test]
fn lenient_relationship_checking_still_compiles_known_joins() {
    // With strict checks off, the allow-list alone gates the filter; join
    // metadata that does exist is still used to build the EXISTS chain.
    let schema = schema();
    let config = FilterConfig {
        strict_relationship_checking: false,
        strict_column_checking: false,
        ..FilterConfig::default()
    };
    let allowed = AllowedFilters::new(["orders.total"]);
    let outcome = FilterPass::new(&schema, "users", config).apply(
        &params(&[("orders.total:gte", json!(50))]),
        &allowed,
        &[],
    );

    assert!(outcome.errors.is_empty(), "errors: {}", outcome.errors);
    assert!(render(&outcome).contains("EXISTS"));
}

#[test]
fn unknown_relation_without_strict_checking_is_a_configuration_error() {
    // The allow-list admits the key and strict checks are off, but the
    // compiler cannot build an EXISTS chain without join metadata. That is
    // reported, not panicked.
    let schema = schema();
    let config = FilterConfig {
        strict_relationship_checking: false,
        strict_column_checking: false,
        ..FilterConfig::default()
    };
    let allowed = AllowedFilters::new(["ghost.total"]);
    let outcome = FilterPass::new(&schema, "users", config).apply(
        &params(&[("ghost.total", json!(1))]),
        &allowed,
        &[],
    );

    assert_eq!(outcome.applied, 0);
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(
        outcome.errors.errors()[0],
        FilterError::Configuration { .. }
    ));
}
