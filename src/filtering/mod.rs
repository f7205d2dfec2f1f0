//! # Filter Expression Parsing & Condition Compilation
//!
//! This module turns structured query parameters into validated `sea_query`
//! predicates, including across nested relationship paths.
//!
//! ## Key Features
//!
//! - **Two filter syntaxes**: modern `field:operator=value` and legacy
//!   `field[operator]=op&field[value]=value`, mixable across keys
//! - **Allow-listed targets**: a parameter is only honored when its resolved
//!   field identifier is explicitly declared by the caller
//! - **Relationship filters**: dotted (`items.product.name`) and starred
//!   (`items*name`) paths compile to nested `EXISTS` subqueries
//! - **Abstract search**: one free-text term fans out over every allowed
//!   direct and relationship field as an OR-group
//! - **Error aggregation**: per-parameter failures are collected, never
//!   aborting the pass
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // Simple equality
//! GET /users?role=admin
//!
//! // Comparison operators
//! GET /users?age:gte=18&age:lt=65
//!
//! // Null sentinels
//! GET /users?verified_at=null
//! GET /users?deleted_at=!null
//!
//! // List membership
//! GET /users?status:in=active,pending
//!
//! // Relationship filters (nested EXISTS)
//! GET /users?posts.title:like=rust
//! GET /users?posts.comments.body:like=nice
//!
//! // Free-text search over the allow-list
//! GET /users?abstract_search=john
//!
//! // Sorting
//! GET /users?sort=name&order=desc
//! ```
//!
//! ## Main Components
//!
//! - [`FilterPass`](orchestrator::FilterPass): runs the whole pass for one request
//! - [`compile_condition`](conditions::compile_condition): predicate compilation
//! - [`compile_search`](search::compile_search): abstract search compilation
//! - [`parse_relationship_key`](parser::parse_relationship_key): standalone
//!   relationship key parsing, reused by grouping and custom where-conditions

pub mod conditions;
pub mod operators;
pub mod orchestrator;
pub mod parser;
pub mod search;
pub mod sort;
pub mod validate;

// Re-export commonly used items
pub use conditions::{compile_column_condition, compile_condition, relation_exists, FilterTarget};
pub use operators::CompareOp;
pub use orchestrator::{FilterOutcome, FilterPass};
pub use parser::{parse_key, parse_relationship_key, FilterValue, ParsedKey, RelationPath, ResolvedFilter};
pub use search::compile_search;
pub use sort::{parse_sort, SortSpec};
pub use validate::{validate_filter, AllowedFilters};
