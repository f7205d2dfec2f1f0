//! Translate structured HTTP query parameters into validated Sea-ORM
//! conditions: allow-listed filtering, relationship-aware `EXISTS`
//! predicates, free-text search and sorting, with per-parameter error
//! aggregation.
//!
//! ```rust,ignore
//! use queryfilter::{AllowedFilters, FilterConfig, FilterPass, MemorySchema};
//!
//! let schema = MemorySchema::new()
//!     .entity("users", &["id", "name", "role"])
//!     .entity("posts", &["id", "user_id", "title"])
//!     .relation("users", "posts", "posts", "id", "user_id");
//!
//! let pass = FilterPass::new(&schema, "users", FilterConfig::default());
//! let allowed = AllowedFilters::new(["name", "role", "posts.title"]);
//! let outcome = pass.apply(&request_params, &allowed, &[]);
//!
//! let query = users::Entity::find().filter(outcome.condition);
//! for error in &outcome.errors {
//!     // surface alongside partial results
//! }
//! ```

pub mod config;
pub mod errors;
pub mod filtering;
pub mod schema;

pub use config::{FilterConfig, ABSTRACT_SEARCH, STANDARD_PARAMETERS};
pub use errors::{ErrorList, FilterError};
pub use filtering::{
    compile_condition, compile_search, parse_relationship_key, AllowedFilters, CompareOp,
    FilterOutcome, FilterPass, FilterTarget, FilterValue, RelationPath, SortSpec,
};
pub use schema::{MemorySchema, RelationJoin, SchemaIntrospector};
