//! Schema and relationship introspection seam.
//!
//! Strict checking validates filter targets against live metadata before any
//! predicate is compiled. The [`SchemaIntrospector`] trait is the boundary to
//! that metadata: entity columns, relation names, and the join keys needed to
//! compile existence subqueries. [`MemorySchema`] is a plain in-memory
//! implementation used in tests and by callers whose schema is static.
//!
//! Entity names double as table names; a relation's join metadata describes
//! how the related table references its parent.

use std::collections::HashMap;

/// Join metadata for one named relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationJoin {
    /// The related entity (and table) reached through this relation.
    pub related_entity: String,
    /// Key column on the parent entity.
    pub local_key: String,
    /// Column on the related entity referencing `local_key`.
    pub foreign_key: String,
}

/// Read-only access to schema and relationship metadata.
///
/// All methods are synchronous reads against already-loaded metadata; the
/// filtering core never performs I/O through this trait.
pub trait SchemaIntrospector {
    /// True when `column` exists on `entity`.
    fn has_column(&self, entity: &str, column: &str) -> bool;

    /// All columns of `entity`, in declaration order.
    fn columns(&self, entity: &str) -> Vec<String>;

    /// True when `relation` is a relation of `entity`.
    fn has_relation(&self, entity: &str, relation: &str) -> bool;

    /// All relation names of `entity`.
    fn relation_names(&self, entity: &str) -> Vec<String>;

    /// Join metadata for `relation` on `entity`, when it exists.
    fn relation_join(&self, entity: &str, relation: &str) -> Option<RelationJoin>;

    /// The entity reached by following `relation` from `entity`.
    fn related_entity(&self, entity: &str, relation: &str) -> Option<String> {
        self.relation_join(entity, relation).map(|j| j.related_entity)
    }
}

#[derive(Debug, Clone, Default)]
struct EntityDef {
    columns: Vec<String>,
    relations: HashMap<String, RelationJoin>,
    relation_order: Vec<String>,
}

/// In-memory [`SchemaIntrospector`] built from declared entities.
///
/// ```rust,ignore
/// let schema = MemorySchema::new()
///     .entity("users", &["id", "name", "role"])
///     .entity("posts", &["id", "user_id", "title"])
///     .relation("users", "posts", "posts", "id", "user_id");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySchema {
    entities: HashMap<String, EntityDef>,
}

impl MemorySchema {
    /// Create an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an entity and its columns.
    #[must_use]
    pub fn entity(mut self, name: &str, columns: &[&str]) -> Self {
        let def = self.entities.entry(name.to_string()).or_default();
        def.columns = columns.iter().map(ToString::to_string).collect();
        self
    }

    /// Declare a relation from `entity` to `related`, joined on
    /// `related.foreign_key = entity.local_key`.
    #[must_use]
    pub fn relation(
        mut self,
        entity: &str,
        name: &str,
        related: &str,
        local_key: &str,
        foreign_key: &str,
    ) -> Self {
        let def = self.entities.entry(entity.to_string()).or_default();
        if !def.relations.contains_key(name) {
            def.relation_order.push(name.to_string());
        }
        def.relations.insert(
            name.to_string(),
            RelationJoin {
                related_entity: related.to_string(),
                local_key: local_key.to_string(),
                foreign_key: foreign_key.to_string(),
            },
        );
        self
    }
}

impl SchemaIntrospector for MemorySchema {
    fn has_column(&self, entity: &str, column: &str) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|def| def.columns.iter().any(|c| c == column))
    }

    fn columns(&self, entity: &str) -> Vec<String> {
        self.entities
            .get(entity)
            .map(|def| def.columns.clone())
            .unwrap_or_default()
    }

    fn has_relation(&self, entity: &str, relation: &str) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|def| def.relations.contains_key(relation))
    }

    fn relation_names(&self, entity: &str) -> Vec<String> {
        self.entities
            .get(entity)
            .map(|def| def.relation_order.clone())
            .unwrap_or_default()
    }

    fn relation_join(&self, entity: &str, relation: &str) -> Option<RelationJoin> {
        self.entities
            .get(entity)
            .and_then(|def| def.relations.get(relation).cloned())
    }
}
