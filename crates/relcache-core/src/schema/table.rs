use super::{FieldPrimitive, Relation};

use indexmap::IndexMap;

/// One entity type of the model.
#[derive(Debug, Clone)]
pub struct Table {
    /// Uniquely identifies the table within the model
    pub name: String,

    /// Name of the primary-key field. Either a scalar field or the alias of a
    /// relation (a table keyed by its owner, e.g. `token` keyed by `user`).
    pub primary_key: String,

    /// Scalar fields and their declared kinds
    pub fields: IndexMap<String, FieldPrimitive>,

    /// Relations, keyed by the local field alias
    pub relations: IndexMap<String, Relation>,
}

impl Table {
    pub fn field(&self, name: &str) -> Option<FieldPrimitive> {
        self.fields.get(name).copied()
    }

    pub fn relation(&self, alias: &str) -> Option<&Relation> {
        self.relations.get(alias)
    }

    pub fn relations(&self) -> impl Iterator<Item = (&str, &Relation)> + '_ {
        self.relations
            .iter()
            .map(|(alias, relation)| (alias.as_str(), relation))
    }

    /// If the primary key is a relation alias, returns that relation.
    pub fn primary_key_relation(&self) -> Option<&Relation> {
        self.relations.get(&self.primary_key)
    }

    pub fn is_primary_key(&self, field: &str) -> bool {
        self.primary_key == field
    }

    /// Returns `true` if `name` is a scalar field or a relation alias.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name) || self.relations.contains_key(name)
    }
}
