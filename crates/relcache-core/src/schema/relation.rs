use super::{Model, Table};

/// Cardinality of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// The field holds one foreign key.
    HasOne,

    /// The field holds an ordered list of foreign keys.
    HasMany,
}

/// A relation declared on a table under a local alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Name of the related table
    pub target: String,

    /// The target's primary-key field at the time the relation was declared
    pub target_primary_key: String,

    pub kind: RelationKind,
}

impl Relation {
    /// The related table.
    ///
    /// Relation targets are checked when the model is assembled, so the
    /// lookup cannot fail for relations of a table taken from `model`.
    #[track_caller]
    pub fn target<'a>(&self, model: &'a Model) -> &'a Table {
        model.expect_table(&self.target)
    }

    pub fn is_has_one(&self) -> bool {
        matches!(self.kind, RelationKind::HasOne)
    }

    pub fn is_has_many(&self) -> bool {
        matches!(self.kind, RelationKind::HasMany)
    }
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::HasOne => "has_one",
            RelationKind::HasMany => "has_many",
        }
    }
}
