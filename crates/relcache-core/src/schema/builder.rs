use super::{FieldPrimitive, Relation, RelationKind, Table};
use crate::{Error, Result};

use indexmap::IndexMap;

/// Options accepted by [`create_table`].
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    /// Primary-key field name. Defaults to `"id"`.
    pub primary_key: Option<String>,
}

/// Declares a table and its relations before the model is assembled.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    table: Table,
}

/// Registers a table with its scalar fields.
///
/// ```
/// use relcache_core::schema::{create_table, FieldPrimitive, TableOptions};
///
/// let token = create_table(
///     "token",
///     [("token", FieldPrimitive::String)],
///     TableOptions { primary_key: Some("user".to_string()) },
/// );
/// assert_eq!(token.primary_key(), "user");
/// ```
pub fn create_table<I, K>(name: impl Into<String>, fields: I, options: TableOptions) -> TableBuilder
where
    I: IntoIterator<Item = (K, FieldPrimitive)>,
    K: Into<String>,
{
    TableBuilder {
        table: Table {
            name: name.into(),
            primary_key: options.primary_key.unwrap_or_else(|| "id".to_string()),
            fields: fields
                .into_iter()
                .map(|(field, kind)| (field.into(), kind))
                .collect(),
            relations: IndexMap::new(),
        },
    }
}

impl TableBuilder {
    pub fn name(&self) -> &str {
        &self.table.name
    }

    pub fn primary_key(&self) -> &str {
        &self.table.primary_key
    }

    /// Declares a `has_one` relation named after the target table.
    pub fn has_one(&mut self, target: &TableBuilder) -> Result<&mut Self> {
        self.relate(target.name(), target.primary_key(), None, RelationKind::HasOne)
    }

    /// Declares a `has_one` relation under a custom alias.
    pub fn has_one_as(&mut self, target: &TableBuilder, alias: &str) -> Result<&mut Self> {
        self.relate(
            target.name(),
            target.primary_key(),
            Some(alias),
            RelationKind::HasOne,
        )
    }

    /// Declares a `has_many` relation named after the target table.
    pub fn has_many(&mut self, target: &TableBuilder) -> Result<&mut Self> {
        self.relate(target.name(), target.primary_key(), None, RelationKind::HasMany)
    }

    /// Declares a `has_many` relation under a custom alias.
    pub fn has_many_as(&mut self, target: &TableBuilder, alias: &str) -> Result<&mut Self> {
        self.relate(
            target.name(),
            target.primary_key(),
            Some(alias),
            RelationKind::HasMany,
        )
    }

    pub(super) fn relate(
        &mut self,
        target: &str,
        target_primary_key: &str,
        alias: Option<&str>,
        kind: RelationKind,
    ) -> Result<&mut Self> {
        let alias = alias.unwrap_or(target);
        let table = &mut self.table;

        if table.relations.contains_key(alias) {
            return Err(Error::invalid_schema(format!(
                "relation `{}::{}` is already declared",
                table.name, alias
            )));
        }

        // A second relation to a table keyed by this table's name would hold
        // the same foreign key as the first one.
        if let Some((existing, relation)) = table
            .relations
            .iter()
            .find(|(_, relation)| relation.target == target)
        {
            if relation.target_primary_key == target_primary_key && target_primary_key == table.name
            {
                return Err(Error::invalid_schema(format!(
                    "`{target}` is already related to `{}` as `{existing}` through primary key \
                     `{target_primary_key}`; `{}::{alias}` would share that key, so the two \
                     relations could not be told apart",
                    table.name, table.name,
                )));
            }
        }

        // The alias replaces a scalar field of the same name.
        table.fields.shift_remove(alias);
        table.relations.insert(
            alias.to_string(),
            Relation {
                target: target.to_string(),
                target_primary_key: target_primary_key.to_string(),
                kind,
            },
        );

        Ok(self)
    }

    pub(super) fn build(&self) -> Table {
        self.table.clone()
    }
}
