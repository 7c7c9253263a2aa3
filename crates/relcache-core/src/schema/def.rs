use super::{FieldPrimitive, Model, RelationKind, TableBuilder, TableOptions};
use crate::{Error, Result};

use indexmap::IndexMap;
use serde::Deserialize;

/// A declarative model definition.
///
/// ```json
/// {
///   "tables": [
///     { "name": "user", "fields": { "id": "number", "username": "string" },
///       "has_one": [{ "target": "token" }] },
///     { "name": "token", "fields": { "token": "string" }, "primary_key": "user",
///       "has_one": [{ "target": "user" }] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDef {
    pub tables: Vec<TableDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDef {
    pub name: String,

    #[serde(default)]
    pub fields: IndexMap<String, FieldPrimitive>,

    #[serde(default)]
    pub primary_key: Option<String>,

    #[serde(default)]
    pub has_one: Vec<RelationDef>,

    #[serde(default)]
    pub has_many: Vec<RelationDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationDef {
    pub target: String,

    #[serde(default, rename = "as")]
    pub alias: Option<String>,
}

impl ModelDef {
    pub(super) fn build(&self) -> Result<Model> {
        let mut builders: IndexMap<&str, TableBuilder> = IndexMap::new();

        for table in &self.tables {
            let builder = super::create_table(
                table.name.clone(),
                table.fields.iter().map(|(field, kind)| (field.clone(), *kind)),
                TableOptions {
                    primary_key: table.primary_key.clone(),
                },
            );
            if builders.insert(&table.name, builder).is_some() {
                return Err(Error::invalid_schema(format!(
                    "table `{}` is defined more than once",
                    table.name
                )));
            }
        }

        for table in &self.tables {
            let relations = table
                .has_one
                .iter()
                .map(|def| (def, RelationKind::HasOne))
                .chain(table.has_many.iter().map(|def| (def, RelationKind::HasMany)));

            for (def, kind) in relations {
                let Some(target) = builders.get(def.target.as_str()) else {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}::{}` references table `{}`, which is not defined",
                        table.name,
                        def.alias.as_deref().unwrap_or(&def.target),
                        def.target,
                    )));
                };
                let target_primary_key = target.primary_key().to_string();

                builders[table.name.as_str()].relate(
                    &def.target,
                    &target_primary_key,
                    def.alias.as_deref(),
                    kind,
                )?;
            }
        }

        Model::new(builders.values().map(TableBuilder::build))
    }
}
