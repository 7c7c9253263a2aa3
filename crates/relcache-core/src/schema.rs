//! Schema registry: tables, their fields and the relations between them.

mod builder;
pub use builder::{create_table, TableBuilder, TableOptions};

mod def;
pub use def::{ModelDef, RelationDef, TableDef};

mod field;
pub use field::FieldPrimitive;

mod relation;
pub use relation::{Relation, RelationKind};

mod table;
pub use table::Table;

mod verify;

use crate::{Error, Result};
use indexmap::IndexMap;

/// The assembled, immutable set of tables.
///
/// Built once with [`create_model`] (or [`Model::from_def`]) and shared by
/// reference with every `normalize` and `get` call.
#[derive(Debug, Clone, Default)]
pub struct Model {
    tables: IndexMap<String, Table>,
}

/// Assembles a model from table builders, verifying that every table has a
/// resolvable primary key and that every relation targets a registered table.
pub fn create_model<'a>(tables: impl IntoIterator<Item = &'a TableBuilder>) -> Result<Model> {
    Model::new(tables.into_iter().map(TableBuilder::build))
}

impl Model {
    pub fn new(tables: impl IntoIterator<Item = Table>) -> Result<Model> {
        let mut model = Model::default();

        for table in tables {
            if model.tables.contains_key(&table.name) {
                return Err(Error::invalid_schema(format!(
                    "table `{}` is registered more than once",
                    table.name
                )));
            }

            model.tables.insert(table.name.clone(), table);
        }

        model.verify()?;

        log::debug!("assembled model with {} tables", model.tables.len());

        Ok(model)
    }

    /// Loads a model from a declarative definition.
    pub fn from_def(def: &ModelDef) -> Result<Model> {
        def.build()
    }

    /// Loads a model from a JSON document shaped like [`ModelDef`].
    pub fn from_json(src: &str) -> Result<Model> {
        let def: ModelDef = serde_json::from_str(src)?;
        Model::from_def(&def)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Get a table by name, panicking if it does not exist.
    #[track_caller]
    pub fn expect_table(&self, name: &str) -> &Table {
        match self.tables.get(name) {
            Some(table) => table,
            None => panic!("no table named `{name}` in the model"),
        }
    }

    pub fn tables(&self) -> impl ExactSizeIterator<Item = &Table> + '_ {
        self.tables.values()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
