use crate::schema::Model;
use crate::stmt::{Key, Record};

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

/// Records of one table, keyed by primary key in insertion order.
pub type Rows = IndexMap<Key, Record>;

/// The normalized store: table name to records keyed by primary key.
///
/// Every table sits behind an `Arc` and is copied on first write, so cloning a
/// cache is cheap and a snapshot handed to a reader never changes underneath
/// it. Writers produce a new `Cache` and replace the old one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cache {
    tables: IndexMap<String, Arc<Rows>>,
}

impl Cache {
    /// Creates a cache holding one empty table per table of `model`.
    pub fn new(model: &Model) -> Cache {
        Cache {
            tables: model
                .tables()
                .map(|table| (table.name.clone(), Arc::new(Rows::new())))
                .collect(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&Rows> {
        self.tables.get(name).map(|rows| &**rows)
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &Rows)> + '_ {
        self.tables
            .iter()
            .map(|(name, rows)| (name.as_str(), &**rows))
    }

    pub fn record(&self, table: &str, key: &Key) -> Option<&Record> {
        self.tables.get(table)?.get(key)
    }

    /// Total number of records across all tables.
    pub fn len(&self) -> usize {
        self.tables.values().map(|rows| rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if both caches share the storage of `table`, i.e. the
    /// table was not written between the two snapshots.
    pub fn shares_table(&self, other: &Cache, table: &str) -> bool {
        match (self.tables.get(table), other.tables.get(table)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Empties every table, keeping the table set.
    pub fn purge(&mut self) {
        for rows in self.tables.values_mut() {
            *rows = Arc::new(Rows::new());
        }
    }

    /// Mutable access to a table's rows, creating the table if needed. The
    /// rows are copied if another snapshot still shares them.
    pub(crate) fn rows_mut(&mut self, table: &str) -> &mut Rows {
        if !self.tables.contains_key(table) {
            self.tables.insert(table.to_string(), Arc::default());
        }

        Arc::make_mut(&mut self.tables[table])
    }
}

impl Serialize for Cache {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for (name, rows) in &self.tables {
            map.serialize_entry(name, &**rows)?;
        }
        map.end()
    }
}
