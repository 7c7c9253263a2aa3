use super::Record;

use indexmap::IndexMap;

/// Field-selection map: table name (or relation alias) to the fields kept in
/// resolved output. Tables without an entry are returned unpruned.
#[derive(Debug, Clone, Default)]
pub struct FieldSelection {
    tables: IndexMap<String, Vec<String>>,
}

impl FieldSelection {
    pub fn new() -> FieldSelection {
        FieldSelection::default()
    }

    pub fn select<I, S>(mut self, table: impl Into<String>, fields: I) -> FieldSelection
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .insert(table.into(), fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn get(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    /// Returns the selection for the first of `keys` that has one.
    pub fn lookup<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Option<&[String]> {
        keys.into_iter().find_map(|key| self.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Drops every field of `record` not listed in `fields`.
    pub(crate) fn prune(record: &mut Record, fields: &[String]) {
        record.retain(|field, _| fields.iter().any(|selected| selected == field));
    }
}

impl<K, I, S> FromIterator<(K, I)> for FieldSelection
where
    K: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(FieldSelection::new(), |selection, (table, fields)| {
                selection.select(table, fields)
            })
    }
}
