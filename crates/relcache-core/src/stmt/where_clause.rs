use super::{Join, Record, Value};
use crate::{Error, Result};

use indexmap::IndexMap;

/// The `where` argument of a query: one clause or a list of clauses.
///
/// A list is deduplicated by primary key and resolved entry by entry; the
/// result is always a list.
#[derive(Debug, Clone)]
pub enum Where {
    One(WhereClause),
    List(Vec<WhereClause>),
}

/// A where-clause tree mirroring the shape of a table.
///
/// Keys are field names of the queried table: the primary key, a scalar
/// field (equality condition), a relation alias (a nested clause for the
/// target table, or a plain value meaning "equals this foreign key") or any
/// field carrying a [`Join`] marker.
#[derive(Debug, Clone, Default)]
pub struct WhereClause {
    entries: IndexMap<String, WhereValue>,
}

/// The value side of one where-clause entry.
#[derive(Debug, Clone)]
pub enum WhereValue {
    /// A plain JSON value, compared for equality.
    Value(Value),

    /// A nested clause applied to a related table.
    Clause(WhereClause),

    /// Several nested clauses applied to a `has_many` relation.
    List(Vec<WhereClause>),

    /// A join marker.
    Join(Join),
}

impl Where {
    pub fn is_list(&self) -> bool {
        matches!(self, Where::List(_))
    }
}

impl WhereClause {
    pub fn new() -> WhereClause {
        WhereClause::default()
    }

    /// Builds a clause from a JSON object, e.g. a payload that was just
    /// normalized. Nested objects become nested clauses and arrays of objects
    /// become clause lists.
    pub fn from_record(record: Record) -> WhereClause {
        WhereClause {
            entries: record
                .into_iter()
                .map(|(field, value)| (field, WhereValue::from(value)))
                .collect(),
        }
    }

    /// Adds an equality condition (or a primary key, or a foreign key).
    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> WhereClause {
        self.with(field, WhereValue::Value(value.into()))
    }

    /// Adds a nested clause for the relation `field`.
    pub fn relation(self, field: impl Into<String>, clause: impl Into<WhereValue>) -> WhereClause {
        self.with(field, clause)
    }

    /// Marks `field` with a join.
    pub fn join(self, field: impl Into<String>, join: Join) -> WhereClause {
        self.with(field, WhereValue::Join(join))
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<WhereValue>) -> WhereClause {
        self.insert(field, value);
        self
    }

    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<WhereValue>,
    ) -> Option<WhereValue> {
        self.entries.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&WhereValue> {
        self.entries.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WhereValue)> + '_ {
        self.entries
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The clause as plain JSON, or `None` if it holds a join marker.
    pub fn to_value(&self) -> Option<Value> {
        self.entries
            .iter()
            .map(|(field, value)| Some((field.clone(), value.to_value()?)))
            .collect::<Option<Record>>()
            .map(Value::Object)
    }
}

impl WhereValue {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            WhereValue::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_clause(&self) -> Option<&WhereClause> {
        match self {
            WhereValue::Clause(clause) => Some(clause),
            _ => None,
        }
    }

    pub fn as_join(&self) -> Option<&Join> {
        match self {
            WhereValue::Join(join) => Some(join),
            _ => None,
        }
    }

    pub fn is_join(&self) -> bool {
        matches!(self, WhereValue::Join(_))
    }

    /// The entry as plain JSON, or `None` if it holds a join marker.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            WhereValue::Value(value) => Some(value.clone()),
            WhereValue::Clause(clause) => clause.to_value(),
            WhereValue::List(clauses) => clauses
                .iter()
                .map(WhereClause::to_value)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            WhereValue::Join(_) => None,
        }
    }
}

impl From<Value> for WhereValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(record) => WhereValue::Clause(WhereClause::from_record(record)),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                WhereValue::List(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            Value::Object(record) => Some(WhereClause::from_record(record)),
                            _ => None,
                        })
                        .collect(),
                )
            }
            value => WhereValue::Value(value),
        }
    }
}

impl From<WhereClause> for WhereValue {
    fn from(value: WhereClause) -> Self {
        WhereValue::Clause(value)
    }
}

impl From<Vec<WhereClause>> for WhereValue {
    fn from(value: Vec<WhereClause>) -> Self {
        WhereValue::List(value)
    }
}

impl From<Join> for WhereValue {
    fn from(value: Join) -> Self {
        WhereValue::Join(value)
    }
}

impl From<WhereClause> for Where {
    fn from(value: WhereClause) -> Self {
        Where::One(value)
    }
}

impl From<Vec<WhereClause>> for Where {
    fn from(value: Vec<WhereClause>) -> Self {
        Where::List(value)
    }
}

impl From<Record> for WhereClause {
    fn from(value: Record) -> Self {
        WhereClause::from_record(value)
    }
}

impl TryFrom<Value> for WhereClause {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(record) => Ok(WhereClause::from_record(record)),
            other => Err(Error::invalid_query(format!(
                "a where-clause must be an object; got `{other}`"
            ))),
        }
    }
}

impl TryFrom<Value> for Where {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Where::List(
                items
                    .into_iter()
                    .map(WhereClause::try_from)
                    .collect::<Result<_>>()?,
            )),
            value => Ok(Where::One(WhereClause::try_from(value)?)),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, WhereValue)> for WhereClause {
    fn from_iter<T: IntoIterator<Item = (K, WhereValue)>>(iter: T) -> Self {
        WhereClause {
            entries: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value))
                .collect(),
        }
    }
}
