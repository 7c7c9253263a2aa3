use super::{Record, Value};

/// A denormalized query result.
///
/// A lookup by primary key yields a single record; a scan by condition, a
/// join-only query or a where-clause list yields a list. "Not found" is not a
/// `Resolved` at all: the resolver returns `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    One(Record),
    Many(Vec<Record>),
}

impl Resolved {
    pub fn is_one(&self) -> bool {
        matches!(self, Resolved::One(_))
    }

    pub fn as_one(&self) -> Option<&Record> {
        match self {
            Resolved::One(record) => Some(record),
            Resolved::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Record]> {
        match self {
            Resolved::One(_) => None,
            Resolved::Many(records) => Some(records),
        }
    }

    #[track_caller]
    pub fn expect_one(self) -> Record {
        match self {
            Resolved::One(record) => record,
            Resolved::Many(records) => {
                panic!("expected a single record; got a list of {}", records.len())
            }
        }
    }

    #[track_caller]
    pub fn expect_many(self) -> Vec<Record> {
        match self {
            Resolved::Many(records) => records,
            Resolved::One(record) => panic!("expected a list; got a single record {record:?}"),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        match self {
            Resolved::One(_) => 1,
            Resolved::Many(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_value(self) -> Value {
        match self {
            Resolved::One(record) => Value::Object(record),
            Resolved::Many(records) => Value::Array(records.into_iter().map(Value::Object).collect()),
        }
    }
}

impl From<Resolved> for Value {
    fn from(value: Resolved) -> Self {
        value.into_value()
    }
}
