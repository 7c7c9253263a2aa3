use super::{Record, Value};

use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(&Value, &Record) -> bool + Send + Sync;

/// A join marker placed in a where-clause.
///
/// The marked field is attached to the result only when the predicate accepts
/// `(value, record)`, where `value` is the field's value (the related
/// record(s) for a relation field) and `record` the record being resolved. A
/// rejected record is dropped from the result. A join without a predicate is a
/// wildcard and always passes.
#[derive(Clone)]
pub struct Join {
    on: Option<Arc<Predicate>>,
}

impl Join {
    /// A wildcard join that includes the field unconditionally.
    pub fn any() -> Join {
        Join { on: None }
    }

    /// A join that includes the field when `predicate` returns `true`.
    pub fn on<F>(predicate: F) -> Join
    where
        F: Fn(&Value, &Record) -> bool + Send + Sync + 'static,
    {
        Join {
            on: Some(Arc::new(predicate)),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.on.is_none()
    }

    pub fn matches(&self, value: &Value, record: &Record) -> bool {
        match &self.on {
            Some(on) => on(value, record),
            None => true,
        }
    }
}

impl Default for Join {
    fn default() -> Self {
        Join::any()
    }
}

impl fmt::Debug for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            f.write_str("Join(*)")
        } else {
            f.write_str("Join(on)")
        }
    }
}

/// Wildcard join marker.
pub fn join() -> Join {
    Join::any()
}

/// Join marker filtering on `predicate`.
pub fn join_on<F>(predicate: F) -> Join
where
    F: Fn(&Value, &Record) -> bool + Send + Sync + 'static,
{
    Join::on(predicate)
}
