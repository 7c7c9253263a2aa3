//! Values and where-clause statements understood by the engine.

mod join;
pub use join::{join, join_on, Join};

mod key;
pub use key::Key;

mod resolved;
pub use resolved::Resolved;

mod selection;
pub use selection::FieldSelection;

mod where_clause;
pub use where_clause::{Where, WhereClause, WhereValue};

pub use serde_json::Value;

/// A flat record: field name to value. Relation fields hold foreign keys once
/// a record is normalized.
pub type Record = serde_json::Map<String, Value>;
