mod store;
pub use store::Store;

pub use relcache_core::{
    bail, err, get, normalize,
    schema::{self, create_model, create_table, FieldPrimitive, Model, TableOptions},
    stmt::{
        self, join, join_on, FieldSelection, Join, Key, Record, Resolved, Value, Where, WhereClause,
        WhereValue,
    },
    Cache, Error, Result, Rows,
};
