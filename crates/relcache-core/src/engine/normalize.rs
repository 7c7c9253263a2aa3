use crate::schema::{Model, Relation, RelationKind, Table};
use crate::stmt::{Key, Record, Value};
use crate::{Cache, Error, Result};

/// Merges `payload` into a copy of `cache` and returns the new cache.
///
/// `payload` is one object or an array of objects conforming to `table`.
/// Each object is folded in order: its fields overwrite the cached record
/// with the same primary key, fields it does not carry are kept. Nested
/// related objects are normalized into their own tables and replaced by their
/// primary key (`has_one`) or list of primary keys (`has_many`).
///
/// On error the returned cache is discarded and `cache` is left as it was.
pub fn normalize(model: &Model, cache: &Cache, table: &str, payload: &Value) -> Result<Cache> {
    let Some(table) = model.table(table) else {
        return Err(Error::normalization(format!(
            "table `{table}` does not exist in the model"
        )));
    };

    log::debug!(
        "normalize `{}`; objects={}",
        table.name,
        payload.as_array().map(Vec::len).unwrap_or(1)
    );

    let mut next = cache.clone();
    Normalize { model }.payload(&mut next, table, payload)?;
    Ok(next)
}

struct Normalize<'a> {
    model: &'a Model,
}

impl Normalize<'_> {
    fn payload(&self, cache: &mut Cache, table: &Table, payload: &Value) -> Result<()> {
        match payload {
            Value::Array(items) => {
                for item in items {
                    self.object(cache, table, item)?;
                }
            }
            _ => {
                self.object(cache, table, payload)?;
            }
        }

        Ok(())
    }

    /// Normalizes one object into `table` and returns its primary key.
    fn object(&self, cache: &mut Cache, table: &Table, payload: &Value) -> Result<Key> {
        let Value::Object(fields) = payload else {
            return Err(Error::normalization(format!(
                "expected an object for table `{}`; got `{payload}`",
                table.name
            )));
        };

        let key = self.primary_key(table, fields)?;

        // Nested payloads are written first so the merge below starts from
        // whatever they left in the cache for this key.
        let mut incoming = Vec::with_capacity(fields.len());
        for (field, value) in fields {
            let value = match table.relation(field) {
                Some(relation) => self.relation(cache, table, field, relation, value)?,
                None => {
                    if let Some(kind) = table.field(field) {
                        if !kind.matches(value) {
                            log::debug!(
                                "`{}::{}` is declared as {} but holds `{}`",
                                table.name,
                                field,
                                kind.as_str(),
                                value
                            );
                        }
                    }
                    value.clone()
                }
            };
            incoming.push((field.clone(), value));
        }

        let rows = cache.rows_mut(&table.name);
        let record = rows.entry(key.clone()).or_default();
        for (field, value) in incoming {
            record.insert(field, value);
        }

        log::trace!("merged `{}` {}", table.name, key);

        Ok(key)
    }

    /// Normalizes a relation field's payload and returns what the record
    /// stores in its place.
    fn relation(
        &self,
        cache: &mut Cache,
        table: &Table,
        field: &str,
        relation: &Relation,
        value: &Value,
    ) -> Result<Value> {
        let target = relation.target(self.model);

        match (relation.kind, value) {
            (RelationKind::HasOne, Value::Object(_)) => {
                Ok(self.object(cache, target, value)?.to_value())
            }
            (RelationKind::HasMany, Value::Array(items)) => {
                let mut keys = Vec::with_capacity(items.len());
                for item in items {
                    if item.is_object() {
                        keys.push(self.object(cache, target, item)?.to_value());
                    } else {
                        // Already a foreign key.
                        keys.push(item.clone());
                    }
                }
                Ok(Value::Array(keys))
            }
            (RelationKind::HasOne, Value::Array(_)) => Err(Error::normalization(format!(
                "`{field}` under `{}` was an array, expected an object. Did you mean to use has_many?",
                table.name
            ))),
            (RelationKind::HasMany, Value::Object(_)) => Err(Error::normalization(format!(
                "`{field}` under `{}` was an object, expected an array. Did you mean to use has_one?",
                table.name
            ))),
            // A bare foreign key (or null) is stored as given.
            _ => Ok(value.clone()),
        }
    }

    /// Resolves the primary key of a payload object. When the key field is a
    /// relation holding a nested object, the nested object's own key is used.
    fn primary_key(&self, table: &Table, fields: &Record) -> Result<Key> {
        let Some(value) = fields.get(&table.primary_key) else {
            return Err(Error::normalization(format!(
                "expected the table `{}` to have a field `{}`; the fields found were [{}]. \
                 The payload was not what the model expected",
                table.name,
                table.primary_key,
                fields.keys().map(String::as_str).collect::<Vec<_>>().join(", "),
            )));
        };

        if let (Some(relation), Value::Object(nested)) = (table.primary_key_relation(), value) {
            return self.primary_key(relation.target(self.model), nested);
        }

        Key::from_value(value).ok_or_else(|| {
            Error::normalization(format!(
                "primary key `{}` of table `{}` must be a string, integer or boolean; got `{value}`",
                table.primary_key, table.name
            ))
        })
    }
}
