use super::clean::{resolve_key, CleanWhere, PrimaryKey, RelationClause};
use crate::schema::{Model, Relation, RelationKind, Table};
use crate::stmt::{FieldSelection, Key, Record, Resolved, Value, Where, WhereClause, WhereValue};
use crate::{Cache, Error, Result};

use std::borrow::Cow;
use std::collections::HashSet;

/// Reads a denormalized view of `table` out of `cache`.
///
/// Returns `Ok(None)` when a primary-key lookup misses or a join rejects the
/// single matching record. A scan by condition, a join over the whole table
/// or a where-clause list always returns `Resolved::Many`, possibly empty.
///
/// Relations named by the where-clause are resolved with the nested clause;
/// every other relation field is expanded from its stored foreign key(s).
/// Within one top-level result each `(table, key)` is expanded at most once;
/// any later reference to it is left as a key. Cyclic schemas (`user` has one
/// `token`, `token` has one `user`) therefore terminate, and the output of a
/// result never holds more records than the cache.
pub fn get(
    model: &Model,
    cache: &Cache,
    table: &str,
    filter: &Where,
    fields: Option<&FieldSelection>,
) -> Result<Option<Resolved>> {
    let Some(table) = model.table(table) else {
        return Err(Error::invalid_query(format!(
            "table `{table}` does not exist in the model"
        )));
    };

    log::debug!("get `{}`; list={}", table.name, filter.is_list());

    let resolve = Resolve {
        model,
        cache,
        fields,
    };
    let mut visited = Visited::default();

    match filter {
        Where::One(clause) => {
            let clean = CleanWhere::new(model, table, clause)?;
            resolve.clause(&clean, None, &mut visited)
        }
        Where::List(clauses) => {
            let mut records = vec![];

            for clause in unique_by_key(model, table, clauses)? {
                let clean = CleanWhere::new(model, table, clause)?;
                match resolve.clause(&clean, None, &mut visited)? {
                    Some(Resolved::One(record)) => records.push(record),
                    Some(Resolved::Many(found)) => records.extend(found),
                    None => {}
                }
            }

            Ok(Some(Resolved::Many(records)))
        }
    }
}

/// Drops list entries whose primary key was already seen, keeping the first
/// occurrence.
fn unique_by_key<'a>(
    model: &Model,
    table: &Table,
    clauses: &'a [WhereClause],
) -> Result<Vec<&'a WhereClause>> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(clauses.len());

    for (i, clause) in clauses.iter().enumerate() {
        let key = match clause.get(&table.primary_key) {
            Some(WhereValue::Join(_)) => None,
            Some(_) => resolve_key(model, table, clause),
            None => {
                return Err(Error::invalid_query(format!(
                    "entry {i} of a where-clause list on `{}` has no primary key `{}`; \
                     list entries are deduplicated by primary key",
                    table.name, table.primary_key
                )))
            }
        };

        let Some(key) = key else {
            return Err(Error::invalid_query(format!(
                "entry {i} of a where-clause list on `{}` has a primary key `{}` that is not a key value",
                table.name, table.primary_key
            )));
        };

        if seen.insert(key) {
            unique.push(clause);
        }
    }

    Ok(unique)
}

struct Resolve<'a> {
    model: &'a Model,
    cache: &'a Cache,
    fields: Option<&'a FieldSelection>,
}

/// The relation a nested clause is resolved through.
#[derive(Clone, Copy)]
struct Parent<'a> {
    alias: &'a str,

    /// The parent record's own value of the relation field: a foreign key or
    /// a list of foreign keys.
    value: &'a Value,

    kind: RelationKind,
}

/// Records already expanded into the current top-level result.
#[derive(Default)]
struct Visited {
    records: HashSet<(String, Key)>,
}

enum Candidates {
    One(Option<(Key, Record)>),
    Many(Vec<(Key, Record)>),
}

/// Outcome of expanding one stored foreign key.
enum Expanded {
    Record(Record),

    /// Already expanded elsewhere in this result.
    Visited,

    /// Not a key, or no cached record for it.
    Missing,
}

impl Resolve<'_> {
    fn clause(
        &self,
        clean: &CleanWhere<'_>,
        parent: Option<Parent<'_>>,
        visited: &mut Visited,
    ) -> Result<Option<Resolved>> {
        let alias = parent.map(|parent| parent.alias);
        let top_level = parent.is_none();

        log::trace!(
            "resolve `{}`; by_key={} conditions={} relations={} joins={}",
            clean.table.name,
            clean.has_primary_key(),
            clean.conditions.len(),
            clean.relations.len(),
            clean.joins.len()
        );

        match self.candidates(clean, parent) {
            Candidates::One(None) => {
                log::trace!("`{}`: no record matched", clean.table.name);
                Ok(None)
            }
            Candidates::One(Some((key, record))) => {
                if top_level {
                    visited.clear();
                }
                Ok(self.finish(clean, key, record, alias, visited)?.map(Resolved::One))
            }
            Candidates::Many(candidates) => {
                let mut records = Vec::with_capacity(candidates.len());
                for (key, record) in candidates {
                    // Every top-level record is a result of its own.
                    if top_level {
                        visited.clear();
                    }
                    if let Some(record) = self.finish(clean, key, record, alias, visited)? {
                        records.push(record);
                    }
                }
                Ok(Some(Resolved::Many(records)))
            }
        }
    }

    /// Primary-key and conditions stages.
    fn candidates(&self, clean: &CleanWhere<'_>, parent: Option<Parent<'_>>) -> Candidates {
        let table = clean.table;

        match (&clean.primary_key, parent) {
            (Some(PrimaryKey::Key(key)), _) => Candidates::One(self.lookup(table, key)),
            (Some(PrimaryKey::Unmatchable), _) => Candidates::One(None),
            (Some(PrimaryKey::Join(join)), Some(parent)) => {
                let accept = |(key, record): &(Key, Record)| {
                    let value = record
                        .get(&table.primary_key)
                        .cloned()
                        .unwrap_or_else(|| key.to_value());
                    join.matches(&value, record)
                };

                match self.referenced(table, parent) {
                    Candidates::One(found) => Candidates::One(found.filter(|found| accept(found))),
                    Candidates::Many(found) => {
                        Candidates::Many(found.into_iter().filter(|found| accept(found)).collect())
                    }
                }
            }
            (Some(PrimaryKey::Join(join)), None) => Candidates::Many(
                self.scan(table, |key, record| {
                    let value = record
                        .get(&table.primary_key)
                        .cloned()
                        .unwrap_or_else(|| key.to_value());
                    join.matches(&value, record)
                }),
            ),
            (None, Some(parent)) => match self.referenced(table, parent) {
                Candidates::One(found) => Candidates::One(
                    found.filter(|(_, record)| matches_conditions(record, &clean.conditions)),
                ),
                Candidates::Many(found) => Candidates::Many(
                    found
                        .into_iter()
                        .filter(|(_, record)| matches_conditions(record, &clean.conditions))
                        .collect(),
                ),
            },
            (None, None) => Candidates::Many(
                self.scan(table, |_, record| matches_conditions(record, &clean.conditions)),
            ),
        }
    }

    /// Relations, joins, automatic expansion and projection for one record.
    /// Returns `None` when a join rejects the record.
    fn finish(
        &self,
        clean: &CleanWhere<'_>,
        key: Key,
        mut record: Record,
        alias: Option<&str>,
        visited: &mut Visited,
    ) -> Result<Option<Record>> {
        let table = clean.table;
        visited.insert(&table.name, key);

        if !self.finish_entered(clean, &mut record, visited)? {
            return Ok(None);
        }

        self.project(table, alias, &mut record);
        Ok(Some(record))
    }

    fn finish_entered(
        &self,
        clean: &CleanWhere<'_>,
        record: &mut Record,
        visited: &mut Visited,
    ) -> Result<bool> {
        let table = clean.table;

        // Relations
        for relation in &clean.relations {
            let parent_value = record.get(relation.alias).cloned().unwrap_or(Value::Null);
            let parent = Parent {
                alias: relation.alias,
                value: &parent_value,
                kind: relation.relation.kind,
            };

            let value = match &relation.clause {
                RelationClause::One(nested) => {
                    let resolved = self.clause(nested, Some(parent), visited)?;
                    relation_value(relation.relation.kind, resolved)
                }
                RelationClause::List(nested) => {
                    let mut values = vec![];
                    for nested in nested {
                        match self.clause(nested, Some(parent), visited)? {
                            Some(Resolved::One(found)) => values.push(Value::Object(found)),
                            Some(Resolved::Many(found)) => {
                                values.extend(found.into_iter().map(Value::Object))
                            }
                            None => {}
                        }
                    }
                    Value::Array(values)
                }
            };

            record.insert(relation.alias.to_string(), value);
        }

        // Joins
        for (field, join) in &clean.joins {
            match table.relation(field) {
                Some(relation) => {
                    let stored = record.get(*field).cloned().unwrap_or(Value::Null);
                    let joined = self.joined(relation, field, &stored, visited);
                    let empty = empty_value(relation.kind);

                    if !join.matches(joined.as_ref().unwrap_or(&empty), record) {
                        log::trace!("`{}::{}`: join rejected record", table.name, field);
                        return Ok(false);
                    }

                    record.insert(field.to_string(), joined.unwrap_or(stored));
                }
                None => {
                    let value = record.get(*field).unwrap_or(&Value::Null);

                    if !join.matches(value, record) {
                        log::trace!("`{}::{}`: join rejected record", table.name, field);
                        return Ok(false);
                    }
                }
            }
        }

        // Every relation the clause did not mention is expanded from its keys.
        for (alias, relation) in table.relations() {
            let mentioned = clean.relations.iter().any(|r| r.alias == alias)
                || clean.joins.iter().any(|(field, _)| *field == alias);

            if mentioned {
                continue;
            }

            if let Some(stored) = record.get(alias) {
                let value = self.related(relation, alias, stored, visited);
                record.insert(alias.to_string(), value);
            }
        }

        Ok(true)
    }

    /// The related record(s) a join on a relation field is tested against.
    ///
    /// Records are read from the cache even if they were already expanded
    /// into this result; only their own relations are subject to the
    /// once-per-result rule. Returns `None` when nothing resolves.
    fn joined(
        &self,
        relation: &Relation,
        alias: &str,
        stored: &Value,
        visited: &mut Visited,
    ) -> Option<Value> {
        let target = relation.target(self.model);

        match relation.kind {
            RelationKind::HasOne => match self.expand(target, alias, stored, visited, false) {
                Expanded::Record(record) => Some(Value::Object(record)),
                Expanded::Visited | Expanded::Missing => None,
            },
            RelationKind::HasMany => {
                let Value::Array(keys) = stored else {
                    return None;
                };

                let mut values = Vec::with_capacity(keys.len());
                for stored in keys {
                    if let Expanded::Record(record) =
                        self.expand(target, alias, stored, visited, false)
                    {
                        values.push(Value::Object(record));
                    }
                }
                Some(Value::Array(values))
            }
        }
    }

    /// The denormalized value of an unmentioned relation field holding
    /// `stored`. Keys with no cached record, and records already expanded
    /// into this result, stay as keys; a `has_many` list drops keys that do
    /// not resolve.
    fn related(
        &self,
        relation: &Relation,
        alias: &str,
        stored: &Value,
        visited: &mut Visited,
    ) -> Value {
        let target = relation.target(self.model);

        match relation.kind {
            RelationKind::HasOne => match self.expand(target, alias, stored, visited, true) {
                Expanded::Record(record) => Value::Object(record),
                Expanded::Visited | Expanded::Missing => stored.clone(),
            },
            RelationKind::HasMany => {
                let Value::Array(keys) = stored else {
                    return stored.clone();
                };

                let mut values = Vec::with_capacity(keys.len());
                for stored in keys {
                    match self.expand(target, alias, stored, visited, true) {
                        Expanded::Record(record) => values.push(Value::Object(record)),
                        Expanded::Visited => values.push(stored.clone()),
                        Expanded::Missing => {}
                    }
                }
                Value::Array(values)
            }
        }
    }

    /// Looks up the record keyed by `stored` and expands its relations. With
    /// `once`, a record already expanded into this result is not expanded
    /// again.
    fn expand(
        &self,
        table: &Table,
        alias: &str,
        stored: &Value,
        visited: &mut Visited,
        once: bool,
    ) -> Expanded {
        let Some(key) = Key::from_value(stored) else {
            return Expanded::Missing;
        };

        if once && visited.contains(&table.name, &key) {
            return Expanded::Visited;
        }

        let Some(record) = self.cache.record(&table.name, &key) else {
            return Expanded::Missing;
        };
        let mut record = record.clone();

        visited.insert(&table.name, key);
        for (alias, relation) in table.relations() {
            if let Some(stored) = record.get(alias) {
                let value = self.related(relation, alias, stored, visited);
                record.insert(alias.to_string(), value);
            }
        }

        self.project(table, Some(alias), &mut record);
        Expanded::Record(record)
    }

    fn lookup(&self, table: &Table, key: &Key) -> Option<(Key, Record)> {
        self.cache
            .record(&table.name, key)
            .map(|record| (key.clone(), record.clone()))
    }

    /// Records referenced by the parent's relation field.
    fn referenced(&self, table: &Table, parent: Parent<'_>) -> Candidates {
        match parent.kind {
            RelationKind::HasOne => Candidates::One(
                Key::from_value(parent.value).and_then(|key| self.lookup(table, &key)),
            ),
            RelationKind::HasMany => Candidates::Many(
                parent
                    .value
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(Key::from_value)
                    .filter_map(|key| self.lookup(table, &key))
                    .collect(),
            ),
        }
    }

    fn scan(&self, table: &Table, mut f: impl FnMut(&Key, &Record) -> bool) -> Vec<(Key, Record)> {
        self.cache
            .table(&table.name)
            .into_iter()
            .flatten()
            .filter(|(key, record)| f(*key, *record))
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect()
    }

    /// Projection stage. Nested results are looked up by relation alias first.
    fn project(&self, table: &Table, alias: Option<&str>, record: &mut Record) {
        let Some(fields) = self.fields else {
            return;
        };

        if let Some(selected) = fields.lookup(alias.into_iter().chain([table.name.as_str()])) {
            FieldSelection::prune(record, selected);
        }
    }
}

impl Visited {
    fn insert(&mut self, table: &str, key: Key) {
        self.records.insert((table.to_string(), key));
    }

    fn contains(&self, table: &str, key: &Key) -> bool {
        self.records.contains(&(table.to_string(), key.clone()))
    }

    fn clear(&mut self) {
        self.records.clear();
    }
}

fn matches_conditions(record: &Record, conditions: &[(&str, Cow<'_, Value>)]) -> bool {
    conditions
        .iter()
        .all(|(field, value)| record.get(*field).unwrap_or(&Value::Null) == value.as_ref())
}

/// What a relation field reads as when nothing it references resolves.
fn empty_value(kind: RelationKind) -> Value {
    match kind {
        RelationKind::HasOne => Value::Null,
        RelationKind::HasMany => Value::Array(vec![]),
    }
}

/// Shapes a nested result for the relation field it replaces.
fn relation_value(kind: RelationKind, resolved: Option<Resolved>) -> Value {
    match (kind, resolved) {
        (_, None) => empty_value(kind),
        (RelationKind::HasOne, Some(Resolved::One(record))) => Value::Object(record),
        (RelationKind::HasMany, Some(Resolved::One(record))) => {
            Value::Array(vec![Value::Object(record)])
        }
        (_, Some(Resolved::Many(records))) => {
            Value::Array(records.into_iter().map(Value::Object).collect())
        }
    }
}
