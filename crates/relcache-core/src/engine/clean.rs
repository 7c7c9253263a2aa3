use crate::schema::{Model, Relation, Table};
use crate::stmt::{Join, Key, Value, WhereClause, WhereValue};
use crate::{Error, Result};

use std::borrow::Cow;

/// A where-clause partitioned against its table.
///
/// Every entry of the clause lands in exactly one bucket (a relation-shaped
/// primary key lands in two: it keys the lookup and is also descended into as
/// a relation). Resolution then walks the buckets in a fixed order: primary
/// key, conditions, relations, joins.
#[derive(Debug)]
pub(super) struct CleanWhere<'a> {
    pub(super) table: &'a Table,

    pub(super) primary_key: Option<PrimaryKey<'a>>,

    /// Equality conditions. Empty whenever a primary key is present.
    pub(super) conditions: Vec<(&'a str, Cow<'a, Value>)>,

    pub(super) relations: Vec<RelationWhere<'a>>,

    pub(super) joins: Vec<(&'a str, &'a Join)>,
}

#[derive(Debug)]
pub(super) enum PrimaryKey<'a> {
    /// Look the record up by key.
    Key(Key),

    /// The key comes from the parent reference, filtered by the join.
    Join(&'a Join),

    /// A primary key was given but cannot match any record (null, a float,
    /// an object for a table not keyed by a relation, ...).
    Unmatchable,
}

#[derive(Debug)]
pub(super) struct RelationWhere<'a> {
    pub(super) alias: &'a str,
    pub(super) relation: &'a Relation,
    pub(super) clause: RelationClause<'a>,
}

#[derive(Debug)]
pub(super) enum RelationClause<'a> {
    One(Box<CleanWhere<'a>>),

    /// One clause per related record; only valid for `has_many`.
    List(Vec<CleanWhere<'a>>),
}

impl<'a> CleanWhere<'a> {
    pub(super) fn new(model: &'a Model, table: &'a Table, clause: &'a WhereClause) -> Result<Self> {
        let mut clean = CleanWhere {
            table,
            primary_key: None,
            conditions: vec![],
            relations: vec![],
            joins: vec![],
        };

        for (field, value) in clause.iter() {
            if table.is_primary_key(field) {
                match value {
                    WhereValue::Join(join) => {
                        clean.primary_key = Some(PrimaryKey::Join(join));
                        continue;
                    }
                    WhereValue::Value(value) => {
                        clean.primary_key = Some(match Key::from_value(value) {
                            Some(key) => PrimaryKey::Key(key),
                            None => PrimaryKey::Unmatchable,
                        });
                        continue;
                    }
                    WhereValue::Clause(nested) => match table.primary_key_relation() {
                        Some(relation) => {
                            // Keyed by a relation: the nested object carries the
                            // key, and the relation is still descended into below.
                            if let Some(key) = resolve_key(model, relation.target(model), nested) {
                                clean.primary_key = Some(PrimaryKey::Key(key));
                            }
                        }
                        None => {
                            clean.primary_key = Some(PrimaryKey::Unmatchable);
                            continue;
                        }
                    },
                    WhereValue::List(_) => {
                        clean.primary_key = Some(PrimaryKey::Unmatchable);
                        continue;
                    }
                }
            }

            if let WhereValue::Join(join) = value {
                clean.joins.push((field, join));
                continue;
            }

            if let Some(relation) = table.relation(field) {
                let target = relation.target(model);

                match value {
                    WhereValue::Value(value) => {
                        // A foreign key compared as-is.
                        clean.conditions.push((field, Cow::Borrowed(value)));
                    }
                    WhereValue::Clause(nested) => clean.relations.push(RelationWhere {
                        alias: field,
                        relation,
                        clause: RelationClause::One(Box::new(CleanWhere::new(
                            model, target, nested,
                        )?)),
                    }),
                    WhereValue::List(nested) => {
                        if relation.is_has_one() {
                            return Err(Error::invalid_query(format!(
                                "`{}::{}` is a has_one relation; it cannot take a list of where-clauses",
                                table.name, field
                            )));
                        }

                        clean.relations.push(RelationWhere {
                            alias: field,
                            relation,
                            clause: RelationClause::List(
                                nested
                                    .iter()
                                    .map(|nested| CleanWhere::new(model, target, nested))
                                    .collect::<Result<_>>()?,
                            ),
                        });
                    }
                    WhereValue::Join(_) => unreachable!(),
                }
                continue;
            }

            match value.to_value() {
                Some(value) => clean.conditions.push((field, Cow::Owned(value))),
                None => {
                    return Err(Error::invalid_query(format!(
                        "`{}::{}` is not a relation; join markers cannot be nested under it",
                        table.name, field
                    )))
                }
            }
        }

        // An explicit primary key wins over conditions.
        if clean.primary_key.is_some() {
            clean.conditions.clear();
        }

        Ok(clean)
    }

    pub(super) fn has_primary_key(&self) -> bool {
        self.primary_key.is_some()
    }
}

/// Extracts the primary key named by a where-clause (or payload) for `table`,
/// following relation-shaped keys into their nested objects.
pub(super) fn resolve_key(model: &Model, table: &Table, clause: &WhereClause) -> Option<Key> {
    match clause.get(&table.primary_key)? {
        WhereValue::Value(value) => Key::from_value(value),
        WhereValue::Clause(nested) => {
            let relation = table.primary_key_relation()?;
            resolve_key(model, relation.target(model), nested)
        }
        WhereValue::List(_) | WhereValue::Join(_) => None,
    }
}
