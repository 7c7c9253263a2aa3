use super::Model;
use crate::{Error, Result};

struct Verify<'a> {
    model: &'a Model,
}

impl Model {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { model: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        self.verify_each_table_has_primary_key()?;
        self.verify_relation_targets_are_registered()?;
        self.verify_relation_target_keys_match()?;
        Ok(())
    }

    fn verify_each_table_has_primary_key(&self) -> Result<()> {
        for table in self.model.tables() {
            if !table.has_field(&table.primary_key) {
                return Err(Error::invalid_schema(format!(
                    "table `{}` does not have a primary key `{}`; declared fields are [{}]",
                    table.name,
                    table.primary_key,
                    table
                        .fields
                        .keys()
                        .chain(table.relations.keys())
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", "),
                )));
            }
        }

        Ok(())
    }

    fn verify_relation_targets_are_registered(&self) -> Result<()> {
        for table in self.model.tables() {
            for (alias, relation) in table.relations() {
                if !self.model.contains(&relation.target) {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}::{}` references table `{}`, which was not registered \
                         with the model",
                        table.name, alias, relation.target,
                    )));
                }
            }
        }

        Ok(())
    }

    // Targets are captured by value when the relation is declared; the
    // registered table must still agree on its key.
    fn verify_relation_target_keys_match(&self) -> Result<()> {
        for table in self.model.tables() {
            for (alias, relation) in table.relations() {
                let target = relation.target(self.model);

                if target.primary_key != relation.target_primary_key {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}::{}` expects `{}` to be keyed by `{}`, but it is keyed by `{}`",
                        table.name,
                        alias,
                        target.name,
                        relation.target_primary_key,
                        target.primary_key,
                    )));
                }
            }
        }

        Ok(())
    }
}
