use relcache_core::stmt::{FieldSelection, Resolved, Value, Where};
use relcache_core::{Cache, Model, Result};

use std::sync::Arc;

/// Owns a model and the current snapshot of its normalized cache.
///
/// Every write builds a new snapshot and swaps it in only once it fully
/// succeeds. Snapshots previously returned by [`Store::cache`] are never
/// modified.
#[derive(Debug, Clone)]
pub struct Store {
    model: Arc<Model>,
    cache: Cache,
}

impl Store {
    pub fn new(model: impl Into<Arc<Model>>) -> Store {
        let model = model.into();
        let cache = Cache::new(&model);

        Store { model, cache }
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// The current snapshot.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Normalizes `payload` (an object or an array of objects) into `table`.
    pub fn upsert(&mut self, table: &str, payload: &Value) -> Result<()> {
        self.cache = relcache_core::normalize(&self.model, &self.cache, table, payload)?;
        Ok(())
    }

    /// Normalizes several payloads, in order, as one write. If any of them
    /// fails, none of them is applied.
    pub fn upsert_many<S: AsRef<str>>(&mut self, payloads: &[(S, Value)]) -> Result<()> {
        let mut next = self.cache.clone();

        for (i, (table, payload)) in payloads.iter().enumerate() {
            next = relcache_core::normalize(&self.model, &next, table.as_ref(), payload)
                .map_err(|err| {
                    err.context(relcache_core::err!(
                        "upsert {} of {} into `{}`",
                        i + 1,
                        payloads.len(),
                        table.as_ref()
                    ))
                })?;
        }

        log::debug!("applied {} upserts", payloads.len());

        self.cache = next;
        Ok(())
    }

    /// Reads from the current snapshot. See [`relcache_core::get`].
    pub fn get(
        &self,
        table: &str,
        filter: impl Into<Where>,
        fields: Option<&FieldSelection>,
    ) -> Result<Option<Resolved>> {
        relcache_core::get(&self.model, &self.cache, table, &filter.into(), fields)
    }

    /// Drops every cached record, keeping one empty table per model table.
    pub fn purge(&mut self) {
        log::debug!("purge; records={}", self.cache.len());
        self.cache.purge();
    }
}
