//! Entity writes: create, update, delete.
//!
//! An update replaces every value at the shape paths of the entity's type.
//! Stores that apply [`Update::Replace`] atomically get one request. Other
//! stores get a delete pass followed by an insert pass; between the two the
//! entity has no values at those paths. A failed insert is retried
//! `update_retries` times and then reported as [`Error::PartialUpdate`],
//! which leaves recovery to the caller.

use std::collections::BTreeSet;

use tracing::{debug, instrument, warn};

use crate::catalog::Catalog;
use crate::codec;
use crate::config::WorkbenchConfig;
use crate::model::{EntityId, EntityValues};
use crate::storage::{SparqlStore, Update};
use crate::{Error, Result};

/// Write access to the entities of one store.
pub struct EntityWriter<'s, S: SparqlStore> {
    store: &'s S,
    namespace: &'s str,
    update_retries: usize,
}

impl<'s, S: SparqlStore> EntityWriter<'s, S> {
    pub fn new(store: &'s S, config: &'s WorkbenchConfig) -> Self {
        Self { store, namespace: &config.namespace, update_retries: config.update_retries }
    }

    /// Mint an identifier and assert the type and `values` for it.
    #[instrument(skip(self, values), level = "debug")]
    pub async fn create(&self, class: &str, values: &EntityValues) -> Result<EntityId> {
        let id = codec::mint_entity_id(self.namespace);
        let triples = codec::entity_triples(&id, class, values);
        self.store.update(&Update::InsertData(triples)).await?;
        debug!(entity = %id, "created entity");
        Ok(id)
    }

    /// Replace the values of `entity` at the shape paths of `class` (and at
    /// any other path present in `values`) with `values`.
    #[instrument(skip(self, values), level = "debug")]
    pub async fn update(&self, entity: &EntityId, class: &str, values: &EntityValues) -> Result<()> {
        let mut paths: BTreeSet<String> =
            Catalog::new(self.store).shape_paths(class).await?.into_iter().collect();
        paths.extend(values.paths().map(str::to_string));
        let paths: Vec<String> = paths.into_iter().collect();
        let insert = codec::value_triples(entity, values);
        let subject = entity.as_str().to_string();

        if self.store.capabilities().atomic_update {
            return self.store.update(&Update::Replace { subject, paths, insert }).await;
        }

        self.store.update(&Update::DeletePaths { subject, paths }).await?;
        if insert.is_empty() {
            return Ok(());
        }
        let request = Update::InsertData(insert);
        let mut attempt = 0;
        loop {
            match self.store.update(&request).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.update_retries => {
                    attempt += 1;
                    warn!(entity = %entity, attempt, error = %e, "insert after delete failed, retrying");
                }
                Err(e) => {
                    warn!(entity = %entity, error = %e, "entity left without values");
                    return Err(Error::PartialUpdate { entity: entity.to_string(), source: Box::new(e) });
                }
            }
        }
    }

    /// Remove every statement about `entity`. Absent entities are a no-op.
    #[instrument(skip(self), level = "debug")]
    pub async fn delete(&self, entity: &EntityId) -> Result<()> {
        self.store.update(&Update::DeleteSubject(entity.as_str().to_string())).await
    }
}
