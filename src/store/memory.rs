use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};

use crate::model::{Entity, EntityKind, Id};
use crate::store::traits::{Repository, Store};

/// Rows of one kind in key order, plus the last id handed out.
struct Table<E: Entity> {
    rows: BTreeMap<E::Key, E>,
    last_id: Id,
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

/// In-process store. Each kind gets its own table, created on first write.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<EntityKind, Box<dyn Any + Send + Sync>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<E: Entity, R>(&self, f: impl FnOnce(Option<&Table<E>>) -> R) -> Result<R> {
        let tables = self.tables.read();
        match tables.get(&E::KIND) {
            Some(table) => {
                let table = table
                    .downcast_ref::<Table<E>>()
                    .ok_or_else(|| anyhow!("Table for {} holds another row type", E::KIND))?;
                Ok(f(Some(table)))
            }
            None => Ok(f(None)),
        }
    }

    fn write<E: Entity, R>(&self, f: impl FnOnce(&mut Table<E>) -> R) -> Result<R> {
        let mut tables = self.tables.write();
        let table = tables
            .entry(E::KIND)
            .or_insert_with(|| Box::new(Table::<E>::default()) as Box<dyn Any + Send + Sync>)
            .downcast_mut::<Table<E>>()
            .ok_or_else(|| anyhow!("Table for {} holds another row type", E::KIND))?;
        Ok(f(table))
    }
}

#[async_trait::async_trait]
impl<E: Entity> Repository<E> for MemoryStore {
    async fn find_by_id(&self, key: &E::Key) -> Result<Option<E>> {
        self.read::<E, _>(|table| table.and_then(|t| t.rows.get(key).cloned()))
    }

    async fn find_all(&self) -> Result<Vec<E>> {
        self.read::<E, _>(|table| {
            table
                .map(|t| t.rows.values().cloned().collect())
                .unwrap_or_default()
        })
    }

    async fn save(&self, mut entity: E) -> Result<E> {
        self.write::<E, _>(|table| {
            if entity.key().is_none() {
                table.last_id += 1;
                entity.assign_id(table.last_id);
            }
            let key = entity
                .key()
                .ok_or_else(|| anyhow!("Cannot save {} without a key", E::KIND))?;
            table.rows.insert(key, entity.clone());
            Ok(entity)
        })?
    }

    async fn delete_by_id(&self, key: &E::Key) -> Result<bool> {
        self.write::<E, _>(|table| table.rows.remove(key).is_some())
    }
}

impl Store for MemoryStore {}
