use crate::model::{EntityKey, EntityKind, Id, Timestamps};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Partial update payload: a JSON object keyed by wire field names.
pub type Patch = serde_json::Map<String, serde_json::Value>;

/// A foreign id held by an entity that must resolve before the entity is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// Wire name of the field holding the reference.
    pub field: &'static str,
    pub kind: EntityKind,
    pub id: Id,
}

impl Reference {
    pub fn new(field: &'static str, kind: EntityKind, id: Id) -> Self {
        Self { field, kind, id }
    }
}

/// Per-kind configuration consumed by the generic entity service.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Key: EntityKey;

    const KIND: EntityKind;

    /// Wire names of the fields an update may overwrite. Anything not listed
    /// (identifiers, timestamps, join keys) survives every update.
    const MUTABLE_FIELDS: &'static [&'static str];

    fn key(&self) -> Option<Self::Key>;

    /// Accept a store-assigned surrogate id. Join rows have none.
    fn assign_id(&mut self, _id: Id) {}

    /// Drop a caller-supplied surrogate id before the first save.
    fn clear_id(&mut self) {}

    fn timestamps(&self) -> &Timestamps;

    fn timestamps_mut(&mut self) -> &mut Timestamps;

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// Implements [`Entity`] for a record with `id: Option<Id>` and a flattened
/// `timestamps` field.
macro_rules! surrogate_entity {
    ($ty:ty, $kind:expr, [$($field:literal),* $(,)?] $(, references = $refs:path)?) => {
        impl $crate::model::Entity for $ty {
            type Key = $crate::model::Id;

            const KIND: $crate::model::EntityKind = $kind;

            const MUTABLE_FIELDS: &'static [&'static str] = &[$($field),*];

            fn key(&self) -> Option<$crate::model::Id> {
                self.id
            }

            fn assign_id(&mut self, id: $crate::model::Id) {
                self.id = Some(id);
            }

            fn clear_id(&mut self) {
                self.id = None;
            }

            fn timestamps(&self) -> &$crate::model::Timestamps {
                &self.timestamps
            }

            fn timestamps_mut(&mut self) -> &mut $crate::model::Timestamps {
                &mut self.timestamps
            }

            $(
                fn references(&self) -> Vec<$crate::model::Reference> {
                    $refs(self)
                }
            )?
        }
    };
}

pub(crate) use surrogate_entity;
