//! # Collection Contracts
//!
//! The opaque backing-store abstraction the dispatcher talks to. A
//! `Collection` yields `Record`s; the core never assumes a concrete in-memory
//! shape, it only reads fields by name through the `Record` capability.

mod memory;

pub use memory::{MemoryCollection, MemoryRecord};

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::codec::FieldValue;

/// Result of a primary-key lookup.
///
/// An explicit tagged result instead of assertion-as-control-flow: a key
/// matching more than one record is a data-integrity condition, surfaced as
/// `Ambiguous` so callers can decide how strictly to treat it.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<R> {
    Found(R),
    NotFound,
    Ambiguous,
}

/// One item within a collection, readable field-by-field.
pub trait Record {
    /// Read a field by name. Unknown fields yield `FieldValue::Null`.
    fn get_field(&self, name: &str) -> FieldValue;

    /// Native flat projection, for stores that can produce a ready-made
    /// mapping for a field list. Returning `None` routes the projector
    /// through `get_field`.
    fn project_native(&self, _fields: &[String]) -> Option<Map<String, Value>> {
        None
    }
}

/// Backing-store handle for one resource type.
///
/// Concurrency and atomicity guarantees (isolation of concurrent writes,
/// atomicity of delete) belong to the implementation, not to the core.
pub trait Collection: Send + Sync {
    type Record: Record + Clone + Send + 'static;

    /// Fetch the full result set, in the store's stable order.
    fn all(&self) -> Vec<Self::Record>;

    /// Fetch every record whose primary key matches.
    fn filter_by_key(&self, key: &str) -> Vec<Self::Record>;

    /// Look up a single record by primary key.
    fn get_by_key(&self, key: &str) -> Lookup<Self::Record> {
        let mut matches = self.filter_by_key(key);
        match matches.len() {
            0 => Lookup::NotFound,
            1 => Lookup::Found(matches.remove(0)),
            _ => Lookup::Ambiguous,
        }
    }

    /// Remove the given records from the store.
    fn delete(&self, records: &[Self::Record]);
}

/// Shared handles delegate, so a validator and a resource specification can
/// hold the same store.
impl<T: Collection> Collection for Arc<T> {
    type Record = T::Record;

    fn all(&self) -> Vec<Self::Record> {
        (**self).all()
    }

    fn filter_by_key(&self, key: &str) -> Vec<Self::Record> {
        (**self).filter_by_key(key)
    }

    fn get_by_key(&self, key: &str) -> Lookup<Self::Record> {
        (**self).get_by_key(key)
    }

    fn delete(&self, records: &[Self::Record]) {
        (**self).delete(records)
    }
}
