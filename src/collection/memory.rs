//! In-memory collection backed by a vector of JSON rows.
//!
//! The reference `Collection` implementation, used by tests and by hosts
//! that have no persistent store. Rows are flat JSON objects keyed by a
//! configurable primary-key field.

use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Collection, Record};
use crate::codec::FieldValue;

/// Vector-of-rows store with primary-key filtering.
pub struct MemoryCollection {
    primary_key: String,
    rows: RwLock<Vec<Map<String, Value>>>,
}

/// One row of a `MemoryCollection`, cloned out at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRecord {
    row: Map<String, Value>,
}

impl MemoryCollection {
    pub fn new(primary_key: impl Into<String>) -> Self {
        Self {
            primary_key: primary_key.into(),
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Insert a row, assigning a fresh UUID primary key when absent.
    /// Returns the stored record.
    pub fn insert(&self, mut row: Map<String, Value>) -> MemoryRecord {
        if !row.contains_key(&self.primary_key) {
            row.insert(
                self.primary_key.clone(),
                Value::String(Uuid::new_v4().to_string()),
            );
        }
        let record = MemoryRecord { row: row.clone() };
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row);
        record
    }

    /// Replace the row with the given primary key, or insert it when no row
    /// matches. Returns the stored record.
    pub fn replace(&self, key: &str, mut row: Map<String, Value>) -> MemoryRecord {
        row.entry(self.primary_key.clone())
            .or_insert_with(|| Value::String(key.to_string()));
        let record = MemoryRecord { row: row.clone() };
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        match rows.iter_mut().find(|r| key_matches(r, &self.primary_key, key)) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
        record
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn key_matches(row: &Map<String, Value>, primary_key: &str, key: &str) -> bool {
    match row.get(primary_key) {
        Some(Value::String(s)) => s == key,
        Some(Value::Number(n)) => n.to_string() == key,
        _ => false,
    }
}

impl Collection for MemoryCollection {
    type Record = MemoryRecord;

    fn all(&self) -> Vec<MemoryRecord> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|row| MemoryRecord { row: row.clone() })
            .collect()
    }

    fn filter_by_key(&self, key: &str) -> Vec<MemoryRecord> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|row| key_matches(row, &self.primary_key, key))
            .map(|row| MemoryRecord { row: row.clone() })
            .collect()
    }

    fn delete(&self, records: &[MemoryRecord]) {
        let keys: Vec<&Value> = records
            .iter()
            .filter_map(|r| r.row.get(&self.primary_key))
            .collect();
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|row| match row.get(&self.primary_key) {
                Some(k) => !keys.contains(&k),
                None => true,
            });
    }
}

impl MemoryRecord {
    pub fn into_row(self) -> Map<String, Value> {
        self.row
    }

    pub fn row(&self) -> &Map<String, Value> {
        &self.row
    }
}

impl Record for MemoryRecord {
    fn get_field(&self, name: &str) -> FieldValue {
        self.row
            .get(name)
            .cloned()
            .map_or(FieldValue::Null, FieldValue::from)
    }

    fn project_native(&self, fields: &[String]) -> Option<Map<String, Value>> {
        let mut out = Map::new();
        for field in fields {
            out.insert(
                field.clone(),
                self.row.get(field).cloned().unwrap_or(Value::Null),
            );
        }
        Some(out)
    }
}
