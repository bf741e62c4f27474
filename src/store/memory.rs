// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory store used by tests.

use super::{Record, RecordStore};
use crate::error::Result;

/// Keeps records in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Builder-style insert of a record from a JSON value
    pub fn with(mut self, key: &str, kind: &str, value: serde_json::Value) -> Self {
        self.insert(Record::new(key, kind, value.to_string()));
        self
    }
}

impl FromIterator<Record> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl RecordStore for MemoryStore {
    fn query_by_type(&self, kind: &str) -> Result<Vec<Record>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect())
    }

    fn query_by_key(&self, key: &str) -> Result<Vec<Record>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.key == key)
            .cloned()
            .collect())
    }

    fn query_all(&self) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_by_type_keeps_insertion_order() {
        let store = MemoryStore::new()
            .with("default/pod/b", "pod", json!({}))
            .with("default/service/x", "service", json!({}))
            .with("default/pod/a", "pod", json!({}));

        let keys: Vec<_> = store
            .query_by_type("pod")
            .unwrap()
            .into_iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(keys, vec!["default/pod/b", "default/pod/a"]);
    }

    #[test]
    fn test_query_by_key_missing() {
        let store = MemoryStore::new().with("default/pod/a", "pod", json!({}));
        assert!(store.query_by_key("default/podstatus/a").unwrap().is_empty());
        assert_eq!(store.query_by_key("default/pod/a").unwrap().len(), 1);
        assert_eq!(store.query_all().unwrap().len(), 1);
    }
}
