// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Read access to the edge node's metadata store.
//!
//! Records are written by the edge agent; this crate only ever reads them.
//! Keys have the shape `<namespace>/<type-segment>/<name>`.

#[cfg(test)]
mod memory;
mod sqlite;

#[cfg(test)]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;

/// Default location of the edge node database
pub const DEFAULT_DB_PATH: &str = "/var/lib/kubeedge/edgecore.db";

/// Separator between the segments of a record key
pub const KEY_SEPARATOR: char = '/';

/// One row of the metadata table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    /// Canonical lowercase type, e.g. "pod" or "podstatus"
    pub kind: String,
    /// Raw JSON document
    pub value: Vec<u8>,
}

impl Record {
    #[cfg(test)]
    pub fn new(key: impl Into<String>, kind: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Namespace encoded in the key (its first segment)
    pub fn namespace(&self) -> &str {
        self.key.split(KEY_SEPARATOR).next().unwrap_or_default()
    }

    /// Object name encoded in the key (its last segment)
    pub fn name(&self) -> &str {
        self.key.rsplit(KEY_SEPARATOR).next().unwrap_or_default()
    }
}

/// Query interface over the metadata store.
///
/// Iteration order is whatever the backend yields; callers must not assume
/// results are sorted.
pub trait RecordStore {
    /// All records whose type equals `kind`
    fn query_by_type(&self, kind: &str) -> Result<Vec<Record>>;

    /// Records stored under exactly `key` (zero or one expected)
    fn query_by_key(&self, key: &str) -> Result<Vec<Record>>;

    #[allow(dead_code)]
    fn query_all(&self) -> Result<Vec<Record>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_namespace_and_name() {
        let record = Record::new("kube-system/pod/coredns-abc", "pod", "{}");
        assert_eq!(record.namespace(), "kube-system");
        assert_eq!(record.name(), "coredns-abc");
    }

    #[test]
    fn test_record_without_separator() {
        let record = Record::new("orphan", "pod", "{}");
        assert_eq!(record.namespace(), "orphan");
        assert_eq!(record.name(), "orphan");
    }
}
