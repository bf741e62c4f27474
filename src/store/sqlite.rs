// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! SQLite backend for the metadata store.
//!
//! The edge agent persists objects in a `meta` table with `key`, `type` and
//! `value` columns. The database is opened read-only for the lifetime of one
//! invocation and closed when the handle is dropped.

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row, params};
use tracing::debug;

use super::{Record, RecordStore};
use crate::error::{GetError, Result};

const SELECT_COLUMNS: &str = r#"SELECT "key", "type", "value" FROM meta"#;

pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Open the database at `path` without write access.
    ///
    /// A missing file is reported as unavailable instead of letting SQLite
    /// create an empty database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(GetError::StoreUnavailable {
                path,
                reason: "file does not exist".to_string(),
            });
        }

        let unavailable = |e: rusqlite::Error| GetError::StoreUnavailable {
            path: path.clone(),
            reason: e.to_string(),
        };

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&path, flags).map_err(unavailable)?;

        // SQLite reads the header lazily; touch it so a foreign file fails here
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(unavailable)?;

        debug!(path = %path.display(), "Opened metadata store read-only");
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn select(&self, filter: &str, arg: Option<&str>) -> Result<Vec<Record>> {
        let sql = format!("{} {}", SELECT_COLUMNS, filter);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match arg {
            Some(arg) => stmt.query_map(params![arg], row_to_record)?,
            None => stmt.query_map([], row_to_record)?,
        };
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

// The agent writes `value` as TEXT, but BLOB is accepted as well
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<Record> {
    let value = match row.get_ref(2)? {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes.to_vec(),
        ValueRef::Null => Vec::new(),
        other => {
            return Err(rusqlite::Error::InvalidColumnType(
                2,
                "value".into(),
                other.data_type(),
            ));
        }
    };

    Ok(Record {
        key: row.get(0)?,
        kind: row.get(1)?,
        value,
    })
}

impl RecordStore for SqliteStore {
    fn query_by_type(&self, kind: &str) -> Result<Vec<Record>> {
        self.select(r#"WHERE "type" = ?1"#, Some(kind))
    }

    fn query_by_key(&self, key: &str) -> Result<Vec<Record>> {
        self.select(r#"WHERE "key" = ?1"#, Some(key))
    }

    fn query_all(&self) -> Result<Vec<Record>> {
        self.select("", None)
    }
}
