// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the `get` pipeline.
//!
//! Every stage returns these directly to its caller. Only `main` turns them
//! into a user-visible message and a non-zero exit status.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GetError {
    /// No resource type was given on the command line
    #[error("you must specify the type of resource to get")]
    MissingResourceType,

    /// The resource token is not in the alias table
    #[error("unrecognized resource type: {0}")]
    UnknownResource(String),

    /// `all` was combined with explicit resource names
    #[error("resource type \"all\" cannot be combined with resource names")]
    AllWithNames,

    /// A selector token did not split into a key and a value
    #[error("invalid selector {token:?}: {reason}")]
    BadSelectorSyntax { token: String, reason: String },

    #[error("output format {0:?} not supported, supported formats are yaml|json|wide")]
    UnsupportedOutputFormat(String),

    /// The database file is missing or cannot be opened read-only
    #[error("store unavailable at {}: {reason}", path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    /// A stored JSON document failed to parse
    #[error("malformed record {key}: {source}")]
    MalformedRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store query failed: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("failed to render output: {0}")]
    Render(String),
}

impl GetError {
    pub(crate) fn bad_selector(token: &str, reason: impl Into<String>) -> Self {
        Self::BadSelectorSyntax {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_names_key() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = GetError::MalformedRecord {
            key: "default/pod/web".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("malformed record default/pod/web:"));
    }

    #[test]
    fn test_store_unavailable_message() {
        let err = GetError::StoreUnavailable {
            path: PathBuf::from("/tmp/missing.db"),
            reason: "file does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "store unavailable at /tmp/missing.db: file does not exist"
        );
    }
}
