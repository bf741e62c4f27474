// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resource kinds stored on the edge node and the alias table that maps
//! user-facing names onto them.
//!
//! Each kind owns a static [`KindSpec`] describing how it is stored and how it
//! is printed. Adding a kind means adding a variant and its `SPECS` entry.

pub mod columns;

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{GetError, Result};
use columns::Column;

/// Token that expands to every supported kind
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Pod,
    Node,
    Service,
    Secret,
    ConfigMap,
    Endpoints,
}

/// Per-kind storage and presentation metadata
#[derive(Debug)]
pub struct KindSpec {
    /// Canonical type as stored in the `type` column
    pub canonical: &'static str,
    pub api_version: &'static str,
    pub kind: &'static str,
    /// Type segment of the companion status record, for kinds whose runtime
    /// status is stored separately
    pub status_segment: Option<&'static str>,
    pub namespaced: bool,
    /// Singular, plural and short names accepted on the command line
    pub aliases: &'static [&'static str],
    pub columns: &'static [Column],
    pub wide_columns: &'static [Column],
}

static SPECS: [KindSpec; 6] = [
    KindSpec {
        canonical: "pod",
        api_version: "v1",
        kind: "Pod",
        status_segment: Some("podstatus"),
        namespaced: true,
        aliases: &["po", "pod", "pods"],
        columns: columns::POD,
        wide_columns: columns::POD_WIDE,
    },
    KindSpec {
        canonical: "node",
        api_version: "v1",
        kind: "Node",
        status_segment: Some("nodestatus"),
        namespaced: false,
        aliases: &["no", "node", "nodes"],
        columns: columns::NODE,
        wide_columns: columns::NODE_WIDE,
    },
    KindSpec {
        canonical: "service",
        api_version: "v1",
        kind: "Service",
        status_segment: None,
        namespaced: true,
        aliases: &["svc", "service", "services"],
        columns: columns::SERVICE,
        wide_columns: columns::SERVICE_WIDE,
    },
    KindSpec {
        canonical: "secret",
        api_version: "v1",
        kind: "Secret",
        status_segment: None,
        namespaced: true,
        aliases: &["secret", "secrets"],
        columns: columns::SECRET,
        wide_columns: &[],
    },
    KindSpec {
        canonical: "configmap",
        api_version: "v1",
        kind: "ConfigMap",
        status_segment: None,
        namespaced: true,
        aliases: &["cm", "configmap", "configmaps"],
        columns: columns::CONFIGMAP,
        wide_columns: &[],
    },
    KindSpec {
        canonical: "endpoints",
        api_version: "v1",
        kind: "Endpoints",
        status_segment: None,
        namespaced: true,
        aliases: &["ep", "endpoint", "endpoints"],
        columns: columns::ENDPOINTS,
        wide_columns: &[],
    },
];

impl ResourceKind {
    /// Every supported kind, in the order `all` expands to
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Pod,
        ResourceKind::Node,
        ResourceKind::Service,
        ResourceKind::Secret,
        ResourceKind::ConfigMap,
        ResourceKind::Endpoints,
    ];

    pub fn spec(self) -> &'static KindSpec {
        &SPECS[self as usize]
    }

    pub fn canonical(self) -> &'static str {
        self.spec().canonical
    }

    #[cfg(test)]
    pub fn from_canonical(canonical: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.canonical() == canonical)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

/// Global alias table, built once on first use
pub static RESOURCE_REGISTRY: LazyLock<ResourceRegistry> = LazyLock::new(ResourceRegistry::new);

/// Maps alias tokens to canonical kinds
pub struct ResourceRegistry {
    alias_map: HashMap<&'static str, Vec<ResourceKind>>,
}

impl ResourceRegistry {
    fn new() -> Self {
        let mut alias_map = HashMap::new();
        for kind in ResourceKind::ALL {
            for alias in kind.spec().aliases {
                alias_map.insert(*alias, vec![kind]);
            }
        }
        alias_map.insert(ALL, ResourceKind::ALL.to_vec());
        Self { alias_map }
    }

    /// Resolve a command-line token to the kinds it names.
    ///
    /// Matching is exact and case-sensitive.
    pub fn resolve(&self, token: &str) -> Result<&[ResourceKind]> {
        if token.is_empty() {
            return Err(GetError::MissingResourceType);
        }
        self.alias_map
            .get(token)
            .map(Vec::as_slice)
            .ok_or_else(|| GetError::UnknownResource(token.to_string()))
    }

    /// All accepted tokens, sorted
    #[cfg(test)]
    pub fn aliases(&self) -> Vec<&'static str> {
        let mut aliases: Vec<_> = self.alias_map.keys().copied().collect();
        aliases.sort_unstable();
        aliases
    }
}

/// Resolve a token against the global alias table
pub fn resolve(token: &str) -> Result<&'static [ResourceKind]> {
    RESOURCE_REGISTRY.resolve(token)
}
