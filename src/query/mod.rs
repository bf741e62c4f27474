// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Reconstruction of complete resources from the metadata store.
//!
//! Pods and nodes keep their runtime status in a separate companion record
//! (`<ns>/podstatus/<name>` next to `<ns>/pod/<name>`). Reads join the two so
//! callers see one document with a `status` field.
//!
//! Results come back in the store's iteration order. No sort is applied, so
//! ordering within a kind is only as stable as the backend makes it.

pub mod selector;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{GetError, Result};
use crate::resources::ResourceKind;
use crate::store::{KEY_SEPARATOR, Record, RecordStore};
use selector::LabelSelector;

/// Which namespaces a query may return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    All,
    Only(String),
}

impl NamespaceScope {
    pub fn includes(&self, namespace: &str) -> bool {
        match self {
            NamespaceScope::All => true,
            NamespaceScope::Only(ns) => ns == namespace,
        }
    }
}

/// A primary record with its companion status folded in
#[derive(Debug, Clone, PartialEq)]
pub struct MergedResource {
    pub kind: ResourceKind,
    pub key: String,
    pub value: Value,
}

impl MergedResource {
    pub fn namespace(&self) -> &str {
        self.key.split(KEY_SEPARATOR).next().unwrap_or_default()
    }

    /// Name taken from the last key segment
    pub fn name(&self) -> &str {
        self.key.rsplit(KEY_SEPARATOR).next().unwrap_or_default()
    }

    pub fn labels(&self) -> Option<&Map<String, Value>> {
        self.value
            .get("metadata")
            .and_then(|m| m.get("labels"))
            .and_then(Value::as_object)
    }
}

/// Position of the type segment in `<namespace>/<type>/<name>`
const TYPE_SEGMENT: usize = 1;

/// Key of the companion record: the type segment is replaced by `to` when it
/// equals `from`. Returns `None` for any other key.
///
/// ```ignore
/// assert_eq!(
///     derive_companion_key("default/pod/web", "pod", "podstatus").as_deref(),
///     Some("default/podstatus/web"),
/// );
/// ```
pub fn derive_companion_key(key: &str, from: &str, to: &str) -> Option<String> {
    let mut segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    if segments.get(TYPE_SEGMENT) != Some(&from) {
        return None;
    }
    segments[TYPE_SEGMENT] = to;
    Some(segments.join(&KEY_SEPARATOR.to_string()))
}

/// Inject the companion's status subtree into `primary`.
///
/// The companion may carry it as `status` or `Status`. Every other field of the
/// primary document is left untouched; without a status subtree the primary is
/// returned as is.
pub fn merge_status(primary: &mut Value, companion: &Value) {
    let status = companion.get("status").or_else(|| companion.get("Status"));
    if let (Some(status), Some(doc)) = (status, primary.as_object_mut()) {
        doc.insert("status".to_string(), status.clone());
    }
}

fn parse_value(key: &str, bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|source| GetError::MalformedRecord {
        key: key.to_string(),
        source,
    })
}

/// Reads and joins records for one or more kinds
pub struct Reconstructor<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> Reconstructor<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Fetch every kind in turn and concatenate the results.
    ///
    /// The first error aborts the whole query; nothing partial is returned.
    pub fn fetch_all(
        &self,
        kinds: &[ResourceKind],
        scope: &NamespaceScope,
        names: &[String],
    ) -> Result<Vec<MergedResource>> {
        let mut resources = Vec::new();
        for kind in kinds {
            resources.extend(self.fetch(*kind, scope, names)?);
        }
        Ok(resources)
    }

    /// Fetch one kind, filtered by namespace and name, with status merged in.
    ///
    /// A name filter matches when any requested name occurs anywhere in the
    /// record key, so `web` also selects `default/pod/web-2`.
    pub fn fetch(
        &self,
        kind: ResourceKind,
        scope: &NamespaceScope,
        names: &[String],
    ) -> Result<Vec<MergedResource>> {
        let records = self.store.query_by_type(kind.canonical())?;
        let scanned = records.len();

        let mut resources = Vec::new();
        for record in records {
            if !scope.includes(record.namespace()) {
                continue;
            }
            if !names.is_empty() && !names.iter().any(|n| record.key.contains(n.as_str())) {
                continue;
            }
            resources.push(self.reconstruct(kind, record)?);
        }

        debug!(
            kind = %kind,
            scanned,
            matched = resources.len(),
            "Fetched records"
        );
        Ok(resources)
    }

    fn reconstruct(&self, kind: ResourceKind, record: Record) -> Result<MergedResource> {
        let mut value = parse_value(&record.key, &record.value)?;

        if let Some(status_segment) = kind.spec().status_segment
            && let Some(companion_key) =
                derive_companion_key(&record.key, kind.canonical(), status_segment)
        {
            match self.store.query_by_key(&companion_key)?.into_iter().next() {
                Some(companion) => {
                    let companion_value = parse_value(&companion.key, &companion.value)?;
                    merge_status(&mut value, &companion_value);
                }
                None => trace!(key = %companion_key, "No companion status record"),
            }
        }

        Ok(MergedResource {
            kind,
            key: record.key,
            value,
        })
    }
}

/// Keep the resources whose labels satisfy `selector`
pub fn filter_by_selector(
    resources: Vec<MergedResource>,
    selector: &LabelSelector,
) -> Vec<MergedResource> {
    if selector.is_empty() {
        return resources;
    }
    resources
        .into_iter()
        .filter(|r| selector.matches(r.labels()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn default_ns() -> NamespaceScope {
        NamespaceScope::Only("default".to_string())
    }

    #[test]
    fn test_derive_companion_key() {
        assert_eq!(
            derive_companion_key("default/pod/web", "pod", "podstatus").as_deref(),
            Some("default/podstatus/web")
        );
        assert_eq!(
            derive_companion_key("default/node/edge-1", "node", "nodestatus").as_deref(),
            Some("default/nodestatus/edge-1")
        );
        // Only the type segment is substituted
        assert_eq!(
            derive_companion_key("podinfra/pod/pod", "pod", "podstatus").as_deref(),
            Some("podinfra/podstatus/pod")
        );
        assert_eq!(
            derive_companion_key("pod/pod/a", "pod", "podstatus").as_deref(),
            Some("pod/podstatus/a")
        );
        assert_eq!(derive_companion_key("default/service/web", "pod", "podstatus"), None);
        assert_eq!(derive_companion_key("pod/service/web", "pod", "podstatus"), None);
        assert_eq!(derive_companion_key("pod", "pod", "podstatus"), None);
    }

    #[test]
    fn test_namespace_named_like_a_kind_keeps_status() {
        let store = MemoryStore::new()
            .with("node/node/edge-1", "node", json!({"metadata": {"name": "edge-1"}}))
            .with("node/nodestatus/edge-1", "nodestatus", json!({"Status": {"phase": "Running"}}));

        let resources = Reconstructor::new(&store)
            .fetch(ResourceKind::Node, &NamespaceScope::Only("node".into()), &[])
            .unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].value["status"]["phase"], "Running");
    }

    #[test]
    fn test_merge_status_precedence() {
        let mut primary = json!({"a": 1, "b": {"x": true}});
        merge_status(&mut primary, &json!({"Status": {"c": 3}, "a": 99}));
        assert_eq!(primary, json!({"a": 1, "b": {"x": true}, "status": {"c": 3}}));
    }

    #[test]
    fn test_merge_status_is_idempotent() {
        let companion = json!({"status": {"phase": "Running"}});
        let mut once = json!({"spec": {}});
        merge_status(&mut once, &companion);
        let mut twice = once.clone();
        merge_status(&mut twice, &companion);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_status_without_status_subtree() {
        let original = json!({"metadata": {"name": "a"}});
        let mut primary = original.clone();
        merge_status(&mut primary, &json!({"other": 1}));
        assert_eq!(primary, original);
    }

    #[test]
    fn test_pod_with_companion_status() {
        let store = MemoryStore::new()
            .with("default/pod/a", "pod", json!({"metadata": {"name": "a"}, "spec": {}}))
            .with("default/podstatus/a", "podstatus", json!({"Status": {"phase": "Running"}}));

        let resources = Reconstructor::new(&store)
            .fetch(ResourceKind::Pod, &default_ns(), &[])
            .unwrap();

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name(), "a");
        assert_eq!(resources[0].value["status"]["phase"], "Running");
        assert_eq!(resources[0].value["metadata"]["name"], "a");
    }

    #[test]
    fn test_pod_without_companion_passes_through() {
        let doc = json!({"metadata": {"name": "a"}, "spec": {}});
        let store = MemoryStore::new().with("default/pod/a", "pod", doc.clone());

        let resources = Reconstructor::new(&store)
            .fetch(ResourceKind::Pod, &default_ns(), &[])
            .unwrap();
        assert_eq!(resources[0].value, doc);
        assert!(resources[0].value.get("status").is_none());
    }

    #[test]
    fn test_non_split_kind_ignores_status_records() {
        let store = MemoryStore::new()
            .with("default/service/web", "service", json!({"spec": {}}))
            .with("default/servicestatus/web", "servicestatus", json!({"status": {"x": 1}}));

        let resources = Reconstructor::new(&store)
            .fetch(ResourceKind::Service, &default_ns(), &[])
            .unwrap();
        assert!(resources[0].value.get("status").is_none());
    }

    #[test]
    fn test_namespace_scope() {
        let store = MemoryStore::new()
            .with("default/configmap/a", "configmap", json!({}))
            .with("kube-system/configmap/b", "configmap", json!({}))
            .with("edge/configmap/c", "configmap", json!({}));
        let engine = Reconstructor::new(&store);

        let all = engine
            .fetch(ResourceKind::ConfigMap, &NamespaceScope::All, &[])
            .unwrap();
        assert_eq!(all.len(), 3);

        let only = engine
            .fetch(ResourceKind::ConfigMap, &NamespaceScope::Only("edge".into()), &[])
            .unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].namespace(), "edge");
    }

    #[test]
    fn test_name_filter_is_substring_match() {
        let store = MemoryStore::new()
            .with("default/secret/web", "secret", json!({}))
            .with("default/secret/web-tls", "secret", json!({}))
            .with("default/secret/db", "secret", json!({}));

        let names = vec!["web".to_string()];
        let resources = Reconstructor::new(&store)
            .fetch(ResourceKind::Secret, &default_ns(), &names)
            .unwrap();
        let keys: Vec<_> = resources.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["default/secret/web", "default/secret/web-tls"]);
    }

    #[test]
    fn test_malformed_primary_aborts() {
        let mut store = MemoryStore::new().with("default/pod/ok", "pod", json!({}));
        store.insert(Record::new("default/pod/bad", "pod", "{not json"));

        let err = Reconstructor::new(&store)
            .fetch(ResourceKind::Pod, &default_ns(), &[])
            .unwrap_err();
        assert!(matches!(err, GetError::MalformedRecord { key, .. } if key == "default/pod/bad"));
    }

    #[test]
    fn test_malformed_companion_aborts() {
        let mut store = MemoryStore::new().with("default/node/edge-1", "node", json!({}));
        store.insert(Record::new("default/nodestatus/edge-1", "nodestatus", "]"));

        let err = Reconstructor::new(&store)
            .fetch(ResourceKind::Node, &default_ns(), &[])
            .unwrap_err();
        assert!(
            matches!(err, GetError::MalformedRecord { key, .. } if key == "default/nodestatus/edge-1")
        );
    }

    #[test]
    fn test_fetch_all_concatenates_in_kind_order() {
        let store = MemoryStore::new()
            .with("default/service/s", "service", json!({}))
            .with("default/pod/p", "pod", json!({}));

        let resources = Reconstructor::new(&store)
            .fetch_all(&ResourceKind::ALL, &default_ns(), &[])
            .unwrap();
        let kinds: Vec<_> = resources.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ResourceKind::Pod, ResourceKind::Service]);
    }

    #[test]
    fn test_filter_by_selector() {
        let store = MemoryStore::new()
            .with("default/pod/front", "pod", json!({"metadata": {"labels": {"env": "prod", "tier": "frontend"}}}))
            .with("default/pod/back", "pod", json!({"metadata": {"labels": {"env": "prod", "tier": "backend"}}}))
            .with("default/pod/bare", "pod", json!({"metadata": {"name": "bare"}}));

        let resources = Reconstructor::new(&store)
            .fetch(ResourceKind::Pod, &default_ns(), &[])
            .unwrap();
        let selector = LabelSelector::parse("env=prod,tier!=frontend").unwrap();
        let names: Vec<_> = filter_by_selector(resources, &selector)
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["back", "bare"]);
    }
}
