// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Kind-specific summary columns for the table view.
//!
//! Every extractor takes the merged JSON document and the reference time used
//! for AGE. Missing fields render as `<none>` rather than failing.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Placeholder for absent values
pub const NONE: &str = "<none>";

/// A table column: header plus value extractor
#[derive(Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub value: fn(&Value, DateTime<Utc>) -> String,
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column").field("header", &self.header).finish()
    }
}

const fn col(header: &'static str, value: fn(&Value, DateTime<Utc>) -> String) -> Column {
    Column { header, value }
}

pub const AGE: Column = col("AGE", age);

pub const POD: &[Column] = &[
    col("READY", |v, _| pod_ready(v)),
    col("STATUS", |v, _| pod_status(v)),
    col("RESTARTS", |v, _| pod_restarts(v)),
    AGE,
];
pub const POD_WIDE: &[Column] = &[
    col("IP", |v, _| text_or_none(v, "status.podIP")),
    col("NODE", |v, _| text_or_none(v, "spec.nodeName")),
];

pub const NODE: &[Column] = &[
    col("STATUS", |v, _| node_status(v)),
    col("ROLES", |v, _| node_roles(v)),
    AGE,
    col("VERSION", |v, _| text_or_none(v, "status.nodeInfo.kubeletVersion")),
];
pub const NODE_WIDE: &[Column] = &[
    col("INTERNAL-IP", |v, _| node_internal_ip(v)),
    col("OS-IMAGE", |v, _| text_or_none(v, "status.nodeInfo.osImage")),
    col("KERNEL-VERSION", |v, _| text_or_none(v, "status.nodeInfo.kernelVersion")),
    col("CONTAINER-RUNTIME", |v, _| {
        text_or_none(v, "status.nodeInfo.containerRuntimeVersion")
    }),
];

pub const SERVICE: &[Column] = &[
    col("TYPE", |v, _| service_type(v).to_string()),
    col("CLUSTER-IP", |v, _| text_or_none(v, "spec.clusterIP")),
    col("EXTERNAL-IP", |v, _| service_external_ip(v)),
    col("PORT(S)", |v, _| service_ports(v)),
    AGE,
];
pub const SERVICE_WIDE: &[Column] = &[col("SELECTOR", |v, _| {
    join_map(get_nested_value(v, "spec.selector"))
})];

pub const SECRET: &[Column] = &[
    col("TYPE", |v, _| text_or_none(v, "type")),
    col("DATA", |v, _| count_keys(v, &["data", "stringData"]).to_string()),
    AGE,
];

pub const CONFIGMAP: &[Column] = &[
    col("DATA", |v, _| count_keys(v, &["data", "binaryData"]).to_string()),
    AGE,
];

pub const ENDPOINTS: &[Column] = &[col("ENDPOINTS", |v, _| endpoints(v)), AGE];

/// Navigate a dotted path in a JSON value
pub fn get_nested_value<'a>(value: &'a Value, path: &str) -> &'a Value {
    let mut current = value;

    for part in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(part).unwrap_or(&Value::Null),
            Value::Array(arr) => part
                .parse::<usize>()
                .ok()
                .and_then(|idx| arr.get(idx))
                .unwrap_or(&Value::Null),
            _ => &Value::Null,
        };
    }

    current
}

fn text_or_none(value: &Value, path: &str) -> String {
    match get_nested_value(value, path) {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => NONE.to_string(),
    }
}

fn as_array<'a>(value: &'a Value, path: &str) -> &'a [Value] {
    get_nested_value(value, path)
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Render a string map as `k=v,k2=v2`, or `<none>` when empty
pub fn join_map(value: &Value) -> String {
    let pairs: Vec<String> = value
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(k, v)| format!("{}={}", k, v.as_str().unwrap_or_default()))
                .collect()
        })
        .unwrap_or_default();

    if pairs.is_empty() {
        NONE.to_string()
    } else {
        pairs.join(",")
    }
}

fn count_keys(value: &Value, fields: &[&str]) -> usize {
    fields
        .iter()
        .filter_map(|f| value.get(*f).and_then(Value::as_object))
        .map(|m| m.len())
        .sum()
}

fn age(value: &Value, now: DateTime<Utc>) -> String {
    get_nested_value(value, "metadata.creationTimestamp")
        .as_str()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|created| human_duration(now.signed_duration_since(created.with_timezone(&Utc))))
        .unwrap_or_else(|| "<unknown>".to_string())
}

/// Short age string in the style kubectl prints (`45s`, `5m10s`, `3h`, `12d`)
pub fn human_duration(d: chrono::Duration) -> String {
    let secs = d.num_seconds();
    if secs < -1 {
        return "<invalid>".to_string();
    }
    if secs < 0 {
        return "0s".to_string();
    }

    let minutes = secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let years = days / 365;

    let pair = |major: i64, major_unit: &str, minor: i64, minor_unit: &str| {
        if minor == 0 {
            format!("{}{}", major, major_unit)
        } else {
            format!("{}{}{}{}", major, major_unit, minor, minor_unit)
        }
    };

    if secs < 60 * 2 {
        format!("{}s", secs)
    } else if minutes < 10 {
        pair(minutes, "m", secs % 60, "s")
    } else if minutes < 60 * 3 {
        format!("{}m", minutes)
    } else if hours < 8 {
        pair(hours, "h", minutes % 60, "m")
    } else if hours < 48 {
        format!("{}h", hours)
    } else if hours < 24 * 8 {
        pair(days, "d", hours % 24, "h")
    } else if days < 365 * 2 {
        format!("{}d", days)
    } else if days < 365 * 8 {
        pair(years, "y", days % 365, "d")
    } else {
        format!("{}y", years)
    }
}

fn pod_ready(value: &Value) -> String {
    let total = as_array(value, "spec.containers").len();
    let ready = as_array(value, "status.containerStatuses")
        .iter()
        .filter(|cs| cs.get("ready").and_then(Value::as_bool).unwrap_or(false))
        .count();
    format!("{}/{}", ready, total)
}

fn pod_status(value: &Value) -> String {
    if !get_nested_value(value, "metadata.deletionTimestamp").is_null() {
        return "Terminating".to_string();
    }

    // A waiting or terminated container explains more than the pod phase
    for cs in as_array(value, "status.containerStatuses") {
        for state in ["waiting", "terminated"] {
            let path = format!("state.{}.reason", state);
            if let Some(reason) = get_nested_value(cs, &path).as_str()
                && !reason.is_empty()
            {
                return reason.to_string();
            }
        }
    }

    ["status.reason", "status.phase"]
        .iter()
        .filter_map(|p| get_nested_value(value, p).as_str())
        .find(|s| !s.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

fn pod_restarts(value: &Value) -> String {
    as_array(value, "status.containerStatuses")
        .iter()
        .filter_map(|cs| cs.get("restartCount").and_then(Value::as_i64))
        .sum::<i64>()
        .to_string()
}

fn node_status(value: &Value) -> String {
    let ready = as_array(value, "status.conditions")
        .iter()
        .find(|c| c.get("type").and_then(Value::as_str) == Some("Ready"))
        .and_then(|c| c.get("status").and_then(Value::as_str));

    let mut status = match ready {
        Some("True") => "Ready",
        Some(_) => "NotReady",
        None => "Unknown",
    }
    .to_string();

    if get_nested_value(value, "spec.unschedulable").as_bool() == Some(true) {
        status.push_str(",SchedulingDisabled");
    }
    status
}

fn node_roles(value: &Value) -> String {
    let mut roles: Vec<&str> = get_nested_value(value, "metadata.labels")
        .as_object()
        .map(|labels| {
            labels
                .iter()
                .filter_map(|(k, v)| {
                    if let Some(role) = k.strip_prefix("node-role.kubernetes.io/") {
                        Some(role)
                    } else if k == "kubernetes.io/role" {
                        v.as_str()
                    } else {
                        None
                    }
                })
                .filter(|r| !r.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if roles.is_empty() {
        return NONE.to_string();
    }
    roles.sort_unstable();
    roles.dedup();
    roles.join(",")
}

fn node_internal_ip(value: &Value) -> String {
    as_array(value, "status.addresses")
        .iter()
        .find(|a| a.get("type").and_then(Value::as_str) == Some("InternalIP"))
        .and_then(|a| a.get("address").and_then(Value::as_str))
        .unwrap_or(NONE)
        .to_string()
}

fn service_type(value: &Value) -> &str {
    get_nested_value(value, "spec.type")
        .as_str()
        .unwrap_or("ClusterIP")
}

fn service_external_ip(value: &Value) -> String {
    let mut ips: Vec<&str> = as_array(value, "status.loadBalancer.ingress")
        .iter()
        .filter_map(|i| {
            i.get("ip")
                .and_then(Value::as_str)
                .or_else(|| i.get("hostname").and_then(Value::as_str))
        })
        .collect();
    ips.extend(
        as_array(value, "spec.externalIPs")
            .iter()
            .filter_map(Value::as_str),
    );

    if !ips.is_empty() {
        return ips.join(",");
    }
    match service_type(value) {
        "LoadBalancer" => "<pending>".to_string(),
        "ExternalName" => text_or_none(value, "spec.externalName"),
        _ => NONE.to_string(),
    }
}

fn service_ports(value: &Value) -> String {
    let ports: Vec<String> = as_array(value, "spec.ports")
        .iter()
        .map(|p| {
            let port = p.get("port").and_then(Value::as_i64).unwrap_or_default();
            let protocol = p.get("protocol").and_then(Value::as_str).unwrap_or("TCP");
            match p.get("nodePort").and_then(Value::as_i64) {
                Some(node_port) => format!("{}:{}/{}", port, node_port, protocol),
                None => format!("{}/{}", port, protocol),
            }
        })
        .collect();

    if ports.is_empty() {
        NONE.to_string()
    } else {
        ports.join(",")
    }
}

/// At most this many endpoints are listed before summarizing the rest
const MAX_LISTED_ENDPOINTS: usize = 3;

fn endpoints(value: &Value) -> String {
    let mut list = Vec::new();
    for subset in as_array(value, "subsets") {
        let ports = as_array(subset, "ports");
        for address in as_array(subset, "addresses") {
            let ip = address.get("ip").and_then(Value::as_str).unwrap_or_default();
            if ports.is_empty() {
                list.push(ip.to_string());
            }
            for port in ports {
                let port = port.get("port").and_then(Value::as_i64).unwrap_or_default();
                list.push(format!("{}:{}", ip, port));
            }
        }
    }

    match list.len() {
        0 => NONE.to_string(),
        n if n <= MAX_LISTED_ENDPOINTS => list.join(","),
        n => format!(
            "{} + {} more...",
            list[..MAX_LISTED_ENDPOINTS].join(","),
            n - MAX_LISTED_ENDPOINTS
        ),
    }
}
