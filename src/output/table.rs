// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::borrow::Cow;
use std::collections::BTreeMap;

use comfy_table::{Table, presets::NOTHING};

use super::{FormatOptions, OutputFormatter};
use crate::error::Result;
use crate::query::MergedResource;
use crate::resources::ResourceKind;
use crate::resources::columns::{self, Column};

/// Maximum width of free-form columns in the narrow table
const MAX_FREEFORM_COLUMN_WIDTH: usize = 60;

/// Columns that get truncated unless `-o wide` is used
const FREEFORM_COLUMNS: &[&str] = &["LABELS", "ENDPOINTS"];

/// Gap between columns, matching kubectl's tabwriter
const COLUMN_GAP: u16 = 3;

/// Truncate a string to max_len chars, adding "..." if truncated
fn truncate_value(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        Cow::Borrowed(s)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        Cow::Owned(format!("{}...", truncated))
    }
}

pub struct TableFormatter;

impl OutputFormatter for TableFormatter {
    fn format(resources: &[MergedResource], options: &FormatOptions) -> Result<String> {
        // Grouped by kind so tables never interleave, whatever the fetch order
        let mut groups: BTreeMap<ResourceKind, Vec<&MergedResource>> = BTreeMap::new();
        for resource in resources {
            groups.entry(resource.kind).or_default().push(resource);
        }

        let qualify_names = groups.len() > 1;
        let tables: Vec<String> = groups
            .into_iter()
            .map(|(kind, group)| format_kind(kind, &group, options, qualify_names))
            .collect();

        Ok(tables.join("\n\n"))
    }
}

fn format_kind(
    kind: ResourceKind,
    resources: &[&MergedResource],
    options: &FormatOptions,
    qualify_names: bool,
) -> String {
    let spec = kind.spec();
    let mut kind_columns: Vec<&Column> = spec.columns.iter().collect();
    if options.wide {
        kind_columns.extend(spec.wide_columns);
    }

    let mut headers: Vec<&str> = Vec::new();
    if spec.namespaced {
        headers.push("NAMESPACE");
    }
    headers.push("NAME");
    headers.extend(kind_columns.iter().map(|c| c.header));
    if options.show_labels {
        headers.push("LABELS");
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    if !options.no_headers {
        table.set_header(&headers);
    }

    for resource in resources {
        let mut cells: Vec<String> = Vec::with_capacity(headers.len());
        if spec.namespaced {
            cells.push(resource.namespace().to_string());
        }
        cells.push(if qualify_names {
            format!("{}/{}", spec.canonical, resource.name())
        } else {
            resource.name().to_string()
        });
        cells.extend(
            kind_columns
                .iter()
                .map(|c| (c.value)(&resource.value, options.now)),
        );
        if options.show_labels {
            let labels = resource
                .value
                .get("metadata")
                .and_then(|m| m.get("labels"))
                .unwrap_or(&serde_json::Value::Null);
            cells.push(columns::join_map(labels));
        }

        let cells: Vec<Cow<'_, str>> = cells
            .iter()
            .zip(&headers)
            .map(|(val, header)| {
                if !options.wide && FREEFORM_COLUMNS.contains(header) {
                    truncate_value(val, MAX_FREEFORM_COLUMN_WIDTH)
                } else {
                    Cow::Borrowed(val.as_str())
                }
            })
            .collect();
        table.add_row(cells);
    }

    for column in table.column_iter_mut() {
        column.set_padding((0, COLUMN_GAP));
    }

    table
        .to_string()
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
