// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Rendering of reconstructed resources.
//!
//! Table output prints one table per kind. JSON and YAML wrap every resource in
//! a single `List` envelope.

mod json;
mod table;
mod yaml;

pub use json::JsonFormatter;
pub use table::TableFormatter;
pub use yaml::YamlFormatter;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::error::{GetError, Result};
use crate::query::MergedResource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Wide,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn is_table(self) -> bool {
        matches!(self, OutputFormat::Table | OutputFormat::Wide)
    }
}

impl FromStr for OutputFormat {
    type Err = GetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(OutputFormat::Table),
            "wide" => Ok(OutputFormat::Wide),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(GetError::UnsupportedOutputFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Wide => "wide",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub wide: bool,
    pub no_headers: bool,
    pub show_labels: bool,
    /// Reference time for AGE columns
    pub now: DateTime<Utc>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            wide: false,
            no_headers: false,
            show_labels: false,
            now: Utc::now(),
        }
    }
}

pub trait OutputFormatter {
    fn format(resources: &[MergedResource], options: &FormatOptions) -> Result<String>;
}

/// Render `resources` in `format`. Table columns follow `options.wide`.
pub fn render(
    format: OutputFormat,
    resources: &[MergedResource],
    options: &FormatOptions,
) -> Result<String> {
    match format {
        OutputFormat::Table | OutputFormat::Wide => TableFormatter::format(resources, options),
        OutputFormat::Json => JsonFormatter::format(resources, options),
        OutputFormat::Yaml => YamlFormatter::format(resources, options),
    }
}

/// Wrap resources in a `List` envelope, tagging each item with its
/// `apiVersion`, `kind` and the name taken from its key
pub fn to_list(resources: &[MergedResource]) -> Value {
    let items: Vec<Value> = resources.iter().map(tagged_item).collect();
    json!({
        "apiVersion": "v1",
        "kind": "List",
        "metadata": {"resourceVersion": ""},
        "items": items,
    })
}

fn tagged_item(resource: &MergedResource) -> Value {
    let spec = resource.kind.spec();
    let mut doc = resource.value.clone();
    if let Some(obj) = doc.as_object_mut() {
        obj.insert("apiVersion".to_string(), spec.api_version.into());
        obj.insert("kind".to_string(), spec.kind.into());
        let metadata = obj
            .entry("metadata")
            .or_insert_with(|| Value::Object(Default::default()));
        if let Some(metadata) = metadata.as_object_mut() {
            metadata.insert("name".to_string(), resource.name().into());
        }
    }
    doc
}
