// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! The `get` pipeline.
//!
//! Validate, resolve, query each kind, merge status, filter by namespace and
//! name, filter by selector, render. Each step returns its error straight
//! away; nothing is retried and nothing is printed until rendering succeeded.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{GetError, Result};
use crate::output::{self, FormatOptions, OutputFormat};
use crate::query::selector::LabelSelector;
use crate::query::{self, NamespaceScope, Reconstructor};
use crate::resources::{self, ALL, ResourceKind};
use crate::store::RecordStore;

/// Raw options as collected from the command line and config
#[derive(Debug, Clone)]
pub struct GetOptions {
    pub namespace: String,
    pub all_namespaces: bool,
    pub selector: String,
    pub output: String,
    pub no_headers: bool,
    pub show_labels: bool,
    pub database_path: PathBuf,
}

/// A validated request, ready to run against a store
#[derive(Debug, Clone)]
pub struct GetPlan {
    pub kinds: Vec<ResourceKind>,
    pub names: Vec<String>,
    pub scope: NamespaceScope,
    pub selector: LabelSelector,
    pub format: OutputFormat,
    pub no_headers: bool,
    pub show_labels: bool,
}

impl GetOptions {
    /// Check everything that can be checked without touching the store.
    ///
    /// `args` is the resource token followed by optional resource names.
    pub fn validate(&self, args: &[String]) -> Result<GetPlan> {
        let (token, names) = args.split_first().ok_or(GetError::MissingResourceType)?;
        let kinds = resources::resolve(token)?.to_vec();

        if token == ALL && !names.is_empty() {
            return Err(GetError::AllWithNames);
        }

        let format: OutputFormat = self.output.parse()?;
        let selector = LabelSelector::parse(&self.selector)?;

        let scope = if self.all_namespaces {
            NamespaceScope::All
        } else {
            NamespaceScope::Only(self.namespace.clone())
        };

        Ok(GetPlan {
            kinds,
            names: names.to_vec(),
            scope,
            selector,
            format,
            no_headers: self.no_headers,
            show_labels: self.show_labels,
        })
    }
}

impl GetPlan {
    /// Notice printed instead of an empty table
    pub fn no_resources_message(&self) -> String {
        match &self.scope {
            NamespaceScope::All => "No resources found".to_string(),
            NamespaceScope::Only(ns) => format!("No resources found in {} namespace.", ns),
        }
    }
}

/// Complete result of one `get` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOutput {
    /// Text for stdout
    pub rendered: String,
    /// Message for stderr, set when an empty json/yaml list was rendered
    pub notice: Option<String>,
}

/// Run a validated plan and return the complete output text
pub fn execute(store: &dyn RecordStore, plan: &GetPlan, now: DateTime<Utc>) -> Result<GetOutput> {
    let resources = Reconstructor::new(store).fetch_all(&plan.kinds, &plan.scope, &plan.names)?;
    let fetched = resources.len();

    let resources = query::filter_by_selector(resources, &plan.selector);
    info!(
        kinds = ?plan.kinds,
        fetched,
        selected = resources.len(),
        "Query complete"
    );

    if resources.is_empty() && plan.format.is_table() {
        return Ok(GetOutput {
            rendered: plan.no_resources_message(),
            notice: None,
        });
    }

    let options = FormatOptions {
        wide: plan.format == OutputFormat::Wide,
        no_headers: plan.no_headers,
        show_labels: plan.show_labels,
        now,
    };
    debug!(format = %plan.format, "Rendering");
    let rendered = output::render(plan.format, &resources, &options)?;

    // Structured output stays parseable; the notice goes to stderr instead
    let notice = resources.is_empty().then(|| plan.no_resources_message());
    Ok(GetOutput { rendered, notice })
}
