// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "edgeadm")]
#[command(author, version, about = "Inspect resources in an edge node's local database")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print resources stored in the local database of the edge node
    #[command(after_help = GET_EXAMPLES)]
    Get(GetArgs),
}

const GET_EXAMPLES: &str = "\
Examples:
  # List pods in every namespace
  edgeadm get pod -A

  # List pods in namespace test
  edgeadm get pod -n test

  # Show one configmap as yaml
  edgeadm get configmap web -n default -o yaml

  # Everything the edge node knows about
  edgeadm get all -o yaml";

#[derive(clap::Args, Debug, Clone)]
pub struct GetArgs {
    /// Resource type (pod, node, service, secret, configmap, endpoints or all)
    /// followed by optional resource names
    #[arg(value_name = "TYPE [NAME...]", num_args = 0..)]
    pub resources: Vec<String>,

    /// Namespace to list resources from (default: "default")
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// List resources across all namespaces
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Label selector, supports '=', '==' and '!=' (e.g. -l key1=value1,key2!=value2)
    #[arg(short = 'l', long, default_value = "")]
    pub selector: String,

    /// Output format: yaml|json|wide (default: table)
    #[arg(short, long, default_value = "")]
    pub output: String,

    /// Path of the edge node database
    #[arg(short, long, env = "EDGEADM_DB", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Omit column headers in table output
    #[arg(long)]
    pub no_headers: bool,

    /// Show all labels as the last column
    #[arg(long)]
    pub show_labels: bool,
}
