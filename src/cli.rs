//! CLI definitions for drydock
//!
//! This module contains all CLI argument parsing structures using clap.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "drydock",
    version,
    about = "Git service registry and promotion workflow derivation",
    long_about = "Resolves the API dialect of git hosting services, keeps their\nrecords consistent, and derives default promotion workflows."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage git service records
    Git {
        #[command(subcommand)]
        command: GitCommands,
    },

    /// Inspect promotion workflows
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },
}

#[derive(Subcommand)]
pub enum GitCommands {
    /// Resolve the git kind of a host URL
    Resolve {
        /// Git host URL, e.g. https://gitlab.example.com
        url: String,

        /// Namespace holding the git service records
        #[arg(long, env = "DRYDOCK_NAMESPACE", default_value = "default")]
        namespace: String,
    },

    /// Register a git host, creating or updating its record
    Ensure {
        /// Git host URL
        url: String,

        /// Git kind of the host, e.g. gitlab or bitbucketserver
        #[arg(long)]
        kind: String,

        /// Record name (derived from the URL host when omitted)
        #[arg(long, default_value = "")]
        name: String,

        /// Namespace holding the git service records
        #[arg(long, env = "DRYDOCK_NAMESPACE", default_value = "default")]
        namespace: String,
    },
}

#[derive(Subcommand)]
pub enum WorkflowCommands {
    /// Print a workflow, deriving the default when it is not stored
    Get {
        /// Workflow name (the default workflow when omitted)
        #[arg(default_value = "")]
        name: String,

        /// Namespace holding the workflow and environment records
        #[arg(long, env = "DRYDOCK_NAMESPACE", default_value = "default")]
        namespace: String,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        output: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}
