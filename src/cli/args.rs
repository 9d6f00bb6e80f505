//! CLI argument definitions using clap
//!
//! Commands:
//! - product-schema types
//! - product-schema schema --type <name>
//! - product-schema validate --type <name> [--input <file>] [--derive]
//! - product-schema derive --type <name> [--input <file>]
//! - product-schema export --dir <dir>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Validate and derive product content documents
#[derive(Parser, Debug)]
#[command(name = "product-schema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered document types
    Types,

    /// Print a document type descriptor as JSON
    Schema {
        /// Document type name
        #[arg(long = "type", default_value = "product")]
        document_type: String,
    },

    /// Validate a JSON document read from a file or stdin
    Validate {
        /// Document type name
        #[arg(long = "type", default_value = "product")]
        document_type: String,

        /// Read the document from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,

        /// Recompute derived fields before validating
        #[arg(long)]
        derive: bool,
    },

    /// Print the document with derived fields recomputed
    Derive {
        /// Document type name
        #[arg(long = "type", default_value = "product")]
        document_type: String,

        /// Read the document from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Write every registered descriptor to a directory
    Export {
        /// Target directory
        #[arg(long)]
        dir: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
