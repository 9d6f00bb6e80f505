//! CLI module
//!
//! Provides command-line interface for:
//! - types: list registered document types
//! - schema: print a descriptor
//! - validate: validate a document
//! - derive: recompute derived fields
//! - export: write descriptors to disk

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{build_registry, derive, export, load_config, run, run_command, schema, types, validate};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_document, write_error, write_response};
