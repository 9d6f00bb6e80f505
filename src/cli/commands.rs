//! CLI command implementations
//!
//! Every command builds the registry (built-in types plus the configured
//! `schema_dir`), runs against it, and writes one JSON response to stdout.

use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{json, Value};

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{compute_derived, DeriveError, SchemaRegistry, SchemaValidator};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliErrorCode, CliError, CliResult};
use super::io::{read_document, write_error, write_response};

/// Parse arguments and run the selected command against stdin/stdout
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    let result = run_command(cli, &mut input, &mut out);
    if let Err(e) = &result {
        log_event_with_fields(Event::CommandFailed, &[("code", e.code_str()), ("message", e.message())]);
        // Rejected documents already produced their response.
        if e.code() != &CliErrorCode::DocumentInvalid {
            write_error(&mut out, e.code_str(), e.message())?;
        }
    }
    result
}

/// Run a parsed command with explicit input and output streams
pub fn run_command<R: Read, W: Write>(cli: Cli, input: &mut R, out: &mut W) -> CliResult<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let registry = build_registry(&config)?;

    match cli.command {
        Command::Types => types(&registry, out),
        Command::Schema { document_type } => schema(&registry, &document_type, out),
        Command::Validate {
            document_type,
            input: path,
            derive,
        } => {
            let document = read_document(path.as_deref(), input)?;
            validate(&registry, &config, &document_type, &document, derive, out)
        }
        Command::Derive {
            document_type,
            input: path,
        } => {
            let document = read_document(path.as_deref(), input)?;
            derive(&registry, &document_type, &document, out)
        }
        Command::Export { dir } => export(&registry, &dir, out),
    }
}

/// Load a config file and apply its log level before anything is logged
pub fn load_config(path: &Path) -> CliResult<Config> {
    let config = Config::load(path)?;
    Logger::set_min_severity(config.log_severity()?);

    let path_display = path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", path_display.as_str())]);
    Ok(config)
}

/// Built-in types plus any descriptors under the configured `schema_dir`
pub fn build_registry(config: &Config) -> CliResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::builtin()?;
    if let Some(dir) = &config.schema_dir {
        registry.load_dir(dir)?;
    }
    Ok(registry)
}

/// List registered document types
pub fn types<W: Write>(registry: &SchemaRegistry, out: &mut W) -> CliResult<()> {
    let types: Vec<Value> = registry
        .all_schemas()
        .map(|s| json!({ "name": s.name, "title": s.title, "fields": s.fields.len() }))
        .collect();
    write_response(out, json!({ "types": types }))
}

/// Print one descriptor
pub fn schema<W: Write>(registry: &SchemaRegistry, document_type: &str, out: &mut W) -> CliResult<()> {
    let schema = registry.get_schema(document_type)?;
    write_response(out, serde_json::to_value(schema)?)
}

/// Validate a document, optionally recomputing derived fields first.
///
/// Writes the result either way; returns `DocumentInvalid` when the
/// document has violations.
pub fn validate<W: Write>(
    registry: &SchemaRegistry,
    config: &Config,
    document_type: &str,
    document: &Value,
    derive: bool,
    out: &mut W,
) -> CliResult<()> {
    let schema = registry.get_schema(document_type)?;

    // An undefined derivation is reported by the validator itself.
    let document = if derive {
        match compute_derived(document, schema) {
            Ok(derived) => derived,
            Err(e @ DeriveError::Undefined { .. }) => {
                log_undefined(document_type, &e);
                document.clone()
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        document.clone()
    };

    let result = SchemaValidator::new(registry)
        .with_options(config.validation_options())
        .validate_with(schema, &document);

    let count = result.violations().len().to_string();
    if result.is_valid() {
        log_event_with_fields(Event::DocumentValid, &[("schema", document_type)]);
    } else {
        log_event_with_fields(
            Event::DocumentInvalid,
            &[("schema", document_type), ("violations", count.as_str())],
        );
    }

    let messages: Vec<Value> = result
        .messages()
        .into_iter()
        .map(|(field, message)| json!({ "field": field, "message": message }))
        .collect();

    write_response(
        out,
        json!({
            "document_type": document_type,
            "valid": result.is_valid(),
            "result": result,
            "messages": messages,
            "document": document,
        }),
    )?;

    if result.is_valid() {
        Ok(())
    } else {
        Err(CliError::document_invalid(document_type, result.violations().len()))
    }
}

/// Print the document with derived fields recomputed
pub fn derive<W: Write>(
    registry: &SchemaRegistry,
    document_type: &str,
    document: &Value,
    out: &mut W,
) -> CliResult<()> {
    let schema = registry.get_schema(document_type)?;
    let derived = compute_derived(document, schema).map_err(|e| {
        log_undefined(document_type, &e);
        CliError::from(e)
    })?;

    log_event_with_fields(Event::DerivationComplete, &[("schema", document_type)]);
    write_response(out, json!({ "document_type": document_type, "document": derived }))
}

/// Write every registered descriptor to `dir`
pub fn export<W: Write>(registry: &SchemaRegistry, dir: &Path, out: &mut W) -> CliResult<()> {
    let mut written = Vec::new();
    for schema in registry.all_schemas() {
        let path = SchemaRegistry::save_schema(dir, schema)?;
        written.push(path.display().to_string());
    }

    let dir_display = dir.display().to_string();
    let count = written.len().to_string();
    log_event_with_fields(
        Event::SchemasExported,
        &[("dir", dir_display.as_str()), ("count", count.as_str())],
    );
    write_response(out, json!({ "files": written }))
}

fn log_undefined(document_type: &str, error: &DeriveError) {
    let message = error.to_string();
    log_event_with_fields(
        Event::DerivationUndefined,
        &[
            ("schema", document_type),
            ("field", error.field().unwrap_or("")),
            ("message", message.as_str()),
        ],
    );
}
