//! Validate a backend configuration file and print its normalized form.
//!
//! ```text
//! validate-config aer.yaml
//! validate-config --kind SeleneQuestConfig quest.json
//! BACKEND_SCHEMAS_UNKNOWN_FIELDS=reject validate-config config.json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use backend_config_schemas::{BackendConfig, Registry, SCHEMA_VERSION, SchemaError};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Validate a backend configuration document.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON or YAML configuration file.
    #[arg(value_name = "FILE", required_unless_present = "list_kinds")]
    input: Option<PathBuf>,

    /// Configuration kind; defaults to the document's `type` field.
    #[arg(long, env = "BACKEND_CONFIG_KIND")]
    kind: Option<String>,

    /// Print compact JSON.
    #[arg(long)]
    compact: bool,

    /// List registered kinds and exit.
    #[arg(long)]
    list_kinds: bool,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

fn load(path: &Path, kind: Option<&str>) -> Result<BackendConfig, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let registry = Registry::global();
    let config = match (kind, is_yaml(path)) {
        (Some(kind), true) => registry.resolve_yaml(kind, &text)?,
        (Some(kind), false) => registry.resolve_json(kind, &text)?,
        (None, true) => BackendConfig::from_yaml(&text)?,
        (None, false) => BackendConfig::from_json(&text)?,
    };
    Ok(config)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let Some(input) = args.input.as_deref().filter(|_| !args.list_kinds) else {
        for kind in Registry::global().kinds() {
            println!("{kind}");
        }
        return ExitCode::SUCCESS;
    };

    let config = match load(input, args.kind.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            if let Some(SchemaError::Validation { issues, .. }) = err.downcast_ref::<SchemaError>() {
                for issue in issues {
                    eprintln!("  - {issue}");
                }
            }
            return ExitCode::FAILURE;
        }
    };

    let value = match config.to_serializable() {
        Ok(value) => value,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let rendered = if args.compact {
        serde_json::to_string(&value)
    } else {
        serde_json::to_string_pretty(&value)
    };
    match rendered {
        Ok(text) => {
            println!("{text}");
            eprintln!("valid {} (schema {SCHEMA_VERSION})", config.kind());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
