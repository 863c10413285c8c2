//! CLI command implementations
//!
//! The CLI is a one-shot administrative surface: `init` creates the data
//! directory layout and `setup` issues the provisioning sequence. Each
//! command loads the JSON config, performs one job, writes one JSON result
//! line to stdout, and exits.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::setup;
use crate::store::Database;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Collection the setup command targets (optional, default "animals")
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_collection() -> String {
    setup::OUTCOMES_COLLECTION.to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.data_dir.is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        if self.collection.is_empty() {
            return Err(CliError::config_error("collection must not be empty"));
        }
        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Setup { config, collection } => setup_cmd(&config, collection),
    }
}

/// Initialize a new arkdb data directory
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_dir = config.data_path();

    if Database::is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    Database::init_dirs(data_dir)
        .map_err(|e| CliError::config_error(format!("Failed to initialize: {}", e)))?;

    write_response(json!({"initialized": true}))?;

    Ok(())
}

/// Provision the outcomes collection: validator plus both indexes.
///
/// Creates the collection first when it does not exist yet, then issues
/// the administrative sequence. Engine failures abort with a non-zero
/// exit, carrying the engine's error code verbatim.
pub fn setup_cmd(config_path: &Path, collection: Option<String>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let collection = collection.unwrap_or_else(|| config.collection.clone());

    let mut db = open_db(&config)?;

    if db.collection(&collection).is_err() {
        db.create_collection(&collection)
            .map_err(|e| CliError::command_failed(e.to_string()))?;
    }

    let report = setup::provision(&mut db, &collection)
        .map_err(|e| CliError::command_failed(e.to_string()))?;

    let indexes: Vec<Value> = report
        .indexes
        .iter()
        .map(|(name, outcome)| {
            json!({
                "name": name,
                "created": *outcome == crate::index::CreateOutcome::Created
            })
        })
        .collect();

    write_response(json!({
        "collection": report.collection,
        "validator": "applied",
        "indexes": indexes
    }))?;

    Ok(())
}

/// Open the configured data directory
fn open_db(config: &Config) -> CliResult<Database> {
    let data_dir = config.data_path();

    if !Database::is_initialized(data_dir) {
        return Err(CliError::not_initialized());
    }

    Database::open(data_dir).map_err(|e| CliError::open_failed(format!("Open failed: {}", e)))
}
