pub mod config;
pub mod interval;
pub mod plan;

use std::path::Path;

use leavesync_core::SyncConfig;
use serde::Serialize;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn read_file(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()).into())
}

fn print_json<T: Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Config at `path`, or at the default location when none is given.
fn load_config(path: Option<&Path>) -> Result<SyncConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => SyncConfig::load(path)?,
        None => SyncConfig::load_or_default(&SyncConfig::default_path()?)?,
    };
    Ok(config)
}
