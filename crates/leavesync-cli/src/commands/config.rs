use std::path::{Path, PathBuf};

use clap::Subcommand;
use leavesync_core::SyncConfig;

use super::{load_config, print_json, CommandResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective config as JSON
    Show,
    /// Print the config file location
    Path,
    /// Validate the config file
    Check,
    /// Write the default config
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn resolve(path: Option<&Path>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(SyncConfig::default_path()?),
    }
}

pub fn run(action: ConfigAction, path: Option<&Path>) -> CommandResult {
    match action {
        ConfigAction::Show => {
            print_json(&load_config(path)?)?;
        }
        ConfigAction::Path => {
            println!("{}", resolve(path)?.display());
        }
        ConfigAction::Check => {
            load_config(path)?;
            println!("ok");
        }
        ConfigAction::Init { force } => {
            let path = resolve(path)?;
            if path.exists() && !force {
                return Err(format!("{} already exists (use --force)", path.display()).into());
            }
            SyncConfig::default().save(&path)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
