use std::path::{Path, PathBuf};

use clap::Args;
use leavesync_core::record::collection_from_json;
use leavesync_core::{ChangeOptions, IntervalCollection};

use super::{print_json, read_file, CommandResult};

#[derive(Args)]
pub struct InputArgs {
    /// JSON list of interval records
    #[arg(long)]
    input: PathBuf,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Collection to bring the baseline in line with
    #[arg(long)]
    ours: PathBuf,
    /// Baseline collection
    #[arg(long)]
    theirs: PathBuf,
    /// Compress `ours` before diffing
    #[arg(long)]
    compress: bool,
    /// Split half days in `ours` before diffing (after compressing)
    #[arg(long)]
    split_half_days: bool,
}

#[derive(Args)]
pub struct UnionArgs {
    #[arg(long)]
    first: PathBuf,
    #[arg(long)]
    second: PathBuf,
    /// Compress the combined collection
    #[arg(long)]
    compress: bool,
}

fn load(path: &Path) -> Result<IntervalCollection, Box<dyn std::error::Error>> {
    Ok(collection_from_json(&read_file(path)?)?)
}

pub fn compress(args: InputArgs) -> CommandResult {
    print_json(&load(&args.input)?.compress())
}

pub fn split(args: InputArgs) -> CommandResult {
    print_json(&load(&args.input)?.split_half_days())
}

pub fn diff(args: DiffArgs) -> CommandResult {
    let ours = load(&args.ours)?;
    let theirs = load(&args.theirs)?;
    let options = ChangeOptions::new(args.compress, args.split_half_days);

    print_json(&ours.changes_from(&theirs, options))
}

pub fn union(args: UnionArgs) -> CommandResult {
    let combined = load(&args.first)?.union(&load(&args.second)?);
    if args.compress {
        print_json(&combined.compress())
    } else {
        print_json(&combined)
    }
}
