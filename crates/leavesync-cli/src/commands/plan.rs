use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::Args;
use leavesync_core::{
    ApplyReport, BookingId, CachedWorkingTime, ConfiguredWorkingTime, MemorySink, Normalizer,
    Skip, SourceRecord, StoredBooking, SyncPlan, TargetBooking,
};
use serde::Serialize;
use tracing::info;

use super::{load_config, print_json, read_file, CommandResult};

#[derive(Args)]
pub struct PlanArgs {
    /// JSON list of raw HR leave records
    #[arg(long)]
    source: PathBuf,
    /// JSON list of raw target bookings
    #[arg(long)]
    target: PathBuf,
    /// Date that closes open-ended sicknesses (defaults to today)
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    plan: &'a SyncPlan,
    skipped: Vec<Skip>,
    report: ApplyReport,
    /// Bookings left in the local sink after a real run
    #[serde(skip_serializing_if = "Option::is_none")]
    bookings: Option<&'a BTreeMap<BookingId, StoredBooking>>,
}

pub fn run(args: PlanArgs, config_path: Option<&Path>) -> CommandResult {
    let config = load_config(config_path)?;
    let records: Vec<SourceRecord> = serde_json::from_str(&read_file(&args.source)?)?;
    let bookings: Vec<TargetBooking> = serde_json::from_str(&read_file(&args.target)?)?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let normalizer = Normalizer::new(&config);
    let mut working_time = CachedWorkingTime::new(ConfiguredWorkingTime::new(&config));

    let source = normalizer.normalize_source(&records, as_of);
    let target = normalizer.normalize_target(&bookings, &mut working_time);
    let plan = SyncPlan::build(&config, &source.people, &target.people, &mut working_time);
    info!(actions = plan.actions.len(), unmatched = plan.unmatched.len(), "plan built");

    // The sink is local: a real run only changes this copy of the target bookings.
    let mut sink = MemorySink::from_bookings(&bookings);
    let report = plan.apply(&mut sink, config.dry_run)?;

    let mut skipped = source.skipped;
    skipped.extend(target.skipped);
    print_json(&PlanOutput {
        plan: &plan,
        skipped,
        report,
        bookings: (!config.dry_run).then(|| sink.bookings()),
    })
}
