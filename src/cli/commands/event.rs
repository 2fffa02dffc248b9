//! Event command implementations.

use std::path::Path;

use chrono::{DateTime, FixedOffset};
use colored::Colorize;

use super::{export_and_report, runtime, HubContext};
use crate::api::HubClient;
use crate::cli::{EventCommands, HubArgs};
use crate::error::{Error, Result};
use crate::export::fetch_events;

/// Execute event commands.
pub fn execute(command: &EventCommands, hub: &HubArgs, json: bool) -> Result<()> {
    match command {
        EventCommands::Export {
            dir,
            from_date,
            to_date,
            force,
        } => export(dir, from_date.as_ref(), to_date.as_ref(), *force, hub, json),
    }
}

fn export(
    dir: &Path,
    from: Option<&DateTime<FixedOffset>>,
    to: Option<&DateTime<FixedOffset>>,
    force: bool,
    hub: &HubArgs,
    json: bool,
) -> Result<()> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(Error::InvalidArgument(
                "--from-date must not be after --to-date".to_string(),
            ));
        }
    }

    let ctx = HubContext::resolve(hub)?;
    let fetched = runtime()?.block_on(async {
        let client = HubClient::connect(&ctx.credentials, &ctx.endpoints).await?;
        fetch_events(&client, from, to).await
    })?;

    if !crate::is_quiet() {
        for dropped in &fetched.dropped {
            eprintln!(
                "{} Skipping event '{}': {}",
                "!".yellow(),
                dropped.name,
                dropped.error
            );
        }
    }

    export_and_report(dir, fetched.events, force, json)
}
