//! Command implementations.
//!
//! Shared plumbing for the commands lives here: resolving the hub
//! connection settings, building the runtime, and the export prompt and
//! summary used by both `item export` and `event export`.

pub mod completions;
pub mod event;
pub mod item;
pub mod version;

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tokio::runtime::Runtime;

use crate::cli::HubArgs;
use crate::config::{load_config, Credentials, Endpoints, HubmoveConfig};
use crate::error::{Error, Result};
use crate::export::{ExportOutcome, ExportRecord, ExportStats, ExportStatus, Exportable, Exporter};

/// Resolved settings for talking to the source hub.
#[derive(Debug, Clone)]
pub struct HubContext {
    pub config: HubmoveConfig,
    pub credentials: Credentials,
    pub endpoints: Endpoints,
}

impl HubContext {
    /// Merge flags and environment with the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable or a credential is
    /// missing everywhere.
    pub fn resolve(args: &HubArgs) -> Result<Self> {
        let config = load_config()?;
        let credentials = Credentials::resolve(
            args.hub_id.as_deref(),
            args.client_id.as_deref(),
            args.client_secret.as_deref(),
            &config,
        )?;
        let endpoints = Endpoints::resolve(args.api_url.as_deref(), args.auth_url.as_deref(), &config);

        Ok(Self {
            config,
            credentials,
            endpoints,
        })
    }
}

/// Runtime for one command. Network calls are awaited one at a time.
pub(crate) fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))
}

/// Ask on stderr whether the listed files may be overwritten.
fn confirm_overwrite<T: Exportable>(updated: &[&ExportRecord<T>]) -> Result<bool> {
    eprintln!(
        "{} {} previously exported file(s) will be overwritten:",
        "!".yellow().bold(),
        updated.len()
    );
    for record in updated {
        eprintln!("  {} ({})", record.filename.display(), record.entity.display_name());
    }
    eprint!("Continue? [y/N] ");
    io::stderr().flush()?;

    read_yes(&mut io::stdin().lock())
}

/// True only for an explicit "y" or "yes". End of input counts as no.
fn read_yes(input: &mut impl BufRead) -> Result<bool> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[derive(Serialize)]
struct ExportedFile<'a> {
    file: String,
    name: &'a str,
    status: ExportStatus,
}

#[derive(Serialize)]
struct ExportOutput<'a> {
    result: &'static str,
    dir: String,
    stats: ExportStats,
    files: Vec<ExportedFile<'a>>,
}

/// Run an export into `dir` and print its summary.
///
/// # Errors
///
/// Returns an error if the export fails or the summary cannot be printed.
pub(crate) fn export_and_report<T: Exportable>(
    dir: &Path,
    entities: Vec<T>,
    force: bool,
    json: bool,
) -> Result<()> {
    let exporter = Exporter::new(dir);
    let outcome = if force {
        exporter.export(entities, |_| Ok(true))?
    } else {
        exporter.export(entities, confirm_overwrite)?
    };

    let result = match &outcome {
        ExportOutcome::NothingToExport => "nothing_to_export",
        ExportOutcome::Declined(_) => "cancelled",
        ExportOutcome::Written(_) => "exported",
    };

    if json {
        let output = ExportOutput {
            result,
            dir: dir.display().to_string(),
            stats: ExportStats::from_records(outcome.records()),
            files: outcome
                .records()
                .iter()
                .map(|r| ExportedFile {
                    file: r.filename.display().to_string(),
                    name: r.entity.display_name(),
                    status: r.status,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }
    if crate::is_quiet() {
        return Ok(());
    }

    match &outcome {
        ExportOutcome::NothingToExport => println!("Nothing to export."),
        ExportOutcome::Declined(_) => println!("Export cancelled; no files were written."),
        ExportOutcome::Written(records) => {
            for record in records {
                let label = format!("{:<10}", record.status.as_str());
                let status = match record.status {
                    ExportStatus::Created => label.green(),
                    ExportStatus::Updated => label.yellow(),
                    ExportStatus::UpToDate => label.dimmed(),
                };
                let file = record.filename.file_name().map_or_else(
                    || record.filename.display().to_string(),
                    |f| f.to_string_lossy().into_owned(),
                );
                println!("  {status} {file}  {}", record.entity.display_name().dimmed());
            }
            let stats = ExportStats::from_records(records);
            println!();
            println!(
                "{} {} created, {} updated in {}",
                "✓".green(),
                stats.created,
                stats.updated,
                dir.display()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_yes_accepts_only_explicit_yes() {
        assert!(read_yes(&mut Cursor::new("y\n")).unwrap());
        assert!(read_yes(&mut Cursor::new("YES\n")).unwrap());
        assert!(!read_yes(&mut Cursor::new("\n")).unwrap());
        assert!(!read_yes(&mut Cursor::new("nope\n")).unwrap());
        assert!(!read_yes(&mut Cursor::new("")).unwrap());
    }
}
