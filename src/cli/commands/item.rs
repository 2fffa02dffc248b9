//! Item command implementations: move (and revert), copy, export.

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use super::{export_and_report, runtime, HubContext};
use crate::action_log::{ActionKind, FileLog};
use crate::api::{list_all, ContentApi, HubClient};
use crate::cli::{CopyArgs, HubArgs, ItemCommands, MoveArgs};
use crate::config::{default_log_path, Credentials};
use crate::error::{Error, Result};
use crate::migrate::{
    move_items, revert_move, CopyCollaborator, CopyOptions, HubCopier, HubImportRevert, MoveReport,
    RevertReport,
};

/// Execute item commands.
pub fn execute(command: &ItemCommands, hub: &HubArgs, json: bool) -> Result<()> {
    match command {
        ItemCommands::Move(args) => move_cmd(args, hub, json),
        ItemCommands::Copy(args) => copy_cmd(args, hub, json),
        ItemCommands::Export {
            dir,
            repo_id,
            force,
        } => export_cmd(dir, repo_id, *force, hub, json),
    }
}

fn copy_options(args: &CopyArgs) -> Result<CopyOptions> {
    let destination_repository = args
        .dst_repo_id
        .clone()
        .ok_or_else(|| Error::InvalidArgument("--dst-repo-id is required".to_string()))?;

    if args.ids.is_empty() && args.repo_id.is_none() {
        return Err(Error::InvalidArgument(
            "select items with --repo-id or --id".to_string(),
        ));
    }

    Ok(CopyOptions {
        source_repository: args.repo_id.clone(),
        ids: args.ids.clone(),
        destination_repository,
    })
}

fn destination_of(ctx: &HubContext, args: &CopyArgs) -> Credentials {
    ctx.credentials.destination(
        args.dst_hub_id.as_deref(),
        args.dst_client_id.as_deref(),
        args.dst_client_secret.as_deref(),
    )
}

fn log_path_for(ctx: &HubContext, args: &CopyArgs, action: &str) -> PathBuf {
    args.log_file
        .clone()
        .unwrap_or_else(|| default_log_path("item", action, &ctx.config))
}

/// Connect to the destination hub, unless it is the source hub with the
/// same credentials, in which case the source client is reused.
async fn connect_destination(
    ctx: &HubContext,
    destination: &Credentials,
) -> Result<Option<HubClient>> {
    if *destination == ctx.credentials {
        return Ok(None);
    }
    HubClient::connect(destination, &ctx.endpoints).await.map(Some)
}

// ============================================================================
// Move
// ============================================================================

fn move_cmd(args: &MoveArgs, hub: &HubArgs, json: bool) -> Result<()> {
    let ctx = HubContext::resolve(hub)?;
    let destination = destination_of(&ctx, &args.copy);

    if let Some(log_path) = &args.revert {
        return revert_cmd(&ctx, &destination, log_path, json);
    }

    let options = copy_options(&args.copy)?;
    let log_path = log_path_for(&ctx, &args.copy, "move");

    let report = runtime()?.block_on(async {
        let source = HubClient::connect(&ctx.credentials, &ctx.endpoints).await?;
        let dest_client = connect_destination(&ctx, &destination).await?;
        let copier = HubCopier::new(&source, dest_client.as_ref().unwrap_or(&source));

        let mut log = FileLog::create(&log_path, "item move");
        Ok::<_, Error>(move_items(&source, &copier, &options, &mut log).await)
    })?;

    print_move_report(&report, &log_path, json)?;

    if report.is_aborted() {
        return Err(Error::CopyFailed {
            log_path: Some(log_path),
        });
    }
    Ok(())
}

#[derive(Serialize)]
struct MoveOutput<'a> {
    #[serde(flatten)]
    report: &'a MoveReport,
    log_file: String,
}

fn print_move_report(report: &MoveReport, log_path: &Path, json: bool) -> Result<()> {
    if json {
        let output = MoveOutput {
            report,
            log_file: log_path.display().to_string(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }
    if crate::is_quiet() {
        return Ok(());
    }

    if report.is_aborted() {
        println!(
            "{} Copy failed after {} item(s); no source item was archived.",
            "✗".red(),
            report.copied.len()
        );
    } else {
        println!(
            "{} Moved {} item(s) ({} already archived)",
            "✓".green(),
            report.moved.len(),
            report.already_archived.len()
        );
        for failure in &report.failed {
            println!("  {} {}: {}", "!".yellow(), failure.id, failure.error);
        }
    }
    println!("  Log: {}", log_path.display());
    Ok(())
}

// ============================================================================
// Revert
// ============================================================================

fn revert_cmd(
    ctx: &HubContext,
    destination: &Credentials,
    log_path: &Path,
    json: bool,
) -> Result<()> {
    // Fail on an unreadable log before connecting anywhere.
    FileLog::load_from_file(log_path)?;

    let report = runtime()?.block_on(async {
        let source = HubClient::connect(&ctx.credentials, &ctx.endpoints).await?;
        let import_revert = HubImportRevert::new(ctx.endpoints.clone());
        revert_move(&source, &import_revert, log_path, destination).await
    })?;

    print_revert_report(&report, json)?;

    if let Some(e) = report.destination_error {
        return Err(Error::RevertFailed(format!(
            "source items were restored but the destination revert failed: {e}"
        )));
    }
    Ok(())
}

fn print_revert_report(report: &RevertReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }
    if crate::is_quiet() {
        return Ok(());
    }

    println!("{} Restored {} item(s)", "✓".green(), report.restored.len());
    for skip in &report.skipped {
        println!("  {} {}: {}", "-".dimmed(), skip.id, skip.reason);
    }
    Ok(())
}

// ============================================================================
// Copy
// ============================================================================

#[derive(Serialize)]
struct CopyOutput {
    success: bool,
    copied: Vec<String>,
    created: Vec<String>,
    log_file: String,
}

fn copy_cmd(args: &CopyArgs, hub: &HubArgs, json: bool) -> Result<()> {
    let ctx = HubContext::resolve(hub)?;
    let destination = destination_of(&ctx, args);
    let options = copy_options(args)?;
    let log_path = log_path_for(&ctx, args, "copy");

    let (outcome, created) = runtime()?.block_on(async {
        let source = HubClient::connect(&ctx.credentials, &ctx.endpoints).await?;
        let dest_client = connect_destination(&ctx, &destination).await?;
        let copier = HubCopier::new(&source, dest_client.as_ref().unwrap_or(&source));

        let mut log = FileLog::create(&log_path, "item copy");
        let outcome = copier.copy(&options, &mut log).await;
        let created: Vec<String> = log
            .get_data(&ActionKind::Create)
            .into_iter()
            .map(str::to_string)
            .collect();
        log.close()?;
        Ok::<_, Error>((outcome, created))
    })?;

    info!(copied = outcome.exported_ids.len(), success = outcome.success, "Copy finished");

    if json {
        let output = CopyOutput {
            success: outcome.success,
            copied: outcome.exported_ids.clone(),
            created,
            log_file: log_path.display().to_string(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if !crate::is_quiet() {
        let mark = if outcome.success { "✓".green() } else { "✗".red() };
        println!("{mark} Copied {} item(s)", outcome.exported_ids.len());
        println!("  Log: {}", log_path.display());
    }

    if outcome.success {
        Ok(())
    } else {
        Err(Error::CopyFailed {
            log_path: Some(log_path),
        })
    }
}

// ============================================================================
// Export
// ============================================================================

fn export_cmd(dir: &Path, repo_id: &str, force: bool, hub: &HubArgs, json: bool) -> Result<()> {
    let ctx = HubContext::resolve(hub)?;

    let items = runtime()?.block_on(async {
        let client = HubClient::connect(&ctx.credentials, &ctx.endpoints).await?;
        list_all(|page| client.list_content_items(repo_id, page)).await
    })?;
    info!(count = items.len(), repository = repo_id, "Fetched content items");

    export_and_report(dir, items, force, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_options_requires_destination() {
        let args = CopyArgs {
            repo_id: Some("src".to_string()),
            ..CopyArgs::default()
        };
        assert!(matches!(copy_options(&args), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_copy_options_requires_selection() {
        let args = CopyArgs {
            dst_repo_id: Some("dst".to_string()),
            ..CopyArgs::default()
        };
        assert!(matches!(copy_options(&args), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_copy_options_from_ids() {
        let args = CopyArgs {
            ids: vec!["a".to_string()],
            dst_repo_id: Some("dst".to_string()),
            ..CopyArgs::default()
        };
        let options = copy_options(&args).unwrap();
        assert_eq!(options.ids, vec!["a"]);
        assert_eq!(options.destination_repository, "dst");
        assert!(options.source_repository.is_none());
    }
}
