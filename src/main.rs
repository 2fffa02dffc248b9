//! hubmove CLI entry point.

use clap::Parser;
use hubmove::cli::commands;
use hubmove::cli::{Cli, Commands};
use hubmove::error::Result;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.quiet {
        hubmove::QUIET.store(true, std::sync::atomic::Ordering::Relaxed);
    }

    init_tracing(cli.verbose, cli.quiet);

    let json = json_output(
        cli.json,
        cli.quiet,
        std::io::IsTerminal::is_terminal(&std::io::stdout()),
    );

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if let Some(hint) = e.hint() {
                eprintln!("Error: {e}\n  Hint: {hint}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// `--json` always wins. Otherwise output is JSON when stdout is not a
/// terminal, unless `--quiet` asked for no output at all.
fn json_output(json_flag: bool, quiet: bool, stdout_is_terminal: bool) -> bool {
    json_flag || (!quiet && !stdout_is_terminal)
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,reqwest=info,hyper=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<()> {
    match &cli.command {
        Commands::Item { command } => commands::item::execute(command, &cli.hub, json),
        Commands::Event { command } => commands::event::execute(command, &cli.hub, json),
        Commands::Version => commands::version::execute(json),
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}

#[cfg(test)]
mod tests {
    use super::json_output;

    #[test]
    fn test_json_output_resolution() {
        assert!(json_output(true, false, true));
        assert!(json_output(true, true, false));
        assert!(json_output(false, false, false));
        assert!(!json_output(false, false, true));
        assert!(!json_output(false, true, false));
    }
}
