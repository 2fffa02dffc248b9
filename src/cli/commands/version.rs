//! Version command implementation.

use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    name: &'a str,
    version: &'a str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if json {
        let output = VersionOutput {
            name: "hubmove",
            version,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("hubmove {version}");
    Ok(())
}
