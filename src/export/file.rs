//! File writes for exported entities.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Write content to a file atomically.
///
/// Writes to a sibling temp file, syncs it, then renames it over the
/// target. If any step fails the original file (if any) is untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Serialize an entity for export, without its top-level remote `id`.
///
/// # Errors
///
/// Returns an error if the entity cannot be serialized.
pub fn export_json<T: Serialize>(entity: &T) -> Result<String> {
    let mut value = serde_json::to_value(entity)?;
    if let Value::Object(map) = &mut value {
        map.remove("id");
    }
    let mut content = serde_json::to_string_pretty(&value)?;
    content.push('\n');
    Ok(content)
}
