//! Reconciling fetched entities with a directory of earlier exports.
//!
//! The directory is the index: every `*.json` file in it is read back at
//! the start of an export, and fetched entities are matched to files by
//! remote ID. Matching never inspects content, so a matched entity is
//! always treated as changed.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{ExportRecord, ExportStatus, Exportable};
use crate::error::Result;

/// Files found in an export directory and the remote IDs they hold.
#[derive(Debug)]
pub struct ExportedEntityIndex<T> {
    /// Every `*.json` file present, readable or not.
    files: BTreeSet<PathBuf>,
    by_id: HashMap<String, PathBuf>,
    _entity: PhantomData<T>,
}

impl<T: Exportable> ExportedEntityIndex<T> {
    /// Read every `*.json` file directly inside `dir`.
    ///
    /// A missing directory yields an empty index. Files that do not parse
    /// as `T` are kept as taken names but not indexed.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` exists but cannot be listed.
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut index = Self {
            files: BTreeSet::new(),
            by_id: HashMap::new(),
            _entity: PhantomData,
        };

        if !dir.is_dir() {
            return Ok(index);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                index.files.insert(path);
            }
        }

        for path in &index.files {
            let parsed = fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|content| serde_json::from_str::<T>(&content).map_err(|e| e.to_string()));

            match parsed {
                Ok(entity) => {
                    if let Some(id) = entity.remote_id() {
                        index
                            .by_id
                            .entry(id.to_string())
                            .or_insert_with(|| path.clone());
                    }
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable export file"),
            }
        }

        debug!(dir = %dir.display(), files = index.files.len(), indexed = index.by_id.len(), "Scanned export directory");
        Ok(index)
    }

    /// File holding the entity with this remote ID, if any.
    #[must_use]
    pub fn path_for_id(&self, id: &str) -> Option<&Path> {
        self.by_id.get(id).map(PathBuf::as_path)
    }

    #[must_use]
    pub fn files(&self) -> &BTreeSet<PathBuf> {
        &self.files
    }
}

/// Turn a display name into a safe file stem.
///
/// Characters outside `[A-Za-z0-9 ._-]` become `_`; an empty result
/// becomes `unnamed`.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.trim_matches(['.', ' ']).to_string();
    if sanitized.is_empty() {
        "unnamed".to_string()
    } else {
        sanitized
    }
}

/// First of `<stem>.json`, `<stem>-1.json`, `<stem>-2.json`, ... not in `taken`.
#[must_use]
pub fn unique_filename(dir: &Path, stem: &str, taken: &HashSet<PathBuf>) -> PathBuf {
    let first = dir.join(format!("{stem}.json"));
    if !taken.contains(&first) {
        return first;
    }

    (1..)
        .map(|n| dir.join(format!("{stem}-{n}.json")))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(first)
}

/// Classify each entity against the index, in input order.
///
/// Unmatched entities get a fresh filename, reserved immediately so no
/// later entity in the batch can take it. A matched entity keeps its file
/// unless an earlier entity in the batch already claimed it, in which case
/// it is treated as new.
pub fn classify<T: Exportable>(
    dir: &Path,
    index: &ExportedEntityIndex<T>,
    entities: Vec<T>,
) -> Vec<ExportRecord<T>> {
    let mut taken: HashSet<PathBuf> = index.files().iter().cloned().collect();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    entities
        .into_iter()
        .map(|entity| {
            let existing = entity
                .remote_id()
                .and_then(|id| index.path_for_id(id))
                .map(Path::to_path_buf)
                .filter(|path| {
                    let first = claimed.insert(path.clone());
                    if !first {
                        warn!(
                            id = entity.remote_id().unwrap_or_default(),
                            file = %path.display(),
                            "Remote ID repeated in one export; writing a new file"
                        );
                    }
                    first
                });

            match existing {
                Some(filename) => ExportRecord {
                    filename,
                    status: ExportStatus::Updated,
                    entity,
                },
                None => {
                    let filename =
                        unique_filename(dir, &sanitize_filename(entity.display_name()), &taken);
                    taken.insert(filename.clone());
                    ExportRecord {
                        filename,
                        status: ExportStatus::Created,
                        entity,
                    }
                }
            }
        })
        .collect()
}
