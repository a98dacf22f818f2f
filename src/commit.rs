//! Applying an `EditPlan` to disk as one unit, and undoing the last applied plan.
//!
//! A commit first checks every target still holds the text the plan was computed from,
//! then records the originals in a journal, then replaces each file through a temp file
//! and rename. A failed write restores the files already replaced.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::content_hash::{hash_text, to_hex};
use crate::diagnostics::SwitchError;
use crate::rewrite::EditPlan;
use crate::state::state_dir;

const JOURNAL_FILE: &str = "journal.json";

#[derive(Debug, Serialize, Deserialize)]
struct Journal {
    network: String,
    files: Vec<JournalEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JournalEntry {
    path: PathBuf,
    original: String,
    /// Hash of the text the commit wrote, so revert can spot later edits.
    committed: String,
}

/// What a successful commit touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub network: String,
    pub files: Vec<PathBuf>,
}

fn journal_path(root: &Path) -> PathBuf {
    state_dir(root).join(JOURNAL_FILE)
}

pub fn has_journal(root: &Path) -> bool {
    journal_path(root).is_file()
}

/// Replace `path` with `text` via a sibling temp file and rename.
fn write_atomic(path: &Path, text: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.as_file().sync_all()?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn read_text(path: &Path) -> Result<String, SwitchError> {
    fs::read_to_string(path)
        .map_err(|e| SwitchError::commit(format!("failed to read {}: {e}", path.display()), path.to_path_buf()))
}

/// Commit `plan` for the workspace at `root`.
///
/// Either every file in the plan ends up with its new text, or none of them changes.
pub fn commit_plan(root: &Path, plan: &EditPlan, network: &str) -> Result<CommitReceipt, SwitchError> {
    // Phase 1: nothing is written unless every file is exactly what the plan saw.
    let mut originals = Vec::with_capacity(plan.len());
    for edit in plan.edits() {
        let current = read_text(&edit.path)?;
        if hash_text(&current) != edit.base_hash {
            return Err(SwitchError::StaleFile { path: edit.path.clone() });
        }
        originals.push(current);
    }

    // Phase 2: journal the originals so the commit can be reverted later.
    let journal = Journal {
        network: network.to_string(),
        files: plan
            .edits()
            .iter()
            .zip(&originals)
            .map(|(edit, original)| JournalEntry {
                path: edit.path.clone(),
                original: original.clone(),
                committed: to_hex(&hash_text(&edit.new_text)),
            })
            .collect(),
    };
    let journal_file = journal_path(root);
    write_journal(&journal_file, &journal)?;

    // Phase 3: replace files, rolling back on the first failure.
    for (index, edit) in plan.edits().iter().enumerate() {
        if let Err(e) = write_atomic(&edit.path, &edit.new_text) {
            warn!(path = %edit.path.display(), "write failed, rolling back {index} file(s)");
            for (done, original) in plan.edits()[..index].iter().zip(&originals) {
                if let Err(restore) = write_atomic(&done.path, original) {
                    warn!(path = %done.path.display(), "rollback failed: {restore}");
                }
            }
            let _ = fs::remove_file(&journal_file);
            return Err(SwitchError::commit(
                format!("failed to write {}: {e}", edit.path.display()),
                edit.path.clone(),
            ));
        }
        debug!(path = %edit.path.display(), replaced = edit.substitutions.len(), "wrote file");
    }

    info!(network, files = plan.len(), "committed edit plan");
    Ok(CommitReceipt {
        network: network.to_string(),
        files: plan.edits().iter().map(|e| e.path.clone()).collect(),
    })
}

fn write_journal(path: &Path, journal: &Journal) -> Result<(), SwitchError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| {
            SwitchError::commit(format!("failed to create state directory: {e}"), dir.to_path_buf())
        })?;
    }
    let json = serde_json::to_string_pretty(journal)
        .map_err(|e| SwitchError::commit(format!("failed to serialize journal: {e}"), path.to_path_buf()))?;
    write_atomic(path, &json)
        .map_err(|e| SwitchError::commit(format!("failed to write journal: {e}"), path.to_path_buf()))
}

/// Restore every file touched by the last commit, then forget it.
///
/// Refuses, without touching anything, if a committed file was edited since. A file
/// that already holds its original text counts as restored, so an interrupted revert
/// can be run again.
pub fn revert_last(root: &Path) -> Result<CommitReceipt, SwitchError> {
    let path = journal_path(root);
    if !path.is_file() {
        return Err(SwitchError::NothingToRevert { root: root.to_path_buf() });
    }
    let content = read_text(&path)?;
    let journal: Journal = serde_json::from_str(&content)
        .map_err(|e| SwitchError::commit(format!("corrupt journal: {e}"), path.clone()))?;

    let mut pending = Vec::with_capacity(journal.files.len());
    for entry in &journal.files {
        let current = read_text(&entry.path)?;
        if to_hex(&hash_text(&current)) == entry.committed {
            pending.push((entry, current));
        } else if current == entry.original {
            debug!(path = %entry.path.display(), "already restored");
        } else {
            return Err(SwitchError::StaleFile { path: entry.path.clone() });
        }
    }

    restore_originals(&pending)?;
    fs::remove_file(&path)
        .map_err(|e| SwitchError::commit(format!("failed to remove journal: {e}"), path.clone()))?;

    info!(network = %journal.network, files = journal.files.len(), "reverted last commit");
    Ok(CommitReceipt {
        network: journal.network,
        files: journal.files.into_iter().map(|e| e.path).collect(),
    })
}

/// Write each entry's original text. On failure, put the committed text back into
/// the files already restored so the journal still describes the workspace.
fn restore_originals(pending: &[(&JournalEntry, String)]) -> Result<(), SwitchError> {
    for (index, (entry, _)) in pending.iter().enumerate() {
        if let Err(e) = write_atomic(&entry.path, &entry.original) {
            warn!(path = %entry.path.display(), "restore failed, rolling back {index} file(s)");
            for (done, committed) in &pending[..index] {
                if let Err(undo) = write_atomic(&done.path, committed) {
                    warn!(path = %done.path.display(), "rollback failed: {undo}");
                }
            }
            return Err(SwitchError::commit(
                format!("failed to restore {}: {e}", entry.path.display()),
                entry.path.clone(),
            ));
        }
    }
    Ok(())
}
