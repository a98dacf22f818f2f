//! The rewrite engine: substitutes network addresses into import references.
//!
//! Pure over in-memory text. The output is an `EditPlan` of whole-file replacements plus a
//! `RewriteSummary`; nothing here touches storage.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::NetworkMap;
use crate::content_hash::{ContentHash, hash_text};
use crate::scan::scan_imports;

/// A file handed to the engine: its identifier and full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self { path: path.into(), text: text.into() }
    }
}

/// One replaced address inside a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub name: String,
    /// Byte offset of the old address digits in the original text.
    pub offset: usize,
    pub old: String,
    pub new: String,
}

/// Outcome of rewriting a single text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRewrite {
    pub text: String,
    pub substitutions: Vec<Substitution>,
    /// Names referenced in this text with no entry in the network map.
    pub missing: BTreeSet<String>,
}

impl FileRewrite {
    pub fn replaced(&self) -> usize {
        self.substitutions.len()
    }
}

/// Rewrite every resolvable import reference in `text`.
///
/// Only the address digits of a resolved reference change; every other byte, including
/// unresolved references, is copied through unchanged.
pub fn rewrite_text(net_map: &NetworkMap, text: &str) -> FileRewrite {
    let mut out = String::with_capacity(text.len());
    let mut substitutions = Vec::new();
    let mut missing = BTreeSet::new();
    let mut copied = 0;

    for import in scan_imports(text) {
        let Some(target) = net_map.get(import.name) else {
            missing.insert(import.name.to_string());
            continue;
        };
        out.push_str(&text[copied..import.address.start]);
        out.push_str(target);
        copied = import.address.end;
        substitutions.push(Substitution {
            name: import.name.to_string(),
            offset: import.address.start,
            old: import.address_text(text).to_string(),
            new: target.clone(),
        });
    }
    out.push_str(&text[copied..]);

    FileRewrite { text: out, substitutions, missing }
}

/// Whole-file replacement for one changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEdit {
    pub path: PathBuf,
    /// Hash of the text the edit was computed from.
    pub base_hash: ContentHash,
    pub new_text: String,
    pub substitutions: Vec<Substitution>,
}

/// The complete set of replacements from one rewrite pass. Not yet committed anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    edits: Vec<FileEdit>,
}

impl EditPlan {
    pub fn edits(&self) -> &[FileEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: PathBuf,
    pub replaced: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteSummary {
    pub files_changed: usize,
    /// Every substitution performed, including ones that rewrote an address to itself.
    pub replacements: usize,
    /// Sorted, deduplicated names that had no address on the chosen network.
    pub missing: Vec<String>,
    pub files: Vec<FileChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
    pub plan: EditPlan,
    pub summary: RewriteSummary,
}

/// Rewrite a set of files against one network's map.
///
/// A file enters the plan only if at least one reference was substituted and its text
/// actually changed.
pub fn rewrite_sources<I>(net_map: &NetworkMap, files: I) -> Rewrite
where
    I: IntoIterator<Item = SourceFile>,
{
    let mut edits = Vec::new();
    let mut changes = Vec::new();
    let mut missing = BTreeSet::new();
    let mut replacements = 0;

    for file in files {
        let result = rewrite_text(net_map, &file.text);
        replacements += result.replaced();
        missing.extend(result.missing);

        if result.substitutions.is_empty() || result.text == file.text {
            continue;
        }
        changes.push(FileChange { path: file.path.clone(), replaced: result.substitutions.len() });
        edits.push(FileEdit {
            base_hash: hash_text(&file.text),
            path: file.path,
            new_text: result.text,
            substitutions: result.substitutions,
        });
    }

    Rewrite {
        plan: EditPlan { edits },
        summary: RewriteSummary {
            files_changed: changes.len(),
            replacements,
            missing: missing.into_iter().collect(),
            files: changes,
        },
    }
}
