//! Candidate file discovery: walk the workspace and keep files whose relative path matches a
//! find glob and no exclude glob.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::diagnostics::SwitchError;
use crate::rewrite::SourceFile;
use crate::state::STATE_DIR;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled find/exclude patterns.
pub struct FileMatcher {
    find: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl FileMatcher {
    pub fn new(find: &[String], exclude: &[String]) -> Result<Self, SwitchError> {
        Ok(Self { find: compile(find)?, exclude: compile(exclude)? })
    }

    /// `relative` uses `/` separators regardless of platform.
    pub fn is_match(&self, relative: &str) -> bool {
        self.find.iter().any(|p| p.matches_with(relative, MATCH_OPTIONS)) && !self.is_excluded(relative)
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|p| p.matches_with(relative, MATCH_OPTIONS))
    }

    /// A directory is pruned when a file directly inside it would be excluded.
    fn prunes_dir(&self, relative: &str) -> bool {
        self.is_excluded(&format!("{relative}/_"))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, SwitchError> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|e| SwitchError::discover(format!("invalid glob '{p}': {e}"))))
        .collect()
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel.components().map(|c| c.as_os_str().to_string_lossy()).collect();
    Some(parts.join("/"))
}

/// List matching files under `root`, sorted and without duplicates.
pub fn discover_files(root: &Path, matcher: &FileMatcher) -> Result<Vec<PathBuf>, SwitchError> {
    let keep_entry = |entry: &DirEntry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        if entry.file_name() == STATE_DIR {
            return false;
        }
        match relative_path(root, entry.path()) {
            Some(rel) => !matcher.prunes_dir(&rel),
            None => true,
        }
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(keep_entry) {
        let entry = entry.map_err(|e| SwitchError::discover(format!("failed to walk {}: {e}", root.display())))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(rel) = relative_path(root, entry.path()) else {
            continue;
        };
        if matcher.is_match(&rel) {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = files.len(), "discovered candidate files");
    Ok(files)
}

/// Discover and read candidate files. Files that are not UTF-8 text are skipped.
pub fn load_sources(root: &Path, matcher: &FileMatcher) -> Result<Vec<SourceFile>, SwitchError> {
    let mut sources = Vec::new();
    for path in discover_files(root, matcher)? {
        let bytes = std::fs::read(&path)
            .map_err(|e| SwitchError::discover(format!("failed to read {}: {e}", path.display())))?;
        match String::from_utf8(bytes) {
            Ok(text) => sources.push(SourceFile { path, text }),
            Err(_) => warn!(path = %path.display(), "skipping file that is not valid UTF-8"),
        }
    }
    Ok(sources)
}
