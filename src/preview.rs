//! Plain-text rendering of plans and summaries for the terminal.

use std::fmt::Write;
use std::path::Path;

use crate::line_index::LineIndex;
use crate::rewrite::{EditPlan, FileEdit, RewriteSummary};

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// One line per substitution, grouped by file, showing the rewritten source line.
pub fn render_preview(root: &Path, plan: &EditPlan) -> String {
    let mut out = String::new();
    for edit in plan.edits() {
        let _ = writeln!(out, "{}", display_path(root, &edit.path));
        for line in preview_lines(edit) {
            let _ = writeln!(out, "{line}");
        }
    }
    out
}

fn preview_lines(edit: &FileEdit) -> Vec<String> {
    let index = LineIndex::new(&edit.new_text);
    let mut shift: isize = 0;
    let mut lines = Vec::with_capacity(edit.substitutions.len());

    for sub in &edit.substitutions {
        // Offsets refer to the original text; earlier substitutions moved later ones.
        let offset = sub.offset.saturating_add_signed(shift);
        shift += sub.new.len() as isize - sub.old.len() as isize;

        let pos = index.position(offset);
        let source_line = &edit.new_text[index.line_span(&edit.new_text, offset)];
        lines.push(format!(
            "{:>5} | {}    ({}: 0x{} -> 0x{})",
            pos.line,
            source_line.trim(),
            sub.name,
            sub.old,
            sub.new
        ));
    }
    lines
}

/// The short report printed after planning or committing.
pub fn render_summary(root: &Path, network: &str, summary: &RewriteSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} file(s) to update with {} replacement(s) for \"{network}\"",
        summary.files_changed, summary.replacements
    );
    for file in &summary.files {
        let _ = writeln!(out, "  {} ({})", display_path(root, &file.path), file.replaced);
    }
    if !summary.missing.is_empty() {
        let _ = writeln!(
            out,
            "missing mappings on \"{network}\" ({}): {}",
            summary.missing.len(),
            summary.missing.join(", ")
        );
    }
    out
}
