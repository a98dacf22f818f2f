use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

use crate::line_index::LineIndex;

#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("could not read {}: {source}", path.display())]
    ConfigUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid JSON: {msg}", path.display())]
    ConfigMalformed {
        msg: String,
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("no networks found in {}", path.display())]
    NoNetworks { path: PathBuf },

    #[error("unknown network '{network}'; available: {}", available.join(", "))]
    UnknownNetwork { network: String, available: Vec<String> },

    #[error("no network given and none chosen before; available: {}", available.join(", "))]
    NoNetworkChosen { available: Vec<String> },

    #[error("Settings error: {msg}")]
    Settings { msg: String, path: PathBuf },

    #[error("Discovery error: {msg}")]
    Discover { msg: String },

    #[error("{} changed on disk since the plan was computed", path.display())]
    StaleFile { path: PathBuf },

    #[error("Commit error: {msg}")]
    Commit { msg: String, path: PathBuf },

    #[error("nothing to revert in {}", root.display())]
    NothingToRevert { root: PathBuf },

    #[error("{} already exists", path.display())]
    ConfigExists { path: PathBuf },

    #[error("Watch error: {msg}")]
    Watch { msg: String },
}

impl SwitchError {
    pub fn settings(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Settings { msg: msg.into(), path }
    }

    pub fn discover(msg: impl Into<String>) -> Self {
        Self::Discover { msg: msg.into() }
    }

    pub fn commit(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Commit { msg: msg.into(), path }
    }

    pub fn watch(msg: impl Into<String>) -> Self {
        Self::Watch { msg: msg.into() }
    }

    /// Both configuration failures mean "no mapping available" to the caller.
    pub fn is_config_missing(&self) -> bool {
        matches!(self, Self::ConfigUnavailable { .. } | Self::ConfigMalformed { .. })
    }
}

/// Char range of the character at a 1-based line/column. Reports index by char, not byte.
fn label_span(text: &str, line: usize, column: usize) -> Range<usize> {
    let mut offset = LineIndex::new(text).line_col_to_offset(line, column);
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let start = text[..offset].chars().count();
    let end = if offset < text.len() { start + 1 } else { start };
    start..end
}

/// Render a SwitchError for the terminal.
pub fn render_error(err: &SwitchError) {
    let source = match err {
        SwitchError::ConfigMalformed { path, .. } => std::fs::read_to_string(path).ok(),
        _ => None,
    };
    render_error_with_source(err, source.as_deref());
}

/// Render a SwitchError, pointing into `source` when it is the malformed configuration.
pub fn render_error_with_source(err: &SwitchError, source: Option<&str>) {
    use ariadne::{Label, Report, ReportKind, Source};

    match (err, source) {
        (SwitchError::ConfigMalformed { msg, path, line, column }, Some(text)) => {
            let span = label_span(text, *line, *column);
            let printed = Report::build(ReportKind::Error, (), span.start)
                .with_message(format!("malformed configuration in {}", path.display()))
                .with_label(Label::new(span).with_message(msg))
                .finish()
                .eprint(Source::from(text));
            if printed.is_err() {
                eprintln!("error: {err}");
            }
        }
        (SwitchError::Settings { msg, path }, _) | (SwitchError::Commit { msg, path }, _) => {
            eprintln!("error: {msg}");
            eprintln!("  --> {}", path.display());
        }
        (SwitchError::ConfigUnavailable { .. }, _) => {
            eprintln!("error: {err}");
            eprintln!("hint: run `flowswitch init` to create a default configuration");
        }
        _ => {
            eprintln!("error: {err}");
        }
    }
}
