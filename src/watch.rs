use crossbeam_channel::{Receiver, Sender, select, unbounded};
use notify::{Event, RecursiveMode, Watcher};
use std::path::Path;
use std::time::Duration;

use crate::Workspace;
use crate::commit::commit_plan;
use crate::diagnostics::{SwitchError, render_error};
use crate::preview::render_summary;

/// Apply `network` now, then again every time the configuration file changes.
/// Failures are reported and watching continues. Only returns on watcher setup errors.
pub fn watch_network(workspace: &Workspace, network: &str, no_clear: bool) -> Result<(), SwitchError> {
    let flow_path = workspace.flow_path();
    println!("Watching {} for changes...", flow_path.display());

    apply_once(workspace, network);
    print_separator();

    let (tx, rx) = unbounded();
    let mut watcher = create_watcher(tx)?;
    // Editors often replace the file rather than write in place, so watch its directory.
    let watch_dir = flow_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    watcher
        .watch(watch_dir, RecursiveMode::NonRecursive)
        .map_err(|e| SwitchError::watch(format!("failed to watch {}: {e}", watch_dir.display())))?;

    loop {
        if !wait_for_change(&rx, &flow_path) {
            return Err(SwitchError::watch("file watcher stopped"));
        }
        debounce_events(&rx);

        if !no_clear {
            clearscreen::clear().ok();
        }

        println!("{} changed, re-applying \"{network}\"...", flow_path.display());
        apply_once(workspace, network);
        print_separator();
    }
}

fn apply_once(workspace: &Workspace, network: &str) {
    let planned = match workspace.plan(network) {
        Ok(planned) => planned,
        Err(err) => {
            render_error(&err);
            return;
        }
    };

    print!("{}", render_summary(workspace.root(), network, &planned.rewrite.summary));
    if planned.rewrite.plan.is_empty() {
        return;
    }
    match commit_plan(workspace.root(), &planned.rewrite.plan, network) {
        Ok(receipt) => println!("applied to {} file(s)", receipt.files.len()),
        Err(err) => render_error(&err),
    }
}

/// Block until an event touches the configuration file. False if the watcher went away.
fn wait_for_change(rx: &Receiver<Event>, flow_path: &Path) -> bool {
    let target = flow_path.file_name();
    while let Ok(event) = rx.recv() {
        if event.paths.iter().any(|p| p.file_name() == target) {
            return true;
        }
    }
    false
}

/// Debounce events by waiting for a quiet period
fn debounce_events(rx: &Receiver<Event>) {
    loop {
        select! {
            recv(rx) -> _event => {}
            default(Duration::from_millis(100)) => break,
        }
    }
}

fn create_watcher(tx: Sender<Event>) -> Result<notify::RecommendedWatcher, SwitchError> {
    notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            if matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                let _ = tx.send(event);
            }
        }
    })
    .map_err(|e| SwitchError::watch(format!("failed to create file watcher: {e}")))
}

fn print_separator() {
    println!("\n{}\n", "=".repeat(60));
}
