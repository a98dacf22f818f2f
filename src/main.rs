use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use flowswitch::Workspace;
use flowswitch::config::FullMapping;
use flowswitch::diagnostics::{SwitchError, render_error};
use flowswitch::preview::{render_preview, render_summary};

#[derive(Parser)]
#[command(name = "flowswitch", version, about = "Point contract imports at a chosen network's addresses")]
struct Cli {
    /// Workspace root (defaults to the current directory)
    #[arg(short, long, global = true, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file, relative to the workspace (overrides flowswitch.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// File pattern to rewrite; repeat for several (overrides flowswitch.toml)
    #[arg(long = "glob", global = true)]
    globs: Vec<String>,

    /// Pattern to skip; repeat for several (overrides flowswitch.toml)
    #[arg(long = "exclude", global = true)]
    excludes: Vec<String>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration file
    Init,
    /// List known networks
    Networks,
    /// Print the contract addresses of one network, or of all of them
    Show {
        network: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the network chosen last
    Current,
    /// Rewrite imports to a network's addresses
    Switch {
        /// Network to switch to (defaults to the one chosen last)
        network: Option<String>,
        /// Compute and report the changes without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Show every substitution before applying
        #[arg(long)]
        preview: bool,
        /// Apply without asking for confirmation
        #[arg(short, long)]
        yes: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Undo the last applied switch
    Revert,
    /// Re-apply a network whenever the configuration file changes
    Watch {
        network: String,
        /// Don't clear terminal between runs
        #[arg(long)]
        no_clear: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
}

fn open_workspace(cli: &Cli) -> Result<Workspace, SwitchError> {
    let mut workspace = Workspace::open(&cli.workspace)?;
    let settings = workspace.settings_mut();
    if let Some(config) = &cli.config {
        settings.flow_file = config.to_string_lossy().to_string();
    }
    if !cli.globs.is_empty() {
        settings.find_globs = cli.globs.clone();
    }
    if !cli.excludes.is_empty() {
        settings.exclude = cli.excludes.clone();
    }
    Ok(workspace)
}

fn confirm(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn run(cli: Cli) -> Result<(), SwitchError> {
    let workspace = open_workspace(&cli)?;

    match cli.command {
        Commands::Init => {
            let path = workspace.init_config()?;
            eprintln!("{} created. Please edit it and run again.", path.display());
        }
        Commands::Networks => {
            let mapping = workspace.load_networks()?;
            let current = workspace.current_network();
            for network in &mapping.networks {
                let count = mapping.network(network).map_or(0, |m| m.len());
                let marker = if current.as_deref() == Some(network.as_str()) { "*" } else { " " };
                println!("{marker} {network} ({count} contract(s))");
            }
        }
        Commands::Show { network, json } => {
            let mapping = workspace.load_mapping()?;
            let shown: FullMapping = match &network {
                Some(name) => {
                    let net_map = mapping.select(name)?;
                    std::iter::once((name.clone(), net_map.clone())).collect()
                }
                None => mapping.mapping.clone(),
            };
            if json {
                let text = serde_json::to_string_pretty(&shown)
                    .map_err(|e| SwitchError::commit(format!("failed to serialize mapping: {e}"), workspace.flow_path()))?;
                println!("{text}");
            } else {
                for (name, net_map) in &shown {
                    println!("{name}:");
                    for (contract, address) in net_map {
                        println!("  {contract} = 0x{address}");
                    }
                }
            }
        }
        Commands::Current => match workspace.current_network() {
            Some(network) => println!("{network}"),
            None => println!("(not set)"),
        },
        Commands::Switch { network, dry_run, preview, yes, json } => {
            let mapping = workspace.load_networks()?;
            let network = network
                .or_else(|| workspace.current_network())
                .ok_or_else(|| SwitchError::NoNetworkChosen { available: mapping.networks.iter().cloned().collect() })?;
            let net_map = mapping.select(&network)?;
            if !dry_run {
                workspace.remember_network(&network)?;
            }

            let planned = workspace.plan_with(&network, net_map)?;
            let summary = &planned.rewrite.summary;

            if json {
                let text = serde_json::to_string_pretty(summary)
                    .map_err(|e| SwitchError::commit(format!("failed to serialize summary: {e}"), workspace.flow_path()))?;
                println!("{text}");
            }

            if summary.files_changed == 0 {
                eprintln!(
                    "No imports updated for network \"{network}\". Missing mappings: {}",
                    summary.missing.len()
                );
                return Ok(());
            }

            if !json {
                print!("{}", render_summary(workspace.root(), &network, summary));
            }
            if (preview || dry_run) && !json {
                print!("{}", render_preview(workspace.root(), &planned.rewrite.plan));
            }
            if dry_run {
                return Ok(());
            }
            if !yes && !confirm(&format!("Apply addresses for \"{network}\"?")) {
                eprintln!("Cancelled; no files changed.");
                return Ok(());
            }

            flowswitch::commit::commit_plan(workspace.root(), &planned.rewrite.plan, &network)?;
            eprintln!(
                "Updated {} files with {} replacements for \"{network}\".",
                summary.files_changed, summary.replacements
            );
        }
        Commands::Revert => {
            let receipt = flowswitch::commit::revert_last(workspace.root())?;
            eprintln!("Reverted {} file(s) from the \"{}\" switch.", receipt.files.len(), receipt.network);
        }
        Commands::Watch { network, no_clear } => {
            flowswitch::watch::watch_network(&workspace, &network, no_clear)?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        render_error(&err);
        std::process::exit(1);
    }
}
