//! Storefront-Watch main entry point
//!
//! This is the command-line interface and interactive prompt for the
//! storefront stock monitor.

use anyhow::{bail, Context};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use storefront_watch::commands::{render_target_list, Command, CommandError, HELP_TEXT};
use storefront_watch::config::{load_config_with_hash, Config};
use storefront_watch::monitor::{build_monitor, HttpFetcher, Monitor};
use storefront_watch::output::{generate_markdown_summary, load_statistics, print_statistics};
use storefront_watch::storage::{open_or_create, open_storage, JsonFileStorage, StoreStatus};
use storefront_watch::store::TargetStore;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

type AppMonitor = Monitor<HttpFetcher, JsonFileStorage>;
type InputLines = Lines<BufReader<Stdin>>;

/// Storefront-Watch: a storefront stock monitor
///
/// Tracks storefront `products.json` endpoints, polls them on a fixed
/// interval and records which product variants are available.
#[derive(Parser, Debug)]
#[command(name = "storefront-watch")]
#[command(version = "1.0.0")]
#[command(about = "A storefront stock monitor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Path to the store file (overrides the configuration)
    #[arg(short, long, value_name = "STORE")]
    store: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Create the store file without asking if it does not exist
    #[arg(short, long)]
    yes: bool,

    /// Start monitoring immediately instead of opening the prompt
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    run: bool,

    /// Show availability statistics from the store and exit
    #[arg(long, conflicts_with_all = ["run", "export_summary"])]
    stats: bool,

    /// Write a markdown availability report to FILE and exit
    #[arg(long, value_name = "FILE", conflicts_with_all = ["run", "stats"])]
    export_summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    if let Some(store_path) = &cli.store {
        config.store.path = store_path.display().to_string();
    }

    let store_path = PathBuf::from(&config.store.path);

    if cli.stats || cli.export_summary.is_some() {
        let (_, status) = open_storage(&store_path);
        let store = match status {
            StoreStatus::Loaded(store) => store,
            StoreStatus::Missing => bail!("no store file at {}", store_path.display()),
            StoreStatus::Unusable(e) => {
                bail!("store file {} is unusable: {}", store_path.display(), e)
            }
        };
        return handle_report(&store, cli.export_summary.as_deref());
    }

    // --yes never replaces an existing file
    let opened = open_or_create(&store_path, |status| match status {
        StoreStatus::Unusable(_) => confirm(&format!(
            "Store {} is unusable. Replace it with an empty one? (y/n) ",
            store_path.display()
        )),
        _ if cli.yes => Ok(true),
        _ => confirm(&format!(
            "Store {} does not exist. Create it? (y/n) ",
            store_path.display()
        )),
    })
    .with_context(|| format!("failed to create store {}", store_path.display()))?;

    let Some((storage, store)) = opened else {
        return Ok(());
    };

    let mut monitor = build_monitor(&config, store, storage)?;

    if cli.run {
        start_monitoring(&mut monitor).await;
        return Ok(());
    }

    command_loop(&mut monitor).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("storefront_watch=info,warn"),
            1 => EnvFilter::new("storefront_watch=debug,info"),
            2 => EnvFilter::new("storefront_watch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --stats and --export-summary
fn handle_report(store: &TargetStore, export_path: Option<&Path>) -> anyhow::Result<()> {
    match export_path {
        Some(path) => {
            generate_markdown_summary(store, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("✓ Summary exported to: {}", path.display());
        }
        None => print_statistics(&load_statistics(store)),
    }
    Ok(())
}

/// Reads commands until `quit`, end of input, or `run`
///
/// `run` does not return to the prompt: once monitoring stops the process
/// exits.
async fn command_loop(monitor: &mut AppMonitor) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type 'help' for a list of commands.");

    loop {
        let Some(line) = prompt(&mut lines, "> ").await? else {
            return Ok(());
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                tracing::warn!("{}", e);
                continue;
            }
        };

        match command {
            Command::Help => println!("{}", HELP_TEXT),
            Command::List => println!("{}", render_target_list(monitor.list_targets())),
            Command::Add { host, path, id } => {
                let Some(host) = argument_or_prompt(&mut lines, host, "Host: ").await? else {
                    return Ok(());
                };
                let Some(path) = argument_or_prompt(&mut lines, path, "Path: ").await? else {
                    return Ok(());
                };
                let Some(id) =
                    argument_or_prompt(&mut lines, id, "Id (blank for next number): ").await?
                else {
                    return Ok(());
                };

                match monitor.register_target(&id, &host, &path) {
                    Ok(id) => println!("Added {}", id),
                    Err(e) => tracing::warn!("Cannot add target: {}", e),
                }
            }
            Command::Remove { id } => {
                let Some(id) = argument_or_prompt(&mut lines, id, "Id: ").await? else {
                    return Ok(());
                };
                // Not-found is already logged by the monitor
                if monitor.unregister_target(id.trim()).is_ok() {
                    println!("Removed {}", id.trim());
                }
            }
            Command::Run => {
                start_monitoring(monitor).await;
                return Ok(());
            }
            Command::Quit => return Ok(()),
        }
    }
}

/// Runs the monitor until Ctrl-C or SIGTERM
async fn start_monitoring(monitor: &mut AppMonitor) {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.cancel();
    });

    monitor.run(&cancel).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Received shutdown signal, stopping monitor");
}

/// Prints `question` and reads one line; `None` at end of input
async fn prompt(lines: &mut InputLines, question: &str) -> anyhow::Result<Option<String>> {
    print!("{}", question);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

/// Uses `given` if present, otherwise asks for it
async fn argument_or_prompt(
    lines: &mut InputLines,
    given: Option<String>,
    question: &str,
) -> anyhow::Result<Option<String>> {
    match given {
        Some(value) => Ok(Some(value)),
        None => prompt(lines, question).await,
    }
}

/// Asks a yes/no question on stdin before the prompt loop starts
fn confirm(question: &str) -> std::io::Result<bool> {
    print!("{}", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
