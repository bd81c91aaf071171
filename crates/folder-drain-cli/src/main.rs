//! folder-drain - move the contents of watched folders once they go quiet
//!
//! Usage:
//!   folder-drain                 Watch every configured pair (default)
//!   folder-drain --once          Drain every pair once and exit
//!   folder-drain --dry-run       Preview a drain
//!   folder-drain --help          Show help

use std::sync::Arc;

use folder_drain_core::{spawn_watchers, DebounceWindows, PairsFile, Verbosity, WatchPair};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;

use cli::{CliOptions, Invocation, Mode};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let options = match cli::parse_args(&args) {
        Ok(Invocation::Run(options)) => options,
        Ok(Invocation::Help) => {
            cli::print_help();
            return Ok(());
        }
        Ok(Invocation::Version) => {
            println!("folder-drain v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            cli::print_help();
            std::process::exit(1);
        }
    };

    let verbosity = Verbosity::from_env().unwrap_or_else(|e| {
        eprintln!("{}, defaulting to 0", e);
        Verbosity::default()
    });
    init_logging(verbosity);

    let pairs_file = match PairsFile::load(&options.config) {
        Ok(file) => file,
        Err(e) if e.is_fatal_config() => {
            error!("{}", e);
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to read {}", options.config.display())));
        }
    };
    info!(
        "Loaded {} folder pair(s) from {}",
        pairs_file.pairs.len(),
        pairs_file.path.display()
    );

    match options.mode {
        Mode::Watch => watch(pairs_file.pairs, &options),
        Mode::Once => {
            cli::run_once(&pairs_file.pairs, &options);
            Ok(())
        }
        Mode::DryRun => cli::run_dry_run(&pairs_file.pairs, &options),
    }
}

/// Log to stderr with timestamps and source locations, filtered by the
/// verbosity threshold unless `RUST_LOG` says otherwise.
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.level_filter().into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn watch(pairs: Vec<WatchPair>, options: &CliOptions) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async move {
        let relocator = Arc::new(options.relocator());
        let mut tasks = spawn_watchers(&pairs, relocator, DebounceWindows::default());

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                error!("Watcher task failed: {}", e);
            }
        }

        // Nothing left to watch, but the process only ends when it is stopped
        error!("No folder pairs are being watched");
        std::future::pending::<()>().await;
    });

    Ok(())
}
