//! Command line parsing and the one-shot run modes
//!
//! Usage:
//!   folder-drain                       Watch all pairs and drain them when quiet
//!   folder-drain --once                Drain every pair once and exit
//!   folder-drain --dry-run [--json]    Show what a drain would do
//!
//! Options:
//!   --config <path>      Folder pairs file (default: folder_pairs.conf)
//!   --sentinel <text>    Name fragment of entries that are never moved
//!   --dir-mode <octal>   Permissions of created folders (default: 760)

use std::path::PathBuf;

use folder_drain_core::{
    DrainPlan, Relocator, WatchPair, DEFAULT_CONFIG_FILE, DEFAULT_DIR_MODE, DEFAULT_SENTINEL,
};
use tracing::info;

/// What the process should do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Watch every pair forever
    #[default]
    Watch,
    /// Drain every pair once, then exit
    Once,
    /// Print the drain plan for every pair, then exit
    DryRun,
}

/// CLI options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub mode: Mode,
    pub config: PathBuf,
    pub sentinel: String,
    pub dir_mode: u32,
    pub json: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            sentinel: DEFAULT_SENTINEL.to_string(),
            dir_mode: DEFAULT_DIR_MODE,
            json: false,
        }
    }
}

impl CliOptions {
    /// Relocator configured from these options
    pub fn relocator(&self) -> Relocator {
        Relocator::new()
            .with_sentinel(self.sentinel.clone())
            .with_dir_mode(self.dir_mode)
    }
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(CliOptions),
    Help,
    Version,
}

/// Parse CLI arguments (without the program name)
pub fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => return Ok(Invocation::Help),
            "--version" | "-V" => return Ok(Invocation::Version),
            "--once" => options.mode = Mode::Once,
            "--dry-run" => options.mode = Mode::DryRun,
            "--json" => options.json = true,
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err(format!("{} requires a path", arg));
                }
                options.config = PathBuf::from(&args[i]);
            }
            "--sentinel" => {
                i += 1;
                if i >= args.len() {
                    return Err("--sentinel requires a value".to_string());
                }
                if args[i].is_empty() {
                    return Err("--sentinel requires a non-empty value".to_string());
                }
                options.sentinel = args[i].clone();
            }
            "--dir-mode" => {
                i += 1;
                if i >= args.len() {
                    return Err("--dir-mode requires an octal mode".to_string());
                }
                options.dir_mode = match u32::from_str_radix(&args[i], 8) {
                    Ok(mode) if mode <= 0o777 => mode,
                    _ => return Err(format!("Invalid folder mode: {}", args[i])),
                };
            }
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
        i += 1;
    }

    if options.json && options.mode != Mode::DryRun {
        return Err("--json only applies to --dry-run".to_string());
    }

    Ok(Invocation::Run(options))
}

pub fn print_help() {
    println!("folder-drain v{}", env!("CARGO_PKG_VERSION"));
    println!("Move the contents of watched folders into destination folders once they go quiet");
    println!();
    println!("USAGE:");
    println!("    folder-drain [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <path>    Folder pairs file (default: {})", DEFAULT_CONFIG_FILE);
    println!("        --once             Drain every pair once and exit");
    println!("        --dry-run          Show what a drain would do and exit");
    println!("        --json             Print the dry run as JSON");
    println!("        --sentinel <text>  Never move entries containing <text> (default: {})", DEFAULT_SENTINEL);
    println!("        --dir-mode <octal> Permissions of created folders (default: {:o})", DEFAULT_DIR_MODE);
    println!("    -h, --help             Show this help message");
    println!("    -V, --version          Show the version");
    println!();
    println!("The pairs file holds one source:destination pair per line.");
    println!("Lines starting with # or // are comments.");
    println!();
    println!("ENVIRONMENT:");
    println!("    DEBUG_LEVEL    0 = errors only (default), 1 = warnings and notices, 2 = trace");
    println!("    RUST_LOG       Overrides DEBUG_LEVEL with a tracing filter");
}

/// Drain every pair once
pub fn run_once(pairs: &[WatchPair], options: &CliOptions) {
    let relocator = options.relocator();
    for pair in pairs {
        info!("Draining {}", pair);
        relocator.relocate(&pair.source, &pair.destination);
    }
}

/// Print what a drain of every pair would do
pub fn run_dry_run(pairs: &[WatchPair], options: &CliOptions) -> anyhow::Result<()> {
    let relocator = options.relocator();
    let plans: Vec<DrainPlan> = pairs
        .iter()
        .map(|pair| relocator.plan(&pair.source, &pair.destination))
        .collect();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
    } else {
        for plan in &plans {
            print_plan(plan);
        }
    }

    Ok(())
}

fn print_plan(plan: &DrainPlan) {
    println!("{}", plan.pair);
    if plan.is_empty() {
        println!("  Nothing to move");
        println!();
        return;
    }

    for entry in &plan.entries {
        println!("  {:<18} {}", entry.action.to_string(), entry.source.display());
    }
    println!(
        "  {} to move, {} to overwrite, {} skipped",
        plan.total_move, plan.total_overwrite, plan.total_skipped
    );
    println!();
}
