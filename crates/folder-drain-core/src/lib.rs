//! # folder-drain-core
//!
//! Core library for moving the contents of watched folders into destination
//! folders once filesystem activity in them has settled.
//!
//! This crate provides the foundational functionality for:
//! - Reading the folder pairs configuration file
//! - Relocating a folder tree into a destination, merging with what is there
//! - Debouncing filesystem change notifications per watched folder
//! - Running one independent watcher per folder pair
//!
//! ## Modules
//!
//! - [`config`] - Folder pairs file and log verbosity
//! - [`error`] - Error types and Result alias
//! - [`relocate`] - Tree relocation and dry run previews
//! - [`watch`] - Change notifications, debounce timer and watch loop
//!
//! ## Example
//!
//! ```no_run
//! use folder_drain_core::{PairsFile, Relocator};
//!
//! let file = PairsFile::load("folder_pairs.conf").expect("Failed to load pairs");
//! let relocator = Relocator::new();
//! for pair in &file.pairs {
//!     relocator.relocate(&pair.source, &pair.destination);
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod relocate;
pub mod watch;

// Re-export key types for convenience

// Error types
pub use error::{Error, Result};

// Configuration
pub use config::{PairsFile, Verbosity, WatchPair, DEFAULT_CONFIG_FILE, DEBUG_LEVEL_VAR};

// Relocation
pub use relocate::{
    Drain, DrainPlan, PlannedAction, PlannedEntry, Relocator, DEFAULT_DIR_MODE, DEFAULT_SENTINEL,
};

// Watching
pub use watch::{spawn_watchers, DebounceWindows, QuiescenceDetector};
