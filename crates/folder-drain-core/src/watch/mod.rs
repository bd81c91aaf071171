//! Watching source trees and draining them once they go quiet.
//!
//! # Example
//!
//! ```rust,ignore
//! use folder_drain_core::{spawn_watchers, DebounceWindows, Relocator, WatchPair};
//! use std::sync::Arc;
//!
//! let pairs = vec![WatchPair::new("/srv/incoming", "/srv/archive")];
//! let mut tasks = spawn_watchers(&pairs, Arc::new(Relocator::new()), DebounceWindows::default());
//! while tasks.join_next().await.is_some() {}
//! ```

mod detector;
mod signal;
mod supervisor;
mod timer;

pub use detector::QuiescenceDetector;

pub use signal::{is_activity, ChangeSignal, ChangeWatcher};

pub use supervisor::spawn_watchers;

pub use timer::{
    DebounceTimer,
    DebounceWindows,
    TimerState,
    DEFAULT_EXTENDED_WINDOW,
    DEFAULT_INITIAL_WINDOW,
};
