//! Filesystem change notifications for a watched tree.
//!
//! Wraps `notify::RecommendedWatcher` and reduces its raw events to plain
//! "something changed" signals. Only events that mean new content is
//! arriving count: creations, data writes and renames into a path. The
//! relocator's own work (renames out of the tree, folder removals) and
//! metadata or access events are dropped here, so a drain never re-arms
//! its own debounce timer.

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{trace, warn};

use crate::error::{Error, Result};

/// Signals buffered while the detector is busy draining.
///
/// Any pending signal re-arms the timer, so once full, extra signals are
/// dropped without changing behaviour.
const SIGNAL_BUFFER: usize = 64;

/// A change somewhere under the watched root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSignal {
    /// Paths reported by the OS, for tracing only
    pub paths: Vec<PathBuf>,
}

/// Returns true if an event kind means content is arriving in the tree.
pub fn is_activity(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Other) => true,
        EventKind::Modify(ModifyKind::Name(mode)) => {
            matches!(mode, RenameMode::To | RenameMode::Both)
        }
        _ => false,
    }
}

/// Recursive watch on one root, delivering [`ChangeSignal`]s.
///
/// Dropping the watcher ends the subscription and closes the signal stream.
pub struct ChangeWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl ChangeWatcher {
    /// Start watching `root` and everything below it.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a directory or the OS refuses
    /// the subscription.
    pub fn subscribe(root: &Path) -> Result<(Self, mpsc::Receiver<ChangeSignal>)> {
        if !root.is_dir() {
            return Err(Error::Watch(
                notify::Error::path_not_found().add_path(root.to_path_buf()),
            ));
        }

        let (tx, rx) = mpsc::channel(SIGNAL_BUFFER);

        let mut watcher = RecommendedWatcher::new(
            move |result: std::result::Result<Event, notify::Error>| match result {
                Ok(event) if is_activity(&event.kind) => {
                    let signal = ChangeSignal { paths: event.paths };
                    match tx.try_send(signal) {
                        Ok(()) | Err(TrySendError::Full(_)) => {}
                        Err(TrySendError::Closed(_)) => trace!("Signal receiver gone"),
                    }
                }
                Ok(event) => trace!("Ignoring {:?} on {:?}", event.kind, event.paths),
                Err(e) => warn!("File watcher error: {}", e),
            },
            notify::Config::default(),
        )?;

        watcher.watch(root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root: root.to_path_buf(),
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
