//! Spawns one independent detector task per watch pair.

use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, warn};

use super::detector::QuiescenceDetector;
use super::timer::DebounceWindows;
use crate::config::WatchPair;
use crate::relocate::Drain;

/// Start a [`QuiescenceDetector`] for every pair.
///
/// Tasks share nothing but the drain. A task that cannot subscribe logs the
/// error and ends; the others keep running.
pub fn spawn_watchers<D: Drain>(
    pairs: &[WatchPair],
    drain: Arc<D>,
    windows: DebounceWindows,
) -> JoinSet<()> {
    let mut tasks = JoinSet::new();

    for pair in pairs {
        let detector =
            QuiescenceDetector::new(pair.clone(), Arc::clone(&drain)).with_windows(windows);

        tasks.spawn(async move {
            let pair = detector.pair().clone();
            match detector.run().await {
                Ok(()) => warn!("Stopped watching {}", pair),
                Err(e) => error!("Error setting up watcher for {}: {}", pair, e),
            }
        });
    }

    tasks
}
