//! Per-pair watch loop deciding when a source tree is quiet enough to drain.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use super::signal::{ChangeSignal, ChangeWatcher};
use super::timer::{DebounceTimer, DebounceWindows};
use crate::config::WatchPair;
use crate::error::Result;
use crate::relocate::{Drain, Relocator};

/// Drains one watch pair whenever its source tree goes quiet.
///
/// On start the pair is drained once to clear any backlog. After that every
/// change signal arms (or extends) the debounce timer, and each expiry runs
/// one drain. Drains run on the blocking pool and are awaited, so passes for
/// a pair never overlap and quiescence is not evaluated while one is running.
pub struct QuiescenceDetector<D: Drain = Relocator> {
    pair: WatchPair,
    drain: Arc<D>,
    windows: DebounceWindows,
}

impl<D: Drain> QuiescenceDetector<D> {
    pub fn new(pair: WatchPair, drain: Arc<D>) -> Self {
        Self {
            pair,
            drain,
            windows: DebounceWindows::default(),
        }
    }

    pub fn with_windows(mut self, windows: DebounceWindows) -> Self {
        self.windows = windows;
        self
    }

    pub fn pair(&self) -> &WatchPair {
        &self.pair
    }

    /// Drain once, subscribe to the source tree and loop forever.
    ///
    /// # Errors
    ///
    /// Returns an error if the change subscription cannot be set up. The
    /// loop itself does not fail.
    pub async fn run(self) -> Result<()> {
        self.drain_now().await;

        let (_watcher, signals) = ChangeWatcher::subscribe(&self.pair.source)?;
        info!("Started watching: {}", self.pair.source.display());

        self.event_loop(signals).await;
        Ok(())
    }

    /// Same as [`run`](Self::run) but fed from an existing signal stream.
    ///
    /// Returns once the stream closes.
    pub async fn run_with_signals(self, signals: mpsc::Receiver<ChangeSignal>) {
        self.drain_now().await;
        self.event_loop(signals).await;
    }

    async fn event_loop(&self, mut signals: mpsc::Receiver<ChangeSignal>) {
        let mut timer = DebounceTimer::new(self.windows);

        loop {
            tokio::select! {
                biased;

                signal = signals.recv() => {
                    let Some(signal) = signal else {
                        warn!("Change notifications ended for {}", self.pair.source.display());
                        return;
                    };
                    let window = timer.notify();
                    trace!("Got event {:?}, waiting {:?} for quiet", signal.paths, window);
                }
                () = timer.expired(), if timer.is_armed() => {
                    debug!("Idle time exceeded, moving files for {}", self.pair);
                    self.drain_now().await;
                }
            }
        }
    }

    async fn drain_now(&self) {
        let drain = Arc::clone(&self.drain);
        let pair = self.pair.clone();

        if let Err(e) = tokio::task::spawn_blocking(move || drain.drain(&pair)).await {
            error!("Relocation pass for {} did not finish: {}", self.pair, e);
        }
    }
}
