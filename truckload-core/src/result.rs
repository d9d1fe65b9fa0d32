//! `PlacementResult` and the progress-observer interface (spec.md §3, §6, §9).

use serde::{Deserialize, Serialize};

use crate::truckbox::{Box as TruckBox, PlacedBox};

/// Stability / safety / utilization, all in `[0, 100]` (spec.md §4.I).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub stability: f64,
    pub safety: f64,
    pub utilization: f64,
}

/// The output of one `optimize` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub placed: Vec<PlacedBox>,
    pub unplaced: Vec<TruckBox>,
    pub scores: Scores,
    pub loading_sequence: Vec<PlacedBox>,
    /// `true` if the MCTS refiner's iteration budget or cancellation flag
    /// was hit before convergence (spec.md §7: budget exhaustion is not an
    /// error, just a flag on the result).
    pub mcts_budget_exhausted: bool,
}

/// Replaces the source's progress-callback side-channel (spec.md §9) with a
/// one-method observer, invoked between batches. The core never depends on
/// the observer for correctness: every `optimize` call is reentrant and
/// produces the same result whether or not an observer is attached.
pub trait ProgressObserver: Send + Sync {
    /// `fraction` is in `[0, 1]`; `placed_count` is the number of boxes
    /// committed so far.
    fn on_progress(&self, fraction: f64, placed_count: usize);
}

/// The default observer: does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&self, _fraction: f64, _placed_count: usize) {}
}

/// Forwards progress updates through an `mpsc` channel, for callers that
/// want to observe `optimize` from another thread without coupling to the
/// packer's internals.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: std::sync::mpsc::Sender<(f64, usize)>,
}

impl ChannelObserver {
    pub fn new(sender: std::sync::mpsc::Sender<(f64, usize)>) -> Self {
        Self { sender }
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&self, fraction: f64, placed_count: usize) {
        // A full channel / disconnected receiver is not the core's concern:
        // silently drop, per spec.md §9 ("the core never depends on the
        // observer for correctness").
        let _ = self.sender.send((fraction, placed_count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_observer_is_a_no_op() {
        let obs = NullObserver;
        obs.on_progress(0.5, 3);
    }

    #[test]
    fn channel_observer_forwards_updates() {
        let (tx, rx) = std::sync::mpsc::channel();
        let obs = ChannelObserver::new(tx);
        obs.on_progress(1.0, 10);
        assert_eq!(rx.recv().unwrap(), (1.0, 10));
    }
}
