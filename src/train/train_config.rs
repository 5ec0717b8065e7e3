use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`     : maximum number of full passes over the training data
/// - `shuffle`    : visit samples in a fresh random order every epoch
/// - `target_loss`: stop as soon as an epoch's mean loss drops below this
/// - `progress_tx`: optional channel sender; one `EpochStats` is sent per
///                   completed epoch.  If the receiver is dropped the loop
///                   terminates early (clean shutdown).
/// - `stop_flag`  : optional atomic flag; when set to `true` from another
///                   thread the loop terminates after the current epoch.
pub struct TrainConfig {
    pub epochs: usize,
    pub shuffle: bool,
    pub target_loss: Option<f64>,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with shuffling on, no target, no progress channel and no stop flag.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            shuffle: true,
            target_loss: None,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_target_loss(mut self, target_loss: f64) -> Self {
        self.target_loss = Some(target_loss);
        self
    }

    pub fn without_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }
}
