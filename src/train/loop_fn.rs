use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::error::Result;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::check_samples;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` online for up to `config.epochs` epochs and returns the
/// mean loss of the **last completed epoch** (0.0 if no epoch ran).
///
/// # Arguments
/// - `network` : mutable reference to the network; modified in place
/// - `inputs`  : training samples, each of length `network.input_size()`
/// - `targets` : desired outputs, same count as `inputs`
/// - `config`  : epoch budget, shuffling, early stop, progress channel
/// - `rng`     : drives the per-epoch sample order when shuffling
///
/// # Early termination
/// The loop breaks early if:
/// - an epoch's mean loss is below `config.target_loss`,
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    config: &TrainConfig,
    rng: &mut R,
) -> Result<f64> {
    check_samples(inputs, targets)?;

    let mut order: Vec<usize> = (0..inputs.len()).collect();
    let mut last_train_loss = 0.0;

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            debug!(epoch, "stop flag set; ending training");
            break;
        }

        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(rng);
        }
        let train_loss = run_one_epoch(network, inputs, targets, &order)?;
        last_train_loss = train_loss;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;
        info!(epoch, total_epochs = config.epochs, train_loss, elapsed_ms, "epoch complete");

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                debug!(epoch, "progress receiver dropped; ending training");
                break;
            }
        }

        if let Some(target) = config.target_loss {
            if train_loss < target {
                info!(epoch, train_loss, target, "target loss reached");
                break;
            }
        }
    }

    Ok(last_train_loss)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One online pass in the given sample order. Returns the mean reported loss.
fn run_one_epoch(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    order: &[usize],
) -> Result<f64> {
    let mut total_loss = 0.0;
    for &idx in order {
        network.feed_forward(&inputs[idx])?;
        total_loss += network.back_propagate(&targets[idx])?;
    }
    Ok(total_loss / order.len() as f64)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}
