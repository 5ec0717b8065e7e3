use crate::error::{NetError, Result};
use crate::network::network::Network;

/// One ordered online pass: `feed_forward` then `back_propagate` per sample.
///
/// Returns the mean of the MSE values reported by `back_propagate`.
pub fn train_network(network: &mut Network, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
    check_samples(inputs, targets)?;

    let mut total_loss = 0.0;
    for (input, target) in inputs.iter().zip(targets.iter()) {
        network.feed_forward(input)?;
        total_loss += network.back_propagate(target)?;
    }

    Ok(total_loss / inputs.len() as f64)
}

pub(crate) fn check_samples(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
    if inputs.is_empty() {
        return Err(NetError::InvalidArgument("no training samples".into()));
    }
    if inputs.len() != targets.len() {
        return Err(NetError::InvalidArgument(format!(
            "{} inputs but {} targets",
            inputs.len(),
            targets.len()
        )));
    }
    Ok(())
}
