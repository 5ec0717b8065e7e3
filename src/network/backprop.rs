use crate::error::{NetError, Result};
use crate::layers::dense::Layer;
use crate::loss::mse::MseLoss;
use crate::network::network::{wiring_fault, Network};

impl Network {
    /// One online gradient step towards `desired_outputs`.
    ///
    /// Uses the activations cached by the most recent `feed_forward`; calling it
    /// after feeding a different input trains against that input instead.
    ///
    /// Returns the plain mean squared error of the current outputs. That figure
    /// is a diagnostic only: the weights move along the derivative-scaled error
    /// `f'(out) * (desired - out)`, not along the MSE gradient.
    pub fn back_propagate(&mut self, desired_outputs: &[f64]) -> Result<f64> {
        if desired_outputs.len() != self.output_layer.len() {
            return Err(NetError::DimensionMismatch {
                what: "desired outputs",
                expected: self.output_layer.len(),
                actual: desired_outputs.len(),
            });
        }
        self.ensure_fed()?;

        let output_errors: Vec<f64> = self
            .output_layer
            .neurons()
            .iter()
            .zip(desired_outputs)
            .map(|(neuron, desired)| neuron.derivative() * (desired - neuron.output()))
            .collect();

        let reported = MseLoss::loss(&self.output_layer.outputs(), desired_outputs);

        // All error signals are computed against the old weights before any update.
        let depth = self.hidden_layers.len();
        let mut hidden_errors: Vec<Vec<f64>> = vec![Vec::new(); depth];
        for index in (0..depth).rev() {
            let errors = {
                let (next_layer, next_errors) = if index + 1 == depth {
                    (&self.output_layer, &output_errors)
                } else {
                    (&self.hidden_layers[index + 1], &hidden_errors[index + 1])
                };
                layer_errors(&self.hidden_layers[index], next_layer, next_errors)?
            };
            hidden_errors[index] = errors;
        }

        let (learning_rate, momentum) = (self.learning_rate, self.momentum);

        let last_hidden = self.hidden_layers[depth - 1].outputs();
        apply_step(&mut self.output_layer, &output_errors, &last_hidden, learning_rate, momentum)?;

        for index in (0..depth).rev() {
            let upstream = if index == 0 {
                self.input_layer.clone()
            } else {
                self.hidden_layers[index - 1].outputs()
            };
            apply_step(
                &mut self.hidden_layers[index],
                &hidden_errors[index],
                &upstream,
                learning_rate,
                momentum,
            )?;
        }

        Ok(reported)
    }
}

/// error_i = f'(out_i) * sum_j(next_error_j * next_weight_j,i)
fn layer_errors(layer: &Layer, next_layer: &Layer, next_errors: &[f64]) -> Result<Vec<f64>> {
    if next_layer.num_inputs() != layer.len() {
        return Err(NetError::InvariantViolation(format!(
            "downstream layer takes {} inputs but its upstream has {} neurons",
            next_layer.num_inputs(),
            layer.len()
        )));
    }
    layer
        .neurons()
        .iter()
        .enumerate()
        .map(|(i, neuron)| -> Result<f64> {
            let mut sum = 0.0;
            for (downstream, error) in next_layer.neurons().iter().zip(next_errors) {
                sum += error * downstream.weight(i).map_err(wiring_fault)?;
            }
            Ok(sum * neuron.derivative())
        })
        .collect()
}

/// w += lr * error * upstream + momentum * previous_delta; the bias weight gets
/// the same step against its bias value, without momentum.
fn apply_step(layer: &mut Layer, errors: &[f64], upstream: &[f64], learning_rate: f64, momentum: f64) -> Result<()> {
    if layer.num_inputs() != upstream.len() || layer.len() != errors.len() {
        return Err(NetError::InvariantViolation(format!(
            "weight update on a {}x{} layer with {} upstream values and {} errors",
            layer.len(),
            layer.num_inputs(),
            upstream.len(),
            errors.len()
        )));
    }
    for (neuron, &error) in layer.neurons_mut().iter_mut().zip(errors) {
        for (i, &value) in upstream.iter().enumerate() {
            let delta = learning_rate * error * value;
            let weight = neuron.weight(i).map_err(wiring_fault)?;
            let previous = neuron.previous_adjustment(i).map_err(wiring_fault)?;
            neuron.update_weight(i, weight + delta + momentum * previous).map_err(wiring_fault)?;
            neuron.update_previous_adjustment(i, delta).map_err(wiring_fault)?;
        }
        neuron.set_bias_weight(neuron.bias_weight() + learning_rate * error * neuron.bias_value());
    }
    Ok(())
}
