use crate::error::{NetError, Result};
use crate::layers::dense::Layer;
use crate::layers::neuron::Neuron;
use crate::math::random::WeightSource;

pub const DEFAULT_LEARNING_RATE: f64 = 1.0;
pub const DEFAULT_MOMENTUM: f64 = 1.0;

/// Addresses one of the weighted layers of a [`Network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerId {
    Hidden(usize),
    Output,
}

/// Feedforward, fully-connected logistic network trained by online
/// backpropagation with momentum.
///
/// Shape: an input buffer, one or more hidden layers, one output layer. Each
/// layer's neurons take exactly as many inputs as the layer before it has
/// neurons (the input buffer's length for the first hidden layer).
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub(crate) input_layer: Vec<f64>,
    pub(crate) hidden_layers: Vec<Layer>,
    pub(crate) output_layer: Layer,
    pub(crate) learning_rate: f64,
    pub(crate) momentum: f64,
    /// Whether the cached activations belong to the current topology.
    pub(crate) fed: bool,
}

impl Network {
    /// Builds a network with random weights in `[-1, 1]`.
    pub fn new<R: WeightSource + ?Sized>(
        input_size: usize,
        hidden_sizes: &[usize],
        output_size: usize,
        rng: &mut R,
    ) -> Result<Network> {
        validate_topology(input_size, hidden_sizes, output_size)?;

        let mut hidden_layers = Vec::with_capacity(hidden_sizes.len());
        let mut upstream = input_size;
        for &size in hidden_sizes {
            hidden_layers.push(Layer::new(size, upstream, rng)?);
            upstream = size;
        }
        let output_layer = Layer::new(output_size, upstream, rng)?;

        Ok(Network {
            input_layer: vec![0.0; input_size],
            hidden_layers,
            output_layer,
            learning_rate: DEFAULT_LEARNING_RATE,
            momentum: DEFAULT_MOMENTUM,
            fed: false,
        })
    }

    /// Assembles a network from pre-built layers, checking the wiring.
    pub(crate) fn from_layers(
        input_size: usize,
        hidden_layers: Vec<Layer>,
        output_layer: Layer,
        learning_rate: f64,
        momentum: f64,
    ) -> Result<Network> {
        if hidden_layers.is_empty() {
            return Err(NetError::InvalidTopology("at least one hidden layer is required".into()));
        }
        let network = Network {
            input_layer: vec![0.0; input_size],
            hidden_layers,
            output_layer,
            learning_rate,
            momentum,
            fed: false,
        };
        network.verify_wiring()?;
        Ok(network)
    }

    pub fn input_size(&self) -> usize {
        self.input_layer.len()
    }

    /// The input vector from the last `feed_forward` (zeros before the first one).
    pub fn input_values(&self) -> &[f64] {
        &self.input_layer
    }

    pub fn num_hidden_layers(&self) -> usize {
        self.hidden_layers.len()
    }

    pub fn hidden_layer_size(&self, index: usize) -> Result<usize> {
        Ok(self.hidden_layer(index)?.len())
    }

    pub fn hidden_sizes(&self) -> Vec<usize> {
        self.hidden_layers.iter().map(Layer::len).collect()
    }

    pub fn output_size(&self) -> usize {
        self.output_layer.len()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    pub fn set_momentum(&mut self, momentum: f64) {
        self.momentum = momentum;
    }

    pub fn hidden_layer(&self, index: usize) -> Result<&Layer> {
        self.hidden_layers.get(index).ok_or(NetError::IndexOutOfRange {
            what: "hidden layer",
            index,
            len: self.hidden_layers.len(),
        })
    }

    pub fn output_layer(&self) -> &Layer {
        &self.output_layer
    }

    pub fn layer(&self, id: LayerId) -> Result<&Layer> {
        match id {
            LayerId::Hidden(index) => self.hidden_layer(index),
            LayerId::Output => Ok(&self.output_layer),
        }
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer> {
        match id {
            LayerId::Hidden(index) => {
                let len = self.hidden_layers.len();
                self.hidden_layers.get_mut(index).ok_or(NetError::IndexOutOfRange {
                    what: "hidden layer",
                    index,
                    len,
                })
            }
            LayerId::Output => Ok(&mut self.output_layer),
        }
    }

    pub fn neuron(&self, id: LayerId, index: usize) -> Result<&Neuron> {
        self.layer(id)?.neuron(index)
    }

    /// Overwrites a single connection weight.
    pub fn set_weight(&mut self, id: LayerId, neuron: usize, input: usize, weight: f64) -> Result<()> {
        self.layer_mut(id)?.neuron_mut(neuron)?.update_weight(input, weight)
    }

    pub fn set_bias_weight(&mut self, id: LayerId, neuron: usize, bias_weight: f64) -> Result<()> {
        self.layer_mut(id)?.neuron_mut(neuron)?.set_bias_weight(bias_weight);
        Ok(())
    }

    pub fn set_bias_value(&mut self, id: LayerId, neuron: usize, bias_value: f64) -> Result<()> {
        self.layer_mut(id)?.neuron_mut(neuron)?.set_bias_value(bias_value);
        Ok(())
    }

    pub fn set_previous_adjustment(&mut self, id: LayerId, neuron: usize, input: usize, delta: f64) -> Result<()> {
        self.layer_mut(id)?.neuron_mut(neuron)?.update_previous_adjustment(input, delta)
    }

    /// Runs one full forward pass, recomputing and caching every activation.
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<()> {
        if inputs.len() != self.input_layer.len() {
            return Err(NetError::DimensionMismatch {
                what: "input vector",
                expected: self.input_layer.len(),
                actual: inputs.len(),
            });
        }
        self.fed = false;
        self.input_layer.copy_from_slice(inputs);

        let mut signal = self.hidden_layers[0].feed(&self.input_layer).map_err(wiring_fault)?;
        for layer in self.hidden_layers.iter_mut().skip(1) {
            signal = layer.feed(&signal).map_err(wiring_fault)?;
        }
        self.output_layer.feed(&signal).map_err(wiring_fault)?;

        self.fed = true;
        Ok(())
    }

    /// Output activations from the last forward pass, in construction order.
    pub fn output_values(&self) -> Result<Vec<f64>> {
        self.ensure_fed()?;
        Ok(self.output_layer.outputs())
    }

    /// Index of the most active output neuron; ties go to the lowest index.
    pub fn argmax_output(&self) -> Result<usize> {
        self.ensure_fed()?;
        let mut best = 0;
        let mut best_value = self.output_layer.neurons()[0].output();
        for (index, neuron) in self.output_layer.neurons().iter().enumerate().skip(1) {
            if neuron.output() > best_value {
                best = index;
                best_value = neuron.output();
            }
        }
        Ok(best)
    }

    /// Re-draws every weight in the network.
    pub fn randomize<R: WeightSource + ?Sized>(&mut self, rng: &mut R) {
        for layer in self.hidden_layers.iter_mut() {
            layer.randomize(rng);
        }
        self.output_layer.randomize(rng);
    }

    /// Jitters every weight by up to `scale`. Used by evolutionary search,
    /// independently of backpropagation.
    pub fn perturb<R: WeightSource + ?Sized>(&mut self, scale: f64, rng: &mut R) {
        for layer in self.hidden_layers.iter_mut() {
            layer.perturb(scale, rng);
        }
        self.output_layer.perturb(scale, rng);
    }

    /// Checks that every layer takes as many inputs as its upstream neighbour
    /// produces.
    pub fn verify_wiring(&self) -> Result<()> {
        if self.input_layer.is_empty() {
            return Err(NetError::InvalidTopology("input layer is empty".into()));
        }
        let mut upstream = self.input_layer.len();
        for (index, layer) in self.hidden_layers.iter().enumerate() {
            if layer.num_inputs() != upstream {
                return Err(NetError::InvariantViolation(format!(
                    "hidden layer {index} takes {} inputs but upstream has {upstream}",
                    layer.num_inputs()
                )));
            }
            upstream = layer.len();
        }
        if self.output_layer.num_inputs() != upstream {
            return Err(NetError::InvariantViolation(format!(
                "output layer takes {} inputs but last hidden layer has {upstream}",
                self.output_layer.num_inputs()
            )));
        }
        Ok(())
    }

    pub(crate) fn ensure_fed(&self) -> Result<()> {
        if self.fed {
            Ok(())
        } else {
            Err(NetError::NotFedForward)
        }
    }
}

/// Any size disagreement inside a wired network is a bug, not bad input.
pub(crate) fn wiring_fault(err: NetError) -> NetError {
    match err {
        NetError::InvariantViolation(_) => err,
        other => NetError::InvariantViolation(other.to_string()),
    }
}

pub(crate) fn validate_topology(input_size: usize, hidden_sizes: &[usize], output_size: usize) -> Result<()> {
    if input_size == 0 {
        return Err(NetError::InvalidTopology("input size must be positive".into()));
    }
    if hidden_sizes.is_empty() {
        return Err(NetError::InvalidTopology("at least one hidden layer is required".into()));
    }
    if let Some(index) = hidden_sizes.iter().position(|&size| size == 0) {
        return Err(NetError::InvalidTopology(format!("hidden layer {index} has no neurons")));
    }
    if output_size == 0 {
        return Err(NetError::InvalidTopology("output size must be positive".into()));
    }
    Ok(())
}
