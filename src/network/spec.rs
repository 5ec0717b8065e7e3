use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::random::WeightSource;
use crate::network::network::{validate_topology, Network, DEFAULT_LEARNING_RATE, DEFAULT_MOMENTUM};

/// A serializable description of a network's shape and hyperparameters.
///
/// `NetworkSpec` can be saved to / loaded from JSON independently of any
/// trained weights, so a training setup can be stored before a network exists.
///
/// Fields:
/// - `input_size`   : length of the feature vector the network consumes
/// - `hidden_sizes` : neuron count of every hidden layer, input side first
/// - `output_size`  : number of output neurons
/// - `learning_rate` / `momentum`: online SGD hyperparameters (both default to 1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used as the model file stem.
    pub name: String,
    pub input_size: usize,
    pub hidden_sizes: Vec<usize>,
    pub output_size: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_momentum")]
    pub momentum: f64,
}

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

fn default_momentum() -> f64 {
    DEFAULT_MOMENTUM
}

impl NetworkSpec {
    pub fn new(name: &str, input_size: usize, hidden_sizes: Vec<usize>, output_size: usize) -> NetworkSpec {
        NetworkSpec {
            name: name.to_string(),
            input_size,
            hidden_sizes,
            output_size,
            learning_rate: DEFAULT_LEARNING_RATE,
            momentum: DEFAULT_MOMENTUM,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_topology(self.input_size, &self.hidden_sizes, self.output_size)
    }

    /// Builds a randomly initialised network of this shape.
    pub fn build<R: WeightSource + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        let mut network = Network::new(self.input_size, &self.hidden_sizes, self.output_size, rng)?;
        network.set_learning_rate(self.learning_rate);
        network.set_momentum(self.momentum);
        Ok(network)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        spec.validate()?;
        Ok(spec)
    }
}

impl Network {
    /// Captures this network's current shape and hyperparameters.
    pub fn spec(&self, name: &str) -> NetworkSpec {
        NetworkSpec {
            name: name.to_string(),
            input_size: self.input_size(),
            hidden_sizes: self.hidden_sizes(),
            output_size: self.output_size(),
            learning_rate: self.learning_rate(),
            momentum: self.momentum(),
        }
    }
}
