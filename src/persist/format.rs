//! The on-disk model layout:
//!
//! ```text
//! usize input_size
//! usize num_hidden_layers
//! usize hidden_layer_sizes[num_hidden_layers]
//! usize output_size
//! f64   learning_rate
//! f64   momentum
//! per hidden neuron (layer by layer), then per output neuron:
//!     usize num_inputs
//!     num_inputs x { f64 weight; f64 previous_adjustment }
//!     f64   bias_value
//!     f64   bias_weight
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{NetError, Result};
use crate::layers::dense::Layer;
use crate::layers::neuron::Neuron;
use crate::network::network::{validate_topology, Network};
use crate::persist::codec::{BinaryReader, BinaryWriter, Decode, Encode};

impl Encode for Neuron {
    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_usize(self.num_inputs())?;
        for (weight, adjustment) in self.weights().iter().zip(self.previous_adjustments()) {
            writer.write_f64(*weight)?;
            writer.write_f64(*adjustment)?;
        }
        writer.write_f64(self.bias_value())?;
        writer.write_f64(self.bias_weight())
    }
}

impl Decode for Neuron {
    fn decode<R: Read>(reader: &mut BinaryReader<R>) -> Result<Neuron> {
        let num_inputs = reader.read_usize("neuron input count")?;
        if num_inputs == 0 {
            return Err(NetError::CorruptData("neuron with zero inputs".into()));
        }
        let mut weights = Vec::new();
        let mut previous_adjustments = Vec::new();
        for _ in 0..num_inputs {
            weights.push(reader.read_f64("weight")?);
            previous_adjustments.push(reader.read_f64("previous adjustment")?);
        }
        let bias_value = reader.read_f64("bias value")?;
        let bias_weight = reader.read_f64("bias weight")?;
        Neuron::from_parts(weights, previous_adjustments, bias_value, bias_weight)
    }
}

impl Encode for Network {
    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_usize(self.input_size())?;
        writer.write_usize(self.num_hidden_layers())?;
        for layer in &self.hidden_layers {
            writer.write_usize(layer.len())?;
        }
        writer.write_usize(self.output_size())?;
        writer.write_f64(self.learning_rate)?;
        writer.write_f64(self.momentum)?;

        for layer in self.hidden_layers.iter().chain(std::iter::once(&self.output_layer)) {
            for neuron in layer.neurons() {
                neuron.encode(writer)?;
            }
        }
        Ok(())
    }
}

impl Decode for Network {
    /// Reads a complete network into fresh storage. Nothing is returned unless
    /// every field was read and the wiring checks out.
    fn decode<R: Read>(reader: &mut BinaryReader<R>) -> Result<Network> {
        let input_size = reader.read_usize("input size")?;
        let num_hidden = reader.read_usize("hidden layer count")?;
        let mut hidden_sizes = Vec::new();
        for _ in 0..num_hidden {
            hidden_sizes.push(reader.read_usize("hidden layer size")?);
        }
        let output_size = reader.read_usize("output size")?;
        let learning_rate = reader.read_f64("learning rate")?;
        let momentum = reader.read_f64("momentum")?;

        validate_topology(input_size, &hidden_sizes, output_size)
            .map_err(|e| NetError::CorruptData(e.to_string()))?;

        let mut hidden_layers = Vec::with_capacity(hidden_sizes.len());
        let mut upstream = input_size;
        for (index, &size) in hidden_sizes.iter().enumerate() {
            hidden_layers.push(decode_layer(reader, size, upstream, &format!("hidden layer {index}"))?);
            upstream = size;
        }
        let output_layer = decode_layer(reader, output_size, upstream, "output layer")?;

        Network::from_layers(input_size, hidden_layers, output_layer, learning_rate, momentum)
            .map_err(|e| NetError::CorruptData(e.to_string()))
    }
}

fn decode_layer<R: Read>(
    reader: &mut BinaryReader<R>,
    size: usize,
    expected_inputs: usize,
    name: &str,
) -> Result<Layer> {
    let mut neurons = Vec::new();
    for index in 0..size {
        let neuron = Neuron::decode(reader)?;
        if neuron.num_inputs() != expected_inputs {
            return Err(NetError::CorruptData(format!(
                "{name} neuron {index} has {} inputs, expected {expected_inputs}",
                neuron.num_inputs()
            )));
        }
        neurons.push(neuron);
    }
    Layer::from_neurons(neurons)
}

impl Network {
    /// Writes the network in the binary model format.
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = BinaryWriter::new(writer);
        self.encode(&mut writer)?;
        writer.flush()
    }

    /// Reads a network previously written by [`Network::save`].
    pub fn load<R: Read>(reader: R) -> Result<Network> {
        let mut reader = BinaryReader::new(reader);
        let network = Network::decode(&mut reader)?;
        debug!(bytes = reader.offset(), "decoded network");
        Ok(network)
    }

    /// Saves to `path` via a temporary file in the same directory, so an
    /// interrupted save never leaves a truncated model at `path`.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.save(&mut writer)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| NetError::Io(e.error))?;
        info!(path = %path.display(), topology = ?self.hidden_sizes(), "saved network");
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let network = Network::load(BufReader::new(file))?;
        info!(path = %path.display(), topology = ?network.hidden_sizes(), "loaded network");
        Ok(network)
    }
}
