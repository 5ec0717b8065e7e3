use crate::error::{NetError, Result};
use crate::layers::neuron::Neuron;
use crate::math::random::WeightSource;

/// A fully-connected layer: neurons that all read the same upstream signals.
///
/// Never empty, and every neuron has the same input count.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    neurons: Vec<Neuron>,
}

impl Layer {
    pub fn new<R: WeightSource + ?Sized>(size: usize, num_inputs: usize, rng: &mut R) -> Result<Layer> {
        if size == 0 {
            return Err(NetError::InvalidTopology("a layer needs at least one neuron".into()));
        }
        let neurons = (0..size)
            .map(|_| Neuron::new(num_inputs, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Layer { neurons })
    }

    /// Wraps already-built neurons; they must agree on their input count.
    pub fn from_neurons(neurons: Vec<Neuron>) -> Result<Layer> {
        let first = neurons
            .first()
            .ok_or_else(|| NetError::InvalidTopology("a layer needs at least one neuron".into()))?;
        let num_inputs = first.num_inputs();
        if let Some(odd) = neurons.iter().find(|n| n.num_inputs() != num_inputs) {
            return Err(NetError::DimensionMismatch {
                what: "layer neuron inputs",
                expected: num_inputs,
                actual: odd.num_inputs(),
            });
        }
        Ok(Layer { neurons })
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// Never true for a constructed layer.
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Number of upstream signals each neuron expects.
    pub fn num_inputs(&self) -> usize {
        self.neurons[0].num_inputs()
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub(crate) fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    pub fn neuron(&self, index: usize) -> Result<&Neuron> {
        self.neurons.get(index).ok_or(NetError::IndexOutOfRange {
            what: "neuron",
            index,
            len: self.neurons.len(),
        })
    }

    pub(crate) fn neuron_mut(&mut self, index: usize) -> Result<&mut Neuron> {
        let len = self.neurons.len();
        self.neurons.get_mut(index).ok_or(NetError::IndexOutOfRange {
            what: "neuron",
            index,
            len,
        })
    }

    /// Activates every neuron on `inputs`; returns the new outputs in neuron order.
    pub fn feed(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        self.neurons.iter_mut().map(|n| n.activate(inputs)).collect()
    }

    /// Cached outputs from the last `feed`.
    pub fn outputs(&self) -> Vec<f64> {
        self.neurons.iter().map(Neuron::output).collect()
    }

    /// Makes every neuron accept exactly `num_inputs` upstream signals.
    pub fn rewire_inputs<R: WeightSource + ?Sized>(&mut self, num_inputs: usize, rng: &mut R) -> Result<()> {
        if num_inputs == 0 {
            return Err(NetError::InvalidTopology("a layer cannot be wired to zero inputs".into()));
        }
        for neuron in self.neurons.iter_mut() {
            neuron.resize_inputs(num_inputs, rng)?;
        }
        Ok(())
    }

    /// Changes the neuron count to `size`, appending fresh neurons or dropping from the end.
    pub fn resize<R: WeightSource + ?Sized>(&mut self, size: usize, rng: &mut R) -> Result<()> {
        if size == 0 {
            return Err(NetError::InvalidTopology("a layer needs at least one neuron".into()));
        }
        let num_inputs = self.num_inputs();
        if size < self.neurons.len() {
            self.neurons.truncate(size);
        } else {
            while self.neurons.len() < size {
                self.neurons.push(Neuron::new(num_inputs, rng)?);
            }
        }
        Ok(())
    }

    pub fn randomize<R: WeightSource + ?Sized>(&mut self, rng: &mut R) {
        for neuron in self.neurons.iter_mut() {
            neuron.randomize(rng);
        }
    }

    pub fn perturb<R: WeightSource + ?Sized>(&mut self, scale: f64, rng: &mut R) {
        for neuron in self.neurons.iter_mut() {
            neuron.perturb(scale, rng);
        }
    }
}
