use crate::activation::logistic::Logistic;
use crate::error::{NetError, Result};
use crate::math::random::WeightSource;

/// Bias input every freshly built neuron starts with.
pub const DEFAULT_BIAS_VALUE: f64 = 1.0;

/// A single logistic unit with one weight per upstream signal.
///
/// `weights` and `previous_adjustments` always have the same, non-zero length.
/// `previous_adjustments[i]` is the last gradient step applied to `weights[i]`
/// and feeds the momentum term of the next update.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    weights: Vec<f64>,
    previous_adjustments: Vec<f64>,
    bias_value: f64,
    bias_weight: f64,
    output: f64,
}

impl Neuron {
    /// Builds a neuron with `num_inputs` random weights and a random bias weight.
    pub fn new<R: WeightSource + ?Sized>(num_inputs: usize, rng: &mut R) -> Result<Neuron> {
        if num_inputs == 0 {
            return Err(NetError::InvalidArgument("a neuron needs at least one input".into()));
        }
        let mut neuron = Neuron {
            weights: vec![0.0; num_inputs],
            previous_adjustments: vec![0.0; num_inputs],
            bias_value: DEFAULT_BIAS_VALUE,
            bias_weight: 0.0,
            output: 0.0,
        };
        neuron.randomize(rng);
        Ok(neuron)
    }

    /// Builds a neuron from explicit state, e.g. when decoding a saved model.
    pub fn from_parts(
        weights: Vec<f64>,
        previous_adjustments: Vec<f64>,
        bias_value: f64,
        bias_weight: f64,
    ) -> Result<Neuron> {
        if weights.is_empty() {
            return Err(NetError::InvalidArgument("a neuron needs at least one input".into()));
        }
        if weights.len() != previous_adjustments.len() {
            return Err(NetError::DimensionMismatch {
                what: "previous adjustments",
                expected: weights.len(),
                actual: previous_adjustments.len(),
            });
        }
        Ok(Neuron {
            weights,
            previous_adjustments,
            bias_value,
            bias_weight,
            output: 0.0,
        })
    }

    pub fn num_inputs(&self) -> usize {
        self.weights.len()
    }

    /// Weighted sum plus bias, squashed through the logistic function.
    /// The result is cached as this neuron's output for downstream layers and backprop.
    pub fn activate(&mut self, inputs: &[f64]) -> Result<f64> {
        if inputs.len() != self.weights.len() {
            return Err(NetError::DimensionMismatch {
                what: "neuron inputs",
                expected: self.weights.len(),
                actual: inputs.len(),
            });
        }
        // Summation order is fixed so repeated passes are bit-identical.
        let mut x = self.bias_value * self.bias_weight;
        for (input, weight) in inputs.iter().zip(self.weights.iter()) {
            x += input * weight;
        }
        self.output = Logistic::function(x);
        Ok(self.output)
    }

    /// Last value produced by [`Neuron::activate`].
    pub fn output(&self) -> f64 {
        self.output
    }

    /// Logistic derivative at the cached output. Only meaningful after `activate`.
    pub fn derivative(&self) -> f64 {
        Logistic::derivative(self.output)
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weight(&self, index: usize) -> Result<f64> {
        self.weights.get(index).copied().ok_or(NetError::IndexOutOfRange {
            what: "neuron weight",
            index,
            len: self.weights.len(),
        })
    }

    pub fn update_weight(&mut self, index: usize, new_weight: f64) -> Result<()> {
        let len = self.weights.len();
        let slot = self.weights.get_mut(index).ok_or(NetError::IndexOutOfRange {
            what: "neuron weight",
            index,
            len,
        })?;
        *slot = new_weight;
        Ok(())
    }

    pub fn previous_adjustments(&self) -> &[f64] {
        &self.previous_adjustments
    }

    pub fn previous_adjustment(&self, index: usize) -> Result<f64> {
        self.previous_adjustments.get(index).copied().ok_or(NetError::IndexOutOfRange {
            what: "previous adjustment",
            index,
            len: self.previous_adjustments.len(),
        })
    }

    pub fn update_previous_adjustment(&mut self, index: usize, delta: f64) -> Result<()> {
        let len = self.previous_adjustments.len();
        let slot = self.previous_adjustments.get_mut(index).ok_or(NetError::IndexOutOfRange {
            what: "previous adjustment",
            index,
            len,
        })?;
        *slot = delta;
        Ok(())
    }

    pub fn bias_value(&self) -> f64 {
        self.bias_value
    }

    pub fn set_bias_value(&mut self, bias_value: f64) {
        self.bias_value = bias_value;
    }

    pub fn bias_weight(&self) -> f64 {
        self.bias_weight
    }

    pub fn set_bias_weight(&mut self, bias_weight: f64) {
        self.bias_weight = bias_weight;
    }

    /// Grows or shrinks the input count to exactly `num_inputs`.
    ///
    /// New inputs get random weights and a zero adjustment history; shrinking
    /// drops weights from the end. Existing weights are untouched either way.
    pub fn resize_inputs<R: WeightSource + ?Sized>(&mut self, num_inputs: usize, rng: &mut R) -> Result<()> {
        if num_inputs == 0 {
            return Err(NetError::InvalidArgument("a neuron needs at least one input".into()));
        }
        if num_inputs < self.weights.len() {
            self.weights.truncate(num_inputs);
            self.previous_adjustments.truncate(num_inputs);
        } else {
            while self.weights.len() < num_inputs {
                self.weights.push(rng.next_weight());
                self.previous_adjustments.push(0.0);
            }
        }
        Ok(())
    }

    /// Draws every weight, bias weight included, afresh from `[-1, 1]`.
    pub fn randomize<R: WeightSource + ?Sized>(&mut self, rng: &mut R) {
        for w in self.weights.iter_mut() {
            *w = rng.next_weight();
        }
        self.bias_weight = rng.next_weight();
    }

    /// Adds `scale * u` (u uniform in `[-1, 1]`) to every weight, bias weight included.
    /// Adjustment history is left alone; this is not a gradient step.
    pub fn perturb<R: WeightSource + ?Sized>(&mut self, scale: f64, rng: &mut R) {
        for w in self.weights.iter_mut() {
            *w += rng.next_weight() * scale;
        }
        self.bias_weight += rng.next_weight() * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::random::SequenceSource;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixed(weights: Vec<f64>, bias_weight: f64) -> Neuron {
        let n = weights.len();
        Neuron::from_parts(weights, vec![0.0; n], 1.0, bias_weight).unwrap()
    }

    #[test]
    fn new_rejects_zero_inputs() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(Neuron::new(0, &mut rng), Err(NetError::InvalidArgument(_))));
    }

    #[test]
    fn new_neuron_has_consistent_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let n = Neuron::new(5, &mut rng).unwrap();
        assert_eq!(n.num_inputs(), 5);
        assert_eq!(n.previous_adjustments(), &[0.0; 5]);
        assert_eq!(n.bias_value(), DEFAULT_BIAS_VALUE);
        assert!(n.weights().iter().all(|w| (-1.0..=1.0).contains(w)));
        assert!((-1.0..=1.0).contains(&n.bias_weight()));
    }

    #[test]
    fn activate_computes_biased_weighted_sum() {
        let mut n = fixed(vec![0.5, -0.25], 0.1);
        let out = n.activate(&[2.0, 4.0]).unwrap();
        // 0.1 + 1.0 - 1.0
        assert_relative_eq!(out, 1.0 / (1.0 + (-0.1f64).exp()), epsilon = 1e-15);
        assert_eq!(n.output(), out);
    }

    #[test]
    fn activate_honours_bias_value() {
        let mut n = fixed(vec![0.0], 0.5);
        n.set_bias_value(-2.0);
        let out = n.activate(&[3.0]).unwrap();
        assert_relative_eq!(out, Logistic::function(-1.0), epsilon = 1e-15);
    }

    #[test]
    fn activate_rejects_wrong_length() {
        let mut n = fixed(vec![0.5, 0.5], 0.0);
        assert!(matches!(
            n.activate(&[1.0]),
            Err(NetError::DimensionMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn derivative_uses_cached_output() {
        let mut n = fixed(vec![1.0], 0.0);
        n.activate(&[0.0]).unwrap();
        assert_relative_eq!(n.derivative(), 0.25);
    }

    #[test]
    fn mutators_check_bounds() {
        let mut n = fixed(vec![0.1, 0.2], 0.0);
        n.update_weight(1, 0.9).unwrap();
        n.update_previous_adjustment(0, -0.3).unwrap();
        assert_eq!(n.weight(1).unwrap(), 0.9);
        assert_eq!(n.previous_adjustment(0).unwrap(), -0.3);
        assert!(matches!(n.update_weight(2, 0.0), Err(NetError::IndexOutOfRange { index: 2, len: 2, .. })));
        assert!(matches!(n.update_previous_adjustment(5, 0.0), Err(NetError::IndexOutOfRange { .. })));
        assert!(n.weight(2).is_err());
    }

    #[test]
    fn resize_inputs_grows_with_fresh_weights() {
        let mut n = fixed(vec![0.1, 0.2], 0.0);
        n.update_previous_adjustment(1, 0.7).unwrap();
        let mut src = SequenceSource::constant(0.42);
        n.resize_inputs(4, &mut src).unwrap();
        assert_eq!(n.weights(), &[0.1, 0.2, 0.42, 0.42]);
        assert_eq!(n.previous_adjustments(), &[0.0, 0.7, 0.0, 0.0]);
    }

    #[test]
    fn resize_inputs_truncates_from_the_end() {
        let mut n = fixed(vec![0.1, 0.2, 0.3], 0.0);
        let mut src = SequenceSource::constant(0.0);
        n.resize_inputs(1, &mut src).unwrap();
        assert_eq!(n.weights(), &[0.1]);
        assert_eq!(n.previous_adjustments().len(), 1);
    }

    #[test]
    fn resize_inputs_rejects_zero() {
        let mut n = fixed(vec![0.1], 0.0);
        let mut src = SequenceSource::constant(0.0);
        assert!(matches!(n.resize_inputs(0, &mut src), Err(NetError::InvalidArgument(_))));
        assert_eq!(n.num_inputs(), 1);
    }

    #[test]
    fn randomize_touches_bias_weight() {
        let mut n = fixed(vec![0.1, 0.2], 0.3);
        let mut src = SequenceSource::new(vec![-0.5, 0.5, 0.9]);
        n.randomize(&mut src);
        assert_eq!(n.weights(), &[-0.5, 0.5]);
        assert_eq!(n.bias_weight(), 0.9);
    }

    #[test]
    fn perturb_adds_scaled_noise() {
        let mut n = fixed(vec![0.1, 0.2], 0.3);
        let mut src = SequenceSource::new(vec![1.0, -1.0, 0.5]);
        n.perturb(0.1, &mut src);
        assert_relative_eq!(n.weight(0).unwrap(), 0.2, epsilon = 1e-15);
        assert_relative_eq!(n.weight(1).unwrap(), 0.1, epsilon = 1e-15);
        assert_relative_eq!(n.bias_weight(), 0.35, epsilon = 1e-15);
    }

    #[test]
    fn from_parts_rejects_mismatched_history() {
        assert!(matches!(
            Neuron::from_parts(vec![0.1, 0.2], vec![0.0], 1.0, 0.0),
            Err(NetError::DimensionMismatch { .. })
        ));
        assert!(Neuron::from_parts(vec![], vec![], 1.0, 0.0).is_err());
    }
}
