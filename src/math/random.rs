use rand::Rng;

/// Source of initial weights and perturbation noise.
///
/// Every call yields one value uniformly distributed in `[-1, 1]`. Anything
/// implementing `rand::Rng` is a `WeightSource`; tests that need exact weights
/// can inject a [`SequenceSource`] instead.
pub trait WeightSource {
    fn next_weight(&mut self) -> f64;
}

impl<R: Rng + ?Sized> WeightSource for R {
    fn next_weight(&mut self) -> f64 {
        self.gen_range(-1.0..=1.0)
    }
}

/// Replays a fixed list of weights, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// Values outside `[-1, 1]` are clamped so the source keeps the
    /// `WeightSource` contract.
    pub fn new(values: Vec<f64>) -> SequenceSource {
        let values = if values.is_empty() { vec![0.0] } else { values };
        SequenceSource {
            values: values.into_iter().map(|v| v.clamp(-1.0, 1.0)).collect(),
            cursor: 0,
        }
    }

    /// A source that always yields `value`.
    pub fn constant(value: f64) -> SequenceSource {
        SequenceSource::new(vec![value])
    }
}

impl WeightSource for SequenceSource {
    fn next_weight(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rng_weights_stay_in_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10_000 {
            let w = rng.next_weight();
            assert!((-1.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn seeded_rngs_are_reproducible() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(a.next_weight().to_bits(), b.next_weight().to_bits());
        }
    }

    #[test]
    fn sequence_source_wraps_and_clamps() {
        let mut src = SequenceSource::new(vec![0.5, -3.0]);
        assert_eq!(src.next_weight(), 0.5);
        assert_eq!(src.next_weight(), -1.0);
        assert_eq!(src.next_weight(), 0.5);
    }

    #[test]
    fn empty_sequence_yields_zero() {
        let mut src = SequenceSource::new(vec![]);
        assert_eq!(src.next_weight(), 0.0);
    }
}
