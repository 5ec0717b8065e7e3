//! Structural edits on a live network.
//!
//! Every edit validates its arguments before touching anything, then finishes
//! by calling [`Network::rewire`] on the one layer whose upstream changed.
//! Cached activations are discarded afterwards and the whole chain is re-verified.

use tracing::debug;

use crate::error::{NetError, Result};
use crate::layers::dense::Layer;
use crate::math::random::WeightSource;
use crate::network::network::Network;

impl Network {
    /// Changes the input vector length. Only the first hidden layer is rewired.
    pub fn resize_input_layer<R: WeightSource + ?Sized>(&mut self, size: usize, rng: &mut R) -> Result<()> {
        if size == 0 {
            return Err(NetError::InvalidTopology("input size must be positive".into()));
        }
        self.input_layer.resize(size, 0.0);
        self.rewire(0, rng)?;
        debug!(input_size = size, "resized input layer");
        self.after_structural_change()
    }

    /// Changes the neuron count of hidden layer `index` and rewires whatever
    /// follows it (the next hidden layer, or the output layer).
    pub fn resize_hidden_layer<R: WeightSource + ?Sized>(
        &mut self,
        index: usize,
        size: usize,
        rng: &mut R,
    ) -> Result<()> {
        self.check_hidden_index(index)?;
        if size == 0 {
            return Err(NetError::InvalidTopology(format!("hidden layer {index} cannot be emptied")));
        }
        self.hidden_layers[index].resize(size, rng)?;
        self.rewire(index + 1, rng)?;
        debug!(index, size, "resized hidden layer");
        self.after_structural_change()
    }

    /// Inserts a fresh hidden layer so that it ends up at `before_index`.
    ///
    /// Any `before_index >= num_hidden_layers()` appends just ahead of the output layer.
    /// The new layer reads from whatever precedes it, and the layer it displaced
    /// is rewired to read from the new one.
    pub fn insert_hidden_layer<R: WeightSource + ?Sized>(
        &mut self,
        before_index: usize,
        size: usize,
        rng: &mut R,
    ) -> Result<()> {
        let before_index = before_index.min(self.hidden_layers.len());
        if size == 0 {
            return Err(NetError::InvalidTopology("a hidden layer needs at least one neuron".into()));
        }
        let layer = Layer::new(size, self.upstream_size(before_index), rng)?;
        self.hidden_layers.insert(before_index, layer);
        self.rewire(before_index + 1, rng)?;
        debug!(index = before_index, size, layers = self.hidden_layers.len(), "inserted hidden layer");
        self.after_structural_change()
    }

    /// Drops hidden layer `index`; the layer that followed it is rewired to
    /// read from the layer that preceded it. The last hidden layer cannot go.
    pub fn remove_hidden_layer<R: WeightSource + ?Sized>(&mut self, index: usize, rng: &mut R) -> Result<()> {
        self.check_hidden_index(index)?;
        if self.hidden_layers.len() == 1 {
            return Err(NetError::InvalidTopology("cannot remove the only hidden layer".into()));
        }
        self.hidden_layers.remove(index);
        self.rewire(index, rng)?;
        debug!(index, layers = self.hidden_layers.len(), "removed hidden layer");
        self.after_structural_change()
    }

    /// Changes the number of output neurons. Nothing downstream needs rewiring.
    pub fn resize_output_layer<R: WeightSource + ?Sized>(&mut self, size: usize, rng: &mut R) -> Result<()> {
        if size == 0 {
            return Err(NetError::InvalidTopology("output size must be positive".into()));
        }
        self.output_layer.resize(size, rng)?;
        debug!(output_size = size, "resized output layer");
        self.after_structural_change()
    }

    /// Number of signals feeding the weighted layer at `position`
    /// (`0..num_hidden_layers()` for hidden layers, `num_hidden_layers()` for output).
    fn upstream_size(&self, position: usize) -> usize {
        match position {
            0 => self.input_layer.len(),
            p => self.hidden_layers[p - 1].len(),
        }
    }

    /// Rewires the weighted layer at `position` to accept its upstream's size.
    fn rewire<R: WeightSource + ?Sized>(&mut self, position: usize, rng: &mut R) -> Result<()> {
        let upstream = self.upstream_size(position);
        let layer = if position == self.hidden_layers.len() {
            &mut self.output_layer
        } else {
            &mut self.hidden_layers[position]
        };
        layer.rewire_inputs(upstream, rng)
    }

    fn check_hidden_index(&self, index: usize) -> Result<()> {
        if index >= self.hidden_layers.len() {
            return Err(NetError::IndexOutOfRange {
                what: "hidden layer",
                index,
                len: self.hidden_layers.len(),
            });
        }
        Ok(())
    }

    /// Drops cached activations and re-checks the whole chain's wiring.
    fn after_structural_change(&mut self) -> Result<()> {
        self.fed = false;
        self.verify_wiring()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn net(hidden: &[usize]) -> (Network, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let net = Network::new(3, hidden, 2, &mut rng).unwrap();
        (net, rng)
    }

    #[test]
    fn resize_input_layer_rewires_first_hidden_layer_only() {
        let (mut n, mut rng) = net(&[4, 5]);
        n.resize_input_layer(7, &mut rng).unwrap();
        assert_eq!(n.input_size(), 7);
        assert_eq!(n.hidden_layer(0).unwrap().num_inputs(), 7);
        assert_eq!(n.hidden_layer(1).unwrap().num_inputs(), 4);
        assert!(n.resize_input_layer(0, &mut rng).is_err());
        assert_eq!(n.input_size(), 7);
    }

    #[test]
    fn resize_last_hidden_layer_rewires_output() {
        let (mut n, mut rng) = net(&[4, 5]);
        n.resize_hidden_layer(1, 2, &mut rng).unwrap();
        assert_eq!(n.hidden_sizes(), vec![4, 2]);
        assert_eq!(n.output_layer().num_inputs(), 2);
        assert_eq!(n.output_size(), 2);
    }

    #[test]
    fn resize_inner_hidden_layer_rewires_next_hidden_layer() {
        let (mut n, mut rng) = net(&[4, 5, 6]);
        n.resize_hidden_layer(0, 9, &mut rng).unwrap();
        assert_eq!(n.hidden_layer(1).unwrap().num_inputs(), 9);
        assert_eq!(n.hidden_layer(2).unwrap().num_inputs(), 5);
        n.verify_wiring().unwrap();
    }

    #[test]
    fn resize_hidden_layer_validates_first() {
        let (mut n, mut rng) = net(&[4]);
        let before = n.clone();
        assert!(matches!(n.resize_hidden_layer(1, 3, &mut rng), Err(NetError::IndexOutOfRange { .. })));
        assert!(matches!(n.resize_hidden_layer(0, 0, &mut rng), Err(NetError::InvalidTopology(_))));
        assert_eq!(n, before);
    }

    #[test]
    fn insert_at_front_reads_from_inputs() {
        let (mut n, mut rng) = net(&[4]);
        n.insert_hidden_layer(0, 6, &mut rng).unwrap();
        assert_eq!(n.hidden_sizes(), vec![6, 4]);
        assert_eq!(n.hidden_layer(0).unwrap().num_inputs(), 3);
        assert_eq!(n.hidden_layer(1).unwrap().num_inputs(), 6);
    }

    #[test]
    fn insert_at_end_feeds_output() {
        let (mut n, mut rng) = net(&[4]);
        n.insert_hidden_layer(1, 8, &mut rng).unwrap();
        assert_eq!(n.hidden_sizes(), vec![4, 8]);
        assert_eq!(n.hidden_layer(1).unwrap().num_inputs(), 4);
        assert_eq!(n.output_layer().num_inputs(), 8);
    }

    #[test]
    fn insert_in_middle_splices_wiring() {
        let (mut n, mut rng) = net(&[4, 5]);
        n.insert_hidden_layer(1, 7, &mut rng).unwrap();
        assert_eq!(n.hidden_sizes(), vec![4, 7, 5]);
        assert_eq!(n.hidden_layer(1).unwrap().num_inputs(), 4);
        assert_eq!(n.hidden_layer(2).unwrap().num_inputs(), 7);
        assert_eq!(n.output_layer().num_inputs(), 5);
    }

    #[test]
    fn insert_rejects_empty_layer() {
        let (mut n, mut rng) = net(&[4]);
        assert!(matches!(n.insert_hidden_layer(0, 0, &mut rng), Err(NetError::InvalidTopology(_))));
        assert!(matches!(n.insert_hidden_layer(usize::MAX, 0, &mut rng), Err(NetError::InvalidTopology(_))));
        assert_eq!(n.num_hidden_layers(), 1);
    }

    #[test]
    fn insert_past_the_end_appends() {
        let (mut n, mut rng) = net(&[4]);
        n.insert_hidden_layer(5, 6, &mut rng).unwrap();
        assert_eq!(n.hidden_sizes(), vec![4, 6]);
        assert_eq!(n.hidden_layer(1).unwrap().num_inputs(), 4);
        assert_eq!(n.output_layer().num_inputs(), 6);

        n.insert_hidden_layer(usize::MAX, 2, &mut rng).unwrap();
        assert_eq!(n.hidden_sizes(), vec![4, 6, 2]);
        assert_eq!(n.output_layer().num_inputs(), 2);
        n.verify_wiring().unwrap();
    }

    #[test]
    fn every_edit_leaves_verified_wiring() {
        let (mut n, mut rng) = net(&[4, 5]);
        n.resize_input_layer(2, &mut rng).unwrap();
        n.insert_hidden_layer(1, 3, &mut rng).unwrap();
        n.resize_hidden_layer(2, 7, &mut rng).unwrap();
        n.remove_hidden_layer(0, &mut rng).unwrap();
        n.resize_output_layer(4, &mut rng).unwrap();
        assert_eq!(n.hidden_sizes(), vec![3, 7]);
        assert_eq!(n.hidden_layer(0).unwrap().num_inputs(), 2);
        n.verify_wiring().unwrap();
    }

    #[test]
    fn remove_first_layer_rewires_to_inputs() {
        let (mut n, mut rng) = net(&[4, 5]);
        n.remove_hidden_layer(0, &mut rng).unwrap();
        assert_eq!(n.hidden_sizes(), vec![5]);
        assert_eq!(n.hidden_layer(0).unwrap().num_inputs(), 3);
    }

    #[test]
    fn remove_last_layer_rewires_output() {
        let (mut n, mut rng) = net(&[4, 5]);
        n.remove_hidden_layer(1, &mut rng).unwrap();
        assert_eq!(n.hidden_sizes(), vec![4]);
        assert_eq!(n.output_layer().num_inputs(), 4);
    }

    #[test]
    fn remove_middle_layer_bridges_neighbours() {
        let (mut n, mut rng) = net(&[4, 5, 6]);
        n.remove_hidden_layer(1, &mut rng).unwrap();
        assert_eq!(n.hidden_sizes(), vec![4, 6]);
        assert_eq!(n.hidden_layer(1).unwrap().num_inputs(), 4);
    }

    #[test]
    fn remove_refuses_only_hidden_layer() {
        let (mut n, mut rng) = net(&[4]);
        assert!(matches!(n.remove_hidden_layer(0, &mut rng), Err(NetError::InvalidTopology(_))));
        assert!(matches!(n.remove_hidden_layer(3, &mut rng), Err(NetError::IndexOutOfRange { .. })));
        assert_eq!(n.num_hidden_layers(), 1);
    }

    #[test]
    fn resize_output_layer_keeps_input_wiring() {
        let (mut n, mut rng) = net(&[4]);
        n.resize_output_layer(6, &mut rng).unwrap();
        assert_eq!(n.output_size(), 6);
        assert!(n.output_layer().neurons().iter().all(|neuron| neuron.num_inputs() == 4));
        assert!(n.resize_output_layer(0, &mut rng).is_err());
    }

    #[test]
    fn structural_change_invalidates_outputs() {
        let (mut n, mut rng) = net(&[4]);
        n.feed_forward(&[0.1, 0.2, 0.3]).unwrap();
        n.resize_hidden_layer(0, 2, &mut rng).unwrap();
        assert!(matches!(n.output_values(), Err(NetError::NotFedForward)));
    }
}
