// Shared fixtures for the integration tests.
#![allow(dead_code)]

use ffbp_nn::{LayerId, Network};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// 2-2-1 network with hand-picked weights:
/// hidden 0: w = [0.5, -0.4], bias weight 0.1
/// hidden 1: w = [-0.3, 0.6], bias weight -0.2
/// output:   w = [0.7, -0.5], bias weight 0.3
pub fn fixed_2_2_1() -> Network {
    let mut net = Network::new(2, &[2], 1, &mut rng(0)).unwrap();
    let hidden = [([0.5, -0.4], 0.1), ([-0.3, 0.6], -0.2)];
    for (n, (w, b)) in hidden.iter().enumerate() {
        for (i, &wi) in w.iter().enumerate() {
            net.set_weight(LayerId::Hidden(0), n, i, wi).unwrap();
        }
        net.set_bias_weight(LayerId::Hidden(0), n, *b).unwrap();
    }
    net.set_weight(LayerId::Output, 0, 0, 0.7).unwrap();
    net.set_weight(LayerId::Output, 0, 1, -0.5).unwrap();
    net.set_bias_weight(LayerId::Output, 0, 0.3).unwrap();
    net
}

pub fn random_topology(rng: &mut ChaCha8Rng) -> (usize, Vec<usize>, usize) {
    let input = rng.gen_range(1..=8);
    let depth = rng.gen_range(1..=4);
    let hidden = (0..depth).map(|_| rng.gen_range(1..=8)).collect();
    let output = rng.gen_range(1..=4);
    (input, hidden, output)
}

pub fn random_input(rng: &mut ChaCha8Rng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.gen_range(-2.0..2.0)).collect()
}

/// Asserts every weighted layer reads exactly as many signals as its upstream produces.
pub fn assert_wired(net: &Network) {
    let mut upstream = net.input_size();
    for k in 0..net.num_hidden_layers() {
        let layer = net.hidden_layer(k).unwrap();
        assert!(layer.len() > 0);
        for neuron in layer.neurons() {
            assert_eq!(neuron.num_inputs(), upstream, "hidden layer {k}");
            assert_eq!(neuron.previous_adjustments().len(), upstream);
        }
        upstream = layer.len();
    }
    for neuron in net.output_layer().neurons() {
        assert_eq!(neuron.num_inputs(), upstream, "output layer");
    }
    net.verify_wiring().unwrap();
}
