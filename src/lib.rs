pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod persist;
pub mod train;

// Convenience re-exports
pub use error::{NetError, Result};
pub use math::random::{SequenceSource, WeightSource};
pub use activation::logistic::Logistic;
pub use layers::dense::Layer;
pub use layers::neuron::Neuron;
pub use network::network::{LayerId, Network};
pub use network::spec::NetworkSpec;
pub use loss::mse::MseLoss;
pub use train::{train_loop, train_network, EpochStats, TrainConfig};
