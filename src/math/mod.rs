pub mod random;

pub use random::{SequenceSource, WeightSource};
