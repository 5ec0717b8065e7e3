pub mod network;
pub mod spec;
mod backprop;
mod topology;

pub use network::{LayerId, Network};
pub use spec::NetworkSpec;
