// All network logic lives in the library (src/lib.rs and its modules).
// This binary only inspects saved models:
//   cargo run -- path/to/model.bin
// Train a demo model with:
//   cargo run --example xor
use std::process::ExitCode;

use ffbp_nn::Network;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let Some(path) = std::env::args().nth(1) else {
        println!("ffbp-nn: a feedforward backpropagation network with a binary model format.");
        println!("usage: ffbp-nn <model.bin>");
        return ExitCode::SUCCESS;
    };

    match Network::load_from_file(&path) {
        Ok(network) => {
            info!(
                input_size = network.input_size(),
                hidden = ?network.hidden_sizes(),
                output_size = network.output_size(),
                learning_rate = network.learning_rate(),
                momentum = network.momentum(),
                "model summary"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(%path, error = %e, "could not load model");
            ExitCode::FAILURE
        }
    }
}
