use ffbp_nn::{train_loop, Network, TrainConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

fn main() -> ffbp_nn::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let mut rng = StdRng::seed_from_u64(2024);
    let mut network = Network::new(2, &[2], 1, &mut rng)?;
    network.set_learning_rate(0.5);
    network.set_momentum(0.5);

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ];

    let config = TrainConfig::new(10_000).with_target_loss(0.001);
    let loss = train_loop(&mut network, &inputs, &expected_outputs, &config, &mut rng)?;
    info!(loss, "training finished");

    for input in &inputs {
        network.feed_forward(input)?;
        let output = network.output_values()?[0];
        println!("Input: {:?} -> Output: {:.4} (decision {})", input, output, output.round());
    }

    network.save_to_file("xor.bin")?;
    Ok(())
}
