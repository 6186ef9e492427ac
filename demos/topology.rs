//! Loads a JSON topology, trains it on XOR and prints threshold predictions.
//!
//!   cargo run --example topology -- demos/xor.json [epochs]

use perceptron_net::{predict, train_network, NetError, TopologySpec};

fn main() -> Result<(), NetError> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "demos/xor.json".to_string());
    let epochs: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(5000);

    let spec = TopologySpec::load_json(&path)?;
    let (mut network, layout) = spec.build()?;
    println!(
        "Loaded `{}`: {} inputs, {} perceptrons, {} connections ({:?})",
        spec.name,
        network.input_count(),
        network.perceptron_count(),
        network.connection_count(),
        network.config().propagation,
    );

    let samples = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]];
    let targets = vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]];

    for epoch in 0..epochs {
        let loss = train_network(&mut network, &layout, &samples, &targets)?;
        if epoch % 500 == 0 {
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    for sample in &samples {
        println!("{:?} -> {:?}", sample, predict(&mut network, &layout, sample)?);
    }
    Ok(())
}
