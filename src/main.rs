use perceptron_net::{predict, train_network, NetError, NetworkConfig, TopologySpec};

// Trains XOR on a 2-2-1 network with a bias input.
// Other topologies:
//   cargo run --example topology -- demos/xor.json
fn main() -> Result<(), NetError> {
    tracing_subscriber::fmt::init();

    let mut rng = rand::thread_rng();
    let spec = TopologySpec::layered("xor", &[2, 2, 1], true, NetworkConfig::default(), &mut rng)?;
    let (mut network, layout) = spec.build()?;

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

    let epochs = 10000;
    for epoch in 0..epochs {
        let loss = train_network(&mut network, &layout, &inputs, &expected_outputs)?;
        if epoch % 1000 == 0 {
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    for input in &inputs {
        println!("Input: {:?} -> Output: {}", input, predict(&mut network, &layout, input)?[0]);
    }

    for &output in &layout.outputs {
        for row in network.final_weights(output)? {
            println!("{row}");
        }
    }
    Ok(())
}
