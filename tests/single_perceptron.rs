use approx::assert_relative_eq;
use perceptron_net::{
    ConnectionId, NetError, Network, NetworkConfig, PerceptronId, Propagation, StateError,
};

/// One input (1.0) feeding one perceptron through a 0.5 weight.
fn single(propagation: Propagation) -> (Network, PerceptronId, ConnectionId) {
    let mut net = Network::with_config(NetworkConfig::new(1.0, propagation));
    let x = net.add_input(1.0);
    let c = net.connect(x, 0.5).unwrap();
    let y = net.add_perceptron(&[c]).unwrap();
    (net, y, c)
}

#[test]
fn threshold_and_sigmoid_outputs() {
    let (mut net, y, _) = single(Propagation::Memoized);
    assert_eq!(net.output(y, false).unwrap(), 1.0);
    assert_relative_eq!(net.output(y, true).unwrap(), 0.622_459_3, epsilon = 1e-7);
    let sigmoid = 1.0 / (1.0 + (-0.5f64).exp());
    assert_relative_eq!(net.output(y, true).unwrap(), sigmoid, epsilon = 1e-12);
}

#[test]
fn update_moves_weight_by_rate_times_delta_times_source() {
    for propagation in [Propagation::PerPath, Propagation::Memoized] {
        let (mut net, y, c) = single(propagation);
        net.output(y, true).unwrap();
        let delta = net.calculate_output_delta(y, 0.0).unwrap();
        net.update_connections(y).unwrap();
        assert_relative_eq!(net.weight(c).unwrap(), 0.5 + delta * 1.0, epsilon = 1e-12);
    }
}

// Per-path updates are not idempotent: a second call without a fresh forward
// and backward pass applies the same adjustment again.
#[test]
fn per_path_second_update_doubles_the_adjustment() {
    let (mut net, y, c) = single(Propagation::PerPath);
    net.output(y, true).unwrap();
    let delta = net.calculate_output_delta(y, 1.0).unwrap();

    net.update_connections(y).unwrap();
    net.update_connections(y).unwrap();

    assert_relative_eq!(net.weight(c).unwrap(), 0.5 + 2.0 * delta, epsilon = 1e-12);
}

// Memoized updates apply once per example; the second call is a no-op until
// the delta is reset.
#[test]
fn memoized_second_update_is_ignored_until_reset() {
    let (mut net, y, c) = single(Propagation::Memoized);
    net.output(y, true).unwrap();
    let delta = net.calculate_output_delta(y, 1.0).unwrap();

    net.update_connections(y).unwrap();
    net.update_connections(y).unwrap();
    assert_relative_eq!(net.weight(c).unwrap(), 0.5 + delta, epsilon = 1e-12);

    net.reset_delta(y).unwrap();
    assert!(matches!(
        net.update_connections(y),
        Err(NetError::InvalidState(StateError::DeltaNotComputed(p))) if p == y
    ));
}

#[test]
fn learning_rate_comes_from_config() {
    let mut net = Network::with_config(NetworkConfig::new(0.1, Propagation::Memoized));
    let x = net.add_input(2.0);
    let c = net.connect(x, 0.5).unwrap();
    let y = net.add_perceptron(&[c]).unwrap();

    net.output(y, true).unwrap();
    let delta = net.calculate_output_delta(y, 1.0).unwrap();
    net.update_connections(y).unwrap();

    assert_relative_eq!(net.weight(c).unwrap(), 0.5 + 0.1 * delta * 2.0, epsilon = 1e-12);
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

// Consecutive examples without reset_delta in between: each forward pass and
// target must yield that example's deltas and move the weight again.
#[test]
fn next_example_moves_weight_without_reset() {
    for propagation in [Propagation::PerPath, Propagation::Memoized] {
        let mut net = Network::with_config(NetworkConfig::new(1.0, propagation));
        let x = net.add_input(1.0);
        let c = net.connect(x, 0.5).unwrap();
        let y = net.add_perceptron(&[c]).unwrap();

        net.output(y, true).unwrap();
        net.calculate_output_delta(y, 1.0).unwrap();
        net.update_connections(y).unwrap();
        let first = net.weight(c).unwrap();

        net.set_input(x, -2.0).unwrap();
        let out = net.output(y, true).unwrap();
        let delta = net.calculate_output_delta(y, 0.0).unwrap();
        net.update_connections(y).unwrap();

        assert_relative_eq!(out, sigmoid(-2.0 * first), epsilon = 1e-12);
        assert_relative_eq!(delta, out * (1.0 - out) * (0.0 - out), epsilon = 1e-12);
        assert_relative_eq!(net.weight(c).unwrap(), first + delta * -2.0, epsilon = 1e-12);
    }
}

#[test]
fn memoized_new_target_applies_again() {
    let (mut net, y, c) = single(Propagation::Memoized);
    net.output(y, true).unwrap();
    let first = net.calculate_output_delta(y, 1.0).unwrap();
    net.update_connections(y).unwrap();

    let second = net.calculate_output_delta(y, 0.0).unwrap();
    net.update_connections(y).unwrap();

    assert_relative_eq!(net.weight(c).unwrap(), 0.5 + first + second, epsilon = 1e-12);
}

// x -> h (0.5) -> y (0.7), two examples back to back with no reset.
#[test]
fn hidden_delta_follows_the_latest_example() {
    for propagation in [Propagation::PerPath, Propagation::Memoized] {
        let mut net = Network::with_config(NetworkConfig::new(1.0, propagation));
        let x = net.add_input(1.0);
        let xh = net.connect(x, 0.5).unwrap();
        let h = net.add_perceptron(&[xh]).unwrap();
        let hy = net.connect(h, 0.7).unwrap();
        let y = net.add_perceptron(&[hy]).unwrap();

        net.output(y, true).unwrap();
        net.calculate_output_delta(y, 1.0).unwrap();

        net.set_input(x, -2.0).unwrap();
        net.output(y, true).unwrap();
        net.calculate_output_delta(y, 0.0).unwrap();

        let h_out = sigmoid(-1.0);
        let y_out = sigmoid(0.7 * h_out);
        let d_y = y_out * (1.0 - y_out) * (0.0 - y_out);
        let d_h = h_out * (1.0 - h_out) * (d_y * 0.7);
        assert_relative_eq!(net.get_delta(h).unwrap(), d_h, epsilon = 1e-12);
        assert_relative_eq!(d_h, -0.018_652, epsilon = 1e-6);
    }
}
