use tracing::debug;

use crate::{
    error::NetError,
    loss::squared::SquaredError,
    network::{Layout, Network},
};

/// Runs one online training step and returns the example's squared-error loss
/// measured on the training-mode (sigmoid) outputs.
///
/// The step follows the per-example protocol: load `values` into the inputs,
/// evaluate every output, compute every output delta against `targets`,
/// update the weights from every output, then reset the deltas so the next
/// example starts clean.
pub fn train_example(
    network: &mut Network,
    layout: &Layout,
    values: &[f64],
    targets: &[f64],
) -> Result<f64, NetError> {
    check_len("targets", layout.outputs.len(), targets.len())?;
    load_inputs(network, layout, values)?;

    let mut outputs = Vec::with_capacity(layout.outputs.len());
    for &output in &layout.outputs {
        outputs.push(network.output(output, true)?);
    }
    for (&output, &target) in layout.outputs.iter().zip(targets) {
        network.calculate_output_delta(output, target)?;
    }
    for &output in &layout.outputs {
        network.update_connections(output)?;
    }
    for &output in &layout.outputs {
        network.reset_delta(output)?;
    }

    let loss = SquaredError::loss(&outputs, targets);
    debug!(loss, "trained example");
    Ok(loss)
}

/// One pass over `samples` in the given order; returns the mean loss.
///
/// How many passes to make, and when to stop, is up to the caller.
pub fn train_network(
    network: &mut Network,
    layout: &Layout,
    samples: &[Vec<f64>],
    targets: &[Vec<f64>],
) -> Result<f64, NetError> {
    check_len("targets per sample", samples.len(), targets.len())?;
    if samples.is_empty() {
        return Ok(0.0);
    }

    let mut total_loss = 0.0;
    for (sample, target) in samples.iter().zip(targets) {
        total_loss += train_example(network, layout, sample, target)?;
    }
    Ok(total_loss / samples.len() as f64)
}

/// Threshold (0/1) outputs for `values`.
pub fn predict(
    network: &mut Network,
    layout: &Layout,
    values: &[f64],
) -> Result<Vec<f64>, NetError> {
    load_inputs(network, layout, values)?;
    layout.outputs.iter()
        .map(|&output| network.output(output, false))
        .collect()
}

fn load_inputs(network: &mut Network, layout: &Layout, values: &[f64]) -> Result<(), NetError> {
    check_len("inputs", layout.inputs.len(), values.len())?;
    for (&input, &value) in layout.inputs.iter().zip(values) {
        network.set_input(input, value)?;
    }
    Ok(())
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), NetError> {
    if expected != actual {
        return Err(NetError::Cardinality { what, expected, actual });
    }
    Ok(())
}
