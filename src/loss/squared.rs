/// Squared-error objective used by the backward pass.
pub struct SquaredError;

impl SquaredError {
    /// Half the sum of squared differences, reported per example.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (b - a).powi(2))
            .sum::<f64>() * 0.5
    }

    /// Error signal for one output: the negative gradient of `loss` w.r.t. it.
    pub fn error(output: f64, desired: f64) -> f64 {
        desired - output
    }
}
