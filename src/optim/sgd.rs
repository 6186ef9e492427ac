/// Plain online gradient step with a fixed learning rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// New weight for a connection whose sink has `delta` and whose source
    /// last produced `source_output`. `delta` already points downhill.
    pub fn adjust(&self, weight: f64, delta: f64, source_output: f64) -> f64 {
        weight + self.learning_rate * delta * source_output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn step_scales_with_learning_rate() {
        assert_relative_eq!(Sgd::new(1.0).adjust(0.5, 0.2, 0.5), 0.6);
        assert_relative_eq!(Sgd::new(0.1).adjust(0.5, 0.2, 0.5), 0.51);
        assert_relative_eq!(Sgd::new(0.1).adjust(0.5, 0.2, 0.0), 0.5);
    }
}
