use serde::{Deserialize, Serialize};
use std::f64::consts::E;

/// Activation applied to a perceptron's weighted input sum.
///
/// Training passes use the sigmoid so the backward pass has a derivative to
/// work with; inference passes use a hard 0/1 threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Sigmoid,
    Threshold,
}

impl Activation {
    pub fn for_mode(training: bool) -> Activation {
        if training {
            Activation::Sigmoid
        } else {
            Activation::Threshold
        }
    }

    /// The sigmoid lies strictly inside (0, 1) for `x` in roughly [-709, 36];
    /// beyond that `f64` rounds it to exactly 1.0 or 0.0.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            Activation::Threshold => if x >= 0.0 { 1.0 } else { 0.0 },
        }
    }

    /// Derivative expressed in terms of the activation's own output `y`.
    ///
    /// The threshold is flat everywhere it is differentiable, so it yields 0.
    pub fn derivative_from_output(&self, y: f64) -> f64 {
        match self {
            Activation::Sigmoid => y * (1.0 - y),
            Activation::Threshold => 0.0,
        }
    }
}
