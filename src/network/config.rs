use serde::{Deserialize, Serialize};

/// How sweeps treat a perceptron reachable along more than one path.
///
/// - `PerPath`: every path re-visits the node. Shared nodes are re-evaluated,
///   hidden deltas are recomputed on each upstream sweep, and a shared node's
///   input weights are adjusted once per path that reaches it. This is the
///   classic recursive formulation and over-applies updates whenever a hidden
///   node fans out to more than one consumer.
/// - `Memoized`: each sweep visits a node once. Hidden deltas are derived on
///   demand once every downstream delta is known, and a perceptron's input
///   weights move at most once per delta. A forward pass that re-evaluates a
///   perceptron, or a new output target, discards the delta it held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propagation {
    PerPath,
    #[default]
    Memoized,
}

/// Tunables fixed for the lifetime of a network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Scales every weight adjustment.
    pub learning_rate: f64,
    pub propagation: Propagation,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            learning_rate: 1.0,
            propagation: Propagation::default(),
        }
    }
}

impl NetworkConfig {
    pub fn new(learning_rate: f64, propagation: Propagation) -> Self {
        NetworkConfig { learning_rate, propagation }
    }
}
