use std::fmt;

use crate::error::StateError;
use crate::graph::handle::{ConnectionId, PerceptronId};
use crate::graph::node::Evaluate;

/// An internal or output node of the network.
///
/// Holds the handles of its incoming connections (in wiring order) and of the
/// connections it feeds, plus the per-example state written by the forward
/// and backward passes.
#[derive(Debug, Clone)]
pub struct Perceptron {
    id: PerceptronId,
    inputs: Vec<ConnectionId>,
    outputs: Vec<ConnectionId>,
    pub(crate) last_output: Option<f64>,
    pub(crate) last_delta: Option<f64>,
    // Memoized propagation only: input weights already adjusted this example.
    pub(crate) applied: bool,
}

impl Perceptron {
    pub(crate) fn new(id: PerceptronId) -> Perceptron {
        Perceptron {
            id,
            inputs: Vec::new(),
            outputs: Vec::new(),
            last_output: None,
            last_delta: None,
            applied: false,
        }
    }

    pub fn id(&self) -> PerceptronId {
        self.id
    }

    pub fn input_connections(&self) -> &[ConnectionId] {
        &self.inputs
    }

    pub fn output_connections(&self) -> &[ConnectionId] {
        &self.outputs
    }

    /// A perceptron nothing consumes; its delta comes from a target value.
    pub fn is_terminal(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn last_output(&self) -> Option<f64> {
        self.last_output
    }

    pub fn last_delta(&self) -> Option<f64> {
        self.last_delta
    }

    pub(crate) fn require_output(&self) -> Result<f64, StateError> {
        self.last_output.ok_or(StateError::OutputNotComputed(self.id))
    }

    pub(crate) fn require_delta(&self) -> Result<f64, StateError> {
        self.last_delta.ok_or(StateError::DeltaNotComputed(self.id))
    }

    pub(crate) fn add_input_connection(&mut self, connection: ConnectionId) {
        self.inputs.push(connection);
    }

    pub(crate) fn add_output_connection(&mut self, connection: ConnectionId) {
        self.outputs.push(connection);
    }

    /// Records a freshly computed delta. Weights derived from any earlier
    /// delta no longer count as applied.
    pub(crate) fn set_delta(&mut self, delta: f64) {
        self.last_delta = Some(delta);
        self.applied = false;
    }

    pub(crate) fn clear_delta(&mut self) {
        self.last_delta = None;
        self.applied = false;
    }
}

impl Evaluate for Perceptron {
    fn last_output(&self) -> Option<f64> {
        self.last_output
    }
}

impl fmt::Display for Perceptron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}
