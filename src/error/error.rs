use thiserror::Error;

use crate::graph::handle::{ConnectionId, InputId, NodeId, PerceptronId};

/// A value was requested before the forward or backward pass produced it.
///
/// These replace the null-dereference class of fault that an out-of-order
/// call sequence would otherwise hit (e.g. `update_connections` before
/// `calculate_output_delta`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    /// `output()` has not run for this perceptron since the last reset.
    #[error("{0} has no output for the current example")]
    OutputNotComputed(PerceptronId),

    /// No delta exists yet and none can be derived from downstream nodes.
    #[error("{0} has no delta for the current example")]
    DeltaNotComputed(PerceptronId),
}

/// The graph is malformed or a wiring request would make it so.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("unknown input node #{0}")]
    UnknownInput(usize),

    #[error("unknown perceptron #{0}")]
    UnknownPerceptron(usize),

    #[error("unknown connection #{0}")]
    UnknownConnection(usize),

    /// A connection can feed exactly one sink.
    #[error("connection #{connection} already feeds {sink}")]
    AlreadyWired {
        connection: usize,
        sink: PerceptronId,
    },

    /// Wiring `source` into `sink` would close a loop.
    #[error("wiring {source_node} into {sink} would create a cycle")]
    Cycle {
        source_node: NodeId,
        sink: PerceptronId,
    },

    /// A connection was created but never wired to a sink.
    #[error("connection #{0} was never wired to a sink")]
    Dangling(usize),

    /// A topology description references a name it never declared.
    #[error("unknown node name `{0}`")]
    UnknownName(String),

    #[error("node name `{0}` is declared twice")]
    DuplicateName(String),

    /// A layered topology needs an input and an output layer, none of them empty.
    #[error("invalid layer sizes {0:?}")]
    InvalidLayers(Vec<usize>),
}

/// Top-level error for every fallible operation in the crate.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("invalid state: {0}")]
    InvalidState(#[from] StateError),

    #[error("invalid topology: {0}")]
    InvalidTopology(#[from] TopologyError),

    /// Training or inference data does not match the network's inputs/outputs.
    #[error("{what}: expected {expected} values, got {actual}")]
    Cardinality {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<InputId> for TopologyError {
    fn from(id: InputId) -> Self {
        TopologyError::UnknownInput(id.index())
    }
}

impl From<PerceptronId> for TopologyError {
    fn from(id: PerceptronId) -> Self {
        TopologyError::UnknownPerceptron(id.index())
    }
}

impl From<ConnectionId> for TopologyError {
    fn from(id: ConnectionId) -> Self {
        TopologyError::UnknownConnection(id.index())
    }
}
