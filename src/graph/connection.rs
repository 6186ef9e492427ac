use crate::error::TopologyError;
use crate::graph::handle::{NodeId, PerceptronId};

/// A weighted edge from any node into a perceptron.
///
/// The connection does not own either end; both are arena handles. The sink is
/// assigned exactly once, when the connection is wired into a perceptron.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    weight: f64,
    source: NodeId,
    sink: Option<PerceptronId>,
}

impl Connection {
    pub fn new(source: NodeId, weight: f64) -> Connection {
        Connection { weight, source, sink: None }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Overwrites the weight. No clamping.
    pub fn update_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    /// `None` until the connection has been wired.
    pub fn sink(&self) -> Option<PerceptronId> {
        self.sink
    }

    pub(crate) fn attach(&mut self, index: usize, sink: PerceptronId) -> Result<(), TopologyError> {
        if let Some(existing) = self.sink {
            return Err(TopologyError::AlreadyWired { connection: index, sink: existing });
        }
        self.sink = Some(sink);
        Ok(())
    }
}
