use tracing::debug;

use crate::error::{NetError, TopologyError};
use crate::graph::{
    Connection, ConnectionId, InputId, InputNode, Node, NodeId, Perceptron, PerceptronId,
};
use crate::network::config::NetworkConfig;
use crate::network::traversal::Traversal;
use crate::optim::sgd::Sgd;

/// Arena owning every node and connection of one network.
///
/// Nodes and connections refer to each other by handle, so a perceptron may be
/// reachable along several paths without shared ownership. Topology only ever
/// grows; per-example state lives on the perceptrons and is cleared by
/// `reset_delta` / `reset`.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub(super) inputs: Vec<InputNode>,
    pub(super) perceptrons: Vec<Perceptron>,
    pub(super) connections: Vec<Connection>,
    pub(super) config: NetworkConfig,
}

impl Network {
    pub fn new() -> Network {
        Network::with_config(NetworkConfig::default())
    }

    pub fn with_config(config: NetworkConfig) -> Network {
        Network {
            inputs: Vec::new(),
            perceptrons: Vec::new(),
            connections: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn sgd(&self) -> Sgd {
        Sgd::new(self.config.learning_rate)
    }

    // ---------------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------------

    pub fn add_input(&mut self, value: f64) -> InputId {
        self.inputs.push(InputNode::new(value));
        InputId::new(self.inputs.len() - 1)
    }

    pub fn set_input(&mut self, id: InputId, value: f64) -> Result<(), NetError> {
        let input = self.inputs.get_mut(id.index()).ok_or(TopologyError::from(id))?;
        input.set_value(value);
        Ok(())
    }

    /// Creates a connection out of `source`. It stays dangling until it is
    /// handed to `add_perceptron` or `set_sink`.
    pub fn connect(
        &mut self,
        source: impl Into<NodeId>,
        weight: f64,
    ) -> Result<ConnectionId, NetError> {
        let source = source.into();
        self.node(source)?;
        self.connections.push(Connection::new(source, weight));
        Ok(ConnectionId::new(self.connections.len() - 1))
    }

    /// Creates a perceptron fed by `inputs`, wiring each connection to it in
    /// order. Nothing is wired if any connection is unknown or already used.
    pub fn add_perceptron(&mut self, inputs: &[ConnectionId]) -> Result<PerceptronId, NetError> {
        let id = PerceptronId::new(self.perceptrons.len());
        for (i, &conn_id) in inputs.iter().enumerate() {
            if let Some(sink) = self.connection(conn_id)?.sink() {
                let connection = conn_id.index();
                return Err(TopologyError::AlreadyWired { connection, sink }.into());
            }
            if inputs[..i].contains(&conn_id) {
                let connection = conn_id.index();
                return Err(TopologyError::AlreadyWired { connection, sink: id }.into());
            }
        }

        self.perceptrons.push(Perceptron::new(id));
        for &conn_id in inputs {
            self.wire(conn_id, id)?;
        }
        debug!(node = %id, inputs = inputs.len(), "Created {id}");
        Ok(id)
    }

    /// Wires an unused connection into an existing perceptron, registering it
    /// on both ends. Rejects edges that would close a loop.
    pub fn set_sink(
        &mut self,
        connection: ConnectionId,
        sink: PerceptronId,
    ) -> Result<(), NetError> {
        self.perceptron(sink)?;
        let conn = self.connection(connection)?;
        if let Some(existing) = conn.sink() {
            let connection = connection.index();
            return Err(TopologyError::AlreadyWired { connection, sink: existing }.into());
        }
        let source = conn.source();
        if let Some(upstream) = source.as_perceptron() {
            if self.reaches_upstream(upstream, sink)? {
                return Err(TopologyError::Cycle { source_node: source, sink }.into());
            }
        }
        self.wire(connection, sink)
    }

    fn wire(&mut self, connection: ConnectionId, sink: PerceptronId) -> Result<(), NetError> {
        let conn = self.connections
            .get_mut(connection.index())
            .ok_or(TopologyError::from(connection))?;
        conn.attach(connection.index(), sink)?;
        let source = conn.source();

        self.perceptron_mut(sink)?.add_input_connection(connection);
        if let NodeId::Perceptron(upstream) = source {
            self.perceptron_mut(upstream)?.add_output_connection(connection);
        }
        Ok(())
    }

    /// True if `target` is `from` or lies upstream of it.
    fn reaches_upstream(&self, from: PerceptronId, target: PerceptronId) -> Result<bool, NetError> {
        let mut seen = vec![false; self.perceptrons.len()];
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return Ok(true);
            }
            match seen.get_mut(id.index()) {
                Some(visited) if !*visited => *visited = true,
                _ => continue,
            }
            stack.extend(self.upstream_perceptrons(id)?);
        }
        Ok(false)
    }

    /// Checks that every connection has been wired to a sink.
    pub fn validate(&self) -> Result<(), NetError> {
        match self.connections.iter().position(|conn| conn.sink().is_none()) {
            Some(index) => Err(TopologyError::Dangling(index).into()),
            None => Ok(()),
        }
    }

    // ---------------------------------------------------------------------------
    // Access
    // ---------------------------------------------------------------------------

    pub fn input(&self, id: InputId) -> Result<&InputNode, NetError> {
        Ok(self.inputs.get(id.index()).ok_or(TopologyError::from(id))?)
    }

    pub fn perceptron(&self, id: PerceptronId) -> Result<&Perceptron, NetError> {
        Ok(self.perceptrons.get(id.index()).ok_or(TopologyError::from(id))?)
    }

    pub(super) fn perceptron_mut(&mut self, id: PerceptronId) -> Result<&mut Perceptron, NetError> {
        Ok(self.perceptrons.get_mut(id.index()).ok_or(TopologyError::from(id))?)
    }

    pub fn connection(&self, id: ConnectionId) -> Result<&Connection, NetError> {
        Ok(self.connections.get(id.index()).ok_or(TopologyError::from(id))?)
    }

    pub fn node(&self, id: NodeId) -> Result<Node<'_>, NetError> {
        match id {
            NodeId::Input(input) => self.input(input).map(Node::Input),
            NodeId::Perceptron(perceptron) => self.perceptron(perceptron).map(Node::Perceptron),
        }
    }

    pub fn weight(&self, id: ConnectionId) -> Result<f64, NetError> {
        Ok(self.connection(id)?.weight())
    }

    pub fn update_weight(&mut self, id: ConnectionId, weight: f64) -> Result<(), NetError> {
        let conn = self.connections.get_mut(id.index()).ok_or(TopologyError::from(id))?;
        conn.update_weight(weight);
        Ok(())
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn perceptron_count(&self) -> usize {
        self.perceptrons.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Perceptrons that feed no other perceptron, in creation order.
    pub fn terminals(&self) -> Vec<PerceptronId> {
        self.perceptrons.iter()
            .filter(|p| p.is_terminal())
            .map(|p| p.id())
            .collect()
    }

    /// Clears the output and delta of every perceptron.
    pub fn reset(&mut self) {
        for perceptron in &mut self.perceptrons {
            perceptron.last_output = None;
            perceptron.clear_delta();
        }
    }

    // ---------------------------------------------------------------------------
    // Helpers shared by the forward and backward passes
    // ---------------------------------------------------------------------------

    pub(super) fn traversal(&self) -> Traversal {
        Traversal::new(self.config.propagation, self.perceptrons.len())
    }

    /// Perceptron sources of `id`'s input connections, in wiring order.
    pub(super) fn upstream_perceptrons(
        &self,
        id: PerceptronId,
    ) -> Result<Vec<PerceptronId>, NetError> {
        let mut upstream = Vec::new();
        for &conn_id in self.perceptron(id)?.input_connections() {
            if let Some(source) = self.connection(conn_id)?.source().as_perceptron() {
                upstream.push(source);
            }
        }
        Ok(upstream)
    }

    /// The value a connection's source contributed in the last forward pass.
    pub(super) fn source_output(&self, source: NodeId) -> Result<f64, NetError> {
        match source {
            NodeId::Input(id) => Ok(self.input(id)?.value()),
            NodeId::Perceptron(id) => Ok(self.perceptron(id)?.require_output()?),
        }
    }

    /// Sink and weight of a connection the backward pass walks along.
    pub(super) fn wired(&self, id: ConnectionId) -> Result<(PerceptronId, f64), NetError> {
        let conn = self.connection(id)?;
        let sink = conn.sink().ok_or(TopologyError::Dangling(id.index()))?;
        Ok((sink, conn.weight()))
    }
}
