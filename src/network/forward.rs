use tracing::trace;

use crate::activation::activation::Activation;
use crate::error::NetError;
use crate::graph::{Evaluate, NodeId, PerceptronId};
use crate::network::config::Propagation;
use crate::network::network::Network;
use crate::network::traversal::Traversal;

impl Network {
    /// Evaluates `node` for the current input values.
    ///
    /// Input nodes return their value. Perceptrons recurse into every upstream
    /// node, combine the results through the connection weights and apply the
    /// sigmoid (`training`) or the 0/1 threshold (inference). The result is
    /// stored as the perceptron's last output.
    ///
    /// With `Propagation::Memoized`, every perceptron the pass evaluates starts
    /// a new example: its delta is discarded and its weights may move again.
    pub fn output(&mut self, node: impl Into<NodeId>, training: bool) -> Result<f64, NetError> {
        match node.into() {
            NodeId::Input(id) => Ok(self.input(id)?.output(training)),
            NodeId::Perceptron(id) => {
                self.perceptron(id)?;
                let mut traversal = self.traversal();
                self.evaluate(id, training, &mut traversal)
            }
        }
    }

    /// Output stored by the last forward pass, `None` if there was none.
    pub fn last_output(&self, node: impl Into<NodeId>) -> Result<Option<f64>, NetError> {
        Ok(self.node(node.into())?.last_output())
    }

    fn evaluate(
        &mut self,
        id: PerceptronId,
        training: bool,
        traversal: &mut Traversal,
    ) -> Result<f64, NetError> {
        if !traversal.enter(id) {
            // evaluated earlier in this pass
            return Ok(self.perceptron(id)?.require_output()?);
        }

        let inputs = self.perceptron(id)?.input_connections().to_vec();
        let mut total_sum = 0.0;
        for conn_id in inputs {
            let conn = self.connection(conn_id)?;
            let (source, weight) = (conn.source(), conn.weight());
            let value = match source {
                NodeId::Input(input) => self.input(input)?.output(training),
                NodeId::Perceptron(upstream) => self.evaluate(upstream, training, traversal)?,
            };
            total_sum += value * weight;
        }

        let result = Activation::for_mode(training).function(total_sum);
        let memoized = self.config.propagation == Propagation::Memoized;
        let perceptron = self.perceptron_mut(id)?;
        perceptron.last_output = Some(result);
        if memoized {
            perceptron.clear_delta();
        }
        trace!(
            node = %id,
            total_sum,
            result,
            "{id} produced total sum: {total_sum} and final result: {result}"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use crate::network::config::{NetworkConfig, Propagation};
    use crate::network::network::Network;
    use approx::assert_relative_eq;

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    #[test]
    fn inputs_pass_their_value_through() {
        let mut net = Network::new();
        let x = net.add_input(0.3);
        assert_eq!(net.output(x, true).unwrap(), 0.3);
        assert_eq!(net.output(x, false).unwrap(), 0.3);
        assert_eq!(net.last_output(x).unwrap(), Some(0.3));
    }

    #[test]
    fn training_and_inference_activations() {
        let mut net = Network::new();
        let a = net.add_input(1.0);
        let b = net.add_input(-2.0);
        let ca = net.connect(a, 0.5).unwrap();
        let cb = net.connect(b, 0.5).unwrap();
        let p = net.add_perceptron(&[ca, cb]).unwrap();

        assert_eq!(net.last_output(p).unwrap(), None);
        assert_relative_eq!(net.output(p, true).unwrap(), sigmoid(-0.5), epsilon = 1e-12);
        assert_eq!(net.output(p, false).unwrap(), 0.0);
        assert_eq!(net.last_output(p).unwrap(), Some(0.0));

        net.set_input(b, -1.0).unwrap();
        assert_eq!(net.output(p, false).unwrap(), 1.0);
    }

    #[test]
    fn shared_node_gives_same_result_in_both_modes() {
        for propagation in [Propagation::PerPath, Propagation::Memoized] {
            let mut net = Network::with_config(NetworkConfig::new(1.0, propagation));
            let x = net.add_input(1.0);
            let c = net.connect(x, 0.4).unwrap();
            let h = net.add_perceptron(&[c]).unwrap();
            let l = net.connect(h, 1.0).unwrap();
            let r = net.connect(h, -1.0).unwrap();
            let y = net.add_perceptron(&[l, r]).unwrap();

            // both branches see the same hidden output, so they cancel
            assert_relative_eq!(net.output(y, true).unwrap(), 0.5, epsilon = 1e-12);
            let hidden = net.last_output(h).unwrap().unwrap();
            assert_relative_eq!(hidden, sigmoid(0.4), epsilon = 1e-12);
        }
    }
}
