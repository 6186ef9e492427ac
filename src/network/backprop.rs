use std::fmt;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::activation::activation::Activation;
use crate::error::{NetError, StateError};
use crate::graph::{ConnectionId, NodeId, PerceptronId};
use crate::loss::squared::SquaredError;
use crate::network::config::Propagation;
use crate::network::network::Network;
use crate::network::traversal::Traversal;

/// One row of the `final_weights` dump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightReport {
    pub connection: ConnectionId,
    pub source: NodeId,
    pub sink: PerceptronId,
    pub weight: f64,
}

impl fmt::Display for WeightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} -> {}) with final weight: {:.6}",
            self.connection, self.source, self.sink, self.weight
        )
    }
}

impl Network {
    /// Delta of a terminal perceptron against its target, followed by a sweep
    /// that derives the deltas of every perceptron upstream of it.
    ///
    /// With `Propagation::Memoized`, upstream perceptrons that also feed a
    /// terminal without a delta yet are left pending; they are resolved later
    /// on demand. Replacing an existing delta first discards every delta
    /// derived from it upstream.
    pub fn calculate_output_delta(
        &mut self,
        id: PerceptronId,
        desired: f64,
    ) -> Result<f64, NetError> {
        let perceptron = self.perceptron(id)?;
        let output = perceptron.require_output()?;
        let replacing = perceptron.last_delta().is_some();
        if replacing && self.config.propagation == Propagation::Memoized {
            let mut traversal = self.traversal();
            self.reset_from(id, &mut traversal)?;
        }

        let delta = Activation::Sigmoid.derivative_from_output(output)
            * SquaredError::error(output, desired);
        self.perceptron_mut(id)?.set_delta(delta);
        debug!(node = %id, delta, "{id} produced delta value: {delta}");

        let mut traversal = self.traversal();
        self.calculate_previous_layer_delta(id, &mut traversal)?;
        Ok(delta)
    }

    /// Delta of a hidden perceptron, aggregated from the perceptrons it feeds,
    /// followed by the same upstream sweep as `calculate_output_delta`.
    pub fn calculate_delta(&mut self, id: PerceptronId) -> Result<f64, NetError> {
        let delta = match self.config.propagation {
            Propagation::PerPath => self.accumulate_delta(id)?,
            Propagation::Memoized => {
                self.resolve_delta(id)?.ok_or(StateError::DeltaNotComputed(id))?
            }
        };
        let mut traversal = self.traversal();
        self.calculate_previous_layer_delta(id, &mut traversal)?;
        Ok(delta)
    }

    /// The delta for the current example, computing it on first demand.
    pub fn get_delta(&mut self, id: PerceptronId) -> Result<f64, NetError> {
        if let Some(delta) = self.perceptron(id)?.last_delta() {
            return Ok(delta);
        }
        match self.config.propagation {
            Propagation::PerPath => self.calculate_delta(id),
            Propagation::Memoized => {
                Ok(self.resolve_delta(id)?.ok_or(StateError::DeltaNotComputed(id))?)
            }
        }
    }

    /// Clears the delta of `id` and of everything upstream of it. Must run
    /// before the next example so `get_delta` recomputes.
    pub fn reset_delta(&mut self, id: PerceptronId) -> Result<(), NetError> {
        let mut traversal = self.traversal();
        self.reset_from(id, &mut traversal)
    }

    /// Moves every input weight of `id` and of everything upstream of it by
    /// `learning_rate * sink delta * source output`.
    ///
    /// Per-path propagation applies a shared perceptron's update once per
    /// path and once per call. Memoized propagation first makes sure every
    /// delta in the upstream cone exists, then adjusts each perceptron's inputs
    /// at most once per delta: a second call is a no-op until a forward pass,
    /// a new target or a reset replaces the delta.
    pub fn update_connections(&mut self, id: PerceptronId) -> Result<(), NetError> {
        match self.config.propagation {
            Propagation::PerPath => self.apply_per_path(id),
            Propagation::Memoized => {
                let mut traversal = self.traversal();
                self.settle_deltas(id, &mut traversal)?;
                let mut traversal = self.traversal();
                self.apply_once(id, &mut traversal)
            }
        }
    }

    /// Current weights of every connection feeding `id` or anything upstream
    /// of it, deepest layers first. Each row is also logged.
    pub fn final_weights(&self, id: PerceptronId) -> Result<Vec<WeightReport>, NetError> {
        let mut rows = Vec::new();
        let mut traversal = self.traversal();
        traversal.enter(id);
        self.collect_weights(id, &mut traversal, &mut rows)?;
        Ok(rows)
    }

    // ---------------------------------------------------------------------------
    // Private helpers
    // ---------------------------------------------------------------------------

    fn calculate_previous_layer_delta(
        &mut self,
        id: PerceptronId,
        traversal: &mut Traversal,
    ) -> Result<(), NetError> {
        for upstream in self.upstream_perceptrons(id)? {
            if !traversal.enter(upstream) {
                continue;
            }
            match self.config.propagation {
                Propagation::PerPath => {
                    self.accumulate_delta(upstream)?;
                }
                Propagation::Memoized => {
                    self.resolve_delta(upstream)?;
                }
            }
            self.calculate_previous_layer_delta(upstream, traversal)?;
        }
        Ok(())
    }

    /// Recursive formulation: always recomputes. The delta is primed with 0
    /// before the downstream reads so a sweep that re-enters this node sees a
    /// value instead of recursing forever. A terminal perceptron reached this
    /// way without a target ends up with 0.
    fn accumulate_delta(&mut self, id: PerceptronId) -> Result<f64, NetError> {
        let output = self.perceptron(id)?.require_output()?;
        let slope = Activation::Sigmoid.derivative_from_output(output);
        self.perceptron_mut(id)?.set_delta(0.0);

        let outputs = self.perceptron(id)?.output_connections().to_vec();
        for conn_id in outputs {
            let (sink, weight) = self.wired(conn_id)?;
            let weighted_delta = self.get_delta(sink)? * weight;
            let perceptron = self.perceptron_mut(id)?;
            let accumulated = perceptron.last_delta.unwrap_or(0.0) + slope * weighted_delta;
            perceptron.last_delta = Some(accumulated);
        }

        let delta = self.perceptron(id)?.require_delta()?;
        debug!(node = %id, delta, "{id} produced delta value: {delta}");
        Ok(delta)
    }

    /// Memoized formulation: `Some` once every downstream delta is known,
    /// `None` while a terminal downstream still awaits its target.
    fn resolve_delta(&mut self, id: PerceptronId) -> Result<Option<f64>, NetError> {
        let perceptron = self.perceptron(id)?;
        if let Some(delta) = perceptron.last_delta() {
            return Ok(Some(delta));
        }
        if perceptron.is_terminal() {
            return Ok(None);
        }
        let slope = Activation::Sigmoid.derivative_from_output(perceptron.require_output()?);
        let outputs = perceptron.output_connections().to_vec();

        let mut delta = 0.0;
        for conn_id in outputs {
            let (sink, weight) = self.wired(conn_id)?;
            match self.resolve_delta(sink)? {
                Some(sink_delta) => delta += slope * (sink_delta * weight),
                None => return Ok(None),
            }
        }

        self.perceptron_mut(id)?.set_delta(delta);
        debug!(node = %id, delta, "{id} produced delta value: {delta}");
        Ok(Some(delta))
    }

    fn reset_from(&mut self, id: PerceptronId, traversal: &mut Traversal) -> Result<(), NetError> {
        self.perceptron_mut(id)?.clear_delta();
        for upstream in self.upstream_perceptrons(id)? {
            if traversal.enter(upstream) {
                self.reset_from(upstream, traversal)?;
            }
        }
        Ok(())
    }

    fn apply_per_path(&mut self, id: PerceptronId) -> Result<(), NetError> {
        let delta = self.perceptron(id)?.require_delta()?;
        let inputs = self.perceptron(id)?.input_connections().to_vec();
        for conn_id in inputs {
            let source = self.connection(conn_id)?.source();
            self.adjust(conn_id, delta)?;
            if let Some(upstream) = source.as_perceptron() {
                self.apply_per_path(upstream)?;
            }
        }
        Ok(())
    }

    fn settle_deltas(
        &mut self,
        id: PerceptronId,
        traversal: &mut Traversal,
    ) -> Result<(), NetError> {
        if !traversal.enter(id) {
            return Ok(());
        }
        self.get_delta(id)?;
        for upstream in self.upstream_perceptrons(id)? {
            self.settle_deltas(upstream, traversal)?;
        }
        Ok(())
    }

    fn apply_once(&mut self, id: PerceptronId, traversal: &mut Traversal) -> Result<(), NetError> {
        // an earlier sweep already applied this delta and its cone
        if !traversal.enter(id) || self.perceptron(id)?.applied {
            return Ok(());
        }
        let delta = self.perceptron(id)?.require_delta()?;
        let inputs = self.perceptron(id)?.input_connections().to_vec();
        for &conn_id in &inputs {
            self.adjust(conn_id, delta)?;
        }
        self.perceptron_mut(id)?.applied = true;

        for upstream in self.upstream_perceptrons(id)? {
            self.apply_once(upstream, traversal)?;
        }
        Ok(())
    }

    fn adjust(&mut self, conn_id: ConnectionId, delta: f64) -> Result<(), NetError> {
        let conn = self.connection(conn_id)?;
        let (source, weight) = (conn.source(), conn.weight());
        let new_weight = self.sgd().adjust(weight, delta, self.source_output(source)?);
        self.update_weight(conn_id, new_weight)?;
        trace!(connection = %conn_id, weight, new_weight, "updated weight");
        Ok(())
    }

    fn collect_weights(
        &self,
        id: PerceptronId,
        traversal: &mut Traversal,
        rows: &mut Vec<WeightReport>,
    ) -> Result<(), NetError> {
        for &conn_id in self.perceptron(id)?.input_connections() {
            let conn = self.connection(conn_id)?;
            if let Some(upstream) = conn.source().as_perceptron() {
                if traversal.enter(upstream) {
                    self.collect_weights(upstream, traversal, rows)?;
                }
            }
            let row = WeightReport {
                connection: conn_id,
                source: conn.source(),
                sink: id,
                weight: conn.weight(),
            };
            info!("{row}");
            rows.push(row);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::config::NetworkConfig;
    use approx::assert_relative_eq;

    /// x (1.0) --0.5--> y
    fn single(propagation: Propagation) -> (Network, PerceptronId, ConnectionId) {
        let mut net = Network::with_config(NetworkConfig::new(1.0, propagation));
        let x = net.add_input(1.0);
        let c = net.connect(x, 0.5).unwrap();
        let y = net.add_perceptron(&[c]).unwrap();
        (net, y, c)
    }

    #[test]
    fn backward_ops_require_forward_pass() {
        let (mut net, y, _) = single(Propagation::Memoized);
        assert!(matches!(
            net.calculate_output_delta(y, 1.0),
            Err(NetError::InvalidState(StateError::OutputNotComputed(p))) if p == y
        ));
        assert!(matches!(
            net.update_connections(y),
            Err(NetError::InvalidState(StateError::DeltaNotComputed(p))) if p == y
        ));
    }

    #[test]
    fn output_delta_is_read_back_without_recomputation() {
        for propagation in [Propagation::PerPath, Propagation::Memoized] {
            let (mut net, y, _) = single(propagation);
            let out = net.output(y, true).unwrap();
            let delta = net.calculate_output_delta(y, 1.0).unwrap();
            assert_relative_eq!(delta, out * (1.0 - out) * (1.0 - out), epsilon = 1e-12);
            assert_eq!(net.get_delta(y).unwrap(), delta);
            assert_eq!(net.get_delta(y).unwrap(), delta);
        }
    }

    #[test]
    fn memoized_terminal_without_target_has_no_delta() {
        let (mut net, y, _) = single(Propagation::Memoized);
        net.output(y, true).unwrap();
        assert!(matches!(
            net.get_delta(y),
            Err(NetError::InvalidState(StateError::DeltaNotComputed(_)))
        ));
    }

    #[test]
    fn per_path_terminal_without_target_defaults_to_zero() {
        let (mut net, y, _) = single(Propagation::PerPath);
        net.output(y, true).unwrap();
        assert_eq!(net.get_delta(y).unwrap(), 0.0);
    }

    #[test]
    fn weight_moves_by_rate_delta_and_source_output() {
        let mut net = Network::with_config(NetworkConfig::new(0.25, Propagation::Memoized));
        let x = net.add_input(0.8);
        let c = net.connect(x, 0.5).unwrap();
        let y = net.add_perceptron(&[c]).unwrap();

        net.output(y, true).unwrap();
        let delta = net.calculate_output_delta(y, 0.0).unwrap();
        net.update_connections(y).unwrap();

        assert_relative_eq!(net.weight(c).unwrap(), 0.5 + 0.25 * delta * 0.8, epsilon = 1e-12);
    }

    #[test]
    fn final_weights_lists_deepest_first() {
        let mut net = Network::new();
        let x = net.add_input(1.0);
        let c0 = net.connect(x, 0.1).unwrap();
        let h = net.add_perceptron(&[c0]).unwrap();
        let c1 = net.connect(h, 0.2).unwrap();
        let c2 = net.connect(x, 0.3).unwrap();
        let y = net.add_perceptron(&[c1, c2]).unwrap();

        let rows = net.final_weights(y).unwrap();
        let order: Vec<_> = rows.iter().map(|r| r.connection).collect();
        assert_eq!(order, vec![c0, c1, c2]);
        assert_eq!(rows[1].source, NodeId::from(h));
        assert_eq!(rows[1].sink, y);
        assert_eq!(rows[2].weight, 0.3);
        assert_eq!(
            rows[0].to_string(),
            "Connection #0 (Input #0 -> Perceptron #0) with final weight: 0.100000"
        );
    }
}
