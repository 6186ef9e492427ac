use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, TopologyError};
use crate::graph::{InputId, NodeId, PerceptronId};
use crate::network::config::NetworkConfig;
use crate::network::network::Network;

/// Name of the constant input added by `TopologySpec::layered` when a bias is
/// requested.
pub const BIAS: &str = "bias";

/// An input node and the value it starts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    #[serde(default)]
    pub value: f64,
}

/// One incoming connection of a perceptron.
///
/// `source` names an input or a perceptron declared earlier in the spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSpec {
    pub source: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerceptronSpec {
    pub name: String,
    pub inputs: Vec<ConnectionSpec>,
}

/// A serializable description of a network's wiring and initial weights.
///
/// Perceptrons are listed in construction order, so every connection points
/// at something already declared and the described graph cannot contain a
/// cycle. Inputs marked with the `bias` name keep their value across
/// examples; the remaining inputs are fed by the driver in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySpec {
    /// Human-readable name of the topology.
    pub name: String,
    #[serde(default)]
    pub config: NetworkConfig,
    pub inputs: Vec<InputSpec>,
    pub perceptrons: Vec<PerceptronSpec>,
}

/// Handles into a network built from a `TopologySpec`.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Driver-fed inputs, in declaration order.
    pub inputs: Vec<InputId>,
    /// The constant bias input, if the topology declares one.
    pub bias: Option<InputId>,
    /// Perceptrons nothing consumes, in declaration order.
    pub outputs: Vec<PerceptronId>,
    pub names: BTreeMap<String, NodeId>,
}

impl TopologySpec {
    /// A fully connected multilayer perceptron: `sizes[0]` inputs, then one
    /// perceptron layer per remaining entry. Weights are drawn uniformly from
    /// [-1, 1). With `bias`, a constant 1.0 input feeds every perceptron.
    pub fn layered<R: Rng + ?Sized>(
        name: &str,
        sizes: &[usize],
        bias: bool,
        config: NetworkConfig,
        rng: &mut R,
    ) -> Result<TopologySpec, NetError> {
        if sizes.len() < 2 || sizes.contains(&0) {
            return Err(TopologyError::InvalidLayers(sizes.to_vec()).into());
        }

        let mut inputs: Vec<InputSpec> = (0..sizes[0])
            .map(|i| InputSpec { name: format!("x{i}"), value: 0.0 })
            .collect();
        if bias {
            inputs.push(InputSpec { name: BIAS.to_string(), value: 1.0 });
        }

        let mut previous: Vec<String> = inputs.iter()
            .filter(|input| input.name != BIAS)
            .map(|input| input.name.clone())
            .collect();
        let mut perceptrons = Vec::new();
        let last = sizes.len() - 1;

        for (layer, &size) in sizes.iter().enumerate().skip(1) {
            let mut current = Vec::with_capacity(size);
            for j in 0..size {
                let name = if layer == last { format!("y{j}") } else { format!("h{layer}_{j}") };
                let mut conns: Vec<ConnectionSpec> = previous.iter()
                    .map(|source| ConnectionSpec {
                        source: source.clone(),
                        weight: rng.gen::<f64>() * 2.0 - 1.0,
                    })
                    .collect();
                if bias {
                    conns.push(ConnectionSpec {
                        source: BIAS.to_string(),
                        weight: rng.gen::<f64>() * 2.0 - 1.0,
                    });
                }
                perceptrons.push(PerceptronSpec { name: name.clone(), inputs: conns });
                current.push(name);
            }
            previous = current;
        }

        Ok(TopologySpec { name: name.to_string(), config, inputs, perceptrons })
    }

    /// Constructs the described network and the handles needed to drive it.
    pub fn build(&self) -> Result<(Network, Layout), NetError> {
        let mut network = Network::with_config(self.config);
        let mut layout = Layout::default();

        for input in &self.inputs {
            let id = network.add_input(input.value);
            register(&mut layout.names, &input.name, NodeId::from(id))?;
            if input.name == BIAS {
                layout.bias = Some(id);
            } else {
                layout.inputs.push(id);
            }
        }

        for perceptron in &self.perceptrons {
            let mut conns = Vec::with_capacity(perceptron.inputs.len());
            for conn in &perceptron.inputs {
                let source = *layout.names
                    .get(&conn.source)
                    .ok_or_else(|| TopologyError::UnknownName(conn.source.clone()))?;
                conns.push(network.connect(source, conn.weight)?);
            }
            let id = network.add_perceptron(&conns)?;
            register(&mut layout.names, &perceptron.name, NodeId::from(id))?;
        }

        layout.outputs = network.terminals();
        network.validate()?;
        Ok((network, layout))
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<(), NetError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `TopologySpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<TopologySpec, NetError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn register(
    names: &mut BTreeMap<String, NodeId>,
    name: &str,
    id: NodeId,
) -> Result<(), TopologyError> {
    if names.insert(name.to_string(), id).is_some() {
        return Err(TopologyError::DuplicateName(name.to_string()));
    }
    Ok(())
}
