pub mod activation;
pub mod error;
pub mod graph;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::activation::Activation;
pub use error::{NetError, StateError, TopologyError};
pub use graph::{
    Connection, ConnectionId, Evaluate, InputId, InputNode, Node, NodeId, Perceptron, PerceptronId,
};
pub use loss::squared::SquaredError;
pub use network::{Layout, Network, NetworkConfig, Propagation, TopologySpec, WeightReport};
pub use optim::sgd::Sgd;
pub use train::trainer::{predict, train_example, train_network};
