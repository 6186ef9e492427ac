pub mod connection;
pub mod handle;
pub mod node;
pub mod perceptron;

pub use connection::Connection;
pub use handle::{ConnectionId, InputId, NodeId, PerceptronId};
pub use node::{Evaluate, InputNode, Node};
pub use perceptron::Perceptron;
