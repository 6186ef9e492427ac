pub mod backprop;
pub mod config;
pub mod forward;
pub mod network;
pub mod spec;
mod traversal;

pub use backprop::WeightReport;
pub use config::{NetworkConfig, Propagation};
pub use network::Network;
pub use spec::{ConnectionSpec, InputSpec, Layout, PerceptronSpec, TopologySpec, BIAS};
