pub mod error;

pub use error::{NetError, StateError, TopologyError};
