use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to an `InputNode` stored in a `Network`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InputId(usize);

/// Handle to a `Perceptron` stored in a `Network`.
///
/// The index doubles as the perceptron's diagnostic identifier: it is assigned
/// from the owning network's construction sequence, so every network numbers
/// its perceptrons from `#0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PerceptronId(usize);

/// Handle to a `Connection` stored in a `Network`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(usize);

macro_rules! impl_handle {
    ($($handle:ident),*) => {
        $(
            impl $handle {
                pub(crate) fn new(index: usize) -> Self {
                    $handle(index)
                }

                /// Position of the referenced item in its arena.
                pub fn index(self) -> usize {
                    self.0
                }
            }
        )*
    };
}

impl_handle!(InputId, PerceptronId, ConnectionId);

/// Anything that can sit at the source end of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeId {
    Input(InputId),
    Perceptron(PerceptronId),
}

impl NodeId {
    pub fn as_perceptron(self) -> Option<PerceptronId> {
        match self {
            NodeId::Perceptron(id) => Some(id),
            NodeId::Input(_) => None,
        }
    }
}

impl From<InputId> for NodeId {
    fn from(id: InputId) -> Self {
        NodeId::Input(id)
    }
}

impl From<PerceptronId> for NodeId {
    fn from(id: PerceptronId) -> Self {
        NodeId::Perceptron(id)
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Input #{}", self.0)
    }
}

impl fmt::Display for PerceptronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Perceptron #{}", self.0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Connection #{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Input(id) => id.fmt(f),
            NodeId::Perceptron(id) => id.fmt(f),
        }
    }
}
