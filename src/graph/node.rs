use crate::graph::perceptron::Perceptron;

/// Read side shared by every node: the value it produced last.
///
/// Producing a value is `Network::output`, which takes a `NodeId` and so covers
/// both variants; a perceptron cannot evaluate itself without the arena that
/// holds its upstream nodes.
pub trait Evaluate {
    fn last_output(&self) -> Option<f64>;
}

/// A leaf holding an externally supplied value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputNode {
    value: f64,
}

impl InputNode {
    pub fn new(value: f64) -> InputNode {
        InputNode { value }
    }

    /// The held value, whatever the mode.
    pub fn output(&self, _training: bool) -> f64 {
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }
}

impl Evaluate for InputNode {
    fn last_output(&self) -> Option<f64> {
        Some(self.value)
    }
}

/// Borrowed view over either node variant.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Input(&'a InputNode),
    Perceptron(&'a Perceptron),
}

impl Evaluate for Node<'_> {
    fn last_output(&self) -> Option<f64> {
        match self {
            Node::Input(input) => input.last_output(),
            Node::Perceptron(perceptron) => perceptron.last_output(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_output_ignores_mode() {
        let input = InputNode::new(0.75);
        for _ in 0..3 {
            assert_eq!(input.output(true), 0.75);
            assert_eq!(input.output(false), 0.75);
        }
        assert_eq!(input.last_output(), Some(0.75));
    }

    #[test]
    fn node_view_delegates() {
        let mut input = InputNode::new(1.0);
        input.set_value(-2.0);
        assert_eq!(Node::Input(&input).last_output(), Some(-2.0));
    }
}
