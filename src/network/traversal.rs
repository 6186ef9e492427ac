use crate::graph::handle::PerceptronId;
use crate::network::config::Propagation;

/// Visit bookkeeping for one depth-first sweep over the graph.
pub(crate) struct Traversal {
    propagation: Propagation,
    seen: Vec<bool>,
}

impl Traversal {
    pub(crate) fn new(propagation: Propagation, perceptrons: usize) -> Traversal {
        Traversal { propagation, seen: vec![false; perceptrons] }
    }

    /// Whether the sweep should process `id` on this visit.
    ///
    /// Always true for per-path sweeps; true only on the first visit for
    /// memoized ones.
    pub(crate) fn enter(&mut self, id: PerceptronId) -> bool {
        match self.propagation {
            Propagation::PerPath => true,
            Propagation::Memoized => match self.seen.get_mut(id.index()) {
                Some(seen) if *seen => false,
                Some(seen) => {
                    *seen = true;
                    true
                }
                None => true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memoized_enters_once() {
        let mut t = Traversal::new(Propagation::Memoized, 2);
        let p = PerceptronId::new(1);
        assert!(t.enter(p));
        assert!(!t.enter(p));
        assert!(t.enter(PerceptronId::new(0)));
    }

    #[test]
    fn per_path_always_enters() {
        let mut t = Traversal::new(Propagation::PerPath, 1);
        let p = PerceptronId::new(0);
        assert!(t.enter(p));
        assert!(t.enter(p));
    }
}
