use std::collections::HashMap;

use log::info;

use crate::error::NetworkError;
use crate::model::Stop;
use crate::network::{EdgeBundle, Network, StopId};

/// An opaque deep copy of a network's graph at one point in time. Routes are
/// copied by value, so later mutations of the live graph never leak into a
/// held snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub(crate) stops: Vec<Option<Stop>>,
    pub(crate) edges: Vec<Option<EdgeBundle>>,
    pub(crate) by_code: HashMap<String, StopId>,
}

/// Undo stack over [`Snapshot`]s. Plain LIFO: restoring consumes the most
/// recent snapshot, and there is no redo.
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the network's current state onto the stack. Call this
    /// before a mutation that should be reversible.
    pub fn save_state(&mut self, network: &Network) {
        self.snapshots.push(network.snapshot());
        info!("saved network state ({} snapshot(s) held)", self.snapshots.len());
    }

    /// Pops the most recent snapshot and replaces the network's live graph
    /// with it. The network is left untouched when the stack is empty.
    pub fn restore_state(&mut self, network: &mut Network) -> Result<(), NetworkError> {
        let snapshot = self.snapshots.pop().ok_or(NetworkError::NothingToRestore)?;
        network.restore(snapshot);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_on_empty_history_fails() {
        let mut history = History::new();
        let mut network = Network::new();
        assert!(matches!(
            history.restore_state(&mut network),
            Err(NetworkError::NothingToRestore)
        ));
    }

    #[test]
    fn restore_pops_in_lifo_order() {
        let mut history = History::new();
        let mut network = Network::new();

        network.add_stop("S1", "Stop 1", "40.0", "-8.0").unwrap();
        history.save_state(&network);
        network.add_stop("S2", "Stop 2", "41.0", "-9.0").unwrap();
        history.save_state(&network);
        network.add_stop("S3", "Stop 3", "45.0", "-14.0").unwrap();
        assert_eq!(network.stop_count(), 3);

        history.restore_state(&mut network).unwrap();
        assert_eq!(network.stop_count(), 2);
        history.restore_state(&mut network).unwrap();
        assert_eq!(network.stop_count(), 1);
        assert!(history.is_empty());
    }
}
