use crate::error::NetworkError;
use crate::network::{Network, StopId};
use crate::strategy::{round_cost, Strategy};

/// The result of a least-cost query: the stop sequence and the total cost,
/// already corrected for any strategy offset and rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    stops: Vec<StopId>,
    total_cost: f64,
}

impl Path {
    pub(crate) fn new(stops: Vec<StopId>, total_cost: f64) -> Self {
        Self { stops, total_cost }
    }

    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

/// A user-built path, grown one stop at a time. Each extension must be
/// adjacent to the previous stop; its cost is the cheapest active route on
/// the connecting bundle (any mode), offset-corrected and rounded like a
/// least-cost total.
#[derive(Debug, Default)]
pub struct CustomPath {
    stops: Vec<StopId>,
    total_cost: f64,
}

impl CustomPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stop and returns the cost of the new leg (0 for the first
    /// stop). Fails without mutating when the stop is absent, not adjacent
    /// to the current tail, or reachable only through inactive routes.
    pub fn push(
        &mut self,
        network: &Network,
        stop: StopId,
        strategy: Strategy,
    ) -> Result<f64, NetworkError> {
        network.require_stop(stop)?;

        let Some(&last) = self.stops.last() else {
            self.stops.push(stop);
            return Ok(0.0);
        };

        let weight = network.edge_cost(last, stop, strategy)?;
        let leg_cost = round_cost(weight - strategy.edge_offset());
        self.stops.push(stop);
        self.total_cost = round_cost(self.total_cost + leg_cost);
        Ok(leg_cost)
    }

    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_network() -> (Network, StopId, StopId, StopId) {
        let mut network = Network::new();
        let a = network.add_stop("A", "Alpha", "38.7", "-9.1").unwrap();
        let b = network.add_stop("B", "Beta", "38.6", "-9.0").unwrap();
        let c = network.add_stop("C", "Gamma", "38.5", "-8.9").unwrap();
        network.add_route(a, b, "bus", "5.0", "10", "2.5").unwrap();
        network.add_route(a, b, "walk", "4.0", "55", "0.1").unwrap();
        network.add_route(b, c, "train", "10.0", "25", "2.5").unwrap();
        (network, a, b, c)
    }

    #[test]
    fn first_stop_costs_nothing() {
        let (network, a, ..) = sample_network();
        let mut path = CustomPath::new();
        assert_eq!(path.push(&network, a, Strategy::Distance).unwrap(), 0.0);
        assert_eq!(path.total_cost(), 0.0);
    }

    #[test]
    fn legs_use_the_cheapest_route_of_any_mode() {
        let (network, a, b, c) = sample_network();
        let mut path = CustomPath::new();
        path.push(&network, a, Strategy::Distance).unwrap();
        // walk (4.0) beats bus (5.0) on distance
        assert_eq!(path.push(&network, b, Strategy::Distance).unwrap(), 4.0);
        assert_eq!(path.push(&network, c, Strategy::Distance).unwrap(), 10.0);
        assert_eq!(path.total_cost(), 14.0);
        assert_eq!(path.stops(), &[a, b, c]);
    }

    #[test]
    fn sustainability_legs_subtract_the_offset() {
        let (network, a, b, _) = sample_network();
        let mut path = CustomPath::new();
        path.push(&network, a, Strategy::Sustainability).unwrap();
        // walk sustainability 0.1 is cheapest; the offset must not leak out
        assert_eq!(
            path.push(&network, b, Strategy::Sustainability).unwrap(),
            0.1
        );
        assert_eq!(path.total_cost(), 0.1);
    }

    #[test]
    fn non_adjacent_extension_fails_without_mutating() {
        let (network, a, _, c) = sample_network();
        let mut path = CustomPath::new();
        path.push(&network, a, Strategy::Distance).unwrap();
        assert!(matches!(
            path.push(&network, c, Strategy::Distance),
            Err(NetworkError::NotAdjacent { .. })
        ));
        assert_eq!(path.len(), 1);
        assert_eq!(path.total_cost(), 0.0);
    }
}
