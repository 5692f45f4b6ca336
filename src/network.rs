use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use itertools::Itertools;
use log::{debug, info};

use crate::error::NetworkError;
use crate::memento::Snapshot;
use crate::model::{Route, Stop, TransportMode};
use crate::observer::{NetworkEvent, Observer, ObserverRegistry};
use crate::path::Path;
use crate::strategy::{round_cost, Strategy};

/// Stable handle to a stop. Ids index into the vertex arena and are never
/// reused after removal, so a stale handle surfaces as a not-found error
/// instead of silently pointing at a different stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StopId(pub(crate) usize);

/// Stable handle to an edge bundle, with the same arena semantics as
/// [`StopId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub(crate) usize);

/// Every route between one unordered pair of stops. Created lazily on the
/// first route insertion between the pair, never implicitly removed when it
/// empties. Bundles are usable in both directions.
#[derive(Debug, Clone)]
pub struct EdgeBundle {
    pub(crate) a: StopId,
    pub(crate) b: StopId,
    pub(crate) routes: Vec<Route>,
}

impl EdgeBundle {
    pub fn endpoints(&self) -> (StopId, StopId) {
        (self.a, self.b)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    fn connects(&self, x: StopId, y: StopId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    fn touches(&self, id: StopId) -> bool {
        self.a == id || self.b == id
    }

    /// Minimum strategy weight over active routes, optionally restricted to
    /// a set of allowed modes. `None` when no route qualifies.
    fn min_weight(&self, strategy: Strategy, allowed: Option<&[TransportMode]>) -> Option<f64> {
        self.routes
            .iter()
            .filter(|route| route.is_active())
            .filter(|route| allowed.is_none_or(|modes| modes.contains(&route.mode())))
            .map(|route| strategy.weight(route))
            .reduce(f64::min)
    }
}

/// The transport network: a graph of stops connected by bundles of
/// mode-specific routes, plus the listener registry its mutations report to.
///
/// Single-threaded by design; callers that share a network across threads
/// must serialize access themselves.
#[derive(Debug, Default)]
pub struct Network {
    stops: Vec<Option<Stop>>,
    edges: Vec<Option<EdgeBundle>>,
    by_code: HashMap<String, StopId>,
    observers: ObserverRegistry,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- observers ---------------------------------------------------

    /// Registers listeners for change notifications. Already-registered
    /// listeners are not added twice.
    pub fn add_observers<I>(&mut self, observers: I)
    where
        I: IntoIterator<Item = Rc<dyn Observer>>,
    {
        for observer in observers {
            self.observers.add(observer);
        }
    }

    pub fn remove_observer(&mut self, observer: &Rc<dyn Observer>) {
        self.observers.remove(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ----- construction & mutation -------------------------------------

    /// Validates and inserts a new stop, returning its handle. Coordinates
    /// arrive as strings (the orchestration layer hands them through
    /// unparsed) and must be valid numbers.
    pub fn add_stop(
        &mut self,
        code: &str,
        name: &str,
        latitude: &str,
        longitude: &str,
    ) -> Result<StopId, NetworkError> {
        let latitude = parse_f64("latitude", latitude)?;
        let longitude = parse_f64("longitude", longitude)?;
        self.insert_stop(Stop::new(code, name, latitude, longitude)?)
    }

    /// Typed counterpart of [`Network::add_stop`], used by the bulk loader.
    pub fn insert_stop(&mut self, stop: Stop) -> Result<StopId, NetworkError> {
        if self.by_code.contains_key(stop.code()) {
            return Err(NetworkError::DuplicateStop {
                code: stop.code().to_owned(),
            });
        }
        let id = StopId(self.stops.len());
        let code = stop.code().to_owned();
        self.by_code.insert(code.clone(), id);
        self.stops.push(Some(stop));
        info!("added stop {code} as {id:?}");
        self.observers.notify(&NetworkEvent::StopAdded { code });
        Ok(id)
    }

    /// Validates and appends a route between two existing stops, creating
    /// the edge bundle on first use. Numeric fields arrive as strings; the
    /// mode name is matched case-insensitively.
    pub fn add_route(
        &mut self,
        a: StopId,
        b: StopId,
        mode: &str,
        distance: &str,
        duration: &str,
        sustainability: &str,
    ) -> Result<EdgeId, NetworkError> {
        let mode = TransportMode::from_name(mode)?;
        let distance = parse_f64("distance", distance)?;
        let duration = parse_u32("duration", duration)?;
        let sustainability = parse_f64("sustainability", sustainability)?;
        self.connect(a, b, Route::new(mode, distance, duration, sustainability)?)
    }

    /// Typed counterpart of [`Network::add_route`].
    pub fn connect(&mut self, a: StopId, b: StopId, route: Route) -> Result<EdgeId, NetworkError> {
        self.require_stop(a)?;
        self.require_stop(b)?;
        if a == b {
            return Err(NetworkError::SameStop);
        }

        let mode = route.mode();
        let existing = self.bundle_between(a, b).map(|(id, _)| id);
        let id = match existing {
            Some(id) => {
                self.edges[id.0]
                    .as_mut()
                    .expect("bundle_between returned a live edge")
                    .routes
                    .push(route);
                id
            }
            None => {
                let id = EdgeId(self.edges.len());
                self.edges.push(Some(EdgeBundle {
                    a,
                    b,
                    routes: vec![route],
                }));
                id
            }
        };

        let (from, to) = (self.stop_code(a), self.stop_code(b));
        info!("added {mode} route {from} <-> {to} on {id:?}");
        self.observers
            .notify(&NetworkEvent::RouteAdded { from, to, mode });
        Ok(id)
    }

    /// Removes a stop and every edge bundle incident to it.
    pub fn remove_stop(&mut self, id: StopId) -> Result<Stop, NetworkError> {
        self.require_stop(id)?;
        for slot in self.edges.iter_mut() {
            if slot.as_ref().is_some_and(|bundle| bundle.touches(id)) {
                *slot = None;
            }
        }
        let stop = self.stops[id.0]
            .take()
            .expect("require_stop checked the slot");
        self.by_code.remove(stop.code());
        info!("removed stop {}", stop.code());
        self.observers.notify(&NetworkEvent::StopRemoved {
            code: stop.code().to_owned(),
        });
        Ok(stop)
    }

    /// Removes an entire edge bundle: every mode between that stop pair.
    pub fn remove_route(&mut self, id: EdgeId) -> Result<(), NetworkError> {
        let bundle = self
            .edges
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(NetworkError::InvalidEdge(id))?;
        let (from, to) = (self.stop_code(bundle.a), self.stop_code(bundle.b));
        self.edges[id.0] = None;
        info!("removed edge {from} <-> {to}");
        self.observers.notify(&NetworkEvent::EdgeRemoved { from, to });
        Ok(())
    }

    /// Deactivates the routes at the given indices within a bundle. The
    /// routes stay in the bundle; cost queries skip them from now on.
    /// All-or-nothing: a bad index leaves every flag untouched.
    pub fn disable_routes(&mut self, id: EdgeId, indices: &[usize]) -> Result<(), NetworkError> {
        let bundle = self.require_edge_mut(id)?;
        if let Some(&bad) = indices.iter().find(|&&i| i >= bundle.routes.len()) {
            return Err(NetworkError::NoSuchRoute {
                edge: id,
                index: bad,
            });
        }
        for &index in indices {
            bundle.routes[index].set_active(false);
        }
        let (a, b) = (bundle.a, bundle.b);
        let (from, to) = (self.stop_code(a), self.stop_code(b));
        info!("disabled {} route(s) on {from} <-> {to}", indices.len());
        self.observers.notify(&NetworkEvent::RoutesDisabled {
            from,
            to,
            count: indices.len(),
        });
        Ok(())
    }

    /// Rewrites a route's duration in place. The orchestration layer is
    /// responsible for only offering this on Bicycle routes; the engine
    /// accepts any route at a valid index.
    pub fn change_route_duration(
        &mut self,
        id: EdgeId,
        index: usize,
        duration: u32,
    ) -> Result<(), NetworkError> {
        let bundle = self.require_edge_mut(id)?;
        let route = bundle
            .routes
            .get_mut(index)
            .ok_or(NetworkError::NoSuchRoute { edge: id, index })?;
        route.set_duration(duration);
        let (a, b) = (bundle.a, bundle.b);
        let (from, to) = (self.stop_code(a), self.stop_code(b));
        info!("changed duration to {duration} min on {from} <-> {to}");
        self.observers.notify(&NetworkEvent::DurationChanged {
            from,
            to,
            duration,
        });
        Ok(())
    }

    // ----- lookups -----------------------------------------------------

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(id.0).and_then(Option::as_ref)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&EdgeBundle> {
        self.edges.get(id.0).and_then(Option::as_ref)
    }

    pub fn stop_by_code(&self, code: &str) -> Option<StopId> {
        self.by_code.get(code).copied()
    }

    /// Resolves a stop by display name, in insertion order.
    pub fn stop_by_name(&self, name: &str) -> Option<StopId> {
        self.stops()
            .find(|(_, stop)| stop.name() == name)
            .map(|(id, _)| id)
    }

    /// Live stops in insertion order.
    pub fn stops(&self) -> impl Iterator<Item = (StopId, &Stop)> {
        self.stops
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|stop| (StopId(i), stop)))
    }

    /// Live edge bundles in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeBundle)> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|bundle| (EdgeId(i), bundle)))
    }

    pub(crate) fn require_stop(&self, id: StopId) -> Result<&Stop, NetworkError> {
        self.stop(id).ok_or(NetworkError::InvalidStop(id))
    }

    fn require_edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeBundle, NetworkError> {
        self.edges
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(NetworkError::InvalidEdge(id))
    }

    fn stop_code(&self, id: StopId) -> String {
        self.stop(id)
            .map(|stop| stop.code().to_owned())
            .unwrap_or_default()
    }

    /// The bundle connecting two stops, in either direction.
    pub fn bundle_between(&self, a: StopId, b: StopId) -> Option<(EdgeId, &EdgeBundle)> {
        self.edges().find(|(_, bundle)| bundle.connects(a, b))
    }

    // ----- structural queries ------------------------------------------

    pub fn stop_count(&self) -> usize {
        self.stops.iter().flatten().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    /// Incident edge-bundle count: the degree centrality of one stop.
    pub fn incident_edges(&self, id: StopId) -> usize {
        self.edges()
            .filter(|(_, bundle)| bundle.touches(id))
            .count()
    }

    pub fn isolated_stop_count(&self) -> usize {
        self.stops()
            .filter(|(id, _)| self.incident_edges(*id) == 0)
            .count()
    }

    pub fn non_isolated_stop_count(&self) -> usize {
        self.stop_count() - self.isolated_stop_count()
    }

    /// Active routes across every bundle and mode.
    pub fn possible_route_count(&self) -> usize {
        self.edges()
            .map(|(_, bundle)| bundle.routes.iter().filter(|r| r.is_active()).count())
            .sum()
    }

    pub fn route_count_by_mode(&self, mode: TransportMode) -> usize {
        self.edges()
            .map(|(_, bundle)| {
                bundle
                    .routes
                    .iter()
                    .filter(|r| r.is_active() && r.mode() == mode)
                    .count()
            })
            .sum()
    }

    /// Every stop with its incident-bundle count, descending; ties keep the
    /// insertion order of the stops.
    pub fn centrality(&self) -> Vec<(StopId, usize)> {
        let mut entries: Vec<(StopId, usize)> = self
            .stops()
            .map(|(id, _)| (id, self.incident_edges(id)))
            .collect();
        entries.sort_by(|x, y| y.1.cmp(&x.1));
        entries
    }

    pub fn top_five_centrality(&self) -> Vec<(StopId, usize)> {
        let mut entries = self.centrality();
        entries.truncate(5);
        entries
    }

    /// True when at least one route (of any mode, active or not) connects
    /// the two stops.
    pub fn is_adjacent(&self, a: StopId, b: StopId) -> bool {
        self.bundle_between(a, b)
            .is_some_and(|(_, bundle)| !bundle.routes.is_empty())
    }

    /// Breadth-first traversal collecting the stops first reached at
    /// exactly `hops` edges from `start`; `hops == 0` yields `{start}`.
    /// Traversal follows any bundle that holds at least one route,
    /// regardless of active flags.
    pub fn stops_within_hops(
        &self,
        start: StopId,
        hops: usize,
    ) -> Result<Vec<StopId>, NetworkError> {
        self.require_stop(start)?;

        let mut depth: HashMap<StopId, usize> = HashMap::from([(start, 0)]);
        let mut queue = VecDeque::from([start]);
        let mut at_target = Vec::new();
        if hops == 0 {
            at_target.push(start);
        }

        while let Some(current) = queue.pop_front() {
            let current_depth = depth[&current];
            if current_depth == hops {
                continue;
            }
            for (_, bundle) in self.edges() {
                if !bundle.touches(current) || bundle.routes.is_empty() {
                    continue;
                }
                let neighbor = if bundle.a == current { bundle.b } else { bundle.a };
                if depth.contains_key(&neighbor) {
                    continue;
                }
                depth.insert(neighbor, current_depth + 1);
                if current_depth + 1 == hops {
                    at_target.push(neighbor);
                }
                queue.push_back(neighbor);
            }
        }

        debug!(
            "{} stop(s) at exactly {hops} hop(s) from {:?}",
            at_target.len(),
            start
        );
        Ok(at_target)
    }

    // ----- least-cost path ---------------------------------------------

    /// Least-cost path between two stops resolved by display name, under a
    /// weighting strategy and a mode filter. Label-correcting relaxation
    /// (Bellman-Ford): effective edge weights are derived per query, so
    /// no assumption of non-negativity is made, and a surviving relaxation
    /// after `|V|-1` passes rejects the network as inconsistent for this
    /// criterion.
    pub fn least_cost_path(
        &self,
        origin: &str,
        destination: &str,
        strategy: Strategy,
        allowed_modes: &[TransportMode],
    ) -> Result<Path, NetworkError> {
        let source = self
            .stop_by_name(origin)
            .ok_or_else(|| NetworkError::StopNotFound {
                name: origin.to_owned(),
            })?;
        let target = self
            .stop_by_name(destination)
            .ok_or_else(|| NetworkError::StopNotFound {
                name: destination.to_owned(),
            })?;

        let mut cost: HashMap<StopId, f64> = HashMap::from([(source, 0.0)]);
        let mut predecessor: HashMap<StopId, StopId> = HashMap::new();

        let passes = self.stop_count().saturating_sub(1);
        for pass in 0..passes {
            let mut changed = false;
            for (_, bundle) in self.edges() {
                let Some(weight) = bundle.min_weight(strategy, Some(allowed_modes)) else {
                    continue;
                };
                for (u, v) in [(bundle.a, bundle.b), (bundle.b, bundle.a)] {
                    let Some(&cost_u) = cost.get(&u) else {
                        continue;
                    };
                    let candidate = cost_u + weight;
                    if cost.get(&v).is_none_or(|&cost_v| candidate < cost_v) {
                        cost.insert(v, candidate);
                        predecessor.insert(v, u);
                        changed = true;
                    }
                }
            }
            if !changed {
                debug!("relaxation settled after {} pass(es)", pass + 1);
                break;
            }
        }

        // One more scan: anything that still relaxes sits on a negative cycle.
        for (_, bundle) in self.edges() {
            let Some(weight) = bundle.min_weight(strategy, Some(allowed_modes)) else {
                continue;
            };
            for (u, v) in [(bundle.a, bundle.b), (bundle.b, bundle.a)] {
                if let (Some(&cost_u), Some(&cost_v)) = (cost.get(&u), cost.get(&v)) {
                    if cost_u + weight < cost_v {
                        return Err(NetworkError::NegativeCycle {
                            criterion: strategy.name(),
                        });
                    }
                }
            }
        }

        if !cost.contains_key(&target) {
            return Err(NetworkError::NoPath {
                origin: origin.to_owned(),
                destination: destination.to_owned(),
            });
        }

        let mut stops = vec![target];
        let mut current = target;
        while current != source {
            current = *predecessor
                .get(&current)
                .ok_or_else(|| NetworkError::NoPath {
                    origin: origin.to_owned(),
                    destination: destination.to_owned(),
                })?;
            stops.push(current);
        }
        stops.reverse();

        // Recompute the total by re-walking the path with the same
        // minimum-weight rule, correcting the strategy's edge offset.
        let mut total = 0.0;
        for pair in stops.windows(2) {
            let (_, bundle) = self
                .bundle_between(pair[0], pair[1])
                .ok_or_else(|| NetworkError::NoPath {
                    origin: origin.to_owned(),
                    destination: destination.to_owned(),
                })?;
            let weight = bundle
                .min_weight(strategy, Some(allowed_modes))
                .ok_or_else(|| NetworkError::NoPath {
                    origin: origin.to_owned(),
                    destination: destination.to_owned(),
                })?;
            total += weight - strategy.edge_offset();
        }
        let total = round_cost(total);

        info!(
            "least-cost path {origin} -> {destination} ({}): {} stop(s), total {total}",
            strategy.name(),
            stops.len()
        );
        Ok(Path::new(stops, total))
    }

    /// Minimum active-route weight between two adjacent stops, across every
    /// mode. Used for pricing one leg of a user-built path.
    pub fn edge_cost(
        &self,
        from: StopId,
        to: StopId,
        strategy: Strategy,
    ) -> Result<f64, NetworkError> {
        let from_name = self.require_stop(from)?.name().to_owned();
        let to_name = self.require_stop(to)?.name().to_owned();
        let (_, bundle) = self
            .bundle_between(from, to)
            .ok_or_else(|| NetworkError::NotAdjacent {
                from: from_name.clone(),
                to: to_name.clone(),
            })?;
        bundle
            .min_weight(strategy, None)
            .ok_or(NetworkError::NoPath {
                origin: from_name,
                destination: to_name,
            })
    }

    /// Stop names along a path, joined for display.
    pub fn describe_path(&self, path: &Path) -> String {
        path.stops()
            .iter()
            .filter_map(|&id| self.stop(id))
            .map(Stop::name)
            .join(" -> ")
    }

    // ----- snapshots ----------------------------------------------------

    /// Deep copy of the live graph: independent stop and route values.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stops: self.stops.clone(),
            edges: self.edges.clone(),
            by_code: self.by_code.clone(),
        }
    }

    /// Replaces the live graph with a snapshot. Observers stay registered.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.stops = snapshot.stops;
        self.edges = snapshot.edges;
        self.by_code = snapshot.by_code;
        info!("restored a previous network state");
        self.observers.notify(&NetworkEvent::StateRestored);
    }
}

fn parse_f64(field: &'static str, value: &str) -> Result<f64, NetworkError> {
    value
        .trim()
        .parse()
        .map_err(|_| NetworkError::InvalidNumber {
            field,
            value: value.to_owned(),
        })
}

fn parse_u32(field: &'static str, value: &str) -> Result<u32, NetworkError> {
    value
        .trim()
        .parse()
        .map_err(|_| NetworkError::InvalidNumber {
            field,
            value: value.to_owned(),
        })
}
