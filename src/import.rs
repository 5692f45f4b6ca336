//! CSV record types and loaders: the data-loading collaborator that feeds
//! the engine. The engine itself never reads files; it consumes the records
//! these functions produce.

use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::NetworkError;
use crate::model::{Route, Stop, TransportMode};
use crate::network::Network;

#[derive(Debug, Deserialize)]
pub struct StopRecord {
    pub code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One row of the routes file: a stop pair with up to one route per
/// transport mode. An absent field means no route of that mode.
#[derive(Debug, Deserialize)]
pub struct GenericRouteRecord {
    pub stop_start: String,
    pub stop_end: String,
    pub train_distance: Option<f64>,
    pub bus_distance: Option<f64>,
    pub boat_distance: Option<f64>,
    pub walk_distance: Option<f64>,
    pub bicycle_distance: Option<f64>,
    pub train_duration: Option<u32>,
    pub bus_duration: Option<u32>,
    pub boat_duration: Option<u32>,
    pub walk_duration: Option<u32>,
    pub bicycle_duration: Option<u32>,
    pub train_sustainability: Option<f64>,
    pub bus_sustainability: Option<f64>,
    pub boat_sustainability: Option<f64>,
    pub walk_sustainability: Option<f64>,
    pub bicycle_sustainability: Option<f64>,
}

impl GenericRouteRecord {
    /// The concrete routes this row describes, one per fully-specified mode.
    pub fn routes(&self) -> Result<Vec<Route>, NetworkError> {
        let per_mode = [
            (
                TransportMode::Train,
                self.train_distance,
                self.train_duration,
                self.train_sustainability,
            ),
            (
                TransportMode::Bus,
                self.bus_distance,
                self.bus_duration,
                self.bus_sustainability,
            ),
            (
                TransportMode::Boat,
                self.boat_distance,
                self.boat_duration,
                self.boat_sustainability,
            ),
            (
                TransportMode::Walk,
                self.walk_distance,
                self.walk_duration,
                self.walk_sustainability,
            ),
            (
                TransportMode::Bicycle,
                self.bicycle_distance,
                self.bicycle_duration,
                self.bicycle_sustainability,
            ),
        ];

        per_mode
            .into_iter()
            .filter_map(|(mode, distance, duration, sustainability)| {
                match (distance, duration, sustainability) {
                    (Some(d), Some(t), Some(s)) => Some(Route::new(mode, d, t, s)),
                    _ => None,
                }
            })
            .collect()
    }
}

/// Per-stop display position, forwarded untouched to a visual layer.
#[derive(Debug, Deserialize)]
pub struct CoordinateRecord {
    pub code: String,
    pub x: f64,
    pub y: f64,
}

fn read_records<T>(path: impl AsRef<Path>) -> Result<Vec<T>, NetworkError>
where
    T: serde::de::DeserializeOwned,
{
    csv::Reader::from_path(path)?
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(NetworkError::from)
}

pub fn load_stops(path: impl AsRef<Path>) -> Result<Vec<StopRecord>, NetworkError> {
    read_records(path)
}

pub fn load_routes(path: impl AsRef<Path>) -> Result<Vec<GenericRouteRecord>, NetworkError> {
    read_records(path)
}

pub fn load_coordinates(path: impl AsRef<Path>) -> Result<Vec<CoordinateRecord>, NetworkError> {
    read_records(path)
}

/// Builds the initial graph from loader records. Duplicate stop codes and
/// route endpoints that name no loaded stop are rejected.
pub fn build_network(
    stops: &[StopRecord],
    routes: &[GenericRouteRecord],
) -> Result<Network, NetworkError> {
    let mut network = Network::new();

    for record in stops {
        network.insert_stop(Stop::new(
            &record.code,
            &record.name,
            record.latitude,
            record.longitude,
        )?)?;
    }

    for record in routes {
        let start = network.stop_by_code(&record.stop_start).ok_or_else(|| {
            NetworkError::StopCodeNotFound {
                code: record.stop_start.clone(),
            }
        })?;
        let end = network.stop_by_code(&record.stop_end).ok_or_else(|| {
            NetworkError::StopCodeNotFound {
                code: record.stop_end.clone(),
            }
        })?;
        for route in record.routes()? {
            network.connect(start, end, route)?;
        }
    }

    info!(
        "built network with {} stop(s) and {} edge(s)",
        network.stop_count(),
        network.edge_count()
    );
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_record(code: &str, name: &str) -> StopRecord {
        StopRecord {
            code: code.to_owned(),
            name: name.to_owned(),
            latitude: 38.7,
            longitude: -9.1,
        }
    }

    fn empty_route_record(start: &str, end: &str) -> GenericRouteRecord {
        GenericRouteRecord {
            stop_start: start.to_owned(),
            stop_end: end.to_owned(),
            train_distance: None,
            bus_distance: None,
            boat_distance: None,
            walk_distance: None,
            bicycle_distance: None,
            train_duration: None,
            bus_duration: None,
            boat_duration: None,
            walk_duration: None,
            bicycle_duration: None,
            train_sustainability: None,
            bus_sustainability: None,
            boat_sustainability: None,
            walk_sustainability: None,
            bicycle_sustainability: None,
        }
    }

    #[test]
    fn partial_mode_fields_yield_no_route() {
        let mut record = empty_route_record("A", "B");
        record.bus_distance = Some(5.0);
        record.bus_duration = Some(10);
        // bus sustainability missing: the triple is incomplete
        record.train_distance = Some(12.0);
        record.train_duration = Some(20);
        record.train_sustainability = Some(2.0);

        let routes = record.routes().unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].mode(), TransportMode::Train);
    }

    #[test]
    fn build_rejects_unknown_endpoints() {
        let stops = vec![stop_record("A", "Alpha")];
        let routes = vec![empty_route_record("A", "B")];
        assert!(matches!(
            build_network(&stops, &routes),
            Err(NetworkError::StopCodeNotFound { .. })
        ));
    }

    #[test]
    fn build_rejects_duplicate_codes() {
        let stops = vec![stop_record("A", "Alpha"), stop_record("A", "Shadow")];
        assert!(matches!(
            build_network(&stops, &[]),
            Err(NetworkError::DuplicateStop { .. })
        ));
    }

    #[test]
    fn rows_without_routes_create_no_edge() {
        let stops = vec![stop_record("A", "Alpha"), stop_record("B", "Beta")];
        let routes = vec![empty_route_record("A", "B")];
        let network = build_network(&stops, &routes).unwrap();
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn csv_parsing_round_trip() {
        let data = "\
stop_start,stop_end,train_distance,bus_distance,boat_distance,walk_distance,bicycle_distance,train_duration,bus_duration,boat_duration,walk_duration,bicycle_duration,train_sustainability,bus_sustainability,boat_sustainability,walk_sustainability,bicycle_sustainability
A,B,,5.0,,,,,10,,,,,2.5,,,
";
        let records: Vec<GenericRouteRecord> = csv::Reader::from_reader(data.as_bytes())
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        let routes = records[0].routes().unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].mode(), TransportMode::Bus);
        assert_eq!(routes[0].distance(), 5.0);
        assert_eq!(routes[0].duration(), 10);
        assert_eq!(routes[0].sustainability(), 2.5);
    }
}
