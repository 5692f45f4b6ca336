use std::rc::Rc;

use transport_map::{import, NetworkError, NetworkEvent, Observer, Strategy, TransportMode};

/// Forwards every network change to the log, the way a UI layer would
/// subscribe for redraws.
struct EventLogger;

impl Observer for EventLogger {
    fn receive(&self, event: &NetworkEvent) {
        log::info!("network changed: {event:?}");
    }
}

fn main() -> Result<(), NetworkError> {
    env_logger::init();

    println!("Loading stops");
    let stops = import::load_stops("dataset/stops.csv")?;

    println!("Loading routes");
    let routes = import::load_routes("dataset/routes.csv")?;

    println!("Loading display coordinates");
    let coordinates = import::load_coordinates("dataset/xy.csv")?;

    println!("Building network");
    let mut network = import::build_network(&stops, &routes)?;
    network.add_observers([Rc::new(EventLogger) as Rc<dyn Observer>]);

    println!(
        "{} stops ({} isolated), {} edges, {} active routes, {} coordinate(s) for the renderer",
        network.stop_count(),
        network.isolated_stop_count(),
        network.edge_count(),
        network.possible_route_count(),
        coordinates.len(),
    );
    for mode in TransportMode::ALL {
        println!(
            "  {mode} ({} Line): {} route(s)",
            mode.color(),
            network.route_count_by_mode(mode)
        );
    }

    println!("Top five stops by centrality:");
    for (id, degree) in network.top_five_centrality() {
        if let Some(stop) = network.stop(id) {
            println!("  {} ({degree} connection(s))", stop.name());
        }
    }

    let origin = "Lisboa";
    let destination = "Setubal";
    for criterion in ["distance", "duration", "sustainability"] {
        let strategy = Strategy::from_name(criterion)?;
        match network.least_cost_path(origin, destination, strategy, &TransportMode::ALL) {
            Ok(path) => println!(
                "Best {criterion} path {origin} -> {destination}: {} (cost {})",
                network.describe_path(&path),
                path.total_cost()
            ),
            Err(err) => println!("No {criterion} path {origin} -> {destination}: {err}"),
        }
    }

    Ok(())
}
