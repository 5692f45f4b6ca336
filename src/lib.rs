//! Graph engine for a multimodal transport network: stops connected by
//! bundles of mode-specific routes, with least-cost paths under a selectable
//! weighting criterion, degree-centrality ranking, exact-hop reachability,
//! incremental user-built paths, snapshot-based undo and synchronous change
//! notifications.

pub mod error;
pub mod import;
pub mod memento;
pub mod model;
pub mod network;
pub mod observer;
pub mod path;
pub mod strategy;

pub use error::NetworkError;
pub use memento::{History, Snapshot};
pub use model::{Route, Stop, TransportMode};
pub use network::{EdgeBundle, EdgeId, Network, StopId};
pub use observer::{NetworkEvent, Observer};
pub use path::{CustomPath, Path};
pub use strategy::{Strategy, SUSTAINABILITY_OFFSET};
