use crate::error::NetworkError;
use crate::model::Route;

/// Offset added to every sustainability weight during relaxation. Reported
/// totals subtract it back out, once per traversed edge, so human-facing
/// numbers stay in raw sustainability units.
pub const SUSTAINABILITY_OFFSET: f64 = 10_000.0;

/// Weighting criterion for path costs: a pure mapping from a [`Route`] to a
/// scalar weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Distance,
    Duration,
    Sustainability,
}

impl Strategy {
    /// Selects a strategy by name, ignoring case. Unknown names are an
    /// invalid-criterion error, never a silent default.
    pub fn from_name(name: &str) -> Result<Self, NetworkError> {
        match name.to_ascii_lowercase().as_str() {
            "distance" => Ok(Strategy::Distance),
            "duration" => Ok(Strategy::Duration),
            "sustainability" => Ok(Strategy::Sustainability),
            _ => Err(NetworkError::UnknownCriterion {
                name: name.to_owned(),
            }),
        }
    }

    pub fn weight(&self, route: &Route) -> f64 {
        match self {
            Strategy::Distance => route.distance(),
            Strategy::Duration => f64::from(route.duration()),
            Strategy::Sustainability => route.sustainability() + SUSTAINABILITY_OFFSET,
        }
    }

    /// The per-edge amount [`Strategy::weight`] inflates the true value by.
    pub fn edge_offset(&self) -> f64 {
        match self {
            Strategy::Sustainability => SUSTAINABILITY_OFFSET,
            _ => 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Distance => "distance",
            Strategy::Duration => "duration",
            Strategy::Sustainability => "sustainability",
        }
    }
}

/// Rounds a reported cost to two decimal places.
pub(crate) fn round_cost(cost: f64) -> f64 {
    (cost * 100.0).round() / 100.0
}
