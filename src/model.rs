use std::fmt;
use std::hash::Hash;

use crate::error::NetworkError;

/// A vertex of the transport network. Identity is the stop code; the name,
/// latitude and longitude are descriptive only.
#[derive(Debug, Clone)]
pub struct Stop {
    code: String,
    name: String,
    latitude: f64,
    longitude: f64,
}

impl Stop {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, NetworkError> {
        let code = code.into();
        let name = name.into();
        if code.trim().is_empty() {
            return Err(NetworkError::BlankField { field: "stop code" });
        }
        if name.trim().is_empty() {
            return Err(NetworkError::BlankField { field: "stop name" });
        }
        Ok(Self {
            code,
            name,
            latitude,
            longitude,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl PartialEq for Stop {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Stop {}

impl Hash for Stop {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code.hash(state)
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The closed set of transport modes. The associated color is a presentation
/// hint only and never feeds into any computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    Bus,
    Train,
    Boat,
    Walk,
    Bicycle,
}

impl TransportMode {
    pub const ALL: [TransportMode; 5] = [
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Boat,
        TransportMode::Walk,
        TransportMode::Bicycle,
    ];

    /// Parses a mode name, ignoring case.
    pub fn from_name(name: &str) -> Result<Self, NetworkError> {
        match name.to_ascii_lowercase().as_str() {
            "bus" => Ok(TransportMode::Bus),
            "train" => Ok(TransportMode::Train),
            "boat" => Ok(TransportMode::Boat),
            "walk" => Ok(TransportMode::Walk),
            "bicycle" => Ok(TransportMode::Bicycle),
            _ => Err(NetworkError::UnknownMode {
                name: name.to_owned(),
            }),
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            TransportMode::Bus => "Yellow",
            TransportMode::Train => "Blue",
            TransportMode::Boat => "Green",
            TransportMode::Walk => "Teal",
            TransportMode::Bicycle => "Magenta",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportMode::Bus => "Bus",
            TransportMode::Train => "Train",
            TransportMode::Boat => "Boat",
            TransportMode::Walk => "Walk",
            TransportMode::Bicycle => "Bicycle",
        };
        write!(f, "{name}")
    }
}

/// One concrete transport offering between two stops. Deactivated routes stay
/// in their bundle but are skipped by every cost computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    mode: TransportMode,
    distance: f64,
    duration: u32,
    sustainability: f64,
    active: bool,
}

impl Route {
    pub fn new(
        mode: TransportMode,
        distance: f64,
        duration: u32,
        sustainability: f64,
    ) -> Result<Self, NetworkError> {
        // Rejects NaN as well: the comparison is false for it.
        if !(distance >= 0.0) {
            return Err(NetworkError::NegativeValue { field: "distance" });
        }
        Ok(Self {
            mode,
            distance,
            duration,
            sustainability,
            active: true,
        })
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// Distance in kilometers.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Duration in minutes.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn sustainability(&self) -> f64 {
        self.sustainability
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn set_duration(&mut self, duration: u32) {
        self.duration = duration;
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} Line: {} km, {} min, sustainability {}{}",
            self.mode,
            self.mode.color(),
            self.distance,
            self.duration,
            self.sustainability,
            if self.active { "" } else { " (inactive)" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_requires_code_and_name() {
        assert!(Stop::new("S1", "Stop 1", 40.0, -8.0).is_ok());
        assert!(matches!(
            Stop::new("", "Stop 1", 40.0, -8.0),
            Err(NetworkError::BlankField { field: "stop code" })
        ));
        assert!(matches!(
            Stop::new("S1", "  ", 40.0, -8.0),
            Err(NetworkError::BlankField { field: "stop name" })
        ));
    }

    #[test]
    fn stop_identity_is_the_code() {
        let a = Stop::new("S1", "Rossio", 38.7, -9.1).unwrap();
        let b = Stop::new("S1", "Rossio (renamed)", 0.0, 0.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn mode_parsing_is_case_insensitive() {
        assert_eq!(TransportMode::from_name("BUS").unwrap(), TransportMode::Bus);
        assert_eq!(
            TransportMode::from_name("bicycle").unwrap(),
            TransportMode::Bicycle
        );
        assert!(matches!(
            TransportMode::from_name("car"),
            Err(NetworkError::UnknownMode { .. })
        ));
    }

    #[test]
    fn route_rejects_negative_distance() {
        assert!(matches!(
            Route::new(TransportMode::Bus, -1.0, 10, 2.5),
            Err(NetworkError::NegativeValue { field: "distance" })
        ));
        assert!(Route::new(TransportMode::Bus, 0.0, 0, -3.0).is_ok());
    }

    #[test]
    fn new_routes_start_active() {
        let route = Route::new(TransportMode::Walk, 1.2, 15, 0.1).unwrap();
        assert!(route.is_active());
    }
}
