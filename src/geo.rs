use serde::{Serialize, Serializer};
use std::fmt;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates via the haversine formula.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().asin()
}

/// Estimated time to a route's final stop.
///
/// Serializes as the strings the boundary layer puts on the wire:
/// `"Stopped"`, `"Arrived"`, `"<n> minutes"`, `"Unknown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eta {
    Stopped,
    Arrived,
    Minutes(i64),
    /// The vehicle has never reported a position.
    Unknown,
}

/// ETA from a current position to a destination at the given speed.
///
/// A speed of exactly zero is `Stopped` regardless of distance. Otherwise
/// the travel time rounds to whole minutes, and anything that rounds to
/// zero counts as already there.
pub fn eta(lat: f64, lon: f64, dest_lat: f64, dest_lon: f64, speed_kmh: f64) -> Eta {
    if speed_kmh == 0.0 {
        return Eta::Stopped;
    }
    let minutes = (distance_km(lat, lon, dest_lat, dest_lon) / speed_kmh * 60.0).round() as i64;
    if minutes <= 0 {
        Eta::Arrived
    } else {
        Eta::Minutes(minutes)
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eta::Stopped => write!(f, "Stopped"),
            Eta::Arrived => write!(f, "Arrived"),
            Eta::Minutes(n) => write!(f, "{} minutes", n),
            Eta::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Serialize for Eta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
