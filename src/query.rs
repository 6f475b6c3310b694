use compact_str::CompactString;
use serde::Serialize;

use crate::error::TrackerError;
use crate::routes::Stop;
use crate::state::AppState;
use crate::store::LocationRecord;

/// One assigned vehicle joined with its current location, if it has ever
/// reported.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleWithLocation {
    pub id: CompactString,
    pub location: Option<LocationRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteWithLocations {
    pub route_id: CompactString,
    pub route_name: String,
    pub vehicles: Vec<VehicleWithLocation>,
    pub stops: Vec<Stop>,
}

pub fn get_one(state: &AppState, vehicle_id: &str) -> Result<LocationRecord, TrackerError> {
    state
        .locations
        .get(vehicle_id)
        .ok_or_else(|| TrackerError::NotFound(vehicle_id.to_string()))
}

pub fn get_all(state: &AppState) -> Vec<LocationRecord> {
    state.locations.all()
}

/// Every route in catalog order, each assigned vehicle joined with its
/// current store entry.
pub fn list_routes(state: &AppState) -> Vec<RouteWithLocations> {
    state
        .routes
        .all_routes()
        .iter()
        .map(|route| RouteWithLocations {
            route_id: route.route_id.clone(),
            route_name: route.name.clone(),
            vehicles: route
                .vehicle_ids
                .iter()
                .map(|id| VehicleWithLocation {
                    id: id.clone(),
                    location: state.locations.get(id),
                })
                .collect(),
            stops: route.stops.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{self, TelemetryReport};
    use crate::routes::{RouteRegistry, demo_catalog};

    fn test_state() -> AppState {
        AppState::new(RouteRegistry::new(demo_catalog()))
    }

    #[test]
    fn test_get_one_unknown_vehicle_is_not_found() {
        let state = test_state();
        match get_one(&state, "BUS-404") {
            Err(TrackerError::NotFound(id)) => assert_eq!(id, "BUS-404"),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_get_one_returns_latest_write() {
        let state = test_state();
        ingest::ingest(&state, TelemetryReport::new("BUS-101", 11.1563, 77.5932, 30.0)).unwrap();

        let record = get_one(&state, "BUS-101").unwrap();
        assert_eq!(record.lat, 11.1563);
        assert_eq!(record.route_id.as_deref(), Some("R1"));
    }

    #[test]
    fn test_get_all_snapshots_store() {
        let state = test_state();
        assert!(get_all(&state).is_empty());
        ingest::ingest(&state, TelemetryReport::new("BUS-101", 11.15, 77.59, 30.0)).unwrap();
        ingest::ingest(&state, TelemetryReport::new("BUS-201", 11.14, 77.58, 0.0)).unwrap();
        assert_eq!(get_all(&state).len(), 2);
    }

    #[test]
    fn test_list_routes_joins_locations() {
        let state = test_state();
        ingest::ingest(&state, TelemetryReport::new("BUS-101", 11.1563, 77.5932, 30.0)).unwrap();

        let listing = list_routes(&state);
        assert_eq!(listing.len(), 3);

        let r1 = &listing[0];
        assert_eq!(r1.route_id, "R1");
        assert_eq!(r1.route_name, "City Center - Airport Express");
        assert_eq!(r1.vehicles.len(), 2);
        assert_eq!(r1.vehicles[0].id, "BUS-101");
        assert!(r1.vehicles[0].location.is_some());
        // BUS-102 has never reported.
        assert_eq!(r1.vehicles[1].id, "BUS-102");
        assert!(r1.vehicles[1].location.is_none());
        assert_eq!(r1.stops.len(), 4);
    }
}
