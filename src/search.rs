use compact_str::CompactString;
use serde::Serialize;

use crate::error::TrackerError;
use crate::geo::{self, Eta};
use crate::routes::{RouteDefinition, Stop};
use crate::state::AppState;
use crate::store::LocationRecord;

#[derive(Debug, Clone, Serialize)]
pub struct BusResult {
    pub id: CompactString,
    pub route: CompactString,
    pub location: Option<LocationRecord>,
    pub eta: Eta,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteResult {
    pub route_id: CompactString,
    pub route_name: String,
    pub buses: Vec<BusResult>,
    pub stops: Vec<Stop>,
}

/// Find routes serving a departure/destination pair and compute each
/// assigned vehicle's ETA to the route's final stop.
///
/// Routes come back in catalog order, vehicles in membership order.
/// `from == to` is not rejected here; that check belongs to the caller.
pub fn search(state: &AppState, from: &str, to: &str) -> Result<Vec<RouteResult>, TrackerError> {
    let from = from.trim();
    if from.is_empty() {
        return Err(TrackerError::InvalidQuery("from"));
    }
    let to = to.trim();
    if to.is_empty() {
        return Err(TrackerError::InvalidQuery("to"));
    }
    let from = from.to_lowercase();
    let to = to.to_lowercase();

    Ok(state
        .routes
        .all_routes()
        .iter()
        .filter(|route| matches_pair(route, &from, &to))
        .map(|route| route_result(state, route))
        .collect())
}

/// A route matches when its stop-name set contains both query terms as
/// case-insensitive substrings, independent of their order along the route.
fn matches_pair(route: &RouteDefinition, from_lower: &str, to_lower: &str) -> bool {
    let has = |needle: &str| {
        route
            .stops
            .iter()
            .any(|stop| stop.name.to_lowercase().contains(needle))
    };
    has(from_lower) && has(to_lower)
}

fn route_result(state: &AppState, route: &RouteDefinition) -> RouteResult {
    let destination = route.stops.last();
    let buses = route
        .vehicle_ids
        .iter()
        .map(|id| {
            let location = state.locations.get(id);
            let eta = match (&location, destination) {
                (Some(rec), Some(dest)) => {
                    geo::eta(rec.lat, rec.lon, dest.lat, dest.lon, rec.speed)
                }
                _ => Eta::Unknown,
            };
            BusResult {
                id: id.clone(),
                route: route.route_id.clone(),
                location,
                eta,
            }
        })
        .collect();

    RouteResult {
        route_id: route.route_id.clone(),
        route_name: route.name.clone(),
        buses,
        stops: route.stops.clone(),
    }
}
