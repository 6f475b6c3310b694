use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::TrackerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Ordered stops plus the vehicles assigned to service them.
///
/// The first stop is the origin and the last is the destination that ETAs
/// are measured against. `vehicle_ids` order is membership order and is
/// preserved in query and search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub route_id: CompactString,
    pub name: String,
    pub stops: Vec<Stop>,
    pub vehicle_ids: Vec<CompactString>,
}

/// Read-mostly route catalog, loaded once at startup and never mutated.
pub struct RouteRegistry {
    routes: Vec<RouteDefinition>,
    by_id: HashMap<CompactString, usize>,
}

impl RouteRegistry {
    pub fn new(routes: Vec<RouteDefinition>) -> Self {
        let by_id = routes
            .iter()
            .enumerate()
            .map(|(idx, route)| (route.route_id.clone(), idx))
            .collect();
        Self { routes, by_id }
    }

    /// Load a catalog from a JSON array of route definitions.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TrackerError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| TrackerError::CatalogIo {
            path: path.display().to_string(),
            source,
        })?;
        let routes = serde_json::from_str(&raw).map_err(|source| TrackerError::CatalogParse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(routes))
    }

    pub fn get_route(&self, route_id: &str) -> Option<&RouteDefinition> {
        self.by_id.get(route_id).map(|&idx| &self.routes[idx])
    }

    /// All routes in catalog insertion order.
    pub fn all_routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    /// Linear scan in catalog order; first match wins if a vehicle id is
    /// listed under more than one route. The catalog is small and
    /// read-mostly, so no reverse index is kept.
    pub fn find_route_for_vehicle(&self, vehicle_id: &str) -> Option<&CompactString> {
        self.routes
            .iter()
            .find(|route| route.vehicle_ids.iter().any(|v| v == vehicle_id))
            .map(|route| &route.route_id)
    }
}

/// Built-in catalog used when no catalog file is configured.
pub fn demo_catalog() -> Vec<RouteDefinition> {
    fn stop(name: &str, lat: f64, lon: f64) -> Stop {
        Stop {
            name: name.to_string(),
            lat,
            lon,
        }
    }

    vec![
        RouteDefinition {
            route_id: CompactString::from("R1"),
            name: "City Center - Airport Express".to_string(),
            stops: vec![
                stop("City Center", 11.1563, 77.5932),
                stop("Main Market", 11.1641, 77.6005),
                stop("University", 11.1755, 77.6119),
                stop("Airport", 11.1863, 77.6232),
            ],
            vehicle_ids: vec![CompactString::from("BUS-101"), CompactString::from("BUS-102")],
        },
        RouteDefinition {
            route_id: CompactString::from("R2"),
            name: "Railway Station - Tech Park".to_string(),
            stops: vec![
                stop("Railway Station", 11.1442, 77.5788),
                stop("Bus Stand", 11.1501, 77.5861),
                stop("Government Hospital", 11.1598, 77.5978),
                stop("Tech Park", 11.1690, 77.6104),
            ],
            vehicle_ids: vec![CompactString::from("BUS-201")],
        },
        RouteDefinition {
            route_id: CompactString::from("R3"),
            name: "Bus Stand - Airport Shuttle".to_string(),
            stops: vec![
                stop("Bus Stand", 11.1501, 77.5861),
                stop("Collector Office", 11.1672, 77.6048),
                stop("Airport", 11.1863, 77.6232),
            ],
            vehicle_ids: vec![CompactString::from("BUS-301"), CompactString::from("BUS-302")],
        },
    ]
}
