use crate::routes::RouteRegistry;
use crate::store::LocationStore;

/// Shared engine state: the live location store plus the static route
/// catalog. Held behind an `Arc` and shared by the ingestion path, the
/// query/search paths, and the simulation timer.
pub struct AppState {
    pub locations: LocationStore,
    pub routes: RouteRegistry,
}

impl AppState {
    pub fn new(routes: RouteRegistry) -> Self {
        Self {
            locations: LocationStore::new(),
            routes,
        }
    }
}
