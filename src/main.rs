use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_tracker::ingest::{self, TelemetryReport};
use fleet_tracker::query;
use fleet_tracker::routes::{self, RouteRegistry};
use fleet_tracker::sim::SimulationEngine;
use fleet_tracker::state::AppState;
use fleet_tracker::store::VehicleStatus;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Route catalog: a JSON file when configured, the built-in demo set
    // otherwise.
    let registry = match std::env::var("ROUTES_FILE") {
        Ok(path) => {
            info!(path = %path, "loading route catalog");
            RouteRegistry::from_file(&path)?
        }
        Err(_) => RouteRegistry::new(routes::demo_catalog()),
    };

    let state = Arc::new(AppState::new(registry));

    // Seed every assigned vehicle at its route's origin so the simulation
    // has something to move before real telemetry shows up.
    seed_vehicles(&state)?;
    for route in query::list_routes(&state) {
        info!(
            route = %route.route_id,
            name = %route.route_name,
            vehicles = route.vehicles.len(),
            stops = route.stops.len(),
            "route ready"
        );
    }

    let engine = SimulationEngine::from_env();
    engine.spawn(state.clone());
    info!(vehicles = state.locations.len(), "simulation engine started");

    loop {
        tokio::time::sleep(Duration::from_secs(30)).await;
        let records = query::get_all(&state);
        let active = records
            .iter()
            .filter(|r| r.status == VehicleStatus::Active)
            .count();
        info!(vehicles = records.len(), active, "engine status");
    }
}

fn seed_vehicles(state: &AppState) -> Result<()> {
    let mut rng = rand::thread_rng();
    for route in state.routes.all_routes() {
        let Some(origin) = route.stops.first() else {
            continue;
        };
        for vehicle_id in &route.vehicle_ids {
            let speed = rng.gen_range(15.0..=40.0);
            let report = TelemetryReport::new(vehicle_id.as_str(), origin.lat, origin.lon, speed);
            ingest::ingest(state, report)?;
        }
    }
    Ok(())
}
