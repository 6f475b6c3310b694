use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crate::state::AppState;
use crate::store::VehicleStatus;

/// Degrees of uniform positional jitter per tick, on the order of 100 m
/// of drift across both axes.
pub const JITTER_DEG: f64 = 0.0005;
/// km/h of uniform speed drift per tick.
pub const SPEED_JITTER_KMH: f64 = 5.0;
/// Default tick interval; override with SIM_TICK_SECS.
pub const DEFAULT_TICK_SECS: u64 = 8;

/// Emulates continuous hardware telemetry when no real devices report.
///
/// A single interval-driven task nudges every active vehicle once per
/// tick; ticks never overlap each other, but they do run concurrently
/// with ingestion and queries on other keys.
pub struct SimulationEngine {
    interval: Duration,
}

impl SimulationEngine {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_env() -> Self {
        let secs = std::env::var("SIM_TICK_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TICK_SECS);
        Self::new(Duration::from_secs(secs))
    }

    pub fn spawn(self, state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                tick(&state);
            }
        })
    }
}

/// One simulation pass over the store.
///
/// Stopped vehicles are left byte-identical; active ones get a perturbed
/// replacement sample written through the same store path a real report
/// would take, with status re-derived from the new speed.
pub fn tick(state: &AppState) {
    let mut rng = rand::thread_rng();
    let mut moved = 0usize;

    state.locations.for_each_mut(|record| {
        if record.status != VehicleStatus::Active {
            return;
        }
        let lat = record.lat + rng.gen_range(-JITTER_DEG..=JITTER_DEG);
        let lon = record.lon + rng.gen_range(-JITTER_DEG..=JITTER_DEG);
        let speed =
            (record.speed + rng.gen_range(-SPEED_JITTER_KMH..=SPEED_JITTER_KMH)).max(0.0);

        // A non-finite value here means corrupt input slipped past
        // validation; keep the old coordinate and stop the vehicle
        // instead of spreading it.
        if lat.is_finite() {
            record.lat = lat;
        }
        if lon.is_finite() {
            record.lon = lon;
        }
        record.speed = if speed.is_finite() { speed } else { 0.0 };
        record.status = VehicleStatus::from_speed(record.speed);
        record.updated_at = Utc::now();
        moved += 1;
    });

    if moved > 0 {
        debug!(vehicles = moved, "simulation tick applied");
    }
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
    fn test_tick_perturbs_only_active_vehicles() {
        let state = test_state();
        ingest::ingest(&state, TelemetryReport::new("BUS-101", 11.1563, 77.5932, 30.0)).unwrap();
        ingest::ingest(&state, TelemetryReport::new("BUS-201", 11.1442, 77.5788, 0.0)).unwrap();

        let active_before = state.locations.get("BUS-101").unwrap();
        let stopped_before = state.locations.get("BUS-201").unwrap();

        // Ensure the clock can strictly advance across the tick.
        std::thread::sleep(Duration::from_millis(2));
        tick(&state);

        let stopped_after = state.locations.get("BUS-201").unwrap();
        assert_eq!(stopped_after, stopped_before, "stopped records untouched");

        let active_after = state.locations.get("BUS-101").unwrap();
        assert!(active_after.updated_at > active_before.updated_at);
        assert!((active_after.lat - active_before.lat).abs() <= JITTER_DEG);
        assert!((active_after.lon - active_before.lon).abs() <= JITTER_DEG);
        assert!(active_after.speed >= 0.0);
        assert!((active_after.speed - active_before.speed).abs() <= SPEED_JITTER_KMH);
    }

    #[test]
    fn test_tick_rederives_status_from_new_speed() {
        let state = test_state();
        ingest::ingest(&state, TelemetryReport::new("BUS-101", 11.1563, 77.5932, 1.0)).unwrap();

        // Status must track speed on every tick; a vehicle whose walk
        // hits zero parks and stays parked.
        for _ in 0..100 {
            tick(&state);
            let record = state.locations.get("BUS-101").unwrap();
            assert_eq!(record.status, VehicleStatus::from_speed(record.speed));
            if record.status == VehicleStatus::Stopped {
                tick(&state);
                assert_eq!(state.locations.get("BUS-101").unwrap(), record);
                break;
            }
        }
    }

    #[test]
    fn test_tick_on_empty_store_is_a_noop() {
        let state = test_state();
        tick(&state);
        assert!(state.locations.is_empty());
    }
}
