use chrono::Utc;
use compact_str::CompactString;
use serde::Deserialize;
use tracing::debug;

use crate::error::TrackerError;
use crate::state::AppState;
use crate::store::{LocationRecord, VehicleStatus};

/// Raw wire value for a coordinate or speed field. Trackers are sloppy
/// about types, so both `12.34` and `"12.34"` are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Num(f64),
    Str(String),
}

impl Scalar {
    fn as_finite_f64(&self) -> Option<f64> {
        let value = match self {
            Scalar::Num(n) => *n,
            Scalar::Str(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn raw(&self) -> String {
        match self {
            Scalar::Num(n) => n.to_string(),
            Scalar::Str(s) => s.clone(),
        }
    }
}

/// One inbound telemetry sample, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryReport {
    pub device_id: String,
    pub lat: Scalar,
    pub lon: Scalar,
    #[serde(default)]
    pub speed: Option<Scalar>,
}

impl TelemetryReport {
    pub fn new(device_id: impl Into<String>, lat: f64, lon: f64, speed: f64) -> Self {
        Self {
            device_id: device_id.into(),
            lat: Scalar::Num(lat),
            lon: Scalar::Num(lon),
            speed: Some(Scalar::Num(speed)),
        }
    }
}

/// Validate a telemetry sample and apply it to the store.
///
/// Coordinates must parse to finite floats. Speed is best-effort: absent
/// or unparsable means "not moving" and negative values clamp to zero.
/// The vehicle's route is resolved through the catalog on every write.
/// On any validation failure nothing is written.
pub fn ingest(state: &AppState, report: TelemetryReport) -> Result<LocationRecord, TrackerError> {
    let vehicle_id = report.device_id.trim();
    if vehicle_id.is_empty() {
        return Err(TrackerError::MissingDeviceId);
    }

    let lat = report
        .lat
        .as_finite_f64()
        .ok_or_else(|| TrackerError::InvalidCoordinate {
            field: "lat",
            value: report.lat.raw(),
        })?;
    let lon = report
        .lon
        .as_finite_f64()
        .ok_or_else(|| TrackerError::InvalidCoordinate {
            field: "lon",
            value: report.lon.raw(),
        })?;
    let speed = report
        .speed
        .as_ref()
        .and_then(Scalar::as_finite_f64)
        .unwrap_or(0.0)
        .max(0.0);

    let vehicle_id = CompactString::from(vehicle_id);
    let record = LocationRecord {
        route_id: state.routes.find_route_for_vehicle(&vehicle_id).cloned(),
        vehicle_id: vehicle_id.clone(),
        lat,
        lon,
        speed,
        updated_at: Utc::now(),
        status: VehicleStatus::from_speed(speed),
    };
    state.locations.put(record.clone());
    debug!(vehicle = %vehicle_id, lat, lon, speed, "applied telemetry sample");
    Ok(record)
}
