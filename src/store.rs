use chrono::{DateTime, Utc};
use compact_str::CompactString;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Derived from the speed of the last-written sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Stopped,
}

impl VehicleStatus {
    pub fn from_speed(speed_kmh: f64) -> Self {
        if speed_kmh > 0.0 {
            VehicleStatus::Active
        } else {
            VehicleStatus::Stopped
        }
    }
}

/// Latest known sample for one vehicle.
///
/// Writes replace the whole record; no history is kept. The serialized
/// field names (`device_id`, `updated`) are the boundary-layer shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(rename = "device_id")]
    pub vehicle_id: CompactString,
    pub lat: f64,
    pub lon: f64,
    pub speed: f64,
    pub route_id: Option<CompactString>,
    #[serde(rename = "updated")]
    pub updated_at: DateTime<Utc>,
    pub status: VehicleStatus,
}

/// Single source of truth for "where is vehicle X now".
///
/// DashMap gives per-key atomic replacement: writers on different vehicle
/// ids do not block each other and readers only ever observe fully written
/// records. Two simultaneous writers to the same id race; the last physical
/// write wins, which is acceptable since one ground-truth device reports
/// per key.
#[derive(Default)]
pub struct LocationStore {
    records: DashMap<CompactString, LocationRecord>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Insert-or-replace keyed by the record's vehicle id.
    pub fn put(&self, record: LocationRecord) {
        self.records.insert(record.vehicle_id.clone(), record);
    }

    pub fn get(&self, vehicle_id: &str) -> Option<LocationRecord> {
        self.records.get(vehicle_id).map(|r| r.value().clone())
    }

    /// Snapshot of every record. Iteration order carries no meaning.
    pub fn all(&self) -> Vec<LocationRecord> {
        self.records.iter().map(|r| r.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// In-place mutation, one key locked at a time. Only the simulation
    /// tick uses this path.
    pub fn for_each_mut(&self, mut f: impl FnMut(&mut LocationRecord)) {
        for mut entry in self.records.iter_mut() {
            f(entry.value_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(vehicle_id: &str, lat: f64, speed: f64) -> LocationRecord {
        LocationRecord {
            vehicle_id: CompactString::from(vehicle_id),
            lat,
            lon: 77.59,
            speed,
            route_id: Some(CompactString::from("R1")),
            updated_at: Utc::now(),
            status: VehicleStatus::from_speed(speed),
        }
    }

    #[test]
    fn test_put_then_get() {
        let store = LocationStore::new();
        store.put(record("BUS-1", 11.15, 30.0));

        let got = store.get("BUS-1").expect("record should exist");
        assert_eq!(got.lat, 11.15);
        assert_eq!(got.status, VehicleStatus::Active);
        assert!(store.get("BUS-2").is_none());
    }

    #[test]
    fn test_put_replaces_whole_record() {
        let store = LocationStore::new();
        store.put(record("BUS-1", 11.15, 30.0));

        let mut second = record("BUS-1", 12.01, 0.0);
        second.route_id = None;
        store.put(second);

        let got = store.get("BUS-1").unwrap();
        assert_eq!(got.lat, 12.01);
        assert_eq!(got.speed, 0.0);
        assert_eq!(got.status, VehicleStatus::Stopped);
        assert_eq!(got.route_id, None, "no field merging across writes");
        assert_eq!(store.len(), 1, "one record per vehicle id");
    }

    #[test]
    fn test_all_returns_every_record() {
        let store = LocationStore::new();
        assert!(store.is_empty());
        store.put(record("BUS-1", 11.15, 30.0));
        store.put(record("BUS-2", 11.16, 0.0));
        assert_eq!(store.all().len(), 2);
    }

    #[test]
    fn test_record_serializes_with_boundary_field_names() {
        let json = serde_json::to_value(record("BUS-1", 11.15, 30.0)).unwrap();
        assert_eq!(json["device_id"], "BUS-1");
        assert_eq!(json["status"], "active");
        assert!(json["updated"].is_string(), "updated must be ISO-8601 text");
        assert!(json.get("vehicle_id").is_none());
    }
}
