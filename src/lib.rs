//! In-memory fleet location tracking and routing engine.
//!
//! Ingests periodic GPS telemetry, keeps the latest known
//! position/speed/status per vehicle, associates vehicles with fixed
//! routes, and answers point lookups, listings, and route searches with
//! ETA to the route's final stop. A periodic simulation task perturbs
//! active vehicles to stand in for hardware telemetry.
//!
//! Transport, rendering, and persistence live outside this crate; the
//! boundary types here serialize to the wire shapes those layers expect.

pub mod error;
pub mod geo;
pub mod ingest;
pub mod query;
pub mod routes;
pub mod search;
pub mod sim;
pub mod state;
pub mod store;
