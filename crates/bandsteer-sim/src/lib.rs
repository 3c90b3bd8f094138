//! Deterministic band-steering simulator.
//!
//! Loads a TOML scenario of local nodes and stations, random-walks station
//! signals with a seeded RNG and drives the threshold tracker and steering
//! scheduler on a simulated monotonic clock. Useful for tuning thresholds
//! and cadences before deploying them on an access point.

pub mod scenario;
pub mod simulation;

pub use scenario::Scenario;
pub use simulation::{SimReport, Simulation};
