//! # Band Steering
//!
//! Decision engine that nudges associated Wi-Fi stations up the band ladder
//! (2.4 GHz → 5 GHz → 6 GHz) with 802.11v BSS Transition Management requests.
//!
//! The crate is made of three cooperating pieces:
//! - **Threshold tracking** ([`threshold`]) — per-station adaptive signal
//!   threshold that ratchets down and flags stations in the actionable zone
//! - **Target selection** ([`target`]) — band-ladder predicate deciding whether
//!   another node is a valid steering destination
//! - **Scheduling** ([`scheduler`]) — per-node periodic pass that consumes the
//!   flags and dispatches transition requests with tiered forcing
//!
//! Everything outside that (delivering the request to the station, capacity
//! limits, roam gating, beacon interval lookup) is reached through the
//! [`policy::SteeringPolicy`] and [`policy::TransitionDispatcher`] seams.

pub mod band;
pub mod config;
pub mod error;
pub mod node;
pub mod policy;
pub mod scheduler;
pub mod station;
pub mod target;
pub mod threshold;

pub use band::Band;
pub use config::BandSteeringConfig;
pub use error::{Error, Result};
pub use node::{LocalNodes, Node, NodeId};
pub use policy::{DefaultPolicy, SteeringPolicy, TransitionDispatcher, TransitionRequest};
pub use scheduler::{PassReport, StationOutcome, SteeringScheduler, TickOutcome};
pub use station::{ConnectionState, MacAddr, Station, Threshold};
pub use target::TargetBandSelector;
pub use threshold::{SignalThresholdTracker, ThresholdUpdate};
