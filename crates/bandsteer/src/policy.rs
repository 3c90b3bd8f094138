//! # Collaborator Seams
//!
//! The engine decides *whether* and *how hard* to steer. Everything it needs
//! to know about the rest of the controller comes through [`SteeringPolicy`],
//! and its only side effect leaves through [`TransitionDispatcher`].

use serde::Serialize;

use crate::node::{Node, NodeId};
use crate::station::{MacAddr, Station};

/// Noise floor assumed when the driver doesn't report one.
pub const DEFAULT_NOISE_DBM: i32 = -95;

/// Lookups and gates owned by the general client-steering policy.
pub trait SteeringPolicy {
    /// Whether `node` has room for another station.
    fn below_max_assoc(&self, node: &Node) -> bool;

    /// Whether `station` may be asked to roam at all right now.
    fn can_perform_roam(&self, station: &Station) -> bool;

    /// Beacon interval of `node` in TU. Must be positive.
    fn beacon_interval(&self, node: &Node) -> u32;

    /// Convert an SNR on `node` into an absolute signal level in dBm.
    fn snr_to_signal(&self, node: &Node, snr: i32) -> i32;
}

/// Policy derived purely from node attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl SteeringPolicy for DefaultPolicy {
    fn below_max_assoc(&self, node: &Node) -> bool {
        node.max_assoc == 0 || node.connected_count() < node.max_assoc as usize
    }

    fn can_perform_roam(&self, station: &Station) -> bool {
        station.is_connected()
    }

    fn beacon_interval(&self, node: &Node) -> u32 {
        node.beacon_interval
    }

    fn snr_to_signal(&self, node: &Node, snr: i32) -> i32 {
        // Negative values are already absolute signal levels.
        if snr < 0 {
            return snr;
        }
        node.noise.unwrap_or(DEFAULT_NOISE_DBM) + snr
    }
}

// ─── Transition Requests ────────────────────────────────────────────────────

/// An 802.11v BSS Transition Management request, ready for the transport.
///
/// Destination selection is left to whoever delivers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionRequest {
    pub station: MacAddr,
    pub node: NodeId,
    /// Station will be disassociated if it doesn't move.
    pub disassoc_imminent: bool,
    /// Beacons until disassociation; 0 when not counting down.
    pub disassoc_timer: u32,
    pub bss_transition_required: bool,
    /// Beacons the candidate list stays valid for.
    pub validity_period: u32,
}

/// Fire-and-forget sink for transition requests.
pub trait TransitionDispatcher {
    fn dispatch(&mut self, request: TransitionRequest);
}

impl TransitionDispatcher for Vec<TransitionRequest> {
    fn dispatch(&mut self, request: TransitionRequest) {
        self.push(request);
    }
}
