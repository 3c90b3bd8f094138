//! # Target Band Selection
//!
//! Decides whether a candidate node is a valid band-steering destination for
//! stations on the current node. A candidate qualifies when it is a different
//! node on the same SSID, sits exactly one rung up the band ladder, and still
//! has association capacity.

use crate::config::BandSteeringConfig;
use crate::node::{LocalNodes, Node};
use crate::policy::SteeringPolicy;

pub struct TargetBandSelector<'a, P> {
    config: &'a BandSteeringConfig,
    policy: &'a P,
}

impl<'a, P: SteeringPolicy> TargetBandSelector<'a, P> {
    pub fn new(config: &'a BandSteeringConfig, policy: &'a P) -> Self {
        TargetBandSelector { config, policy }
    }

    /// Whether `candidate` is a valid steering target for stations on `current`.
    pub fn is_target(&self, current: &Node, candidate: &Node) -> bool {
        if current.id == candidate.id {
            return false;
        }

        if current.ssid != candidate.ssid {
            return false;
        }

        if current.band().next() != Some(candidate.band()) {
            return false;
        }

        // TODO: skip candidates with an active load-balancing kick once the
        // policy layer reports them.
        self.policy.below_max_assoc(candidate)
    }

    /// All local nodes that are valid targets for `current`.
    pub fn targets<'n>(
        &'n self,
        current: &'n Node,
        nodes: &'n LocalNodes,
    ) -> impl Iterator<Item = &'n Node> {
        nodes.iter().filter(move |n| self.is_target(current, n))
    }

    /// Whether any local node can take stations from `current`.
    pub fn has_any_target(&self, current: &Node, nodes: &LocalNodes) -> bool {
        self.targets(current, nodes).next().is_some()
    }

    /// Gate for the policy layer: would a station on `current` be band-steered
    /// to `candidate`?
    pub fn will_steer(&self, current: &Node, candidate: &Node) -> bool {
        if !self.config.is_enabled() {
            return false;
        }

        if current.band().is_terminal() {
            return false;
        }

        self.is_target(current, candidate)
    }
}
