//! # Steering Scheduler
//!
//! Per-node periodic pass that turns flagged stations into 802.11v BSS
//! Transition Management requests.
//!
//! The scheduler is driven from the measurement tick. It counts ticks per
//! node and only runs a steering pass once every
//! `ceil(steering_interval / tick_interval)` ticks, so no separate timer is
//! needed. A pass walks the node's stations in association order and, for
//! every roam-eligible station:
//!
//! 1. skips it unless the threshold tracker flagged it (`below_snr`)
//! 2. skips it while a previous request's validity window is still open
//! 3. skips it if it lacks 802.11v support
//! 4. otherwise renews the window and dispatches a request whose forcing
//!    scales with the station's aggressiveness:
//!
//! | Level | disassoc_imminent | disassoc_timer              | kick armed |
//! |-------|-------------------|-----------------------------|------------|
//! | 0–1   | false             | 0                           | no         |
//! | 2     | true              | 0                           | yes        |
//! | 3+    | true              | (kick_time − now) / beacon  | yes        |
//!
//! The `below_snr` flag of every roam-eligible station is consumed by the
//! pass no matter which branch was taken.

use crate::band::Band;
use crate::config::BandSteeringConfig;
use crate::error::Result;
use crate::node::{LocalNodes, NodeId};
use crate::policy::{SteeringPolicy, TransitionDispatcher, TransitionRequest};
use crate::station::{MacAddr, Station};
use crate::target::TargetBandSelector;

/// Length of the request debounce window in ms (~10 s).
pub const ROAM_REQUEST_VALIDITY_MS: u64 = 10_000;

/// Result of one scheduler tick for a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Band steering is switched off.
    Disabled,
    /// Node already sits on the top band.
    TopBand,
    /// No local node can take stations from this one.
    NoTarget,
    /// Still counting ticks towards the next pass.
    Waiting { count: u64, min_count: u64 },
    /// A steering pass ran.
    Fired(PassReport),
}

/// Per-station results of a steering pass, in association order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub outcomes: Vec<(MacAddr, StationOutcome)>,
}

impl PassReport {
    pub fn requested(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, StationOutcome::Requested(_)))
            .count()
    }

    pub fn outcome(&self, addr: MacAddr) -> Option<&StationOutcome> {
        self.outcomes.iter().find(|(a, _)| *a == addr).map(|(_, o)| o)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationOutcome {
    /// Roam policy rejected the station; its state was left untouched.
    Ineligible,
    /// Not in the actionable zone.
    NotFlagged,
    /// A previous request is still within its validity window.
    Debounced,
    /// Station doesn't support BSS Transition Management.
    NotCapable,
    Requested(TransitionRequest),
}

pub struct SteeringScheduler<'a, P> {
    config: &'a BandSteeringConfig,
    policy: &'a P,
}

impl<'a, P: SteeringPolicy> SteeringScheduler<'a, P> {
    pub fn new(config: &'a BandSteeringConfig, policy: &'a P) -> Self {
        SteeringScheduler { config, policy }
    }

    /// Run one measurement tick for node `id`. `now` is the monotonic time
    /// in ms, in the same clock as every stored station timestamp.
    ///
    /// Fails only if `id` isn't in `nodes`.
    pub fn tick<D: TransitionDispatcher>(
        &self,
        nodes: &mut LocalNodes,
        id: NodeId,
        now: u64,
        dispatcher: &mut D,
    ) -> Result<TickOutcome> {
        if !self.config.is_enabled() {
            tracing::trace!(%id, "band steering disabled");
            return Ok(TickOutcome::Disabled);
        }

        let node = nodes.require(id)?;
        if node.band() == Band::SixGhz {
            tracing::debug!(node = %node.name, "band steering: already on top band");
            return Ok(TickOutcome::TopBand);
        }

        let selector = TargetBandSelector::new(self.config, self.policy);
        if !selector.has_any_target(node, nodes) {
            tracing::debug!(node = %node.name, "band steering: no target interface");
            return Ok(TickOutcome::NoTarget);
        }

        let beacon_interval = self.policy.beacon_interval(node);
        debug_assert!(beacon_interval > 0, "beacon interval must be positive");
        let beacon_interval = u64::from(beacon_interval.max(1));

        let min_count = self.config.min_tick_count();
        let node = nodes.require_mut(id)?;
        node.steering_tick_count += 1;
        if node.steering_tick_count < min_count {
            tracing::trace!(
                node = %node.name,
                count = node.steering_tick_count,
                min_count,
                "band steering: waiting"
            );
            return Ok(TickOutcome::Waiting {
                count: node.steering_tick_count,
                min_count,
            });
        }
        node.steering_tick_count = 0;

        let mut report = PassReport::default();
        for station in &mut node.stations {
            if !self.policy.can_perform_roam(station) {
                report.outcomes.push((station.addr, StationOutcome::Ineligible));
                continue;
            }

            let outcome = self.steer_station(station, now, beacon_interval);
            station.band_steering.below_snr = false;

            match outcome {
                StationOutcome::Requested(request) => {
                    tracing::info!(
                        station = %station.addr,
                        node = %node.name,
                        disassoc_imminent = request.disassoc_imminent,
                        disassoc_timer = request.disassoc_timer,
                        validity_period = request.validity_period,
                        aggressiveness = station.aggressiveness,
                        "band steering request"
                    );
                    dispatcher.dispatch(request);
                }
                other => {
                    tracing::trace!(
                        station = %station.addr,
                        node = %node.name,
                        outcome = ?other,
                        "band steering skip"
                    );
                }
            }
            report.outcomes.push((station.addr, outcome));
        }

        tracing::debug!(
            node = %node.name,
            stations = report.outcomes.len(),
            requested = report.requested(),
            "band steering pass"
        );
        Ok(TickOutcome::Fired(report))
    }

    /// Decide what to do with one roam-eligible station. Leaves `below_snr`
    /// alone; the caller consumes it.
    fn steer_station(
        &self,
        station: &mut Station,
        now: u64,
        beacon_interval: u64,
    ) -> StationOutcome {
        if !station.below_snr() {
            return StationOutcome::NotFlagged;
        }

        if now < station.roam_request_validity_end {
            return StationOutcome::Debounced;
        }

        if !station.bss_transition {
            return StationOutcome::NotCapable;
        }

        station.roam_request_validity_end = now.saturating_add(ROAM_REQUEST_VALIDITY_MS);
        let validity_period = beacons(ROAM_REQUEST_VALIDITY_MS, beacon_interval);

        let (disassoc_imminent, disassoc_timer) = if station.aggressiveness >= 2 {
            let kick_time = *station
                .kick_time
                .get_or_insert(now.saturating_add(self.config.kick_delay));
            let timer = if station.aggressiveness >= 3 {
                beacons(kick_time.saturating_sub(now), beacon_interval)
            } else {
                0
            };
            (true, timer)
        } else {
            (false, 0)
        };

        StationOutcome::Requested(TransitionRequest {
            station: station.addr,
            node: station.node,
            disassoc_imminent,
            disassoc_timer,
            bss_transition_required: true,
            validity_period,
        })
    }
}

/// Express a duration in ms as a whole number of beacon intervals.
fn beacons(ms: u64, beacon_interval: u64) -> u32 {
    u32::try_from(ms / beacon_interval).unwrap_or(u32::MAX)
}
