//! # Adaptive Signal Threshold
//!
//! Each station carries a threshold that approximates the best signal it has
//! recently sustained on its current node. The threshold is seeded from the
//! first measurement after association and afterwards only ratchets down, one
//! dB per measurement tick, while the signal stays below it. A single deep
//! fade therefore barely moves it, but a sustained decline is tracked.
//!
//! A station is flagged as *below SNR* (actionable for steering) when its
//! signal falls under either:
//!
//! $$\text{signal} < \text{floor}(\text{min\_snr}) \quad\lor\quad \text{signal} < \text{threshold} + \text{margin}$$
//!
//! Disassociation resets the threshold so a returning station starts fresh.

use crate::config::BandSteeringConfig;
use crate::node::Node;
use crate::policy::SteeringPolicy;
use crate::station::{ConnectionState, Station, Threshold};

/// What a single measurement tick did to a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdUpdate {
    /// Disconnected and already reset.
    Idle,
    /// Disconnected; threshold dropped back to `NoSignal`.
    Reset,
    /// First connected sample became the baseline.
    Initialized(i32),
    /// Steady-state update.
    Tracked {
        threshold: i32,
        lowered: bool,
        below_snr: bool,
    },
}

/// Per-station threshold maintenance, run once per measurement tick.
pub struct SignalThresholdTracker<'a, P> {
    config: &'a BandSteeringConfig,
    policy: &'a P,
}

impl<'a, P: SteeringPolicy> SignalThresholdTracker<'a, P> {
    pub fn new(config: &'a BandSteeringConfig, policy: &'a P) -> Self {
        SignalThresholdTracker { config, policy }
    }

    /// Absolute signal floor for stations on `node`.
    pub fn signal_floor(&self, node: &Node) -> i32 {
        self.policy.snr_to_signal(node, self.config.min_snr)
    }

    /// Feed one measurement for `station`. `signal_floor` comes from
    /// [`signal_floor`](Self::signal_floor) for the station's node.
    pub fn update(&self, station: &mut Station, signal: i32, signal_floor: i32) -> ThresholdUpdate {
        station.record_signal(signal);
        let state = &mut station.band_steering;

        match (station.connection, state.threshold) {
            (ConnectionState::NotConnected, Threshold::NoSignal) => ThresholdUpdate::Idle,
            (ConnectionState::NotConnected, Threshold::Dbm(_)) => {
                state.threshold = Threshold::NoSignal;
                ThresholdUpdate::Reset
            }
            (ConnectionState::Connected, Threshold::NoSignal) => {
                state.threshold = Threshold::Dbm(signal);
                tracing::debug!(
                    station = %station.addr,
                    node = %station.node,
                    threshold = signal,
                    "band steering threshold set"
                );
                ThresholdUpdate::Initialized(signal)
            }
            (ConnectionState::Connected, Threshold::Dbm(mut threshold)) => {
                let lowered = signal < threshold;
                if lowered {
                    threshold -= 1;
                    state.threshold = Threshold::Dbm(threshold);
                    tracing::debug!(
                        station = %station.addr,
                        node = %station.node,
                        threshold,
                        signal,
                        "band steering threshold reduced"
                    );
                }

                let below_snr = signal < signal_floor
                    || signal < threshold + self.config.signal_hysteresis_margin;
                state.below_snr = below_snr;

                ThresholdUpdate::Tracked {
                    threshold,
                    lowered,
                    below_snr,
                }
            }
        }
    }

    /// Run [`update`](Self::update) for every station on `node` using each
    /// station's last recorded signal. Returns how many are flagged.
    pub fn update_node(&self, node: &mut Node) -> usize {
        let floor = self.signal_floor(node);
        let mut flagged = 0;
        for station in &mut node.stations {
            let signal = station.signal;
            if let ThresholdUpdate::Tracked { below_snr: true, .. } =
                self.update(station, signal, floor)
            {
                flagged += 1;
            }
        }
        flagged
    }
}
