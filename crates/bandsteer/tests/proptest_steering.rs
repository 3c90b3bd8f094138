//! Property-based tests for the band-steering engine.
//!
//! These check the ratchet, ladder, cadence and flag-consumption guarantees
//! across arbitrary signal traces and configurations.

use proptest::prelude::*;

use bandsteer::{
    Band, BandSteeringConfig, ConnectionState, DefaultPolicy, LocalNodes, MacAddr, Node, NodeId,
    SignalThresholdTracker, Station, SteeringScheduler, TargetBandSelector, Threshold, TickOutcome,
    TransitionRequest,
};

const FREQS: [u32; 4] = [2412, 5180, 5975, 900];

fn station(last: u8) -> Station {
    Station::new(MacAddr([0x02, 0, 0, 0, 0, last]), NodeId(0))
}

// ─── Threshold Ratchet ───────────────────────────────────────────────────────

proptest! {
    /// While connected, the threshold never rises and falls by at most one
    /// dB per measurement.
    #[test]
    fn threshold_is_monotone_ratchet(
        signals in prop::collection::vec(-100i32..=-20, 2..64),
        margin in -10i32..=10,
        floor in -100i32..=-40,
    ) {
        let cfg = BandSteeringConfig { signal_hysteresis_margin: margin, ..Default::default() };
        let tracker = SignalThresholdTracker::new(&cfg, &DefaultPolicy);
        let mut sta = station(1);

        tracker.update(&mut sta, signals[0], floor);
        prop_assert_eq!(sta.threshold(), Threshold::Dbm(signals[0]));

        let mut prev = signals[0];
        for &signal in &signals[1..] {
            tracker.update(&mut sta, signal, floor);
            let cur = sta.threshold().dbm().unwrap();
            prop_assert!(cur <= prev);
            prop_assert!(prev - cur <= 1);
            prop_assert_eq!(cur < prev, signal < prev);
            prop_assert_eq!(
                sta.below_snr(),
                signal < floor || signal < cur + margin
            );
            prev = cur;
        }
    }

    /// Disconnecting always resets; reconnecting seeds from the first sample.
    #[test]
    fn disconnect_then_reconnect_reseeds(
        before in prop::collection::vec(-100i32..=-20, 0..16),
        idle in 1usize..8,
        reconnect_signal in -100i32..=-20,
    ) {
        let cfg = BandSteeringConfig::default();
        let tracker = SignalThresholdTracker::new(&cfg, &DefaultPolicy);
        let mut sta = station(1);
        for s in before {
            tracker.update(&mut sta, s, -80);
        }

        sta.set_connection(ConnectionState::NotConnected);
        for _ in 0..idle {
            tracker.update(&mut sta, reconnect_signal, -80);
            prop_assert_eq!(sta.threshold(), Threshold::NoSignal);
        }

        sta.set_connection(ConnectionState::Connected);
        tracker.update(&mut sta, reconnect_signal, -80);
        prop_assert_eq!(sta.threshold(), Threshold::Dbm(reconnect_signal));
    }
}

// ─── Band Ladder ─────────────────────────────────────────────────────────────

proptest! {
    /// `is_target` is irreflexive and only ever moves exactly one rung up.
    #[test]
    fn target_respects_ladder(
        a in 0usize..4,
        b in 0usize..4,
        same_ssid in any::<bool>(),
    ) {
        let cfg = BandSteeringConfig::default();
        let sel = TargetBandSelector::new(&cfg, &DefaultPolicy);
        let mut nodes = LocalNodes::new();
        let ida = nodes.insert(Node::new("a", "home", FREQS[a]));
        let idb = nodes.insert(Node::new("b", if same_ssid { "home" } else { "guest" }, FREQS[b]));
        let (na, nb) = (nodes.get(ida).unwrap(), nodes.get(idb).unwrap());

        prop_assert!(!sel.is_target(na, na));
        prop_assert!(!sel.is_target(nb, nb));

        let expected = same_ssid && na.band().next() == Some(nb.band());
        prop_assert_eq!(sel.is_target(na, nb), expected);

        if sel.is_target(na, nb) {
            prop_assert!(matches!(
                (na.band(), nb.band()),
                (Band::TwoGhz, Band::FiveGhz) | (Band::FiveGhz, Band::SixGhz)
            ));
        }
    }
}

// ─── Scheduler Cadence ───────────────────────────────────────────────────────

proptest! {
    /// With a target available the node fires on exactly every
    /// `ceil(steering_interval / tick_interval)`-th tick.
    #[test]
    fn scheduler_fires_on_cadence(
        steering_interval in 1u64..=20_000,
        tick_interval in 1u64..=5_000,
        ticks in 1u64..=60,
    ) {
        let cfg = BandSteeringConfig { steering_interval, tick_interval, ..Default::default() };
        let sched = SteeringScheduler::new(&cfg, &DefaultPolicy);
        let mut nodes = LocalNodes::new();
        let id = nodes.insert(Node::new("wlan0", "home", 2412));
        nodes.insert(Node::new("wlan1", "home", 5180));
        let min_count = steering_interval.div_ceil(tick_interval);

        let mut out: Vec<TransitionRequest> = Vec::new();
        for tick in 1..=ticks {
            let fired = matches!(
                sched.tick(&mut nodes, id, tick * tick_interval, &mut out).unwrap(),
                TickOutcome::Fired(_)
            );
            prop_assert_eq!(fired, tick % min_count == 0, "tick {}", tick);
        }
    }

    /// Every roam-eligible station leaves a steering pass with its flag
    /// consumed, whatever branch it hit.
    #[test]
    fn pass_consumes_every_flag(
        stations in prop::collection::vec(
            (any::<bool>(), any::<bool>(), 0u8..5, 0u64..20_000, prop::option::of(0u64..40_000)),
            1..12,
        ),
        now in 0u64..20_000,
    ) {
        let cfg = BandSteeringConfig {
            steering_interval: 1,
            tick_interval: 1,
            ..Default::default()
        };
        let sched = SteeringScheduler::new(&cfg, &DefaultPolicy);
        let mut g24 = Node::new("wlan0", "home", 2412);
        for (i, (flag, capable, aggr, validity_end, kick)) in stations.iter().enumerate() {
            let mut sta = station(i as u8)
                .with_bss_transition(*capable)
                .with_aggressiveness(*aggr);
            sta.band_steering.below_snr = *flag;
            sta.roam_request_validity_end = *validity_end;
            sta.kick_time = *kick;
            g24.attach(sta);
        }
        let mut nodes = LocalNodes::new();
        let id = nodes.insert(g24);
        nodes.insert(Node::new("wlan1", "home", 5180));

        let mut out: Vec<TransitionRequest> = Vec::new();
        let outcome = sched.tick(&mut nodes, id, now, &mut out).unwrap();
        prop_assert!(matches!(outcome, TickOutcome::Fired(_)));

        let node = nodes.get(id).unwrap();
        let pairs = node.stations.iter().zip(&stations);
        for (sta, (flag, capable, aggr, validity_end, kick)) in pairs {
            prop_assert!(!sta.below_snr());

            let requested = *flag && *capable && now >= *validity_end;
            prop_assert_eq!(out.iter().any(|r| r.station == sta.addr), requested);
            if requested && *aggr >= 2 {
                prop_assert_eq!(sta.kick_time, Some(kick.unwrap_or(now + cfg.kick_delay)));
            } else {
                prop_assert_eq!(sta.kick_time, *kick);
            }
        }
    }
}
