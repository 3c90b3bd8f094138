use std::collections::HashSet;

use anyhow::{Context, bail};
use serde::Deserialize;

use bandsteer::config::BandSteeringConfigInput;
use bandsteer::{BandSteeringConfig, LocalNodes, MacAddr, Node, NodeId, Station};

/// Raw TOML scenario.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioInput {
    pub seed: Option<u64>,
    pub ticks: Option<u64>,
    /// Signal change (dB) applied when a station follows a request to the
    /// next band up.
    pub roam_signal_delta: Option<f64>,
    pub config: BandSteeringConfigInput,
    pub nodes: Vec<NodeSpec>,
    pub stations: Vec<StationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub ssid: String,
    /// Centre frequency in MHz.
    pub freq: u32,
    #[serde(default = "default_beacon_interval")]
    pub beacon_interval: u32,
    pub noise: Option<i32>,
    #[serde(default)]
    pub max_assoc: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationSpec {
    pub addr: MacAddr,
    /// Name of the node the station starts on.
    pub node: String,
    #[serde(default)]
    pub aggressiveness: u8,
    #[serde(default = "default_true")]
    pub bss_transition: bool,
    /// Starting signal in dBm.
    pub signal: f64,
    /// Max random-walk step per tick (dB).
    #[serde(default)]
    pub signal_step: f64,
    #[serde(default = "default_min_signal")]
    pub min_signal: f64,
    #[serde(default = "default_max_signal")]
    pub max_signal: f64,
    /// Whether the station acts on transition requests by roaming.
    #[serde(default)]
    pub obeys_transition: bool,
    pub disconnect_at: Option<u64>,
    pub reconnect_at: Option<u64>,
}

fn default_beacon_interval() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn default_min_signal() -> f64 {
    -95.0
}

fn default_max_signal() -> f64 {
    -30.0
}

/// Per-station random walk bounds and connection events.
#[derive(Debug, Clone)]
pub struct SignalWalk {
    pub addr: MacAddr,
    pub node: NodeId,
    pub level: f64,
    pub step: f64,
    pub min: f64,
    pub max: f64,
    pub obeys_transition: bool,
    pub disconnect_at: Option<u64>,
    pub reconnect_at: Option<u64>,
}

/// A validated scenario ready to simulate.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub seed: u64,
    pub ticks: u64,
    pub roam_signal_delta: f64,
    pub config: BandSteeringConfig,
    pub nodes: LocalNodes,
    pub walks: Vec<SignalWalk>,
}

impl ScenarioInput {
    pub fn resolve(self) -> anyhow::Result<Scenario> {
        let config = self.config.resolve().context("invalid [config]")?;
        if self.nodes.is_empty() {
            bail!("scenario has no nodes");
        }

        let mut nodes = LocalNodes::new();
        let mut names = Vec::with_capacity(self.nodes.len());
        for spec in self.nodes {
            if spec.beacon_interval == 0 {
                bail!("node '{}': beacon_interval must be positive", spec.name);
            }
            if names.contains(&spec.name) {
                bail!("duplicate node name '{}'", spec.name);
            }
            let mut node = Node::new(spec.name.clone(), spec.ssid, spec.freq)
                .with_beacon_interval(spec.beacon_interval)
                .with_max_assoc(spec.max_assoc);
            if let Some(noise) = spec.noise {
                node = node.with_noise(noise);
            }
            nodes.insert(node);
            names.push(spec.name);
        }

        let mut seen = HashSet::new();
        let mut walks = Vec::with_capacity(self.stations.len());
        for spec in self.stations {
            if !seen.insert(spec.addr) {
                bail!("duplicate station {}", spec.addr);
            }
            let idx = names
                .iter()
                .position(|n| *n == spec.node)
                .with_context(|| format!("station {}: unknown node '{}'", spec.addr, spec.node))?;
            let node = NodeId(idx as u32);
            if spec.min_signal > spec.max_signal {
                bail!("station {}: min_signal above max_signal", spec.addr);
            }

            let station = Station::new(spec.addr, node)
                .with_bss_transition(spec.bss_transition)
                .with_aggressiveness(spec.aggressiveness);
            nodes.require_mut(node)?.attach(station);

            walks.push(SignalWalk {
                addr: spec.addr,
                node,
                level: spec.signal.clamp(spec.min_signal, spec.max_signal),
                step: spec.signal_step.max(0.0),
                min: spec.min_signal,
                max: spec.max_signal,
                obeys_transition: spec.obeys_transition,
                disconnect_at: spec.disconnect_at,
                reconnect_at: spec.reconnect_at,
            });
        }

        Ok(Scenario {
            seed: self.seed.unwrap_or(0),
            ticks: self.ticks.unwrap_or(300),
            roam_signal_delta: self.roam_signal_delta.unwrap_or(-6.0),
            config,
            nodes,
            walks,
        })
    }
}

impl Scenario {
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        let parsed: ScenarioInput = toml::from_str(input).context("invalid scenario TOML")?;
        parsed.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandsteer::Band;

    const DUAL_BAND: &str = r#"
        seed = 7
        ticks = 50

        [config]
        steering_interval_ms = 5000
        tick_interval_ms = 1000

        [[nodes]]
        name = "wlan0"
        ssid = "home"
        freq = 2412
        noise = -92

        [[nodes]]
        name = "wlan1"
        ssid = "home"
        freq = 5180
        max_assoc = 8

        [[stations]]
        addr = "02:00:00:00:00:01"
        node = "wlan0"
        signal = -60.0
        signal_step = 2.0
        aggressiveness = 3
    "#;

    #[test]
    fn parse_dual_band_scenario() {
        let sc = Scenario::from_toml_str(DUAL_BAND).unwrap();
        assert_eq!(sc.seed, 7);
        assert_eq!(sc.ticks, 50);
        assert_eq!(sc.config.steering_interval, 5_000);
        assert_eq!(sc.nodes.len(), 2);

        let g24 = sc.nodes.get(NodeId(0)).unwrap();
        assert_eq!(g24.band(), Band::TwoGhz);
        assert_eq!(g24.noise, Some(-92));
        assert_eq!(g24.beacon_interval, 100);
        assert_eq!(g24.stations.len(), 1);
        assert_eq!(g24.stations[0].aggressiveness, 3);
        assert!(g24.stations[0].bss_transition);

        assert_eq!(sc.nodes.get(NodeId(1)).unwrap().max_assoc, 8);
        assert_eq!(sc.walks[0].node, NodeId(0));
        assert_eq!(sc.walks[0].step, 2.0);
    }

    #[test]
    fn unknown_station_node_rejected() {
        let input = r#"
            [[nodes]]
            name = "wlan0"
            ssid = "home"
            freq = 2412

            [[stations]]
            addr = "02:00:00:00:00:01"
            node = "wlan7"
            signal = -60.0
        "#;
        let err = Scenario::from_toml_str(input).unwrap_err();
        assert!(err.to_string().contains("unknown node"), "{err}");
    }

    #[test]
    fn zero_beacon_interval_rejected() {
        let input = r#"
            [[nodes]]
            name = "wlan0"
            ssid = "home"
            freq = 2412
            beacon_interval = 0
        "#;
        assert!(Scenario::from_toml_str(input).is_err());
    }

    #[test]
    fn bad_mac_rejected() {
        let input = r#"
            [[nodes]]
            name = "wlan0"
            ssid = "home"
            freq = 2412

            [[stations]]
            addr = "not-a-mac"
            node = "wlan0"
            signal = -60.0
        "#;
        assert!(Scenario::from_toml_str(input).is_err());
    }

    #[test]
    fn empty_scenario_rejected() {
        assert!(Scenario::from_toml_str("").is_err());
    }
}
