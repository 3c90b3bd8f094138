//! Per-station steering state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;
use crate::node::NodeId;

// ─── MAC Address ────────────────────────────────────────────────────────────

/// 48-bit station address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MacAddr(pub [u8; 6]);

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.trim().split([':', '-']);
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(|| Error::InvalidMac(s.into()))?;
            if part.len() != 2 {
                return Err(Error::InvalidMac(s.into()));
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| Error::InvalidMac(s.into()))?;
        }
        if parts.next().is_some() {
            return Err(Error::InvalidMac(s.into()));
        }
        Ok(MacAddr(octets))
    }
}

impl Serialize for MacAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Station State ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    NotConnected,
    Connected,
}

/// Adaptive signal threshold. `NoSignal` until the first measurement after
/// association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Threshold {
    #[default]
    NoSignal,
    Dbm(i32),
}

impl Threshold {
    pub fn dbm(self) -> Option<i32> {
        match self {
            Threshold::NoSignal => None,
            Threshold::Dbm(v) => Some(v),
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::NoSignal => write!(f, "none"),
            Threshold::Dbm(v) => write!(f, "{v}dBm"),
        }
    }
}

/// Band-steering bookkeeping carried by every station.
#[derive(Debug, Clone, Copy, Default)]
pub struct BandSteeringState {
    pub threshold: Threshold,
    /// Set by the threshold tracker, consumed by the next steering pass.
    pub below_snr: bool,
}

/// An associated client as seen by its current node.
#[derive(Debug, Clone)]
pub struct Station {
    pub addr: MacAddr,
    /// Owning node. Lookup only; the node owns the station.
    pub node: NodeId,
    pub connection: ConnectionState,
    /// Last measured signal in dBm.
    pub signal: i32,
    pub band_steering: BandSteeringState,
    /// Station advertised 802.11v BSS Transition Management support.
    pub bss_transition: bool,
    /// Transition requests are suppressed until this time (ms).
    pub roam_request_validity_end: u64,
    /// Armed forced-disassociation time (ms). Set once, cleared by the
    /// policy layer after it kicks.
    pub kick_time: Option<u64>,
    /// 0–1 advisory only, 2 arms a kick, 3+ adds a disassociation countdown.
    pub aggressiveness: u8,
}

impl Station {
    /// A freshly associated station.
    pub fn new(addr: MacAddr, node: NodeId) -> Self {
        Station {
            addr,
            node,
            connection: ConnectionState::Connected,
            signal: 0,
            band_steering: BandSteeringState::default(),
            bss_transition: false,
            roam_request_validity_end: 0,
            kick_time: None,
            aggressiveness: 0,
        }
    }

    pub fn with_bss_transition(mut self, capable: bool) -> Self {
        self.bss_transition = capable;
        self
    }

    pub fn with_aggressiveness(mut self, level: u8) -> Self {
        self.aggressiveness = level;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// Store a fresh signal measurement.
    pub fn record_signal(&mut self, signal: i32) {
        self.signal = signal;
    }

    pub fn set_connection(&mut self, state: ConnectionState) {
        self.connection = state;
    }

    pub fn threshold(&self) -> Threshold {
        self.band_steering.threshold
    }

    pub fn below_snr(&self) -> bool {
        self.band_steering.below_snr
    }

    /// Start over after (re)association on a new node: connected, no
    /// threshold, no pending request or kick.
    pub fn reassociate(&mut self) {
        self.connection = ConnectionState::Connected;
        self.band_steering = BandSteeringState::default();
        self.roam_request_validity_end = 0;
        self.kick_time = None;
    }

    /// Clear an armed kick once it has been carried out.
    pub fn disarm_kick(&mut self) {
        self.kick_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_parse_and_display() {
        let mac: MacAddr = "02:1A:b3:00:ff:09".parse().unwrap();
        assert_eq!(mac, MacAddr([0x02, 0x1a, 0xb3, 0x00, 0xff, 0x09]));
        assert_eq!(mac.to_string(), "02:1a:b3:00:ff:09");

        let dashed: MacAddr = "02-1a-b3-00-ff-09".parse().unwrap();
        assert_eq!(dashed, mac);
    }

    #[test]
    fn mac_parse_rejects_garbage() {
        for bad in [
            "",
            "02:1a:b3:00:ff",
            "02:1a:b3:00:ff:09:aa",
            "0g:1a:b3:00:ff:09",
            "021:a:b3:00:ff:09",
        ] {
            assert!(
                matches!(bad.parse::<MacAddr>(), Err(Error::InvalidMac(_))),
                "should reject '{bad}'"
            );
        }
    }

    #[test]
    fn mac_serde_as_string() {
        let mac = MacAddr([0xaa, 0xbb, 0xcc, 0, 1, 2]);
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"aa:bb:cc:00:01:02\"");
        let back: MacAddr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mac);
    }

    #[test]
    fn new_station_is_connected_without_threshold() {
        let sta = Station::new(MacAddr::default(), NodeId(0));
        assert!(sta.is_connected());
        assert_eq!(sta.threshold(), Threshold::NoSignal);
        assert!(!sta.below_snr());
        assert_eq!(sta.kick_time, None);
    }

    #[test]
    fn reassociate_resets_steering_state() {
        let mut sta = Station::new(MacAddr::default(), NodeId(0)).with_aggressiveness(3);
        sta.set_connection(ConnectionState::NotConnected);
        sta.band_steering.threshold = Threshold::Dbm(-70);
        sta.band_steering.below_snr = true;
        sta.roam_request_validity_end = 11_000;
        sta.kick_time = Some(6_000);

        sta.reassociate();
        assert!(sta.is_connected());
        assert_eq!(sta.threshold(), Threshold::NoSignal);
        assert!(!sta.below_snr());
        assert_eq!(sta.roam_request_validity_end, 0);
        assert_eq!(sta.kick_time, None);
        assert_eq!(sta.aggressiveness, 3);
    }

    #[test]
    fn disarm_kick_clears_armed_time() {
        let mut sta = Station::new(MacAddr::default(), NodeId(0));
        sta.kick_time = Some(6_000);
        sta.disarm_kick();
        assert_eq!(sta.kick_time, None);
    }
}
