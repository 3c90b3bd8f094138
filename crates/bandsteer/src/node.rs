//! Local access-point nodes and the arena that owns them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::band::Band;
use crate::error::{Error, Result};
use crate::station::{MacAddr, Station};

/// Stable index of a node inside [`LocalNodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// One local radio interface (BSS) and the stations attached to it.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub ssid: String,
    /// Centre frequency in MHz.
    pub freq: u32,
    /// Beacon interval in TU.
    pub beacon_interval: u32,
    /// Noise floor in dBm, if the driver reports one.
    pub noise: Option<i32>,
    /// Association limit; 0 means unlimited.
    pub max_assoc: u32,
    /// Attached stations, in association order.
    pub stations: Vec<Station>,
    /// Measurement ticks since the last steering pass.
    pub steering_tick_count: u64,
}

impl Node {
    pub fn new(name: impl Into<String>, ssid: impl Into<String>, freq: u32) -> Self {
        Node {
            id: NodeId(0),
            name: name.into(),
            ssid: ssid.into(),
            freq,
            beacon_interval: 100,
            noise: None,
            max_assoc: 0,
            stations: Vec::new(),
            steering_tick_count: 0,
        }
    }

    pub fn with_beacon_interval(mut self, tu: u32) -> Self {
        self.beacon_interval = tu;
        self
    }

    pub fn with_noise(mut self, dbm: i32) -> Self {
        self.noise = Some(dbm);
        self
    }

    pub fn with_max_assoc(mut self, max: u32) -> Self {
        self.max_assoc = max;
        self
    }

    pub fn band(&self) -> Band {
        Band::from_freq(self.freq)
    }

    /// Attach a station, re-pointing its back-reference at this node.
    pub fn attach(&mut self, mut station: Station) {
        station.node = self.id;
        self.stations.push(station);
    }

    /// Detach a station, e.g. when it leaves the AP's tracking set.
    pub fn detach(&mut self, addr: MacAddr) -> Option<Station> {
        let pos = self.stations.iter().position(|s| s.addr == addr)?;
        Some(self.stations.remove(pos))
    }

    pub fn station(&self, addr: MacAddr) -> Option<&Station> {
        self.stations.iter().find(|s| s.addr == addr)
    }

    pub fn station_mut(&mut self, addr: MacAddr) -> Option<&mut Station> {
        self.stations.iter_mut().find(|s| s.addr == addr)
    }

    pub fn connected_count(&self) -> usize {
        self.stations.iter().filter(|s| s.is_connected()).count()
    }
}

/// Arena of all nodes local to this controller.
#[derive(Debug, Clone, Default)]
pub struct LocalNodes {
    nodes: Vec<Node>,
}

impl LocalNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a node and assign it the next id.
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.id = id;
        for sta in &mut node.stations {
            sta.node = id;
        }
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Like [`get`](Self::get), for callers that treat a missing node as an
    /// error rather than a skip.
    pub fn require(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(Error::UnknownNode(id))
    }

    pub fn require_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.get_mut(id).ok_or(Error::UnknownNode(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Move a station between nodes (roam), keeping its steering state.
    pub fn move_station(&mut self, addr: MacAddr, from: NodeId, to: NodeId) -> Result<()> {
        self.require(to)?;
        let station = self
            .require_mut(from)?
            .detach(addr)
            .ok_or(Error::UnknownStation(addr, from))?;
        self.require_mut(to)?.attach(station);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(last: u8) -> MacAddr {
        MacAddr([0x02, 0, 0, 0, 0, last])
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let mut nodes = LocalNodes::new();
        let a = nodes.insert(Node::new("wlan0", "home", 2412));
        let b = nodes.insert(Node::new("wlan1", "home", 5180));
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert_eq!(nodes.get(b).unwrap().band(), Band::FiveGhz);
        assert!(nodes.get(NodeId(7)).is_none());
        assert!(matches!(nodes.require(NodeId(7)), Err(Error::UnknownNode(NodeId(7)))));
    }

    #[test]
    fn attach_sets_back_reference() {
        let mut nodes = LocalNodes::new();
        let id = nodes.insert(Node::new("wlan1", "home", 5180));
        let node = nodes.get_mut(id).unwrap();
        node.attach(Station::new(mac(1), NodeId(99)));
        assert_eq!(node.station(mac(1)).unwrap().node, id);
    }

    #[test]
    fn detach_preserves_order_of_remaining() {
        let mut node = Node::new("wlan0", "home", 2412);
        for i in 1..=3 {
            node.attach(Station::new(mac(i), NodeId(0)));
        }
        assert!(node.detach(mac(2)).is_some());
        assert!(node.detach(mac(2)).is_none());
        let order: Vec<_> = node.stations.iter().map(|s| s.addr).collect();
        assert_eq!(order, vec![mac(1), mac(3)]);
    }

    #[test]
    fn move_station_between_nodes() {
        let mut nodes = LocalNodes::new();
        let a = nodes.insert(Node::new("wlan0", "home", 2412));
        let b = nodes.insert(Node::new("wlan1", "home", 5180));
        nodes.get_mut(a).unwrap().attach(Station::new(mac(1), a));

        nodes.move_station(mac(1), a, b).unwrap();
        assert!(nodes.get(a).unwrap().stations.is_empty());
        assert_eq!(nodes.get(b).unwrap().station(mac(1)).unwrap().node, b);

        assert!(nodes.move_station(mac(1), a, b).is_err());
    }
}
