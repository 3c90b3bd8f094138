use thiserror::Error;

use crate::node::NodeId;
use crate::station::MacAddr;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid config TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid MAC address '{0}'")]
    InvalidMac(String),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("station {0} not attached to {1}")]
    UnknownStation(MacAddr, NodeId),
}

pub type Result<T> = std::result::Result<T, Error>;
