//! # Frequency Bands
//!
//! Classifies a radio's centre frequency into the band ladder used for
//! steering:
//!
//! | Band     | Freq range (MHz) | Steers to |
//! |----------|------------------|-----------|
//! | 2.4 GHz  | 2400–2500        | 5 GHz     |
//! | 5 GHz    | 4900–5900        | 6 GHz     |
//! | 6 GHz    | 5925–7125        | —         |
//!
//! Stations only ever move up one rung at a time. 6 GHz is terminal, and a
//! frequency outside all three ranges classifies as [`Band::Unknown`], which
//! neither steers nor accepts steered stations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wi-Fi frequency band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// 2.4 GHz (802.11b/g/n/ax).
    TwoGhz,
    /// 5 GHz (802.11a/n/ac/ax).
    FiveGhz,
    /// 6 GHz (802.11ax 6E / 802.11be).
    SixGhz,
    /// Frequency outside the known ranges.
    Unknown,
}

impl Band {
    /// Classify a centre frequency in MHz.
    pub fn from_freq(freq_mhz: u32) -> Self {
        match freq_mhz {
            2400..=2500 => Band::TwoGhz,
            4900..=5900 => Band::FiveGhz,
            5925..=7125 => Band::SixGhz,
            _ => Band::Unknown,
        }
    }

    /// The one band a station on `self` may be steered to.
    pub fn next(self) -> Option<Band> {
        match self {
            Band::TwoGhz => Some(Band::FiveGhz),
            Band::FiveGhz => Some(Band::SixGhz),
            Band::SixGhz | Band::Unknown => None,
        }
    }

    /// Whether no further steering is possible from this band.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::TwoGhz => write!(f, "2.4GHz"),
            Band::FiveGhz => write!(f, "5GHz"),
            Band::SixGhz => write!(f, "6GHz"),
            Band::Unknown => write!(f, "unknown"),
        }
    }
}
