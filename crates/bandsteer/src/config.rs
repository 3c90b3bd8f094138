//! Band-steering tunables and their TOML input form.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Raw TOML form; every field is optional and falls back to the defaults of
/// [`BandSteeringConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BandSteeringConfigInput {
    pub steering_interval_ms: Option<u64>,
    pub tick_interval_ms: Option<u64>,
    pub min_snr: Option<i32>,
    pub signal_hysteresis_margin: Option<i32>,
    pub kick_delay_ms: Option<u64>,
}

/// Band-steering tunables, resolved and validated.
///
/// Passed by reference into every engine operation; the engine never reads
/// configuration from anywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandSteeringConfig {
    /// Steering cadence in ms. 0 disables band steering entirely.
    pub steering_interval: u64,
    /// Measurement cadence in ms. Always > 0 once validated.
    pub tick_interval: u64,
    /// Minimum SNR (dB) below which a station is considered weak. Negative
    /// values are taken as an absolute signal in dBm.
    pub min_snr: i32,
    /// Margin (dB) added to a station's threshold when deciding whether it
    /// dropped below its recent best.
    pub signal_hysteresis_margin: i32,
    /// Delay in ms between arming a forced disassociation and executing it.
    pub kick_delay: u64,
}

impl Default for BandSteeringConfig {
    fn default() -> Self {
        Self {
            steering_interval: 120_000,
            tick_interval: 1_000,
            min_snr: -60,
            signal_hysteresis_margin: 5,
            kick_delay: 10_000,
        }
    }
}

impl BandSteeringConfigInput {
    pub fn resolve(self) -> Result<BandSteeringConfig> {
        let defaults = BandSteeringConfig::default();
        let config = BandSteeringConfig {
            steering_interval: self.steering_interval_ms.unwrap_or(defaults.steering_interval),
            tick_interval: self.tick_interval_ms.unwrap_or(defaults.tick_interval),
            min_snr: self.min_snr.unwrap_or(defaults.min_snr),
            signal_hysteresis_margin: self
                .signal_hysteresis_margin
                .unwrap_or(defaults.signal_hysteresis_margin),
            kick_delay: self.kick_delay_ms.unwrap_or(defaults.kick_delay),
        };
        config.validate()?;
        Ok(config)
    }
}

impl BandSteeringConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(BandSteeringConfig::default());
        }
        let parsed: BandSteeringConfigInput = toml::from_str(input)?;
        parsed.resolve()
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval == 0 {
            return Err(Error::InvalidConfig(
                "tick_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Whether band steering runs at all.
    pub fn is_enabled(&self) -> bool {
        self.steering_interval != 0
    }

    /// Number of measurement ticks per steering pass, rounded up.
    pub fn min_tick_count(&self) -> u64 {
        self.steering_interval.div_ceil(self.tick_interval.max(1))
    }
}
