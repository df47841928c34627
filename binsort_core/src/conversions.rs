//! `From` implementations bridging `binsort_config` types to `binsort_core`
//! types.
//!
//! These eliminate manual field-by-field mapping in the CLI.

use crate::config::{ActuatorCfg, BinCfg, DetectionCfg, SiteCfg, Timeouts, TimingCfg};

// ── DetectionCfg ─────────────────────────────────────────────────────────────

impl From<&binsort_config::Detection> for DetectionCfg {
    fn from(c: &binsort_config::Detection) -> Self {
        Self {
            min_distance_cm: c.min_distance_cm,
            max_distance_cm: c.max_distance_cm,
            soil_threshold: c.soil_threshold,
        }
    }
}

// ── BinCfg ───────────────────────────────────────────────────────────────────

impl From<&binsort_config::Bins> for BinCfg {
    fn from(c: &binsort_config::Bins) -> Self {
        Self {
            max_wet_count: c.max_wet_count,
            max_dry_count: c.max_dry_count,
        }
    }
}

// ── ActuatorCfg ──────────────────────────────────────────────────────────────

impl From<&binsort_config::Actuator> for ActuatorCfg {
    fn from(c: &binsort_config::Actuator) -> Self {
        Self {
            wet_position_deg: c.wet_position_deg,
            dry_position_deg: c.dry_position_deg,
            neutral_position_deg: c.neutral_position_deg,
            dwell_ms: c.dwell_ms,
        }
    }
}

// ── TimingCfg ────────────────────────────────────────────────────────────────

impl From<&binsort_config::Timing> for TimingCfg {
    fn from(c: &binsort_config::Timing) -> Self {
        Self {
            cycle_ms: c.cycle_ms,
            debounce_ms: c.debounce_ms,
            reconnect_backoff_ms: c.reconnect_backoff_ms,
        }
    }
}

// ── SiteCfg ──────────────────────────────────────────────────────────────────

impl From<&binsort_config::Telemetry> for SiteCfg {
    fn from(c: &binsort_config::Telemetry) -> Self {
        Self {
            bin_name: c.bin_name.clone(),
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

// ── Timeouts ─────────────────────────────────────────────────────────────────

impl From<&binsort_config::Hardware> for Timeouts {
    fn from(c: &binsort_config::Hardware) -> Self {
        Self {
            echo_ms: c.echo_timeout_ms,
        }
    }
}
