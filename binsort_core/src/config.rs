//! Runtime configuration for the sorting engine.
//!
//! These are the structs used by `SorterCore`. They are separate from the
//! TOML-deserialized config in `binsort_config`; see `conversions` for the
//! bridging `From` impls.

/// Detection window and the wet/dry cutoff.
#[derive(Debug, Clone)]
pub struct DetectionCfg {
    /// Lower bound of the detection window (cm, inclusive).
    pub min_distance_cm: f32,
    /// Upper bound of the detection window (cm, inclusive).
    pub max_distance_cm: f32,
    /// Raw ADC cutoff separating wet from dry. No hysteresis band.
    pub soil_threshold: u16,
}

impl DetectionCfg {
    /// An object is present iff the reading falls in the closed interval.
    #[inline]
    pub fn in_window(&self, distance_cm: f32) -> bool {
        distance_cm >= self.min_distance_cm && distance_cm <= self.max_distance_cm
    }
}

impl Default for DetectionCfg {
    fn default() -> Self {
        Self {
            min_distance_cm: 10.0,
            max_distance_cm: 15.0,
            soil_threshold: 1000,
        }
    }
}

/// Per-category capacity limits.
#[derive(Debug, Clone)]
pub struct BinCfg {
    pub max_wet_count: u32,
    pub max_dry_count: u32,
}

impl Default for BinCfg {
    fn default() -> Self {
        Self {
            max_wet_count: 20,
            max_dry_count: 20,
        }
    }
}

/// Diverter horn angles (degrees) and the hold time before the return
/// to neutral.
#[derive(Debug, Clone)]
pub struct ActuatorCfg {
    pub wet_position_deg: u8,
    pub dry_position_deg: u8,
    pub neutral_position_deg: u8,
    pub dwell_ms: u64,
}

impl Default for ActuatorCfg {
    fn default() -> Self {
        Self {
            wet_position_deg: 180,
            dry_position_deg: 0,
            neutral_position_deg: 120,
            dwell_ms: 3000,
        }
    }
}

/// Control-loop pacing.
#[derive(Debug, Clone)]
pub struct TimingCfg {
    /// Inter-cycle delay of the control loop.
    pub cycle_ms: u64,
    /// Minimum elapsed time between two accepted detections.
    pub debounce_ms: u64,
    /// Fixed backoff between connect attempts while the link is down.
    pub reconnect_backoff_ms: u64,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            cycle_ms: 1000,
            debounce_ms: 1000,
            reconnect_backoff_ms: 5000,
        }
    }
}

/// Static site identity stamped onto every combined reading.
#[derive(Debug, Clone)]
pub struct SiteCfg {
    pub bin_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for SiteCfg {
    fn default() -> Self {
        Self {
            bin_name: "Trash Bin 1".to_string(),
            latitude: -6.969282,
            longitude: 107.625_582_1,
        }
    }
}

/// Sensor timeouts.
#[derive(Debug, Clone)]
pub struct Timeouts {
    /// Max wait for the ultrasonic echo per read (ms).
    pub echo_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { echo_ms: 150 }
    }
}

#[cfg(test)]
mod tests {
    use super::DetectionCfg;

    #[test]
    fn window_is_closed_on_both_ends() {
        let cfg = DetectionCfg::default();
        assert!(cfg.in_window(10.0));
        assert!(cfg.in_window(15.0));
        assert!(cfg.in_window(12.0));
        assert!(!cfg.in_window(9.99));
        assert!(!cfg.in_window(15.01));
        assert!(!cfg.in_window(0.0));
    }
}
