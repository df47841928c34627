#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas for the waste-sorting bin controller.
//!
//! `Config` and sub-structs are deserialized from TOML and validated.
//! All values are loaded once at startup and treated as immutable for the
//! process lifetime.
use serde::Deserialize;

/// Wi-Fi credentials. Unused by the simulated backend; required on device.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Network {
    pub ssid: String,
    pub password: String,
}

/// Telemetry backend identity and the static site information that is
/// stamped onto every combined reading.
#[derive(Debug, Deserialize)]
pub struct Telemetry {
    pub server: String,
    #[serde(default = "default_mqtt_port")]
    pub port: u16,
    pub token: String,
    /// Publish topic; every event goes to this single channel.
    #[serde(default = "default_topic")]
    pub topic: String,
    pub bin_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

fn default_mqtt_port() -> u16 {
    1883
}

fn default_topic() -> String {
    "v1/devices/me/telemetry".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Pins {
    pub trigger: u8,
    pub echo: u8,
    pub servo: u8,
    /// MCP3008 channel the soil probe is wired to.
    pub adc_channel: u8,
}

/// Detection window and the wet/dry cutoff.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Detection {
    /// Closed interval [min, max] in cm; an object is present iff the
    /// ranging reading falls inside it.
    pub min_distance_cm: f32,
    pub max_distance_cm: f32,
    /// Raw ADC cutoff: readings below it classify as wet, at or above as dry.
    pub soil_threshold: u16,
}

impl Default for Detection {
    fn default() -> Self {
        Self {
            min_distance_cm: 10.0,
            max_distance_cm: 15.0,
            soil_threshold: 1000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Bins {
    pub max_wet_count: u32,
    pub max_dry_count: u32,
}

impl Default for Bins {
    fn default() -> Self {
        Self {
            max_wet_count: 20,
            max_dry_count: 20,
        }
    }
}

/// Diverter servo positions (degrees) and the hold time at a category
/// position before the unconditional return to neutral.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Actuator {
    pub wet_position_deg: u8,
    pub dry_position_deg: u8,
    pub neutral_position_deg: u8,
    pub dwell_ms: u64,
}

impl Default for Actuator {
    fn default() -> Self {
        Self {
            wet_position_deg: 180,
            dry_position_deg: 0,
            neutral_position_deg: 120,
            dwell_ms: 3000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Inter-cycle delay of the control loop.
    pub cycle_ms: u64,
    /// Minimum elapsed time between two accepted detections.
    pub debounce_ms: u64,
    /// Fixed backoff between connect attempts while the link is down.
    pub reconnect_backoff_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            cycle_ms: 1000,
            debounce_ms: 1000,
            reconnect_backoff_ms: 5000,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Per-read timeout for the ultrasonic echo.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Hardware {
    pub echo_timeout_ms: u64,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            echo_timeout_ms: 150,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: Network,
    pub telemetry: Telemetry,
    pub pins: Pins,
    #[serde(default)]
    pub detection: Detection,
    #[serde(default)]
    pub bins: Bins,
    #[serde(default)]
    pub actuator: Actuator,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub hardware: Hardware,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Telemetry
        if self.telemetry.server.is_empty() {
            eyre::bail!("telemetry.server must not be empty");
        }
        if self.telemetry.port == 0 {
            eyre::bail!("telemetry.port must be > 0");
        }
        if self.telemetry.topic.is_empty() {
            eyre::bail!("telemetry.topic must not be empty");
        }
        if self.telemetry.bin_name.is_empty() {
            eyre::bail!("telemetry.bin_name must not be empty");
        }
        if !(-90.0..=90.0).contains(&self.telemetry.latitude) {
            eyre::bail!("telemetry.latitude must be in [-90, 90]");
        }
        if !(-180.0..=180.0).contains(&self.telemetry.longitude) {
            eyre::bail!("telemetry.longitude must be in [-180, 180]");
        }

        // Detection
        if !self.detection.min_distance_cm.is_finite() || !self.detection.max_distance_cm.is_finite()
        {
            eyre::bail!("detection window bounds must be finite");
        }
        if self.detection.min_distance_cm <= 0.0 {
            eyre::bail!("detection.min_distance_cm must be > 0");
        }
        if self.detection.max_distance_cm < self.detection.min_distance_cm {
            eyre::bail!("detection.max_distance_cm must be >= min_distance_cm");
        }
        if self.detection.soil_threshold == 0 || self.detection.soil_threshold > 1023 {
            eyre::bail!("detection.soil_threshold must be in 1..=1023");
        }

        // Bins
        if self.bins.max_wet_count == 0 {
            eyre::bail!("bins.max_wet_count must be > 0");
        }
        if self.bins.max_dry_count == 0 {
            eyre::bail!("bins.max_dry_count must be > 0");
        }

        // Actuator
        for (name, deg) in [
            ("wet_position_deg", self.actuator.wet_position_deg),
            ("dry_position_deg", self.actuator.dry_position_deg),
            ("neutral_position_deg", self.actuator.neutral_position_deg),
        ] {
            if deg > 180 {
                eyre::bail!("actuator.{name} must be <= 180");
            }
        }
        if self.actuator.dwell_ms == 0 {
            eyre::bail!("actuator.dwell_ms must be >= 1");
        }
        if self.actuator.dwell_ms > 60_000 {
            eyre::bail!("actuator.dwell_ms is unreasonably large (>60s)");
        }

        // Timing
        if self.timing.cycle_ms == 0 {
            eyre::bail!("timing.cycle_ms must be >= 1");
        }
        if self.timing.debounce_ms == 0 {
            eyre::bail!("timing.debounce_ms must be >= 1");
        }
        if self.timing.reconnect_backoff_ms == 0 {
            eyre::bail!("timing.reconnect_backoff_ms must be >= 1");
        }

        // Hardware
        if self.hardware.echo_timeout_ms == 0 {
            eyre::bail!("hardware.echo_timeout_ms must be >= 1");
        }

        Ok(())
    }
}
