use binsort_config::load_toml;
use rstest::rstest;

fn base_toml() -> String {
    r#"
[telemetry]
server = "demo.thingsboard.io"
token = "device-token"
bin_name = "Trash Bin 1"
latitude = -6.969282
longitude = 107.6255821

[pins]
trigger = 23
echo = 24
servo = 18
adc_channel = 0
"#
    .to_string()
}

#[test]
fn accepts_minimal_config_with_defaults() {
    let cfg = load_toml(&base_toml()).expect("parse TOML");
    cfg.validate().expect("valid config should pass");

    // Reference timing/threshold defaults apply when sections are omitted.
    assert_eq!(cfg.detection.soil_threshold, 1000);
    assert_eq!(cfg.bins.max_wet_count, 20);
    assert_eq!(cfg.actuator.dwell_ms, 3000);
    assert_eq!(cfg.timing.cycle_ms, 1000);
    assert_eq!(cfg.timing.reconnect_backoff_ms, 5000);
    assert_eq!(cfg.telemetry.topic, "v1/devices/me/telemetry");
    assert_eq!(cfg.telemetry.port, 1883);
}

#[test]
fn rejects_missing_telemetry_section() {
    let toml = r#"
[pins]
trigger = 23
echo = 24
servo = 18
adc_channel = 0
"#;
    assert!(load_toml(toml).is_err());
}

#[rstest]
#[case("[detection]\nmin_distance_cm = 0.0", "min_distance_cm must be > 0")]
#[case(
    "[detection]\nmin_distance_cm = 15.0\nmax_distance_cm = 10.0",
    "max_distance_cm must be >= min_distance_cm"
)]
#[case("[detection]\nsoil_threshold = 0", "soil_threshold must be in 1..=1023")]
#[case("[detection]\nsoil_threshold = 2048", "soil_threshold must be in 1..=1023")]
#[case("[bins]\nmax_wet_count = 0", "max_wet_count must be > 0")]
#[case("[bins]\nmax_dry_count = 0", "max_dry_count must be > 0")]
#[case("[actuator]\nwet_position_deg = 200", "wet_position_deg must be <= 180")]
#[case("[actuator]\ndwell_ms = 0", "dwell_ms must be >= 1")]
#[case("[actuator]\ndwell_ms = 120000", "unreasonably large")]
#[case("[timing]\ncycle_ms = 0", "cycle_ms must be >= 1")]
#[case("[timing]\ndebounce_ms = 0", "debounce_ms must be >= 1")]
#[case(
    "[timing]\nreconnect_backoff_ms = 0",
    "reconnect_backoff_ms must be >= 1"
)]
#[case("[hardware]\necho_timeout_ms = 0", "echo_timeout_ms must be >= 1")]
fn rejects_out_of_range_values(#[case] section: &str, #[case] needle: &str) {
    let toml = format!("{}\n{}\n", base_toml(), section);
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject invalid value");
    assert!(
        format!("{err}").contains(needle),
        "expected {needle:?} in {err}"
    );
}

#[rstest]
#[case(-91.0, 0.0, "latitude")]
#[case(0.0, 181.0, "longitude")]
fn rejects_out_of_range_coordinates(#[case] lat: f64, #[case] lon: f64, #[case] needle: &str) {
    let toml = format!(
        r#"
[telemetry]
server = "demo.thingsboard.io"
token = "device-token"
bin_name = "Trash Bin 1"
latitude = {lat}
longitude = {lon}

[pins]
trigger = 23
echo = 24
servo = 18
adc_channel = 0
"#
    );
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject coordinates");
    assert!(format!("{err}").contains(needle));
}

#[test]
fn rejects_empty_bin_name() {
    let toml = base_toml().replace("\"Trash Bin 1\"", "\"\"");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject empty bin_name");
    assert!(format!("{err}").contains("bin_name"));
}
