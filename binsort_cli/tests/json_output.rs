use assert_cmd::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
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

[actuator]
dwell_ms = 20

[timing]
cycle_ms = 10
debounce_ms = 10
reconnect_backoff_ms = 100
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

/// Validate the JSON summary schema for a successful bounded run.
#[rstest]
fn json_run_summary_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("binsort_cli").unwrap();
    cmd.arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .args(["run", "--max-cycles", "5"]);

    let out = cmd.output().expect("spawn binsort_cli");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let summary = stdout
        .lines()
        .rev()
        .find(|l| l.starts_with('{'))
        .expect("JSON summary line");
    let v: serde_json::Value = serde_json::from_str(summary).expect("valid JSON");
    assert_eq!(v["wet_count"], 1);
    assert_eq!(v["dry_count"], 0);
    assert_eq!(v["wet_full"], false);
    assert_eq!(v["dry_full"], false);
}

/// Every telemetry publish is itself one parseable JSON object.
#[rstest]
fn telemetry_payloads_are_json_objects() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("binsort_cli").unwrap();
    cmd.arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .args(["run", "--max-cycles", "5"]);

    let out = cmd.output().expect("spawn binsort_cli");
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    let mut payloads = 0;
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("[v1/devices/me/telemetry] ") {
            let v: serde_json::Value = serde_json::from_str(rest).expect("payload is JSON");
            assert!(v.is_object());
            payloads += 1;
        }
    }
    // Session announce (4 scalars) plus the combined reading.
    assert_eq!(payloads, 5);
}

#[rstest]
fn json_self_check_reports_backend() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("binsort_cli").unwrap();
    cmd.arg("--json").arg("--config").arg(&cfg).arg("self-check");

    let out = cmd.output().expect("spawn binsort_cli");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let line = stdout
        .lines()
        .rev()
        .find(|l| l.starts_with('{'))
        .expect("JSON line");
    let v: serde_json::Value = serde_json::from_str(line).expect("valid JSON");
    assert_eq!(v["self_check"], "ok");
    assert_eq!(v["backend"], "simulated");
}
