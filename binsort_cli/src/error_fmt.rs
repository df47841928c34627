//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes
/// and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use binsort_core::error::{BuildError, SorterError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingRangeFinder => {
                "What happened: No range finder was provided to the sorting engine.\nLikely causes: The ultrasonic sensor failed to initialize or was not wired into the builder.\nHow to fix: Ensure the HC-SR04 opens successfully and is passed via with_range_finder(...).".to_string()
            }
            BuildError::MissingMoistureProbe => {
                "What happened: No moisture probe was provided to the sorting engine.\nLikely causes: The ADC failed to initialize or was not wired into the builder.\nHow to fix: Ensure the soil probe is created successfully and passed via with_moisture_probe(...).".to_string()
            }
            BuildError::MissingDiverter => {
                "What happened: No diverter was provided to the sorting engine.\nLikely causes: The servo failed to initialize or was not wired into the builder.\nHow to fix: Ensure the servo opens successfully and is passed via with_diverter(...).".to_string()
            }
            BuildError::MissingOutbox => {
                "What happened: No telemetry outbox was provided to the sorting engine.\nLikely causes: The builder was not given a channel sender.\nHow to fix: Create a bounded channel and pass its sender via with_outbox(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See README for a sample."
            ),
        };
    }

    if let Some(se) = err.downcast_ref::<SorterError>() {
        if matches!(se, SorterError::Timeout) {
            return "What happened: A sensor read timed out.\nLikely causes: Sensor not wired correctly, no power/ground, or timeout too low.\nHow to fix: Verify trigger/echo and probe wiring, and consider increasing hardware.echo_timeout_ms in the config.".to_string();
        }
        // Fallback to generic for other domain errors
        return format!(
            "What happened: {se}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("echo") && lower.contains("timeout") {
        return "What happened: The ultrasonic sensor did not answer within the configured timeout.\nLikely causes: Wrong trigger/echo pins, wiring/power issues, or timeout configured too low.\nHow to fix: Check [pins] in the config, verify 5V/GND, and raise hardware.echo_timeout_ms.".to_string();
    }

    if lower.contains("open ultrasonic pins")
        || lower.contains("open soil probe")
        || lower.contains("open servo")
    {
        return "What happened: Failed to initialize hardware.\nLikely causes: Incorrect pin numbers or insufficient GPIO/SPI/PWM permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process has permission to access the peripherals.".to_string();
    }

    if lower.contains("invalid configuration") || lower.contains("must be") {
        let detail = err.root_cause().to_string();
        return format!(
            "What happened: Configuration is invalid or incomplete ({detail}).\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Map typed errors to stable exit codes; unknown errors return 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use binsort_core::error::{BuildError, SorterError};
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    if let Some(se) = err.downcast_ref::<SorterError>() {
        return match se {
            SorterError::Config(_) => 2,
            SorterError::Timeout => 3,
            SorterError::Hardware(_) | SorterError::HardwareFault(_) => 4,
            _ => 1,
        };
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use binsort_core::error::{BuildError, SorterError};
    use serde_json::json;

    let reason = if let Some(be) = err.downcast_ref::<BuildError>() {
        match be {
            BuildError::MissingRangeFinder => "MissingRangeFinder",
            BuildError::MissingMoistureProbe => "MissingMoistureProbe",
            BuildError::MissingDiverter => "MissingDiverter",
            BuildError::MissingOutbox => "MissingOutbox",
            BuildError::InvalidConfig(_) => "InvalidConfig",
        }
    } else if let Some(se) = err.downcast_ref::<SorterError>() {
        match se {
            SorterError::Hardware(_) => "Hardware",
            SorterError::HardwareFault(_) => "HardwareFault",
            SorterError::Config(_) => "Config",
            SorterError::Timeout => "Timeout",
            SorterError::Connectivity(_) => "Connectivity",
            SorterError::State(_) => "State",
        }
    } else {
        "Error"
    };

    json!({ "reason": reason, "message": humanize(err) }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_errors_exit_with_code_two() {
        let err = eyre::Report::new(binsort_core::BuildError::MissingDiverter);
        assert_eq!(exit_code_for_error(&err), 2);
        assert!(humanize(&err).contains("diverter"));
    }

    #[test]
    fn json_errors_carry_a_reason_tag() {
        let err = eyre::Report::new(binsort_core::SorterError::Timeout);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Timeout");
        assert!(v["message"].as_str().unwrap().contains("timed out"));
    }
}
