//! Classification primitives and the detection state machine.
//!
//! Classification is a pure function of one averaged moisture reading
//! against a fixed cutoff; the debounce gate decides whether an in-window
//! object may be acted on, keyed purely on elapsed time since the last
//! accepted detection.

/// Full-scale value of the 10-bit moisture ADC.
pub const ADC_MAX: u16 = 1023;

/// Waste category a detection resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Wet,
    Dry,
}

impl Category {
    /// Status label used in the combined telemetry payload.
    pub fn label(self) -> &'static str {
        match self {
            Category::Wet => "Wet Waste",
            Category::Dry => "Dry Waste",
        }
    }

    /// Scalar telemetry key for the one-shot full status.
    pub fn status_key(self) -> &'static str {
        match self {
            Category::Wet => "wet_status",
            Category::Dry => "dry_status",
        }
    }

    /// Scalar telemetry key for the running counter.
    pub fn count_key(self) -> &'static str {
        match self {
            Category::Wet => "wet_count",
            Category::Dry => "dry_count",
        }
    }
}

/// Classification result. `Unclassified` is the resting value before any
/// object has been sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    Wet,
    Dry,
    #[default]
    Unclassified,
}

impl From<Category> for Classification {
    fn from(c: Category) -> Self {
        match c {
            Category::Wet => Classification::Wet,
            Category::Dry => Classification::Dry,
        }
    }
}

/// Hard cutoff, no hysteresis: readings below the threshold are wet, at or
/// above it dry. The boundary is closed on the dry side.
#[inline]
pub fn classify(raw: u16, threshold: u16) -> Category {
    if raw < threshold {
        Category::Wet
    } else {
        Category::Dry
    }
}

/// Inverted 10-bit reading as a percentage. The resistive probe reads near
/// full scale in dry air, so wetter material yields a higher percentage.
#[inline]
pub fn moisture_percent(raw: u16) -> f32 {
    let clamped = raw.min(ADC_MAX);
    f32::from(ADC_MAX - clamped) / f32::from(ADC_MAX) * 100.0
}

/// Observable state of the detection machine, re-derived every cycle from
/// the raw distance reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MachineState {
    #[default]
    Idle,
    ObjectPresent,
    Classified(Category),
}

/// Debounce gate: permits a new accepted detection only once the configured
/// interval has elapsed since the previous one. The first detection after
/// boot is always permitted.
#[derive(Debug, Clone, Default)]
pub struct DebounceGate {
    last_accepted_ms: Option<u64>,
}

impl DebounceGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permits(&self, now_ms: u64, min_interval_ms: u64) -> bool {
        match self.last_accepted_ms {
            None => true,
            Some(t) => now_ms.saturating_sub(t) >= min_interval_ms,
        }
    }

    pub fn mark(&mut self, now_ms: u64) {
        self.last_accepted_ms = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Category::Wet)]
    #[case(800, Category::Wet)]
    #[case(999, Category::Wet)]
    #[case(1000, Category::Dry)] // boundary closed on the dry side
    #[case(1001, Category::Dry)]
    #[case(1023, Category::Dry)]
    fn classify_against_reference_threshold(#[case] raw: u16, #[case] expect: Category) {
        assert_eq!(classify(raw, 1000), expect);
    }

    #[test]
    fn moisture_percent_spans_full_scale() {
        assert_eq!(moisture_percent(ADC_MAX), 0.0);
        assert_eq!(moisture_percent(0), 100.0);
        let p = moisture_percent(800);
        assert!((p - 21.798_632).abs() < 1e-3, "got {p}");
    }

    #[test]
    fn moisture_percent_clamps_overrange_reads() {
        assert_eq!(moisture_percent(u16::MAX), 0.0);
    }

    #[test]
    fn gate_permits_first_detection_immediately() {
        let gate = DebounceGate::new();
        assert!(gate.permits(0, 1000));
    }

    #[test]
    fn gate_blocks_within_interval_and_reopens_after() {
        let mut gate = DebounceGate::new();
        gate.mark(500);
        assert!(!gate.permits(900, 1000));
        assert!(!gate.permits(1499, 1000));
        assert!(gate.permits(1500, 1000)); // boundary: exactly the interval
        assert!(gate.permits(5000, 1000));
    }
}
