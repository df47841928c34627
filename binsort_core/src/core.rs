//! The detection-classification-actuation pass (`SorterCore`).
//!
//! One `cycle()` runs per control period: presence check from the ranging
//! reading, moisture burst, classification against the fixed cutoff, the
//! debounce/full-bin gates, counter bookkeeping with the one-shot full
//! latch, and the blocking diverter sequence. Telemetry events go into the
//! bounded outbox; the runner pumps them to the reporter.

use std::sync::Arc;
use std::time::{Duration, Instant};

use binsort_traits::{Clock, Diverter, MoistureProbe, RangeFinder};
use crossbeam_channel::Sender;

use crate::actuator::ActuatorSequencer;
use crate::bins::{BinSnapshot, BinState, FillTransition};
use crate::classifier::{Classification, DebounceGate, MachineState, classify};
use crate::config::{DetectionCfg, SiteCfg, Timeouts, TimingCfg};
use crate::error::Result;
use crate::sampler::MoistureSampler;
use crate::status::{CycleStatus, HoldReason, SortReport};
use crate::telemetry::{TelemetryEvent, WasteReading};

/// Unified core for both dynamic (boxed) and generic (static dispatch)
/// variants.
pub struct SorterCore<R: RangeFinder, P: MoistureProbe, D: Diverter> {
    pub(crate) ranger: R,
    pub(crate) sampler: MoistureSampler<P>,
    pub(crate) sequencer: ActuatorSequencer<D>,
    pub(crate) detection: DetectionCfg,
    pub(crate) timing: TimingCfg,
    pub(crate) timeouts: Timeouts,
    pub(crate) site: SiteCfg,
    pub(crate) bins: BinState,
    pub(crate) gate: DebounceGate,
    pub(crate) state: MachineState,
    pub(crate) last_classification: Classification,
    // Unified clock for deterministic time in tests
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    // Epoch Instant for computing monotonic milliseconds
    pub(crate) epoch: Instant,
    pub(crate) outbox: Sender<TelemetryEvent>,
}

impl<R: RangeFinder, P: MoistureProbe, D: Diverter> std::fmt::Debug for SorterCore<R, P, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snap = self.bins.snapshot();
        f.debug_struct("SorterCore")
            .field("state", &self.state)
            .field("wet_count", &snap.wet_count)
            .field("dry_count", &snap.dry_count)
            .finish()
    }
}

impl<R: RangeFinder, P: MoistureProbe, D: Diverter> SorterCore<R, P, D> {
    /// Observable state of the detection machine after the last pass.
    pub fn machine_state(&self) -> MachineState {
        self.state
    }

    /// Classification result of the last pass; `Unclassified` when no
    /// object was sampled.
    pub fn last_classification(&self) -> Classification {
        self.last_classification
    }

    /// Point-in-time copy of the fill state.
    pub fn bins(&self) -> BinSnapshot {
        self.bins.snapshot()
    }

    /// Shared clock handle, for callers pacing the loop around the core.
    pub fn clock(&self) -> Arc<dyn Clock + Send + Sync> {
        self.clock.clone()
    }

    /// Inter-cycle delay from the timing configuration.
    pub fn cycle_delay(&self) -> Duration {
        Duration::from_millis(self.timing.cycle_ms)
    }

    /// Command the diverter to its rest position.
    pub fn park(&mut self) -> Result<()> {
        self.sequencer.park()
    }

    /// Run one detection-classification-actuation pass.
    pub fn cycle(&mut self) -> Result<CycleStatus> {
        // Saturated mechanism: stop before any sensor read or actuation.
        // Only an external reset resumes sorting; the loop keeps cycling.
        if self.bins.both_full() {
            self.state = MachineState::Idle;
            self.last_classification = Classification::Unclassified;
            tracing::info!("both bins full; waiting for reset");
            return Ok(CycleStatus::Saturated);
        }

        // A failed or timed-out ranging read is indistinguishable from
        // "no object present" and is not surfaced as an error.
        let timeout = Duration::from_millis(self.timeouts.echo_ms);
        let distance_cm = match self.ranger.measure(timeout) {
            Ok(d) => d,
            Err(e) => {
                tracing::debug!(error = %e, "ranging read failed; treating as no object");
                self.state = MachineState::Idle;
                self.last_classification = Classification::Unclassified;
                return Ok(CycleStatus::Idle);
            }
        };
        tracing::debug!(distance_cm, "ranging sample");

        if !self.detection.in_window(distance_cm) {
            self.state = MachineState::Idle;
            self.last_classification = Classification::Unclassified;
            return Ok(CycleStatus::Idle);
        }
        self.state = MachineState::ObjectPresent;

        let moisture_raw = self.sampler.measure_averaged(self.clock.as_ref())?;
        let category = classify(moisture_raw, self.detection.soil_threshold);
        self.last_classification = category.into();

        if self.bins.is_full(category) {
            tracing::debug!(category = category.label(), "target bin full; holding");
            return Ok(CycleStatus::Held(HoldReason::BinFull(category)));
        }
        let now = self.clock.ms_since(self.epoch);
        if !self.gate.permits(now, self.timing.debounce_ms) {
            tracing::debug!("within debounce interval; holding");
            return Ok(CycleStatus::Held(HoldReason::Debounce));
        }

        // Accepted detection: update the debounce clock, count it, and latch
        // the full flag on the crossing increment.
        self.gate.mark(now);
        let fill = self.bins.record(category);
        if fill == FillTransition::JustFilled {
            tracing::info!(category = category.label(), "bin full");
            self.emit(TelemetryEvent::scalar(category.status_key(), 1));
        }

        self.sequencer.divert(self.clock.as_ref(), category)?;

        let snapshot = self.bins.snapshot();
        self.emit(TelemetryEvent::Reading(WasteReading::new(
            moisture_raw,
            category,
            &snapshot,
            &self.site,
        )));
        tracing::info!(
            category = category.label(),
            moisture_raw,
            wet_count = snapshot.wet_count,
            dry_count = snapshot.dry_count,
            "waste sorted"
        );

        self.state = MachineState::Classified(category);
        Ok(CycleStatus::Sorted(SortReport {
            category,
            moisture_raw,
            fill,
        }))
    }

    fn emit(&self, event: TelemetryEvent) {
        if self.outbox.try_send(event).is_err() {
            tracing::warn!("telemetry outbox full; dropping event");
        }
    }
}
