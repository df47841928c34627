//! Type-state builder for `Sorter` and the generic `build_sorter`
//! constructor.
//!
//! The builder enforces at compile time that the range finder, moisture
//! probe, and diverter are provided before `build()` is available.
//! `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use binsort_traits::clock::{Clock, MonotonicClock};
use binsort_traits::{Diverter, MoistureProbe, RangeFinder};
use crossbeam_channel::Sender;

use crate::actuator::ActuatorSequencer;
use crate::bins::{BinSnapshot, BinState};
use crate::classifier::{Classification, DebounceGate, MachineState};
use crate::config::{ActuatorCfg, BinCfg, DetectionCfg, SiteCfg, Timeouts, TimingCfg};
use crate::core::SorterCore;
use crate::error::{BuildError, Result};
use crate::sampler::MoistureSampler;
use crate::status::CycleStatus;
use crate::telemetry::TelemetryEvent;

// ── Public dynamic-dispatch wrapper ──────────────────────────────────────────

/// Public dynamic (boxed) sorter over trait-object ports.
pub struct Sorter {
    pub(crate) inner:
        SorterCore<Box<dyn RangeFinder>, Box<dyn MoistureProbe>, Box<dyn Diverter>>,
}

impl std::fmt::Debug for Sorter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl Sorter {
    /// Start building a Sorter.
    pub fn builder() -> SorterBuilder<Missing, Missing, Missing> {
        SorterBuilder::default()
    }

    /// Run one detection-classification-actuation pass.
    pub fn cycle(&mut self) -> Result<CycleStatus> {
        self.inner.cycle()
    }

    /// Command the diverter to its rest position.
    pub fn park(&mut self) -> Result<()> {
        self.inner.park()
    }

    /// Point-in-time copy of the fill state.
    pub fn bins(&self) -> BinSnapshot {
        self.inner.bins()
    }

    /// Observable state of the detection machine after the last pass.
    pub fn machine_state(&self) -> MachineState {
        self.inner.machine_state()
    }

    /// Classification result of the last pass; `Unclassified` when no
    /// object was sampled.
    pub fn last_classification(&self) -> Classification {
        self.inner.last_classification()
    }

    /// Shared clock handle, for callers pacing the loop around the core.
    pub fn clock(&self) -> Arc<dyn Clock + Send + Sync> {
        self.inner.clock()
    }

    /// Drive this sorter with the given reporter until shutdown or the
    /// cycle cap. See `runner::run`.
    pub fn run<C: binsort_traits::Connectivity>(
        &mut self,
        reporter: &mut crate::telemetry::Reporter<C>,
        outbox: &crossbeam_channel::Receiver<TelemetryEvent>,
        params: crate::runner::RunParams,
        shutdown: &std::sync::atomic::AtomicBool,
    ) -> Result<BinSnapshot> {
        crate::runner::run(&mut self.inner, reporter, outbox, params, shutdown)
    }
}

// Type-state markers for the builder
pub struct Missing;
pub struct Set;

/// Builder for `Sorter`. All fields are validated on `build()`.
pub struct SorterBuilder<R, P, D> {
    ranger: Option<Box<dyn RangeFinder>>,
    probe: Option<Box<dyn MoistureProbe>>,
    diverter: Option<Box<dyn Diverter>>,
    detection: Option<DetectionCfg>,
    bins: Option<BinCfg>,
    actuator: Option<ActuatorCfg>,
    timing: Option<TimingCfg>,
    timeouts: Option<Timeouts>,
    site: Option<SiteCfg>,
    outbox: Option<Sender<TelemetryEvent>>,
    // Optional clock for tests (accept Box here)
    clock: Option<Box<dyn Clock + Send + Sync>>,
    // Type-state markers
    _r: PhantomData<R>,
    _p: PhantomData<P>,
    _d: PhantomData<D>,
}

impl Default for SorterBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            ranger: None,
            probe: None,
            diverter: None,
            detection: None,
            bins: None,
            actuator: None,
            timing: None,
            timeouts: None,
            site: None,
            outbox: None,
            clock: None,
            _r: PhantomData,
            _p: PhantomData,
            _d: PhantomData,
        }
    }
}

/// Validate the shared configuration pieces; used by both build paths.
fn validate_cfg(
    detection: &DetectionCfg,
    bins: &BinCfg,
    actuator: &ActuatorCfg,
    timing: &TimingCfg,
    timeouts: &Timeouts,
) -> Result<()> {
    if !detection.min_distance_cm.is_finite() || !detection.max_distance_cm.is_finite() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "detection window bounds must be finite",
        )));
    }
    if detection.min_distance_cm <= 0.0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "min_distance_cm must be > 0",
        )));
    }
    if detection.max_distance_cm < detection.min_distance_cm {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "max_distance_cm must be >= min_distance_cm",
        )));
    }
    if detection.soil_threshold == 0 || detection.soil_threshold > crate::classifier::ADC_MAX {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "soil_threshold must be in 1..=1023",
        )));
    }
    if bins.max_wet_count == 0 || bins.max_dry_count == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "bin capacities must be > 0",
        )));
    }
    if actuator.wet_position_deg > 180
        || actuator.dry_position_deg > 180
        || actuator.neutral_position_deg > 180
    {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "servo positions must be <= 180 degrees",
        )));
    }
    if actuator.dwell_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "dwell_ms must be >= 1",
        )));
    }
    if timing.cycle_ms == 0 || timing.debounce_ms == 0 || timing.reconnect_backoff_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "timing intervals must be >= 1 ms",
        )));
    }
    if timeouts.echo_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "echo_ms must be >= 1",
        )));
    }
    Ok(())
}

impl<R, P, D> SorterBuilder<R, P, D> {
    /// Fallible build available in any type-state; returns detailed
    /// BuildError for missing pieces.
    pub fn try_build(self) -> Result<Sorter> {
        let SorterBuilder {
            ranger,
            probe,
            diverter,
            detection,
            bins,
            actuator,
            timing,
            timeouts,
            site,
            outbox,
            clock,
            _r: _,
            _p: _,
            _d: _,
        } = self;

        let ranger = ranger.ok_or_else(|| eyre::Report::new(BuildError::MissingRangeFinder))?;
        let probe = probe.ok_or_else(|| eyre::Report::new(BuildError::MissingMoistureProbe))?;
        let diverter = diverter.ok_or_else(|| eyre::Report::new(BuildError::MissingDiverter))?;
        let outbox = outbox.ok_or_else(|| eyre::Report::new(BuildError::MissingOutbox))?;

        let detection = detection.unwrap_or_default();
        let bins = bins.unwrap_or_default();
        let actuator = actuator.unwrap_or_default();
        let timing = timing.unwrap_or_default();
        let timeouts = timeouts.unwrap_or_default();
        let site = site.unwrap_or_default();
        let clock: Arc<dyn Clock + Send + Sync> = match clock {
            Some(b) => Arc::from(b),
            None => Arc::new(MonotonicClock::new()),
        };

        validate_cfg(&detection, &bins, &actuator, &timing, &timeouts)?;

        let epoch = clock.now();
        let bin_state = BinState::new(&bins);

        Ok(Sorter {
            inner: SorterCore {
                ranger,
                sampler: MoistureSampler::new(probe),
                sequencer: ActuatorSequencer::new(diverter, actuator),
                detection,
                timing,
                timeouts,
                site,
                bins: bin_state,
                gate: DebounceGate::new(),
                state: MachineState::Idle,
                last_classification: Classification::Unclassified,
                clock,
                epoch,
                outbox,
            },
        })
    }
}

/// Chainable setters that do not affect type-state
impl<R, P, D> SorterBuilder<R, P, D> {
    pub fn with_detection(mut self, detection: DetectionCfg) -> Self {
        self.detection = Some(detection);
        self
    }
    pub fn with_bins(mut self, bins: BinCfg) -> Self {
        self.bins = Some(bins);
        self
    }
    pub fn with_actuator(mut self, actuator: ActuatorCfg) -> Self {
        self.actuator = Some(actuator);
        self
    }
    pub fn with_timing(mut self, timing: TimingCfg) -> Self {
        self.timing = Some(timing);
        self
    }
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = Some(timeouts);
        self
    }
    pub fn with_site(mut self, site: SiteCfg) -> Self {
        self.site = Some(site);
        self
    }
    /// Bounded channel the core emits telemetry events into. Required.
    pub fn with_outbox(mut self, outbox: Sender<TelemetryEvent>) -> Self {
        self.outbox = Some(outbox);
        self
    }
    /// Provide a custom clock implementation; defaults to MonotonicClock
    /// when not provided.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

// Setters that advance type-state when providing mandatory components
impl<P, D> SorterBuilder<Missing, P, D> {
    pub fn with_range_finder(self, ranger: impl RangeFinder + 'static) -> SorterBuilder<Set, P, D> {
        let SorterBuilder {
            ranger: _,
            probe,
            diverter,
            detection,
            bins,
            actuator,
            timing,
            timeouts,
            site,
            outbox,
            clock,
            _r: _,
            _p: _,
            _d: _,
        } = self;
        SorterBuilder {
            ranger: Some(Box::new(ranger)),
            probe,
            diverter,
            detection,
            bins,
            actuator,
            timing,
            timeouts,
            site,
            outbox,
            clock,
            _r: PhantomData,
            _p: PhantomData,
            _d: PhantomData,
        }
    }
}

impl<R, D> SorterBuilder<R, Missing, D> {
    pub fn with_moisture_probe(
        self,
        probe: impl MoistureProbe + 'static,
    ) -> SorterBuilder<R, Set, D> {
        let SorterBuilder {
            ranger,
            probe: _,
            diverter,
            detection,
            bins,
            actuator,
            timing,
            timeouts,
            site,
            outbox,
            clock,
            _r: _,
            _p: _,
            _d: _,
        } = self;
        SorterBuilder {
            ranger,
            probe: Some(Box::new(probe)),
            diverter,
            detection,
            bins,
            actuator,
            timing,
            timeouts,
            site,
            outbox,
            clock,
            _r: PhantomData,
            _p: PhantomData,
            _d: PhantomData,
        }
    }
}

impl<R, P> SorterBuilder<R, P, Missing> {
    pub fn with_diverter(self, diverter: impl Diverter + 'static) -> SorterBuilder<R, P, Set> {
        let SorterBuilder {
            ranger,
            probe,
            diverter: _,
            detection,
            bins,
            actuator,
            timing,
            timeouts,
            site,
            outbox,
            clock,
            _r: _,
            _p: _,
            _d: _,
        } = self;
        SorterBuilder {
            ranger,
            probe,
            diverter: Some(Box::new(diverter)),
            detection,
            bins,
            actuator,
            timing,
            timeouts,
            site,
            outbox,
            clock,
            _r: PhantomData,
            _p: PhantomData,
            _d: PhantomData,
        }
    }
}

impl SorterBuilder<Set, Set, Set> {
    /// Validate and build the Sorter. Only available when all three
    /// hardware ports are set.
    pub fn build(self) -> Result<Sorter> {
        self.try_build()
    }
}

/// Generic, statically-dispatched alias using the unified core.
pub type SorterG<R, P, D> = SorterCore<R, P, D>;

/// Build a generic, statically-dispatched SorterG from concrete ports.
#[allow(clippy::too_many_arguments)]
pub fn build_sorter<R, P, D>(
    ranger: R,
    probe: P,
    diverter: D,
    detection: DetectionCfg,
    bins: BinCfg,
    actuator: ActuatorCfg,
    timing: TimingCfg,
    timeouts: Timeouts,
    site: SiteCfg,
    outbox: Sender<TelemetryEvent>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<SorterG<R, P, D>>
where
    R: RangeFinder + 'static,
    P: MoistureProbe + 'static,
    D: Diverter + 'static,
{
    validate_cfg(&detection, &bins, &actuator, &timing, &timeouts)?;

    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };
    let epoch = clock.now();
    let bin_state = BinState::new(&bins);

    Ok(SorterG {
        ranger,
        sampler: MoistureSampler::new(probe),
        sequencer: ActuatorSequencer::new(diverter, actuator),
        detection,
        timing,
        timeouts,
        site,
        bins: bin_state,
        gate: DebounceGate::new(),
        state: MachineState::Idle,
        last_classification: Classification::Unclassified,
        clock,
        epoch,
        outbox,
    })
}
