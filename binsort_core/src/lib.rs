#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core sorting logic (hardware-agnostic).
//!
//! This crate provides the hardware-independent decision engine for the
//! waste-sorting bin. All hardware interactions go through the port traits
//! in `binsort_traits` (`RangeFinder`, `MoistureProbe`, `Diverter`,
//! `Connectivity`).
//!
//! ## Architecture
//!
//! - **Classification**: pure wet/dry cutoff and the detection state
//!   machine (`classifier` module)
//! - **Sampling**: averaged moisture burst per detection (`sampler`)
//! - **Fill tracking**: monotonic counters with one-shot full latches
//!   (`bins`)
//! - **Actuation**: route-dwell-return diverter sequencing (`actuator`)
//! - **Telemetry**: wire formatting, outbox pump, blocking reconnect
//!   (`telemetry`)
//! - **Control loop**: one pass per cycle with fixed pacing (`core`,
//!   `runner`)

// Module declarations
pub mod actuator;
pub mod bins;
pub mod builder;
pub mod classifier;
pub mod config;
pub mod conversions;
pub mod core;
pub mod error;
pub mod hw_error;
pub mod mocks;
pub mod runner;
pub mod sampler;
pub mod status;
pub mod telemetry;

pub use crate::actuator::{ActuatorPosition, ActuatorSequencer};
pub use crate::bins::{BinSnapshot, BinState, FillTransition};
pub use crate::builder::{Missing, Set, Sorter, SorterBuilder, SorterG, build_sorter};
pub use crate::classifier::{
    ADC_MAX, Category, Classification, DebounceGate, MachineState, classify, moisture_percent,
};
pub use crate::config::{ActuatorCfg, BinCfg, DetectionCfg, SiteCfg, Timeouts, TimingCfg};
pub use crate::core::SorterCore;
pub use crate::error::{BuildError, SorterError};
pub use crate::runner::RunParams;
pub use crate::sampler::MoistureSampler;
pub use crate::status::{CycleStatus, HoldReason, SortReport};
pub use crate::telemetry::{Reporter, TelemetryEvent, WasteReading};
