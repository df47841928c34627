//! Moisture sampling: a short burst of raw reads averaged per detection.
//!
//! Each call is independent; no filter history is carried across detection
//! events. The burst suppresses high-frequency analog noise, which is enough
//! because the signal is slow-changing relative to the sample spacing. No
//! outlier rejection is performed.

use std::time::Duration;

use binsort_traits::{Clock, MoistureProbe};
use eyre::WrapErr;

use crate::classifier::ADC_MAX;
use crate::error::Result;
use crate::hw_error::map_hw_error;

/// Number of raw reads averaged per measurement.
pub const SAMPLE_COUNT: u32 = 5;
/// Fixed delay after each raw read.
pub const SAMPLE_SPACING_MS: u64 = 50;

/// Averaging wrapper over the raw probe.
pub struct MoistureSampler<P: MoistureProbe> {
    probe: P,
}

impl<P: MoistureProbe> MoistureSampler<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Take `SAMPLE_COUNT` raw readings `SAMPLE_SPACING_MS` apart and return
    /// their mean. The delays block; nothing else runs during the burst.
    pub fn measure_averaged(&mut self, clock: &dyn Clock) -> Result<u16> {
        let mut sum: u32 = 0;
        for _ in 0..SAMPLE_COUNT {
            let raw = self
                .probe
                .read_raw()
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                .wrap_err("reading moisture probe")?;
            sum += u32::from(raw.min(ADC_MAX));
            clock.sleep(Duration::from_millis(SAMPLE_SPACING_MS));
        }
        Ok((sum / SAMPLE_COUNT) as u16)
    }
}
