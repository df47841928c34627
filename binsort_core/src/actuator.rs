//! Diverter sequencing: category position, hold, return to neutral.

use std::time::Duration;

use binsort_traits::{Clock, Diverter};
use eyre::WrapErr;

use crate::classifier::Category;
use crate::config::ActuatorCfg;
use crate::error::Result;
use crate::hw_error::map_hw_error;

/// Logical diverter positions; the horn angles come from `ActuatorCfg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorPosition {
    WetPosition,
    DryPosition,
    Neutral,
}

impl From<Category> for ActuatorPosition {
    fn from(c: Category) -> Self {
        match c {
            Category::Wet => ActuatorPosition::WetPosition,
            Category::Dry => ActuatorPosition::DryPosition,
        }
    }
}

/// Runs the diverter through the fixed route-and-return sequence.
///
/// The hold is a blocking delay; no detection or telemetry processing
/// happens during it. A detection that was denied upstream never reaches
/// this component, so the diverter stays parked at neutral in that case.
pub struct ActuatorSequencer<D: Diverter> {
    diverter: D,
    cfg: ActuatorCfg,
}

impl<D: Diverter> ActuatorSequencer<D> {
    pub fn new(diverter: D, cfg: ActuatorCfg) -> Self {
        Self { diverter, cfg }
    }

    pub fn angle_for(&self, pos: ActuatorPosition) -> u8 {
        match pos {
            ActuatorPosition::WetPosition => self.cfg.wet_position_deg,
            ActuatorPosition::DryPosition => self.cfg.dry_position_deg,
            ActuatorPosition::Neutral => self.cfg.neutral_position_deg,
        }
    }

    /// Move to the category position, hold for the configured dwell, then
    /// return to neutral.
    pub fn divert(&mut self, clock: &dyn Clock, category: Category) -> Result<()> {
        self.command(self.angle_for(category.into()))
            .wrap_err("diverter move")?;
        clock.sleep(Duration::from_millis(self.cfg.dwell_ms));
        self.command(self.angle_for(ActuatorPosition::Neutral))
            .wrap_err("diverter return")?;
        Ok(())
    }

    /// Command neutral without a dwell (rest position at startup).
    pub fn park(&mut self) -> Result<()> {
        self.command(self.angle_for(ActuatorPosition::Neutral))
            .wrap_err("diverter park")
    }

    fn command(&mut self, angle_deg: u8) -> Result<()> {
        self.diverter
            .move_to(angle_deg)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
    }
}
