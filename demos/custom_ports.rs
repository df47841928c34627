//! Example: Custom Port Implementations
//!
//! Shows how to implement the binsort hardware ports by hand, for rigs the
//! bundled drivers do not cover.

use std::error::Error;
use std::time::Duration;

use binsort_traits::{Connectivity, Diverter, MoistureProbe, RangeFinder};

/// A range finder that always sees an object at 12 cm.
pub struct FixedRange;

impl RangeFinder for FixedRange {
    fn measure(&mut self, _timeout: Duration) -> Result<f32, Box<dyn Error + Send + Sync>> {
        Ok(12.0)
    }
}

/// A probe that always reads wet material.
pub struct WetProbe;

impl MoistureProbe for WetProbe {
    fn read_raw(&mut self) -> Result<u16, Box<dyn Error + Send + Sync>> {
        Ok(620)
    }
}

/// A diverter that logs its commands.
pub struct PrintDiverter;

impl Diverter for PrintDiverter {
    fn move_to(&mut self, angle_deg: u8) -> Result<(), Box<dyn Error + Send + Sync>> {
        println!("diverter -> {angle_deg} deg");
        Ok(())
    }
}

/// A connectivity provider that drops everything on the floor.
pub struct NullLink;

impl Connectivity for NullLink {
    fn connect(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
    fn is_connected(&self) -> bool {
        true
    }
    fn publish(&mut self, _topic: &str, _payload: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

fn main() -> Result<(), eyre::Report> {
    let (tx, _rx) = crossbeam_channel::bounded(8);
    let mut sorter = binsort_core::Sorter::builder()
        .with_range_finder(FixedRange)
        .with_moisture_probe(WetProbe)
        .with_diverter(PrintDiverter)
        .with_outbox(tx)
        .build()?;

    let status = sorter.cycle()?;
    println!("cycle -> {status:?}");
    Ok(())
}
