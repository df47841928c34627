//! Quick Start Example
//!
//! Demonstrates how to assemble and run a simulated sorting session with the
//! binsort library: simulated ports, a loopback telemetry link, and a
//! bounded run of the control loop.

use std::sync::atomic::AtomicBool;

use binsort_core::runner::RunParams;
use binsort_core::{BinCfg, Reporter, Sorter, TimingCfg};
use binsort_hardware::{
    LoopbackConnectivity, SimulatedDiverter, SimulatedMoistureProbe, SimulatedRangeFinder,
};

fn main() -> Result<(), eyre::Report> {
    // Telemetry outbox: the core emits here, the reporter drains it.
    let (tx, rx) = crossbeam_channel::bounded(32);

    // Build a Sorter over simulated ports; the sim range finder drops an
    // object into the detection window every 4th cycle.
    let mut sorter = Sorter::builder()
        .with_range_finder(SimulatedRangeFinder::new())
        .with_moisture_probe(SimulatedMoistureProbe::new())
        .with_diverter(SimulatedDiverter)
        .with_bins(BinCfg {
            max_wet_count: 3,
            max_dry_count: 3,
        })
        .with_timing(TimingCfg {
            cycle_ms: 200,
            debounce_ms: 200,
            reconnect_backoff_ms: 1000,
        })
        .with_outbox(tx)
        .build()?;

    let mut reporter = Reporter::new(
        LoopbackConnectivity::new(),
        "v1/devices/me/telemetry",
        1000,
    );

    // Run 20 cycles; every publish shows up on stdout via the loopback link.
    let shutdown = AtomicBool::new(false);
    let snapshot = sorter.run(
        &mut reporter,
        &rx,
        RunParams {
            max_cycles: Some(20),
        },
        &shutdown,
    )?;

    println!(
        "done: wet={} dry={} wet_full={} dry_full={}",
        snapshot.wet_count, snapshot.dry_count, snapshot.wet_full, snapshot.dry_full
    );
    Ok(())
}
