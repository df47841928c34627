//! Config mapping, port assembly, and loop execution.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use binsort_core::error::Result as CoreResult;
use binsort_core::runner::RunParams;
use binsort_core::{BinSnapshot, Reporter, Sorter};
use binsort_traits::{Diverter, MoistureProbe, RangeFinder};
use eyre::WrapErr;

type Ports = (
    Box<dyn RangeFinder>,
    Box<dyn MoistureProbe>,
    Box<dyn Diverter>,
);

#[cfg(feature = "hardware")]
fn make_ports(cfg: &binsort_config::Config) -> CoreResult<Ports> {
    let ranger = binsort_hardware::HardwareRangeFinder::new(cfg.pins.trigger, cfg.pins.echo)
        .wrap_err("open ultrasonic pins")?;
    let probe = binsort_hardware::HardwareMoistureProbe::new(cfg.pins.adc_channel)
        .wrap_err("open soil probe ADC")?;
    let diverter =
        binsort_hardware::HardwareDiverter::new(cfg.pins.servo).wrap_err("open servo PWM")?;
    Ok((Box::new(ranger), Box::new(probe), Box::new(diverter)))
}

#[cfg(not(feature = "hardware"))]
fn make_ports(_cfg: &binsort_config::Config) -> CoreResult<Ports> {
    Ok((
        Box::new(binsort_hardware::SimulatedRangeFinder::new()),
        Box::new(binsort_hardware::SimulatedMoistureProbe::new()),
        Box::new(binsort_hardware::SimulatedDiverter),
    ))
}

fn build_sorter_from_config(
    cfg: &binsort_config::Config,
    outbox: crossbeam_channel::Sender<binsort_core::TelemetryEvent>,
) -> CoreResult<Sorter> {
    let (ranger, probe, diverter) = make_ports(cfg)?;
    Sorter::builder()
        .with_range_finder(ranger)
        .with_moisture_probe(probe)
        .with_diverter(diverter)
        .with_detection((&cfg.detection).into())
        .with_bins((&cfg.bins).into())
        .with_actuator((&cfg.actuator).into())
        .with_timing((&cfg.timing).into())
        .with_timeouts((&cfg.hardware).into())
        .with_site((&cfg.telemetry).into())
        .with_outbox(outbox)
        .try_build()
}

/// Run the control loop until Ctrl-C (or the cycle cap) and return the final
/// fill state.
pub fn run_loop(cfg: &binsort_config::Config, max_cycles: Option<u64>) -> CoreResult<BinSnapshot> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_handler = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_handler.store(true, Ordering::Relaxed);
    })
    .wrap_err("install signal handler")?;

    let (tx, rx) = crossbeam_channel::bounded(32);
    let mut sorter = build_sorter_from_config(cfg, tx)?;
    let mut reporter = Reporter::new(
        binsort_hardware::LoopbackConnectivity::new(),
        cfg.telemetry.topic.clone(),
        cfg.timing.reconnect_backoff_ms,
    );

    tracing::info!(
        bin_name = %cfg.telemetry.bin_name,
        backend = backend_name(),
        "starting sorter"
    );
    sorter.run(&mut reporter, &rx, RunParams { max_cycles }, &shutdown)
}

/// One bounded pass over every port to prove the assembly works.
pub fn self_check(cfg: &binsort_config::Config) -> CoreResult<()> {
    let (tx, rx) = crossbeam_channel::bounded(8);
    let mut sorter = build_sorter_from_config(cfg, tx)?;
    sorter.park()?;
    let status = sorter.cycle()?;
    drop(rx);
    tracing::debug!(?status, "self-check cycle");
    Ok(())
}

pub fn backend_name() -> &'static str {
    if cfg!(feature = "hardware") {
        "hardware"
    } else {
        "simulated"
    }
}
