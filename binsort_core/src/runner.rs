//! Top-level control loop: connectivity upkeep, telemetry pump, one
//! detection pass, fixed inter-cycle delay.
//!
//! Single-threaded and cooperative. Every suspension point is a blocking
//! delay; no detection or telemetry processing happens during the moisture
//! burst or the diverter dwell. The loop runs until shutdown is requested
//! or the optional cycle cap is reached.

use std::sync::atomic::{AtomicBool, Ordering};

use binsort_traits::{Connectivity, Diverter, MoistureProbe, RangeFinder};
use crossbeam_channel::Receiver;

use crate::bins::BinSnapshot;
use crate::core::SorterCore;
use crate::error::Result;
use crate::status::CycleStatus;
use crate::telemetry::{Reporter, TelemetryEvent};

/// Loop bounds for one `run` invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunParams {
    /// Stop after this many cycles; `None` runs until shutdown.
    pub max_cycles: Option<u64>,
}

/// Drive the sorter until shutdown (or the cycle cap), returning the final
/// fill state. Connectivity loss is recovered by blocking retry inside the
/// reporter and never escalates to an error.
pub fn run<R, P, D, C>(
    sorter: &mut SorterCore<R, P, D>,
    reporter: &mut Reporter<C>,
    outbox: &Receiver<TelemetryEvent>,
    params: RunParams,
    shutdown: &AtomicBool,
) -> Result<BinSnapshot>
where
    R: RangeFinder,
    P: MoistureProbe,
    D: Diverter,
    C: Connectivity,
{
    let clock = sorter.clock();
    let cycle_delay = sorter.cycle_delay();

    sorter.park()?;
    tracing::info!("control loop start");

    let mut cycles: u64 = 0;
    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested; leaving control loop");
            break;
        }
        if let Some(max) = params.max_cycles
            && cycles >= max
        {
            break;
        }

        // Connectivity maintenance: block until the link is up, then give
        // the backend a fresh counter baseline on every new session.
        if reporter.ensure_connected(clock.as_ref(), shutdown) {
            reporter.announce(&sorter.bins());
        }
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        // Flush anything still queued before sampling again.
        reporter.pump(outbox);

        match sorter.cycle()? {
            CycleStatus::Idle => tracing::trace!("cycle idle"),
            CycleStatus::Held(reason) => tracing::debug!(?reason, "cycle held"),
            CycleStatus::Sorted(report) => {
                tracing::debug!(category = report.category.label(), "cycle sorted");
            }
            CycleStatus::Saturated => {}
        }

        // Publish this cycle's events without waiting for the next pass.
        reporter.pump(outbox);

        cycles = cycles.saturating_add(1);
        clock.sleep(cycle_delay);
    }

    Ok(sorter.bins())
}
