//! Polling helpers shared by the GPIO drivers.

use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Poll `level` until it reports the awaited state or `timeout` elapses,
/// pausing `poll` between checks (a zero `poll` spins). Returns
/// `EchoTimeout` on expiry.
pub fn wait_for_level_with_timeout(
    mut level: impl FnMut() -> bool,
    timeout: Duration,
    poll: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    while !level() {
        if Instant::now() >= deadline {
            return Err(HwError::EchoTimeout);
        }
        if poll.is_zero() {
            std::hint::spin_loop();
        } else {
            std::thread::sleep(poll);
        }
    }
    Ok(())
}
