//! Test and helper mocks for binsort_core.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use binsort_traits::{Clock, Connectivity};

/// Deterministic clock for tests: time advances only via `sleep` (which
/// returns immediately) or an explicit `advance`.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = off.saturating_add(d);
        }
    }

    /// Total simulated milliseconds since construction.
    pub fn elapsed_ms(&self) -> u64 {
        self.offset
            .lock()
            .map(|g| g.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let off = self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO);
        self.origin + off
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

/// Connectivity stub that records every published (topic, payload) pair.
///
/// Can be told to fail the first N connect attempts to exercise the
/// reporter's blocking-retry path.
#[derive(Debug, Clone, Default)]
pub struct RecordingConnectivity {
    connected: Arc<Mutex<bool>>,
    remaining_failures: Arc<Mutex<u32>>,
    published: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingConnectivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `n` connect attempts, then succeed.
    pub fn failing_connects(n: u32) -> Self {
        let conn = Self::default();
        if let Ok(mut rem) = conn.remaining_failures.lock() {
            *rem = n;
        }
        conn
    }

    /// Shared handle onto the record of published events.
    pub fn published_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        self.published.clone()
    }

    /// Drop the link, as a broker would on a lost session.
    pub fn disconnect(&self) {
        if let Ok(mut c) = self.connected.lock() {
            *c = false;
        }
    }
}

impl Connectivity for RecordingConnectivity {
    fn connect(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Ok(mut rem) = self.remaining_failures.lock()
            && *rem > 0
        {
            *rem -= 1;
            return Err("connection refused".into());
        }
        if let Ok(mut c) = self.connected.lock() {
            *c = true;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.lock().map(|c| *c).unwrap_or(false)
    }

    fn publish(
        &mut self,
        topic: &str,
        payload: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.is_connected() {
            return Err("not connected".into());
        }
        if let Ok(mut p) = self.published.lock() {
            p.push((topic.to_string(), payload.to_string()));
        }
        Ok(())
    }
}
