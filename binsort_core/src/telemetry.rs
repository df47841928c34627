//! Telemetry event shapes, JSON wire formatting, and the publishing reporter.
//!
//! Wire contract: one UTF-8 JSON object per publish, all events on a single
//! topic. Scalars serialize as `{"<key>": <integer>}`; combined readings as
//! the fixed-order object produced by `WasteReading`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use binsort_traits::{Clock, Connectivity};
use crossbeam_channel::Receiver;
use serde::Serialize;

use crate::bins::BinSnapshot;
use crate::classifier::{Category, moisture_percent};
use crate::config::SiteCfg;

/// Fixed offset added to the reported moisture percentage at emission time.
/// Calibration artifact of the reference deployment, preserved as-is.
pub const REPORT_PERCENT_OFFSET: f32 = 50.0;

/// Combined reading bundle for one accepted detection.
///
/// Field order matches the wire contract; values are quantized at emission
/// (percentage to 2 decimals, coordinates to 7).
#[derive(Debug, Clone, Serialize)]
pub struct WasteReading {
    pub moisture_percentage: f32,
    pub status: &'static str,
    pub wet_count: u32,
    pub dry_count: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub bin_name: String,
}

impl WasteReading {
    pub fn new(moisture_raw: u16, category: Category, bins: &BinSnapshot, site: &SiteCfg) -> Self {
        Self {
            moisture_percentage: round_f32(
                moisture_percent(moisture_raw) + REPORT_PERCENT_OFFSET,
                2,
            ),
            status: category.label(),
            wet_count: bins.wet_count,
            dry_count: bins.dry_count,
            latitude: round_f64(site.latitude, 7),
            longitude: round_f64(site.longitude, 7),
            bin_name: site.bin_name.clone(),
        }
    }
}

fn round_f32(x: f32, decimals: i32) -> f32 {
    let f = 10f32.powi(decimals);
    (x * f).round() / f
}

fn round_f64(x: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (x * f).round() / f
}

/// One telemetry emission. Produced by the core, queued in the outbox, and
/// consumed by the reporter; the core keeps no copy after emission.
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    /// Single counter/status value, published as `{"<key>": <value>}`.
    Scalar { key: &'static str, value: i64 },
    Reading(WasteReading),
}

impl TelemetryEvent {
    pub fn scalar(key: &'static str, value: i64) -> Self {
        TelemetryEvent::Scalar { key, value }
    }

    /// Serialize to the single-object JSON wire shape.
    pub fn to_payload(&self) -> serde_json::Result<String> {
        match self {
            TelemetryEvent::Scalar { key, value } => {
                Ok(serde_json::json!({ *key: value }).to_string())
            }
            TelemetryEvent::Reading(r) => serde_json::to_string(r),
        }
    }
}

/// Serializes events and pushes them through the connectivity provider.
///
/// Delivery reliability is the provider's concern: a failed publish is
/// logged and the event dropped, never retried here.
pub struct Reporter<C: Connectivity> {
    conn: C,
    topic: String,
    backoff: Duration,
}

impl<C: Connectivity> Reporter<C> {
    pub fn new(conn: C, topic: impl Into<String>, backoff_ms: u64) -> Self {
        Self {
            conn,
            topic: topic.into(),
            backoff: Duration::from_millis(backoff_ms),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    /// Block until the provider reports an open channel, retrying at the
    /// fixed backoff. Returns true when this call established a new session,
    /// so the caller can re-announce counters. A shutdown request aborts the
    /// wait and returns false.
    pub fn ensure_connected(&mut self, clock: &dyn Clock, shutdown: &AtomicBool) -> bool {
        if self.conn.is_connected() {
            return false;
        }
        loop {
            if shutdown.load(Ordering::Relaxed) {
                return false;
            }
            match self.conn.connect() {
                Ok(()) => {
                    tracing::info!("telemetry link up");
                    return true;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        backoff_ms = self.backoff.as_millis() as u64,
                        "connect failed; retrying"
                    );
                    clock.sleep(self.backoff);
                }
            }
        }
    }

    /// Send the current counters and full flags. Called at the start of
    /// every session so the backend sees a fresh baseline.
    pub fn announce(&mut self, bins: &BinSnapshot) {
        self.publish(&TelemetryEvent::scalar(
            Category::Wet.count_key(),
            i64::from(bins.wet_count),
        ));
        self.publish(&TelemetryEvent::scalar(
            Category::Dry.count_key(),
            i64::from(bins.dry_count),
        ));
        self.publish(&TelemetryEvent::scalar(
            Category::Wet.status_key(),
            i64::from(bins.wet_full),
        ));
        self.publish(&TelemetryEvent::scalar(
            Category::Dry.status_key(),
            i64::from(bins.dry_full),
        ));
    }

    /// Drain the outbox and publish everything queued.
    pub fn pump(&mut self, outbox: &Receiver<TelemetryEvent>) {
        while let Ok(ev) = outbox.try_recv() {
            self.publish(&ev);
        }
    }

    pub fn publish(&mut self, event: &TelemetryEvent) {
        let payload = match event.to_payload() {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "telemetry serialization failed");
                return;
            }
        };
        match self.conn.publish(&self.topic, &payload) {
            Ok(()) => tracing::debug!(payload = %payload, "telemetry published"),
            Err(e) => tracing::warn!(error = %e, "telemetry publish failed; dropping event"),
        }
    }
}
