//! Integration tests for the top-level control loop.

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use binsort_core::mocks::{ManualClock, RecordingConnectivity};
use binsort_core::runner::{RunParams, run};
use binsort_core::{
    ActuatorCfg, BinCfg, DetectionCfg, Reporter, SiteCfg, Timeouts, TimingCfg, build_sorter,
};
use binsort_traits::{Diverter, MoistureProbe, RangeFinder};

struct SeqRange {
    seq: Vec<f32>,
    idx: usize,
}
impl RangeFinder for SeqRange {
    fn measure(&mut self, _timeout: Duration) -> Result<f32, Box<dyn Error + Send + Sync>> {
        let v = if self.idx < self.seq.len() {
            let x = self.seq[self.idx];
            self.idx += 1;
            x
        } else {
            self.seq.last().copied().unwrap_or(0.0)
        };
        Ok(v)
    }
}

struct ConstProbe(u16);
impl MoistureProbe for ConstProbe {
    fn read_raw(&mut self) -> Result<u16, Box<dyn Error + Send + Sync>> {
        Ok(self.0)
    }
}

#[derive(Default, Clone)]
struct SpyDiverter {
    angles: Arc<Mutex<Vec<u8>>>,
}
impl Diverter for SpyDiverter {
    fn move_to(&mut self, angle_deg: u8) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.angles.lock().unwrap().push(angle_deg);
        Ok(())
    }
}

#[test]
fn bounded_run_announces_sorts_and_publishes() {
    let clock = ManualClock::new();
    let (tx, rx) = crossbeam_channel::bounded(16);
    let spy = SpyDiverter::default();
    let angles = spy.angles.clone();

    // Cycle 1 idle, cycle 2 detects, cycle 3 idle again.
    let mut sorter = build_sorter(
        SeqRange {
            seq: vec![40.0, 12.0, 40.0],
            idx: 0,
        },
        ConstProbe(800),
        spy,
        DetectionCfg::default(),
        BinCfg::default(),
        ActuatorCfg::default(),
        TimingCfg::default(),
        Timeouts::default(),
        SiteCfg::default(),
        tx,
        Some(Box::new(clock.clone())),
    )
    .expect("build sorter");

    let conn = RecordingConnectivity::new();
    let published = conn.published_handle();
    let mut reporter = Reporter::new(conn, "v1/devices/me/telemetry", 5000);

    let shutdown = AtomicBool::new(false);
    let snapshot = run(
        &mut sorter,
        &mut reporter,
        &rx,
        RunParams {
            max_cycles: Some(3),
        },
        &shutdown,
    )
    .expect("run ok");

    assert_eq!(snapshot.wet_count, 1);
    assert_eq!(snapshot.dry_count, 0);

    // Startup park, then the one routed detection.
    assert_eq!(*angles.lock().unwrap(), vec![120, 180, 120]);

    let sent = published.lock().unwrap();
    let payloads: Vec<&str> = sent.iter().map(|(_, p)| p.as_str()).collect();
    // Session announce first, then the combined reading from cycle 2.
    assert_eq!(payloads[..4], [
        r#"{"wet_count":0}"#,
        r#"{"dry_count":0}"#,
        r#"{"wet_status":0}"#,
        r#"{"dry_status":0}"#,
    ]);
    assert_eq!(payloads.len(), 5);
    assert!(payloads[4].contains(r#""status":"Wet Waste""#));
    assert!(payloads[4].contains(r#""wet_count":1"#));

    // 3 cycles x 1000 ms pacing + 250 ms burst + 3000 ms dwell.
    assert_eq!(clock.elapsed_ms(), 6250);
}

#[test]
fn shutdown_flag_stops_the_loop_without_error() {
    let (tx, rx) = crossbeam_channel::bounded(16);
    let mut sorter = build_sorter(
        SeqRange {
            seq: vec![40.0],
            idx: 0,
        },
        ConstProbe(800),
        SpyDiverter::default(),
        DetectionCfg::default(),
        BinCfg::default(),
        ActuatorCfg::default(),
        TimingCfg::default(),
        Timeouts::default(),
        SiteCfg::default(),
        tx,
        Some(Box::new(ManualClock::new())),
    )
    .expect("build sorter");

    let mut reporter = Reporter::new(RecordingConnectivity::new(), "topic", 5000);
    let shutdown = AtomicBool::new(true);
    let snapshot = run(
        &mut sorter,
        &mut reporter,
        &rx,
        RunParams { max_cycles: None },
        &shutdown,
    )
    .expect("run ok");
    assert_eq!(snapshot.wet_count, 0);
    assert!(shutdown.load(Ordering::Relaxed));
}

#[test]
fn reconnect_reannounces_current_counters() {
    let clock = ManualClock::new();
    let (tx, rx) = crossbeam_channel::bounded(16);
    let conn = RecordingConnectivity::new();
    let published = conn.published_handle();

    let mut sorter = build_sorter(
        SeqRange {
            seq: vec![12.0, 40.0],
            idx: 0,
        },
        ConstProbe(800),
        SpyDiverter::default(),
        DetectionCfg::default(),
        BinCfg::default(),
        ActuatorCfg::default(),
        TimingCfg::default(),
        Timeouts::default(),
        SiteCfg::default(),
        tx,
        Some(Box::new(clock.clone())),
    )
    .expect("build sorter");

    let mut reporter = Reporter::new(conn.clone(), "topic", 5000);
    let shutdown = AtomicBool::new(false);

    run(
        &mut sorter,
        &mut reporter,
        &rx,
        RunParams {
            max_cycles: Some(1),
        },
        &shutdown,
    )
    .expect("first window");

    // Session drop: the next window reconnects and re-announces with the
    // counters accumulated so far.
    conn.disconnect();
    run(
        &mut sorter,
        &mut reporter,
        &rx,
        RunParams {
            max_cycles: Some(1),
        },
        &shutdown,
    )
    .expect("second window");

    let sent = published.lock().unwrap();
    let payloads: Vec<&str> = sent.iter().map(|(_, p)| p.as_str()).collect();
    let second_announce = payloads
        .iter()
        .position(|p| *p == r#"{"wet_count":1}"#)
        .expect("re-announce with updated counter");
    assert_eq!(payloads[second_announce + 1], r#"{"dry_count":0}"#);
}
