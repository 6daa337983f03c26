//! Capture thread: feeds the decision loop's latest-frame slot.
//!
//! Per-frame failures (depth or color capture, detection) are logged and the
//! loop carries on. The thread only ends early when the hand-off slot itself
//! is unusable; callers should watch `JoinHandle::is_finished` and join to
//! surface that error.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::{DepthSource, SourceStats};
use crate::detect::ObjectDetector;
use crate::frame::LatestFrame;

const HEALTH_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Spawn the capture loop. It runs until `running` goes false.
pub fn spawn_capture(
    mut source: Box<dyn DepthSource>,
    mut detector: Box<dyn ObjectDetector>,
    latest: LatestFrame,
    running: Arc<AtomicBool>,
    tick: Duration,
) -> Result<JoinHandle<Result<SourceStats>>> {
    detector.warm_up()?;
    let handle = thread::Builder::new()
        .name("depth-capture".to_string())
        .spawn(move || {
            let mut last_health_log = Instant::now();
            while running.load(Ordering::SeqCst) {
                match source.next_frame() {
                    Ok(frame) => latest.publish(frame)?,
                    Err(e) => log::warn!("depth capture failed: {}", e),
                }

                match source.color_frame() {
                    Ok(Some(color)) => match detector.detect(&color) {
                        Ok(result) => {
                            if let Some(primary) = result.primary() {
                                log::debug!(
                                    "{}: {} ({:.2})",
                                    detector.name(),
                                    primary.label,
                                    primary.confidence
                                );
                            }
                        }
                        Err(e) => log::warn!("{} detector failed: {}", detector.name(), e),
                    },
                    Ok(None) => {}
                    Err(e) => log::warn!("color capture failed: {}", e),
                }

                if last_health_log.elapsed() >= HEALTH_LOG_INTERVAL {
                    let stats = source.stats();
                    if source.is_healthy() {
                        log::info!(
                            "source health=ok frames={} url={}",
                            stats.frames_captured,
                            stats.url
                        );
                    } else {
                        log::warn!(
                            "source health=degraded frames={} url={}",
                            stats.frames_captured,
                            stats.url
                        );
                    }
                    last_health_log = Instant::now();
                }

                thread::sleep(tick);
            }
            Ok(source.stats())
        })?;
    Ok(handle)
}
