//! Session loops
//!
//! [`run_live`] drives the pipeline from a capture thread through the ring
//! buffer using the wall clock. [`run_replay`] reads a source synchronously
//! on the calling thread and uses the frames' own timestamps, so a recorded
//! stream always produces the same actions.

use super::pipeline::GesturePipeline;
use crate::capture::{CaptureMessage, CaptureWorker, FrameRingBuffer, LandmarkSource};
use crate::time::Timestamp;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How a session finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The quit signal was raised
    Stopped,
    /// The source reached end of stream
    StreamEnded,
    /// A frame could not be read
    ReadFailed(String),
}

impl SessionEnd {
    pub fn describe(&self) -> String {
        match self {
            SessionEnd::Stopped => "stopped by user".to_string(),
            SessionEnd::StreamEnded => "landmark stream ended".to_string(),
            SessionEnd::ReadFailed(msg) => format!("frame read failed: {}", msg),
        }
    }

    /// Console notice for a failed read, worded for the kind of source.
    pub fn read_failure_notice(&self, live: bool) -> Option<String> {
        match self {
            SessionEnd::ReadFailed(_) if live => Some("Camera read failed.".to_string()),
            SessionEnd::ReadFailed(msg) => Some(format!("Recording could not be read: {}", msg)),
            _ => None,
        }
    }
}

/// Live session parameters.
#[derive(Debug, Clone, Copy)]
pub struct LiveOptions {
    /// Ring buffer capacity (power of two)
    pub ring_buffer_size: usize,
    /// Sleep between polls of an empty buffer
    pub poll_interval: Duration,
}

impl Default for LiveOptions {
    fn default() -> Self {
        Self {
            ring_buffer_size: crate::capture::ring_buffer::DEFAULT_CAPACITY,
            poll_interval: Duration::from_millis(2),
        }
    }
}

/// Run a live session until the stream ends, a read fails, or `stop` is set.
///
/// The source moves to a capture thread; classification and dispatch stay on
/// the calling thread. Only the newest frame is processed on each poll and a
/// frame never older than the last processed one reaches the pipeline.
pub fn run_live(
    source: Box<dyn LandmarkSource>,
    pipeline: &mut GesturePipeline,
    stop: &AtomicBool,
    options: LiveOptions,
) -> crate::Result<SessionEnd> {
    let buffer = FrameRingBuffer::with_capacity(options.ring_buffer_size);
    let ring_stats = buffer.stats();
    let (producer, mut consumer) = buffer.split();

    info!("Live session from {}", source.name());
    let overlay = source.overlay();
    let mut worker = CaptureWorker::spawn(source, producer)?;

    let mut last_sequence: Option<u64> = None;
    let mut out_of_order = 0u64;

    let end = loop {
        if stop.load(Ordering::SeqCst) {
            break SessionEnd::Stopped;
        }

        let message = match consumer.pop_latest() {
            Some(message) => message,
            // The capture thread is gone; take whatever it left behind
            None if consumer.is_abandoned() => match consumer.pop_latest() {
                Some(message) => message,
                None => {
                    error!("Capture thread exited without reporting why");
                    break SessionEnd::ReadFailed("capture thread exited".to_string());
                }
            },
            None => {
                thread::sleep(options.poll_interval);
                continue;
            }
        };

        match message {
            CaptureMessage::Frame(frame) => {
                if last_sequence.map_or(false, |last| frame.sequence <= last) {
                    out_of_order += 1;
                    debug!("Discarding frame {} older than last processed", frame.sequence);
                    continue;
                }
                last_sequence = Some(frame.sequence);
                let outcome = pipeline.process(&frame, Timestamp::now());
                if let (Some(overlay), Some(label)) = (&overlay, outcome.overlay_label()) {
                    if !overlay.show(label) {
                        debug!("Preview closed, label not shown: {}", label);
                    }
                }
            }
            CaptureMessage::Ended => break SessionEnd::StreamEnded,
            CaptureMessage::Failed(msg) => {
                error!("Camera read failed: {}", msg);
                break SessionEnd::ReadFailed(msg);
            }
        }
    };

    worker.stop();
    debug!(
        "Ring buffer: {} parked, {} overwritten, {} superseded, peak occupancy {}",
        ring_stats.frames_parked.load(Ordering::Relaxed),
        ring_stats.frames_dropped.load(Ordering::Relaxed),
        ring_stats.frames_superseded.load(Ordering::Relaxed),
        ring_stats.peak_occupancy.load(Ordering::Relaxed),
    );
    pipeline.record_skipped(ring_stats.frames_skipped() + out_of_order);
    info!("Live session finished: {}", end.describe());
    Ok(end)
}

/// Replay a source synchronously.
///
/// Frames without a timestamp are placed `frame_interval` apart.
pub fn run_replay(
    source: &mut dyn LandmarkSource,
    pipeline: &mut GesturePipeline,
    stop: &AtomicBool,
    frame_interval: Duration,
) -> crate::Result<SessionEnd> {
    info!("Replaying {}", source.name());
    let mut index = 0u64;
    let mut clock = Timestamp::from_nanos(0);

    let end = loop {
        if stop.load(Ordering::SeqCst) {
            break SessionEnd::Stopped;
        }

        match source.next_frame() {
            Ok(Some(frame)) => {
                clock = match frame.timestamp_ms {
                    Some(ms) => Timestamp::from_millis(ms),
                    None if index == 0 => clock,
                    None => clock + frame_interval,
                };
                index += 1;
                pipeline.process(&frame, clock);
            }
            Ok(None) => break SessionEnd::StreamEnded,
            Err(e) => {
                warn!("Replay stopped at frame {}: {}", index, e);
                break SessionEnd::ReadFailed(e.to_string());
            }
        }
    };

    info!("Replay finished after {} frames: {}", index, end.describe());
    Ok(end)
}
