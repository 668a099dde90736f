//! Frame Ring Buffer
//!
//! SPSC ring buffer between the capture thread and the processing loop.
//!
//! Architecture:
//! - Producer (capture thread): never blocks on frames; when the queue is
//!   full the new frame is parked in a single overflow slot, replacing any
//!   frame already parked there
//! - Consumer (processing loop): takes only the newest available frame and
//!   discards the ones it superseded
//!
//! A parked frame is always newer than every queued frame, so a stalled
//! consumer resumes on the most recent capture. Terminal messages (`Ended`,
//! `Failed`) go through the queue only and are retried by the producer until
//! they fit, so the consumer always learns why the stream stopped.

use super::source::HandFrame;
use parking_lot::Mutex;
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default ring buffer capacity (must be power of 2)
pub const DEFAULT_CAPACITY: usize = 16;

/// Message from the capture thread.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureMessage {
    Frame(HandFrame),
    /// The source ended cleanly
    Ended,
    /// The source failed to read a frame
    Failed(String),
}

impl CaptureMessage {
    /// Whether this message ends the stream.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CaptureMessage::Frame(_))
    }
}

/// Ring buffer statistics for monitoring
#[derive(Debug, Default)]
pub struct RingBufferStats {
    /// Messages accepted by the queue
    pub frames_pushed: AtomicU64,
    /// Frames parked in the overflow slot because the queue was full
    pub frames_parked: AtomicU64,
    /// Parked frames overwritten by a newer capture before being read
    pub frames_dropped: AtomicU64,
    /// Frames discarded by the consumer because a newer one was available
    pub frames_superseded: AtomicU64,
    /// Frames handed to the processing loop
    pub frames_consumed: AtomicU64,
    /// Peak queue occupancy
    pub peak_occupancy: AtomicU64,
}

impl RingBufferStats {
    /// Frames that were captured but never processed.
    pub fn frames_skipped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed) + self.frames_superseded.load(Ordering::Relaxed)
    }
}

/// Newest frame that did not fit in the queue
type OverflowSlot = Arc<Mutex<Option<HandFrame>>>;

/// Frame ring buffer, split once into its two halves.
pub struct FrameRingBuffer {
    producer: Producer<CaptureMessage>,
    consumer: Consumer<CaptureMessage>,
    overflow: OverflowSlot,
    stats: Arc<RingBufferStats>,
    capacity: usize,
}

impl FrameRingBuffer {
    /// Create a new ring buffer with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new ring buffer with specified capacity
    ///
    /// # Panics
    /// Panics if capacity is not a power of 2
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "Ring buffer capacity must be a power of 2"
        );

        let (producer, consumer) = RingBuffer::new(capacity);

        Self {
            producer,
            consumer,
            overflow: Arc::new(Mutex::new(None)),
            stats: Arc::new(RingBufferStats::default()),
            capacity,
        }
    }

    /// Split into the capture-thread and processing-loop halves.
    pub fn split(self) -> (FrameProducer, FrameConsumer) {
        (
            FrameProducer {
                inner: self.producer,
                overflow: Arc::clone(&self.overflow),
                stats: Arc::clone(&self.stats),
                capacity: self.capacity,
            },
            FrameConsumer {
                inner: self.consumer,
                overflow: self.overflow,
                stats: self.stats,
            },
        )
    }

    /// Get statistics
    pub fn stats(&self) -> Arc<RingBufferStats> {
        Arc::clone(&self.stats)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for FrameRingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer half (capture thread)
pub struct FrameProducer {
    inner: Producer<CaptureMessage>,
    overflow: OverflowSlot,
    stats: Arc<RingBufferStats>,
    capacity: usize,
}

impl FrameProducer {
    /// Hand a captured frame to the consumer without blocking.
    ///
    /// Returns true if the frame was queued, false if the queue was full and
    /// the frame was parked in the overflow slot instead.
    pub fn push_frame(&mut self, frame: HandFrame) -> bool {
        if self.inner.is_full() {
            self.stats.frames_parked.fetch_add(1, Ordering::Relaxed);
            if self.overflow.lock().replace(frame).is_some() {
                self.stats.frames_dropped.fetch_add(1, Ordering::Relaxed);
            }
            return false;
        }

        // Only this half adds to the queue, so room seen above is still there
        let queued = self.try_push(CaptureMessage::Frame(frame)).is_ok();
        // Anything still parked is older than the frame just queued
        if queued && self.overflow.lock().take().is_some() {
            self.stats.frames_dropped.fetch_add(1, Ordering::Relaxed);
        }
        queued
    }

    /// Push a message onto the queue, handing it back if the queue is full.
    #[inline]
    pub fn try_push(&mut self, message: CaptureMessage) -> Result<(), CaptureMessage> {
        match self.inner.push(message) {
            Ok(()) => {
                self.stats.frames_pushed.fetch_add(1, Ordering::Relaxed);
                self.update_peak();
                Ok(())
            }
            Err(rtrb::PushError::Full(message)) => Err(message),
        }
    }

    fn update_peak(&self) {
        let occupied = (self.capacity - self.inner.slots()) as u64;
        let mut peak = self.stats.peak_occupancy.load(Ordering::Relaxed);
        while occupied > peak {
            match self.stats.peak_occupancy.compare_exchange_weak(
                peak,
                occupied,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }
    }

    /// Whether the consumer half has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.inner.is_abandoned()
    }
}

/// Consumer half (processing loop)
pub struct FrameConsumer {
    inner: Consumer<CaptureMessage>,
    overflow: OverflowSlot,
    stats: Arc<RingBufferStats>,
}

impl FrameConsumer {
    /// Pop the oldest queued message, ignoring the overflow slot.
    #[inline]
    pub fn pop(&mut self) -> Option<CaptureMessage> {
        let message = self.inner.pop().ok()?;
        if !message.is_terminal() {
            self.stats.frames_consumed.fetch_add(1, Ordering::Relaxed);
        }
        Some(message)
    }

    /// Take the newest captured frame, discarding older ones.
    ///
    /// Queued frames are drained up to (not including) a terminal message,
    /// then the overflow slot is checked for a newer frame. A terminal
    /// message is returned only once no frame precedes it, so it is always
    /// the last message seen.
    pub fn pop_latest(&mut self) -> Option<CaptureMessage> {
        let mut latest: Option<HandFrame> = None;

        while let Ok(next) = self.inner.peek() {
            if next.is_terminal() {
                break;
            }
            if let Ok(CaptureMessage::Frame(frame)) = self.inner.pop() {
                self.supersede(&mut latest, frame);
            }
        }

        let parked = self.overflow.lock().take();
        if let Some(parked) = parked {
            let newer = latest.as_ref().map_or(true, |f| parked.sequence > f.sequence);
            if newer {
                self.supersede(&mut latest, parked);
            } else {
                self.stats.frames_superseded.fetch_add(1, Ordering::Relaxed);
            }
        }

        match latest {
            Some(frame) => {
                self.stats.frames_consumed.fetch_add(1, Ordering::Relaxed);
                Some(CaptureMessage::Frame(frame))
            }
            None => self.pop(),
        }
    }

    fn supersede(&self, latest: &mut Option<HandFrame>, frame: HandFrame) {
        if latest.replace(frame).is_some() {
            self.stats.frames_superseded.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Whether the producer half has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.inner.is_abandoned()
    }
}
