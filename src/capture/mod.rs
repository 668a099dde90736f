//! Landmark capture module
//!
//! Frame acquisition and hand detection live in an external detector
//! process; this module speaks its line protocol, replays recorded streams,
//! and moves frames from a capture thread to the processing loop through a
//! bounded ring buffer that always favors the newest frame.

pub mod protocol;
pub mod source;
pub mod detector;
pub mod ring_buffer;
pub mod worker;

pub use detector::{DetectorCommand, DetectorProcess};
pub use protocol::{DetectionMessage, FrameDecoder, HandMessage, OverlayMessage, READY_LINE};
pub use ring_buffer::{CaptureMessage, FrameConsumer, FrameProducer, FrameRingBuffer, RingBufferStats};
pub use source::{DetectedHand, HandFrame, LandmarkSource, OverlayWriter, ReplaySource, SourceCloser};
pub use worker::CaptureWorker;
