//! Landmark sources
//!
//! A [`LandmarkSource`] yields one [`HandFrame`] per processed camera frame.
//! The live source is the detector process; [`ReplaySource`] reads a
//! recorded stream from a file or any reader.

use super::protocol::{FrameDecoder, OverlayMessage};
use crate::hand::{Handedness, LandmarkSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use tracing::debug;

/// The hand detected in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedHand {
    pub landmarks: LandmarkSet,
    pub handedness: Option<Handedness>,
    /// Detection confidence in [0, 1]
    pub score: Option<f32>,
}

/// One processed camera frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    /// Monotonic frame counter
    pub sequence: u64,
    /// Capture time on the detector's clock, if reported
    pub timestamp_ms: Option<u64>,
    pub width: u32,
    pub height: u32,
    /// First detected hand, or `None` when no hand is visible
    pub hand: Option<DetectedHand>,
}

impl HandFrame {
    /// Frame with no hand in view.
    pub fn empty(sequence: u64) -> Self {
        Self {
            sequence,
            timestamp_ms: None,
            width: 0,
            height: 0,
            hand: None,
        }
    }

    /// Frame carrying a single hand.
    pub fn with_hand(sequence: u64, landmarks: LandmarkSet) -> Self {
        Self {
            hand: Some(DetectedHand {
                landmarks,
                handedness: None,
                score: None,
            }),
            ..Self::empty(sequence)
        }
    }

    /// Set the capture timestamp.
    pub fn at_millis(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    /// Landmarks of the detected hand, if any.
    pub fn landmarks(&self) -> Option<&LandmarkSet> {
        self.hand.as_ref().map(|hand| &hand.landmarks)
    }
}

/// Interrupts a source that is blocked waiting for its next frame.
///
/// Cloned out of a source before the source moves to the capture thread.
#[derive(Clone)]
pub struct SourceCloser(Arc<dyn Fn() + Send + Sync>);

impl SourceCloser {
    pub fn new(close: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(close))
    }

    pub fn close(&self) {
        (self.0)()
    }
}

impl std::fmt::Debug for SourceCloser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SourceCloser")
    }
}

/// Sends fired-action labels to a source that renders a preview.
///
/// Lines are written on their own thread; a reader that never drains its
/// input cannot stall the processing loop.
#[derive(Debug, Clone)]
pub struct OverlayWriter {
    tx: mpsc::Sender<String>,
}

impl OverlayWriter {
    /// Start the writer thread; it owns `writer` until every handle is dropped
    /// or a write fails.
    pub fn spawn<W: Write + Send + 'static>(mut writer: W) -> crate::Result<Self> {
        let (tx, rx) = mpsc::channel::<String>();
        thread::Builder::new()
            .name("overlay-writer".into())
            .spawn(move || {
                for line in rx {
                    if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                        debug!("Overlay reader gone: {}", e);
                        break;
                    }
                }
            })?;
        Ok(Self { tx })
    }

    /// Queue `label` for the next preview frame. Returns false once the
    /// writer thread has stopped.
    pub fn show(&self, label: &str) -> bool {
        let message = OverlayMessage {
            overlay: label.to_string(),
        };
        match serde_json::to_string(&message) {
            Ok(line) => self.tx.send(line).is_ok(),
            Err(_) => false,
        }
    }
}

/// Produces landmark frames.
pub trait LandmarkSource: Send {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Next frame.
    ///
    /// `Ok(None)` is a clean end of stream. An error is a frame read failure
    /// and ends the session.
    fn next_frame(&mut self) -> crate::Result<Option<HandFrame>>;

    /// Handle that unblocks a pending [`next_frame`](Self::next_frame) from
    /// another thread. Sources that never block return `None`.
    fn closer(&self) -> Option<SourceCloser> {
        None
    }

    /// Channel for drawing fired-action labels, if the source has a preview.
    fn overlay(&self) -> Option<OverlayWriter> {
        None
    }
}

/// Reads a recorded landmark stream.
pub struct ReplaySource<R> {
    reader: R,
    decoder: FrameDecoder,
    name: String,
}

impl ReplaySource<BufReader<File>> {
    /// Open a recording.
    ///
    /// A missing or unreadable file is reported as
    /// [`crate::Error::DeviceUnavailable`], like a camera that cannot open.
    pub fn open(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            crate::Error::DeviceUnavailable(format!("cannot open {}: {}", path.display(), e))
        })?;
        debug!("Replaying landmarks from {}", path.display());
        Ok(Self::from_reader(BufReader::new(file), path.display().to_string()))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn from_reader(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            decoder: FrameDecoder::new(),
            name: name.into(),
        }
    }

    /// Frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.decoder.frames_decoded()
    }
}

impl<R: BufRead + Send> LandmarkSource for ReplaySource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_frame(&mut self) -> crate::Result<Option<HandFrame>> {
        self.decoder.read_next(&mut self.reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::Landmark;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_replay_from_reader() {
        let input = "{\"frame\":4,\"hands\":[]}\n{\"frame\":5,\"hands\":[]}\n";
        let mut source = ReplaySource::from_reader(Cursor::new(input), "memory");
        assert_eq!(source.name(), "memory");
        assert_eq!(source.next_frame().unwrap().unwrap().sequence, 4);
        assert_eq!(source.next_frame().unwrap().unwrap().sequence, 5);
        assert!(source.next_frame().unwrap().is_none());
        assert_eq!(source.frames_read(), 2);
        assert!(source.closer().is_none());
    }

    #[test]
    fn test_replay_missing_file_is_device_unavailable() {
        let result = ReplaySource::open("/nonexistent/landmarks.jsonl");
        assert!(matches!(result, Err(crate::Error::DeviceUnavailable(_))));
    }

    #[test]
    fn test_frame_builders() {
        let set = LandmarkSet::new([Landmark::new(0.5, 0.5); 21]);
        let frame = HandFrame::with_hand(3, set).at_millis(99);
        assert_eq!(frame.sequence, 3);
        assert_eq!(frame.timestamp_ms, Some(99));
        assert_eq!(frame.landmarks(), Some(&set));
        assert!(HandFrame::empty(0).landmarks().is_none());
    }

    #[test]
    fn test_closer_invokes_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let closer = SourceCloser::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        closer.clone().close();
        closer.close();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_overlay_writer_sends_json_lines() {
        let buf = SharedBuf::default();
        let overlay = OverlayWriter::spawn(buf.clone()).unwrap();
        assert!(overlay.show("Next (index RIGHT)"));
        assert!(overlay.clone().show("Like (thumbs up)"));

        let expected = "{\"overlay\":\"Next (index RIGHT)\"}\n{\"overlay\":\"Like (thumbs up)\"}\n";
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while buf.0.lock().len() < expected.len() && std::time::Instant::now() < deadline {
            thread::sleep(std::time::Duration::from_millis(1));
        }
        assert_eq!(String::from_utf8(buf.0.lock().clone()).unwrap(), expected);
    }

    #[test]
    fn test_sources_have_no_overlay_by_default() {
        let source = ReplaySource::from_reader(Cursor::new(""), "memory");
        assert!(source.overlay().is_none());
    }
}
