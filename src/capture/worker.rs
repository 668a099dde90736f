//! Capture thread
//!
//! Pulls frames from a [`LandmarkSource`] and pushes them into the ring
//! buffer until the source ends, fails, or the worker is stopped.

use super::ring_buffer::{CaptureMessage, FrameProducer};
use super::source::{LandmarkSource, SourceCloser};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, trace};

/// Back-off while waiting for room for a terminal message
const TERMINAL_RETRY_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to the running capture thread.
pub struct CaptureWorker {
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    closer: Option<SourceCloser>,
}

impl CaptureWorker {
    /// Move `source` onto a new capture thread feeding `producer`.
    pub fn spawn(source: Box<dyn LandmarkSource>, producer: FrameProducer) -> crate::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let closer = source.closer();
        let thread_running = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("landmark-capture".into())
            .spawn(move || capture_loop(source, producer, thread_running))?;

        Ok(Self {
            handle: Some(handle),
            running,
            closer,
        })
    }

    /// Stop capturing and wait for the thread to exit.
    ///
    /// The source is dropped on the capture thread, releasing the device.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(closer) = &self.closer {
            closer.close();
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Capture thread panicked");
            }
        }
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn capture_loop(
    mut source: Box<dyn LandmarkSource>,
    mut producer: FrameProducer,
    running: Arc<AtomicBool>,
) {
    info!("Capture started from {}", source.name());
    let mut frames = 0u64;

    let terminal = loop {
        if !running.load(Ordering::SeqCst) {
            break None;
        }
        match source.next_frame() {
            Ok(Some(frame)) => {
                frames += 1;
                let sequence = frame.sequence;
                if !producer.push_frame(frame) {
                    trace!("Ring buffer full, parked frame {}", sequence);
                }
            }
            Ok(None) => break Some(CaptureMessage::Ended),
            // A stop request closes the source, which surfaces here as an error
            Err(_) if !running.load(Ordering::SeqCst) => break None,
            Err(e) => break Some(CaptureMessage::Failed(e.to_string())),
        }
    };

    if let Some(message) = terminal {
        deliver_terminal(&mut producer, message, &running);
    }

    running.store(false, Ordering::SeqCst);
    debug!("Capture finished after {} frames from {}", frames, source.name());
}

fn deliver_terminal(producer: &mut FrameProducer, mut message: CaptureMessage, running: &AtomicBool) {
    loop {
        match producer.try_push(message) {
            Ok(()) => return,
            Err(back) => {
                if !running.load(Ordering::SeqCst) || producer.is_abandoned() {
                    return;
                }
                message = back;
                thread::sleep(TERMINAL_RETRY_INTERVAL);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::ring_buffer::FrameRingBuffer;
    use crate::capture::source::{HandFrame, ReplaySource};
    use std::io::Cursor;
    use std::time::Instant;

    fn wait_for_terminal(consumer: &mut crate::capture::FrameConsumer) -> (Vec<u64>, CaptureMessage) {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut sequences = Vec::new();
        while Instant::now() < deadline {
            match consumer.pop() {
                Some(CaptureMessage::Frame(frame)) => sequences.push(frame.sequence),
                Some(terminal) => return (sequences, terminal),
                None => thread::sleep(Duration::from_millis(1)),
            }
        }
        panic!("no terminal message within deadline");
    }

    struct FailingSource {
        frames_before_failure: u64,
        next: u64,
    }

    impl LandmarkSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        fn next_frame(&mut self) -> crate::Result<Option<HandFrame>> {
            if self.next == self.frames_before_failure {
                return Err(crate::Error::FrameRead("camera unplugged".into()));
            }
            self.next += 1;
            Ok(Some(HandFrame::empty(self.next - 1)))
        }
    }

    #[test]
    fn test_worker_forwards_frames_then_end() {
        let input = "{\"frame\":0}\n{\"frame\":1}\n{\"frame\":2}\n";
        let source = ReplaySource::from_reader(Cursor::new(input), "memory");
        let (producer, mut consumer) = FrameRingBuffer::with_capacity(8).split();

        let mut worker = CaptureWorker::spawn(Box::new(source), producer).unwrap();
        let (sequences, terminal) = wait_for_terminal(&mut consumer);
        worker.stop();

        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(terminal, CaptureMessage::Ended);
        assert!(worker.handle.is_none());
    }

    #[test]
    fn test_worker_reports_read_failure() {
        let source = FailingSource {
            frames_before_failure: 2,
            next: 0,
        };
        let (producer, mut consumer) = FrameRingBuffer::with_capacity(4).split();

        let _worker = CaptureWorker::spawn(Box::new(source), producer).unwrap();
        let (sequences, terminal) = wait_for_terminal(&mut consumer);

        assert_eq!(sequences, vec![0, 1]);
        assert!(matches!(terminal, CaptureMessage::Failed(ref m) if m.contains("camera unplugged")));
    }

    #[test]
    fn test_terminal_waits_for_room() {
        let input = "{\"frame\":0}\n{\"frame\":1}\n";
        let source = ReplaySource::from_reader(Cursor::new(input), "memory");
        // Two frames fill the buffer; Ended must wait for the consumer
        let (producer, mut consumer) = FrameRingBuffer::with_capacity(2).split();

        let _worker = CaptureWorker::spawn(Box::new(source), producer).unwrap();
        thread::sleep(Duration::from_millis(20));
        let (sequences, terminal) = wait_for_terminal(&mut consumer);

        assert_eq!(sequences, vec![0, 1]);
        assert_eq!(terminal, CaptureMessage::Ended);
    }
}
