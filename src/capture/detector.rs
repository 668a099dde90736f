//! Hand detector process
//!
//! Camera capture and landmark detection run in a child process (see
//! `scripts/hand_detect.py`). It is started with the camera index and the
//! fixed detector parameters, must print `READY` once the camera is open, and
//! then streams frame lines on stdout. Its stderr passes through to ours, and
//! fired-action labels are written to its stdin for the preview window.
//!
//! The child is killed when the [`DetectorProcess`] is dropped or its
//! [`SourceCloser`] fires, so the camera is released on every exit path.

use super::protocol::{FrameDecoder, READY_LINE};
use super::source::{HandFrame, LandmarkSource, OverlayWriter, SourceCloser};
use parking_lot::Mutex;
use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Hands tracked per frame
pub const MAX_NUM_HANDS: u32 = 1;
/// Minimum confidence for the palm detector
pub const MIN_DETECTION_CONFIDENCE: f32 = 0.6;
/// Minimum confidence for landmark tracking between frames
pub const MIN_TRACKING_CONFIDENCE: f32 = 0.6;

/// How to launch the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorCommand {
    pub program: String,
    pub args: Vec<String>,
    pub camera_index: u32,
    /// How long to wait for the `READY` line
    pub ready_timeout: Duration,
}

impl DetectorCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            camera_index: 0,
            ready_timeout: Duration::from_secs(15),
        }
    }

    /// Full argument list: configured args followed by the detector parameters.
    pub fn full_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        args.extend([
            "--camera".to_string(),
            self.camera_index.to_string(),
            "--max-num-hands".to_string(),
            MAX_NUM_HANDS.to_string(),
            "--min-detection-confidence".to_string(),
            MIN_DETECTION_CONFIDENCE.to_string(),
            "--min-tracking-confidence".to_string(),
            MIN_TRACKING_CONFIDENCE.to_string(),
        ]);
        args
    }
}

/// A running detector.
pub struct DetectorProcess {
    child: Arc<Mutex<Child>>,
    stdout: BufReader<ChildStdout>,
    decoder: FrameDecoder,
    overlay: Option<OverlayWriter>,
    name: String,
}

impl DetectorProcess {
    /// Start the detector and wait for its `READY` handshake.
    ///
    /// Any failure before the handshake (program not found, camera not
    /// opened, timeout) is [`crate::Error::DeviceUnavailable`].
    pub fn spawn(command: &DetectorCommand) -> crate::Result<Self> {
        info!("Starting hand detector: {} {:?}", command.program, command.full_args());

        let mut child = Command::new(&command.program)
            .args(command.full_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                crate::Error::DeviceUnavailable(format!(
                    "failed to start detector '{}': {}",
                    command.program, e
                ))
            })?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                kill_child(&mut child);
                return Err(crate::Error::DeviceUnavailable(
                    "detector stdout not captured".into(),
                ));
            }
        };

        let stdout = match wait_for_ready(BufReader::new(stdout), command.ready_timeout) {
            Ok(stdout) => stdout,
            Err(e) => {
                kill_child(&mut child);
                return Err(e);
            }
        };

        info!("Hand detector ready (pid {})", child.id());

        let overlay = match child.stdin.take().map(OverlayWriter::spawn) {
            Some(Ok(overlay)) => Some(overlay),
            Some(Err(e)) => {
                warn!("Overlay labels disabled: {}", e);
                None
            }
            None => None,
        };

        Ok(Self {
            child: Arc::new(Mutex::new(child)),
            stdout,
            decoder: FrameDecoder::new(),
            overlay,
            name: format!("detector:{}", command.program),
        })
    }

    /// Process id of the child.
    pub fn id(&self) -> u32 {
        self.child.lock().id()
    }
}

/// Read the handshake line on a helper thread so a detector that never
/// answers cannot hang startup.
fn wait_for_ready(
    mut reader: BufReader<ChildStdout>,
    timeout: Duration,
) -> crate::Result<BufReader<ChildStdout>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("detector-handshake".into())
        .spawn(move || {
            let mut line = String::new();
            let result = reader.read_line(&mut line).map(|_| line);
            let _ = tx.send((reader, result));
        })?;

    match rx.recv_timeout(timeout) {
        Ok((reader, Ok(line))) if line.trim() == READY_LINE => Ok(reader),
        Ok((_, Ok(line))) if line.is_empty() => Err(crate::Error::DeviceUnavailable(
            "detector exited before signalling ready".into(),
        )),
        Ok((_, Ok(line))) => Err(crate::Error::DeviceUnavailable(format!(
            "detector did not signal ready, got: {}",
            line.trim()
        ))),
        Ok((_, Err(e))) => Err(crate::Error::DeviceUnavailable(format!(
            "failed to read detector handshake: {}",
            e
        ))),
        Err(_) => Err(crate::Error::DeviceUnavailable(format!(
            "detector not ready after {:?}",
            timeout
        ))),
    }
}

fn kill_child(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(status)) => debug!("Detector already exited: {}", status),
        _ => {
            if let Err(e) = child.kill() {
                warn!("Failed to kill detector: {}", e);
            }
            let _ = child.wait();
        }
    }
}

impl LandmarkSource for DetectorProcess {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_frame(&mut self) -> crate::Result<Option<HandFrame>> {
        self.decoder.read_next(&mut self.stdout)
    }

    fn closer(&self) -> Option<SourceCloser> {
        let child = Arc::clone(&self.child);
        Some(SourceCloser::new(move || {
            // Killing closes stdout, which unblocks a pending read with EOF
            let _ = child.lock().kill();
        }))
    }

    fn overlay(&self) -> Option<OverlayWriter> {
        self.overlay.clone()
    }
}

impl Drop for DetectorProcess {
    fn drop(&mut self) {
        kill_child(&mut self.child.lock());
        debug!("Detector released after {} frames", self.decoder.frames_decoded());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_args_append_detector_parameters() {
        let mut command = DetectorCommand::new("python3");
        command.args = vec!["scripts/hand_detect.py".into()];
        command.camera_index = 2;

        assert_eq!(
            command.full_args(),
            vec![
                "scripts/hand_detect.py",
                "--camera",
                "2",
                "--max-num-hands",
                "1",
                "--min-detection-confidence",
                "0.6",
                "--min-tracking-confidence",
                "0.6",
            ]
        );
    }

    #[test]
    fn test_missing_program_is_device_unavailable() {
        let command = DetectorCommand::new("/nonexistent/hand-detector-binary");
        let result = DetectorProcess::spawn(&command);
        assert!(matches!(result, Err(crate::Error::DeviceUnavailable(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_handshake_and_frames_from_shell_detector() {
        let mut command = DetectorCommand::new("sh");
        command.args = vec![
            "-c".into(),
            r#"echo READY; echo '{"frame":1,"hands":[]}'; echo '{"frame":2,"hands":[]}'"#.into(),
            "detector".into(),
        ];

        let mut detector = DetectorProcess::spawn(&command).unwrap();
        assert_eq!(detector.next_frame().unwrap().unwrap().sequence, 1);
        assert_eq!(detector.next_frame().unwrap().unwrap().sequence, 2);
        assert!(detector.next_frame().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_overlay_label_reaches_detector_stdin() {
        let mut command = DetectorCommand::new("sh");
        command.args = vec![
            "-c".into(),
            r#"echo READY; read line; case "$line" in *'Next (index RIGHT)'*) echo '{"frame":7}';; esac"#.into(),
            "detector".into(),
        ];

        let mut detector = DetectorProcess::spawn(&command).unwrap();
        let overlay = detector.overlay().unwrap();
        assert!(overlay.show("Next (index RIGHT)"));

        assert_eq!(detector.next_frame().unwrap().unwrap().sequence, 7);
        assert!(detector.next_frame().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_wrong_handshake_is_device_unavailable() {
        let mut command = DetectorCommand::new("sh");
        command.args = vec!["-c".into(), "echo 'camera 0 not found'".into(), "detector".into()];
        let err = DetectorProcess::spawn(&command).err().unwrap();
        assert!(matches!(err, crate::Error::DeviceUnavailable(ref m) if m.contains("camera 0 not found")));
    }

    #[cfg(unix)]
    #[test]
    fn test_handshake_timeout() {
        let mut command = DetectorCommand::new("sh");
        command.args = vec!["-c".into(), "sleep 5".into(), "detector".into()];
        command.ready_timeout = Duration::from_millis(100);
        let err = DetectorProcess::spawn(&command).err().unwrap();
        assert!(err.to_string().contains("not ready"));
    }

    #[cfg(unix)]
    #[test]
    fn test_closer_unblocks_pending_read() {
        let mut command = DetectorCommand::new("sh");
        command.args = vec!["-c".into(), "echo READY; exec sleep 30".into(), "detector".into()];
        let mut detector = DetectorProcess::spawn(&command).unwrap();
        let closer = detector.closer().unwrap();

        let handle = thread::spawn(move || detector.next_frame());
        thread::sleep(Duration::from_millis(50));
        closer.close();

        let result = handle.join().unwrap();
        assert!(matches!(result, Ok(None)));
    }
}
