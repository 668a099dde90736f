//! In-memory sink that records the commands it receives.

use super::InputEventSink;
use crate::dispatch::ActionCommand;
use crate::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records delivered commands. Clones share the same log, so a handle can be
/// kept after the sink is boxed into a dispatcher.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Arc<Mutex<Vec<ActionCommand>>>,
    failing: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every operation fails after recording the attempt.
    pub fn failing() -> Self {
        Self {
            commands: Arc::default(),
            failing: true,
        }
    }

    /// Commands received so far, in order.
    pub fn commands(&self) -> Vec<ActionCommand> {
        self.commands.lock().clone()
    }

    /// Number of commands received.
    pub fn len(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.lock().is_empty()
    }

    fn record(&self, command: ActionCommand) -> Result<()> {
        self.commands.lock().push(command);
        if self.failing {
            Err(crate::Error::Sink(format!("injection of {} failed", command)))
        } else {
            Ok(())
        }
    }
}

impl InputEventSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn play_pause(&self) -> Result<()> {
        self.record(ActionCommand::PlayPause)
    }

    fn next(&self) -> Result<()> {
        self.record(ActionCommand::Next)
    }

    fn previous(&self) -> Result<()> {
        self.record(ActionCommand::Previous)
    }

    fn volume_up(&self) -> Result<()> {
        self.record(ActionCommand::VolumeUp)
    }

    fn volume_down(&self) -> Result<()> {
        self.record(ActionCommand::VolumeDown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_log() {
        let sink = RecordingSink::new();
        let handle = sink.clone();
        sink.next().unwrap();
        sink.volume_up().unwrap();
        assert_eq!(handle.commands(), vec![ActionCommand::Next, ActionCommand::VolumeUp]);
        assert_eq!(handle.len(), 2);
    }

    #[test]
    fn test_failing_sink_records_and_errors() {
        let sink = RecordingSink::failing();
        let err = sink.play_pause().unwrap_err();
        assert!(matches!(err, crate::Error::Sink(_)));
        assert_eq!(sink.commands(), vec![ActionCommand::PlayPause]);
    }
}
