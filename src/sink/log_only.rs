//! Observation-only sink for platforms without media-key injection.

use super::InputEventSink;
use crate::dispatch::ActionCommand;
use crate::Result;
use tracing::debug;

/// Logs each command and reports success without touching the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlySink;

impl LogOnlySink {
    pub fn new() -> Self {
        Self
    }

    fn observe(&self, command: ActionCommand) -> Result<()> {
        debug!("{} not injected (log-only sink)", command);
        Ok(())
    }
}

impl InputEventSink for LogOnlySink {
    fn name(&self) -> &'static str {
        "log-only"
    }

    fn play_pause(&self) -> Result<()> {
        self.observe(ActionCommand::PlayPause)
    }

    fn next(&self) -> Result<()> {
        self.observe(ActionCommand::Next)
    }

    fn previous(&self) -> Result<()> {
        self.observe(ActionCommand::Previous)
    }

    fn volume_up(&self) -> Result<()> {
        self.observe(ActionCommand::VolumeUp)
    }

    fn volume_down(&self) -> Result<()> {
        self.observe(ActionCommand::VolumeDown)
    }
}
