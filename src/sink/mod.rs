//! Input-Event Sinks
//!
//! Turn media commands into OS-level key events. One sink is chosen at
//! startup by platform and injected into the dispatcher; the gesture logic
//! never checks the platform itself.
//!
//! Platforms without media-key injection get [`LogOnlySink`], which reports
//! success so the session degrades to observation only.

pub mod keycodes;
pub mod log_only;
pub mod recording;

#[cfg(target_os = "macos")]
pub mod macos;
#[cfg(target_os = "windows")]
pub mod windows;

pub use log_only::LogOnlySink;
pub use recording::RecordingSink;

use crate::dispatch::ActionCommand;
use crate::Result;

/// Fire-and-forget media controls.
///
/// Each call synchronously issues one media-key press and returns.
pub trait InputEventSink: Send {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn play_pause(&self) -> Result<()>;
    fn next(&self) -> Result<()>;
    fn previous(&self) -> Result<()>;
    fn volume_up(&self) -> Result<()>;
    fn volume_down(&self) -> Result<()>;

    /// Route a command to the matching operation. `Like` has no media key
    /// and is accepted without touching the OS.
    fn send(&self, command: ActionCommand) -> Result<()> {
        match command {
            ActionCommand::PlayPause => self.play_pause(),
            ActionCommand::Next => self.next(),
            ActionCommand::Previous => self.previous(),
            ActionCommand::VolumeUp => self.volume_up(),
            ActionCommand::VolumeDown => self.volume_down(),
            ActionCommand::Like => Ok(()),
        }
    }
}

/// Sink that injects real media keys on this platform, or the log-only
/// sink where injection is unsupported.
pub fn platform_sink() -> Box<dyn InputEventSink> {
    #[cfg(target_os = "windows")]
    {
        Box::new(windows::WindowsMediaKeySink::new())
    }
    #[cfg(target_os = "macos")]
    {
        Box::new(macos::MacMediaKeySink::new())
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        Box::new(LogOnlySink::new())
    }
}
