//! Windows media keys via `keybd_event`.

use super::keycodes::windows_virtual_key;
use super::InputEventSink;
use crate::dispatch::ActionCommand;
use crate::Result;
use std::thread;
use std::time::Duration;
use tracing::trace;

const KEYEVENTF_KEYUP: u32 = 0x0002;

/// Pause between key-down and key-up
const KEY_HOLD: Duration = Duration::from_millis(20);

#[link(name = "user32")]
extern "system" {
    fn keybd_event(b_vk: u8, b_scan: u8, dw_flags: u32, dw_extra_info: usize);
}

/// Presses media virtual keys through user32.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsMediaKeySink;

impl WindowsMediaKeySink {
    pub fn new() -> Self {
        Self
    }

    fn tap(&self, command: ActionCommand) -> Result<()> {
        let vk = windows_virtual_key(command)
            .ok_or_else(|| crate::Error::Sink(format!("no virtual key for {}", command)))?;

        // Safety: keybd_event takes plain integers and has no preconditions
        unsafe {
            keybd_event(vk, 0, 0, 0);
        }
        thread::sleep(KEY_HOLD);
        unsafe {
            keybd_event(vk, 0, KEYEVENTF_KEYUP, 0);
        }

        trace!("Sent VK 0x{:02X} for {}", vk, command);
        Ok(())
    }
}

impl InputEventSink for WindowsMediaKeySink {
    fn name(&self) -> &'static str {
        "windows-media-keys"
    }

    fn play_pause(&self) -> Result<()> {
        self.tap(ActionCommand::PlayPause)
    }

    fn next(&self) -> Result<()> {
        self.tap(ActionCommand::Next)
    }

    fn previous(&self) -> Result<()> {
        self.tap(ActionCommand::Previous)
    }

    fn volume_up(&self) -> Result<()> {
        self.tap(ActionCommand::VolumeUp)
    }

    fn volume_down(&self) -> Result<()> {
        self.tap(ActionCommand::VolumeDown)
    }
}
