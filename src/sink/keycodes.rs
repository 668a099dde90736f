//! Media key codes per platform
//!
//! Kept platform-neutral so the tables can be checked on any host.

use crate::dispatch::ActionCommand;

// Windows virtual-key codes
pub const VK_VOLUME_DOWN: u8 = 0xAE;
pub const VK_VOLUME_UP: u8 = 0xAF;
pub const VK_MEDIA_NEXT_TRACK: u8 = 0xB0;
pub const VK_MEDIA_PREV_TRACK: u8 = 0xB1;
pub const VK_MEDIA_PLAY_PAUSE: u8 = 0xB3;

// macOS NX_KEYTYPE_* auxiliary control button codes (IOKit hidsystem)
pub const NX_KEYTYPE_SOUND_UP: i32 = 0;
pub const NX_KEYTYPE_SOUND_DOWN: i32 = 1;
pub const NX_KEYTYPE_PLAY: i32 = 16;
pub const NX_KEYTYPE_NEXT: i32 = 17;
pub const NX_KEYTYPE_PREVIOUS: i32 = 18;

/// Windows virtual-key code for a command.
pub fn windows_virtual_key(command: ActionCommand) -> Option<u8> {
    match command {
        ActionCommand::PlayPause => Some(VK_MEDIA_PLAY_PAUSE),
        ActionCommand::Next => Some(VK_MEDIA_NEXT_TRACK),
        ActionCommand::Previous => Some(VK_MEDIA_PREV_TRACK),
        ActionCommand::VolumeUp => Some(VK_VOLUME_UP),
        ActionCommand::VolumeDown => Some(VK_VOLUME_DOWN),
        ActionCommand::Like => None,
    }
}

/// macOS auxiliary key type for a command.
pub fn mac_media_key(command: ActionCommand) -> Option<i32> {
    match command {
        ActionCommand::PlayPause => Some(NX_KEYTYPE_PLAY),
        ActionCommand::Next => Some(NX_KEYTYPE_NEXT),
        ActionCommand::Previous => Some(NX_KEYTYPE_PREVIOUS),
        ActionCommand::VolumeUp => Some(NX_KEYTYPE_SOUND_UP),
        ActionCommand::VolumeDown => Some(NX_KEYTYPE_SOUND_DOWN),
        ActionCommand::Like => None,
    }
}

/// `data1` payload of an NX system-defined key event.
pub fn mac_event_data1(key: i32, key_down: bool) -> isize {
    let state = if key_down { 0x0a } else { 0x0b };
    ((key << 16) | (state << 8)) as isize
}
