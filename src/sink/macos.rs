//! macOS media keys
//!
//! Media keys are not ordinary key codes on macOS. They are NSEvents of type
//! `NSEventTypeSystemDefined` with subtype 8 (auxiliary control buttons),
//! converted to a CGEvent and posted at the HID tap.
//!
//! # Permissions
//!
//! Posting events requires Accessibility permissions in System Settings >
//! Privacy & Security > Accessibility.

use super::keycodes::{mac_event_data1, mac_media_key};
use super::InputEventSink;
use crate::dispatch::ActionCommand;
use crate::Result;
use objc::runtime::{Class, Object};
use objc::{msg_send, sel, sel_impl};
use std::ffi::c_void;
use tracing::trace;

const NS_EVENT_TYPE_SYSTEM_DEFINED: usize = 14;
const NX_SUBTYPE_AUX_CONTROL_BUTTONS: i16 = 8;
const CG_HID_EVENT_TAP: u32 = 0;

#[repr(C)]
#[derive(Copy, Clone, Debug)]
struct NSPoint {
    x: f64,
    y: f64,
}

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventPost(tap: u32, event: *mut c_void);
}

/// Posts NX auxiliary media key events.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacMediaKeySink;

impl MacMediaKeySink {
    pub fn new() -> Self {
        Self
    }

    fn tap(&self, command: ActionCommand) -> Result<()> {
        let key = mac_media_key(command)
            .ok_or_else(|| crate::Error::Sink(format!("no media key for {}", command)))?;

        post_aux_key(key, true)?;
        post_aux_key(key, false)?;

        trace!("Posted NX key {} for {}", key, command);
        Ok(())
    }
}

/// Post one half (down or up) of an auxiliary key press.
fn post_aux_key(key: i32, key_down: bool) -> Result<()> {
    let ns_event = Class::get("NSEvent")
        .ok_or_else(|| crate::Error::Sink("NSEvent class unavailable".into()))?;
    let pool_class = Class::get("NSAutoreleasePool")
        .ok_or_else(|| crate::Error::Sink("NSAutoreleasePool class unavailable".into()))?;

    let modifier_flags: usize = if key_down { 0xa00 } else { 0xb00 };
    let data1 = mac_event_data1(key, key_down);

    // Safety: all selectors exist on NSEvent since 10.0; the pool drains the
    // autoreleased event after the CGEvent has been posted.
    unsafe {
        let pool: *mut Object = msg_send![pool_class, new];

        let event: *mut Object = msg_send![ns_event,
            otherEventWithType: NS_EVENT_TYPE_SYSTEM_DEFINED
            location: NSPoint { x: 0.0, y: 0.0 }
            modifierFlags: modifier_flags
            timestamp: 0.0f64
            windowNumber: 0isize
            context: std::ptr::null_mut::<Object>()
            subtype: NX_SUBTYPE_AUX_CONTROL_BUTTONS
            data1: data1
            data2: -1isize
        ];

        if event.is_null() {
            let _: () = msg_send![pool, drain];
            return Err(crate::Error::Sink("failed to create system-defined NSEvent".into()));
        }

        let cg_event: *mut c_void = msg_send![event, CGEvent];
        if cg_event.is_null() {
            let _: () = msg_send![pool, drain];
            return Err(crate::Error::Sink("NSEvent has no CGEvent".into()));
        }

        CGEventPost(CG_HID_EVENT_TAP, cg_event);
        let _: () = msg_send![pool, drain];
    }

    Ok(())
}

impl InputEventSink for MacMediaKeySink {
    fn name(&self) -> &'static str {
        "macos-media-keys"
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
