//! Action dispatch
//!
//! Maps recognized gestures to media commands and gates them behind a
//! cooldown so a held pose does not fire repeatedly.

pub mod action;
pub mod cooldown;

pub use action::ActionCommand;
pub use cooldown::{Dispatched, Dispatcher, DEFAULT_COOLDOWN};
