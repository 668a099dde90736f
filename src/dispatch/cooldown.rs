//! Cooldown Dispatcher
//!
//! Holds the only mutable state of the gesture core: when an action last
//! fired. A recognized gesture fires its command only if strictly more than
//! the cooldown has passed since then; otherwise it is dropped, not queued.
//!
//! ```text
//!            gesture == None
//!          ┌───────────────┐
//!          ▼               │
//!   ┌─────────────┐  recognized && elapsed > cooldown  ┌─────────────┐
//!   │    Idle     │───────────────────────────────────▶│    Fire     │
//!   │ (last = t0) │◀───────────────────────────────────│ (last = now)│
//!   └─────────────┘                                    └─────────────┘
//! ```

use super::action::ActionCommand;
use crate::gesture::Gesture;
use crate::sink::InputEventSink;
use crate::time::Timestamp;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Minimum spacing between two fired actions.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(1);

/// A command that fired, with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    pub command: ActionCommand,
    pub label: &'static str,
    pub at: Timestamp,
}

/// Gesture-to-action dispatcher with a cooldown gate.
pub struct Dispatcher {
    sink: Box<dyn InputEventSink>,
    cooldown: Duration,
    /// `None` until the first action fires, so the first gesture always passes
    last_action: Option<Timestamp>,
    suppressed: u64,
}

impl Dispatcher {
    /// Create a dispatcher with the default one-second cooldown.
    pub fn new(sink: Box<dyn InputEventSink>) -> Self {
        Self::with_cooldown(sink, DEFAULT_COOLDOWN)
    }

    /// Create a dispatcher with a custom cooldown.
    pub fn with_cooldown(sink: Box<dyn InputEventSink>, cooldown: Duration) -> Self {
        Self {
            sink,
            cooldown,
            last_action: None,
            suppressed: 0,
        }
    }

    /// Decide whether `gesture` fires at time `now`.
    ///
    /// On firing, the command is sent to the sink (except `Like`, which is
    /// reported only), its console line is printed, and the cooldown
    /// restarts. Sink failures are logged and swallowed; the cooldown still
    /// restarts.
    pub fn dispatch(&mut self, gesture: Gesture, now: Timestamp) -> Option<Dispatched> {
        let command = ActionCommand::for_gesture(gesture)?;

        if !self.cooldown_elapsed(now) {
            self.suppressed += 1;
            debug!("{} suppressed by cooldown", gesture);
            return None;
        }

        if command.uses_sink() {
            if let Err(e) = self.sink.send(command) {
                warn!("{} sink failed to deliver {}: {}", self.sink.name(), command, e);
            }
        }

        self.last_action = Some(now);
        println!("{}", command.console_line());
        let label = command.label();
        info!("{} -> {}", gesture, command);

        Some(Dispatched {
            command,
            label,
            at: now,
        })
    }

    /// Whether an action may fire at `now`.
    pub fn cooldown_elapsed(&self, now: Timestamp) -> bool {
        match self.last_action {
            None => true,
            Some(last) => now.duration_since(last) > self.cooldown,
        }
    }

    /// When the last action fired.
    pub fn last_action(&self) -> Option<Timestamp> {
        self.last_action
    }

    /// Configured cooldown.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Recognized gestures dropped because the cooldown was running.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// Name of the injected sink.
    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }
}
