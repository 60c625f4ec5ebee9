//! User button: run-flag toggle on a rising edge.
//!
//! ## Hardware
//!
//! Momentary switch on a GPIO with edge interrupt.  The ISR only bumps an
//! atomic edge counter; the receive task drains the counter and calls
//! [`ButtonHandler::on_edge`], which re-reads the level and toggles the run
//! flag only when the input is high.  A bounce that has already settled low
//! is ignored.
//!
//! | Level at handling | Effect                                             |
//! |-------------------|----------------------------------------------------|
//! | high              | run flag flipped, `INFO:Button pressed - ...` sent |
//! | low               | nothing                                            |

use core::sync::atomic::{AtomicU32, Ordering};

use embedded_hal::digital::InputPin;
use log::{info, warn};

use crate::app::ports::SerialChannel;
use crate::config::SharedConfig;
use crate::protocol::reply::Reply;

/// Edges latched by the ISR and not yet handled.
static PENDING_EDGES: AtomicU32 = AtomicU32::new(0);

/// ISR handler; register this on the button GPIO edge.
/// Safe to call from interrupt context (lock-free atomic add).
pub fn button_isr_handler() {
    PENDING_EDGES.fetch_add(1, Ordering::Release);
}

/// Drain the edge latch, returning how many edges arrived since the last
/// call.
pub fn take_pending_edges() -> u32 {
    PENDING_EDGES.swap(0, Ordering::Acquire)
}

/// Result of handling one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Started,
    Stopped,
    /// Level was low (or unreadable); run flag untouched.
    Ignored,
}

pub struct ButtonHandler<P> {
    pin: P,
}

impl<P: InputPin> ButtonHandler<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Handle one edge.
    pub fn on_edge<S: SerialChannel + ?Sized>(
        &mut self,
        cfg: &SharedConfig,
        out: &mut S,
    ) -> ButtonAction {
        match self.pin.is_high() {
            Ok(true) => {}
            Ok(false) => return ButtonAction::Ignored,
            Err(_) => {
                warn!("button level read failed");
                return ButtonAction::Ignored;
            }
        }

        let running = cfg.toggle_running();
        let state = if running { "started" } else { "stopped" };
        info!("button: acquisition {state}");
        Reply::Info(format_args!("Button pressed - acquisition {state}")).send(out);

        if running {
            ButtonAction::Started
        } else {
            ButtonAction::Stopped
        }
    }

    /// Handle every edge the ISR latched since the last call.  Returns the
    /// last action, `None` when nothing was pending.
    pub fn poll<S: SerialChannel + ?Sized>(
        &mut self,
        cfg: &SharedConfig,
        out: &mut S,
    ) -> Option<ButtonAction> {
        (0..take_pending_edges()).fold(None, |_, _| Some(self.on_edge(cfg, out)))
    }
}
