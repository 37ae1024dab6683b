//! Overlay state owned by the controller thread.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::call::Responder;
use super::request::Dismissal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Hidden,
    Showing,
    Visible,
    Hiding,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Hidden => "hidden",
            Phase::Showing => "showing",
            Phase::Visible => "visible",
            Phase::Hiding => "hiding",
        };
        f.write_str(name)
    }
}

/// The single overlay instance.
///
/// `pending_call` is only ever set while `visible` is true.
#[derive(Debug, Default)]
pub struct OverlayState {
    pub phase: Phase,
    pub visible: bool,
    animation_ended: Arc<AtomicBool>,
    pub pending_call: Option<Responder<Dismissal>>,
    /// Generation token of the current (or last) show-cycle.
    pub cycle: u64,
}

impl OverlayState {
    pub fn new(animation_ended: Arc<AtomicBool>) -> Self {
        Self {
            animation_ended,
            ..Default::default()
        }
    }

    pub fn animation_ended(&self) -> bool {
        self.animation_ended.load(Ordering::SeqCst)
    }

    pub fn set_animation_ended(&self, ended: bool) {
        self.animation_ended.store(ended, Ordering::SeqCst);
    }

    /// Start a new generation and return its token.
    pub fn begin_cycle(&mut self) -> u64 {
        self.cycle += 1;
        self.phase = Phase::Showing;
        self.cycle
    }

    /// Whether a callback tagged `cycle` still belongs to a live overlay.
    pub fn accepts(&self, cycle: u64) -> bool {
        cycle == self.cycle && matches!(self.phase, Phase::Visible | Phase::Hiding)
    }
}
