//! Rendering abstraction for the splash overlay.
//!
//! The controller never touches a platform view directly. Everything visual
//! goes through the [`RenderAdapter`] trait: loading a composition, attaching
//! the overlay, starting playback, fading and finally detaching. Playback
//! progress flows back asynchronously through a [`PlaybackNotifier`], which
//! tags every callback with the show-cycle it was created for so the controller
//! can discard callbacks that outlive their overlay.
//!
//! ## Adapters
//!
//! - **Headless** ([`headless::HeadlessAdapter`]): reads the animation's timing
//!   header and simulates playback on a background thread. Used by the
//!   `preview` command and the integration tests.
//!
//! Platform adapters implement the same trait outside this crate.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::Result;

use crate::config::{Rgba, ScaleType};
use crate::core::{Command, PlaybackEvent};
use crate::geometry::{Frame, Orientation, ScreenBounds};
use crate::source::ResolvedSource;

pub mod headless;

/// Loaded composition, opaque to the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationHandle {
    pub name: String,
    /// Length of one playback, when the composition declares it.
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackOptions {
    pub loop_animation: bool,
}

/// Everything the adapter needs to build the overlay view.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub frame: Frame,
    pub background: Rgba,
    pub scale_type: ScaleType,
    pub full_screen: bool,
    pub hardware_acceleration: bool,
    pub merge_paths: bool,
    pub images_folder: Option<PathBuf>,
}

/// Callback handle given to the adapter for one show-cycle.
#[derive(Debug, Clone)]
pub struct PlaybackNotifier {
    tx: Sender<Command>,
    cycle: u64,
}

impl PlaybackNotifier {
    pub fn new(tx: Sender<Command>, cycle: u64) -> Self {
        Self { tx, cycle }
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Playback stopped; `normally` is false when it was cancelled.
    pub fn finished(&self, normally: bool) {
        self.send(PlaybackEvent::Finished { normally });
    }

    pub fn repeated(&self) {
        self.send(PlaybackEvent::Repeated);
    }

    /// Asynchronous load failure discovered after `load_animation` returned.
    pub fn load_failed(&self, reason: impl Into<String>) {
        self.send(PlaybackEvent::LoadFailed {
            reason: reason.into(),
        });
    }

    fn send(&self, event: PlaybackEvent) {
        // A closed channel means the controller is gone; nothing left to notify.
        let _ = self.tx.send(Command::Playback {
            cycle: self.cycle,
            event,
        });
    }
}

/// Platform rendering surface for the splash overlay.
///
/// All methods are called on the controller thread. Implementations must not
/// call back into the controller synchronously; use the notifier instead.
pub trait RenderAdapter: Send {
    /// Fetch and parse the composition.
    ///
    /// An error here rejects the `show()` call with an invalid-animation error.
    fn load_animation(
        &mut self,
        source: &ResolvedSource,
        notifier: PlaybackNotifier,
    ) -> Result<AnimationHandle>;

    /// Put the overlay on screen.
    fn attach(&mut self, view: &OverlayView) -> Result<()>;

    /// Start playback. Completion and repeats are reported through `notifier`.
    fn play(
        &mut self,
        handle: &AnimationHandle,
        options: &PlaybackOptions,
        notifier: PlaybackNotifier,
    ) -> Result<()>;

    fn set_opacity(&mut self, opacity: f32);

    /// Reposition without restarting playback.
    fn set_frame(&mut self, frame: &Frame);

    /// Stop playback and remove the overlay.
    fn detach(&mut self);

    fn screen_bounds(&self) -> ScreenBounds;

    fn orientation(&self) -> Orientation {
        self.screen_bounds().orientation()
    }

    fn adapter_name(&self) -> &'static str;
}
