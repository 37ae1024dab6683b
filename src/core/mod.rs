//! Splash overlay lifecycle controller.
//!
//! The controller is a synchronous state machine owned by a single thread.
//! Every entry point (API calls, device signals, adapter callbacks) arrives as
//! a [`Command`]; time-based work (the hide timer and fade frames) is exposed
//! as an explicit deadline through [`LifecycleController::next_deadline`] and
//! performed by [`LifecycleController::poll`]. The runtime in
//! `crate::splashscreen` drives it with `recv_timeout`; tests drive it directly
//! with synthetic instants.
//!
//! ```text
//!            show                 attached + playing
//!   Hidden ───────▶ Showing ─────────────────────────▶ Visible
//!     ▲               │ failure                          │ hide / tap / timeout /
//!     │◀──────────────┘                                  │ animation end / page ready
//!     │                                                  ▼
//!     └──────────────── teardown ◀────── fade done ──── Hiding
//! ```
//!
//! Each show-cycle gets a fresh generation token. Adapter callbacks carry the
//! token they were issued with and are dropped once their cycle is over.

pub mod call;
pub mod fade;
pub mod request;
pub mod state;
pub mod timer;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Sender;
use std::time::Instant;

use crate::config::{Config, ConfigResolver, Layout, SplashscreenConfig};
use crate::error::SplashError;
use crate::events::{EventBus, LottieEvent, LottieEventKind};
use crate::geometry::{Frame, SizeOverride, compute_frame};
use crate::render::{
    AnimationHandle, OverlayView, PlaybackNotifier, PlaybackOptions, RenderAdapter,
};
use crate::source;
use crate::theme::PresentationModeSource;

pub use call::{CallHandle, Responder};
pub use fade::FadeOut;
pub use request::{AnimationRequest, Dismissal, HideTrigger};
pub use state::{OverlayState, Phase};
pub use timer::CancellableTimer;

/// Adapter-reported playback progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Finished { normally: bool },
    Repeated,
    LoadFailed { reason: String },
}

/// Work item for the controller thread.
#[derive(Debug)]
pub enum Command {
    Show {
        request: AnimationRequest,
        reply: Option<Responder<Dismissal>>,
    },
    Hide {
        trigger: HideTrigger,
        reply: Option<Responder<()>>,
    },
    Tap,
    PageReady,
    OrientationChanged,
    Playback {
        cycle: u64,
        event: PlaybackEvent,
    },
    Shutdown,
}

/// Parameters for creating a controller.
pub struct ControllerParams {
    pub config: Config,
    pub adapter: Box<dyn RenderAdapter>,
    pub mode_source: Box<dyn PresentationModeSource>,
    pub events: Arc<EventBus>,
    /// Sender feeding this controller's own command queue, cloned into
    /// playback notifiers.
    pub commands: Sender<Command>,
    pub asset_root: Option<PathBuf>,
    pub animation_ended: Arc<AtomicBool>,
    pub debug_enabled: bool,
}

/// Per-cycle data kept while an overlay exists.
struct ActiveOverlay {
    settings: SplashscreenConfig,
    size: SizeOverride,
    frame: Frame,
}

pub struct LifecycleController {
    config: Config,
    adapter: Box<dyn RenderAdapter>,
    mode_source: Box<dyn PresentationModeSource>,
    events: Arc<EventBus>,
    commands: Sender<Command>,
    asset_root: Option<PathBuf>,
    debug_enabled: bool,

    state: OverlayState,
    active: Option<ActiveOverlay>,
    hide_timer: CancellableTimer,
    fade: Option<FadeOut>,
    hiding_trigger: Option<HideTrigger>,
    hide_waiters: Vec<Responder<()>>,
}

impl LifecycleController {
    pub fn new(params: ControllerParams) -> Self {
        Self {
            config: params.config,
            adapter: params.adapter,
            mode_source: params.mode_source,
            events: params.events,
            commands: params.commands,
            asset_root: params.asset_root,
            debug_enabled: params.debug_enabled,
            state: OverlayState::new(params.animation_ended),
            active: None,
            hide_timer: CancellableTimer::default(),
            fade: None,
            hiding_trigger: None,
            hide_waiters: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn cycle(&self) -> u64 {
        self.state.cycle
    }

    pub fn animation_ended(&self) -> bool {
        self.state.animation_ended()
    }

    /// Process one command. Returns `false` once the controller has shut down.
    pub fn handle(&mut self, command: Command, now: Instant) -> bool {
        match command {
            Command::Show { request, reply } => self.show(request, reply, now),
            Command::Hide { trigger, reply } => self.hide(trigger, reply, now),
            Command::Tap => {
                if self.auto_hide_enabled(|settings| settings.cancel_on_tap) {
                    self.hide(HideTrigger::Tap, None, now);
                }
            }
            Command::PageReady => {
                if self.auto_hide_enabled(|settings| settings.auto_hide_on_page_load) {
                    self.hide(HideTrigger::PageLoaded, None, now);
                }
            }
            Command::OrientationChanged => self.reposition(),
            Command::Playback { cycle, event } => self.on_playback(cycle, event, now),
            Command::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        true
    }

    /// Run timer and fade work that is due at `now`.
    pub fn poll(&mut self, now: Instant) {
        if let Some(cycle) = self.hide_timer.fire_if_due(now)
            && cycle == self.state.cycle
            && self.state.phase == Phase::Visible
        {
            self.hide(HideTrigger::Timeout, None, now);
        }

        if let Some(fade) = self.fade.as_mut()
            && fade.is_due(now)
        {
            let opacity = fade.step(now);
            let finished = fade.is_finished();
            self.adapter.set_opacity(opacity);
            if finished {
                let trigger = self.hiding_trigger.unwrap_or(HideTrigger::Manual);
                self.teardown(trigger);
            }
        }
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let fade = self.fade.as_ref().map(FadeOut::next_frame);
        match (self.hide_timer.deadline(), fade) {
            (Some(timer), Some(frame)) => Some(timer.min(frame)),
            (timer, frame) => timer.or(frame),
        }
    }

    /// Tear down any overlay and settle every outstanding call.
    pub fn shutdown(&mut self) {
        if self.state.phase != Phase::Hidden {
            self.teardown(HideTrigger::Shutdown);
        }
        for waiter in self.hide_waiters.drain(..) {
            waiter.resolve(());
        }
    }

    fn show(&mut self, request: AnimationRequest, reply: Option<Responder<Dismissal>>, now: Instant) {
        if self.state.phase != Phase::Hidden {
            match reply {
                Some(reply) => {
                    log_warning!(
                        "Splash overlay already {} (cycle {}), rejecting show()",
                        self.state.phase,
                        self.state.cycle
                    );
                    reply.reject(SplashError::AnimationAlreadyPlaying);
                }
                None => {
                    if self.debug_enabled {
                        log_debug!("Ignoring show without caller while {}", self.state.phase);
                    }
                }
            }
            return;
        }

        let cycle = self.state.begin_cycle();
        log_block_start!("Showing splash overlay (cycle {})", cycle);

        let (active, handle) = match self.prepare(cycle, &request) {
            Ok(prepared) => prepared,
            Err(error) => {
                self.abort(cycle, error, reply, false);
                return;
            }
        };

        self.state.visible = true;
        self.state.set_animation_ended(false);
        self.state.pending_call = reply;

        self.events
            .emit(LottieEvent::new(LottieEventKind::AnimationStart, cycle));

        let options = PlaybackOptions {
            loop_animation: active.settings.loop_animation,
        };
        let notifier = self.notifier(cycle);
        if let Err(error) = self.adapter.play(&handle, &options, notifier) {
            self.events
                .emit(LottieEvent::new(LottieEventKind::AnimationCancel, cycle));
            let pending = self.state.pending_call.take();
            self.abort(cycle, SplashError::Render(format!("{error:#}")), pending, true);
            return;
        }

        let hide_timeout = active.settings.hide_timeout;
        self.active = Some(active);
        self.state.phase = Phase::Visible;

        if !hide_timeout.is_zero() {
            self.hide_timer.arm(now, hide_timeout, cycle);
            log_indented!("Auto-hide in {}ms", hide_timeout.as_millis());
        }
    }

    /// Resolve configuration, source and geometry, then load and attach.
    fn prepare(
        &mut self,
        cycle: u64,
        request: &AnimationRequest,
    ) -> Result<(ActiveOverlay, AnimationHandle), SplashError> {
        let mode = self.mode_source.current_mode();
        let settings = ConfigResolver::new(&self.config).resolve(mode, request)?;

        let resolved = source::resolve(
            &settings.animation_location,
            request.remote,
            &settings,
            self.asset_root.as_deref(),
        )?;
        log_indented!("Animation: {} ({} mode)", resolved, mode);

        let size = request.size_override();
        let frame = compute_frame(
            &settings.layout,
            size,
            self.adapter.screen_bounds(),
            self.adapter.orientation(),
        )?;
        log_indented!("Frame: {}", frame);

        let notifier = self.notifier(cycle);
        let handle = self
            .adapter
            .load_animation(&resolved, notifier)
            .map_err(|error| SplashError::InvalidUrl(format!("{error:#}")))?;

        let view = OverlayView {
            frame,
            background: settings.background_color,
            scale_type: settings.scale_type,
            full_screen: settings.layout == Layout::FullScreen,
            hardware_acceleration: settings.hardware_acceleration,
            merge_paths: settings.merge_paths,
            images_folder: resolved.images_folder.clone(),
        };
        self.adapter
            .attach(&view)
            .map_err(|error| SplashError::Render(format!("{error:#}")))?;

        Ok((
            ActiveOverlay {
                settings,
                size,
                frame,
            },
            handle,
        ))
    }

    /// Return to `Hidden` after a failed construction.
    fn abort(
        &mut self,
        cycle: u64,
        error: SplashError,
        reply: Option<Responder<Dismissal>>,
        attached: bool,
    ) {
        if attached {
            self.adapter.detach();
        }
        self.state.phase = Phase::Hidden;
        self.state.visible = false;
        self.active = None;

        match reply {
            Some(reply) => {
                log_error!("Splash overlay failed (cycle {}): {}", cycle, error);
                reply.reject(error);
            }
            None => log_error!("Splash overlay failed (cycle {}): {}", cycle, error),
        }
    }

    fn hide(&mut self, trigger: HideTrigger, reply: Option<Responder<()>>, now: Instant) {
        match self.state.phase {
            Phase::Hidden | Phase::Showing => {
                if self.debug_enabled {
                    log_debug!("hide() ({}) with no overlay visible", trigger);
                }
                if let Some(reply) = reply {
                    reply.resolve(());
                }
            }
            Phase::Hiding => {
                if self.debug_enabled {
                    log_debug!("hide() ({}) joins the running teardown", trigger);
                }
                self.hide_waiters.extend(reply);
            }
            Phase::Visible => {
                self.hide_timer.cancel();
                self.hide_waiters.extend(reply);
                self.hiding_trigger = Some(trigger);

                let fade_duration = self
                    .active
                    .as_ref()
                    .map(|active| active.settings.fade_out_duration)
                    .unwrap_or_default();

                if fade_duration.is_zero() {
                    self.teardown(trigger);
                } else {
                    log_decorated!(
                        "Fading out splash overlay ({}, {}ms)",
                        trigger,
                        fade_duration.as_millis()
                    );
                    self.state.phase = Phase::Hiding;
                    self.fade = Some(FadeOut::start(now, fade_duration));
                    self.poll(now);
                }
            }
        }
    }

    fn teardown(&mut self, trigger: HideTrigger) {
        let cycle = self.state.cycle;

        self.hide_timer.cancel();
        self.fade = None;
        self.hiding_trigger = None;
        self.active = None;
        self.state.phase = Phase::Hidden;

        self.adapter.detach();
        self.state.visible = false;

        log_decorated!("Splash overlay hidden ({}, cycle {})", trigger, cycle);

        if let Some(pending) = self.state.pending_call.take() {
            pending.resolve(Dismissal { trigger, cycle });
        }
        for waiter in self.hide_waiters.drain(..) {
            waiter.resolve(());
        }
    }

    fn on_playback(&mut self, cycle: u64, event: PlaybackEvent, now: Instant) {
        if !self.state.accepts(cycle) {
            if self.debug_enabled {
                log_debug!("Dropping stale playback callback {:?} (cycle {})", event, cycle);
            }
            return;
        }

        match event {
            PlaybackEvent::Finished { normally } => {
                self.state.set_animation_ended(true);
                let kind = if normally {
                    LottieEventKind::AnimationEnd
                } else {
                    LottieEventKind::AnimationCancel
                };
                let delivered = self.events.emit(LottieEvent::new(kind, cycle));
                if self.debug_enabled {
                    log_debug!("{} delivered to {} subscribers", kind, delivered);
                }

                if self.auto_hide_enabled(|settings| settings.hide_after_animation_end) {
                    self.hide(HideTrigger::AnimationEnd, None, now);
                }
            }
            PlaybackEvent::Repeated => {
                self.events
                    .emit(LottieEvent::new(LottieEventKind::AnimationRepeat, cycle));
            }
            PlaybackEvent::LoadFailed { reason } => {
                self.fail_cycle(SplashError::InvalidUrl(reason));
            }
        }
    }

    /// Asynchronous failure of a live overlay.
    fn fail_cycle(&mut self, error: SplashError) {
        let cycle = self.state.cycle;
        self.hide_timer.cancel();
        self.fade = None;
        self.hiding_trigger = None;

        let pending = self.state.pending_call.take();
        self.abort(cycle, error, pending, true);

        for waiter in self.hide_waiters.drain(..) {
            waiter.resolve(());
        }
    }

    fn reposition(&mut self) {
        if !matches!(self.state.phase, Phase::Visible | Phase::Hiding) {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };

        match compute_frame(
            &active.settings.layout,
            active.size,
            self.adapter.screen_bounds(),
            self.adapter.orientation(),
        ) {
            Ok(frame) => {
                if frame != active.frame {
                    active.frame = frame;
                    self.adapter.set_frame(&frame);
                    if self.debug_enabled {
                        log_debug!("Overlay recentered after orientation change: {}", frame);
                    }
                }
            }
            Err(error) => log_warning!("Could not recompute overlay frame: {}", error),
        }
    }

    fn auto_hide_enabled(&self, rule: impl Fn(&SplashscreenConfig) -> bool) -> bool {
        self.state.phase == Phase::Visible
            && self.active.as_ref().is_some_and(|active| rule(&active.settings))
    }

    fn notifier(&self, cycle: u64) -> PlaybackNotifier {
        PlaybackNotifier::new(self.commands.clone(), cycle)
    }
}
