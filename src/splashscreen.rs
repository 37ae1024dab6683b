//! Host-facing splashscreen handle and its controller thread.
//!
//! `Splashscreen` is what an embedding application talks to. Every call is
//! turned into a command for the single controller thread, which owns the
//! render adapter and all overlay state. Calls that complete later (`show`,
//! `hide`) return a [`CallHandle`].
//!
//! The builder follows the usual startup contexts:
//! - Plugin-style load: `Splashscreen::builder(config).show_on_start().spawn()`
//! - Explicit control: `Splashscreen::builder(config).adapter(adapter).spawn()`
//!   followed by `show()`
//!
//! ```no_run
//! use lottie_splash::{AnimationRequest, Config, Splashscreen};
//!
//! # fn main() -> anyhow::Result<()> {
//! let splash = Splashscreen::builder(Config::load()?).spawn()?;
//! let shown = splash.show(AnimationRequest::new().location("splash/logo.json"));
//! // ... application initialization ...
//! splash.hide().wait()?;
//! let dismissal = shown.wait()?;
//! # let _ = dismissal;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{Context, Result};

use crate::common::constants::ASSET_ROOT_ENV;
use crate::config::Config;
use crate::core::{
    AnimationRequest, CallHandle, Command, ControllerParams, Dismissal, HideTrigger,
    LifecycleController,
};
use crate::events::{EventBus, EventWaiter, LottieEvent, LottieEventKind, SubscriptionId};
use crate::render::RenderAdapter;
use crate::render::headless::HeadlessAdapter;
use crate::signals::SignalHandle;
use crate::theme::{EnvironmentModeSource, PresentationModeSource};

/// Builder for configuring and spawning a [`Splashscreen`].
pub struct SplashscreenBuilder {
    config: Config,
    adapter: Option<Box<dyn RenderAdapter>>,
    mode_source: Option<Box<dyn PresentationModeSource>>,
    asset_root: Option<PathBuf>,
    debug_enabled: bool,
    show_on_start: bool,
}

impl SplashscreenBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            adapter: None,
            mode_source: None,
            asset_root: std::env::var_os(ASSET_ROOT_ENV).map(PathBuf::from),
            debug_enabled: false,
            show_on_start: false,
        }
    }

    /// Render through `adapter` instead of the headless renderer.
    pub fn adapter(mut self, adapter: impl RenderAdapter + 'static) -> Self {
        self.adapter = Some(Box::new(adapter));
        self
    }

    /// Defaults to [`EnvironmentModeSource`].
    pub fn mode_source(mut self, source: impl PresentationModeSource + 'static) -> Self {
        self.mode_source = Some(Box::new(source));
        self
    }

    /// Directory relative local animation paths are resolved against.
    pub fn asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = Some(root.into());
        self
    }

    pub fn debug(mut self, debug_enabled: bool) -> Self {
        self.debug_enabled = debug_enabled;
        self
    }

    /// Show the configured animation as soon as the controller starts, with
    /// nobody waiting on the result.
    pub fn show_on_start(mut self) -> Self {
        self.show_on_start = true;
        self
    }

    /// Start the controller thread.
    pub fn spawn(self) -> Result<Splashscreen> {
        let (commands, receiver) = channel();
        let events = Arc::new(EventBus::new());
        let animation_ended = Arc::new(AtomicBool::new(false));

        let adapter = self
            .adapter
            .unwrap_or_else(|| Box::new(HeadlessAdapter::default().with_debug(self.debug_enabled)));
        let mode_source = self
            .mode_source
            .unwrap_or_else(|| Box::new(EnvironmentModeSource));

        if self.debug_enabled {
            log_debug!("Starting splash controller ({} adapter)", adapter.adapter_name());
        }

        let controller = LifecycleController::new(ControllerParams {
            config: self.config,
            adapter,
            mode_source,
            events: Arc::clone(&events),
            commands: commands.clone(),
            asset_root: self.asset_root,
            animation_ended: Arc::clone(&animation_ended),
            debug_enabled: self.debug_enabled,
        });

        if self.show_on_start {
            commands
                .send(Command::Show {
                    request: AnimationRequest::default(),
                    reply: None,
                })
                .context("Failed to queue initial show")?;
        }

        let worker = thread::Builder::new()
            .name("splash-controller".to_string())
            .spawn(move || run_controller(controller, receiver))
            .context("Failed to spawn splash controller thread")?;

        Ok(Splashscreen {
            commands,
            events,
            animation_ended,
            worker: Some(worker),
            debug_enabled: self.debug_enabled,
        })
    }
}

/// Controller loop: sleep until the next command or deadline, whichever is first.
fn run_controller(mut controller: LifecycleController, receiver: Receiver<Command>) {
    loop {
        controller.poll(Instant::now());

        let command = match controller.next_deadline() {
            Some(deadline) => {
                match receiver.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                    Ok(command) => command,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match receiver.recv() {
                Ok(command) => command,
                Err(_) => break,
            },
        };

        if !controller.handle(command, Instant::now()) {
            return;
        }
    }

    controller.shutdown();
}

/// Handle to a running splash controller.
///
/// Dropping the handle tears down any visible overlay and joins the thread.
pub struct Splashscreen {
    commands: Sender<Command>,
    events: Arc<EventBus>,
    animation_ended: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    debug_enabled: bool,
}

impl Splashscreen {
    pub fn builder(config: Config) -> SplashscreenBuilder {
        SplashscreenBuilder::new(config)
    }

    /// Bridge connectivity check: returns `value` unchanged.
    pub fn echo(&self, value: &str) -> String {
        if self.debug_enabled {
            log_debug!("echo: {}", value);
        }
        value.to_string()
    }

    /// Show the overlay. Settles when the overlay is hidden again, or with an
    /// error if it could not be shown.
    pub fn show(&self, request: AnimationRequest) -> CallHandle<Dismissal> {
        let (reply, handle) = CallHandle::pair();
        // A failed send drops `reply`, which settles the handle as stopped.
        let _ = self.commands.send(Command::Show {
            request,
            reply: Some(reply),
        });
        handle
    }

    /// Hide the overlay. Settles once it is fully gone; immediately if nothing
    /// is showing.
    pub fn hide(&self) -> CallHandle<()> {
        let (reply, handle) = CallHandle::pair();
        let _ = self.commands.send(Command::Hide {
            trigger: HideTrigger::Manual,
            reply: Some(reply),
        });
        handle
    }

    pub fn on<F>(&self, kind: LottieEventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&LottieEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, handler)
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    pub fn remove_all_listeners(&self) {
        self.events.remove_all_listeners();
    }

    pub fn once(&self, kind: LottieEventKind) -> EventWaiter {
        self.events.once(kind)
    }

    /// Whether the current (or last) animation has finished playing.
    pub fn animation_ended(&self) -> bool {
        self.animation_ended.load(Ordering::SeqCst)
    }

    pub fn signals(&self) -> SignalHandle {
        SignalHandle::new(self.commands.clone())
    }

    /// Tear down and stop the controller thread. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.commands.send(Command::Shutdown);
            if worker.join().is_err() {
                log_error!("Splash controller thread panicked");
            }
        }
    }
}

impl Drop for Splashscreen {
    fn drop(&mut self) {
        self.shutdown();
    }
}
