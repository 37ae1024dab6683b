//! Animation lifecycle events and their subscribers.
//!
//! The controller thread is the only emitter, so subscribers observe events in
//! occurrence order. Handlers run on that thread and must not block.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::str::FromStr;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError, channel};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SplashError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LottieEventKind {
    #[serde(rename = "lottieAnimationStart")]
    AnimationStart,
    #[serde(rename = "lottieAnimationEnd")]
    AnimationEnd,
    #[serde(rename = "lottieAnimationCancel")]
    AnimationCancel,
    #[serde(rename = "lottieAnimationRepeat")]
    AnimationRepeat,
}

impl LottieEventKind {
    pub const ALL: [LottieEventKind; 4] = [
        LottieEventKind::AnimationStart,
        LottieEventKind::AnimationEnd,
        LottieEventKind::AnimationCancel,
        LottieEventKind::AnimationRepeat,
    ];

    /// Name used by the plugin bridge.
    pub fn as_str(&self) -> &'static str {
        match self {
            LottieEventKind::AnimationStart => "lottieAnimationStart",
            LottieEventKind::AnimationEnd => "lottieAnimationEnd",
            LottieEventKind::AnimationCancel => "lottieAnimationCancel",
            LottieEventKind::AnimationRepeat => "lottieAnimationRepeat",
        }
    }
}

impl fmt::Display for LottieEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LottieEventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown event '{s}'"))
    }
}

/// A delivered event, tagged with the show-cycle it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LottieEvent {
    #[serde(rename = "event")]
    pub kind: LottieEventKind,
    pub cycle: u64,
}

impl LottieEvent {
    pub fn new(kind: LottieEventKind, cycle: u64) -> Self {
        Self { kind, cycle }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type EventHandler = Arc<dyn Fn(&LottieEvent) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    handlers: Vec<(SubscriptionId, LottieEventKind, EventHandler)>,
    waiters: Vec<PendingWaiter>,
}

struct PendingWaiter {
    kind: LottieEventKind,
    tx: Sender<LottieEvent>,
    alive: Weak<()>,
}

impl PendingWaiter {
    fn is_alive(&self) -> bool {
        self.alive.strong_count() > 0
    }
}

/// Persistent subscriptions plus one-shot waiters.
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Subscribers>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to every future occurrence of `kind`.
    pub fn on<F>(&self, kind: LottieEventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&LottieEvent) + Send + Sync + 'static,
    {
        let mut subscribers = self.lock();
        subscribers.next_id += 1;
        let id = SubscriptionId(subscribers.next_id);
        subscribers.handlers.push((id, kind, Arc::new(handler)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock();
        let before = subscribers.handlers.len();
        subscribers.handlers.retain(|(existing, _, _)| *existing != id);
        subscribers.handlers.len() != before
    }

    /// Drop every persistent subscription. Pending `once` waiters stay armed.
    pub fn remove_all_listeners(&self) {
        self.lock().handlers.clear();
    }

    /// Wait for the next occurrence of `kind` only.
    ///
    /// Registration happens before this returns, so the waiter catches any
    /// event emitted afterwards.
    pub fn once(&self, kind: LottieEventKind) -> EventWaiter {
        let (tx, rx) = channel();
        let token = Arc::new(());
        let mut subscribers = self.lock();
        subscribers.waiters.retain(PendingWaiter::is_alive);
        subscribers.waiters.push(PendingWaiter {
            kind,
            tx,
            alive: Arc::downgrade(&token),
        });
        EventWaiter { rx, _token: token }
    }

    /// Deliver `event` to handlers, then to waiters. Returns the number of
    /// recipients.
    pub fn emit(&self, event: LottieEvent) -> usize {
        let (handlers, waiters) = {
            let mut subscribers = self.lock();
            let handlers: Vec<EventHandler> = subscribers
                .handlers
                .iter()
                .filter(|(_, kind, _)| *kind == event.kind)
                .map(|(_, _, handler)| Arc::clone(handler))
                .collect();

            let (matching, remaining): (Vec<_>, Vec<_>) = subscribers
                .waiters
                .drain(..)
                .filter(PendingWaiter::is_alive)
                .partition(|waiter| waiter.kind == event.kind);
            subscribers.waiters = remaining;

            (handlers, matching)
        };

        // Handlers run unlocked so they may subscribe or unsubscribe.
        let mut called = 0;
        for handler in &handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(()) => called += 1,
                Err(_) => log_error!("Subscriber for {} panicked, skipping it", event.kind),
            }
        }

        let delivered = waiters
            .into_iter()
            .filter(|waiter| waiter.tx.send(event).is_ok())
            .count();

        called + delivered
    }

    pub fn listener_count(&self, kind: LottieEventKind) -> usize {
        // `once` waiters are not counted.
        self.lock()
            .handlers
            .iter()
            .filter(|(_, existing, _)| *existing == kind)
            .count()
    }
}

/// Pending result of [`EventBus::once`].
#[derive(Debug)]
pub struct EventWaiter {
    rx: Receiver<LottieEvent>,
    // Dropping the waiter lets the bus prune its entry.
    _token: Arc<()>,
}

impl EventWaiter {
    /// Block until the event fires. Fails with `Stopped` if the bus goes away.
    pub fn wait(self) -> Result<LottieEvent, SplashError> {
        self.rx.recv().map_err(|_| SplashError::Stopped)
    }

    /// `Ok(None)` on timeout; the waiter stays usable.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Option<LottieEvent>, SplashError> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(SplashError::Stopped),
        }
    }

    pub fn try_event(&self) -> Result<Option<LottieEvent>, SplashError> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SplashError::Stopped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::logger::Log;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_event_serialization() {
        let event = LottieEvent::new(LottieEventKind::AnimationRepeat, 3);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"lottieAnimationRepeat","cycle":3}"#);

        let parsed: LottieEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_kind_names_parse() {
        for kind in LottieEventKind::ALL {
            assert_eq!(kind.as_str().parse::<LottieEventKind>(), Ok(kind));
        }
        assert!("animationStart".parse::<LottieEventKind>().is_err());
    }

    #[test]
    fn test_handlers_receive_matching_kind_only() {
        let bus = EventBus::new();
        let starts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&starts);
        bus.on(LottieEventKind::AnimationStart, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(LottieEvent::new(LottieEventKind::AnimationStart, 1));
        bus.emit(LottieEvent::new(LottieEventKind::AnimationEnd, 1));
        bus.emit(LottieEvent::new(LottieEventKind::AnimationStart, 2));

        assert_eq!(starts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_off_and_remove_all() {
        let bus = EventBus::new();
        let first = bus.on(LottieEventKind::AnimationEnd, |_| {});
        bus.on(LottieEventKind::AnimationEnd, |_| {});

        assert!(bus.off(first));
        assert!(!bus.off(first));
        assert_eq!(bus.listener_count(LottieEventKind::AnimationEnd), 1);

        bus.remove_all_listeners();
        assert_eq!(
            bus.emit(LottieEvent::new(LottieEventKind::AnimationEnd, 1)),
            0
        );
    }

    #[test]
    fn test_once_resolves_next_occurrence_only() {
        let bus = EventBus::new();
        let waiter = bus.once(LottieEventKind::AnimationEnd);

        bus.emit(LottieEvent::new(LottieEventKind::AnimationStart, 1));
        assert_eq!(waiter.try_event(), Ok(None));

        assert_eq!(
            bus.emit(LottieEvent::new(LottieEventKind::AnimationEnd, 1)),
            1
        );
        assert_eq!(
            bus.emit(LottieEvent::new(LottieEventKind::AnimationEnd, 2)),
            0
        );
        assert_eq!(waiter.wait().unwrap().cycle, 1);
    }

    #[test]
    fn test_once_survives_remove_all_but_not_bus_drop() {
        let bus = EventBus::new();
        let waiter = bus.once(LottieEventKind::AnimationCancel);
        bus.remove_all_listeners();
        drop(bus);
        assert_eq!(waiter.wait(), Err(SplashError::Stopped));
    }

    #[test]
    fn test_panicking_handler_does_not_stop_delivery() {
        Log::set_enabled(false);
        let bus = EventBus::new();
        let reached = Arc::new(AtomicUsize::new(0));
        bus.on(LottieEventKind::AnimationStart, |_| panic!("subscriber bug"));
        let counter = Arc::clone(&reached);
        bus.on(LottieEventKind::AnimationStart, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let waiter = bus.once(LottieEventKind::AnimationStart);

        assert_eq!(
            bus.emit(LottieEvent::new(LottieEventKind::AnimationStart, 1)),
            2
        );
        assert_eq!(reached.load(Ordering::SeqCst), 1);
        assert_eq!(waiter.try_event().unwrap().map(|event| event.cycle), Some(1));
    }

    #[test]
    fn test_dropped_waiters_are_pruned() {
        let bus = EventBus::new();
        for _ in 0..1000 {
            drop(bus.once(LottieEventKind::AnimationRepeat));
        }
        let live = bus.once(LottieEventKind::AnimationRepeat);
        assert_eq!(bus.lock().waiters.len(), 1);

        assert_eq!(
            bus.emit(LottieEvent::new(LottieEventKind::AnimationRepeat, 1)),
            1
        );
        assert!(live.try_event().unwrap().is_some());
        assert!(bus.lock().waiters.is_empty());
    }

    #[test]
    fn test_handler_may_unsubscribe_during_emit() {
        let bus = Arc::new(EventBus::new());
        let inner = Arc::clone(&bus);
        bus.on(LottieEventKind::AnimationStart, move |_| {
            inner.remove_all_listeners();
        });
        assert_eq!(
            bus.emit(LottieEvent::new(LottieEventKind::AnimationStart, 1)),
            1
        );
        assert_eq!(bus.listener_count(LottieEventKind::AnimationStart), 0);
    }
}
