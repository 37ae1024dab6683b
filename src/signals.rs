//! Device signals and process signal handling.
//!
//! [`SignalHandle`] is the host's way to report taps, page readiness and
//! orientation changes to the controller. [`setup_signal_handler`] maps Unix
//! signals onto the same vocabulary for the `preview` command:
//!
//! - `SIGINT` / `SIGTERM`: hide the overlay and stop
//! - `SIGUSR1`: tap
//! - `SIGUSR2`: page ready

use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use anyhow::{Context, Result};
use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGUSR1, SIGUSR2};
use signal_hook::iterator::Signals;

use crate::core::Command;
use crate::error::SplashError;

/// Cloneable sender for device-originated triggers.
#[derive(Debug, Clone)]
pub struct SignalHandle {
    tx: Sender<Command>,
}

impl SignalHandle {
    pub(crate) fn new(tx: Sender<Command>) -> Self {
        Self { tx }
    }

    /// The user touched the overlay.
    pub fn tap(&self) -> Result<(), SplashError> {
        self.send(Command::Tap)
    }

    /// The host's first page finished loading.
    pub fn page_ready(&self) -> Result<(), SplashError> {
        self.send(Command::PageReady)
    }

    /// Screen bounds or orientation changed; the overlay is recentered.
    pub fn orientation_changed(&self) -> Result<(), SplashError> {
        self.send(Command::OrientationChanged)
    }

    fn send(&self, command: Command) -> Result<(), SplashError> {
        self.tx.send(command).map_err(|_| SplashError::Stopped)
    }
}

/// Process signals translated for the preview loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessSignal {
    Shutdown,
    Tap,
    PageReady,
}

impl ProcessSignal {
    /// Map a raw signal number; anything unexpected stops the preview.
    pub fn from_raw(sig: i32) -> Self {
        match sig {
            SIGUSR1 => ProcessSignal::Tap,
            SIGUSR2 => ProcessSignal::PageReady,
            _ => ProcessSignal::Shutdown,
        }
    }
}

/// Receiving end of the forwarded process signals
pub struct SignalState {
    pub receiver: Receiver<ProcessSignal>,
}

/// Install handlers and spawn the thread that forwards them.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let (sender, receiver) = channel();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGUSR1, SIGUSR2])
        .context("failed to register signal handlers")?;

    thread::Builder::new()
        .name("signal-handler".to_string())
        .spawn(move || {
            for sig in signals.forever() {
                let message = ProcessSignal::from_raw(sig);

                if debug_enabled {
                    log_pipe!();
                    log_debug!("Received signal {} ({:?})", sig, message);
                }

                if sender.send(message).is_err() || message == ProcessSignal::Shutdown {
                    break;
                }
            }
        })
        .context("failed to spawn signal handler thread")?;

    Ok(SignalState { receiver })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_forwards_commands() {
        let (tx, rx) = channel();
        let handle = SignalHandle::new(tx);

        handle.tap().unwrap();
        handle.page_ready().unwrap();
        handle.orientation_changed().unwrap();

        let received: Vec<Command> = rx.try_iter().collect();
        assert!(matches!(
            received.as_slice(),
            [Command::Tap, Command::PageReady, Command::OrientationChanged]
        ));
    }

    #[test]
    fn test_process_signal_mapping() {
        assert_eq!(ProcessSignal::from_raw(SIGUSR1), ProcessSignal::Tap);
        assert_eq!(ProcessSignal::from_raw(SIGUSR2), ProcessSignal::PageReady);
        assert_eq!(ProcessSignal::from_raw(SIGINT), ProcessSignal::Shutdown);
        assert_eq!(ProcessSignal::from_raw(SIGTERM), ProcessSignal::Shutdown);
    }

    #[test]
    fn test_handle_reports_stopped_controller() {
        let (tx, rx) = channel();
        let handle = SignalHandle::new(tx);
        drop(rx);
        assert_eq!(handle.tap(), Err(SplashError::Stopped));
    }
}
