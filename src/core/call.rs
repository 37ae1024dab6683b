//! One-shot replies from the controller thread to blocking callers.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError, channel};
use std::time::Duration;

use crate::error::SplashError;

/// Sending half, held by the controller until the call settles.
#[derive(Debug)]
pub struct Responder<T> {
    tx: Sender<Result<T, SplashError>>,
}

impl<T> Responder<T> {
    pub fn resolve(self, value: T) {
        let _ = self.tx.send(Ok(value));
    }

    pub fn reject(self, error: SplashError) {
        let _ = self.tx.send(Err(error));
    }

    pub fn settle(self, result: Result<T, SplashError>) {
        let _ = self.tx.send(result);
    }
}

/// Receiving half returned by `show()` and `hide()`.
///
/// If the controller drops the responder without answering the call settles
/// with [`SplashError::Stopped`].
#[derive(Debug)]
pub struct CallHandle<T> {
    rx: Receiver<Result<T, SplashError>>,
}

impl<T> CallHandle<T> {
    /// Create a linked responder/handle pair.
    pub fn pair() -> (Responder<T>, CallHandle<T>) {
        let (tx, rx) = channel();
        (Responder { tx }, CallHandle { rx })
    }

    /// A handle that has already settled.
    pub fn settled(result: Result<T, SplashError>) -> CallHandle<T> {
        let (responder, handle) = Self::pair();
        responder.settle(result);
        handle
    }

    pub fn wait(self) -> Result<T, SplashError> {
        self.rx.recv().unwrap_or(Err(SplashError::Stopped))
    }

    /// `None` while still pending.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T, SplashError>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(SplashError::Stopped)),
        }
    }

    pub fn try_result(&self) -> Option<Result<T, SplashError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SplashError::Stopped)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_and_reject() {
        let (responder, handle) = CallHandle::pair();
        assert_eq!(handle.try_result(), None);
        responder.resolve(7);
        assert_eq!(handle.wait(), Ok(7));

        let (responder, handle) = CallHandle::<()>::pair();
        responder.reject(SplashError::AnimationAlreadyPlaying);
        assert_eq!(
            handle.wait_timeout(Duration::from_millis(10)),
            Some(Err(SplashError::AnimationAlreadyPlaying))
        );
    }

    #[test]
    fn test_dropped_responder_means_stopped() {
        let (responder, handle) = CallHandle::<u8>::pair();
        drop(responder);
        assert_eq!(handle.wait(), Err(SplashError::Stopped));
    }

    #[test]
    fn test_pending_times_out() {
        let (_responder, handle) = CallHandle::<u8>::pair();
        assert_eq!(handle.wait_timeout(Duration::from_millis(5)), None);
    }
}
