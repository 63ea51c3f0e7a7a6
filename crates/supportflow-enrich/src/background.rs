//! Off-thread enrichment so a slow collaborator never blocks the store.
//!
//! One worker thread per invocation; the handle is independently cancelable.
//! Cancellation does not abort an in-flight HTTP call (the client's timeout
//! bounds that); it discards the result so a late answer is never delivered
//! to a caller that moved on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::debug;

/// Handle to one in-flight enrichment call.
pub struct EnrichmentHandle<T> {
    cancel: Arc<AtomicBool>,
    receiver: Receiver<T>,
}

impl<T> EnrichmentHandle<T> {
    /// Drop the pending result. Idempotent.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Non-blocking poll. `None` until the worker delivers.
    pub fn try_result(&self) -> Option<T> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the worker finishes. `None` when the call was cancelled
    /// or the worker died.
    #[must_use]
    pub fn wait(self) -> Option<T> {
        self.receiver.recv().ok()
    }
}

/// Run one enrichment computation on a worker thread.
pub fn spawn<T, F>(work: F) -> EnrichmentHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let cancel = Arc::new(AtomicBool::new(false));
    let (sender, receiver) = mpsc::channel();
    let cancelled = Arc::clone(&cancel);

    thread::spawn(move || {
        let result = work();
        if cancelled.load(Ordering::SeqCst) {
            debug!("enrichment result discarded after cancellation");
            return;
        }
        // Receiver may already be gone; that is just another cancellation.
        let _ = sender.send(result);
    });

    EnrichmentHandle { cancel, receiver }
}
