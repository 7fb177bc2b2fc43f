//! Blocking join over an asynchronous fetch.
//!
//! The guest-visible contract is "the call blocks until result or abort".
//! Fetch work runs on its own thread; the calling (guest) thread waits on a
//! channel for the completion signal. There is no mid-flight cancellation —
//! the per-attempt timeouts in the gateway layer bound how long a worker can
//! live, and any overall evaluation time limit belongs to the harness.

use std::sync::mpsc;
use std::thread;

use crate::error::BridgeError;

/// Run `task` on a fetch worker thread and block until it completes.
pub fn block_on_fetch<T, F>(task: F) -> Result<T, BridgeError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();

    thread::Builder::new()
        .name("weavedrive-fetch".to_string())
        .spawn(move || {
            // A send failure means the caller is gone; nothing to deliver to.
            let _ = sender.send(task());
        })
        .map_err(|e| BridgeError::Worker {
            message: format!("spawn failed: {}", e),
        })?;

    receiver.recv().map_err(|_| BridgeError::Worker {
        message: "worker disconnected before completing".to_string(),
    })
}
