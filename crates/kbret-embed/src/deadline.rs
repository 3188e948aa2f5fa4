use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use kbret_core::traits::TextEncoder;

/// Helper threads allowed to run at once, abandoned ones included.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Bounds single-text encoding by a wall-clock deadline.
///
/// The inner call runs on a helper thread; when the deadline passes the caller
/// gets an error immediately and the helper is left to finish on its own. A
/// thread cannot be cancelled, so an inner encoder that never returns keeps its
/// helper forever. At most `max_in_flight` helpers exist at a time; once that
/// many are stuck, further calls fail at once without spawning.
///
/// Batch encoding (index builds) is passed through without a deadline.
pub struct DeadlineEncoder {
    inner: Arc<dyn TextEncoder>,
    timeout: Duration,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: usize,
    name: String,
}

/// Releases one in-flight slot when the helper thread ends, however it ends.
struct Slot(Arc<AtomicUsize>);

impl Drop for Slot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl DeadlineEncoder {
    pub fn new(inner: Arc<dyn TextEncoder>, timeout: Duration) -> Self {
        let name = format!("{}(deadline {}ms)", inner.name(), timeout.as_millis());
        Self { inner, timeout, in_flight: Arc::new(AtomicUsize::new(0)), max_in_flight: DEFAULT_MAX_IN_FLIGHT, name }
    }

    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = max.max(1);
        self
    }

    /// Helper threads currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire_slot(&self) -> Option<Slot> {
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < self.max_in_flight).then_some(n + 1))
            .ok()
            .map(|_| Slot(Arc::clone(&self.in_flight)))
    }
}

impl TextEncoder for DeadlineEncoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let Some(slot) = self.acquire_slot() else {
            return Err(anyhow!(
                "{} has {} encodes still running past their deadline",
                self.inner.name(),
                self.max_in_flight
            ));
        };
        let (tx, rx) = mpsc::sync_channel(1);
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        thread::Builder::new()
            .name("kbret-encode".into())
            .spawn(move || {
                let _slot = slot;
                // receiver may be gone after a timeout
                let _ = tx.send(inner.encode(&text));
            })?;
        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err(anyhow!("{} did not answer within {:?}", self.inner.name(), self.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(anyhow!("{} worker exited without a result", self.inner.name())),
        }
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.inner.encode_batch(texts)
    }
}
