use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::backend::{Generator, TokenId};
use crate::error::{EapoError, Result};
use crate::metrics::{Clock, MonotonicClock};

const COMPONENT: &str = "generator";

/// Shares one model handle and allows a single generation in flight.
///
/// With a timeout, the call runs on a helper thread and the caller stops
/// waiting once the limit passes. The helper keeps the lock until the model
/// returns, so a timed-out generation still blocks later ones; the run is
/// expected to abort on the `Timeout` error.
///
/// [`Generator::generate_timed`] times only the inner model call, after the
/// lock is taken. On the helper thread that interval is read from a
/// [`MonotonicClock`], as the caller's clock stays on the caller's thread.
#[derive(Clone)]
pub struct GuardedGenerator {
    inner: Arc<dyn Generator>,
    lock: Arc<Mutex<()>>,
    timeout: Option<Duration>,
}

impl GuardedGenerator {
    pub fn new(inner: Arc<dyn Generator>, timeout: Option<Duration>) -> Self {
        Self {
            inner,
            lock: Arc::new(Mutex::new(())),
            timeout,
        }
    }

    fn poisoned() -> EapoError {
        EapoError::external(COMPONENT, "generation lock poisoned")
    }

    fn run_bounded(
        &self,
        input: &[TokenId],
        max_new_tokens: usize,
        limit: Duration,
    ) -> Result<(Vec<TokenId>, Duration)> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let lock = Arc::clone(&self.lock);
        let input = input.to_vec();

        thread::Builder::new()
            .name("eapo-generate".to_string())
            .spawn(move || {
                let outcome = match lock.lock() {
                    Ok(_held) => inner.generate_timed(&input, max_new_tokens, &MonotonicClock::new()),
                    Err(_) => Err(GuardedGenerator::poisoned()),
                };
                // The receiver is gone if the caller already timed out.
                let _ = tx.send(outcome);
            })
            .map_err(|e| EapoError::external(COMPONENT, format!("cannot spawn worker: {}", e)))?;

        match rx.recv_timeout(limit) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                warn!(seconds = limit.as_secs_f64(), "generation exceeded its time limit");
                Err(EapoError::Timeout {
                    component: COMPONENT,
                    seconds: limit.as_secs_f64(),
                })
            }
            Err(RecvTimeoutError::Disconnected) => Err(EapoError::external(
                COMPONENT,
                "worker exited without a result",
            )),
        }
    }
}

impl Generator for GuardedGenerator {
    fn generate(&self, input: &[TokenId], max_new_tokens: usize) -> Result<Vec<TokenId>> {
        self.generate_timed(input, max_new_tokens, &MonotonicClock::new())
            .map(|(output, _)| output)
    }

    fn generate_timed(
        &self,
        input: &[TokenId],
        max_new_tokens: usize,
        clock: &dyn Clock,
    ) -> Result<(Vec<TokenId>, Duration)> {
        match self.timeout {
            Some(limit) => self.run_bounded(input, max_new_tokens, limit),
            None => {
                let _held = self.lock.lock().map_err(|_| Self::poisoned())?;
                self.inner.generate_timed(input, max_new_tokens, clock)
            }
        }
    }
}
