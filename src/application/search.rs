//! Longest-sequence search run off the UI thread.

use std::sync::Arc;
use std::thread;

use futures::channel::oneshot;
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::domain::sequence::{RangeResult, SequenceEngine};
use crate::error::EngineError;

/// A range search on its own thread. Dropping it cancels the search.
pub struct BackgroundSearch {
    limit: u64,
    token: CancelToken,
    result: Option<oneshot::Receiver<Result<RangeResult, EngineError>>>,
}

impl BackgroundSearch {
    pub fn start(engine: Arc<dyn SequenceEngine>, limit: u64) -> Self {
        let token = CancelToken::new();
        let (tx, rx) = oneshot::channel();
        let worker_token = token.clone();

        thread::spawn(move || {
            let outcome = engine.find_max_in_range_cancellable(limit, &worker_token);
            // Receiver gone means nobody wants the answer
            let _ = tx.send(outcome);
        });
        debug!(limit, "Range search started");

        Self { limit, token, result: Some(rx) }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Non-blocking check; yields the outcome exactly once
    pub fn poll(&mut self) -> Option<Result<RangeResult, EngineError>> {
        let rx = self.result.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(None) => return None,
            Ok(Some(outcome)) => outcome,
            Err(_) => {
                warn!(limit = self.limit, "Range search worker exited without a result");
                Err(EngineError::Cancelled)
            }
        };
        self.result = None;
        Some(outcome)
    }

    /// Wait for the outcome
    pub async fn wait(mut self) -> Result<RangeResult, EngineError> {
        let rx = self.result.take().ok_or(EngineError::Cancelled)?;
        rx.await.unwrap_or(Err(EngineError::Cancelled))
    }
}

impl Drop for BackgroundSearch {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
