//! Cooperative cancellation for a pipeline run.
//!
//! Built on a `tokio::sync::watch` pair: the handle flips a flag, the token
//! observes it. Cancellation is cooperative — the recognition adapter checks
//! the token between lifecycle steps and races it against the recognize
//! call, so the engine is still released after a cancellation is observed.

use tokio::sync::watch;

/// Create a linked handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
  let (tx, rx) = watch::channel(false);
  (CancelHandle { tx }, CancelToken { rx })
}

/// Caller-side handle; request cancellation of the associated run.
#[derive(Debug)]
pub struct CancelHandle {
  tx: watch::Sender<bool>,
}

impl CancelHandle {
  pub fn cancel(&self) {
    let _ = self.tx.send(true);
  }
}

/// Pipeline-side token observing cancellation requests.
#[derive(Debug, Clone)]
pub struct CancelToken {
  rx: watch::Receiver<bool>,
}

impl CancelToken {
  /// A token that can never be cancelled — for callers without a
  /// cancellation source.
  pub fn never() -> Self {
    let (_, token) = cancel_pair();
    token
  }

  pub fn is_cancelled(&self) -> bool {
    *self.rx.borrow()
  }

  /// Resolve once cancellation is requested. If the handle is dropped
  /// without cancelling, this pends forever.
  pub async fn cancelled(&mut self) {
    if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
      std::future::pending::<()>().await;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn token_observes_cancellation() {
    let (handle, mut token) = cancel_pair();
    assert!(!token.is_cancelled());

    handle.cancel();
    assert!(token.is_cancelled());
    token.cancelled().await;
  }

  #[tokio::test]
  async fn dropped_handle_never_cancels() {
    let (handle, mut token) = cancel_pair();
    drop(handle);
    assert!(!token.is_cancelled());

    let waited = tokio::time::timeout(
      std::time::Duration::from_millis(20),
      token.cancelled(),
    )
    .await;
    assert!(waited.is_err(), "cancelled() should pend forever");
  }

  #[tokio::test]
  async fn never_token_is_never_cancelled() {
    assert!(!CancelToken::never().is_cancelled());
  }
}
