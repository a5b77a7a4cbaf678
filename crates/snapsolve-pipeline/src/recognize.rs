//! The recognition adapter.
//!
//! Drives one engine session through its strict lifecycle — acquire, model
//! load, initialise, recognize — and guarantees the session is terminated on
//! every exit path: success, failure, and cancellation. Raw engine progress
//! is filtered through [`ProgressGate`] so callers only ever observe
//! clamped, non-decreasing fractions, and never after the terminal result.

use snapsolve_core::engine::{ImagePayload, RecognitionBackend, RecognitionSession};

use crate::{
  cancel::CancelToken,
  error::RecognitionError,
  progress::{EventSink, PipelineEvent, ProgressGate},
};

/// Run the recognition phase against `backend`.
pub async fn recognize_with<B>(
  backend: &B,
  image: &ImagePayload,
  events: &EventSink,
  cancel: &mut CancelToken,
) -> Result<String, RecognitionError>
where
  B: RecognitionBackend,
{
  if cancel.is_cancelled() {
    return Err(RecognitionError::Cancelled);
  }

  let mut session = match backend.acquire().await {
    Ok(session) => session,
    Err(error) => {
      tracing::debug!(%error, "recognition engine acquisition failed");
      return Err(RecognitionError::EngineUnavailable);
    }
  };

  if let Err(error) = session.load_model().await {
    release(session).await;
    return Err(RecognitionError::EngineFailure(error.to_string()));
  }
  if cancel.is_cancelled() {
    release(session).await;
    return Err(RecognitionError::Cancelled);
  }

  if let Err(error) = session.initialize().await {
    release(session).await;
    return Err(RecognitionError::EngineFailure(error.to_string()));
  }
  if cancel.is_cancelled() {
    release(session).await;
    return Err(RecognitionError::Cancelled);
  }

  let mut gate = ProgressGate::new();
  // Race the recognize call against cancellation. Dropping the recognize
  // future abandons the engine's work; the session itself is still owned
  // here and released below.
  let outcome = {
    let mut forward = |raw: f32| {
      if let Some(fraction) = gate.advance(raw) {
        events.emit(PipelineEvent::Recognizing(fraction));
      }
    };
    let recognized = session.recognize(image, &mut forward);
    tokio::pin!(recognized);
    tokio::select! {
      biased;
      () = cancel.cancelled() => None,
      result = &mut recognized => Some(result),
    }
  };

  match outcome {
    None => {
      release(session).await;
      Err(RecognitionError::Cancelled)
    }
    Some(Err(error)) => {
      release(session).await;
      Err(RecognitionError::EngineFailure(error.to_string()))
    }
    Some(Ok(text)) => {
      release(session).await;
      Ok(text)
    }
  }
}

/// Terminate the session. A shutdown failure is logged but never masks the
/// recognition result.
async fn release<S: RecognitionSession>(session: S) {
  if let Err(error) = session.terminate().await {
    tracing::warn!(%error, "recognition engine shutdown failed");
  }
}
