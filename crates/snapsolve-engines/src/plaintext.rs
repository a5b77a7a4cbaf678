//! A recognition backend for development and testing.
//!
//! Treats the image payload as UTF-8 text — the shape of a pre-recognized
//! fixture file — while enforcing the same session lifecycle a real OCR
//! engine requires: the model must be loaded before initialisation, and the
//! session must be initialised before it will recognize anything. Progress
//! is reported as a fixed staircase of quarter fractions.

use snapsolve_core::engine::{
  ImagePayload, RecognitionBackend, RecognitionSession,
};
use thiserror::Error;

const PROGRESS_STEPS: u32 = 4;

#[derive(Debug, Error)]
pub enum PlainTextError {
  #[error("language model not loaded")]
  ModelNotLoaded,

  #[error("engine not initialised")]
  NotInitialised,

  #[error("image payload is not valid UTF-8 text")]
  InvalidEncoding,
}

/// Backend handing out [`PlainTextSession`]s. Stateless; acquisition always
/// succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRecognizer;

impl RecognitionBackend for PlainTextRecognizer {
  type Session = PlainTextSession;
  type Error = PlainTextError;

  async fn acquire(&self) -> Result<PlainTextSession, PlainTextError> {
    Ok(PlainTextSession { model_loaded: false, initialised: false })
  }
}

/// One recognition run's worth of engine state.
#[derive(Debug)]
pub struct PlainTextSession {
  model_loaded: bool,
  initialised:  bool,
}

impl RecognitionSession for PlainTextSession {
  type Error = PlainTextError;

  async fn load_model(&mut self) -> Result<(), PlainTextError> {
    self.model_loaded = true;
    Ok(())
  }

  async fn initialize(&mut self) -> Result<(), PlainTextError> {
    if !self.model_loaded {
      return Err(PlainTextError::ModelNotLoaded);
    }
    self.initialised = true;
    Ok(())
  }

  async fn recognize(
    &mut self,
    image: &ImagePayload,
    on_progress: &mut (dyn FnMut(f32) + Send),
  ) -> Result<String, PlainTextError> {
    if !self.initialised {
      return Err(PlainTextError::NotInitialised);
    }
    let text = std::str::from_utf8(&image.bytes)
      .map_err(|_| PlainTextError::InvalidEncoding)?
      .to_string();
    for step in 1..=PROGRESS_STEPS {
      (*on_progress)(step as f32 / PROGRESS_STEPS as f32);
    }
    Ok(text)
  }

  async fn terminate(self) -> Result<(), PlainTextError> {
    Ok(())
  }
}
