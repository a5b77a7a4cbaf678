//! The pipeline failure taxonomy.
//!
//! Every engine-level failure is caught at the adapter boundary and
//! converted into one of these kinds; no raw engine error crosses into the
//! orchestrator. Entitlement denial is deliberately absent — it is a normal
//! control-flow result handled by the caller before the pipeline runs.

use thiserror::Error;

/// Failures of the recognition phase.
#[derive(Debug, Error)]
pub enum RecognitionError {
  /// The engine could not be acquired at all.
  #[error("recognition engine unavailable")]
  EngineUnavailable,

  /// The engine failed while loading its model, initialising, or
  /// recognizing.
  #[error("recognition engine failure: {0}")]
  EngineFailure(String),

  /// The caller cancelled before recognition completed.
  #[error("recognition cancelled")]
  Cancelled,
}

/// Failures of the equation extractor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
  #[error("recognized text is empty")]
  Empty,
}

/// Failures of the solve phase.
#[derive(Debug, Error)]
pub enum SolveError {
  /// The engine rejected the equation or failed while solving it.
  #[error("equation not solvable: {0}")]
  Unparseable(String),
}

/// The single terminal error of a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("recognition failed: {0}")]
  Recognition(#[source] RecognitionError),

  #[error("no equation text found in the image")]
  NoTextFound,

  #[error("could not solve the recognized equation: {0}")]
  Unsolvable(#[source] SolveError),
}

impl PipelineError {
  /// Whether this terminal result was caused by caller cancellation.
  pub fn is_cancelled(&self) -> bool {
    matches!(self, Self::Recognition(RecognitionError::Cancelled))
  }
}
