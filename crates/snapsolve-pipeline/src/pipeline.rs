//! The solve pipeline orchestrator.
//!
//! Composes recognition, extraction, and solving into one sequential run:
//! `Recognizing → Extracting → Solving`, with failure exits from every
//! non-terminal phase and a cancellation exit reachable only from
//! recognition. A run produces exactly one terminal result and no phase is
//! ever retried.
//!
//! The orchestrator owns no storage. On success it reports a
//! [`UsageIntent`]; the caller settles it through the account store.

use chrono::{DateTime, Utc};
use snapsolve_core::{
  account::Account,
  engine::{ImagePayload, RecognitionBackend, SolverEngine},
  entitlement,
};
use tracing::Instrument as _;
use uuid::Uuid;

use crate::{
  cancel::CancelToken,
  error::PipelineError,
  extract::extract,
  progress::{EventSink, PipelineEvent, SolvePhase},
  recognize::recognize_with,
  solve::solve_with,
};

// ─── Results ─────────────────────────────────────────────────────────────────

/// The successful terminal outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
  /// The normalised equation line recognized in the image.
  pub recognized_line: String,
  pub variable:        char,
  pub solution_text:   String,
}

/// How the successful run should be charged against the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageIntent {
  /// The account is unsubscribed; the caller must persist one consumed
  /// free use.
  ConsumeFreeUse,
  /// The account is covered by a subscription; no quota is consumed.
  NoCharge,
}

/// A successful run plus its charging intent.
#[derive(Debug, Clone)]
pub struct SolveReport {
  pub outcome: SolveOutcome,
  pub usage:   UsageIntent,
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

/// The recognize → extract → solve orchestrator, generic over the two
/// engine backends.
pub struct SolvePipeline<R, S> {
  recognition: R,
  solver:      S,
}

impl<R, S> SolvePipeline<R, S>
where
  R: RecognitionBackend,
  S: SolverEngine,
{
  pub fn new(recognition: R, solver: S) -> Self {
    Self { recognition, solver }
  }

  /// Run one solve invocation for `account`'s snapshot at `now`.
  ///
  /// Entitlement is not checked here — callers gate on
  /// [`entitlement::can_solve`] first. Progress events are emitted on
  /// `events` strictly before the terminal result.
  pub async fn run(
    &self,
    image: &ImagePayload,
    account: &Account,
    now: DateTime<Utc>,
    events: &EventSink,
    cancel: &mut CancelToken,
  ) -> Result<SolveReport, PipelineError> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!(
      "solve_pipeline",
      %run_id,
      account = %account.email,
    );

    async {
      events.emit(PipelineEvent::Phase(SolvePhase::Recognizing));
      let raw = recognize_with(&self.recognition, image, events, cancel)
        .await
        .map_err(|error| {
          tracing::info!(%error, "pipeline failed during recognition");
          PipelineError::Recognition(error)
        })?;

      events.emit(PipelineEvent::Phase(SolvePhase::Extracting));
      let extracted = extract(&raw).map_err(|_| {
        tracing::info!("pipeline found no equation text");
        PipelineError::NoTextFound
      })?;

      events.emit(PipelineEvent::Phase(SolvePhase::Solving));
      let solution_text =
        solve_with(&self.solver, &extracted).await.map_err(|error| {
          tracing::info!(%error, equation = %extracted.equation, "pipeline failed during solving");
          PipelineError::Unsolvable(error)
        })?;

      let usage = if entitlement::is_subscribed(account, now) {
        UsageIntent::NoCharge
      } else {
        UsageIntent::ConsumeFreeUse
      };

      tracing::info!(equation = %extracted.equation, "pipeline succeeded");
      Ok(SolveReport {
        outcome: SolveOutcome {
          recognized_line: extracted.equation,
          variable: extracted.variable,
          solution_text,
        },
        usage,
      })
    }
    .instrument(span)
    .await
  }
}
