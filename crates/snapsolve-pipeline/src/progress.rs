//! Progress events emitted during a pipeline run.
//!
//! Events flow through an unbounded channel so the recognition callback
//! never blocks. A dropped receiver is not an error — the run simply
//! continues without an audience. The orchestrator sends no event after the
//! terminal result is produced.

use std::fmt;

use tokio::sync::mpsc;

// ─── Phases ──────────────────────────────────────────────────────────────────

/// The non-terminal states of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvePhase {
  Recognizing,
  Extracting,
  Solving,
}

impl fmt::Display for SolvePhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Self::Recognizing => "recognizing",
      Self::Extracting => "extracting",
      Self::Solving => "solving",
    };
    f.write_str(label)
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// A single progress event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineEvent {
  /// The run entered a new phase.
  Phase(SolvePhase),
  /// Recognition-phase completion, in [0, 1], non-decreasing within a run.
  Recognizing(f32),
}

/// Sending half of the progress stream.
#[derive(Clone)]
pub struct EventSink {
  tx: mpsc::UnboundedSender<PipelineEvent>,
}

impl EventSink {
  pub fn new(tx: mpsc::UnboundedSender<PipelineEvent>) -> Self {
    Self { tx }
  }

  /// Create a sink together with its receiving end.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self::new(tx), rx)
  }

  pub fn emit(&self, event: PipelineEvent) {
    // A closed receiver means nobody is listening; that is fine.
    let _ = self.tx.send(event);
  }
}

// ─── Monotonic gate ──────────────────────────────────────────────────────────

/// Filters raw engine progress into the stream the caller is promised:
/// clamped to [0, 1] and strictly increasing (repeats and regressions from
/// the engine are dropped).
#[derive(Debug, Default)]
pub(crate) struct ProgressGate {
  last: Option<f32>,
}

impl ProgressGate {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Admit a raw fraction, returning the value to forward if it advances
  /// the stream.
  pub(crate) fn advance(&mut self, raw: f32) -> Option<f32> {
    if !raw.is_finite() {
      return None;
    }
    let fraction = raw.clamp(0.0, 1.0);
    match self.last {
      Some(previous) if fraction <= previous => None,
      _ => {
        self.last = Some(fraction);
        Some(fraction)
      }
    }
  }
}
