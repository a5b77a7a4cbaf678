//! Contracts for the two external engines the solve pipeline drives.
//!
//! The engines themselves live outside this workspace (or in
//! `snapsolve-engines` as reference implementations); this module only pins
//! down the lifecycle and error boundary the pipeline relies on. Raw engine
//! errors never cross the adapter layer — the adapters in
//! `snapsolve-pipeline` convert them into the pipeline failure taxonomy.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes.

use std::future::Future;

// ─── Image payload ───────────────────────────────────────────────────────────

/// An opaque image handed through to the recognition engine. The pipeline
/// never inspects the bytes.
#[derive(Debug, Clone)]
pub struct ImagePayload {
  pub bytes: Vec<u8>,
}

impl From<Vec<u8>> for ImagePayload {
  fn from(bytes: Vec<u8>) -> Self { Self { bytes } }
}

// ─── Recognition engine ──────────────────────────────────────────────────────

/// A factory for recognition sessions.
///
/// Each pipeline run acquires exactly one session and releases it on every
/// exit path. Acquisition failure means the engine is unavailable (as
/// opposed to a failure while operating it).
pub trait RecognitionBackend: Send + Sync {
  type Session: RecognitionSession<Error = Self::Error>;
  type Error: std::error::Error + Send + Sync + 'static;

  fn acquire(
    &self,
  ) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send + '_;
}

/// An exclusively-owned recognition engine instance.
///
/// Callers drive the lifecycle in strict order: [`load_model`], then
/// [`initialize`], then [`recognize`], and finally [`terminate`] — the last
/// of which consumes the session and must run on every exit path.
///
/// `recognize` reports raw fractional progress through the callback. The
/// session makes no ordering promises about those fractions; clamping and
/// monotonicity are enforced by the adapter driving it.
///
/// [`load_model`]: RecognitionSession::load_model
/// [`initialize`]: RecognitionSession::initialize
/// [`recognize`]: RecognitionSession::recognize
/// [`terminate`]: RecognitionSession::terminate
pub trait RecognitionSession: Send {
  type Error: std::error::Error + Send + Sync + 'static;

  fn load_model(
    &mut self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn initialize(
    &mut self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn recognize<'a>(
    &'a mut self,
    image: &'a ImagePayload,
    on_progress: &'a mut (dyn FnMut(f32) + Send),
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  fn terminate(self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

// ─── Symbolic solver engine ──────────────────────────────────────────────────

/// The external symbolic solver: equation text plus target variable in, a
/// human-readable solution description out.
pub trait SolverEngine: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn solve<'a>(
    &'a self,
    equation: &'a str,
    variable: char,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}
