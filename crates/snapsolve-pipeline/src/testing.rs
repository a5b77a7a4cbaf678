//! Scripted engine doubles shared by the adapter and orchestrator tests.

use std::sync::{
  Arc, Mutex,
  atomic::{AtomicUsize, Ordering},
};

use snapsolve_core::engine::{
  ImagePayload, RecognitionBackend, RecognitionSession, SolverEngine,
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("scripted engine failure")]
pub struct MockEngineError;

/// Which lifecycle step the scripted backend should fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
  Nowhere,
  Acquire,
  LoadModel,
  Initialize,
  Recognize,
}

// ─── Recognition ─────────────────────────────────────────────────────────────

pub struct MockBackend {
  fail_at:  FailAt,
  text:     String,
  progress: Vec<f32>,
  hang:     bool,
  pub terminated: Arc<AtomicUsize>,
  pub steps:      Arc<Mutex<Vec<&'static str>>>,
}

impl MockBackend {
  pub fn succeeding(text: &str, progress: Vec<f32>) -> Self {
    Self {
      fail_at: FailAt::Nowhere,
      text: text.to_string(),
      progress,
      hang: false,
      terminated: Arc::new(AtomicUsize::new(0)),
      steps: Arc::new(Mutex::new(Vec::new())),
    }
  }

  pub fn failing_at(fail_at: FailAt) -> Self {
    Self { fail_at, ..Self::succeeding("", vec![]) }
  }

  /// A backend whose recognize call never completes; only cancellation can
  /// end the run.
  pub fn hanging() -> Self {
    Self { hang: true, ..Self::succeeding("", vec![]) }
  }
}

impl RecognitionBackend for MockBackend {
  type Session = MockSession;
  type Error = MockEngineError;

  async fn acquire(&self) -> Result<MockSession, MockEngineError> {
    if self.fail_at == FailAt::Acquire {
      return Err(MockEngineError);
    }
    Ok(MockSession {
      fail_at: self.fail_at,
      text: self.text.clone(),
      progress: self.progress.clone(),
      hang: self.hang,
      terminated: Arc::clone(&self.terminated),
      steps: Arc::clone(&self.steps),
    })
  }
}

pub struct MockSession {
  fail_at:  FailAt,
  text:     String,
  progress: Vec<f32>,
  hang:     bool,
  terminated: Arc<AtomicUsize>,
  steps:      Arc<Mutex<Vec<&'static str>>>,
}

impl MockSession {
  fn record(&self, step: &'static str) {
    self.steps.lock().unwrap().push(step);
  }
}

impl RecognitionSession for MockSession {
  type Error = MockEngineError;

  async fn load_model(&mut self) -> Result<(), MockEngineError> {
    self.record("load_model");
    if self.fail_at == FailAt::LoadModel {
      return Err(MockEngineError);
    }
    Ok(())
  }

  async fn initialize(&mut self) -> Result<(), MockEngineError> {
    self.record("initialize");
    if self.fail_at == FailAt::Initialize {
      return Err(MockEngineError);
    }
    Ok(())
  }

  async fn recognize(
    &mut self,
    _image: &ImagePayload,
    on_progress: &mut (dyn FnMut(f32) + Send),
  ) -> Result<String, MockEngineError> {
    self.record("recognize");
    if self.fail_at == FailAt::Recognize {
      return Err(MockEngineError);
    }
    if self.hang {
      std::future::pending::<()>().await;
    }
    for raw in &self.progress {
      (*on_progress)(*raw);
    }
    Ok(self.text.clone())
  }

  async fn terminate(self) -> Result<(), MockEngineError> {
    self.record("terminate");
    self.terminated.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

// ─── Solver ──────────────────────────────────────────────────────────────────

pub struct MockSolver {
  answer: Option<String>,
}

impl MockSolver {
  pub fn answering(answer: &str) -> Self {
    Self { answer: Some(answer.to_string()) }
  }

  pub fn failing() -> Self {
    Self { answer: None }
  }
}

impl SolverEngine for MockSolver {
  type Error = MockEngineError;

  async fn solve(
    &self,
    _equation: &str,
    _variable: char,
  ) -> Result<String, MockEngineError> {
    self.answer.clone().ok_or(MockEngineError)
  }
}
