//! The solver adapter.
//!
//! A thin boundary around the external symbolic engine: the equation and
//! target variable go in, a rendered solution description comes out, and
//! every engine-side failure is converted to [`SolveError::Unparseable`] so
//! no raw engine error reaches the orchestrator.

use snapsolve_core::engine::SolverEngine;

use crate::{error::SolveError, extract::ExtractedEquation};

/// Run the solve phase against `engine`.
pub async fn solve_with<S>(
  engine: &S,
  extracted: &ExtractedEquation,
) -> Result<String, SolveError>
where
  S: SolverEngine,
{
  engine
    .solve(&extracted.equation, extracted.variable)
    .await
    .map_err(|error| SolveError::Unparseable(error.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::MockSolver;

  fn extracted() -> ExtractedEquation {
    ExtractedEquation { equation: "2x+3=7".to_string(), variable: 'x' }
  }

  #[tokio::test]
  async fn success_passes_solution_through() {
    let engine = MockSolver::answering("x = 2");
    let solution = solve_with(&engine, &extracted()).await.unwrap();
    assert_eq!(solution, "x = 2");
  }

  #[tokio::test]
  async fn engine_failure_maps_to_unparseable() {
    let engine = MockSolver::failing();
    let result = solve_with(&engine, &extracted()).await;
    assert!(matches!(result, Err(SolveError::Unparseable(_))));
  }
}
