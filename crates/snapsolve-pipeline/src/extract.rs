//! The equation extractor — raw recognized text in, a normalised
//! single-variable equation out.
//!
//! Policy: only the first line of the trimmed text is the candidate
//! equation. Whitespace within that line is stripped, the first alphabetic
//! character names the solve variable (falling back to `x`), and a line
//! without an equality operator is treated as an expression equated to zero.
//! Whether the result actually parses is the solver's problem, not ours.

use crate::error::ExtractionError;

/// Variable assumed when the candidate line contains no alphabetic
/// character.
pub const FALLBACK_VARIABLE: char = 'x';

/// A normalised equation ready to hand to the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEquation {
  pub equation: String,
  pub variable: char,
}

/// Extract the candidate equation from raw recognizer output.
pub fn extract(raw: &str) -> Result<ExtractedEquation, ExtractionError> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(ExtractionError::Empty);
  }

  let candidate: String = trimmed
    .lines()
    .next()
    .unwrap_or_default()
    .chars()
    .filter(|c| !c.is_whitespace())
    .collect();

  let variable = candidate
    .chars()
    .find(|c| c.is_alphabetic())
    .unwrap_or(FALLBACK_VARIABLE);

  let equation = if candidate.contains('=') {
    candidate
  } else {
    format!("{candidate}=0")
  };

  Ok(ExtractedEquation { equation, variable })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn takes_only_the_first_line() {
    let extracted = extract("2x+3=7\nnoise below").unwrap();
    assert_eq!(extracted.equation, "2x+3=7");
    assert_eq!(extracted.variable, 'x');
  }

  #[test]
  fn expression_without_equals_is_equated_to_zero() {
    let extracted = extract("y^2-4").unwrap();
    assert_eq!(extracted.equation, "y^2-4=0");
    assert_eq!(extracted.variable, 'y');
  }

  #[test]
  fn empty_input_is_rejected() {
    assert_eq!(extract(""), Err(ExtractionError::Empty));
    assert_eq!(extract("   \n\t  "), Err(ExtractionError::Empty));
  }

  #[test]
  fn whitespace_within_the_line_is_stripped() {
    let extracted = extract("  2 x + 3 = 7  ").unwrap();
    assert_eq!(extracted.equation, "2x+3=7");
  }

  #[test]
  fn leading_blank_lines_are_skipped_by_the_trim() {
    let extracted = extract("\n\n 3z = 9\nrest").unwrap();
    assert_eq!(extracted.equation, "3z=9");
    assert_eq!(extracted.variable, 'z');
  }

  #[test]
  fn variable_falls_back_to_x() {
    let extracted = extract("12+3=15").unwrap();
    assert_eq!(extracted.variable, FALLBACK_VARIABLE);
  }

  #[test]
  fn first_alphabetic_character_wins() {
    let extracted = extract("2a+3b=7").unwrap();
    assert_eq!(extracted.variable, 'a');
  }
}
