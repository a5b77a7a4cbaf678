//! An elementary symbolic solver for polynomial equations of degree ≤ 2.
//!
//! Accepts a single variable, implicit multiplication (`2x`, `3*x`), `^1`
//! and `^2` powers, and terms on both sides of the equality. Everything
//! else — other functions, parentheses, higher degrees, a second variable —
//! is a parse error, which the pipeline's solver adapter reports as an
//! unsolvable equation.

use snapsolve_core::engine::SolverEngine;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlgebraError {
  #[error("cannot parse equation: {0}")]
  Parse(String),
}

/// The built-in solver engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementarySolver;

impl SolverEngine for ElementarySolver {
  type Error = AlgebraError;

  async fn solve(
    &self,
    equation: &str,
    variable: char,
  ) -> Result<String, AlgebraError> {
    solve_equation(equation, variable)
  }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Coefficients of `c[0] + c[1]·v + c[2]·v²` for one side of the equation.
type Coefficients = [f64; 3];

fn solve_equation(equation: &str, variable: char) -> Result<String, AlgebraError> {
  let compact: String =
    equation.chars().filter(|c| !c.is_whitespace()).collect();

  let Some((lhs, rhs)) = compact.split_once('=') else {
    return Err(AlgebraError::Parse("missing '='".to_string()));
  };
  if rhs.contains('=') {
    return Err(AlgebraError::Parse("more than one '='".to_string()));
  }

  let left = parse_side(lhs, variable)?;
  let right = parse_side(rhs, variable)?;

  // Move everything to the left-hand side.
  let a = left[2] - right[2];
  let b = left[1] - right[1];
  let c = left[0] - right[0];
  Ok(describe_roots(a, b, c, variable))
}

fn parse_side(side: &str, variable: char) -> Result<Coefficients, AlgebraError> {
  if side.is_empty() {
    return Err(AlgebraError::Parse("empty equation side".to_string()));
  }

  let mut terms: Vec<String> = Vec::new();
  let mut current = String::new();
  for ch in side.chars() {
    match ch {
      '+' | '-' if !current.is_empty() => {
        terms.push(std::mem::take(&mut current));
        if ch == '-' {
          current.push('-');
        }
      }
      // A sign at the start of a term.
      '+' => {}
      _ => current.push(ch),
    }
  }
  if current.is_empty() || current == "-" {
    return Err(AlgebraError::Parse("dangling operator".to_string()));
  }
  terms.push(current);

  let mut coefficients = [0.0; 3];
  for term in &terms {
    let (coefficient, exponent) = parse_term(term, variable)?;
    coefficients[exponent] += coefficient;
  }
  Ok(coefficients)
}

/// Parse one term into its coefficient and the variable's exponent.
fn parse_term(term: &str, variable: char) -> Result<(f64, usize), AlgebraError> {
  let (coefficient_src, exponent) = match term.find(variable) {
    None => (term, 0),
    Some(pos) => {
      let after = &term[pos + variable.len_utf8()..];
      let exponent = if after.is_empty() {
        1
      } else if let Some(digits) = after.strip_prefix('^') {
        match digits {
          "1" => 1,
          "2" => 2,
          other => {
            return Err(AlgebraError::Parse(format!(
              "unsupported exponent {other:?} in term {term:?}"
            )));
          }
        }
      } else {
        return Err(AlgebraError::Parse(format!("cannot parse term {term:?}")));
      };
      (&term[..pos], exponent)
    }
  };

  let coefficient_src =
    coefficient_src.strip_suffix('*').unwrap_or(coefficient_src);
  let coefficient = match coefficient_src {
    "" => 1.0,
    "-" => -1.0,
    src => src.parse::<f64>().map_err(|_| {
      AlgebraError::Parse(format!("cannot parse coefficient {src:?}"))
    })?,
  };
  Ok((coefficient, exponent))
}

// ─── Root description ────────────────────────────────────────────────────────

fn describe_roots(a: f64, b: f64, c: f64, variable: char) -> String {
  if a == 0.0 && b == 0.0 {
    return if c == 0.0 {
      format!("every value of {variable} satisfies the equation")
    } else {
      "no solution".to_string()
    };
  }

  if a == 0.0 {
    return format!("{variable} = {}", format_root(-c / b));
  }

  let discriminant = b * b - 4.0 * a * c;
  if discriminant < 0.0 {
    return "no real solutions".to_string();
  }
  if discriminant == 0.0 {
    return format!(
      "{variable} = {} (double root)",
      format_root(-b / (2.0 * a))
    );
  }

  let sqrt = discriminant.sqrt();
  let mut low = (-b - sqrt) / (2.0 * a);
  let mut high = (-b + sqrt) / (2.0 * a);
  if low > high {
    std::mem::swap(&mut low, &mut high);
  }
  format!(
    "{variable} = {} or {variable} = {}",
    format_root(low),
    format_root(high)
  )
}

fn format_root(value: f64) -> String {
  // Collapse negative zero and print integral roots without a fraction.
  let value = if value == 0.0 { 0.0 } else { value };
  if value.fract() == 0.0 && value.abs() < 1e12 {
    format!("{}", value as i64)
  } else {
    format!("{value}")
  }
}
