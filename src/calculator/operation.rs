//! Arithmetic operations exposed as endpoints

use std::fmt;

use super::error::CalcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Resolve an operation from its route path
    ///
    /// Matching ignores ASCII case and one trailing slash, so `/add`,
    /// `/add/` and `/ADD` all resolve to `Add`.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.strip_suffix('/').unwrap_or(path);
        Self::ALL
            .into_iter()
            .find(|op| op.path().eq_ignore_ascii_case(path))
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Add => "/add",
            Self::Subtract => "/subtract",
            Self::Multiply => "/multiply",
            Self::Divide => "/divide",
        }
    }

    /// Noun used in log lines ("received for addition")
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Add => "addition",
            Self::Subtract => "subtraction",
            Self::Multiply => "multiplication",
            Self::Divide => "division",
        }
    }

    /// Apply the operation to two finite operands.
    ///
    /// A result that overflows to infinity is reported as `InvalidInput`,
    /// the same as a non-finite operand.
    pub fn apply(self, n1: f64, n2: f64) -> Result<f64, CalcError> {
        let result = match self {
            Self::Add => n1 + n2,
            Self::Subtract => n1 - n2,
            Self::Multiply => n1 * n2,
            Self::Divide => {
                if n2 == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                n1 / n2
            }
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(CalcError::InvalidInput)
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}
