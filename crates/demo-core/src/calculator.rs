//! Arithmetic operations.
//!
//! Four pure functions over IEEE-754 doubles plus the [`Operation`] enum
//! that names them. Only [`divide`] can fail.
//!
//! # Example
//!
//! ```
//! use demo_core::calculator::{divide, Operation};
//!
//! assert_eq!(Operation::Add.apply(5.0, 3.0), Ok(8.0));
//! assert!(divide(1.0, 0.0).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the arithmetic functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// The divisor was zero (either sign).
    #[error("Cannot divide by zero")]
    DivisionByZero,
}

/// Returned when a string does not name a known [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation: {0}")]
pub struct ParseOperationError(pub String);

/// Returns `a + b`.
#[must_use]
pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

/// Returns `a - b`.
#[must_use]
pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

/// Returns `a * b`.
#[must_use]
pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Returns `a / b`.
///
/// # Errors
///
/// Returns [`ArithmeticError::DivisionByZero`] when `b` is `0.0` or `-0.0`,
/// whatever the value of `a`.
pub fn divide(a: f64, b: f64) -> Result<f64, ArithmeticError> {
    if b == 0.0 {
        return Err(ArithmeticError::DivisionByZero);
    }
    Ok(a / b)
}

/// One of the four supported operations.
///
/// Parsing is an exact, case-sensitive match on the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Addition.
    Add,
    /// Multiplication.
    Multiply,
    /// Subtraction.
    Subtract,
    /// Division.
    Divide,
}

impl Operation {
    /// All operations, in the order they are advertised to clients.
    pub const ALL: [Self; 4] = [Self::Add, Self::Multiply, Self::Subtract, Self::Divide];

    /// Returns the wire name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Multiply => "multiply",
            Self::Subtract => "subtract",
            Self::Divide => "divide",
        }
    }

    /// Returns the wire names of all operations.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Self::as_str)
    }

    /// Applies the operation to two operands.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::DivisionByZero`] for a division by zero.
    pub fn apply(self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        match self {
            Self::Add => Ok(add(a, b)),
            Self::Multiply => Ok(multiply(a, b)),
            Self::Subtract => Ok(subtract(a, b)),
            Self::Divide => divide(a, b),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ParseOperationError(s.to_string()))
    }
}
